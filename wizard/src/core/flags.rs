//! Flag naming derived from state identifiers.

/// Convert a camelCase identifier to kebab-case (`projectName` -> `project-name`).
pub fn camel_to_kebab(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 4);
    for ch in id.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Convert a kebab-case flag body back to camelCase (`project-name` -> `projectName`).
pub fn kebab_to_camel(flag: &str) -> String {
    let mut out = String::with_capacity(flag.len());
    let mut chars = flag.chars().peekable();
    while let Some(ch) = chars.next() {
        match chars.peek() {
            Some(next) if ch == '-' && next.is_ascii_lowercase() => {
                let upper = next.to_ascii_uppercase();
                chars.next();
                out.push(upper);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Long flag for a state id, including the leading dashes.
pub fn flag_name(id: &str) -> String {
    format!("--{}", camel_to_kebab(id))
}
