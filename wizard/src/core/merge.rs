//! Combining the value sources of one invocation.

use crate::core::machine::Machine;
use crate::core::value::{Prefill, Value};

/// Merge command-line flags, config values and positional arguments.
///
/// Flags win over config, and config wins over the positional argument, which
/// only ever fills the machine's positional state. Defaults are not applied
/// here; the executors fall back to them per state.
pub fn merge_sources(
    machine: &Machine,
    flags: Prefill,
    config: Prefill,
    positionals: &[String],
) -> Prefill {
    let mut merged = flags;
    for (id, value) in config {
        merged.entry(id).or_insert(value);
    }
    if let (Some(id), Some(first)) = (machine.positional(), positionals.first()) {
        merged
            .entry(id.to_string())
            .or_insert_with(|| Value::Text(first.clone()));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::name_flag_machine;

    fn values(pairs: &[(&str, &str)]) -> Prefill {
        pairs
            .iter()
            .map(|(id, value)| ((*id).to_string(), Value::from(*value)))
            .collect()
    }

    #[test]
    fn flags_take_precedence_over_config() {
        let merged = merge_sources(
            &name_flag_machine(),
            values(&[("x", "A")]),
            values(&[("x", "B"), ("y", "C")]),
            &[],
        );
        assert_eq!(merged.get("x"), Some(&Value::from("A")));
        assert_eq!(merged.get("y"), Some(&Value::from("C")));
    }

    #[test]
    fn positional_fills_only_the_positional_state() {
        let positionals = vec!["demo".to_string(), "extra".to_string()];
        let merged = merge_sources(&name_flag_machine(), Prefill::new(), Prefill::new(), &positionals);
        assert_eq!(merged, values(&[("name", "demo")]));

        let merged = merge_sources(
            &name_flag_machine(),
            Prefill::new(),
            values(&[("name", "from-config")]),
            &positionals,
        );
        assert_eq!(merged.get("name"), Some(&Value::from("from-config")));
    }
}
