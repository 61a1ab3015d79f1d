//! Project generation from the collected answers.

use std::path::{Component, Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result, anyhow, bail};
use minijinja::{Environment, context};
use serde::Serialize;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info, instrument};
use wizard::{Output, TaskContext};

const README_TEMPLATE: &str = include_str!("../templates/README.md.j2");
const GITIGNORE_TEMPLATE: &str = include_str!("../templates/gitignore.j2");
const CARGO_TOML_TEMPLATE: &str = include_str!("../templates/Cargo.toml.j2");
const MAIN_RS_TEMPLATE: &str = include_str!("../templates/main.rs.j2");
const PACKAGE_JSON_TEMPLATE: &str = include_str!("../templates/package.json.j2");
const INDEX_TS_TEMPLATE: &str = include_str!("../templates/index.ts.j2");

/// Answers the templates are rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    /// Name usable as a Cargo package.
    pub package: String,
    pub language: Language,
    pub git: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Rust,
    Typescript,
}

impl Language {
    fn label(self) -> &'static str {
        match self {
            Language::Rust => "Rust",
            Language::Typescript => "TypeScript",
        }
    }
}

impl Project {
    /// Read the answers collected by the flow.
    pub fn from_values(values: &Output) -> Result<Self> {
        let name = values
            .get("name")
            .and_then(|value| value.as_str())
            .ok_or_else(|| anyhow!("missing project name"))?
            .trim()
            .to_string();
        let language = match values.get("language").and_then(|value| value.as_str()) {
            Some("rust") | None => Language::Rust,
            Some("typescript") => Language::Typescript,
            Some(other) => bail!("unsupported language '{other}'"),
        };
        let git = values
            .get("git")
            .and_then(|value| value.as_bool())
            .unwrap_or(false);
        Ok(Self {
            package: package_name(&name),
            name,
            language,
            git,
        })
    }
}

fn package_name(name: &str) -> String {
    name.trim_start_matches('@').replace(['/', '.'], "-")
}

/// Render every file of the project, as paths relative to its directory.
pub fn render_files(project: &Project) -> Result<Vec<(PathBuf, String)>> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.add_template("readme", README_TEMPLATE)?;
    env.add_template("gitignore", GITIGNORE_TEMPLATE)?;
    env.add_template("cargo_toml", CARGO_TOML_TEMPLATE)?;
    env.add_template("main_rs", MAIN_RS_TEMPLATE)?;
    env.add_template("package_json", PACKAGE_JSON_TEMPLATE)?;
    env.add_template("index_ts", INDEX_TS_TEMPLATE)?;

    let ctx = context! {
        name => &project.name,
        package => &project.package,
        language => project.language,
        language_label => project.language.label(),
    };
    let files: &[(&str, &str)] = match project.language {
        Language::Rust => &[
            ("README.md", "readme"),
            (".gitignore", "gitignore"),
            ("Cargo.toml", "cargo_toml"),
            ("src/main.rs", "main_rs"),
        ],
        Language::Typescript => &[
            ("README.md", "readme"),
            (".gitignore", "gitignore"),
            ("package.json", "package_json"),
            ("src/index.ts", "index_ts"),
        ],
    };

    files
        .iter()
        .map(|&(path, template)| -> Result<(PathBuf, String)> {
            let rendered = env
                .get_template(template)?
                .render(&ctx)
                .with_context(|| format!("render {path}"))?;
            Ok((PathBuf::from(path), rendered))
        })
        .collect()
}

/// Task effect: create `<root>/<name>` and populate it.
///
/// Fails when the directory already exists or would lie outside `root`.
#[instrument(skip_all, fields(root = %root.display()))]
pub async fn scaffold(root: PathBuf, ctx: TaskContext) -> Result<()> {
    let project = Project::from_values(&ctx.values)?;
    let files = render_files(&project)?;
    let relative = Path::new(&project.name);
    if !relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        bail!("project name '{}' escapes {}", project.name, root.display());
    }
    let dir = root.join(relative);

    if fs::try_exists(&dir)
        .await
        .with_context(|| format!("check {}", dir.display()))?
    {
        bail!("directory {} already exists", dir.display());
    }

    for (relative, contents) in &files {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, contents)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        debug!(path = %path.display(), "wrote file");
    }

    if project.git {
        tokio::select! {
            () = ctx.cancel.cancelled() => bail!("git init cancelled"),
            result = git_init(&dir) => result?,
        }
    }

    info!(project = %project.name, files = files.len(), git = project.git, "project scaffolded");
    Ok(())
}

async fn git_init(dir: &Path) -> Result<()> {
    let output = Command::new("git")
        .arg("init")
        .arg("--quiet")
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .context("spawn git init")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git init failed ({}): {}", output.status, stderr.trim());
    }
    Ok(())
}
