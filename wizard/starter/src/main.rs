//! `create-starter` binary.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use starter::flow::{self, DESCRIPTION, TOOL};
use wizard::{CliOptions, Mode, TerminalRenderer, exit_codes, logging, run_cli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();
    let code = match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

async fn run() -> Result<i32> {
    let root = std::env::current_dir().context("resolve current directory")?;
    let machine = flow::machine(root).context("build question flow")?;

    let options = CliOptions::new(TOOL)
        .description(DESCRIPTION)
        .intro(TOOL)
        .outro_with(flow::outro);
    let mode = if std::io::stdin().is_terminal() {
        Mode::Interactive
    } else {
        Mode::Headless
    };

    let mut renderer = TerminalRenderer::stdio();
    let outcome = run_cli(&machine, &options, std::env::args().skip(1), mode, &mut renderer).await;
    if let Some(text) = outcome.stdout() {
        println!("{text}");
    }
    if let Some(message) = outcome.stderr() {
        eprintln!("error: {message}");
    }
    Ok(outcome.exit_code())
}
