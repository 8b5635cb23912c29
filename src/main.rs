use std::convert::Infallible;
use std::fs;
use std::io::{stderr, stdout};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::debug;

use crate::binpl::Program;
use crate::interpreter::Interpreter;

pub mod binpl;
pub mod interpreter;
pub mod parser;

#[derive(Parser, Debug)]
#[command(
    name = "binpl2",
    version,
    about = "Interpreter for the BINPL2 line-based source format"
)]
struct Cli {
    /// BINPL2 source file to run
    source: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let content = fs::read_to_string(&cli.source)
        .with_context(|| format!("failed to read {}", cli.source.display()))?;

    let Ok(program): Result<Program, Infallible> = content.parse() else {
        unreachable!()
    };
    debug!("loaded {} line(s) from {}", program.len(), cli.source.display());

    let mut interpreter = Interpreter::new(stdout().lock(), stderr().lock());
    let report = interpreter.run(&program)?;
    debug!(
        "emitted {} character(s), skipped {} line(s)",
        report.emitted, report.skipped
    );

    Ok(())
}
