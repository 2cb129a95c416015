use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use s3201_asm::{AsmError, Assembler};

#[derive(Parser, Debug)]
#[command(author, version, about = "System 3201 assembler")]
struct Opts {
    /// Input assembly file
    #[arg(value_name = "INFILE")]
    input: PathBuf,
    /// Output binary image
    #[arg(value_name = "OUTFILE")]
    output: PathBuf,
}

fn located(opts: &Opts, e: AsmError) -> anyhow::Error {
    anyhow::anyhow!("{}:{}", opts.input.display(), e)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let text = fs::read_to_string(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;

    println!("System 3201 assembler");
    let asm = Assembler::new(&text);
    println!("Pass 1");
    let labels = asm.pass1().map_err(|e| located(&opts, e))?;
    println!("Pass 2");
    let bin = asm.pass2(&labels).map_err(|e| located(&opts, e))?;

    // nothing touches the output path until both passes succeed
    fs::write(&opts.output, &bin)
        .with_context(|| format!("writing {}", opts.output.display()))?;
    tracing::info!(bytes = bin.len(), labels = labels.len(), "assembled");
    Ok(())
}
