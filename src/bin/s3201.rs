use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use s3201_rs::{
    exec::IntExecutor, isa::s3201::S3201Decoder, monitor, Cpu, CpuConfig, Exit, LinearMemory,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Run a System 3201 binary image"
)]
struct Opts {
    /// Pause between monitor frames, in milliseconds
    #[arg(long, default_value_t = 100u64)]
    delay_ms: u64,
    /// Do not draw the register monitor
    #[arg(short, long)]
    quiet: bool,
    /// Stop after this many instructions
    #[arg(long)]
    max_steps: Option<u64>,
    /// Treat unknown opcodes as no-ops instead of faulting
    #[arg(long)]
    lenient: bool,
    /// JSON file with a CpuConfig
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print the final machine state as JSON
    #[arg(long)]
    json: bool,
    #[arg(value_name = "IMAGE")]
    input: PathBuf,
}

fn load_config(opts: &Opts) -> Result<CpuConfig> {
    let mut cfg = match &opts.config {
        Some(path) => {
            let txt = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&txt).with_context(|| format!("parsing {}", path.display()))?
        }
        None => CpuConfig::default(),
    };
    if opts.lenient {
        cfg.trap_unimplemented = false;
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let cfg = load_config(&opts)?;

    let bytes = std::fs::read(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;
    let mut mem = LinearMemory::with_image(cfg.memory_size, &bytes)?;

    let mut cpu = Cpu::new(cfg);
    cpu.reset(0);

    let dec = S3201Decoder::new();
    let exec = IntExecutor;
    let delay = Duration::from_millis(opts.delay_ms);
    let draw = |cpu: &Cpu, mem: &LinearMemory| {
        if opts.quiet {
            return;
        }
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "{}{}", monitor::CLEAR, monitor::render(cpu, mem.peek4(cpu.pc)));
        let _ = out.flush();
        std::thread::sleep(delay);
    };

    draw(&cpu, &mem);
    let result = cpu.run(&mut mem, &dec, &exec, opts.max_steps, |cpu, mem| draw(cpu, &*mem));
    if !opts.quiet {
        print!("{}", monitor::CLEAR);
    }
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&cpu)?);
    }

    match result? {
        Exit::Halted { steps } => {
            tracing::info!(steps, "halted");
            Ok(())
        }
        Exit::BudgetExhausted { steps } => bail!("step budget exhausted after {steps} instructions"),
    }
}
