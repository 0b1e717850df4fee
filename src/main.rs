use std::process;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tiny_rsa::config::{Cli, Command, DemoConfig};
use tiny_rsa::demo;

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            key,
            public_out,
            private_out,
        } => {
            demo::run_generate(&key.p, &key.q, &key.e, &public_out, &private_out)?;
        }
        Command::Extract { public_key } => {
            demo::run_extract(&public_key)?;
        }
        Command::Demo(args) => {
            demo::run_demo(&DemoConfig::from(args))?;
        }
        Command::Attack {
            public_key,
            budget,
            private_out,
        } => {
            demo::run_attack(&public_key, budget, private_out.as_deref())?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
