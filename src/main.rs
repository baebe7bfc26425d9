//! recreator - headless hopper routing runner
//!
//! Loads a workstation pack, drives its transfers through a fresh engine and
//! writes a JSONL transfer log.

mod config;
mod scenario;

use anyhow::{Context, Result};
use clap::Parser;
use config::{block_pos, WorkstationPack};
use recreator_hopper::HopperEngine;
use recreator_testkit::JsonlSink;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless hopper routing runner", long_about = None)]
struct Args {
    /// Workstation pack (TOML)
    #[arg(long)]
    pack: PathBuf,

    /// JSONL transfer log path
    #[arg(long, default_value = "target/transfers.jsonl")]
    log: PathBuf,
}

fn main() -> Result<()> {
    // Initialize tracing with INFO level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting recreator v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let pack = WorkstationPack::load_from_path(&args.pack)?;
    info!(
        workstations = pack.workstations.len(),
        custom_workstations = pack.custom_workstations.len(),
        transfers = pack.transfers.len(),
        "Loaded pack {}",
        args.pack.display()
    );

    let mut sink = JsonlSink::create(&args.log)
        .with_context(|| format!("Failed to create transfer log {}", args.log.display()))?;
    let engine = HopperEngine::new();
    let (world, summary) = scenario::run(&engine, &pack, &mut sink)?;

    for def in &pack.blocks {
        let pos = block_pos(def.pos);
        info!(block = %pos, material = %def.material, items = world.total(pos), "final contents");
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);
    info!("Transfer log written to {}", args.log.display());

    engine.shutdown();
    Ok(())
}
