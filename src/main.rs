use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cogrisk::artifacts::{ArtifactStore, loader};
use cogrisk::cascade::Cascade;
use cogrisk::cli::{AssessArgs, Cli, Commands, ValidateArgs};
use cogrisk::io;
use cogrisk::record::RawRecord;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Assess(args) => run_assess(args),
        Commands::Validate(args) => run_validate(args),
    }
}

fn load_store(artifacts: Option<&PathBuf>) -> Result<ArtifactStore> {
    let store = match artifacts {
        Some(dir) => loader::load_dir(dir)?,
        None => loader::load_builtin()?,
    };
    tracing::info!(ready = store.is_ready(), "artifact store loaded");
    Ok(store)
}

fn run_assess(args: AssessArgs) -> Result<()> {
    let store = load_store(args.artifacts.as_ref())?;

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read record {}", args.input.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("record {} is not valid JSON", args.input.display()))?;
    let record = RawRecord::from_value(value)?;

    let mut cascade = Cascade::new(&store);
    let outcome = cascade.run_full(&record);

    let fused = match &outcome {
        Ok(completed) => Some(&completed.fused),
        Err(_) => None,
    };
    print!("{}", io::summary::format_summary(&cascade, fused));

    if args.json {
        let out_dir = args.out.unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;
        let path = out_dir.join("assessment.json");
        io::json_writer::write_json(&path, &cascade, fused)?;
        println!("report: {}", path.display());
    }

    if let Err(failed) = outcome {
        match failed.error {
            Some(err) => anyhow::bail!("stage {} failed: {}", failed.stage, err),
            None => anyhow::bail!("stage {} failed", failed.stage),
        }
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<()> {
    let store = load_store(args.artifacts.as_ref())?;
    println!("cogrisk validate ok");
    for (stage, width) in [1u8, 2, 3].iter().zip(store.widths()) {
        match width {
            Some(w) => println!("stage{}: ok ({} features)", stage, w),
            None => println!("stage{}: missing", stage),
        }
    }
    Ok(())
}
