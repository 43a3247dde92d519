use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cogrisk", version, about = "Staged cognitive-risk screening CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Assess(AssessArgs),
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct AssessArgs {
    #[arg(long, help = "Record JSON file with combined fields for all stages")]
    pub input: PathBuf,

    #[arg(long, help = "Directory with stage{1,2,3}.json artifacts (default: built-in)")]
    pub artifacts: Option<PathBuf>,

    #[arg(long, help = "Output directory for the assessment report")]
    pub out: Option<PathBuf>,

    #[arg(long, default_value_t = false, help = "Write assessment.json to the output directory")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, help = "Directory with stage{1,2,3}.json artifacts (default: built-in)")]
    pub artifacts: Option<PathBuf>,
}
