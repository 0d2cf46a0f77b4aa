// qprofile/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qprofile")]
#[command(about = "Built-in quality profiles: merge, default election and inspection", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 📋 Lists the built-in profiles of every installed language
    List {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// 🔍 Shows the rules activated by one built-in profile
    Show {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Language of the profile (ex: "java")
        #[arg(long, short)]
        language: String,

        /// Name of the profile (ex: "Sonar way")
        #[arg(long, short)]
        name: String,
    },

    /// ✅ Validates rule catalogs and contributed profiles (exit 1 on failure)
    Check {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}
