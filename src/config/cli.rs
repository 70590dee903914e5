use crate::core::provider::PROVIDER_WORKBOOK;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_dir_exists, validate_non_empty_string, Validate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "docmill")]
#[command(about = "Template metadata and document generation engine")]
pub struct CliConfig {
    /// Directory holding the stored .docx templates
    #[arg(long, default_value = "./templates")]
    pub base_dir: PathBuf,

    /// Provider address workbook, relative to the base directory
    #[arg(long, default_value = PROVIDER_WORKBOOK)]
    pub provider_file: String,

    /// TOML config file; overrides --base-dir and --provider-file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List stored templates with their metadata
    List,
    /// Show placeholders, meta and layout for a template
    Inspect { filename: String },
    /// Render a template against a JSON context file
    Render {
        filename: String,
        /// JSON file with the context mapping; defaults to an empty one
        #[arg(long)]
        context: Option<PathBuf>,
        #[arg(long, default_value = "output.docx")]
        output: PathBuf,
    },
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_dir_exists("base_dir", &self.base_dir)?;
        validate_non_empty_string("provider_file", &self.provider_file)?;
        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn provider_file(&self) -> &str {
        &self.provider_file
    }

    fn verbose(&self) -> bool {
        self.verbose
    }
}
