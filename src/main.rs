use anyhow::Context;
use clap::Parser;
use docmill::config::{CliConfig, Command, TomlConfig};
use docmill::utils::{logger, validation::Validate};
use docmill::ConfigProvider;
use docmill::DocEngine;
use serde_json::{json, Value};
use std::io::Write;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let engine = match &cli.config {
        Some(path) => {
            let config = TomlConfig::from_file(path)
                .with_context(|| format!("loading config file {}", path.display()))?;
            if config.json_logs() {
                logger::init_service_logger();
            } else {
                logger::init_cli_logger(config.verbose() || cli.verbose);
            }
            tracing::info!("Starting docmill (config file {})", path.display());
            DocEngine::from_config(&config)?
        }
        None => {
            logger::init_cli_logger(cli.verbose);
            tracing::info!("Starting docmill");
            if cli.verbose {
                tracing::debug!("CLI config: {:?}", cli);
            }
            if let Err(err) = cli.validate() {
                tracing::error!("Configuration validation failed: {}", err);
                eprintln!("❌ {}", err);
                std::process::exit(1);
            }
            DocEngine::from_config(&cli)?
        }
    };

    match &cli.command {
        Command::List => {
            let entries = engine.list_templates()?;
            tracing::info!("Found {} templates", entries.len());
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Command::Inspect { filename } => {
            let report = json!({
                "placeholders": engine.placeholders_with_options(filename)?,
                "meta": engine.meta(filename)?,
                "layout": engine.layout(filename)?,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Render {
            filename,
            context,
            output,
        } => {
            let ctx: Value = match context {
                Some(path) => {
                    let raw = std::fs::read_to_string(path)
                        .with_context(|| format!("reading context file {}", path.display()))?;
                    serde_json::from_str(&raw)
                        .with_context(|| format!("parsing context file {}", path.display()))?
                }
                None => json!({}),
            };

            let buf = engine.render_to_buffer(filename, ctx)?;
            let mut file = std::fs::File::create(output)
                .with_context(|| format!("creating {}", output.display()))?;
            file.write_all(buf.get_ref())?;

            tracing::info!("Rendered {} to {}", filename, output.display());
            println!("✅ Document written to {}", output.display());
        }
    }

    Ok(())
}
