//! Space Model CLI
//!
//! Loads a schema source and prints, exports or checks the linked model.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use space_model::{render_text, to_dot, ModelConfig, OutputFormat, Schema};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "space-model")]
#[command(about = "Load a space schema and inspect the linked model")]
struct Cli {
    /// Config file layered over the default locations
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the loaded model
    Show {
        /// Schema source (defaults to [source] path)
        path: Option<PathBuf>,
    },

    /// Export the relation graph to DOT
    Dot {
        /// Schema source (defaults to [source] path)
        path: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report counts and unresolved references
    Check {
        /// Schema source (defaults to [source] path)
        path: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `false` when a strict check failed
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = ModelConfig::load_from(cli.config.as_deref()).context("loading configuration")?;

    let load = |path: Option<PathBuf>| -> anyhow::Result<Schema> {
        let path = path.unwrap_or_else(|| config.source.path.clone());
        Schema::from_path(&path).with_context(|| format!("loading {}", path.display()))
    };

    match cli.command {
        Commands::Show { path } => {
            let schema = load(path)?;
            match config.output.format {
                OutputFormat::Text => print!("{}", render_text(&schema)),
                OutputFormat::Dot => print!("{}", to_dot(&schema)),
            }
            Ok(true)
        }

        Commands::Dot { path, output } => {
            let schema = load(path)?;
            let dot = to_dot(&schema);
            match output {
                Some(output) => {
                    std::fs::write(&output, &dot)?;
                    println!("✅ Exported DOT to: {:?}", output);
                }
                None => print!("{}", dot),
            }
            Ok(true)
        }

        Commands::Check { path } => {
            let schema = load(path)?;
            let graph = schema.relation_graph();
            let stored = schema.spaces().iter().filter(|s| s.is_space()).count();

            println!(
                "🔍 {} records ({} spaces), {} relations",
                schema.space_count(),
                stored,
                schema.relation_count()
            );
            for cycle in graph.cycles() {
                let names: Vec<_> = cycle.iter().map(|s| s.name().unwrap_or("<unnamed>")).collect();
                println!("  ↻ relation cycle: {}", names.join(" -> "));
            }

            let unresolved = schema.unresolved();
            if config.diagnostics.report_unresolved {
                for miss in unresolved {
                    println!("  ⚠️  {}", miss);
                }
            }

            if unresolved.is_empty() {
                println!("✅ All references resolved");
                Ok(true)
            } else if config.diagnostics.strict {
                println!("❌ {} unresolved references", unresolved.len());
                Ok(false)
            } else {
                println!("⚠️  {} unresolved references", unresolved.len());
                Ok(true)
            }
        }
    }
}
