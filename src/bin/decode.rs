//! Vehicle Decode CLI
//!
//! Decodes, re-encodes and inspects vehicle status documents.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use vehicle_schemas::model::{self, MODEL};
use vehicle_schemas::{encode, normalize_key, Decoder, ErrorPolicy, Schema, Settings};

#[derive(Parser)]
#[command(name = "vehicle-decode")]
#[command(about = "Decode connected-vehicle status documents")]
struct Cli {
    /// Config file (defaults to vehicle-schemas.toml lookup)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a raw document and print the typed record
    Decode {
        /// JSON document ("-" for stdin)
        file: PathBuf,
        /// Sub-resource or record name (defaults to the full status model)
        #[arg(short, long)]
        resource: Option<String>,
        /// Stop at the first field error
        #[arg(long)]
        fail_fast: bool,
    },

    /// Decode a raw document and write it back in wire form
    Encode {
        /// JSON document ("-" for stdin)
        file: PathBuf,
        #[arg(short, long)]
        resource: Option<String>,
    },

    /// Print schema tables
    Schema {
        /// Sub-resource or record name (all tables if omitted)
        resource: Option<String>,
    },

    /// Print the canonical form of raw keys
    Normalize {
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Decode {
            file,
            resource,
            fail_fast,
        } => {
            let mut settings = Settings::load_from(cli.config.as_deref())?;
            if fail_fast {
                settings.decoder.error_policy = ErrorPolicy::FailFast;
            }
            let decoder = Decoder::new(settings.decoder);
            let raw = read_document(&file)?;
            let schema = resolve(resource.as_deref())?;

            if std::ptr::eq(schema, &MODEL) {
                let report = decoder.decode_report(schema, &raw)?;
                let failures: Vec<Value> = report
                    .failures
                    .iter()
                    .map(|f| json!({"field": f.field, "error": f.error.to_string()}))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "record": report.record,
                        "failures": failures,
                    }))?
                );
                if !report.is_complete() {
                    std::process::exit(2);
                }
            } else {
                let record = decoder.decode(schema, Some(&raw))?;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            Ok(())
        }

        Commands::Encode { file, resource } => {
            let settings = Settings::load_from(cli.config.as_deref())?;
            let decoder = Decoder::new(settings.decoder);
            let raw = read_document(&file)?;
            let schema = resolve(resource.as_deref())?;

            let record = decoder.decode(schema, Some(&raw))?;
            let wire = encode(schema, &record)?;
            println!("{}", serde_json::to_string_pretty(&wire)?);
            Ok(())
        }

        Commands::Schema { resource } => {
            let schemas = match resource {
                Some(name) => resolve(Some(&name))?.walk(),
                None => model::all_schemas(),
            };
            println!("{}", serde_json::to_string_pretty(&schemas)?);
            Ok(())
        }

        Commands::Normalize { keys } => {
            for key in keys {
                println!("{}\t{}", key, normalize_key(&key));
            }
            Ok(())
        }
    }
}

fn resolve(resource: Option<&str>) -> anyhow::Result<&'static Schema> {
    match resource {
        None => Ok(&MODEL),
        Some(name) => model::find_schema(name).ok_or_else(|| anyhow!("unknown resource `{}`", name)),
    }
}

fn read_document(path: &Path) -> anyhow::Result<Value> {
    let text = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("reading stdin")?
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    let raw: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    if !raw.is_object() {
        bail!("{} is not a JSON object", path.display());
    }
    Ok(raw)
}
