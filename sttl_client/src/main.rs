//! `sttl` - decode STTL text or fetch it from a model server.
//!
//! Results are written to stdout as JSON; logs go to stderr and are
//! filtered with `RUST_LOG` (default `info`).

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use sttl_client::{
    run_extraction, run_labelling, ClientConfig, CompletionClient, Endpoint, Extraction, Result,
};
use sttl_core::{DecodeOptions, KnowledgeGraph, NerIndex};
use sttl_schema::{CodeTable, CodeTables, SchemaDefinition};

#[derive(Parser)]
#[command(name = "sttl", version, about = "Decode STTL knowledge-graph text")]
struct Cli {
    /// Schema file to derive code tables from (defaults to the built-in tables)
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Indent JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode STTL from a file or stdin into a graph
    Decode {
        /// Input file; reads stdin when omitted
        input: Option<PathBuf>,

        /// Capture `;m=` mentions
        #[arg(long)]
        mentions: bool,

        /// Also output the named-entity index
        #[arg(long)]
        ner: bool,
    },

    /// Send text to the model server and decode its STTL answer
    Extract {
        /// Text to extract from
        text: String,

        /// Client configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        /// Capture `;m=` mentions
        #[arg(long)]
        mentions: bool,
    },

    /// Ask the labelling model for quick-search labels
    Labels {
        /// Text to label
        text: String,

        /// Client configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the code tables
    Tables,
}

#[derive(Serialize)]
struct DecodeReport<'a> {
    graph: &'a KnowledgeGraph,
    ner: &'a NerIndex,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let tables = load_tables(cli.schema.as_deref())?;

    let output = match cli.command {
        Command::Decode {
            input,
            mentions,
            ner,
        } => {
            let sttl = read_input(input.as_deref())?;
            let extraction =
                Extraction::from_sttl(sttl, &tables, DecodeOptions::with_mentions(mentions));
            if ner {
                serde_json::to_value(DecodeReport {
                    graph: &extraction.graph,
                    ner: &extraction.ner,
                })?
            } else {
                serde_json::to_value(&extraction.graph)?
            }
        }
        Command::Extract {
            text,
            config,
            host,
            port,
            mentions,
        } => {
            let config = client_config(config.as_deref(), host, port)?;
            let client = CompletionClient::new(config);
            let extraction = run_extraction(
                &client,
                &text,
                &tables,
                DecodeOptions::with_mentions(mentions),
            )?;
            serde_json::to_value(&extraction)?
        }
        Command::Labels {
            text,
            config,
            host,
            port,
        } => {
            let mut config = client_config(config.as_deref(), host, port)?;
            // The labelling model is only served behind the chat API
            config.endpoint = Endpoint::Chat;
            let client = CompletionClient::new(config);
            serde_json::to_value(run_labelling(&client, &text)?)?
        }
        Command::Tables => tables_json(&tables),
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");
    Ok(())
}

/// File (or default) config, then environment, then command-line flags.
fn client_config(
    path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    }
    .with_env_overrides();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    Ok(config)
}

fn load_tables(schema: Option<&Path>) -> Result<CodeTables> {
    match schema {
        Some(path) => {
            let definition = SchemaDefinition::load(path)?;
            Ok(CodeTables::from_schema(&definition)?)
        }
        None => Ok(CodeTables::builtin().clone()),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Code -> label objects for each table.
fn tables_json(tables: &CodeTables) -> Value {
    let table = |t: &CodeTable| {
        let codes: Map<String, Value> = t
            .iter()
            .map(|(label, code)| (code.to_string(), Value::from(label)))
            .collect();
        Value::Object(codes)
    };

    let mut root = Map::new();
    root.insert("entity_types".to_string(), table(&tables.entity_types));
    root.insert("attributes".to_string(), table(&tables.attributes));
    root.insert("relations".to_string(), table(&tables.relations));
    Value::Object(root)
}
