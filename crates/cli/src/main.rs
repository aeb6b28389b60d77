//! Catalog Graph CLI - snapshot checks and offline queries.
//!
//! # Usage
//!
//! ```bash
//! # Validate a snapshot against the configured shape
//! cg-cli check --data example_product.json
//!
//! # Validate a multi-variant snapshot with integer keys
//! cg-cli check --data catalog.json --key-kind integer --variant-shape many --upc-kind int
//!
//! # Run a GraphQL document against a snapshot without starting the server
//! cg-cli query --data example_product.json '{ product(id: "42") { id topCategory } }'
//! ```
//!
//! Flags that are omitted fall back to the server's `CATALOG_*` environment
//! variables (and `.env`), so the CLI sees the same catalog the server would.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use catalog_graph_core::{CatalogShape, KeyKind, ScalarKind, VariantShape};
use catalog_graph_server::ServerConfig;
use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cg-cli")]
#[command(author, version, about = "Catalog Graph CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the registry and load a snapshot, reporting the product count
    Check {
        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Run one GraphQL document against a snapshot and print the response
    Query {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Variables as a JSON object
        #[arg(long)]
        variables: Option<String>,

        /// Operation to run when the document has several
        #[arg(long)]
        operation_name: Option<String>,

        /// GraphQL document
        query: String,
    },
}

/// Snapshot location and catalog shape.
#[derive(Args)]
struct CatalogArgs {
    /// Snapshot file (default: `CATALOG_DATA_PATH`)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Product key kind, `string` or `integer` (default: `CATALOG_KEY_KIND`)
    #[arg(long)]
    key_kind: Option<KeyKind>,

    /// Variant cardinality, `single` or `many` (default: `CATALOG_VARIANT_SHAPE`)
    #[arg(long)]
    variant_shape: Option<VariantShape>,

    /// UPC scalar, `string` or `int` (default: `CATALOG_UPC_KIND`)
    #[arg(long)]
    upc_kind: Option<ScalarKind>,
}

impl CatalogArgs {
    /// Resolve against the environment configuration.
    fn resolve(self) -> Result<(PathBuf, CatalogShape), Box<dyn std::error::Error>> {
        let config = ServerConfig::from_env()?;
        let shape = CatalogShape {
            key_kind: self.key_kind.unwrap_or(config.shape.key_kind),
            variants: self.variant_shape.unwrap_or(config.shape.variants),
            upc: self.upc_kind.unwrap_or(config.shape.upc),
        };
        Ok((self.data.unwrap_or(config.data_path), shape))
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Check { catalog } => {
            let (path, shape) = catalog.resolve()?;
            commands::check::run(&path, &shape)?;
        }
        Commands::Query {
            catalog,
            variables,
            operation_name,
            query,
        } => {
            let (path, shape) = catalog.resolve()?;
            commands::query::run(&path, &shape, query, variables.as_deref(), operation_name)?;
        }
    }
    Ok(())
}
