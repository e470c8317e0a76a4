mod action;
mod cli;
mod error;
mod format;

use crate::cli::graph::GraphCommands;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "graph-registry-client",
    version,
    about = "Graph registry client CLI",
    propagate_version = true
)]
pub struct Cli {
    /// Port the registry server listens on
    #[arg(short = 'P', long = "port", global = true, default_value_t = 8001)]
    port: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(name = "graph", about = "Graph registry commands")]
    Graph {
        #[command(subcommand)]
        command: GraphCommands,
    },
}

/// Unwrap one expected response variant, turning the server's Error
/// variant and any unexpected variant into a ClientError.
#[macro_export]
macro_rules! extract_response {
    ($resp:expr, $variant:path) => {
        match $resp {
            $variant(v) => Ok(v),
            api_model::protocol::message::api_response_message::ApiResponseKind::Error(e) => {
                Err($crate::error::ClientError::ServerError(
                    e.to_string(),
                    String::new(),
                ))
            }
            other => Err($crate::error::ClientError::ResponseParseError(
                format!("unexpected response variant: {:?}", other),
                String::new(),
            )),
        }
    };
}

fn main() {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Graph { command } => cli::graph::handle_graph_commands(command, cli.port),
    }
}
