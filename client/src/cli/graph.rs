use crate::action;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum GraphCommands {
    /// List tracked graphs with their freshness
    List,
    /// Fetch a graph's content and acknowledge it as seen
    Fetch {
        /// Tracked path of the graph to fetch
        #[arg(short = 'p', long = "path")]
        path: String,
        /// Write the content here instead of stdout
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Track an existing file on the server host
    Add {
        /// Path of the graph file on the server host
        #[arg(short = 'p', long = "path")]
        path: String,
        /// Human-readable label for listings
        #[arg(short = 'l', long = "label")]
        label: String,
    },
    /// Upload a local graph file into the server's upload dir
    Upload {
        /// Local file to upload
        #[arg(short = 'f', long = "file")]
        file: PathBuf,
        /// Name to store the upload under (defaults to the file's name)
        #[arg(short = 'n', long = "name")]
        name: Option<String>,
    },
}

pub fn handle_graph_commands(cmd: &GraphCommands, port: u16) {
    match cmd {
        GraphCommands::List => action::list_graphs::list_graphs(port),
        GraphCommands::Fetch { path, output } => {
            action::fetch_graph::fetch_graph(port, path, output.as_deref())
        }
        GraphCommands::Add { path, label } => {
            action::register_graph::register_graph(port, path, label)
        }
        GraphCommands::Upload { file, name } => {
            action::upload_graph::upload_graph(port, file, name.as_deref())
        }
    }
}
