use std::path::PathBuf;
use structopt::StructOpt;
use structopt::clap::ErrorKind;

/// Command-line options for the graph registry server.
///
/// Serving needs a config file (`--config registry.toml`); pointing at a
/// missing file drops into the interactive first-run setup. `--version`
/// prints build info and exits without a config.
#[derive(StructOpt, Debug)]
pub struct Opts {
    #[structopt(short = "v", long = "version", help = "Print build info and exit")]
    pub version: bool,

    #[structopt(short, long, help = "Mirror log output to stdout (debug logging)")]
    pub debug: bool,

    #[structopt(
        short = "c",
        long = "config",
        required_unless = "version",
        help = "Path to the registry configuration file"
    )]
    pub config: Option<PathBuf>,
}

impl Opts {
    /// Parse CLI arguments. If parsing fails, print the error and the full help, then exit.
    pub fn from_args() -> Self {
        let app = Opts::clap();
        match app.get_matches_safe() {
            Ok(m) => Opts::from_clap(&m),
            Err(e) => {
                let kind = e.kind; // capture before we move/print
                eprintln!("{}", e);
                let mut app = Opts::clap();
                eprintln!();
                let _ = app.print_long_help();
                eprintln!();
                std::process::exit(match kind {
                    ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => 0,
                    _ => 2,
                });
            }
        }
    }
}
