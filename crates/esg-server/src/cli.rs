use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "esg-server", version, about = "ESG emissions reporting service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Serve the JSON API (the default when no command is given)
    Serve {
        #[arg(long, help = "Address to listen on (overrides ESG_BIND_ADDR)")]
        bind: Option<SocketAddr>,
        #[arg(long, help = "Directory holding the JSON stores (overrides ESG_DATA_DIR)")]
        data_dir: Option<PathBuf>,
    },
    /// Write a PDF report for the stored record and strategy
    Report {
        #[arg(long, help = "Directory holding the JSON stores (overrides ESG_DATA_DIR)")]
        data_dir: Option<PathBuf>,
        #[arg(long, help = "PNG chart to embed")]
        chart: Option<PathBuf>,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

impl Cli {
    pub fn command(self) -> Commands {
        self.command.unwrap_or(Commands::Serve {
            bind: None,
            data_dir: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["esg-server"]).unwrap();
        assert_eq!(
            cli.command(),
            Commands::Serve {
                bind: None,
                data_dir: None
            }
        );
    }

    #[test]
    fn report_flags() {
        let cli = Cli::try_parse_from([
            "esg-server",
            "report",
            "--data-dir",
            "/tmp/esg",
            "--chart",
            "chart.png",
        ])
        .unwrap();
        assert_eq!(
            cli.command(),
            Commands::Report {
                data_dir: Some(PathBuf::from("/tmp/esg")),
                chart: Some(PathBuf::from("chart.png")),
                out_dir: PathBuf::from("."),
            }
        );
    }

    #[test]
    fn bind_must_be_an_address() {
        assert!(Cli::try_parse_from(["esg-server", "serve", "--bind", "nowhere"]).is_err());
    }
}
