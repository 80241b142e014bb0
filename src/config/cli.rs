use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "menu-etl")]
#[command(about = "Collects daily cafeteria menus in a log and sends reports about them")]
pub struct CliConfig {
    /// TOML configuration file (menu-etl.toml is used if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Overrides `[log] path` from the configuration
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch the current menu and prepend it to the log
    Retrieve,
    /// Format the latest menu and hand it to the configured sender
    Send {
        #[arg(short, long)]
        formatter: Option<String>,
    },
    /// Print a report without sending it
    Report {
        /// Named formatter (defaults to `[report] default_formatter`)
        #[arg(short, long, conflicts_with_all = ["analyzer", "template"])]
        formatter: Option<String>,

        /// Single analyzer key, printed as `<headline>:<result>`
        #[arg(long, requires = "headline", conflicts_with = "template")]
        analyzer: Option<String>,

        #[arg(long)]
        headline: Option<String>,

        /// Template with one `$` per analyzer
        #[arg(long, requires = "analyzers")]
        template: Option<String>,

        #[arg(long, value_delimiter = ',')]
        analyzers: Vec<String>,
    },
    /// List the available formatter names
    Formatters,
    /// Write every logged meal as a CSV table
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },
}
