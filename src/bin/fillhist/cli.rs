/// Command line interface for `fillhist` executable
#[derive(clap::Parser, Debug, Clone)]
#[clap(
    name = "fillhist",
    about = "Fill the histograms booked in a TOML file from a column file",
)]
pub (super) struct Cli {
    /// TOML file booking the histograms
    pub config: PathBuf,

    /// Whitespace-separated column file with one event per line
    pub input: PathBuf,

    /// JSON output file for the merged histograms [default: stdout]
    #[clap(short, long)]
    pub out: Option<PathBuf>,

    /// Maximum number of rayon threads used for filling
    #[clap(short = 'j', long, default_value = "4")]
    pub threads: usize,

    /// Number of partitions the events are split into [default: one per thread]
    #[clap(short, long)]
    pub partitions: Option<usize>,

    /// Print a text summary of every histogram instead of JSON
    #[clap(short, long)]
    pub summary: bool,

    /// Log verbosity level (trace, debug, info, warn, error)
    #[clap(long, default_value = "warn")]
    pub log_level: tracing::Level,
}
// ----- Imports -----------------------------------------------------------------------------------------
use std::path::PathBuf;
