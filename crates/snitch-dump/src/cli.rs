use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "snitch-dump",
    version,
    about = "Render a framed snitch report stream as JSON lines"
)]
pub struct Cli {
    /// File containing the framed stream; reads stdin when omitted
    pub input: Option<PathBuf>,

    /// Abort on the first malformed payload instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Pretty-print each report instead of emitting one line per report
    #[arg(long)]
    pub pretty: bool,
}
