mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncRead;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use report_codec::Report;
use report_frame::ReportReader;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let input: Box<dyn AsyncRead + Unpin> = match &cli.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(tokio::io::stdin()),
    };

    let mut reader = ReportReader::new(input);
    let mut printed = 0usize;
    let mut skipped = 0usize;

    loop {
        // Fetch the frame and decode its payload in two steps so a bad
        // payload can be skipped without losing frame sync.
        let envelope = match reader.recv_envelope().await? {
            Some(envelope) => envelope,
            None => break,
        };

        match envelope.report() {
            Ok(report) => {
                println!("{}", render(&report, cli.pretty)?);
                printed += 1;
            }
            Err(err) if cli.strict => {
                return Err(err).context("malformed report payload");
            }
            Err(err) => {
                warn!(
                    message_type = envelope.message_type,
                    %err,
                    "skipping malformed report payload"
                );
                skipped += 1;
            }
        }
    }

    info!(printed, skipped, "report stream exhausted");
    Ok(())
}

/// Serialise one report as JSON.
fn render(report: &Report, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    json.context("failed to serialise report as JSON")
}
