//! Newline-delimited JSON event loop.

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};

use crate::config::schema::AppConfig;
use crate::filter::Event;
use crate::observability::metrics;
use crate::pipeline::handle::FilterHandle;

/// Tag added to lines that are not JSON objects.
pub const JSON_PARSE_FAILURE_TAG: &str = "_jsonparsefailure";

/// Counters for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Events written to the output, malformed ones included.
    pub processed: u64,
    /// Events with a resolved address.
    pub resolved: u64,
    /// Events the filter could not resolve.
    pub failed: u64,
    /// Lines that were not UTF-8 JSON objects.
    pub malformed: u64,
    /// Applied config reloads.
    pub reloads: u64,
}

/// Filter every line of `reader` into `writer` until EOF or shutdown.
///
/// Config updates arriving on `config_updates` replace the filter between
/// events. A closed update channel simply disables reloads, and a dropped
/// shutdown sender disables the shutdown branch. Lines that are not valid
/// UTF-8 pass through as malformed events; only I/O errors end the run.
pub async fn run<R, W>(
    mut reader: R,
    mut writer: W,
    handle: &FilterHandle,
    mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<PipelineStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut stats = PipelineStats::default();
    let mut updates_open = true;
    let mut shutdown_open = true;

    loop {
        tokio::select! {
            biased;

            signal = shutdown.recv(), if shutdown_open => match signal {
                Ok(()) | Err(RecvError::Lagged(_)) => {
                    tracing::info!("Shutdown requested, stopping pipeline");
                    break;
                }
                Err(RecvError::Closed) => {
                    tracing::debug!("Shutdown sender dropped");
                    shutdown_open = false;
                }
            },

            update = config_updates.recv(), if updates_open => match update {
                Some(config) => {
                    if handle.reload(&config.filter).is_ok() {
                        stats.reloads += 1;
                    }
                }
                None => updates_open = false,
            },

            // Partial reads stay in `buf` if another branch wins
            read = reader.read_until(b'\n', &mut buf) => {
                let at_eof = read? == 0;
                if !buf.is_empty() {
                    if let Some(output) = process_bytes(&buf, handle, &mut stats) {
                        writer.write_all(output.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;
                    }
                    buf.clear();
                }
                if at_eof {
                    tracing::debug!("End of input");
                    break;
                }
            }
        }
    }

    writer.flush().await?;
    tracing::info!(
        processed = stats.processed,
        resolved = stats.resolved,
        failed = stats.failed,
        malformed = stats.malformed,
        "Pipeline finished"
    );
    Ok(stats)
}

/// Decode one raw line, without its terminator, and filter it.
fn process_bytes(raw: &[u8], handle: &FilterHandle, stats: &mut PipelineStats) -> Option<String> {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    match std::str::from_utf8(line) {
        Ok(line) => process_line(line, handle, stats),
        Err(e) => {
            tracing::warn!(error = %e, "Input line is not valid UTF-8");
            let event = malformed(&String::from_utf8_lossy(line), stats);
            encode(&event, stats)
        }
    }
}

/// Filter one input line; `None` for blank lines.
fn process_line(line: &str, handle: &FilterHandle, stats: &mut PipelineStats) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }

    let event = match Event::from_json_str(line) {
        Ok(mut event) => {
            let evaluation = handle.load().filter(&mut event);
            if evaluation.is_resolved() {
                stats.resolved += 1;
            } else {
                stats.failed += 1;
            }
            event
        }
        Err(e) => {
            tracing::warn!(error = %e, "Input line is not a JSON object");
            malformed(line, stats)
        }
    };

    encode(&event, stats)
}

fn malformed(line: &str, stats: &mut PipelineStats) -> Event {
    metrics::record_malformed_event();
    stats.malformed += 1;
    Event::unparsed(line, JSON_PARSE_FAILURE_TAG)
}

fn encode(event: &Event, stats: &mut PipelineStats) -> Option<String> {
    stats.processed += 1;
    match serde_json::to_string(event) {
        Ok(output) => Some(output),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode event");
            None
        }
    }
}
