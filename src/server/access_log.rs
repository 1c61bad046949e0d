//! Access log built from lifecycle events.
//!
//! One line per response in common-log shape:
//! `<peer> - - [<date>] "<request line>" <status> <bytes>`.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::config::LoggingConfig;
use crate::server::events::ConnectionEvent;

/// Renders the access line for a `Responded` event.
pub fn format_entry(event: &ConnectionEvent, at: DateTime<Utc>) -> Option<String> {
    let ConnectionEvent::Responded {
        peer,
        request_line,
        status,
        bytes,
        ..
    } = event
    else {
        return None;
    };

    let peer = peer.map_or_else(|| "-".to_string(), |p| p.ip().to_string());
    let status = status.map_or_else(|| "-".to_string(), |s| s.to_string());
    Some(format!(
        "{peer} - - [{}] \"{request_line}\" {status} {bytes}",
        at.format("%d/%b/%Y:%H:%M:%S %z")
    ))
}

pub async fn run(mut rx: broadcast::Receiver<ConnectionEvent>, cfg: LoggingConfig) {
    loop {
        let event = match rx.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "access log fell behind");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        match &event {
            ConnectionEvent::Responded { id, head, .. } => {
                if cfg.access_log {
                    if let Some(line) = format_entry(&event, Utc::now()) {
                        tracing::info!(target: "access", "{line}");
                    }
                }
                if cfg.debug_responses {
                    tracing::debug!(%id, "response head:\n{}", head.trim_end());
                }
            }
            ConnectionEvent::Errored { id, error } => {
                tracing::debug!(%id, %error, "connection errored");
            }
            ConnectionEvent::Created { id, peer } => {
                tracing::trace!(%id, ?peer, "connection created");
            }
            ConnectionEvent::Closed { id } => {
                tracing::trace!(%id, "connection closed");
            }
        }
    }
}
