//! Feed connection events and the single reconciliation entry point.
//!
//! The connection itself (handshake, reconnects, timeouts) belongs to the
//! host. It reports what happened as [`FeedEvent`]s and [`FeedSession::dispatch`]
//! folds them into the [`DeviceStore`].

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use rtls_core::DeviceStore;

use crate::error::FeedParseError;
use crate::protocol::{decode_records, split_message};
use crate::settings::FeedSettings;

/// Something that happened on the feed connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    Open,
    /// One server message, already split into its records.
    Batch { records: Vec<Value> },
    Closed {
        code: u16,
        reason: String,
        clean: bool,
    },
    Failed { message: String },
}

impl FeedEvent {
    /// Wrap a raw server message. Fails only if the envelope itself is unusable.
    pub fn from_message(text: &str) -> Result<Self, FeedParseError> {
        Ok(FeedEvent::Batch {
            records: split_message(text)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// Result of applying one batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub applied: usize,
    pub rejected: Vec<FeedParseError>,
    /// Devices known after the batch.
    pub device_count: usize,
}

/// What the host should do after an event.
#[derive(Debug)]
pub enum FeedOutcome {
    /// Send this text to the server.
    Send(String),
    Applied(BatchReport),
    Disconnected,
}

/// Connection bookkeeping for the device feed.
#[derive(Debug, Clone)]
pub struct FeedSession {
    settings: FeedSettings,
    state: ConnectionState,
    batches: u64,
}

impl FeedSession {
    pub fn new(settings: FeedSettings) -> Self {
        Self {
            settings,
            state: ConnectionState::Connecting,
            batches: 0,
        }
    }

    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Number of batches applied so far.
    pub fn batches(&self) -> u64 {
        self.batches
    }

    pub fn dispatch(&mut self, event: FeedEvent, store: &mut DeviceStore) -> FeedOutcome {
        match event {
            FeedEvent::Open => {
                info!("connected to feed '{}'", self.settings.url);
                self.state = ConnectionState::Open;
                FeedOutcome::Send(self.settings.greeting.clone())
            }
            FeedEvent::Batch { records } => {
                if self.state != ConnectionState::Open {
                    warn!("received a batch while the feed is {:?}", self.state);
                }
                FeedOutcome::Applied(self.apply(records, store))
            }
            FeedEvent::Closed {
                code,
                reason,
                clean,
            } => {
                if clean {
                    info!("feed closed cleanly, code={} reason={}", code, reason);
                } else {
                    warn!("feed connection died (code={})", code);
                }
                self.state = ConnectionState::Closed;
                FeedOutcome::Disconnected
            }
            FeedEvent::Failed { message } => {
                error!("feed error: {}", message);
                self.state = ConnectionState::Closed;
                FeedOutcome::Disconnected
            }
        }
    }

    fn apply(&mut self, records: Vec<Value>, store: &mut DeviceStore) -> BatchReport {
        let mut report = BatchReport::default();
        let mut accepted = Vec::new();
        for result in decode_records(records) {
            match result {
                Ok(device) => accepted.push(device),
                Err(e) => {
                    warn!("dropping feed record: {}", e);
                    report.rejected.push(e);
                }
            }
        }
        report.applied = store.apply_batch(accepted);
        report.device_count = store.len();
        self.batches += 1;
        debug!("devices counter: {}", report.device_count);
        report
    }
}
