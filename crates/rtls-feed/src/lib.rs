//! # RTLS Feed
//!
//! Consumer side of the device feed: decoding server messages into device
//! records, and reconciling connection events into the device store. Each
//! record is validated on its own, so one malformed entry never costs the
//! rest of its batch.

pub mod error;
pub mod protocol;
pub mod session;
pub mod settings;

pub use error::FeedParseError;
pub use protocol::{decode_record, decode_records, encode_batch, split_message, DeviceRecord};
pub use session::{BatchReport, ConnectionState, FeedEvent, FeedOutcome, FeedSession};
pub use settings::FeedSettings;
