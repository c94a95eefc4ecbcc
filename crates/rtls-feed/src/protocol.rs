//! Wire format of the device feed.
//!
//! Each server message is a JSON array of device descriptions:
//!
//! ```json
//! [{"id": 3, "timestamp": 120, "pos": {"coords": [10.5, -4.0, 0.0], "timestamp": 118}}]
//! ```
//!
//! Only `id` and the first two coordinates are required. Extra coordinates
//! (the server tracks a Z axis) and unknown fields are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use rtls_core::{Device, DeviceId, RealVec, Timestamp};

use crate::error::FeedParseError;

/// One device description as sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: DeviceId,
    pub pos: Trace,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

/// A position sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub coords: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

impl DeviceRecord {
    pub fn from_device(device: &Device) -> Self {
        Self {
            id: device.id,
            pos: Trace {
                coords: vec![device.position.x, device.position.y],
                timestamp: None,
            },
            timestamp: device.timestamp,
        }
    }

    fn into_device(self, index: usize) -> Result<Device, FeedParseError> {
        match self.pos.coords.as_slice() {
            [x, y, ..] => Ok(Device {
                id: self.id,
                position: RealVec::new(*x, *y),
                timestamp: self.timestamp.or(self.pos.timestamp),
            }),
            other => Err(FeedParseError::MissingCoordinates {
                index,
                id: self.id,
                found: other.len(),
            }),
        }
    }
}

/// Split a raw message into its records without validating them.
pub fn split_message(text: &str) -> Result<Vec<Value>, FeedParseError> {
    let value: Value = serde_json::from_str(text)?;
    split_value(value)
}

/// Same as [`split_message`] for an already parsed JSON value.
pub fn split_value(value: Value) -> Result<Vec<Value>, FeedParseError> {
    match value {
        Value::Array(records) => Ok(records),
        other => Err(FeedParseError::NotABatch {
            found: json_kind(&other),
        }),
    }
}

/// Decode one record; `index` is its position in the batch, for error reporting.
pub fn decode_record(index: usize, value: Value) -> Result<Device, FeedParseError> {
    let record: DeviceRecord = serde_json::from_value(value)
        .map_err(|source| FeedParseError::InvalidRecord { index, source })?;
    record.into_device(index)
}

/// Decode every record of a batch independently.
pub fn decode_records(records: Vec<Value>) -> Vec<Result<Device, FeedParseError>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, value)| decode_record(index, value))
        .collect()
}

/// Encode devices as a server message.
pub fn encode_batch(devices: &[Device]) -> Result<String, serde_json::Error> {
    let records: Vec<DeviceRecord> = devices.iter().map(DeviceRecord::from_device).collect();
    serde_json::to_string(&records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_server_record() {
        let value = json!({
            "id": 7,
            "timestamp": 120,
            "pos": {"coords": [10.5, -4.0, 1.0], "timestamp": 118}
        });
        let device = decode_record(0, value).unwrap();
        assert_eq!(device.id, 7);
        assert_eq!(device.position, RealVec::new(10.5, -4.0));
        assert_eq!(device.timestamp, Some(120));
    }

    #[test]
    fn test_position_timestamp_fallback() {
        let value = json!({"id": 1, "pos": {"coords": [0, 0], "timestamp": 5}});
        assert_eq!(decode_record(0, value).unwrap().timestamp, Some(5));
    }

    #[test]
    fn test_missing_fields_rejected() {
        let no_id = json!({"pos": {"coords": [1.0, 2.0]}});
        assert!(matches!(
            decode_record(3, no_id),
            Err(FeedParseError::InvalidRecord { index: 3, .. })
        ));

        let no_pos = json!({"id": 2});
        assert!(matches!(
            decode_record(0, no_pos),
            Err(FeedParseError::InvalidRecord { .. })
        ));

        let short = json!({"id": 2, "pos": {"coords": [1.0]}});
        assert!(matches!(
            decode_record(1, short),
            Err(FeedParseError::MissingCoordinates { index: 1, id: 2, found: 1 })
        ));
    }

    #[test]
    fn test_split_rejects_non_arrays() {
        assert!(matches!(split_message("not json"), Err(FeedParseError::Json(_))));
        assert!(matches!(
            split_message(r#"{"id": 1}"#),
            Err(FeedParseError::NotABatch { found: "an object" })
        ));
        assert_eq!(split_message("[]").unwrap().len(), 0);
    }

    #[test]
    fn test_decode_records_keeps_good_ones() {
        let records = split_message(
            r#"[{"id": 1, "pos": {"coords": [1, 2]}}, {"id": "x"}, {"id": 3, "pos": {"coords": [5, 6, 7]}}]"#,
        )
        .unwrap();
        let decoded = decode_records(records);
        assert_eq!(decoded.len(), 3);
        assert!(decoded[0].is_ok());
        assert!(decoded[1].is_err());
        assert_eq!(decoded[2].as_ref().unwrap().id, 3);
    }

    #[test]
    fn test_encode_matches_wire_shape() {
        let text = encode_batch(&[Device::new(4, RealVec::new(1.5, -2.0))]).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["id"], 4);
        assert_eq!(value[0]["pos"]["coords"], json!([1.5, -2.0]));
        let back = decode_records(split_message(&text).unwrap());
        assert_eq!(back[0].as_ref().unwrap().position, RealVec::new(1.5, -2.0));
    }
}
