use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One previously stored output row. Only the store creates these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_nullable_text")]
    pub content: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Reachable,
    Unreachable,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Unknown => "unknown",
            ConnectionStatus::Reachable => "reachable",
            ConnectionStatus::Unreachable => "unreachable",
        }
    }

    /// Text shown in the connection modal; `None` means no modal.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            ConnectionStatus::Unknown => None,
            ConnectionStatus::Reachable => Some("Connected to the data store."),
            ConnectionStatus::Unreachable => Some("Could not connect to the data store."),
        }
    }
}

/// Whether the question draft currently holds submittable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    Empty,
    NonEmpty,
}

impl DraftState {
    pub fn of(draft: &str) -> Self {
        if draft.trim().is_empty() {
            DraftState::Empty
        } else {
            DraftState::NonEmpty
        }
    }
}

/// Accepts RFC 3339 timestamps and offset-less ISO-8601 ones (read as UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Ok(ts.with_timezone(&Utc)),
        Err(err) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| err),
    }
}

/// Nullable text columns render as blank.
fn deserialize_nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn decodes_store_row() {
        let row = json!({ "id": 2, "content": "B", "created_at": "2024-01-02T00:00:00Z" });
        let record: OutputRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.id, 2);
        assert_eq!(record.content, "B");
        assert_eq!(record.created_at, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn null_or_missing_content_is_blank() {
        let row = json!({ "id": 3, "content": null, "created_at": "2024-01-02T00:00:00Z" });
        let record: OutputRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.content, "");

        let row = json!({ "id": 4, "created_at": "2024-01-02T00:00:00Z" });
        let record: OutputRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.content, "");
    }

    #[test]
    fn offset_timestamps_are_normalized() {
        let ts = parse_timestamp("2024-01-02T02:30:00.123456+02:00").unwrap();
        assert_eq!(ts.format("%Y-%m-%dT%H:%M:%S").to_string(), "2024-01-02T00:30:00");
    }

    #[test]
    fn naive_timestamps_read_as_utc() {
        let ts = parse_timestamp("2024-01-02T00:00:00.5").unwrap();
        assert_eq!(ts.timestamp(), 1_704_153_600);
    }

    #[test]
    fn rejects_garbage_timestamp() {
        let row = json!({ "id": 1, "content": "A", "created_at": "yesterday" });
        assert!(serde_json::from_value::<OutputRecord>(row).is_err());
    }

    #[test]
    fn notice_only_for_known_status() {
        assert_eq!(ConnectionStatus::Unknown.notice(), None);
        assert!(ConnectionStatus::Reachable.notice().unwrap().starts_with("Connected"));
        assert!(ConnectionStatus::Unreachable.notice().unwrap().starts_with("Could not"));
    }

    #[test]
    fn draft_state_uses_trimmed_text() {
        assert_eq!(DraftState::of("   "), DraftState::Empty);
        assert_eq!(DraftState::of(""), DraftState::Empty);
        assert_eq!(DraftState::of(" hi "), DraftState::NonEmpty);
    }
}
