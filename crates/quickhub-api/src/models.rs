// Wire models for the hub REST API.
//
// Deserialization is deliberately lenient: the hub's payloads vary
// between firmware versions, and a malformed entry must degrade to
// "absent" rather than failing the surrounding request.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Devices ─────────────────────────────────────────────────────────

/// A device record as the hub reports it.
///
/// Only the fields this client acts on are modeled; everything else in
/// the payload is ignored. `id` is optional at the wire level — a record
/// without one is malformed and gets skipped downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Unix timestamp (seconds) of the last modification.
    #[serde(default)]
    pub modified: Option<i64>,
    /// Capability tags; `"quickApp"` marks a manageable app.
    #[serde(default)]
    pub interfaces: Vec<String>,
}

impl Device {
    /// Whether this device carries the given capability tag.
    pub fn has_interface(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|i| i == interface)
    }
}

// ── Refresh-states (long poll) ──────────────────────────────────────

/// One long-poll response from `/api/refreshStates`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshStates {
    /// Sequence number of the newest event in this response.
    #[serde(default)]
    pub last: Option<u64>,
    /// Events since the requested cursor. A missing or non-array
    /// `events` field decodes as empty.
    #[serde(default, deserialize_with = "events_or_empty")]
    pub events: Vec<RemoteEvent>,
}

/// One event from the hub's refresh-states stream.
///
/// The event vocabulary is open-ended; classification happens downstream
/// against an allow-list, so `type` stays a plain string here.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEvent {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RemoteEvent {
    /// The device this event refers to: `data.id` preferred, top-level
    /// `id` as fallback. `None` means the event is unusable.
    pub fn device_id(&self) -> Option<u64> {
        self.data
            .as_ref()
            .and_then(|d| d.get("id"))
            .and_then(Value::as_u64)
            .or(self.id)
    }
}

/// Decode `events` leniently: non-array values become an empty list and
/// individually malformed elements are dropped, never the whole batch.
fn events_or_empty<'de, D>(deserializer: D) -> Result<Vec<RemoteEvent>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

// ── QuickApp files ──────────────────────────────────────────────────

/// An entry in a QuickApp's file listing.
///
/// Older firmware returns bare name strings; newer firmware returns
/// objects with metadata. Both shapes decode.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FileEntry {
    Name(String),
    Meta(FileMeta),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub name: String,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl FileEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Meta(meta) => &meta.name,
        }
    }

    pub fn is_main(&self) -> bool {
        match self {
            Self::Name(_) => false,
            Self::Meta(meta) => meta.is_main,
        }
    }
}

/// Full content of one QuickApp file, as fetched or pushed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAppFile {
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl QuickAppFile {
    /// A new non-main Lua file with the given name and content.
    pub fn lua(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            is_main: false,
            kind: Some("lua".into()),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
