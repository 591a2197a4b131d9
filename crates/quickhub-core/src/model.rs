// ── QuickApp domain type ──

use serde::{Deserialize, Serialize};

use quickhub_api::models::Device;

use crate::error::CoreError;

/// Capability tag that marks a device as a manageable QuickApp.
pub const MANAGED_INTERFACE: &str = "quickApp";

/// Capability tag for subordinate (child) QuickApp devices.
pub const CHILD_INTERFACE: &str = "quickAppChild";

/// One QuickApp as currently known locally.
///
/// Unlike the wire-level [`Device`], the id is guaranteed present — records
/// without one never make it past [`QuickApp::try_from`]. Children are
/// flagged on receipt and rendered read-only downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickApp {
    pub id: u64,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Unix timestamp (seconds) of the last remote modification.
    pub modified: Option<i64>,
    pub interfaces: Vec<String>,
    pub is_child: bool,
}

impl QuickApp {
    /// Whether this app carries the managed capability tag.
    pub fn is_managed(&self) -> bool {
        self.interfaces.iter().any(|i| i == MANAGED_INTERFACE)
    }

    /// Mark this record as a child device.
    pub fn as_child(mut self) -> Self {
        self.is_child = true;
        self
    }
}

impl TryFrom<Device> for QuickApp {
    type Error = CoreError;

    /// Fails with [`CoreError::InvalidRecord`] when the wire record has no
    /// id; callers skip such records rather than aborting their batch.
    fn try_from(device: Device) -> Result<Self, Self::Error> {
        let id = device.id.ok_or(CoreError::InvalidRecord)?;
        Ok(Self {
            id,
            name: device.name,
            kind: device.kind,
            modified: device.modified,
            interfaces: device.interfaces,
            is_child: false,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn device(id: Option<u64>) -> Device {
        serde_json::from_value(serde_json::json!({
            "id": id, "name": "App", "type": "com.fibaro.quickApp",
            "interfaces": ["quickApp"]
        }))
        .unwrap()
    }

    #[test]
    fn conversion_requires_id() {
        assert!(matches!(
            QuickApp::try_from(device(None)),
            Err(CoreError::InvalidRecord)
        ));
        let app = QuickApp::try_from(device(Some(7))).unwrap();
        assert_eq!(app.id, 7);
        assert!(app.is_managed());
        assert!(!app.is_child);
    }

    #[test]
    fn as_child_marks_record() {
        let app = QuickApp::try_from(device(Some(7))).unwrap().as_child();
        assert!(app.is_child);
    }
}
