use serde::{Deserialize, Serialize};
use serde_json::json;

/// Parsed body of a successful or rejected login call.
///
/// The vendor signals logical success through `logged_id`; a transport-level
/// 200 with `logged_id != 1` means the credentials were rejected and `error`
/// carries the human-readable reason.
#[derive(Debug, Deserialize, Clone)]
pub struct LoginResponse {
    pub logged_id: i64,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub account_hash: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// One device's full last-known state, as returned by the device-listing
/// and single-device endpoints.
#[derive(Debug, Deserialize, Clone)]
pub struct DeviceSnapshot {
    pub hub: Hub,
}

/// The vendor's server-side record for a single diffuser.
#[derive(Debug, Deserialize, Clone)]
pub struct Hub {
    /// Opaque per-device identifier used in fetch and update paths.
    pub hash: String,
    /// Device lot number.
    pub hublot: String,
    /// 1 while the device is connected to the cloud.
    pub status: i64,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub sensors: Sensors,
}

/// Writable device settings, reported back as strings.
///
/// All fields are optional: an unsupported device variant or a stale
/// snapshot may omit any of them, and the derived views on
/// [`Diffuser`](crate::Diffuser) surface the absence as an error instead of
/// inventing a default.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Attributes {
    /// Fan control; `"1"` when the diffuser is on.
    #[serde(default)]
    pub fanc: Option<String>,
    /// Fragrance intensity, `"1"` to `"3"`.
    #[serde(default)]
    pub speedc: Option<String>,
    /// Room-size calibration code, `"1"` to `"4"`.
    #[serde(default)]
    pub roomc: Option<String>,
    /// User-assigned room name.
    #[serde(default)]
    pub roomnamec: Option<String>,
}

/// Read-only telemetry block embedded in a hub snapshot.
///
/// Mains-powered units ship without `battc`; the other entries can be
/// missing on older firmware.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Sensors {
    #[serde(default)]
    pub battc: Option<Sensor>,
    #[serde(default)]
    pub wific: Option<Sensor>,
    #[serde(default)]
    pub rfidc: Option<Sensor>,
    #[serde(default)]
    pub fillc: Option<Sensor>,
    /// Firmware version, reported as a bare string.
    #[serde(default)]
    pub versionc: Option<String>,
}

/// A single sensor entry. The vendor exposes most readings only as a
/// display title plus an icon filename rather than a raw value.
#[derive(Debug, Deserialize, Clone)]
pub struct Sensor {
    pub id: i64,
    pub title: String,
    pub icon: String,
}

/// Partial settings change for the shared update endpoint.
///
/// Serializes to `{"attr":{...}}`, which goes out url-encoded in the `json`
/// form field next to the device hash.
#[derive(Debug, Serialize)]
pub struct AttributePatch {
    attr: serde_json::Value,
}

impl AttributePatch {
    pub fn power_on() -> Self {
        // fanc is a string attribute on the wire, unlike the numeric codes.
        Self {
            attr: json!({ "fanc": "1" }),
        }
    }

    pub fn power_off() -> Self {
        Self {
            attr: json!({ "fanc": "0" }),
        }
    }

    pub fn perfume_amount(amount: u8) -> Self {
        Self {
            attr: json!({ "speedc": amount }),
        }
    }

    pub fn room_size(size: u8) -> Self {
        Self {
            attr: json!({ "roomc": size }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_patch_power_serialization() {
        let on = serde_json::to_string(&AttributePatch::power_on()).unwrap();
        assert_eq!(on, r#"{"attr":{"fanc":"1"}}"#);

        let off = serde_json::to_string(&AttributePatch::power_off()).unwrap();
        assert_eq!(off, r#"{"attr":{"fanc":"0"}}"#);
    }

    #[test]
    fn test_attribute_patch_numeric_serialization() {
        // speedc and roomc are sent as bare numbers, not strings.
        let amount = serde_json::to_string(&AttributePatch::perfume_amount(2)).unwrap();
        assert_eq!(amount, r#"{"attr":{"speedc":2}}"#);

        let size = serde_json::to_string(&AttributePatch::room_size(4)).unwrap();
        assert_eq!(size, r#"{"attr":{"roomc":4}}"#);
    }

    #[test]
    fn test_login_response_parsing() {
        let json = r#"{"logged_id":1,"account_hash":"abc123","email":"user@example.com"}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.logged_id, 1);
        assert_eq!(response.account_hash, Some("abc123".to_string()));
        assert_eq!(response.email, Some("user@example.com".to_string()));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_login_response_rejection_parsing() {
        // A rejected login carries neither hash nor canonical email.
        let json = r#"{"logged_id":0,"error":"Login or password incorrect"}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.logged_id, 0);
        assert_eq!(response.error, Some("Login or password incorrect".to_string()));
        assert!(response.account_hash.is_none());
        assert!(response.email.is_none());
    }

    #[test]
    fn test_snapshot_parsing_without_battery() {
        let json = r#"{
            "hub": {
                "hash": "a1b2c3",
                "hublot": "LOT-2021-001",
                "status": 1,
                "attributes": { "fanc": "1" },
                "sensors": { "wific": { "id": 7, "title": "Strong", "icon": "icon-signal.png" } }
            }
        }"#;
        let snapshot: DeviceSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.hub.sensors.battc.is_none());
        assert!(snapshot.hub.sensors.wific.is_some());
        assert_eq!(snapshot.hub.attributes.fanc.as_deref(), Some("1"));
    }
}
