// Notification records. Outbound notifications have a fixed shape that
// mirrors the backend's wire format (hence the French `titre`); inbound
// payloads are kept as raw JSON because the backend enforces no schema.

use chrono::Local;
use serde::Serialize;
use serde_json::Value;

/// Rendered in place of any field a payload does not carry.
pub const PLACEHOLDER: &str = "N/A";

/// An outbound notification as emitted over the websocket channel.
/// Field names mirror the backend expectations.
#[derive(Serialize, Debug, Clone)]
pub struct Outbound {
    pub titre: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: String,
}

impl Outbound {
    /// Build a record stamped with the current local time.
    pub fn new(titre: &str, message: &str, kind: &str) -> Self {
        Outbound {
            titre: titre.to_string(),
            message: message.to_string(),
            kind: kind.to_string(),
            timestamp: Local::now().to_rfc3339(),
        }
    }
}

/// Look up a string field in an inbound payload, falling back to the
/// placeholder when the field is absent or not a string.
pub fn field_or_na<'a>(payload: &'a Value, field: &str) -> &'a str {
    payload.get(field).and_then(Value::as_str).unwrap_or(PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outbound_serializes_wire_field_names() {
        let value = serde_json::to_value(Outbound::new("Bienvenue", "Vous êtes connecté!", "welcome"))
            .unwrap();
        assert_eq!(value["titre"], "Bienvenue");
        assert_eq!(value["message"], "Vous êtes connecté!");
        assert_eq!(value["type"], "welcome");
        assert!(value["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn missing_fields_render_placeholder() {
        let payload = json!({ "titre": "X" });
        assert_eq!(field_or_na(&payload, "titre"), "X");
        assert_eq!(field_or_na(&payload, "message"), PLACEHOLDER);
        assert_eq!(field_or_na(&payload, "type"), PLACEHOLDER);
    }

    #[test]
    fn non_string_fields_render_placeholder() {
        let payload = json!({ "titre": 7, "message": null });
        assert_eq!(field_or_na(&payload, "titre"), PLACEHOLDER);
        assert_eq!(field_or_na(&payload, "message"), PLACEHOLDER);
    }
}
