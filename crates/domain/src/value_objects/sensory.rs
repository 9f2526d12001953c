//! Sensory payload detection inside free-text messages
//!
//! Some system messages embed a JSON object describing the scene through the
//! senses, e.g. `{"vision": "a dim room", "hearing": "silence"}`. The
//! detector is a best-effort classifier used to pick a rendering mode; it is
//! never a validation gate, so every failure path yields `None`.

use serde::{Deserialize, Serialize};

/// Structured sensory description extracted from a message.
///
/// Missing senses default to the empty string so callers can render the
/// present ones without re-checking the source JSON.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensoryPayload {
    #[serde(default)]
    pub vision: String,
    #[serde(default)]
    pub hearing: String,
    #[serde(default)]
    pub smell: String,
    #[serde(default)]
    pub touch: String,
}

impl SensoryPayload {
    /// True when at least one sense carries text.
    pub fn has_any(&self) -> bool {
        !self.vision.is_empty()
            || !self.hearing.is_empty()
            || !self.smell.is_empty()
            || !self.touch.is_empty()
    }
}

/// Attempt to extract a sensory payload from a transcript message.
///
/// The probe takes the span from the first `{` to the last `}` (messages may
/// carry narration before or after the object), parses it as JSON, and
/// accepts it only when at least one of the four recognized keys is present
/// with a string value. Anything else - no brace span, malformed JSON, an
/// object with none of the keys - is not an error, just "no payload".
///
/// Idempotent: equal input always yields an equal result.
pub fn parse_sensory_payload(message: &str) -> Option<SensoryPayload> {
    let start = message.find('{')?;
    let end = message.rfind('}')?;
    if end < start {
        return None;
    }

    let value: serde_json::Value = serde_json::from_str(&message[start..=end]).ok()?;
    let object = value.as_object()?;

    let sense = |key: &str| -> String {
        object
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    let payload = SensoryPayload {
        vision: sense("vision"),
        hearing: sense("hearing"),
        smell: sense("smell"),
        touch: sense("touch"),
    };

    payload.has_any().then_some(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_payload() {
        let msg = r#"{"vision":"a dim room","hearing":"silence"}"#;
        let payload = parse_sensory_payload(msg).expect("payload");

        assert_eq!(payload.vision, "a dim room");
        assert_eq!(payload.hearing, "silence");
        assert_eq!(payload.smell, "");
        assert_eq!(payload.touch, "");
    }

    #[test]
    fn plain_narration_is_not_a_payload() {
        assert_eq!(parse_sensory_payload("You walk north."), None);
    }

    #[test]
    fn payload_embedded_in_narration_is_found() {
        let msg = r#"You enter. {"smell":"wet stone"} The door shuts."#;
        let payload = parse_sensory_payload(msg).expect("payload");
        assert_eq!(payload.smell, "wet stone");
    }

    #[test]
    fn malformed_json_is_skipped() {
        assert_eq!(parse_sensory_payload(r#"{"vision": "unterminated"#), None);
        assert_eq!(parse_sensory_payload("}{"), None);
    }

    #[test]
    fn object_without_recognized_keys_is_skipped() {
        assert_eq!(parse_sensory_payload(r#"{"mood":"tense"}"#), None);
    }

    #[test]
    fn non_string_sense_values_are_ignored() {
        assert_eq!(parse_sensory_payload(r#"{"vision": 3}"#), None);
    }

    #[test]
    fn idempotent_over_repeated_calls() {
        let msg = r#"{"touch":"cold iron"}"#;
        let first = parse_sensory_payload(msg);
        let second = parse_sensory_payload(msg);
        assert_eq!(first, second);
    }
}
