//! Translates server message records into transcript entries
//!
//! The authoritative log uses a heterogeneous, discriminated schema; the
//! transcript is uniform (speaker, message). Translation is total over the
//! discriminant and side-effect-free: every record yields exactly one entry,
//! including records with tags this client has never seen.

use taleweave_domain::value_objects::transcript::{speakers, TranscriptEntry};
use taleweave_shared::{GameMessage, MessageKind};

/// Marker prefixed onto narrated server-side failures.
const ERROR_MARKER: &str = "[Error] ";

/// Map one log record to its transcript entry.
pub fn translate_message(message: &GameMessage) -> TranscriptEntry {
    match message.message_type_name {
        MessageKind::UserInput => TranscriptEntry::player(&message.content),
        MessageKind::NpcDialogue => {
            let speaker = message
                .related_entity_name
                .as_deref()
                .unwrap_or(speakers::UNKNOWN_NPC);
            TranscriptEntry::new(speaker, &message.content)
        }
        MessageKind::SystemAction | MessageKind::SensoryFeedback | MessageKind::SystemInfo => {
            TranscriptEntry::system(&message.content)
        }
        MessageKind::ErrorMessage => {
            TranscriptEntry::system(format!("{ERROR_MARKER}{}", message.content))
        }
        // Fail open: an unrecognized tag still surfaces its content.
        MessageKind::Unknown => TranscriptEntry::system(&message.content),
    }
}

/// Map a fetched history page to transcript entries, preserving order.
pub fn translate_history(messages: &[GameMessage]) -> Vec<TranscriptEntry> {
    messages.iter().map(translate_message).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(kind: MessageKind, content: &str) -> GameMessage {
        GameMessage {
            id: 1,
            user_id: 1,
            story_id: 1,
            session_id: "default".into(),
            message_type: 0,
            message_type_name: kind,
            sub_type: None,
            content: content.into(),
            structured_data: None,
            related_entity: None,
            related_entity_name: None,
            location: None,
            location_name: None,
            game_time: None,
            message_metadata: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn user_input_speaks_as_player() {
        let entry = translate_message(&message(MessageKind::UserInput, "look around"));
        assert_eq!(entry, TranscriptEntry::player("look around"));
    }

    #[test]
    fn npc_dialogue_speaks_as_the_named_entity() {
        let mut msg = message(MessageKind::NpcDialogue, "hi back");
        msg.related_entity_name = Some("Alice".into());

        let entry = translate_message(&msg);
        assert_eq!(entry, TranscriptEntry::new("Alice", "hi back"));
    }

    #[test]
    fn npc_dialogue_without_entity_name_falls_back() {
        let entry = translate_message(&message(MessageKind::NpcDialogue, "hi back"));
        assert_eq!(entry.speaker, "NPC");
    }

    #[test]
    fn system_kinds_speak_as_system() {
        for kind in [
            MessageKind::SystemAction,
            MessageKind::SensoryFeedback,
            MessageKind::SystemInfo,
        ] {
            let entry = translate_message(&message(kind, "something happens"));
            assert_eq!(entry, TranscriptEntry::system("something happens"));
        }
    }

    #[test]
    fn error_messages_carry_the_marker() {
        let entry = translate_message(&message(MessageKind::ErrorMessage, "the world broke"));
        assert_eq!(entry, TranscriptEntry::system("[Error] the world broke"));
    }

    #[test]
    fn unknown_kinds_fail_open_to_system() {
        let entry = translate_message(&message(MessageKind::Unknown, "???"));
        assert_eq!(entry, TranscriptEntry::system("???"));
    }

    #[test]
    fn history_translation_preserves_order_and_count() {
        let messages = vec![
            message(MessageKind::UserInput, "first"),
            message(MessageKind::SystemInfo, "second"),
            message(MessageKind::Unknown, "third"),
        ];

        let entries = translate_history(&messages);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[2].message, "third");
    }
}
