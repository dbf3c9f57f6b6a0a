//! Dialogue rendering.
//!
//! Turns merged utterances into the human-readable transcript shipped in the
//! `dialogue` field: one `<Роль>: <текст>` line per utterance, blank line
//! between utterances.

use crate::defaults;
use crate::pipeline::types::{SpeakerSummary, Utterance};

/// Display label for a raw speaker id under the resolved roles.
///
/// Seller and client ids get their role names, other assigned ids render as
/// "Спикер <id>", unassigned as "Неизвестный".
pub fn display_label(speaker: Option<&str>, summary: &SpeakerSummary) -> String {
    match speaker {
        Some(id) if summary.seller.as_deref() == Some(id) => defaults::SELLER_LABEL.to_string(),
        Some(id) if summary.client.as_deref() == Some(id) => defaults::CLIENT_LABEL.to_string(),
        Some(id) => format!("{} {}", defaults::SPEAKER_LABEL_PREFIX, id),
        None => defaults::UNKNOWN_LABEL.to_string(),
    }
}

/// Render the role-prefixed dialogue text.
pub fn format_dialogue(utterances: &[Utterance], summary: &SpeakerSummary) -> String {
    utterances
        .iter()
        .map(|utterance| {
            format!(
                "{}: {}",
                display_label(utterance.speaker.as_deref(), summary),
                utterance.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
