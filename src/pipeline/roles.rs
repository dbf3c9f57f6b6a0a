//! Speaker role resolution.
//!
//! Maps raw diarization speaker ids to the two semantic roles of a sales
//! call. The first distinct id by chronological appearance becomes the
//! seller, the second becomes the client; any further ids keep their raw
//! label. Pure function of the assigned segments.

use crate::pipeline::types::{Segment, SpeakerSummary};

/// Build the speaker summary from the assigned segments.
///
/// First-appearance order decides the roles, not lexical order of the ids.
/// `all_speakers` is sorted for stable output. The 0- and 1-speaker cases
/// carry an explanatory note.
pub fn resolve_roles(segments: &[Segment]) -> SpeakerSummary {
    let mut by_appearance: Vec<String> = Vec::new();
    for segment in segments {
        if let Some(speaker) = segment.speaker.as_deref() {
            if !by_appearance.iter().any(|known| known == speaker) {
                by_appearance.push(speaker.to_string());
            }
        }
    }

    let mut all_speakers = by_appearance.clone();
    all_speakers.sort();

    match by_appearance.len() {
        0 => SpeakerSummary::unavailable("Спикеры не обнаружены"),
        1 => SpeakerSummary {
            seller: Some(by_appearance[0].clone()),
            client: None,
            total_speakers: Some(1),
            all_speakers,
            note: Some("Обнаружен только один спикер".to_string()),
            error: None,
        },
        count => SpeakerSummary {
            seller: Some(by_appearance[0].clone()),
            client: Some(by_appearance[1].clone()),
            total_speakers: Some(count),
            all_speakers,
            note: None,
            error: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, speaker: Option<&str>) -> Segment {
        let mut segment = Segment::new(start, start + 1.0, "x");
        segment.speaker = speaker.map(str::to_string);
        segment
    }

    #[test]
    fn zero_speakers_yields_note_without_roles() {
        let segments = vec![seg(0.0, None), seg(1.0, None)];
        let summary = resolve_roles(&segments);

        assert_eq!(summary.seller, None);
        assert_eq!(summary.client, None);
        assert_eq!(summary.total_speakers, None);
        assert!(summary.all_speakers.is_empty());
        assert!(summary.note.is_some());
    }

    #[test]
    fn single_speaker_leaves_client_null_with_note() {
        let segments = vec![seg(0.0, Some("SPEAKER_00")), seg(1.0, Some("SPEAKER_00"))];
        let summary = resolve_roles(&segments);

        assert_eq!(summary.seller.as_deref(), Some("SPEAKER_00"));
        assert_eq!(summary.client, None);
        assert_eq!(summary.total_speakers, Some(1));
        assert!(summary.note.is_some());
    }

    #[test]
    fn roles_follow_first_appearance_not_lexical_order() {
        // SPEAKER_05 speaks first even though SPEAKER_01 sorts before it.
        let segments = vec![
            seg(0.0, Some("SPEAKER_05")),
            seg(1.0, Some("SPEAKER_01")),
            seg(2.0, Some("SPEAKER_05")),
        ];
        let summary = resolve_roles(&segments);

        assert_eq!(summary.seller.as_deref(), Some("SPEAKER_05"));
        assert_eq!(summary.client.as_deref(), Some("SPEAKER_01"));
        assert_eq!(summary.total_speakers, Some(2));
        assert_eq!(summary.all_speakers, vec!["SPEAKER_01", "SPEAKER_05"]);
    }

    #[test]
    fn extra_speakers_are_counted_but_get_no_role() {
        let segments = vec![
            seg(0.0, Some("A")),
            seg(1.0, Some("B")),
            seg(2.0, Some("C")),
        ];
        let summary = resolve_roles(&segments);

        assert_eq!(summary.seller.as_deref(), Some("A"));
        assert_eq!(summary.client.as_deref(), Some("B"));
        assert_eq!(summary.total_speakers, Some(3));
        assert_eq!(summary.all_speakers, vec!["A", "B", "C"]);
    }

    #[test]
    fn unassigned_segments_are_ignored() {
        let segments = vec![seg(0.0, None), seg(1.0, Some("S1")), seg(2.0, Some("S2"))];
        let summary = resolve_roles(&segments);

        assert_eq!(summary.seller.as_deref(), Some("S1"));
        assert_eq!(summary.client.as_deref(), Some("S2"));
    }

    #[test]
    fn resolver_is_deterministic() {
        let segments = vec![seg(0.0, Some("X")), seg(1.0, Some("Y"))];
        assert_eq!(resolve_roles(&segments), resolve_roles(&segments));
    }
}
