//! Merging consecutive same-speaker segments into utterances.
//!
//! Single forward pass over the chronologically ordered segments. Adjacency
//! is decided by speaker identity only; a long silence between two segments
//! of the same speaker still merges. Segments whose trimmed text is empty
//! are skipped entirely and neither break nor extend a run.

use crate::pipeline::types::{Segment, Utterance};

/// Fold consecutive segments sharing a speaker into single utterances.
///
/// Each utterance's text is the trimmed fragment texts joined by single
/// spaces; its time span covers the first segment's start through the last
/// segment's end. The concatenation of all output texts equals the
/// concatenation of all non-empty input texts, in order.
pub fn merge_segments(segments: &[Segment]) -> Vec<Utterance> {
    let mut utterances = Vec::new();
    let mut current: Option<Utterance> = None;

    for segment in segments {
        let text = segment.text.trim();
        if text.is_empty() {
            continue;
        }

        match current.as_mut() {
            Some(utterance) if utterance.speaker == segment.speaker => {
                utterance.text.push(' ');
                utterance.text.push_str(text);
                utterance.end = segment.end;
            }
            _ => {
                if let Some(done) = current.take() {
                    utterances.push(done);
                }
                current = Some(Utterance {
                    speaker: segment.speaker.clone(),
                    text: text.to_string(),
                    start: segment.start,
                    end: segment.end,
                });
            }
        }
    }

    if let Some(done) = current {
        utterances.push(done);
    }

    utterances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, text: &str, speaker: &str) -> Segment {
        Segment::new(start, end, text).with_speaker(speaker)
    }

    #[test]
    fn merges_consecutive_same_speaker_segments() {
        let segments = vec![
            seg(0.0, 1.0, "Hello", "S1"),
            seg(1.0, 2.0, " there", "S1"),
            seg(2.0, 3.0, "Hi", "S2"),
        ];

        let utterances = merge_segments(&segments);
        assert_eq!(utterances.len(), 2);
        assert_eq!(utterances[0].speaker.as_deref(), Some("S1"));
        assert_eq!(utterances[0].text, "Hello there");
        assert_eq!(utterances[0].start, 0.0);
        assert_eq!(utterances[0].end, 2.0);
        assert_eq!(utterances[1].speaker.as_deref(), Some("S2"));
        assert_eq!(utterances[1].text, "Hi");
        assert_eq!(utterances[1].start, 2.0);
        assert_eq!(utterances[1].end, 3.0);
    }

    #[test]
    fn empty_segments_do_not_break_a_run() {
        let segments = vec![
            seg(0.0, 1.0, "раз", "S1"),
            seg(1.0, 1.2, "   ", "S2"),
            seg(1.2, 2.0, "два", "S1"),
        ];

        let utterances = merge_segments(&segments);
        assert_eq!(utterances.len(), 1);
        assert_eq!(utterances[0].text, "раз два");
        assert_eq!(utterances[0].end, 2.0);
    }

    #[test]
    fn long_gap_between_same_speaker_still_merges() {
        let segments = vec![seg(0.0, 1.0, "до паузы", "S1"), seg(60.0, 61.0, "после", "S1")];

        let utterances = merge_segments(&segments);
        assert_eq!(utterances.len(), 1);
        assert_eq!(utterances[0].text, "до паузы после");
        assert_eq!(utterances[0].start, 0.0);
        assert_eq!(utterances[0].end, 61.0);
    }

    #[test]
    fn unassigned_segments_merge_together() {
        let segments = vec![
            Segment::new(0.0, 1.0, "один"),
            Segment::new(1.0, 2.0, "два"),
            seg(2.0, 3.0, "три", "S1"),
        ];

        let utterances = merge_segments(&segments);
        assert_eq!(utterances.len(), 2);
        assert_eq!(utterances[0].speaker, None);
        assert_eq!(utterances[0].text, "один два");
    }

    #[test]
    fn no_text_is_dropped_or_duplicated() {
        let segments = vec![
            seg(0.0, 1.0, "a", "S1"),
            seg(1.0, 2.0, "", "S1"),
            seg(2.0, 3.0, "b", "S2"),
            seg(3.0, 4.0, "c", "S2"),
            seg(4.0, 5.0, "d", "S1"),
        ];

        let utterances = merge_segments(&segments);
        let merged: String = utterances
            .iter()
            .flat_map(|u| u.text.split_whitespace())
            .collect();
        let original: String = segments
            .iter()
            .flat_map(|s| s.text.split_whitespace())
            .collect();
        assert_eq!(merged, original);
    }

    #[test]
    fn merging_is_idempotent() {
        let segments = vec![
            seg(0.0, 1.0, "раз", "S1"),
            seg(1.0, 2.0, "два", "S1"),
            seg(2.0, 3.0, "три", "S2"),
            seg(3.0, 4.0, "четыре", "S1"),
        ];

        let once = merge_segments(&segments);
        let as_segments: Vec<Segment> = once
            .iter()
            .map(|u| {
                let mut segment = Segment::new(u.start, u.end, u.text.clone());
                segment.speaker = u.speaker.clone();
                segment
            })
            .collect();
        let twice = merge_segments(&as_segments);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_yields_no_utterances() {
        assert!(merge_segments(&[]).is_empty());
    }
}
