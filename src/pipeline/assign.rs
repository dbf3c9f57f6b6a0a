//! Speaker assignment by maximal temporal overlap.
//!
//! Each segment (or each word, when word-level alignment is available) is
//! matched against the diarization intervals and tagged with the speaker of
//! the interval it overlaps the most. Assignment never fails: an empty or
//! useless interval set simply leaves every segment unassigned, and the
//! orchestrator reports that as a diarization miss rather than a per-segment
//! error.

use crate::pipeline::types::{Segment, SpeakerInterval};
use std::collections::HashMap;

/// Assign a speaker id to every segment that overlaps a diarization interval.
///
/// When a segment carries word-level alignments, each word is assigned
/// individually and the segment takes the majority vote among its words.
/// Without word data the segment's own bounds are matched directly.
/// Segments with zero overlap against all intervals keep `speaker = None`.
pub fn assign_speakers(segments: &mut [Segment], intervals: &[SpeakerInterval]) {
    if intervals.is_empty() {
        return;
    }

    for segment in segments.iter_mut() {
        if segment.words.is_empty() {
            segment.speaker =
                dominant_interval(segment.start, segment.end, intervals).map(str::to_string);
            continue;
        }

        for word in segment.words.iter_mut() {
            word.speaker = dominant_interval(word.start, word.end, intervals).map(str::to_string);
        }
        segment.speaker = majority_speaker(segment);
    }
}

/// The speaker of the interval with the greatest overlap against `[start, end]`.
///
/// Overlap is `min(ends) - max(starts)` clamped at zero. Exact ties go to the
/// earliest-starting interval. Returns `None` when nothing overlaps.
fn dominant_interval<'a>(start: f64, end: f64, intervals: &'a [SpeakerInterval]) -> Option<&'a str> {
    let mut best: Option<&SpeakerInterval> = None;
    let mut best_overlap = 0.0f64;

    for interval in intervals {
        let overlap = (end.min(interval.end) - start.max(interval.start)).max(0.0);
        if overlap <= 0.0 {
            continue;
        }
        let wins = match best {
            None => true,
            Some(current) => {
                overlap > best_overlap || (overlap == best_overlap && interval.start < current.start)
            }
        };
        if wins {
            best = Some(interval);
            best_overlap = overlap;
        }
    }

    best.map(|interval| interval.speaker.as_str())
}

/// Majority vote over the segment's word-level speakers.
///
/// Ties go to the speaker whose first word occurs earliest in the segment.
/// Words that stayed unassigned do not vote.
fn majority_speaker(segment: &Segment) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (index, word) in segment.words.iter().enumerate() {
        if let Some(speaker) = word.speaker.as_deref() {
            let entry = counts.entry(speaker).or_insert((0, index));
            entry.0 += 1;
        }
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(speaker, _)| speaker.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::WordSpan;

    fn word(start: f64, end: f64, text: &str) -> WordSpan {
        WordSpan {
            start,
            end,
            word: text.to_string(),
            speaker: None,
        }
    }

    #[test]
    fn assigns_by_greatest_overlap() {
        let mut segments = vec![Segment::new(0.0, 2.0, "привет")];
        let intervals = vec![
            SpeakerInterval::new(0.0, 0.5, "SPEAKER_00"),
            SpeakerInterval::new(0.5, 2.0, "SPEAKER_01"),
        ];

        assign_speakers(&mut segments, &intervals);
        assert_eq!(segments[0].speaker.as_deref(), Some("SPEAKER_01"));
    }

    #[test]
    fn exact_tie_goes_to_earliest_interval() {
        let mut segments = vec![Segment::new(1.0, 3.0, "ровно пополам")];
        let intervals = vec![
            SpeakerInterval::new(2.0, 4.0, "SPEAKER_01"),
            SpeakerInterval::new(0.0, 2.0, "SPEAKER_00"),
        ];

        assign_speakers(&mut segments, &intervals);
        assert_eq!(segments[0].speaker.as_deref(), Some("SPEAKER_00"));
    }

    #[test]
    fn zero_overlap_leaves_speaker_unset() {
        let mut segments = vec![Segment::new(10.0, 11.0, "в тишине")];
        let intervals = vec![SpeakerInterval::new(0.0, 2.0, "SPEAKER_00")];

        assign_speakers(&mut segments, &intervals);
        assert_eq!(segments[0].speaker, None);
    }

    #[test]
    fn empty_interval_set_assigns_nothing() {
        let mut segments = vec![
            Segment::new(0.0, 1.0, "a"),
            Segment::new(1.0, 2.0, "b"),
        ];

        assign_speakers(&mut segments, &[]);
        assert!(segments.iter().all(|s| s.speaker.is_none()));
    }

    #[test]
    fn word_level_majority_vote_wins_over_segment_bounds() {
        // Segment bounds overlap SPEAKER_00 more, but two of three words
        // belong to SPEAKER_01.
        let mut segment = Segment::new(0.0, 3.0, "раз два три");
        segment.words = vec![
            word(0.0, 0.4, "раз"),
            word(1.6, 2.2, "два"),
            word(2.2, 2.9, "три"),
        ];
        let mut segments = vec![segment];
        let intervals = vec![
            SpeakerInterval::new(0.0, 1.5, "SPEAKER_00"),
            SpeakerInterval::new(1.5, 3.0, "SPEAKER_01"),
        ];

        assign_speakers(&mut segments, &intervals);
        assert_eq!(segments[0].speaker.as_deref(), Some("SPEAKER_01"));
        assert_eq!(segments[0].words[0].speaker.as_deref(), Some("SPEAKER_00"));
        assert_eq!(segments[0].words[1].speaker.as_deref(), Some("SPEAKER_01"));
    }

    #[test]
    fn vote_tie_goes_to_earliest_word() {
        let mut segment = Segment::new(0.0, 2.0, "раз два");
        segment.words = vec![word(0.0, 0.5, "раз"), word(1.2, 1.8, "два")];
        let mut segments = vec![segment];
        let intervals = vec![
            SpeakerInterval::new(0.0, 1.0, "SPEAKER_00"),
            SpeakerInterval::new(1.0, 2.0, "SPEAKER_01"),
        ];

        assign_speakers(&mut segments, &intervals);
        assert_eq!(segments[0].speaker.as_deref(), Some("SPEAKER_00"));
    }

    #[test]
    fn unassigned_words_do_not_vote() {
        let mut segment = Segment::new(0.0, 10.0, "слова в тишине");
        segment.words = vec![
            word(0.0, 0.5, "слова"),
            word(6.0, 6.5, "в"),
            word(7.0, 7.5, "тишине"),
        ];
        let mut segments = vec![segment];
        // Only the first word overlaps anything.
        let intervals = vec![SpeakerInterval::new(0.0, 1.0, "SPEAKER_00")];

        assign_speakers(&mut segments, &intervals);
        assert_eq!(segments[0].speaker.as_deref(), Some("SPEAKER_00"));
        assert_eq!(segments[0].words[1].speaker, None);
    }
}
