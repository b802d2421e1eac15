use std::collections::HashMap;

use crate::transcript::result::{SpeakerSegment, TranscriptionResult};

pub const NO_TRANSCRIPT_SENTINEL: &str = "[Error: No transcript text found]";

/// Where the text of a [`Transcript`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptSource {
    SpeakerSegments,
    PlainText,
    /// Neither segments nor a plain alternative; the text is the sentinel.
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub source: TranscriptSource,
}

/// Builds the final transcript text from a job result.
///
/// A result carrying speaker segments is rendered as one `label: words` line per
/// segment, in the order the service supplied them. Otherwise the first plain
/// transcript alternative is returned verbatim, or [`NO_TRANSCRIPT_SENTINEL`]
/// when there is none.
pub fn reconstruct(result: &TranscriptionResult) -> Transcript {
    let results = &result.results;
    match results.speaker_labels.as_ref() {
        Some(labels) if !labels.segments.is_empty() => {
            // Later items overwrite earlier ones sharing a start time
            let words: HashMap<&str, &str> = results
                .items
                .iter()
                .filter_map(|item| Some((item.start_time.as_deref()?, item.best_content()?)))
                .collect();
            Transcript {
                text: labels
                    .segments
                    .iter()
                    .map(|segment| speaker_line(segment, &words))
                    .collect(),
                source: TranscriptSource::SpeakerSegments,
            }
        }
        _ => match results.transcripts.first() {
            Some(plain) => Transcript {
                text: plain.transcript.clone(),
                source: TranscriptSource::PlainText,
            },
            None => Transcript {
                text: NO_TRANSCRIPT_SENTINEL.to_string(),
                source: TranscriptSource::Missing,
            },
        },
    }
}

fn speaker_line(segment: &SpeakerSegment, words: &HashMap<&str, &str>) -> String {
    let spoken = segment
        .items
        .iter()
        .filter_map(|item| words.get(item.start_time.as_deref()?).copied())
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}: {}\n", segment.speaker_label, spoken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> TranscriptionResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn single_speaker_segment() {
        let result = parse(
            r#"{"results":{"speaker_labels":{"segments":[{"speaker_label":"spk_0",
                "items":[{"start_time":"0.0"}]}]},
                "items":[{"start_time":"0.0","alternatives":[{"content":"Hello"}]}]}}"#,
        );
        assert_eq!(reconstruct(&result).text, "spk_0: Hello\n");
    }

    #[test]
    fn plain_transcript_without_speaker_labels() {
        let result = parse(r#"{"results":{"transcripts":[{"transcript":"Hello world"}]}}"#);
        assert_eq!(reconstruct(&result).text, "Hello world");
    }

    #[test]
    fn plain_transcript_is_copied_byte_for_byte() {
        let result = parse(
            r#"{"results":{"speaker_labels":null,"transcripts":[
                {"transcript":"  Olá,  mundo!\nTchau. "},{"transcript":"second"}]}}"#,
        );
        assert_eq!(reconstruct(&result).text, "  Olá,  mundo!\nTchau. ");
    }

    #[test]
    fn sentinel_when_nothing_usable() {
        assert_eq!(reconstruct(&parse(r#"{"results":{}}"#)).text, NO_TRANSCRIPT_SENTINEL);
        assert_eq!(
            reconstruct(&parse(r#"{"results":{"transcripts":[]}}"#)).text,
            NO_TRANSCRIPT_SENTINEL
        );
        assert_eq!(reconstruct(&parse("{}")).text, NO_TRANSCRIPT_SENTINEL);
    }

    #[test]
    fn one_line_per_segment_in_supplied_order() {
        let result = parse(
            r#"{"results":{
                "transcripts":[{"transcript":"ignored when segments exist"}],
                "speaker_labels":{"segments":[
                    {"speaker_label":"spk_1","items":[{"start_time":"2.0"},{"start_time":"2.5"}]},
                    {"speaker_label":"spk_0","items":[{"start_time":"0.0"}]},
                    {"speaker_label":"spk_1","items":[]}
                ]},
                "items":[
                    {"start_time":"0.0","alternatives":[{"content":"Hi"}]},
                    {"alternatives":[{"content":"."}]},
                    {"start_time":"2.0","alternatives":[{"content":"good"},{"content":"could"}]},
                    {"start_time":"2.5","alternatives":[{"content":"morning"}]}
                ]}}"#,
        );
        let text = reconstruct(&result).text;
        assert_eq!(text, "spk_1: good morning\nspk_0: Hi\nspk_1: \n");
        assert_eq!(text.lines().count(), 3);
        for (line, label) in text.lines().zip(["spk_1: ", "spk_0: ", "spk_1: "]) {
            assert!(line.starts_with(label));
        }
    }

    #[test]
    fn unmatched_segment_items_are_dropped() {
        let result = parse(
            r#"{"results":{
                "speaker_labels":{"segments":[{"speaker_label":"spk_0",
                    "items":[{"start_time":"0.0"},{"start_time":"9.9"},{}]}]},
                "items":[{"start_time":"0.0","alternatives":[{"content":"Hello"}]},
                         {"start_time":"1.0","alternatives":[]}]}}"#,
        );
        assert_eq!(reconstruct(&result).text, "spk_0: Hello\n");
    }

    #[test]
    fn duplicate_start_time_keeps_last_word() {
        let result = parse(
            r#"{"results":{
                "speaker_labels":{"segments":[{"speaker_label":"spk_0",
                    "items":[{"start_time":"1.0"}]}]},
                "items":[{"start_time":"1.0","alternatives":[{"content":"first"}]},
                         {"start_time":"1.0","alternatives":[{"content":"second"}]}]}}"#,
        );
        assert_eq!(reconstruct(&result).text, "spk_0: second\n");
    }

    #[test]
    fn source_distinguishes_sentinel_from_identical_text() {
        let result = parse(
            r#"{"results":{"transcripts":[{"transcript":"[Error: No transcript text found]"}]}}"#,
        );
        let transcript = reconstruct(&result);
        assert_eq!(transcript.text, NO_TRANSCRIPT_SENTINEL);
        assert_eq!(transcript.source, TranscriptSource::PlainText);

        let missing = reconstruct(&parse(r#"{"results":{"transcripts":[]}}"#));
        assert_eq!(missing.source, TranscriptSource::Missing);
        assert_eq!(missing.text, NO_TRANSCRIPT_SENTINEL);

        let segmented = reconstruct(&parse(
            r#"{"results":{"speaker_labels":{"segments":[{"speaker_label":"spk_0","items":[]}]}}}"#,
        ));
        assert_eq!(segmented.source, TranscriptSource::SpeakerSegments);
        assert_eq!(segmented.text, "spk_0: \n");
    }

    #[test]
    fn empty_segment_list_falls_back_to_plain_text() {
        let result = parse(
            r#"{"results":{"speaker_labels":{"segments":[]},
                "transcripts":[{"transcript":"Hello world"}]}}"#,
        );
        assert_eq!(reconstruct(&result).text, "Hello world");
    }
}
