use serde::Deserialize;

/// Result document published by the transcription service for a completed job.
///
/// Only the parts needed to rebuild a transcript are modelled; everything else
/// in the document is ignored while decoding.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TranscriptionResult {
    #[serde(rename = "jobName", default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub results: TranscriptResults,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TranscriptResults {
    /// Plain-text alternatives of the whole transcript, best first.
    #[serde(default)]
    pub transcripts: Vec<PlainTranscript>,
    /// Present only when speaker identification was requested and succeeded.
    #[serde(default)]
    pub speaker_labels: Option<SpeakerLabels>,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlainTranscript {
    pub transcript: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SpeakerLabels {
    #[serde(default)]
    pub speakers: Option<u32>,
    #[serde(default)]
    pub segments: Vec<SpeakerSegment>,
}

/// A contiguous speaker turn.
#[derive(Deserialize, Debug, Clone)]
pub struct SpeakerSegment {
    pub speaker_label: String,
    #[serde(default)]
    pub items: Vec<SegmentItem>,
}

/// Reference from a speaker turn to a recognized word, keyed by start time.
#[derive(Deserialize, Debug, Clone)]
pub struct SegmentItem {
    #[serde(default)]
    pub start_time: Option<String>,
}

/// A recognized word or punctuation token.
#[derive(Deserialize, Debug, Clone)]
pub struct Item {
    /// Missing on punctuation tokens.
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Alternative {
    pub content: String,
}

impl Item {
    pub fn best_content(&self) -> Option<&str> {
        self.alternatives.first().map(|alt| alt.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_service_document() {
        let result: TranscriptionResult = serde_json::from_str(
            r#"{
                "jobName": "job-clip_mp4-1700000000",
                "accountId": "123456789012",
                "status": "COMPLETED",
                "results": {
                    "transcripts": [{"transcript": "Hello, world."}],
                    "speaker_labels": {
                        "speakers": 1,
                        "channel_label": "ch_0",
                        "segments": [{
                            "start_time": "0.0",
                            "end_time": "1.2",
                            "speaker_label": "spk_0",
                            "items": [
                                {"start_time": "0.0", "end_time": "0.5", "speaker_label": "spk_0"},
                                {"start_time": "0.6", "end_time": "1.2", "speaker_label": "spk_0"}
                            ]
                        }]
                    },
                    "items": [
                        {"start_time": "0.0", "end_time": "0.5", "type": "pronunciation",
                         "alternatives": [{"confidence": "0.99", "content": "Hello"}]},
                        {"type": "punctuation", "alternatives": [{"confidence": "0.0", "content": ","}]},
                        {"start_time": "0.6", "end_time": "1.2", "type": "pronunciation",
                         "alternatives": [{"confidence": "0.98", "content": "world"}]}
                    ]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(result.job_name.as_deref(), Some("job-clip_mp4-1700000000"));
        let labels = result.results.speaker_labels.as_ref().unwrap();
        assert_eq!(labels.speakers, Some(1));
        assert_eq!(labels.segments[0].items.len(), 2);
        assert_eq!(result.results.items[1].start_time, None);
        assert_eq!(result.results.items[2].best_content(), Some("world"));
    }

    #[test]
    fn null_speaker_labels_decode_as_absent() {
        let result: TranscriptionResult = serde_json::from_str(
            r#"{"results": {"transcripts": [{"transcript": "hi"}], "speaker_labels": null}}"#,
        )
        .unwrap();
        assert!(result.results.speaker_labels.is_none());
        assert!(result.results.items.is_empty());
    }

    #[test]
    fn empty_document_decodes_to_empty_result() {
        let result: TranscriptionResult = serde_json::from_str("{}").unwrap();
        assert!(result.results.transcripts.is_empty());
        assert!(result.results.speaker_labels.is_none());
    }
}
