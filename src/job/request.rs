use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

// Container formats accepted by Amazon Transcribe
const KNOWN_MEDIA_FORMATS: [&str; 8] = ["amr", "flac", "m4a", "mp3", "mp4", "ogg", "wav", "webm"];

#[derive(Debug, Clone, PartialEq)]
pub enum LanguageMode {
    Single(String),
    /// Automatic identification among the given locales.
    MultiCandidate(Vec<String>),
}

/// A local media file and how it should be transcribed.
///
/// Speaker identification is only available in single-language mode.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    source_file: PathBuf,
    file_name: String,
    language: LanguageMode,
    speaker_id_requested: bool,
}

impl TranscriptionRequest {
    pub fn single(source_file: impl Into<PathBuf>, language_code: &str) -> Result<Self> {
        Self::new(
            source_file.into(),
            LanguageMode::Single(language_code.to_string()),
            true,
        )
    }

    pub fn multi_candidate(source_file: impl Into<PathBuf>, candidates: Vec<String>) -> Result<Self> {
        Self::new(source_file.into(), LanguageMode::MultiCandidate(candidates), false)
    }

    fn new(source_file: PathBuf, language: LanguageMode, speaker_id_requested: bool) -> Result<Self> {
        let file_name = source_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow!("{} does not name a file", source_file.display()))?;
        Ok(Self {
            source_file,
            file_name,
            language,
            speaker_id_requested,
        })
    }

    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    /// Base name of the source file, also used as the remote object key.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn language(&self) -> &LanguageMode {
        &self.language
    }

    pub fn speaker_id_requested(&self) -> bool {
        self.speaker_id_requested
    }

    /// Media format from the file extension, `fallback` when it is not one
    /// the service knows.
    pub fn media_format(&self, fallback: &str) -> String {
        self.source_file
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .filter(|ext| KNOWN_MEDIA_FORMATS.contains(&ext.as_str()))
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Identifies a submitted job; only used as the polling key.
#[derive(Debug, Clone, PartialEq)]
pub struct JobHandle {
    pub job_name: String,
    pub media_uri: String,
}

impl JobHandle {
    pub fn new(file_name: &str, submitted_at: u64, media_uri: String) -> Self {
        Self {
            job_name: job_name(file_name, submitted_at),
            media_uri,
        }
    }
}

/// Two submissions of the same file within one second share a name.
pub fn job_name(file_name: &str, unix_timestamp: u64) -> String {
    format!("job-{}-{}", sanitize(file_name), unix_timestamp)
}

fn sanitize(file_name: &str) -> String {
    file_name.replace([' ', '.'], "_")
}
