use thiserror::Error;

/// Failures the sketches can report. None of them are fatal to the page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SketchError {
    #[error("unknown sketch kind `{0}`")]
    UnknownKind(String),
    #[error("audio playback unlock failed: {0}")]
    AudioUnlock(String),
    #[error("failed to load audio `{url}`: {reason}")]
    AudioLoad { url: String, reason: String },
    #[error("dom: {0}")]
    Dom(String),
}
