pub mod reconstruct;
pub mod result;

pub use reconstruct::{reconstruct, TranscriptSource};
pub use result::TranscriptionResult;
