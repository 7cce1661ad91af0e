//! Defines the ways in which handling a single object may fail.

use thiserror::Error;

/// Every failure of the handler. These are only collapsed into a
/// uniform failure response at the outer boundary in `app`.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("malformed trigger event: {0}")]
    MalformedEvent(String),

    #[error("couldn't read object {key:?} from bucket {bucket:?}: {reason}")]
    SourceRead {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("invalid JSON on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("couldn't encode CSV export: {0}")]
    Encode(String),

    #[error("couldn't write object {key:?} to bucket {bucket:?}: {reason}")]
    DestinationWrite {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("couldn't publish notification to {topic:?}: {reason}")]
    Notify { topic: String, reason: String },
}
