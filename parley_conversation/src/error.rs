use thiserror::Error;

/// Errors raised while running a turn.
///
/// A turn that fails never writes to the checkpoint store.
#[derive(Debug, Error)]
pub enum ConversationError {
    /// Model client failure, passed through as-is.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),

    #[error("Session storage error: {0}")]
    Storage(anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
