use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScopeError {
    /// A scoped-store lookup ran outside any scope providing the state type.
    #[error("no enclosing scope provides a store for `{state}`")]
    NotProvided { state: &'static str },
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("stored record is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("stored record version {found} does not match current version {current}")]
    VersionMismatch { found: u32, current: u32 },
}
