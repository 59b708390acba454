use std::fmt;

/// Raw article payload as returned by the platform. Empty means "nothing here".
pub type RawContent = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Timeout,
    Transport,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// The platform no longer accepts the session.
    AuthExpired,
    /// The session material could not be turned into a client.
    SessionSetup,
}

impl FailureKind {
    /// Fatal failures end the owning worker; everything else skips one id.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FailureKind::AuthExpired | FailureKind::SessionSetup)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Transport => write!(f, "transport error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::AuthExpired => write!(f, "session expired"),
            FailureKind::SessionSetup => write!(f, "session setup failed"),
        }
    }
}
