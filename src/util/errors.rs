#[derive(Debug)]
pub enum ReplogError {
    /// Delivery progress was queried for an ip that never heartbeated.
    /// The retry loop only dispatches to registered secondaries, so this
    /// indicates a lost-registration bug and must not be papered over.
    UnknownSecondary(String),
    Transport(String),
    InvalidConfig(String),
}

impl std::fmt::Display for ReplogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplogError::UnknownSecondary(ip) => {
                write!(f, "Unknown secondary: no heartbeat recorded for {}", ip)
            }
            ReplogError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ReplogError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ReplogError {}

impl From<reqwest::Error> for ReplogError {
    fn from(err: reqwest::Error) -> Self {
        ReplogError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReplogError>;
