use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("stale element: {0}")]
    StaleElement(String),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("browser transport error: {0}")]
    Transport(String),

    #[error("browser session closed")]
    SessionClosed,
}

impl BrowserError {
    /// Whether retrying the same operation may succeed.
    ///
    /// A failed launch or a closed session will not recover on its own.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Launch(_) | Self::SessionClosed)
    }
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        use chromiumoxide::error::CdpError;

        match &err {
            CdpError::Timeout => Self::Timeout(err.to_string()),
            CdpError::NotFound => Self::StaleElement(err.to_string()),
            CdpError::ChannelSendError(_) => Self::SessionClosed,
            _ => Self::Transport(err.to_string()),
        }
    }
}
