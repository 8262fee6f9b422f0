use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("tun listener creation failed: {reason}")]
    TunnelCreation { reason: String },

    #[error("redirect program attach failed: {reason}")]
    RedirectAttach { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
