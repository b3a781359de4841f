use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupdeskError {
    // Local failures: reported inline, nothing was sent to the backend
    #[error("{0}")]
    Validation(String),

    #[error("cannot {0}: id missing")]
    MissingId(String),

    #[error("{0} is already in progress")]
    Busy(String),

    #[error("no group form is open")]
    FormClosed,

    #[error("group '{0}' not found")]
    GroupNotFound(String),

    #[error("request '{0}' not found")]
    RequestNotFound(String),

    #[error("{0}")]
    ConfirmationRequired(String),

    // Remote failures
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Ambient
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GroupdeskError {
    /// True when the failure was detected locally and no remote call was made.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            GroupdeskError::Validation(_)
                | GroupdeskError::MissingId(_)
                | GroupdeskError::Busy(_)
                | GroupdeskError::FormClosed
                | GroupdeskError::GroupNotFound(_)
                | GroupdeskError::RequestNotFound(_)
                | GroupdeskError::ConfirmationRequired(_)
        )
    }

    /// True for network-level failures (connect, timeout, undecodable body).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GroupdeskError::Transport(_) | GroupdeskError::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GroupdeskError>;
