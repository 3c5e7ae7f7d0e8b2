use thiserror::Error;

/// Why a fetch of the upstream collection could not produce posts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport error: {message}")]
    Transport { message: String },
    #[error("upstream responded with status {status}")]
    Status { status: u16, body: String },
    #[error("response body is not valid JSON: {message}")]
    Malformed { message: String },
    #[error("expected a JSON list, found {found}")]
    NotAList { found: &'static str },
    #[error("post list could not be decoded: {message}")]
    Shape { message: String },
}

impl FetchError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }

    pub fn malformed(err: impl std::fmt::Display) -> Self {
        Self::Malformed {
            message: err.to_string(),
        }
    }

    pub fn shape(err: impl std::fmt::Display) -> Self {
        Self::Shape {
            message: err.to_string(),
        }
    }

    /// Stable label used in log fields and metric labels.
    pub fn reason(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "transport",
            FetchError::Status { .. } => "status",
            FetchError::Malformed { .. } => "malformed",
            FetchError::NotAList { .. } => "not_a_list",
            FetchError::Shape { .. } => "shape",
        }
    }
}

/// Result of a content query: data, or a degraded outcome carrying the cause.
///
/// Callers that only need something to render use [`ContentOutcome::into_value`],
/// which turns a degraded outcome into the empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentOutcome<T> {
    Ready(T),
    Degraded(FetchError),
}

impl<T> ContentOutcome<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, ContentOutcome::Degraded(_))
    }
}

impl<T: Default> ContentOutcome<T> {
    pub fn into_value(self) -> T {
        match self {
            ContentOutcome::Ready(value) => value,
            ContentOutcome::Degraded(_) => T::default(),
        }
    }
}
