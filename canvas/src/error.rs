//! Error types for every engine layer.
//!
//! Each layer gets its own enum so callers can match on exactly what that
//! layer can produce. Every variant maps to a stable `E_*` code through
//! [`ErrorCode`] for hosts that surface failures to the user.
//!
//! Nothing here is fatal: every error leaves the scene and history in their
//! last committed state.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::element::ElementId;

/// Stable machine-readable code for an error variant.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

/// Failure from a scene operation. The scene is unchanged.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("element not found: {0}")]
    NotFound(ElementId),
    #[error("duplicate element id: {0}")]
    DuplicateId(ElementId),
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),
}

impl SceneError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation { field, reason: reason.into() }
    }
}

impl ErrorCode for SceneError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "E_VALIDATION",
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::DuplicateId(_) => "E_DUPLICATE_ID",
            Self::InvalidSnapshot(_) => "E_INVALID_SNAPSHOT",
        }
    }
}

/// Failure while planning a bezel.
#[derive(Debug, thiserror::Error)]
pub enum BezelError {
    #[error("element is not a gemstone: {0}")]
    NotAGemstone(ElementId),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

impl ErrorCode for BezelError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotAGemstone(_) => "E_NOT_A_GEMSTONE",
            Self::Scene(err) => err.error_code(),
        }
    }
}

/// Failure reported by an external collaborator (loader, uploader,
/// rasterizer, design store).
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("unreachable: {0}")]
    Unreachable(String),
    #[error("could not decode: {0}")]
    Decode(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("rejected: {0}")]
    Rejected(String),
}

impl ErrorCode for AssetError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "E_ASSET_UNREACHABLE",
            Self::Decode(_) => "E_ASSET_DECODE",
            Self::Unsupported(_) => "E_ASSET_UNSUPPORTED",
            Self::Rejected(_) => "E_ASSET_REJECTED",
        }
    }
}

/// Failure from a document command.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("no gemstone selected")]
    NoSelection,
    #[error("bezel style and metal must both be chosen")]
    IncompleteBezelConfig,
    #[error("element is not a gemstone: {0}")]
    NotAGemstone(ElementId),
    #[error("failed to load image {src}: {source}")]
    AssetLoadFailed {
        src: String,
        #[source]
        source: AssetError,
    },
    #[error("collaborator failed: {0}")]
    Collaborator(#[from] AssetError),
}

impl From<BezelError> for DocumentError {
    fn from(err: BezelError) -> Self {
        match err {
            BezelError::NotAGemstone(id) => Self::NotAGemstone(id),
            BezelError::Scene(err) => Self::Scene(err),
        }
    }
}

impl ErrorCode for DocumentError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Scene(err) => err.error_code(),
            Self::NoSelection => "E_NO_SELECTION",
            Self::IncompleteBezelConfig => "E_INCOMPLETE_BEZEL_CONFIG",
            Self::NotAGemstone(_) => "E_NOT_A_GEMSTONE",
            Self::AssetLoadFailed { .. } => "E_ASSET_LOAD_FAILED",
            Self::Collaborator(err) => err.error_code(),
        }
    }
}

impl DocumentError {
    /// Whether the user can fix this by changing their input (as opposed to
    /// a collaborator being unavailable).
    #[must_use]
    pub fn is_user_recoverable(&self) -> bool {
        !matches!(self, Self::AssetLoadFailed { .. } | Self::Collaborator(_))
    }
}
