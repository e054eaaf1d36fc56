//! Error types for the sentiment tree core

use thiserror::Error;

use crate::grid::TreePart;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by every sentiment-tree crate
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Slot Grid Errors
    // ─────────────────────────────────────────────────────────────
    #[error("No free {part} slot left in the grid")]
    CapacityExhausted { part: TreePart },

    #[error("Invalid grid layout: {message}")]
    GridLayout { message: String },

    // ─────────────────────────────────────────────────────────────
    // Sequencing Errors
    // ─────────────────────────────────────────────────────────────
    #[error("A sequencing campaign is already in flight")]
    CampaignInProgress,

    // ─────────────────────────────────────────────────────────────
    // Scoring Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Confidence must be a finite value in [0, 1], got {value}")]
    InvalidConfidence { value: f64 },

    #[error("Scoring failed: {message}")]
    Scoring { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn capacity_exhausted(part: TreePart) -> Self {
        Self::CapacityExhausted { part }
    }

    pub fn grid_layout(message: impl Into<String>) -> Self {
        Self::GridLayout {
            message: message.into(),
        }
    }

    pub fn scoring(message: impl Into<String>) -> Self {
        Self::Scoring {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors are absorbed by the coordinator as logged no-ops.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::CampaignInProgress
                | Error::Scoring { .. }
                | Error::InvalidConfidence { .. }
        )
    }

    /// Check if this error should abort the requested operation or startup
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::CapacityExhausted { .. } | Error::GridLayout { .. } | Error::Config { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }
}
