use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, WindowError>;

/// Configuration errors, reported before any sample is processed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// The window must hold at least one element
    #[error("window size must be positive, got {window}")]
    InvalidWindowSize {
        /// The rejected window size
        window: usize,
    },

    /// A batch run was asked for a window wider than its input
    #[error("window size {window} exceeds stream length {len}")]
    WindowTooLarge {
        /// The requested window size
        window: usize,
        /// Length of the input stream
        len: usize,
    },

    /// A batch run was given no input at all
    #[error("input stream is empty")]
    EmptySequence,

    /// A batch input contained a NaN, which has no place in a median
    #[error("input stream contains NaN at index {index}")]
    NonFiniteValue {
        /// Position of the first NaN in the stream
        index: usize,
    },
}

impl WindowError {
    /// Whether the error is caused by a bad window size
    pub fn is_window_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidWindowSize { .. } | Self::WindowTooLarge { .. }
        )
    }

    /// Whether the error is caused by a bad input sequence
    pub fn is_sequence_error(&self) -> bool {
        matches!(self, Self::EmptySequence | Self::NonFiniteValue { .. })
    }
}
