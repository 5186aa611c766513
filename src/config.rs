use crate::error::{Result, WindowError};
use crate::sample::Sample;
use crate::structure::{Backend, Structure};
use crate::window::WindowTracker;

/// Settings for building a [`WindowTracker`] whose structure is picked at runtime
///
/// ```
/// use windowed_median::{Structure, TrackerConfig};
///
/// let mut tracker = TrackerConfig::new(2)
///     .structure(Structure::SortedMultiset)
///     .build::<i32>()?;
///
/// assert_eq!(tracker.push(3), None);
/// assert_eq!(tracker.push(4), Some(3.5));
/// # Ok::<(), windowed_median::WindowError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    window_size: usize,
    structure: Structure,
}

impl TrackerConfig {
    /// Starts a configuration for windows of `window_size` values, using the default [`Structure`]
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            structure: Structure::default(),
        }
    }

    /// Selects the order-statistic structure
    pub fn structure(mut self, structure: Structure) -> Self {
        self.structure = structure;
        self
    }

    /// Configured window size
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Configured structure
    pub fn selected_structure(&self) -> Structure {
        self.structure
    }

    /// Checks the configuration without building anything
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(WindowError::InvalidWindowSize {
                window: self.window_size,
            });
        }
        Ok(())
    }

    /// Builds an empty tracker
    pub fn build<T: Sample>(&self) -> Result<WindowTracker<T, Backend<T>>> {
        self.validate()?;
        WindowTracker::with_structure(self.window_size, self.structure)
    }
}
