//! Run configuration.
//!
//! [`SiftConfig`] names the what of a run — input root, output root,
//! strategy — and is validated once at [`Sifter`](crate::Sifter)
//! construction so a bad strategy or missing folder fails before any video
//! is touched. [`RunOptions`] is a builder for the operational extras
//! (progress callbacks, cancellation, callback cadence) that would otherwise
//! pollute every signature.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::SiftError;
use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};
use crate::strategy::Strategy;

/// What to process and how to allocate.
///
/// # Example
///
/// ```
/// use stillsift::{SiftConfig, Strategy};
///
/// let config = SiftConfig::new(
///     "library",
///     "screenshots",
///     Strategy::MaxPerFolder { cap: 60 },
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SiftConfig {
    /// Root of the video library (flat, or one level of subfolders).
    pub input_root: PathBuf,
    /// Where screenshot subdirectories are created.
    pub output_root: PathBuf,
    /// How screenshots are allocated within each folder.
    pub strategy: Strategy,
}

impl SiftConfig {
    /// Create a configuration.
    pub fn new(
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        strategy: Strategy,
    ) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            strategy,
        }
    }

    /// Validate the configuration.
    ///
    /// Called by [`Sifter::new`](crate::Sifter::new); exposed for callers
    /// that want to check inputs earlier (e.g. while still prompting).
    ///
    /// # Errors
    ///
    /// - [`SiftError::InvalidCap`] / [`SiftError::InvalidInterval`] for
    ///   out-of-range strategy parameters.
    /// - [`SiftError::InputFolder`] if the input root is not a directory.
    pub fn validate(&self) -> Result<(), SiftError> {
        self.strategy.validate()?;

        if !self.input_root.is_dir() {
            return Err(SiftError::InputFolder {
                path: self.input_root.clone(),
                reason: "not a directory".to_string(),
            });
        }

        Ok(())
    }
}

/// Operational settings for a run.
///
/// All fields have defaults — a default-constructed value behaves exactly
/// like passing no options at all.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use stillsift::{CancellationToken, ProgressCallback, ProgressInfo, RunOptions};
///
/// struct LogProgress;
/// impl ProgressCallback for LogProgress {
///     fn on_progress(&self, info: &ProgressInfo) {
///         println!("{:?}: {} done", info.operation, info.current);
///     }
/// }
///
/// let token = CancellationToken::new();
/// let options = RunOptions::new()
///     .with_progress(Arc::new(LogProgress))
///     .with_cancellation(token.clone())
///     .with_batch_size(10);
/// ```
#[derive(Clone)]
pub struct RunOptions {
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
    /// How often to fire the progress callback (every N items).
    pub(crate) batch_size: u64,
}

impl Debug for RunOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RunOptions")
            .field("has_progress", &true)
            .field("has_cancellation", &self.cancellation.is_some())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl RunOptions {
    /// Create options with default settings.
    ///
    /// Defaults: no progress callback, no cancellation, batch size 1.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
        }
    }

    /// Attach a progress callback.
    ///
    /// The callback is invoked every
    /// [`batch_size`](RunOptions::with_batch_size) extracted sample points.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token.
    ///
    /// When the token is cancelled, the run stops before its next external
    /// call and returns [`SiftError::Cancelled`].
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Set how often the progress callback fires.
    ///
    /// A value of 1 means every item; 10 means every 10th item. Clamped to
    /// a minimum of 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Returns `true` if cancellation has been requested.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
