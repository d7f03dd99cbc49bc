//! Allocation strategies.
//!
//! A [`Strategy`] tells the allocator how to spread screenshots across the
//! videos of one folder. Two strategies are recognised:
//!
//! - `max_screenshots` — a hard per-folder budget, split across videos
//!   proportionally to each video's share of the folder's total duration.
//! - `time_based` — one screenshot per fixed time interval, per video, with
//!   no folder-wide cap.
//!
//! Strategy names and parameters are validated once, up front, so an invalid
//! configuration fails before any folder is touched.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::error::SiftError;

/// How screenshots are allocated across the videos of a folder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Cap the folder at `cap` screenshots total, split proportionally by
    /// duration. Videos whose proportional share floors to zero receive no
    /// screenshots at all.
    MaxPerFolder {
        /// Maximum total screenshots for one folder.
        cap: u64,
    },
    /// One screenshot per `interval` of playback, evenly re-spaced across
    /// each video's full duration. Videos shorter than the interval are
    /// skipped. No folder-wide cap applies.
    TimeBased {
        /// Minimum playback time represented by each screenshot.
        interval: Duration,
    },
}

impl Strategy {
    /// Parse a strategy from its CLI name and parameters.
    ///
    /// Recognised names are exactly `max_screenshots` and `time_based`.
    /// The matching parameter must be present; the other is ignored.
    ///
    /// # Errors
    ///
    /// - [`SiftError::InvalidStrategy`] for any other name.
    /// - [`SiftError::InvalidCap`] if `max_screenshots` is selected without
    ///   a positive cap.
    /// - [`SiftError::InvalidInterval`] if `time_based` is selected without
    ///   a positive interval in seconds representable as a [`Duration`].
    pub fn parse(
        name: &str,
        cap: Option<u64>,
        interval_seconds: Option<f64>,
    ) -> Result<Self, SiftError> {
        let strategy = match name {
            "max_screenshots" => Strategy::MaxPerFolder {
                cap: cap.ok_or(SiftError::InvalidCap)?,
            },
            "time_based" => {
                let seconds = interval_seconds.ok_or(SiftError::InvalidInterval)?;
                if seconds <= 0.0 {
                    return Err(SiftError::InvalidInterval);
                }
                // Rejects NaN and values past Duration's range (~5.8e11 s).
                Strategy::TimeBased {
                    interval: Duration::try_from_secs_f64(seconds)
                        .map_err(|_| SiftError::InvalidInterval)?,
                }
            }
            other => return Err(SiftError::InvalidStrategy(other.to_string())),
        };
        strategy.validate()?;
        Ok(strategy)
    }

    /// Check the strategy's parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::InvalidCap`] or [`SiftError::InvalidInterval`]
    /// if a parameter is out of range.
    pub fn validate(&self) -> Result<(), SiftError> {
        match self {
            Strategy::MaxPerFolder { cap } => {
                if *cap == 0 {
                    return Err(SiftError::InvalidCap);
                }
            }
            Strategy::TimeBased { interval } => {
                if interval.is_zero() {
                    return Err(SiftError::InvalidInterval);
                }
            }
        }
        Ok(())
    }

    /// The canonical strategy name, as accepted by [`Strategy::parse`].
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::MaxPerFolder { .. } => "max_screenshots",
            Strategy::TimeBased { .. } => "time_based",
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Strategy::MaxPerFolder { cap } => {
                write!(f, "max_screenshots (cap {cap} per folder)")
            }
            Strategy::TimeBased { interval } => {
                write!(f, "time_based (every {:.2}s)", interval.as_secs_f64())
            }
        }
    }
}
