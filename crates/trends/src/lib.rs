//! # Trends Crate
//!
//! This crate implements the trend tracker: it aggregates tagged items
//! over time per style category and computes a velocity signal (rate of
//! appearance change).
//!
//! ## How the signal is built
//!
//! 1. Bucket items per (style, day of ingestion timestamp)
//! 2. Smooth the daily counts with an EMA (span-parameterized)
//! 3. Velocity = first difference of the EMA
//!
//! The composer later boosts recommendation scores by the latest positive
//! velocity of the item's style.
//!
//! ## Example Usage
//!
//! ```ignore
//! use trends::{TrendReport, DEFAULT_SPAN};
//!
//! let report = TrendReport::compute(&catalog_index, DEFAULT_SPAN);
//! let hot = report.latest_velocities();
//! report.save(Path::new("data/trends.json"))?;
//! ```

pub mod ema;
pub mod report;

pub use report::{TrendPoint, TrendReport, DEFAULT_SPAN};
