//! Compatibility scoring for HDB resale listings.
//!
//! [`scoring::score`] and [`scoring::explain`] rate one [`models::Listing`]
//! against one [`models::Preferences`]; everything else in the crate is the
//! local CLI around them.

pub mod bands;
pub mod cli;
pub mod config;
pub mod criteria;
pub mod logging;
pub mod models;
pub mod ranking;
pub mod scoring;
pub mod storage;

pub use models::{Listing, Preferences};
pub use scoring::{Criterion, MatchQuality, ScoreBreakdown, explain, score};
