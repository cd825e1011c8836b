//! Debrid cache availability checks.
//!
//! This module provides an `AvailabilityChecker` trait with one
//! implementation per provider. Every checker caps its input at
//! [`MAX_HASHES_PER_CHECK`] and reports only hashes that have at least one
//! cached file variant.

mod all_debrid;
mod premiumize;
mod real_debrid;
mod types;

pub use all_debrid::AllDebridChecker;
pub use premiumize::PremiumizeChecker;
pub use real_debrid::RealDebridChecker;
pub use types::*;
