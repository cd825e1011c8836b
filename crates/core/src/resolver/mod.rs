//! Link resolution: turn one info hash into a direct download URL.
//!
//! The workflow submits the magnet to the provider, selects files, polls the
//! torrent status on a fixed interval with a bounded budget, and unrestricts
//! the first link once the torrent is downloaded. Any failed call ends the
//! workflow with no link.

mod real_debrid;
mod sleeper;
mod types;
mod workflow;

pub use real_debrid::RealDebridTorrentApi;
pub use sleeper::{Sleeper, TokioSleeper};
pub use types::*;
pub use workflow::LinkResolver;
