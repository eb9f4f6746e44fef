//! The location history store: single authority for the user's own trail.

mod import;
mod store;


pub use import::MergeOutcome;
pub use store::{AppendOutcome, LocationHistoryStore};
