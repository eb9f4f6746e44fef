//! Core traits.

mod key_value_store;

pub use key_value_store::{keys, KeyValueStore};
