//! Configuration and Token Storage
//!
//! The host owns a persistent key-value configuration store. This module
//! defines that capability as a trait, two implementations of it, and the
//! typed token store that reads and writes the three credential keys.

pub mod config_store;
pub mod token_store;

pub use config_store::{ConfigStore, FileConfigStore, InMemoryConfigStore};
pub use token_store::{TokenStore, ACCESS_TOKEN_KEY, EXPIRATION_KEY, REFRESH_TOKEN_KEY};
