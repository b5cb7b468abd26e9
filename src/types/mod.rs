//! Azumuta sync types.
//!
//! Internal employee records, the remote employee schema, token state and the
//! status codes returned by the sync endpoint.

pub mod employee;
pub mod remote;
pub mod status;
pub mod token;

pub use employee::*;
pub use remote::*;
pub use status::*;
pub use token::*;
