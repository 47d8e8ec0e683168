//! Infrastructure layer providing external service integrations.
//!
//! This module contains the file-backed pieces of the application:
//! menu catalogs, settings and the errors they can raise.

pub mod catalog;
pub mod config;
pub mod errors;

pub use catalog::*;
pub use config::*;
pub use errors::*;
