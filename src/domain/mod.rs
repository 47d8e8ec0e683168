pub mod models;
pub mod services;
pub mod errors;
pub mod catalog;

pub use models::*;
pub use services::*;
pub use errors::*;
