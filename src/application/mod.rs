//! Application layer managing state and user workflows.
//!
//! This module sits between the order reducer and the terminal,
//! turning user actions into form events and tracking view state.

pub mod state;

pub use state::*;
