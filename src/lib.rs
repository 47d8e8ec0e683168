//! TSORDER - Terminal Order Form Library
//!
//! A terminal order form with live subtotals, built around a pure
//! order-state reducer.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
