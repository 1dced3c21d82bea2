//! committee-api - REST backend for academic committee governance
//!
//! The core is the slot accounting layer (`slots`): every change to a
//! committee slot row and to the committee's `total_slots` aggregate happens
//! in one SQLite transaction.

pub mod cli;
pub mod committees;
pub mod config;
pub mod http_server;
pub mod observability;
pub mod slots;
pub mod store;
