//! Slotwatch core: catalog enums, domain types, configuration and errors shared by every crate.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod types;
