//! Persistence for observed appointments and sent notifications.

pub mod db;
pub mod error;
pub mod model;
pub mod store;
