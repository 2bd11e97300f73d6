//! slotwatch appointment monitor - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can use one path for
//! everything they exercise.

pub mod component {
    pub use slotwatch_core::{catalog, config, constants, types};

    pub mod db {
        pub use slotwatch_db::db::*;
        pub use slotwatch_db::error;
        pub use slotwatch_db::store;
    }

    pub mod service {
        pub use slotwatch_service::*;
    }
}
