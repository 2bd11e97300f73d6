//! Process wiring for the `slotwatch` binary.

pub mod wiring;
