pub mod appointment;
pub mod notification;
