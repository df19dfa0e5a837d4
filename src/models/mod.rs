pub mod appointment;
pub mod caller;
pub mod message;
