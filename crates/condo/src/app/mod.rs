//! Application layer: controllers over the domain, driven by the UI.

pub mod access;
pub mod admin;
pub mod notices;
pub mod packages;
pub mod panic;
pub mod payments;
pub mod ports;
pub mod receipt;
pub mod reservations;
pub mod session;
pub mod slots;
pub mod visits;
