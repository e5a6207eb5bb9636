//! Outbound adapters implementing the domain's ports.

pub mod persistence;
