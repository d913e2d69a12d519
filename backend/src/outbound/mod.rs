//! Driven adapters implementing the domain's outbound ports.

pub mod persistence;
