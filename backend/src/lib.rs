//! Snippet sharing backend.
//!
//! Hexagonal layout: `domain` holds entities, policy and services behind
//! driving ports, `inbound` adapts HTTP onto those ports, and `outbound`
//! implements the driven persistence ports.

pub mod domain;
pub mod inbound;
pub mod outbound;
