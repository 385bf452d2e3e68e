//! # Leasewatch Protocol Parsing
//!
//! Crate for extracting DHCP lease-assignment events from captured frames.

pub mod dhcp;

pub use dhcp::{DhcpEvent, DhcpParseError, DhcpParser, MessageKind};
