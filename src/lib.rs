//! IPv4 address blocks: parse `a.b.c.d/n` (or a dotted mask, or a bare
//! address), describe the block, test containment and walk its addresses.
//!
//! ```
//! let block = netmask::parse("10.1.2.5/24").unwrap();
//! assert_eq!("10.1.2.0", block.base().to_string());
//! assert_eq!("10.1.2.255", block.broadcast().to_string());
//! assert_eq!(Ok(true), block.contains("0xa.1.2.0x10"));
//! ```
pub mod error;
pub mod ipv4;
pub mod netmask;

pub use crate::error::ParseError;
pub use crate::netmask::{Addrs, Netmask, Target};

/// Same as `s.parse::<Netmask>()`.
pub fn parse(s: &str) -> Result<Netmask, ParseError> {
    s.parse()
}
