use thiserror::Error;

/// Everything that can go wrong turning text into an address or a block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Not four dot-separated tokens.
    #[error("invalid address {0:?}: expected four dot-separated octets")]
    InvalidAddress(String),

    /// A token that is not a number in the radix its prefix selects.
    #[error("invalid octet {0:?}")]
    InvalidOctet(String),

    #[error("octet {0:?} out of range 0-255")]
    OctetOutOfRange(String),

    /// Neither a prefix length nor a dotted mask.
    #[error("invalid mask {0:?}")]
    InvalidMask(String),

    #[error("prefix length {0} exceeds 32")]
    PrefixOutOfRange(u32),

    #[error("mask {0} is not a contiguous run of leading ones")]
    NonContiguousMask(String),
}
