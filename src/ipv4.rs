//! Octet tokens follow `inet_aton`: `0x` is hexadecimal, a leading `0` is
//! octal, anything else is decimal.
use crate::error::ParseError;
use lazy_static::lazy_static;
use regex::Regex;
use std::convert::TryFrom;
use std::net::Ipv4Addr;

pub const MAX_LENGTH: u8 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Radix {
    Hex,
    Octal,
    Decimal,
}

impl Radix {
    fn split(token: &str) -> (Radix, &str) {
        if let Some(digits) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
        {
            (Radix::Hex, digits)
        } else if token.len() > 1 && token.starts_with('0') {
            (Radix::Octal, &token[1..])
        } else {
            (Radix::Decimal, token)
        }
    }

    fn base(self) -> u32 {
        match self {
            Radix::Hex => 16,
            Radix::Octal => 8,
            Radix::Decimal => 10,
        }
    }
}

pub fn parse_octet(token: &str) -> Result<u8, ParseError> {
    let (radix, digits) = Radix::split(token);
    let base = radix.base();
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(base)) {
        return Err(ParseError::InvalidOctet(token.to_owned()));
    }
    let value = u32::from_str_radix(digits, base)
        .map_err(|_| ParseError::OctetOutOfRange(token.to_owned()))?;
    u8::try_from(value).map_err(|_| ParseError::OctetOutOfRange(token.to_owned()))
}

pub fn ip2long(s: &str) -> Result<u32, ParseError> {
    lazy_static! {
        static ref RE: Regex =
            Regex::new(r"^([^./]*)\.([^./]*)\.([^./]*)\.([^./]*)$").expect("Not possible");
    }
    let caps = RE
        .captures(s)
        .ok_or_else(|| ParseError::InvalidAddress(s.to_owned()))?;
    let mut addr = 0u32;
    for i in 1..=4 {
        let token = caps.get(i).map_or("", |m| m.as_str());
        addr = (addr << 8) | u32::from(parse_octet(token)?);
    }
    Ok(addr)
}

pub fn long2ip(addr: u32) -> Ipv4Addr {
    Ipv4Addr::from(addr)
}

/// Mask with `bitmask` leading ones. Values above 32 saturate.
pub fn prefix_to_mask(bitmask: u8) -> u32 {
    let host_bits = MAX_LENGTH - bitmask.min(MAX_LENGTH);
    u32::MAX.checked_shl(u32::from(host_bits)).unwrap_or(0)
}

pub fn mask_to_prefix(mask: u32) -> Result<u8, ParseError> {
    let ones = mask.leading_ones();
    match u8::try_from(ones) {
        Ok(bitmask) if ones + mask.trailing_zeros() == u32::from(MAX_LENGTH) => Ok(bitmask),
        _ => Err(ParseError::NonContiguousMask(long2ip(mask).to_string())),
    }
}

pub fn parse_mask(s: &str) -> Result<u8, ParseError> {
    if s.contains('.') {
        let mask = ip2long(s).map_err(|e| match e {
            ParseError::InvalidAddress(_) => ParseError::InvalidMask(s.to_owned()),
            e => e,
        })?;
        return mask_to_prefix(mask);
    }
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidMask(s.to_owned()));
    }
    let bitmask = s.parse::<u32>().unwrap_or(u32::MAX);
    u8::try_from(bitmask)
        .ok()
        .filter(|&b| b <= MAX_LENGTH)
        .ok_or(ParseError::PrefixOutOfRange(bitmask))
}
