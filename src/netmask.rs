use crate::error::ParseError;
use crate::ipv4::{self, long2ip, MAX_LENGTH};
use log::{debug, trace};
use std::fmt::{self, Display, Formatter};
use std::net::Ipv4Addr;
use std::ops::{Bound, Range, RangeBounds};
use std::str::FromStr;

/// An aligned IPv4 block such as `10.1.2.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Netmask {
    base: u32,
    bitmask: u8,
    mask: u32,
    hostmask: u32,
    size: u64,
    broadcast: u32,
    first: u32,
    last: u32,
}

impl Netmask {
    /// Builds the block of `bitmask` leading bits around `addr`. Host bits of
    /// `addr` are cleared.
    pub fn new(addr: u32, bitmask: u8) -> Result<Self, ParseError> {
        if bitmask > MAX_LENGTH {
            return Err(ParseError::PrefixOutOfRange(u32::from(bitmask)));
        }
        let mask = ipv4::prefix_to_mask(bitmask);
        let hostmask = !mask;
        let base = addr & mask;
        if base != addr {
            debug!(
                "cleared host bits of {} for /{}, base is {}",
                long2ip(addr),
                bitmask,
                long2ip(base)
            );
        }
        let broadcast = base | hostmask;
        // /31 and /32 have no network/broadcast pair to skip.
        let (first, last) = if bitmask <= MAX_LENGTH - 2 {
            (base + 1, broadcast - 1)
        } else {
            (base, broadcast)
        };
        Ok(Netmask {
            base,
            bitmask,
            mask,
            hostmask,
            size: u64::from(hostmask) + 1,
            broadcast,
            first,
            last,
        })
    }

    pub fn with_mask(addr: &str, mask: &str) -> Result<Self, ParseError> {
        let addr = ipv4::ip2long(addr.trim())?;
        let bitmask = ipv4::parse_mask(mask.trim())?;
        Netmask::new(addr, bitmask)
    }

    pub fn base(&self) -> Ipv4Addr {
        long2ip(self.base)
    }

    pub fn base_long(&self) -> u32 {
        self.base
    }

    pub fn bitmask(&self) -> u8 {
        self.bitmask
    }

    pub fn mask(&self) -> Ipv4Addr {
        long2ip(self.mask)
    }

    pub fn mask_long(&self) -> u32 {
        self.mask
    }

    pub fn hostmask(&self) -> Ipv4Addr {
        long2ip(self.hostmask)
    }

    /// Number of addresses, network and broadcast included.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        long2ip(self.broadcast)
    }

    pub fn broadcast_long(&self) -> u32 {
        self.broadcast
    }

    /// First usable host; the base itself for /31 and /32.
    pub fn first(&self) -> Ipv4Addr {
        long2ip(self.first)
    }

    /// Last usable host; the broadcast itself for /31 and /32.
    pub fn last(&self) -> Ipv4Addr {
        long2ip(self.last)
    }

    /// Malformed text is an `Err`, never `Ok(false)`.
    ///
    /// ```
    /// use netmask::Netmask;
    ///
    /// let block: Netmask = "31.0.0.0/19".parse().unwrap();
    /// assert_eq!(Ok(true), block.contains("31.0.5.5"));
    /// assert_eq!(Ok(false), block.contains("031.0.5.5"));
    /// assert!(block.contains("31.0.~.5").is_err());
    /// ```
    pub fn contains<'a, T: Into<Target<'a>>>(&self, target: T) -> Result<bool, ParseError> {
        let (lo, hi) = target.into().range()?;
        Ok(self.base <= lo && hi <= self.broadcast)
    }

    /// Addresses by offset from the base address.
    ///
    /// An open start begins at `first` and an open end stops after `last`;
    /// ask for `0..size` to include the network and broadcast addresses.
    /// Bounds are clamped into `[0, size]`.
    pub fn addresses<R: RangeBounds<u64>>(&self, range: R) -> Addrs {
        let (start, end) = clamp(
            &range,
            u64::from(self.first - self.base),
            u64::from(self.last - self.base) + 1,
            self.size,
        );
        Addrs::span(self.base, start, end)
    }

    /// Usable hosts by index, `0` being `first`. Bounds are clamped to the
    /// host count.
    ///
    /// ```
    /// use netmask::Netmask;
    ///
    /// let block: Netmask = "10.1.2.0/24".parse().unwrap();
    /// let ips: Vec<String> = block.slice(0..3).map(|ip| ip.to_string()).collect();
    /// assert_eq!(vec!["10.1.2.1", "10.1.2.2", "10.1.2.3"], ips);
    /// ```
    pub fn slice<R: RangeBounds<u64>>(&self, range: R) -> Addrs {
        let hosts = u64::from(self.last - self.first) + 1;
        let (start, end) = clamp(&range, 0, hosts, hosts);
        Addrs::span(self.first, start, end)
    }

    pub fn hosts(&self) -> Addrs {
        self.slice(..)
    }

    /// The same-sized block `count` blocks further on (backwards when
    /// negative), or `None` past either end of the address space.
    pub fn next(&self, count: i64) -> Option<Netmask> {
        let step = (self.size as i64).checked_mul(count)?;
        let base = i64::from(self.base).checked_add(step)?;
        if base < 0 || base > i64::from(u32::MAX) {
            return None;
        }
        Netmask::new(base as u32, self.bitmask).ok()
    }
}

fn clamp<R: RangeBounds<u64>>(range: &R, start: u64, end: u64, len: u64) -> (u64, u64) {
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s.saturating_add(1),
        Bound::Unbounded => start,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e.saturating_add(1),
        Bound::Excluded(&e) => e,
        Bound::Unbounded => end,
    };
    (start.min(len), end.min(len))
}

impl FromStr for Netmask {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let block = match s.find('/') {
            Some(i) => Netmask::with_mask(&s[..i], &s[i + 1..])?,
            None => Netmask::new(ipv4::ip2long(s)?, MAX_LENGTH)?,
        };
        trace!("parsed {:?} as {}", s, block);
        Ok(block)
    }
}

impl Display for Netmask {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.base(), self.bitmask)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Block(Netmask),
    /// A single address, or a block when the text contains `/`.
    Text(&'a str),
    Long(u32),
}

impl Target<'_> {
    fn range(&self) -> Result<(u32, u32), ParseError> {
        match *self {
            Target::Block(block) => Ok((block.base, block.broadcast)),
            Target::Text(s) if s.contains('/') => {
                let block: Netmask = s.parse()?;
                Ok((block.base, block.broadcast))
            }
            Target::Text(s) => {
                let addr = ipv4::ip2long(s.trim())?;
                Ok((addr, addr))
            }
            Target::Long(addr) => Ok((addr, addr)),
        }
    }
}

impl From<Netmask> for Target<'_> {
    fn from(block: Netmask) -> Self {
        Target::Block(block)
    }
}

impl From<&Netmask> for Target<'_> {
    fn from(block: &Netmask) -> Self {
        Target::Block(*block)
    }
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(s: &'a str) -> Self {
        Target::Text(s)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(s: &'a String) -> Self {
        Target::Text(s)
    }
}

impl From<u32> for Target<'_> {
    fn from(addr: u32) -> Self {
        Target::Long(addr)
    }
}

impl From<Ipv4Addr> for Target<'_> {
    fn from(addr: Ipv4Addr) -> Self {
        Target::Long(u32::from(addr))
    }
}

/// Ascending addresses; clone to restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addrs {
    inner: Range<u64>,
}

impl Addrs {
    fn span(origin: u32, start: u64, end: u64) -> Self {
        let origin = u64::from(origin);
        Addrs {
            inner: origin + start..origin + end,
        }
    }
}

impl Iterator for Addrs {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Ipv4Addr> {
        self.inner.next().map(|a| long2ip(a as u32))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Addrs {
    fn next_back(&mut self) -> Option<Ipv4Addr> {
        self.inner.next_back().map(|a| long2ip(a as u32))
    }
}

impl ExactSizeIterator for Addrs {}
