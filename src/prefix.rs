//!Prefix module

use core::fmt;
use core::marker::PhantomData;
use core::str::FromStr;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};

use crate::base::Address;
use crate::error::Error;
use crate::ip::Ip;
use crate::ip6::Ip6;
use crate::space::Space;

///Network prefix: address plus length, normalized to the network address
///
///Ordering is by address first, then ascending length
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prefix<A> {
    addr: A,
    len: u8,
}

///IPv4 prefix
pub type Prefix4 = Prefix<Ip>;
///IPv6 prefix
pub type Prefix6 = Prefix<Ip6>;

impl<A: Address> Prefix<A> {
    ///Constructs a prefix, zeroing host bits beyond `len`
    ///
    ///Fails if `len` exceeds the address width
    pub fn new(addr: A, len: u8) -> Result<Self, Error> {
        if len > A::BITS_LEN {
            return Err(Error::PrefixLength {
                len,
                max: A::BITS_LEN,
            });
        }
        Ok(Self {
            addr: addr.network_address(len),
            len,
        })
    }

    #[inline(always)]
    ///The prefix covering the entire address space
    pub fn zero() -> Self {
        Self {
            addr: A::ZERO,
            len: 0,
        }
    }

    #[inline(always)]
    ///Network address, lowest address within the prefix
    pub fn start_ip(&self) -> A {
        self.addr
    }

    #[inline(always)]
    ///Highest address within the prefix, host bits all set
    pub fn end_ip(&self) -> A {
        self.addr.subnet_max(self.len)
    }

    #[inline(always)]
    ///Prefix length
    pub fn len(&self) -> u8 {
        self.len
    }

    #[inline]
    ///Network mask with the first `len` bits set
    pub fn mask(&self) -> A {
        self.prefix_wildcard().inverted()
    }

    #[inline]
    ///Wildcard mask with exactly the host bits set
    pub fn prefix_wildcard(&self) -> A {
        A::ZERO.subnet_max(self.len)
    }

    #[inline]
    ///Checks if `addr` lies within the prefix
    pub fn contains_ip(&self, addr: A) -> bool {
        self.start_ip() <= addr && addr <= self.end_ip()
    }

    #[inline]
    ///Checks if `other` lies entirely within the prefix
    pub fn contains_prefix(&self, other: &Self) -> bool {
        self.len <= other.len && self.contains_ip(other.start_ip())
    }

    ///Converts into the minimal address-space form
    ///
    ///`/0` collapses to the universe, a full-length prefix to its single
    ///address
    pub fn to_ip_space(self) -> Space<A> {
        if self.len == 0 {
            Space::Universe
        } else if self.len == A::BITS_LEN {
            Space::Addr(self.addr)
        } else {
            Space::Prefix(self)
        }
    }

    ///Address space of the usable host addresses within the prefix
    ///
    ///Excludes the network and broadcast address except for the two
    ///longest lengths, which RFC 3021 treats as entirely host space
    pub fn to_host_ip_space(self) -> Space<A> {
        if self.len >= A::BITS_LEN - 1 {
            self.to_ip_space()
        } else {
            Space::builder()
                .then_rejecting([Space::Addr(self.start_ip())])
                .then_rejecting([Space::Addr(self.end_ip())])
                .then_permitting([Space::Prefix(self)])
                .build()
        }
    }
}

impl<A: Address> fmt::Display for Prefix<A> {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { addr, len } = self;
        fmt.write_fmt(format_args!("{addr}/{len}"))
    }
}

impl<A: Address> fmt::Debug for Prefix<A> {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, fmt)
    }
}

impl<A: Address> FromStr for Prefix<A> {
    type Err = Error;

    ///Parses `addr/len`; a missing `/len` is read as the full address width
    fn from_str(text: &str) -> Result<Self, Error> {
        if let Ok(addr) = A::from_str(text) {
            return Self::new(addr, A::BITS_LEN);
        }
        match text.split_once('/') {
            Some((addr, len)) => {
                let addr = A::from_str(addr)?;
                let len = len
                    .parse::<u8>()
                    .map_err(|_| Error::Parse(crate::parser::ParseError::InvalidPrefixLen(len.to_owned())))?;
                Self::new(addr, len)
            }
            None => Err(Error::Parse(crate::parser::ParseError::InvalidIp)),
        }
    }
}

impl<A: Address> Serialize for Prefix<A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, A: Address> Deserialize<'de> for Prefix<A> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PrefixVisitor<A>(PhantomData<A>);

        impl<A: Address> Visitor<'_> for PrefixVisitor<A> {
            type Value = Prefix<A>;

            fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt.write_str("a prefix in addr/len form")
            }

            fn visit_str<E: de::Error>(self, text: &str) -> Result<Self::Value, E> {
                text.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(PrefixVisitor(PhantomData))
    }
}

///Inclusive sub-range of prefix lengths
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubRange {
    start: u8,
    end: u8,
}

impl SubRange {
    ///Constructs an inclusive length range, rejecting inverted bounds
    pub fn new(start: u8, end: u8) -> Result<Self, Error> {
        if start > end {
            Err(Error::InvertedRange {
                lo: start.to_string(),
                hi: end.to_string(),
            })
        } else {
            Ok(Self { start, end })
        }
    }

    #[inline(always)]
    ///Range holding a single length
    pub const fn singleton(len: u8) -> Self {
        Self { start: len, end: len }
    }

    #[inline(always)]
    ///Lower bound, inclusive
    pub const fn start(&self) -> u8 {
        self.start
    }

    #[inline(always)]
    ///Upper bound, inclusive
    pub const fn end(&self) -> u8 {
        self.end
    }

    #[inline(always)]
    ///Checks if `len` lies within the range
    pub const fn contains(&self, len: u8) -> bool {
        self.start <= len && len <= self.end
    }

    #[inline(always)]
    ///Checks if `other` lies entirely within the range
    pub const fn encloses(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for SubRange {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(fmt, "{}", self.start)
        } else {
            write!(fmt, "{}-{}", self.start, self.end)
        }
    }
}

///Prefix plus an allowed sub-range of match lengths
///
///The prefix-list style predicate: matches any prefix lying under
///`prefix` whose own length falls within `lengths`
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrefixRange<A> {
    prefix: Prefix<A>,
    lengths: SubRange,
}

///IPv4 prefix range
pub type PrefixRange4 = PrefixRange<Ip>;
///IPv6 prefix range
pub type PrefixRange6 = PrefixRange<Ip6>;

impl<A: Address> PrefixRange<A> {
    ///Constructs a prefix range, rejecting lengths beyond the address width
    pub fn new(prefix: Prefix<A>, lengths: SubRange) -> Result<Self, Error> {
        if lengths.end > A::BITS_LEN {
            return Err(Error::PrefixLength {
                len: lengths.end,
                max: A::BITS_LEN,
            });
        }
        Ok(Self { prefix, lengths })
    }

    #[inline]
    ///Degenerate range matching exactly `prefix`
    pub fn from_prefix(prefix: Prefix<A>) -> Self {
        Self {
            lengths: SubRange::singleton(prefix.len()),
            prefix,
        }
    }

    #[inline(always)]
    ///The covering prefix
    pub fn prefix(&self) -> Prefix<A> {
        self.prefix
    }

    #[inline(always)]
    ///The allowed match lengths
    pub fn lengths(&self) -> SubRange {
        self.lengths
    }

    ///Checks if every prefix matched by `other` is also matched by `self`
    pub fn includes(&self, other: &Self) -> bool {
        self.prefix.contains_prefix(&other.prefix) && self.lengths.encloses(&other.lengths)
    }
}

impl<A: Address> fmt::Display for PrefixRange<A> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}:{}", self.prefix, self.lengths)
    }
}

impl<A: Address> fmt::Debug for PrefixRange<A> {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, fmt)
    }
}
