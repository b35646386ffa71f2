//!Wildcard module

use core::fmt;
use core::marker::PhantomData;
use core::str::FromStr;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};

use crate::base::Address;
use crate::error::Error;
use crate::ip::Ip;
use crate::ip6::Ip6;
use crate::prefix::Prefix;

///Address plus wildcard mask pattern
///
///A set bit in the mask means "don't care". The stored address is
///normalized with every wild bit zeroed so equal patterns compare equal
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wildcard<A> {
    addr: A,
    mask: A,
}

///IPv4 wildcard
pub type IpWildcard = Wildcard<Ip>;
///IPv6 wildcard
pub type Ip6Wildcard = Wildcard<Ip6>;

impl<A: Address> Wildcard<A> {
    ///Constructs a wildcard from an address and a wildcard mask
    pub fn new(addr: A, mask: A) -> Self {
        Self {
            addr: addr.and(mask.inverted()),
            mask,
        }
    }

    #[inline]
    ///Wildcard matching exactly one address
    pub fn from_ip(addr: A) -> Self {
        Self::new(addr, A::ZERO)
    }

    #[inline]
    ///Wildcard matching exactly the addresses of `prefix`
    pub fn from_prefix(prefix: Prefix<A>) -> Self {
        Self::new(prefix.start_ip(), prefix.prefix_wildcard())
    }

    #[inline(always)]
    ///Care-bit address with wild bits zeroed
    pub fn addr(&self) -> A {
        self.addr
    }

    #[inline(always)]
    ///Wildcard mask, set bits are wild
    pub fn mask(&self) -> A {
        self.mask
    }

    #[inline]
    ///Checks if `addr` matches the pattern
    pub fn contains_ip(&self, addr: A) -> bool {
        addr.and(self.mask.inverted()) == self.addr
    }

    ///Whether the wild bits form a contiguous low run, i.e. a prefix
    pub fn is_prefix(&self) -> bool {
        let mask = self.mask.to_u128();
        mask & mask.wrapping_add(1) == 0
    }

    ///Converts to the equivalent prefix
    ///
    ///Fails when the mask has interleaved care and wild bits
    pub fn to_prefix(&self) -> Result<Prefix<A>, Error> {
        if !self.is_prefix() {
            return Err(Error::NonPrefixMask(self.mask.to_string()));
        }
        let wild_bits = (u128::BITS - self.mask.to_u128().leading_zeros()) as u8;
        Prefix::new(self.addr, A::BITS_LEN - wild_bits)
    }
}

impl<A: Address> fmt::Display for Wildcard<A> {
    ///Bare `ip` for an exact match, `prefix` form when the mask is a
    ///valid prefix wildcard, `ip:mask` otherwise
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mask == A::ZERO {
            fmt::Display::fmt(&self.addr, fmt)
        } else if self.is_prefix() {
            match self.to_prefix() {
                Ok(prefix) => fmt::Display::fmt(&prefix, fmt),
                Err(_) => write!(fmt, "{}:{}", self.addr, self.mask),
            }
        } else {
            write!(fmt, "{}:{}", self.addr, self.mask)
        }
    }
}

impl<A: Address> fmt::Debug for Wildcard<A> {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, fmt)
    }
}

impl<A: Address> FromStr for Wildcard<A> {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Error> {
        if let Some((addr, mask)) = text.split_once(':') {
            //Reject IPv6 text misread as ip:mask by requiring both halves parse
            if let (Ok(addr), Ok(mask)) = (A::from_str(addr), A::from_str(mask)) {
                return Ok(Self::new(addr, mask));
            }
        }
        if let Ok(addr) = A::from_str(text) {
            return Ok(Self::from_ip(addr));
        }
        if let Ok(prefix) = Prefix::<A>::from_str(text) {
            return Ok(Self::from_prefix(prefix));
        }
        Err(Error::Wildcard(text.to_owned()))
    }
}

impl<A: Address> Serialize for Wildcard<A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, A: Address> Deserialize<'de> for Wildcard<A> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WildcardVisitor<A>(PhantomData<A>);

        impl<A: Address> Visitor<'_> for WildcardVisitor<A> {
            type Value = Wildcard<A>;

            fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt.write_str("a wildcard in ip, prefix or ip:mask form")
            }

            fn visit_str<E: de::Error>(self, text: &str) -> Result<Self::Value, E> {
                text.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(WildcardVisitor(PhantomData))
    }
}
