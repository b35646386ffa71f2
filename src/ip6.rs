//!IPv6 address module

use core::fmt;
use core::net;
use core::str::FromStr;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};

use crate::base::Address;
use crate::error::Error;

///Canonical IPv6 address value
///
///Unlike [Ip](crate::Ip) there are no legacy sentinel forms; every 128-bit
///value is a valid address
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ip6 {
    bits: u128,
}

impl Ip6 {
    ///Number of bits within the address
    pub const BITS: u8 = net::Ipv6Addr::BITS as u8;
    ///All-zero address
    pub const ZERO: Self = Self { bits: 0 };
    ///All-one address
    pub const MAX: Self = Self { bits: u128::MAX };

    #[inline(always)]
    ///Creates address from its numeric value
    pub const fn create(bits: u128) -> Self {
        Self { bits }
    }

    ///Parses address from colon-separated hextet text
    pub fn parse(text: &str) -> Result<Self, Error> {
        match crate::parser::parse_ip(text)? {
            (net::IpAddr::V6(addr), None) => Ok(Self::create(addr.to_bits())),
            (_, Some(_)) => Err(Error::Parse(crate::parser::ParseError::UnexpectedCharacter('/', text.find('/').unwrap_or(0)))),
            _ => Err(Error::WrongFamily {
                expected: 6,
                text: text.to_owned(),
            }),
        }
    }

    #[inline(always)]
    ///Returns the 128-bit numeric value
    pub const fn to_bits(self) -> u128 {
        self.bits
    }

    ///Number of network bits implied when this address is a subnet mask
    pub fn num_subnet_bits(self) -> u8 {
        let host_bits = self.bits.trailing_zeros().min(u32::from(Self::BITS)) as u8;
        Self::BITS - host_bits
    }
}

impl Address for Ip6 {
    const BITS_LEN: u8 = Self::BITS;
    const ZERO: Self = Self::ZERO;
    const ALL_ONES: Self = Self::MAX;
    const VERSION: u8 = 6;

    type Num = u128;

    #[inline(always)]
    fn to_num(self) -> u128 {
        self.bits
    }

    #[inline(always)]
    fn from_num(num: u128) -> Self {
        Self::create(num)
    }

    #[inline(always)]
    fn to_u128(self) -> u128 {
        self.bits
    }

    #[inline(always)]
    fn from_u128(bits: u128) -> Self {
        Self::create(bits)
    }
}

impl fmt::Display for Ip6 {
    #[inline(always)]
    //RFC 5952 zero compression comes with the std formatter
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&net::Ipv6Addr::from_bits(self.bits), fmt)
    }
}

impl fmt::Debug for Ip6 {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, fmt)
    }
}

impl FromStr for Ip6 {
    type Err = Error;

    #[inline(always)]
    fn from_str(text: &str) -> Result<Self, Error> {
        Self::parse(text)
    }
}

impl From<net::Ipv6Addr> for Ip6 {
    #[inline(always)]
    fn from(addr: net::Ipv6Addr) -> Self {
        Self::create(addr.to_bits())
    }
}

impl From<Ip6> for net::Ipv6Addr {
    #[inline(always)]
    fn from(ip: Ip6) -> Self {
        net::Ipv6Addr::from_bits(ip.to_bits())
    }
}

impl Serialize for Ip6 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ip6 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Ip6Visitor;

        impl Visitor<'_> for Ip6Visitor {
            type Value = Ip6;

            fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt.write_str("a colon-separated IPv6 address")
            }

            fn visit_str<E: de::Error>(self, text: &str) -> Result<Ip6, E> {
                Ip6::parse(text).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(Ip6Visitor)
    }
}
