//!IPv4 address module

use core::fmt;
use core::net;
use core::str::FromStr;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};

use crate::base::Address;
use crate::error::Error;
use crate::parser::{parse_ip, ParseError};

///Legacy textual form of the auto/none sentinel kept for serialized data
const AUTO_STR: &str = "AUTO/NONE(-1l)";

///Canonical IPv4 address value
///
///Backed by a signed 64-bit raw so the historical out-of-range sentinels
///remain representable. Ordinary parsing and arithmetic only ever produce
///raws in `0..=u32::MAX`; sentinels come from the dedicated constants or
///the legacy `AUTO/NONE(-1l)`/`INVALID_IP(<n>l)` textual forms.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ip {
    raw: i64,
}

impl Ip {
    ///Number of bits within the address
    pub const BITS: u8 = net::Ipv4Addr::BITS as u8;
    ///All-zero address
    pub const ZERO: Self = Self { raw: 0 };
    ///All-one address
    pub const MAX: Self = Self { raw: u32::MAX as i64 };
    ///Auto/none sentinel, numerically -1
    pub const AUTO: Self = Self { raw: -1 };

    #[inline(always)]
    ///Creates address from its numeric value
    pub const fn create(bits: u32) -> Self {
        Self { raw: bits as i64 }
    }

    ///Parses address from dotted decimal text
    ///
    ///Accepts the legacy sentinel forms `AUTO/NONE(-1l)` and
    ///`INVALID_IP(<n>l)` for compatibility with old serialized data
    pub fn parse(text: &str) -> Result<Self, Error> {
        if text == AUTO_STR {
            return Ok(Self::AUTO);
        }
        if let Some(inner) = text.strip_prefix("INVALID_IP(").and_then(|rest| rest.strip_suffix("l)")) {
            let raw = inner.parse::<i64>().map_err(|_| Error::Parse(ParseError::InvalidIp))?;
            return Ok(Self { raw });
        }
        match parse_ip(text)? {
            (net::IpAddr::V4(addr), None) => Ok(Self::create(addr.to_bits())),
            (_, Some(_)) => Err(Error::Parse(ParseError::UnexpectedCharacter('/', text.find('/').unwrap_or(0)))),
            _ => Err(Error::WrongFamily {
                expected: 4,
                text: text.to_owned(),
            }),
        }
    }

    #[inline(always)]
    ///Returns the raw numeric value, sentinel-capable
    pub const fn as_long(self) -> i64 {
        self.raw
    }

    #[inline(always)]
    ///Returns the 32-bit numeric value, meaningful for valid addresses only
    pub const fn to_bits(self) -> u32 {
        self.raw as u32
    }

    #[inline(always)]
    ///Whether the raw value lies within the 32-bit address range
    pub const fn is_valid(self) -> bool {
        self.raw >= 0 && self.raw <= u32::MAX as i64
    }

    ///Number of network bits implied when this address is a subnet mask
    ///
    ///Trailing zero bits are capped at the address width; `255.255.255.0`
    ///yields 24, `0.0.0.0` yields 0
    pub fn num_subnet_bits(self) -> u8 {
        let host_bits = self.to_bits().trailing_zeros().min(u32::from(Self::BITS)) as u8;
        Self::BITS - host_bits
    }
}

impl Address for Ip {
    const BITS_LEN: u8 = Self::BITS;
    const ZERO: Self = Self::ZERO;
    const ALL_ONES: Self = Self::MAX;
    const VERSION: u8 = 4;

    type Num = u64;

    #[inline(always)]
    fn to_num(self) -> u64 {
        self.to_bits() as u64
    }

    #[inline(always)]
    fn from_num(num: u64) -> Self {
        Self::create(num as u32)
    }

    #[inline(always)]
    fn to_u128(self) -> u128 {
        self.to_bits() as u128
    }

    #[inline(always)]
    fn from_u128(bits: u128) -> Self {
        Self::create(bits as u32)
    }
}

impl fmt::Display for Ip {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw == -1 {
            fmt.write_str(AUTO_STR)
        } else if !self.is_valid() {
            fmt.write_fmt(format_args!("INVALID_IP({}l)", self.raw))
        } else {
            fmt::Display::fmt(&net::Ipv4Addr::from_bits(self.to_bits()), fmt)
        }
    }
}

impl fmt::Debug for Ip {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, fmt)
    }
}

impl FromStr for Ip {
    type Err = Error;

    #[inline(always)]
    fn from_str(text: &str) -> Result<Self, Error> {
        Self::parse(text)
    }
}

impl From<net::Ipv4Addr> for Ip {
    #[inline(always)]
    fn from(addr: net::Ipv4Addr) -> Self {
        Self::create(addr.to_bits())
    }
}

impl From<Ip> for net::Ipv4Addr {
    #[inline(always)]
    fn from(ip: Ip) -> Self {
        net::Ipv4Addr::from_bits(ip.to_bits())
    }
}

impl Serialize for Ip {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ip {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IpVisitor;

        impl Visitor<'_> for IpVisitor {
            type Value = Ip;

            fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt.write_str("a dotted decimal IPv4 address")
            }

            fn visit_str<E: de::Error>(self, text: &str) -> Result<Ip, E> {
                Ip::parse(text).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(IpVisitor)
    }
}
