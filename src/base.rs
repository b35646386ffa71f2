//!Base module

use core::fmt;
use core::hash::Hash;
use core::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Error;
use crate::numspace::Domain;

///Address trait
///
///Abstracts over the two address families so that prefixes, wildcards,
///spaces and tries are written once. Bit index 0 is the most significant
///bit, matching prefix length semantics.
pub trait Address:
    Clone + Copy + fmt::Debug + fmt::Display + PartialEq + Eq + PartialOrd + Ord + Hash
    + FromStr<Err = Error> + Serialize + DeserializeOwned + Send + Sync + 'static
{
    ///Max possible length of the address in bits
    const BITS_LEN: u8;
    ///All-zero address
    const ZERO: Self;
    ///All-one address
    const ALL_ONES: Self;
    ///IP version number used in error reporting
    const VERSION: u8;

    ///Scalar type backing range-based spaces over this family
    type Num: Domain;

    ///Returns the numeric value as the range scalar
    fn to_num(self) -> Self::Num;
    ///Builds an address back from the range scalar
    fn from_num(num: Self::Num) -> Self;

    ///Returns the numeric value widened to 128 bits
    fn to_u128(self) -> u128;
    ///Builds an address from the low bits of a 128-bit value
    fn from_u128(bits: u128) -> Self;

    #[inline]
    ///Returns bitwise complement within the address width
    fn inverted(self) -> Self {
        let width_mask = if Self::BITS_LEN == 128 {
            u128::MAX
        } else {
            (1u128 << Self::BITS_LEN) - 1
        };
        Self::from_u128(!self.to_u128() & width_mask)
    }

    #[inline]
    ///Returns the network address with host bits beyond `len` zeroed
    fn network_address(self, len: u8) -> Self {
        debug_assert!(len <= Self::BITS_LEN);
        if len == 0 {
            return Self::ZERO;
        }
        let host_bits = (Self::BITS_LEN - len) as u32;
        let mask = if host_bits == 128 {
            0
        } else {
            u128::MAX << host_bits & Self::ALL_ONES.to_u128()
        };
        Self::from_u128(self.to_u128() & mask)
    }

    #[inline]
    ///Returns the highest address sharing the first `len` bits
    fn subnet_max(self, len: u8) -> Self {
        debug_assert!(len <= Self::BITS_LEN);
        let host_bits = (Self::BITS_LEN - len) as u32;
        let host_mask = if host_bits == 128 {
            u128::MAX
        } else {
            (1u128 << host_bits) - 1
        };
        Self::from_u128(self.to_u128() | host_mask)
    }

    #[inline]
    ///Returns the bit at `index` counting from the most significant bit
    fn bit(self, index: u8) -> bool {
        debug_assert!(index < Self::BITS_LEN);
        (self.to_u128() >> (Self::BITS_LEN - 1 - index)) & 1 == 1
    }

    #[inline]
    ///Bitwise AND of two addresses
    fn and(self, other: Self) -> Self {
        Self::from_u128(self.to_u128() & other.to_u128())
    }

    #[inline]
    ///Bitwise OR of two addresses
    fn or(self, other: Self) -> Self {
        Self::from_u128(self.to_u128() | other.to_u128())
    }
}
