//!Crate error type

use crate::parser::ParseError;

///Errors produced at the construction and parse boundaries
///
///Every variant is an input or programmer error surfaced immediately to the
///caller; there are no recoverable-failure paths inside the algebra itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    ///Malformed address text
    #[error(transparent)]
    Parse(#[from] ParseError),
    ///Prefix length exceeds the address width
    #[error("invalid prefix length /{len}, maximum is /{max}")]
    PrefixLength {
        ///Requested length
        len: u8,
        ///Address width in bits
        max: u8,
    },
    ///Range lower bound exceeds upper bound
    #[error("invalid range: lower bound {lo} is greater than upper bound {hi}")]
    InvertedRange {
        ///Lower bound rendered as text
        lo: String,
        ///Upper bound rendered as text
        hi: String,
    },
    ///Range atom inside a number-space literal is malformed
    #[error("invalid range atom '{0}'")]
    RangeAtom(String),
    ///Wildcard text is not `ip`, `prefix` or `ip:mask`
    #[error("invalid wildcard '{0}'")]
    Wildcard(String),
    ///Wildcard mask has interleaved care/wild bits and cannot form a prefix
    #[error("wildcard mask {0} is not a valid prefix mask")]
    NonPrefixMask(String),
    ///Address family of the parsed text does not match the expected type
    #[error("expected an IPv{expected} address in '{text}'")]
    WrongFamily {
        ///Expected IP version
        expected: u8,
        ///Offending input
        text: String,
    },
}
