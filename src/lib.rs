//! Address-space and range algebra for network configuration analysis
//!
//! Canonical, immutable representations of IPv4/IPv6 addresses, prefixes,
//! integer-valued field sets (ports, ASNs, VLANs) and ACL-style address
//! spaces, with set operations that always return a minimal canonical form,
//! plus bit tries for longest-prefix-match and prefix-range containment.

#![warn(missing_docs)]
#![allow(clippy::style)]

mod parser;
pub use parser::{parse_ip, ParseError};
mod error;
pub use error::Error;
pub mod base;
mod ip;
pub use ip::Ip;
mod ip6;
pub use ip6::Ip6;
mod prefix;
pub use prefix::{Prefix, Prefix4, Prefix6, PrefixRange, PrefixRange4, PrefixRange6, SubRange};
mod wildcard;
pub use wildcard::{Ip6Wildcard, IpWildcard, Wildcard};
mod numspace;
pub use numspace::{Builder as NumberSpaceBuilder, Domain, IntegerSpace, LongSpace, NumberSpace, Range};
mod space;
pub use space::{
    AclIp6SpaceLine, AclIpSpaceLine, AclLine, Action, Ip6Space, IpSpace, Space, SpaceBuilder,
};
mod trie;
pub use trie::{Prefix6Trie, PrefixTrie, PrefixTrieBase};
mod prefix_space;
pub use prefix_space::{Prefix6Space, PrefixSpace, PrefixSpaceBase};
mod intern;
pub use intern::Interner;
