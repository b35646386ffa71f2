//!Polymorphic address-space algebra

use serde::{Deserialize, Serialize};

use crate::base::Address;
use crate::ip::Ip;
use crate::ip6::Ip6;
use crate::numspace::{NumberSpace, Range};
use crate::prefix::Prefix;
use crate::wildcard::Wildcard;

///Line action of an ACL-style composite space
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    ///Line admits the address into the space
    Permit,
    ///Line excludes the address from the space
    Deny,
}

///Ordered `(action, subspace)` line, evaluated first-match
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct AclLine<A: Address> {
    action: Action,
    #[serde(rename = "ipSpace")]
    space: Space<A>,
}

///IPv4 ACL line
pub type AclIpSpaceLine = AclLine<Ip>;
///IPv6 ACL line
pub type AclIp6SpaceLine = AclLine<Ip6>;

impl<A: Address> AclLine<A> {
    #[inline]
    ///Permit line over `space`
    pub fn permitting(space: Space<A>) -> Self {
        Self {
            action: Action::Permit,
            space,
        }
    }

    #[inline]
    ///Deny line over `space`
    pub fn rejecting(space: Space<A>) -> Self {
        Self {
            action: Action::Deny,
            space,
        }
    }

    #[inline(always)]
    ///Line action
    pub fn action(&self) -> Action {
        self.action
    }

    #[inline(always)]
    ///Line subspace
    pub fn space(&self) -> &Space<A> {
        &self.space
    }
}

///Set of addresses in canonical minimal form
///
///Every combinator returns a new canonical value; instances are shared
///immutable value objects. Comparisons between different variants follow
///variant declaration order; within a variant the order is lexicographic
///over the payload, so ACL composites compare line by line.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase", bound = "")]
pub enum Space<A: Address> {
    ///All addresses
    Universe,
    ///No addresses
    Empty,
    ///A single address
    #[serde(rename = "ip")]
    Addr(A),
    ///Addresses matching a wildcard pattern
    Wildcard(Wildcard<A>),
    ///Addresses within a prefix
    Prefix(Prefix<A>),
    ///Addresses within a set of numeric ranges
    Ranges(NumberSpace<A::Num>),
    ///Ordered first-match ACL lines with implicit deny-all at the end
    ///
    ///Never holds fewer than 2 lines and never ends in a deny line; the
    ///builder collapses degenerate composites to simpler variants
    Acl(Vec<AclLine<A>>),
}

///IPv4 address space
pub type IpSpace = Space<Ip>;
///IPv6 address space
pub type Ip6Space = Space<Ip6>;

//Number space covering every address of the family
fn full_domain<A: Address>() -> NumberSpace<A::Num> {
    match Range::new(A::ZERO.to_num(), A::ALL_ONES.to_num()) {
        Ok(range) => NumberSpace::of_range(range),
        //ZERO <= ALL_ONES always holds
        Err(_) => NumberSpace::empty(),
    }
}

impl<A: Address> Space<A> {
    ///Starts an ACL-style line builder
    pub fn builder() -> SpaceBuilder<A> {
        SpaceBuilder {
            lines: Vec::new(),
            full: false,
        }
    }

    ///Checks if `addr` belongs to the space
    pub fn contains(&self, addr: A) -> bool {
        match self {
            Self::Universe => true,
            Self::Empty => false,
            Self::Addr(single) => *single == addr,
            Self::Wildcard(wildcard) => wildcard.contains_ip(addr),
            Self::Prefix(prefix) => prefix.contains_ip(addr),
            Self::Ranges(ranges) => ranges.contains(addr.to_num()),
            Self::Acl(lines) => {
                for line in lines {
                    if line.space.contains(addr) {
                        return line.action == Action::Permit;
                    }
                }
                false
            }
        }
    }

    ///Complement of the space, in canonical minimal form
    pub fn complement(&self) -> Self {
        match self {
            Self::Universe => Self::Empty,
            Self::Empty => Self::Universe,
            Self::Ranges(ranges) => Self::Ranges(ranges.not_within(&full_domain::<A>())),
            //A two-line "deny X, permit everything else" complements to X
            //without another wrapping layer
            Self::Acl(lines)
                if lines.len() == 2
                    && lines[0].action == Action::Deny
                    && lines[1] == AclLine::permitting(Self::Universe) =>
            {
                lines[0].space.clone()
            }
            other => Self::builder()
                .then_rejecting([other.clone()])
                .then_permitting([Self::Universe])
                .build(),
        }
    }

    ///Union over nullable operands
    ///
    ///`None` operands mean "no constraint"; when every operand is `None`
    ///the union is `None` as well, distinct from the empty space. Operands
    ///that are pure-permit composites are flattened so nested unions
    ///associate flat.
    pub fn union<I: IntoIterator<Item = Option<Self>>>(spaces: I) -> Option<Self> {
        let mut present = Vec::new();
        let mut any = false;
        for space in spaces {
            let Some(space) = space else { continue };
            any = true;
            match space {
                Self::Acl(lines) if lines.iter().all(|line| line.action == Action::Permit) => {
                    present.extend(lines.into_iter().map(|line| line.space));
                }
                other => present.push(other),
            }
        }
        if !any {
            return None;
        }
        if present.iter().any(|space| matches!(space, Self::Universe)) {
            return Some(Self::Universe);
        }
        if present.len() > 1 && present.iter().all(|space| matches!(space, Self::Ranges(_))) {
            let mut acc = NumberSpace::empty();
            for space in &present {
                if let Self::Ranges(ranges) = space {
                    acc = acc.union(ranges);
                }
            }
            return Some(Self::Ranges(acc));
        }
        Some(Self::builder().then_permitting(present).build())
    }

    ///Intersection over nullable operands
    ///
    ///`None` operands are dropped; all-`None` yields `None`. `Universe` is
    ///the identity element, any `Empty` operand collapses the result, and
    ///the general case is the De Morgan construction rejecting every
    ///operand's complement before permitting the universe.
    pub fn intersection<I: IntoIterator<Item = Option<Self>>>(spaces: I) -> Option<Self> {
        let mut present = Vec::new();
        let mut any = false;
        for space in spaces {
            let Some(space) = space else { continue };
            any = true;
            if !matches!(space, Self::Universe) {
                present.push(space);
            }
        }
        if !any {
            return None;
        }
        if present.iter().any(|space| matches!(space, Self::Empty)) {
            return Some(Self::Empty);
        }
        if present.len() > 1 && present.iter().all(|space| matches!(space, Self::Ranges(_))) {
            let mut acc = full_domain::<A>();
            for space in &present {
                if let Self::Ranges(ranges) = space {
                    acc = acc.intersection(ranges);
                }
            }
            return Some(Self::Ranges(acc));
        }
        match present.len() {
            0 => Some(Self::Universe),
            1 => present.pop(),
            _ => {
                let mut builder = Self::builder();
                for space in present {
                    builder = builder.then_rejecting([space.complement()]);
                }
                Some(builder.then_permitting([Self::Universe]).build())
            }
        }
    }

    ///Difference `a \ b` over nullable operands
    ///
    ///`a = b = None` yields `None`; `b = None` yields `a`; a missing `a`
    ///is read as the universe
    pub fn difference(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (a, None) => a,
            (Some(Self::Empty), Some(_)) => Some(Self::Empty),
            (Some(Self::Ranges(a)), Some(Self::Ranges(b))) => Some(Self::Ranges(a.difference(&b))),
            (a, Some(b)) => Some(
                Self::builder()
                    .then_rejecting([b])
                    .then_permitting([a.unwrap_or(Self::Universe)])
                    .build(),
            ),
        }
    }
}

///Ordered ACL line builder with build-time canonicalization
///
///Not thread-safe; assemble on one thread and publish the immutable result
#[derive(Debug, Clone)]
pub struct SpaceBuilder<A: Address> {
    lines: Vec<AclLine<A>>,
    full: bool,
}

impl<A: Address> SpaceBuilder<A> {
    ///Appends a line
    ///
    ///No-op once a universe line made the space full, and for lines over
    ///the empty space; appending a universe line makes every later call a
    ///no-op since nothing after it is reachable
    pub fn then(mut self, line: AclLine<A>) -> Self {
        if self.full || matches!(line.space, Space::Empty) {
            return self;
        }
        if matches!(line.space, Space::Universe) {
            self.full = true;
        }
        self.lines.push(line);
        self
    }

    ///Appends permit lines over `spaces`
    pub fn then_permitting<I: IntoIterator<Item = Space<A>>>(mut self, spaces: I) -> Self {
        for space in spaces {
            self = self.then(AclLine::permitting(space));
        }
        self
    }

    ///Appends deny lines over `spaces`
    pub fn then_rejecting<I: IntoIterator<Item = Space<A>>>(mut self, spaces: I) -> Self {
        for space in spaces {
            self = self.then(AclLine::rejecting(space));
        }
        self
    }

    ///Canonicalizes into the minimal space
    ///
    ///Trailing deny lines are semantically inert and trimmed; zero lines
    ///collapse to the empty space and a lone permit line to its subspace
    pub fn build(mut self) -> Space<A> {
        while matches!(self.lines.last(), Some(line) if line.action == Action::Deny) {
            self.lines.pop();
        }
        match self.lines.len() {
            0 => Space::Empty,
            1 => match self.lines.pop() {
                Some(line) => line.space,
                None => Space::Empty,
            },
            _ => Space::Acl(self.lines),
        }
    }
}
