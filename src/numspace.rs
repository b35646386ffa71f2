//!Generic closed-range set over a discrete ordered domain

use core::fmt;
use core::hash::Hash;
use core::marker::PhantomData;
use core::str::FromStr;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};

use crate::error::Error;

///Discrete totally ordered finite domain
pub trait Domain:
    Copy + Clone + fmt::Debug + fmt::Display + PartialEq + Eq + PartialOrd + Ord + Hash
    + FromStr + Send + Sync + 'static
{
    ///Smallest element
    const MIN: Self;
    ///Largest element
    const MAX: Self;

    ///Next element, `None` at the upper bound
    fn succ(self) -> Option<Self>;
    ///Previous element, `None` at the lower bound
    fn pred(self) -> Option<Self>;
}

macro_rules! impl_domain {
    ($($typ:ty),*) => {
        $(
            impl Domain for $typ {
                const MIN: Self = <$typ>::MIN;
                const MAX: Self = <$typ>::MAX;

                #[inline(always)]
                fn succ(self) -> Option<Self> {
                    self.checked_add(1)
                }

                #[inline(always)]
                fn pred(self) -> Option<Self> {
                    self.checked_sub(1)
                }
            }
        )*
    };
}

impl_domain!(u32, u64, u128);

///Closed range `[lo, hi]`
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Range<T> {
    lo: T,
    hi: T,
}

impl<T: Domain> Range<T> {
    ///Constructs a closed range, rejecting inverted bounds
    pub fn new(lo: T, hi: T) -> Result<Self, Error> {
        if lo > hi {
            Err(Error::InvertedRange {
                lo: lo.to_string(),
                hi: hi.to_string(),
            })
        } else {
            Ok(Self { lo, hi })
        }
    }

    #[inline(always)]
    ///Range holding a single value
    pub fn singleton(value: T) -> Self {
        Self { lo: value, hi: value }
    }

    #[inline(always)]
    ///Lower bound, inclusive
    pub fn lo(&self) -> T {
        self.lo
    }

    #[inline(always)]
    ///Upper bound, inclusive
    pub fn hi(&self) -> T {
        self.hi
    }

    #[inline(always)]
    ///Checks if `value` lies within the range
    pub fn contains(&self, value: T) -> bool {
        self.lo <= value && value <= self.hi
    }

    #[inline(always)]
    ///Checks if `other` lies entirely within the range
    pub fn encloses(&self, other: &Self) -> bool {
        self.lo <= other.lo && other.hi <= self.hi
    }
}

///Immutable set of closed, disjoint, non-adjacent ranges
///
///Always canonical: construction merges overlapping and adjacent input
///ranges and stores them in ascending order
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumberSpace<T> {
    ranges: Vec<Range<T>>,
}

///Set of 32-bit values (ports, VLANs, small protocol fields)
pub type IntegerSpace = NumberSpace<u32>;
///Set of 64-bit values (ASNs, IPv4 address ranges)
pub type LongSpace = NumberSpace<u64>;

//Merges sorted-by-lo ranges, fusing overlap and adjacency
fn normalize<T: Domain>(mut ranges: Vec<Range<T>>) -> Vec<Range<T>> {
    ranges.sort_unstable();
    let mut out: Vec<Range<T>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match out.last_mut() {
            Some(last) if range.lo <= last.hi || last.hi.succ() == Some(range.lo) => {
                if range.hi > last.hi {
                    last.hi = range.hi;
                }
            }
            _ => out.push(range),
        }
    }
    out
}

//Removes `removals` (canonical) from `base` (canonical)
fn subtract<T: Domain>(base: &[Range<T>], removals: &[Range<T>]) -> Vec<Range<T>> {
    let mut out = Vec::with_capacity(base.len());
    for range in base {
        let mut lo = range.lo;
        let mut alive = true;
        for removal in removals {
            if removal.hi < lo {
                continue;
            }
            if removal.lo > range.hi {
                break;
            }
            if removal.lo > lo {
                //removal.lo > lo >= MIN so pred always exists
                if let Some(hi) = removal.lo.pred() {
                    out.push(Range { lo, hi });
                }
            }
            if removal.hi >= range.hi {
                alive = false;
                break;
            }
            match removal.hi.succ() {
                Some(next) => lo = next,
                None => {
                    alive = false;
                    break;
                }
            }
        }
        if alive && lo <= range.hi {
            out.push(Range { lo, hi: range.hi });
        }
    }
    out
}

impl<T: Domain> NumberSpace<T> {
    ///The canonical empty space
    pub const fn empty() -> Self {
        Self { ranges: Vec::new() }
    }

    #[inline]
    ///Space holding a single value
    pub fn of(value: T) -> Self {
        Self {
            ranges: vec![Range::singleton(value)],
        }
    }

    #[inline]
    ///Space holding a single closed range
    pub fn of_range(range: Range<T>) -> Self {
        Self { ranges: vec![range] }
    }

    ///Starts a builder
    pub fn builder() -> Builder<T> {
        Builder {
            including: Vec::new(),
            excluding: Vec::new(),
        }
    }

    #[inline(always)]
    ///Canonical ranges in ascending order
    pub fn ranges(&self) -> &[Range<T>] {
        &self.ranges
    }

    #[inline(always)]
    ///Checks if no value is contained
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    #[inline]
    ///Checks if the space is empty or a single unbroken range
    pub fn is_contiguous(&self) -> bool {
        self.ranges.len() <= 1
    }

    #[inline]
    ///Checks if exactly one value is contained
    pub fn is_singleton(&self) -> bool {
        self.ranges.len() == 1 && self.ranges[0].lo == self.ranges[0].hi
    }

    #[inline]
    ///Returns the value if the space is a singleton
    pub fn singleton_value(&self) -> Option<T> {
        match self.ranges.as_slice() {
            [range] if range.lo == range.hi => Some(range.lo),
            _ => None,
        }
    }

    #[inline]
    ///Smallest contained value
    pub fn least(&self) -> Option<T> {
        self.ranges.first().map(|range| range.lo)
    }

    #[inline]
    ///Largest contained value
    pub fn greatest(&self) -> Option<T> {
        self.ranges.last().map(|range| range.hi)
    }

    ///Checks if `value` is contained
    pub fn contains(&self, value: T) -> bool {
        let idx = self.ranges.partition_point(|range| range.lo <= value);
        idx > 0 && self.ranges[idx - 1].hi >= value
    }

    ///Checks if every value of `other` is contained
    pub fn contains_space(&self, other: &Self) -> bool {
        let mut idx = 0;
        'outer: for needle in &other.ranges {
            while idx < self.ranges.len() {
                let range = &self.ranges[idx];
                if range.hi < needle.lo {
                    idx += 1;
                } else if range.encloses(needle) {
                    continue 'outer;
                } else {
                    return false;
                }
            }
            return false;
        }
        true
    }

    ///Union of both spaces
    pub fn union(&self, other: &Self) -> Self {
        let mut ranges = self.ranges.clone();
        ranges.extend_from_slice(&other.ranges);
        Self {
            ranges: normalize(ranges),
        }
    }

    ///Intersection of both spaces
    pub fn intersection(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let a = &self.ranges[i];
            let b = &other.ranges[j];
            let lo = if a.lo > b.lo { a.lo } else { b.lo };
            let hi = if a.hi < b.hi { a.hi } else { b.hi };
            if lo <= hi {
                out.push(Range { lo, hi });
            }
            if a.hi < b.hi {
                i += 1;
            } else {
                j += 1;
            }
        }
        Self { ranges: out }
    }

    ///Values of `self` not in `other`
    pub fn difference(&self, other: &Self) -> Self {
        Self {
            ranges: subtract(&self.ranges, &other.ranges),
        }
    }

    ///Values in exactly one of the two spaces
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        self.difference(other).union(&other.difference(self))
    }

    ///Complement bounded by this space's own span
    ///
    ///The empty space complements to itself
    pub fn not(&self) -> Self {
        match (self.least(), self.greatest()) {
            (Some(lo), Some(hi)) => Self {
                ranges: subtract(&[Range { lo, hi }], &self.ranges),
            },
            _ => Self::empty(),
        }
    }

    ///Complement bounded by an explicit universe
    pub fn not_within(&self, universe: &Self) -> Self {
        universe.difference(self)
    }

    ///Materializes every discrete value in ascending order
    ///
    ///Only valid for bounded, reasonably small spaces; callers needing
    ///bounded latency must bound input size
    pub fn enumerate(&self) -> Vec<T> {
        let mut out = Vec::new();
        for range in &self.ranges {
            let mut value = range.lo;
            loop {
                out.push(value);
                if value == range.hi {
                    break;
                }
                match value.succ() {
                    Some(next) => value = next,
                    None => break,
                }
            }
        }
        out
    }
}

impl<T: Domain> Default for NumberSpace<T> {
    #[inline(always)]
    fn default() -> Self {
        Self::empty()
    }
}

///Accumulates including and excluding ranges, resolved at `build()`
///
///Not thread-safe; intended for single-threaded assembly before the
///immutable space is published
#[derive(Debug, Clone)]
pub struct Builder<T> {
    including: Vec<Range<T>>,
    excluding: Vec<Range<T>>,
}

impl<T: Domain> Builder<T> {
    #[inline]
    ///Adds a single value to the included set
    pub fn including(mut self, value: T) -> Self {
        self.including.push(Range::singleton(value));
        self
    }

    #[inline]
    ///Adds a closed range to the included set
    pub fn including_range(mut self, range: Range<T>) -> Self {
        self.including.push(range);
        self
    }

    #[inline]
    ///Adds every range of `space` to the included set
    pub fn including_space(mut self, space: &NumberSpace<T>) -> Self {
        self.including.extend_from_slice(&space.ranges);
        self
    }

    #[inline]
    ///Adds a single value to the excluded set
    pub fn excluding(mut self, value: T) -> Self {
        self.excluding.push(Range::singleton(value));
        self
    }

    #[inline]
    ///Adds a closed range to the excluded set
    pub fn excluding_range(mut self, range: Range<T>) -> Self {
        self.excluding.push(range);
        self
    }

    #[inline]
    ///Adds every range of `space` to the excluded set
    pub fn excluding_space(mut self, space: &NumberSpace<T>) -> Self {
        self.excluding.extend_from_slice(&space.ranges);
        self
    }

    ///Resolves `including \ excluding` into a canonical space
    pub fn build(self) -> NumberSpace<T> {
        let including = normalize(self.including);
        let excluding = normalize(self.excluding);
        NumberSpace {
            ranges: subtract(&including, &excluding),
        }
    }
}

impl<T: Domain> fmt::Display for NumberSpace<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for range in &self.ranges {
            if !first {
                fmt.write_str(",")?;
            }
            first = false;
            if range.lo == range.hi {
                write!(fmt, "{}", range.lo)?;
            } else {
                write!(fmt, "{}-{}", range.lo, range.hi)?;
            }
        }
        Ok(())
    }
}

impl<T: Domain> FromStr for NumberSpace<T> {
    type Err = Error;

    ///Parses a comma-joined list of `n` or `lo-hi` atoms
    ///
    ///A leading `!` marks the atom as excluded; all atoms feed one
    ///left-to-right builder pass, so exclusions subtract from the whole
    ///included union regardless of position
    fn from_str(text: &str) -> Result<Self, Error> {
        let mut builder = Self::builder();
        if text.trim().is_empty() {
            return Ok(builder.build());
        }
        for raw_atom in text.split(',') {
            let atom = raw_atom.trim();
            let (excluded, body) = match atom.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, atom),
            };
            let range = match body.split_once('-') {
                Some((lo, hi)) => {
                    let lo = lo.trim().parse::<T>().map_err(|_| Error::RangeAtom(atom.to_owned()))?;
                    let hi = hi.trim().parse::<T>().map_err(|_| Error::RangeAtom(atom.to_owned()))?;
                    Range::new(lo, hi)?
                }
                None => {
                    let value = body.trim().parse::<T>().map_err(|_| Error::RangeAtom(atom.to_owned()))?;
                    Range::singleton(value)
                }
            };
            builder = if excluded {
                builder.excluding_range(range)
            } else {
                builder.including_range(range)
            };
        }
        Ok(builder.build())
    }
}

impl<T: Domain> Serialize for NumberSpace<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: Domain> Deserialize<'de> for NumberSpace<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SpaceVisitor<T>(PhantomData<T>);

        impl<T: Domain> Visitor<'_> for SpaceVisitor<T> {
            type Value = NumberSpace<T>;

            fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt.write_str("a comma-joined list of numbers or lo-hi ranges")
            }

            fn visit_str<E: de::Error>(self, text: &str) -> Result<Self::Value, E> {
                text.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(SpaceVisitor(PhantomData))
    }
}
