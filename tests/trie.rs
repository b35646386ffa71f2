use core::str::FromStr;

use ip_space::{
    Ip, Ip6, Prefix4, Prefix6, Prefix6Trie, PrefixRange4, PrefixSpace, PrefixTrie, SubRange,
};

fn ip(text: &str) -> Ip {
    Ip::parse(text).expect("to parse ip")
}

fn prefix(text: &str) -> Prefix4 {
    Prefix4::from_str(text).expect("to parse prefix")
}

fn range(p: &str, lo: u8, hi: u8) -> PrefixRange4 {
    PrefixRange4::new(prefix(p), SubRange::new(lo, hi).expect("valid bounds"))
        .expect("valid range")
}

#[test]
fn should_find_longest_prefix_match() {
    let trie: PrefixTrie = [prefix("10.0.0.0/8"), prefix("10.1.0.0/16")]
        .into_iter()
        .collect();

    assert_eq!(trie.longest_prefix_match(ip("10.1.2.3")), Some(prefix("10.1.0.0/16")));
    assert_eq!(trie.longest_prefix_match(ip("10.2.2.3")), Some(prefix("10.0.0.0/8")));
    assert_eq!(trie.longest_prefix_match(ip("192.168.0.1")), None);
}

#[test]
fn should_handle_default_route_and_host_routes() {
    let mut trie = PrefixTrie::new();
    assert!(trie.is_empty());
    assert_eq!(trie.longest_prefix_match(ip("10.0.0.1")), None);

    trie.add(prefix("0.0.0.0/0"));
    assert!(!trie.is_empty());
    assert_eq!(trie.longest_prefix_match(ip("10.0.0.1")), Some(prefix("0.0.0.0/0")));

    trie.add(prefix("10.0.0.1/32"));
    assert_eq!(trie.longest_prefix_match(ip("10.0.0.1")), Some(prefix("10.0.0.1/32")));
    assert_eq!(trie.longest_prefix_match(ip("10.0.0.2")), Some(prefix("0.0.0.0/0")));
}

#[test]
fn should_list_prefixes_in_address_order() {
    let trie: PrefixTrie = [
        prefix("192.168.0.0/16"),
        prefix("10.0.0.0/8"),
        prefix("10.1.0.0/16"),
    ]
    .into_iter()
    .collect();
    let prefixes = trie.prefixes();
    assert_eq!(
        prefixes,
        vec![prefix("10.0.0.0/8"), prefix("10.1.0.0/16"), prefix("192.168.0.0/16")]
    );

    //Re-adding the same prefix replaces rather than duplicates
    let mut trie = trie;
    trie.add(prefix("10.0.0.0/8"));
    assert_eq!(trie.prefixes().len(), 3);
}

#[test]
fn should_answer_path_containment() {
    let trie: PrefixTrie = [prefix("10.0.0.0/8")].into_iter().collect();

    assert!(trie.contains_path_from_prefix(&prefix("10.0.0.0/8")));
    assert!(trie.contains_path_from_prefix(&prefix("10.1.0.0/16")));
    assert!(!trie.contains_path_from_prefix(&prefix("11.0.0.0/8")));
    //A strictly broader query does not pass through the stored node
    assert!(!trie.contains_path_from_prefix(&prefix("0.0.0.0/0")));
}

#[test]
fn should_match_ipv6_prefixes() {
    let p32 = Prefix6::from_str("2001:db8::/32").expect("to parse");
    let p48 = Prefix6::from_str("2001:db8:1::/48").expect("to parse");
    let trie: Prefix6Trie = [p32, p48].into_iter().collect();

    let addr = Ip6::parse("2001:db8:1::5").expect("to parse");
    assert_eq!(trie.longest_prefix_match(addr), Some(p48));
    let addr = Ip6::parse("2001:db8:2::5").expect("to parse");
    assert_eq!(trie.longest_prefix_match(addr), Some(p32));
    let addr = Ip6::parse("2001:db9::1").expect("to parse");
    assert_eq!(trie.longest_prefix_match(addr), None);
}

#[test]
fn should_answer_prefix_range_containment() {
    let mut space = PrefixSpace::new();
    assert!(space.is_empty());
    space.add_prefix_range(range("10.0.0.0/8", 8, 24));

    assert!(space.contains_prefix_range(&range("10.1.0.0/16", 16, 24)));
    assert!(space.contains_prefix(prefix("10.1.2.0/24")));
    assert!(space.contains_prefix(prefix("10.0.0.0/8")));
    assert!(!space.contains_prefix(prefix("10.0.0.1/32")));
    assert!(!space.contains_prefix(prefix("11.0.0.0/16")));
    assert!(!space.contains_prefix_range(&range("10.1.0.0/16", 16, 32)));
}

#[test]
fn should_keep_stored_ranges_minimal() {
    let mut space = PrefixSpace::new();
    space.add_prefix_range(range("10.1.0.0/16", 16, 24));
    space.add_prefix_range(range("10.2.0.0/16", 16, 24));
    assert_eq!(space.prefix_ranges().len(), 2);

    //A broader range subsumes both stored ones
    space.add_prefix_range(range("10.0.0.0/8", 8, 24));
    let ranges = space.prefix_ranges();
    assert_eq!(ranges.len(), 1);
    assert!(ranges.contains(&range("10.0.0.0/8", 8, 24)));

    //An already-implied range is dropped on insert
    space.add_prefix_range(range("10.3.0.0/16", 16, 20));
    assert_eq!(space.prefix_ranges().len(), 1);

    //Overlapping but not subsumed ranges are both kept
    space.add_prefix_range(range("10.0.0.0/8", 25, 32));
    assert_eq!(space.prefix_ranges().len(), 2);
}

#[test]
fn should_be_insertion_order_independent() {
    let ranges = [
        range("10.0.0.0/8", 8, 24),
        range("10.1.0.0/16", 16, 24),
        range("192.168.0.0/16", 16, 32),
    ];

    let forward: PrefixSpace = ranges.into_iter().collect();
    let backward: PrefixSpace = ranges.into_iter().rev().collect();
    assert_eq!(forward, backward);
    assert_eq!(forward.prefix_ranges(), backward.prefix_ranges());
}

#[test]
fn should_intersect_prefix_spaces() {
    let a: PrefixSpace = [range("10.0.0.0/8", 8, 24)].into_iter().collect();
    let b: PrefixSpace = [
        range("10.1.0.0/16", 16, 24),
        range("192.168.0.0/16", 16, 32),
    ]
    .into_iter()
    .collect();

    //Intersection keeps the ranges of `b` that `a` fully contains
    let both = a.intersection(&b);
    let ranges = both.prefix_ranges();
    assert_eq!(ranges.len(), 1);
    assert!(ranges.contains(&range("10.1.0.0/16", 16, 24)));

    assert!(a.overlaps(&b));
    assert!(!b.overlaps(&a));

    let c: PrefixSpace = [range("172.16.0.0/12", 12, 24)].into_iter().collect();
    assert!(!a.overlaps(&c));
    assert!(a.intersection(&c).is_empty());
}
