use core::str::FromStr;

use ip_space::{
    Ip, Ip6, IpSpace, IpWildcard, Prefix4, Prefix6, PrefixRange4, SubRange, Wildcard,
};

#[test]
fn should_normalize_host_bits() {
    let prefix = Prefix4::from_str("10.1.2.3/8").expect("to parse");
    assert_eq!(prefix.to_string(), "10.0.0.0/8");
    assert_eq!(prefix, Prefix4::from_str("10.0.0.0/8").expect("to parse"));
    assert_eq!(prefix.start_ip().to_string(), "10.0.0.0");
    assert_eq!(prefix.end_ip().to_string(), "10.255.255.255");
    assert_eq!(prefix.len(), 8);
    assert_eq!(prefix.mask().to_string(), "255.0.0.0");
    assert_eq!(prefix.prefix_wildcard().to_string(), "0.255.255.255");
}

#[test]
fn should_parse_prefix_text() {
    //Bare address reads as a full-width prefix
    let prefix = Prefix4::from_str("192.168.1.1").expect("to parse");
    assert_eq!(prefix.to_string(), "192.168.1.1/32");

    let prefix = Prefix6::from_str("2001:db8::/32").expect("to parse");
    assert_eq!(prefix.to_string(), "2001:db8::/32");
    assert_eq!(prefix.len(), 32);

    let prefix = Prefix6::from_str("::1").expect("to parse");
    assert_eq!(prefix.to_string(), "::1/128");

    assert!(Prefix4::from_str("10.0.0.0/33").is_err());
    assert!(Prefix6::from_str("::/129").is_err());
    assert!(Prefix4::from_str("10.0.0.0/x").is_err());
    assert!(Prefix4::from_str("not-a-prefix").is_err());
}

#[test]
fn should_answer_prefix_containment() {
    let outer = Prefix4::from_str("10.0.0.0/8").expect("to parse");
    let inner = Prefix4::from_str("10.1.0.0/16").expect("to parse");
    let sibling = Prefix4::from_str("11.0.0.0/16").expect("to parse");

    assert!(outer.contains_prefix(&inner));
    assert!(outer.contains_prefix(&outer));
    assert!(!inner.contains_prefix(&outer));
    assert!(!outer.contains_prefix(&sibling));

    assert!(outer.contains_ip(Ip::parse("10.255.0.1").expect("to parse")));
    assert!(!outer.contains_ip(Ip::parse("11.0.0.0").expect("to parse")));

    let zero = Prefix4::zero();
    assert_eq!(zero.to_string(), "0.0.0.0/0");
    assert!(zero.contains_prefix(&outer));
    assert!(zero.contains_ip(Ip::MAX));
}

#[test]
fn should_order_prefixes_by_address_then_length() {
    let mut prefixes = [
        Prefix4::from_str("10.0.0.0/16").expect("to parse"),
        Prefix4::from_str("9.0.0.0/8").expect("to parse"),
        Prefix4::from_str("10.0.0.0/8").expect("to parse"),
    ];
    prefixes.sort();
    assert_eq!(prefixes[0].to_string(), "9.0.0.0/8");
    assert_eq!(prefixes[1].to_string(), "10.0.0.0/8");
    assert_eq!(prefixes[2].to_string(), "10.0.0.0/16");
}

#[test]
fn should_collapse_prefix_to_minimal_space() {
    let space = Prefix4::from_str("0.0.0.0/0").expect("to parse").to_ip_space();
    assert_eq!(space, IpSpace::Universe);

    let space = Prefix4::from_str("10.0.0.1/32").expect("to parse").to_ip_space();
    assert_eq!(space, IpSpace::Addr(Ip::parse("10.0.0.1").expect("to parse")));

    let prefix = Prefix4::from_str("10.0.0.0/24").expect("to parse");
    assert_eq!(prefix.to_ip_space(), IpSpace::Prefix(prefix));
}

#[test]
fn should_exclude_network_and_broadcast_from_host_space() {
    let prefix = Prefix4::from_str("10.0.0.0/24").expect("to parse");
    let hosts = prefix.to_host_ip_space();
    assert!(!hosts.contains(Ip::parse("10.0.0.0").expect("to parse")));
    assert!(!hosts.contains(Ip::parse("10.0.0.255").expect("to parse")));
    assert!(hosts.contains(Ip::parse("10.0.0.1").expect("to parse")));
    assert!(hosts.contains(Ip::parse("10.0.0.254").expect("to parse")));
    assert!(!hosts.contains(Ip::parse("10.0.1.1").expect("to parse")));

    //RFC 3021: the two longest lengths are entirely host space
    let p2p = Prefix4::from_str("10.0.0.0/31").expect("to parse");
    let hosts = p2p.to_host_ip_space();
    assert!(hosts.contains(Ip::parse("10.0.0.0").expect("to parse")));
    assert!(hosts.contains(Ip::parse("10.0.0.1").expect("to parse")));

    let host = Prefix4::from_str("10.0.0.7/32").expect("to parse");
    assert_eq!(host.to_host_ip_space(), IpSpace::Addr(Ip::parse("10.0.0.7").expect("to parse")));
}

#[test]
fn should_round_trip_prefix_serde() {
    let prefix = Prefix4::from_str("172.16.0.0/12").expect("to parse");
    let json = serde_json::to_string(&prefix).expect("to serialize");
    assert_eq!(json, "\"172.16.0.0/12\"");
    let back: Prefix4 = serde_json::from_str(&json).expect("to deserialize");
    assert_eq!(back, prefix);
}

#[test]
fn should_match_wildcard_patterns() {
    //Wild third octet
    let wildcard = IpWildcard::new(
        Ip::parse("10.0.99.0").expect("to parse"),
        Ip::parse("0.0.255.0").expect("to parse"),
    );
    //Wild bits of the address are normalized away
    assert_eq!(wildcard.addr().to_string(), "10.0.0.0");
    assert!(wildcard.contains_ip(Ip::parse("10.0.1.0").expect("to parse")));
    assert!(wildcard.contains_ip(Ip::parse("10.0.255.0").expect("to parse")));
    assert!(!wildcard.contains_ip(Ip::parse("10.0.1.1").expect("to parse")));
    assert!(!wildcard.is_prefix());
    assert!(wildcard.to_prefix().is_err());
    assert_eq!(wildcard.to_string(), "10.0.0.0:0.0.255.0");
}

#[test]
fn should_convert_prefix_like_wildcards() {
    let prefix = Prefix4::from_str("10.1.0.0/16").expect("to parse");
    let wildcard = IpWildcard::from_prefix(prefix);
    assert_eq!(wildcard.mask().to_string(), "0.0.255.255");
    assert!(wildcard.is_prefix());
    assert_eq!(wildcard.to_prefix().expect("prefix mask"), prefix);
    assert_eq!(wildcard.to_string(), "10.1.0.0/16");

    let exact = IpWildcard::from_ip(Ip::parse("10.0.0.1").expect("to parse"));
    assert!(exact.is_prefix());
    assert_eq!(exact.to_string(), "10.0.0.1");
    assert!(exact.contains_ip(Ip::parse("10.0.0.1").expect("to parse")));
    assert!(!exact.contains_ip(Ip::parse("10.0.0.2").expect("to parse")));
}

#[test]
fn should_parse_wildcard_forms() {
    let inputs = [
        ("10.0.0.1", "10.0.0.1"),
        ("10.1.0.0/16", "10.1.0.0/16"),
        ("10.0.0.0:0.0.255.0", "10.0.0.0:0.0.255.0"),
        //ip:mask with a contiguous low mask canonicalizes to prefix form
        ("10.1.0.0:0.0.255.255", "10.1.0.0/16"),
    ];
    for (text, canonical) in inputs {
        let wildcard = match IpWildcard::from_str(text) {
            Ok(wildcard) => wildcard,
            Err(error) => panic!("Should parse '{text}' but got error={error}"),
        };
        assert_eq!(wildcard.to_string(), canonical, "canonical form of '{text}'");
    }

    //IPv6 text is full of ':' but must not be misread as ip:mask
    let wildcard = Wildcard::<Ip6>::from_str("::1").expect("to parse");
    assert_eq!(wildcard.to_string(), "::1");

    assert!(IpWildcard::from_str("garbage").is_err());
}

#[test]
fn should_build_prefix_ranges() {
    let prefix = Prefix4::from_str("10.0.0.0/8").expect("to parse");
    let lengths = SubRange::new(16, 24).expect("valid bounds");
    let range = PrefixRange4::new(prefix, lengths).expect("valid range");
    assert_eq!(range.to_string(), "10.0.0.0/8:16-24");
    assert_eq!(range.prefix(), prefix);
    assert_eq!(range.lengths(), lengths);

    assert!(SubRange::new(24, 16).is_err());
    assert!(PrefixRange4::new(prefix, SubRange::new(16, 33).expect("valid bounds")).is_err());

    let exact = PrefixRange4::from_prefix(prefix);
    assert_eq!(exact.to_string(), "10.0.0.0/8:8");
    assert_eq!(exact.lengths(), SubRange::singleton(8));
}

#[test]
fn should_answer_prefix_range_inclusion() {
    let prefix = |text: &str| Prefix4::from_str(text).expect("to parse");
    let range = |p: &str, lo: u8, hi: u8| {
        PrefixRange4::new(prefix(p), SubRange::new(lo, hi).expect("valid bounds")).expect("valid range")
    };

    let broad = range("10.0.0.0/8", 8, 24);
    assert!(broad.includes(&range("10.1.0.0/16", 16, 24)));
    assert!(broad.includes(&broad));
    assert!(broad.includes(&PrefixRange4::from_prefix(prefix("10.1.2.0/24"))));
    //Length window extends past the broad one
    assert!(!broad.includes(&range("10.1.0.0/16", 16, 32)));
    //Prefix outside the broad one
    assert!(!broad.includes(&range("11.0.0.0/16", 16, 24)));
    //Narrow never includes broad
    assert!(!range("10.1.0.0/16", 16, 24).includes(&broad));

    let lengths = SubRange::new(16, 24).expect("valid bounds");
    assert!(lengths.contains(16));
    assert!(lengths.contains(24));
    assert!(!lengths.contains(25));
    assert!(lengths.encloses(&SubRange::new(18, 20).expect("valid bounds")));
    assert!(!lengths.encloses(&SubRange::new(12, 20).expect("valid bounds")));
}
