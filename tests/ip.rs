use core::net;
use core::str::FromStr;

use ip_space::{parse_ip, Ip, Ip6, ParseError};

#[test]
fn should_parse_ipv4() {
    let inputs = [
        ("127.0.0.1", net::Ipv4Addr::new(127, 0, 0, 1)),
        ("0.0.0.0", net::Ipv4Addr::new(0, 0, 0, 0)),
        ("255.255.255.255", net::Ipv4Addr::new(255, 255, 255, 255)),
    ];

    for (text, expected) in inputs {
        let ip = match Ip::parse(text) {
            Ok(ip) => ip,
            Err(error) => panic!("Should parse '{text}' but got error={error}"),
        };
        assert_eq!(ip, Ip::from(expected));
        assert_eq!(ip.to_string(), text, "round trip of '{text}'");
    }
}

#[test]
fn should_not_parse_ipv4() {
    let inputs = [
        ("", ParseError::MissingIp),
        ("0.0.0", ParseError::Ipv4InvalidComponentSize(3)),
        ("127.0.0.1.5", ParseError::Ipv4InvalidComponentSize(5)),
        ("1..", ParseError::InvalidIpv4),
        ("256.0.0.1", ParseError::Ipv4ComponentOverflow(256)),
        ("1.f", ParseError::InvalidComponent("f".to_owned())),
        ("127.1.0.900", ParseError::Ipv4ComponentOverflow(900)),
    ];

    for (text, expected) in inputs {
        let error = parse_ip(text).expect_err("should fail");
        assert_eq!(error, expected, "parsing '{text}'");
    }
}

#[test]
fn should_reject_wrong_family_and_prefixed_text() {
    assert!(Ip::parse("::1").is_err());
    assert!(Ip::parse("10.0.0.0/8").is_err());
    assert!(Ip6::parse("127.0.0.1").is_err());
    assert!(Ip6::parse("::1/64").is_err());
}

#[test]
fn should_round_trip_sentinels() {
    let auto = Ip::parse("AUTO/NONE(-1l)").expect("to parse auto sentinel");
    assert_eq!(auto, Ip::AUTO);
    assert_eq!(auto.as_long(), -1);
    assert!(!auto.is_valid());
    assert_eq!(auto.to_string(), "AUTO/NONE(-1l)");

    let invalid = Ip::parse("INVALID_IP(4294967296l)").expect("to parse invalid sentinel");
    assert!(!invalid.is_valid());
    assert_eq!(invalid.as_long(), 4_294_967_296);
    assert_eq!(invalid.to_string(), "INVALID_IP(4294967296l)");

    //Ordinary parsing never yields sentinel values
    assert!(Ip::parse("-1").is_err());
}

#[test]
fn should_compute_ipv4_arithmetic() {
    use ip_space::base::Address;

    let ip = Ip::parse("10.1.2.3").expect("to parse");
    assert_eq!(ip.network_address(8).to_string(), "10.0.0.0");
    assert_eq!(ip.network_address(24).to_string(), "10.1.2.0");
    assert_eq!(ip.network_address(32), ip);
    assert_eq!(ip.subnet_max(24).to_string(), "10.1.2.255");
    assert_eq!(ip.inverted().to_string(), "245.254.253.252");

    let mask = Ip::parse("255.255.255.0").expect("to parse");
    assert_eq!(mask.num_subnet_bits(), 24);
    assert_eq!(Ip::ZERO.num_subnet_bits(), 0);
    assert_eq!(Ip::MAX.num_subnet_bits(), 32);
}

#[test]
fn should_parse_and_display_ipv6() {
    let inputs = [
        ("::", "::"),
        ("::1", "::1"),
        ("2001:db8::1", "2001:db8::1"),
        ("2001:0db8:0:0:0:0:0:1", "2001:db8::1"),
        ("fe80:0:0:0:1:0:0:1", "fe80::1:0:0:1"),
    ];

    for (text, canonical) in inputs {
        let ip = match Ip6::parse(text) {
            Ok(ip) => ip,
            Err(error) => panic!("Should parse '{text}' but got error={error}"),
        };
        assert_eq!(ip.to_string(), canonical, "canonical form of '{text}'");
        assert_eq!(Ip6::from_str(canonical).expect("to reparse"), ip);
    }
}

#[test]
fn should_not_parse_ipv6() {
    let inputs = [
        ("1:2:3", ParseError::Ipv6InvalidComponentSize(3)),
        ("1::2::3", ParseError::Ipv6MultipleZeroAbbrv),
        ("fffff::", ParseError::InvalidComponent("fffff".to_owned())),
    ];

    for (text, expected) in inputs {
        let error = parse_ip(text).expect_err("should fail");
        assert_eq!(error, expected, "parsing '{text}'");
    }
}

#[test]
fn should_order_addresses_by_value() {
    let mut ips = [
        Ip::parse("10.0.0.2").expect("to parse"),
        Ip::parse("9.255.255.255").expect("to parse"),
        Ip::AUTO,
        Ip::parse("10.0.0.1").expect("to parse"),
    ];
    ips.sort();
    assert_eq!(ips[0], Ip::AUTO);
    assert_eq!(ips[1].to_string(), "9.255.255.255");
    assert_eq!(ips[2].to_string(), "10.0.0.1");
    assert_eq!(ips[3].to_string(), "10.0.0.2");
}
