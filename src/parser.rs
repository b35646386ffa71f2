//!Byte level parser for IPv4/IPv6 text with optional `/len` suffix

use core::net;

enum FamilyType {
    Unknown,
    V4,
    V6,
}

#[derive(Debug)]
enum ParserState {
    Initial,
    Digit,
    V4Sep,
    V6Sep,
}

mod flag {
    pub const IS_IPV6_ZERO_SKIP: u8 = 0b010;
    pub const IS_IPV6_SEP_INITIAL: u8 = 0b100;
}

///Possible errors parsing IP addr text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    ///Invalid address component
    #[error("invalid address component: {0}")]
    InvalidComponent(String),
    ///Invalid prefix length text
    #[error("invalid prefix length: {0}")]
    InvalidPrefixLen(String),
    ///Unexpected character with position where it is encountered at
    #[error("encountered unexpected character '{0}' at idx={1}")]
    UnexpectedCharacter(char, usize),
    ///Input is not valid IP
    #[error("input is not valid IP")]
    InvalidIp,
    ///Address is not valid IPv4
    #[error("address is not valid IPv4")]
    InvalidIpv4,
    ///IPv4 Address must have 4 components
    #[error("IPv4 address has '{0}' components but expected 4")]
    Ipv4InvalidComponentSize(u8),
    ///IPv4 Address component is greater than 255
    #[error("IPv4 component is '{0}' while allowed range is 0..=255")]
    Ipv4ComponentOverflow(u16),
    ///Address is not valid IPv6
    #[error("address is not valid IPv6")]
    InvalidIpv6,
    ///IPv6 Address must have 8 components
    #[error("IPv6 address has '{0}' components but expected 8")]
    Ipv6InvalidComponentSize(u8),
    ///IPv6 contains more than 1 zero abbreviation
    #[error("IPv6 contains more than 1 zero abbreviation")]
    Ipv6MultipleZeroAbbrv,
    ///IP address is not specified
    #[error("address is not specified")]
    MissingIp,
    ///Prefix length is not specified after `/`
    #[error("prefix length is not specified")]
    MissingPrefixLen,
    ///Prefix length is greater than 32
    #[error("prefix length '{0}' is greater than 32")]
    Ipv4PrefixLenOverflow(u8),
    ///Prefix length is greater than 128
    #[error("prefix length '{0}' is greater than 128")]
    Ipv6PrefixLenOverflow(u8),
}

struct Parser<'a> {
    state: ParserState,
    family: FamilyType,
    flags: u8,
    //Number of address components
    //For IPv4 it is always 4
    //For normal IPv6 it is always 8
    components_size: u8,
    components: [u16; 8],
    zero_component_start: u8,
    start_digit_position: usize,
    text: &'a str,
}

impl<'a> Parser<'a> {
    fn extract_component(&mut self, component_sep_pos: usize) -> Option<ParseError> {
        let text = &self.text[self.start_digit_position..component_sep_pos];

        let result = match self.family {
            FamilyType::V4 => {
                if self.components_size >= 4 {
                    return Some(ParseError::Ipv4InvalidComponentSize(self.components_size.saturating_add(1)));
                }

                u16::from_str_radix(text, 10)
            }
            FamilyType::V6 => {
                if self.components_size >= 8 {
                    return Some(ParseError::Ipv6InvalidComponentSize(self.components_size.saturating_add(1)));
                }

                u16::from_str_radix(text, 16)
            }
            FamilyType::Unknown => return None,
        };

        match result {
            Ok(component) => {
                self.components[self.components_size as usize] = component;
                self.components_size += 1;
                self.start_digit_position = 0;
                None
            }
            Err(_) => Some(ParseError::InvalidComponent(text.to_owned())),
        }
    }

    fn read_ip(&mut self) -> Result<net::IpAddr, ParseError> {
        const IPV4_LEN: u8 = 4;
        const IPV6_LEN: u8 = 8;

        macro_rules! read_octet {
            ($idx:expr) => {
                match self.components[$idx] {
                    octet @ 0..=255 => octet as u8,
                    octet => return Err(ParseError::Ipv4ComponentOverflow(octet)),
                }
            };
        }

        match self.family {
            FamilyType::V4 => if self.components_size == IPV4_LEN {
                let a = read_octet!(0);
                let b = read_octet!(1);
                let c = read_octet!(2);
                let d = read_octet!(3);
                Ok(net::IpAddr::V4(net::Ipv4Addr::new(a, b, c, d)))
            } else {
                Err(ParseError::Ipv4InvalidComponentSize(self.components_size))
            },
            FamilyType::V6 => if self.components_size > IPV6_LEN {
                Err(ParseError::InvalidIpv6)
            } else {
                if self.components_size < IPV6_LEN {
                    if self.flags & flag::IS_IPV6_ZERO_SKIP == flag::IS_IPV6_ZERO_SKIP {
                        let zero_len = (IPV6_LEN - self.components_size) as usize;
                        let start = self.zero_component_start as usize;
                        //Shift tail components right and fill the gap with zero hextets
                        self.components.copy_within(start..self.components_size as usize, start + zero_len);
                        for component in &mut self.components[start..start + zero_len] {
                            *component = 0;
                        }
                    } else {
                        return Err(ParseError::Ipv6InvalidComponentSize(self.components_size));
                    }
                }

                let ip = net::Ipv6Addr::new(
                    self.components[0], self.components[1],
                    self.components[2], self.components[3],
                    self.components[4], self.components[5],
                    self.components[6], self.components[7],
                );
                Ok(net::IpAddr::V6(ip))
            },
            FamilyType::Unknown => match self.state {
                ParserState::Initial => Err(ParseError::MissingIp),
                _ => Err(ParseError::InvalidIp),
            },
        }
    }

    fn on_digit(&mut self, pos: usize) -> Option<ParseError> {
        match self.state {
            ParserState::Digit => None,
            ParserState::V6Sep if self.flags & flag::IS_IPV6_SEP_INITIAL == flag::IS_IPV6_SEP_INITIAL => Some(ParseError::InvalidIpv6),
            _ => {
                self.state = ParserState::Digit;
                self.start_digit_position = pos;
                None
            }
        }
    }

    fn on_v4_sep(&mut self, pos: usize) -> Option<ParseError> {
        let result = match self.state {
            ParserState::Digit => match self.family {
                FamilyType::V6 => return Some(ParseError::InvalidIpv6),
                FamilyType::Unknown => {
                    self.family = FamilyType::V4;
                    self.extract_component(pos)
                }
                FamilyType::V4 => self.extract_component(pos),
            },
            ParserState::V4Sep | ParserState::V6Sep | ParserState::Initial => Some(ParseError::InvalidIpv4),
        };
        self.state = ParserState::V4Sep;
        result
    }

    fn on_v6_sep(&mut self, pos: usize) -> Option<ParseError> {
        let result = match self.state {
            ParserState::Digit => match self.family {
                FamilyType::V4 => return Some(ParseError::InvalidIpv4),
                FamilyType::Unknown => {
                    self.family = FamilyType::V6;
                    self.extract_component(pos)
                }
                FamilyType::V6 => self.extract_component(pos),
            },
            ParserState::V6Sep => {
                //Only 1 zero skip is allowed
                if (self.flags & flag::IS_IPV6_ZERO_SKIP) == flag::IS_IPV6_ZERO_SKIP {
                    return Some(ParseError::Ipv6MultipleZeroAbbrv);
                } else {
                    self.flags = (self.flags & !flag::IS_IPV6_SEP_INITIAL) | flag::IS_IPV6_ZERO_SKIP;
                    self.zero_component_start = self.components_size;
                    self.family = FamilyType::V6;
                    return None;
                }
            }
            //You can start with double ::
            ParserState::Initial => {
                self.flags |= flag::IS_IPV6_SEP_INITIAL;
                None
            }
            ParserState::V4Sep => Some(ParseError::InvalidIpv4),
        };

        self.state = ParserState::V6Sep;
        result
    }

    //Handles last address component if any
    fn on_ip_end(&mut self, pos: usize) -> Result<net::IpAddr, ParseError> {
        match self.state {
            ParserState::Digit => match self.extract_component(pos) {
                None => self.read_ip(),
                Some(error) => Err(error),
            },
            ParserState::V4Sep => Err(ParseError::InvalidIpv4),
            ParserState::V6Sep if self.flags & flag::IS_IPV6_ZERO_SKIP == flag::IS_IPV6_ZERO_SKIP => {
                if self.components_size == 0 {
                    Ok(net::IpAddr::V6(net::Ipv6Addr::UNSPECIFIED))
                } else {
                    self.read_ip()
                }
            }
            ParserState::V6Sep => Err(ParseError::InvalidIpv6),
            ParserState::Initial => Err(ParseError::MissingIp),
        }
    }

    //Extracts prefix length after `pos`
    fn on_len_sep(&mut self, pos: usize) -> Result<u8, ParseError> {
        let digit_pos = pos + 1;
        if digit_pos >= self.text.len() {
            return Err(ParseError::MissingPrefixLen);
        }

        let text = &self.text[digit_pos..];

        match u8::from_str_radix(text, 10) {
            Ok(result) => match self.family {
                FamilyType::V4 => {
                    if result > 32 {
                        Err(ParseError::Ipv4PrefixLenOverflow(result))
                    } else {
                        Ok(result)
                    }
                }
                FamilyType::V6 => {
                    if result > 128 {
                        Err(ParseError::Ipv6PrefixLenOverflow(result))
                    } else {
                        Ok(result)
                    }
                }
                FamilyType::Unknown => Err(ParseError::InvalidPrefixLen(text.to_owned())),
            },
            Err(_) => Err(ParseError::InvalidPrefixLen(text.to_owned())),
        }
    }

    fn parse(&mut self) -> Result<(net::IpAddr, Option<u8>), ParseError> {
        let bytes = self.text.as_bytes();
        let mut idx = 0;

        while idx < bytes.len() {
            let ch = bytes[idx];
            if ch.is_ascii_hexdigit() {
                if let Some(error) = self.on_digit(idx) {
                    return Err(error);
                }
            } else if ch == b'.' {
                if let Some(error) = self.on_v4_sep(idx) {
                    return Err(error);
                }
            } else if ch == b':' {
                if let Some(error) = self.on_v6_sep(idx) {
                    return Err(error);
                }
            } else if ch == b'/' {
                let ip = self.on_ip_end(idx)?;
                let len = self.on_len_sep(idx)?;
                return Ok((ip, Some(len)));
            } else {
                return Err(ParseError::UnexpectedCharacter(ch as char, idx));
            }

            idx += 1;
        }

        let ip = self.on_ip_end(idx)?;
        Ok((ip, None))
    }
}

///Performs parsing of the string into IP addr with optional prefix length
pub fn parse_ip(text: &str) -> Result<(net::IpAddr, Option<u8>), ParseError> {
    let mut parser = Parser {
        state: ParserState::Initial,
        flags: 0,
        family: FamilyType::Unknown,
        components_size: 0,
        components: [0; 8],
        zero_component_start: 0,
        start_digit_position: 0,
        text,
    };
    parser.parse()
}
