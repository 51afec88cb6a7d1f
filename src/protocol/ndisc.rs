//! Neighbor Discovery encoding helpers for Router Advertisements
//!
//! Router flags byte (RFC 4861 4.2, RFC 4191 2.2) and the Prefix
//! Information option (RFC 4861 4.6.2).

use crate::{Error, Result};
use std::net::Ipv6Addr;

/// ND option type: Prefix Information
pub const ND_OPT_PREFIX_INFORMATION: u8 = 3;
/// Prefix Information option length in units of 8 octets
pub const PREFIX_INFO_LEN_UNITS: u8 = 4;
/// Prefix Information option size in bytes
pub const PREFIX_INFO_SIZE: usize = PREFIX_INFO_LEN_UNITS as usize * 8;

/// Lifetime value meaning "infinity"
pub const INFINITE_LIFETIME: u32 = 0xFFFF_FFFF;
/// Minimum link MTU for IPv6 (RFC 8200 5)
pub const IPV6_MIN_MTU: u32 = 1280;

pub const MIN_PREFIX_LEN: u8 = 3;
pub const MAX_PREFIX_LEN: u8 = 128;
/// Longest prefix usable for SLAAC; longer ones are legal but unusual
pub const SLAAC_PREFIX_LEN: u8 = 64;

/// RFC 4861 6.2.1 AdvPreferredLifetime default (7 days)
pub const DEFAULT_PREFERRED_LIFETIME: u32 = 604_800;
/// RFC 4861 6.2.1 AdvValidLifetime default (30 days)
pub const DEFAULT_VALID_LIFETIME: u32 = 2_592_000;

const RA_FLAG_MANAGED: u8 = 0x80;
const RA_FLAG_OTHER: u8 = 0x40;
const RA_PREFERENCE_SHIFT: u8 = 3;
const RA_PREFERENCE_MASK: u8 = 0x3 << RA_PREFERENCE_SHIFT;

const PI_FLAG_ONLINK: u8 = 0x80;
const PI_FLAG_AUTO: u8 = 0x40;

/// Default Router Preference (RFC 4191 2.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Preference {
    #[default]
    Medium = 0b00,
    High = 0b01,
    Low = 0b11,
}

impl Preference {
    /// 2-bit wire value
    pub fn bits(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Preference {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0b00 => Ok(Preference::Medium),
            0b01 => Ok(Preference::High),
            0b11 => Ok(Preference::Low),
            other => Err(Error::InvalidArgument(format!(
                "router preference {} is not low, medium or high",
                other
            ))),
        }
    }
}

/// Router Advertisement flags byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouterFlags {
    /// M flag: addresses via DHCPv6
    pub managed: bool,
    /// O flag: other configuration via DHCPv6
    pub other: bool,
    pub preference: Preference,
}

impl RouterFlags {
    pub fn to_byte(self) -> u8 {
        let mut byte = self.preference.bits() << RA_PREFERENCE_SHIFT;
        if self.managed {
            byte |= RA_FLAG_MANAGED;
        }
        if self.other {
            byte |= RA_FLAG_OTHER;
        }
        byte
    }

    /// Decode a flags byte. Reserved bits are ignored and the reserved
    /// preference value (10) reads as medium, as RFC 4191 2.2 requires.
    pub fn from_byte(byte: u8) -> Self {
        let preference = Preference::try_from((byte & RA_PREFERENCE_MASK) >> RA_PREFERENCE_SHIFT)
            .unwrap_or(Preference::Medium);
        Self {
            managed: byte & RA_FLAG_MANAGED != 0,
            other: byte & RA_FLAG_OTHER != 0,
            preference,
        }
    }
}

/// Prefix Information option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixInformation {
    pub prefix: Ipv6Addr,
    pub prefix_len: u8,
    /// L flag
    pub on_link: bool,
    /// A flag - enables SLAAC
    pub autonomous: bool,
    pub valid_lifetime: u32,
    pub preferred_lifetime: u32,
}

impl Default for PrefixInformation {
    fn default() -> Self {
        Self {
            prefix: Ipv6Addr::UNSPECIFIED,
            prefix_len: SLAAC_PREFIX_LEN,
            on_link: true,
            autonomous: true,
            valid_lifetime: DEFAULT_VALID_LIFETIME,
            preferred_lifetime: DEFAULT_PREFERRED_LIFETIME,
        }
    }
}

impl PrefixInformation {
    pub fn option_type(&self) -> u8 {
        ND_OPT_PREFIX_INFORMATION
    }

    /// Option length in units of 8 octets
    pub fn option_length(&self) -> u8 {
        PREFIX_INFO_LEN_UNITS
    }

    pub fn flags_byte(&self) -> u8 {
        let mut flags = 0;
        if self.on_link {
            flags |= PI_FLAG_ONLINK;
        }
        if self.autonomous {
            flags |= PI_FLAG_AUTO;
        }
        flags
    }

    /// Build the option as it appears on the wire
    pub fn to_bytes(&self) -> [u8; PREFIX_INFO_SIZE] {
        let mut buf = [0u8; PREFIX_INFO_SIZE];

        buf[0] = ND_OPT_PREFIX_INFORMATION;
        buf[1] = PREFIX_INFO_LEN_UNITS;
        buf[2] = self.prefix_len;
        buf[3] = self.flags_byte();
        buf[4..8].copy_from_slice(&self.valid_lifetime.to_be_bytes());
        buf[8..12].copy_from_slice(&self.preferred_lifetime.to_be_bytes());
        // 12..16 reserved
        buf[16..32].copy_from_slice(&self.prefix.octets());

        buf
    }

    /// Parse an option starting at the type byte
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < PREFIX_INFO_SIZE {
            return Err(Error::Parse("Prefix Information option too short".into()));
        }
        if buffer[0] != ND_OPT_PREFIX_INFORMATION {
            return Err(Error::Parse(format!(
                "unexpected ND option type {}",
                buffer[0]
            )));
        }
        if buffer[1] != PREFIX_INFO_LEN_UNITS {
            return Err(Error::Parse(format!(
                "invalid Prefix Information length {}",
                buffer[1]
            )));
        }

        let mut prefix = [0u8; 16];
        prefix.copy_from_slice(&buffer[16..32]);

        Ok(Self {
            prefix: Ipv6Addr::from(prefix),
            prefix_len: buffer[2],
            on_link: buffer[3] & PI_FLAG_ONLINK != 0,
            autonomous: buffer[3] & PI_FLAG_AUTO != 0,
            valid_lifetime: u32::from_be_bytes([buffer[4], buffer[5], buffer[6], buffer[7]]),
            preferred_lifetime: u32::from_be_bytes([buffer[8], buffer[9], buffer[10], buffer[11]]),
        })
    }
}

/// Check that a prefix length is one RFC 4861 lets a router advertise
pub fn validate_prefix_len(prefix_len: u8) -> Result<()> {
    if !(MIN_PREFIX_LEN..=MAX_PREFIX_LEN).contains(&prefix_len) {
        return Err(Error::InvalidArgument(format!(
            "prefix length {} outside {}..={}",
            prefix_len, MIN_PREFIX_LEN, MAX_PREFIX_LEN
        )));
    }
    Ok(())
}

/// Whether two prefixes share any address.
///
/// The shorter prefix length decides how many leading bits must match.
pub fn prefix_intersect(a: &Ipv6Addr, a_len: u8, b: &Ipv6Addr, b_len: u8) -> bool {
    let len = a_len.min(b_len).min(MAX_PREFIX_LEN);
    let mask = if len == 0 {
        0
    } else {
        !0u128 << (128 - len as u32)
    };

    (u128::from(*a) & mask) == (u128::from(*b) & mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Ipv6Addr {
        s.parse().unwrap()
    }

    #[test]
    fn test_preference_bits() {
        assert_eq!(Preference::Medium.bits(), 0b00);
        assert_eq!(Preference::High.bits(), 0b01);
        assert_eq!(Preference::Low.bits(), 0b11);
        assert_eq!(Preference::default(), Preference::Medium);
    }

    #[test]
    fn test_preference_try_from() {
        assert_eq!(Preference::try_from(0).unwrap(), Preference::Medium);
        assert_eq!(Preference::try_from(1).unwrap(), Preference::High);
        assert_eq!(Preference::try_from(3).unwrap(), Preference::Low);
        assert!(matches!(
            Preference::try_from(2),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Preference::try_from(4),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_router_flags_to_byte() {
        assert_eq!(RouterFlags::default().to_byte(), 0x00);

        let flags = RouterFlags {
            managed: true,
            other: false,
            preference: Preference::High,
        };
        assert_eq!(flags.to_byte(), 0x80 | 0x08);

        let flags = RouterFlags {
            managed: false,
            other: true,
            preference: Preference::Low,
        };
        assert_eq!(flags.to_byte(), 0x40 | 0x18);
    }

    #[test]
    fn test_router_flags_from_byte() {
        let flags = RouterFlags::from_byte(0xC8);
        assert!(flags.managed);
        assert!(flags.other);
        assert_eq!(flags.preference, Preference::High);

        // Reserved bits (home agent, proxy, low bits) are ignored
        let flags = RouterFlags::from_byte(0x27);
        assert_eq!(flags, RouterFlags::default());
    }

    #[test]
    fn test_router_flags_reserved_preference_is_medium() {
        let flags = RouterFlags::from_byte(0b0001_0000);
        assert_eq!(flags.preference, Preference::Medium);
    }

    #[test]
    fn test_prefix_information_defaults() {
        let pi = PrefixInformation::default();
        assert_eq!(pi.prefix_len, 64);
        assert!(pi.on_link);
        assert!(pi.autonomous);
        assert_eq!(pi.preferred_lifetime, 604800);
        assert_eq!(pi.valid_lifetime, 2592000);
        assert_eq!(pi.option_type(), 3);
        assert_eq!(pi.option_length(), 4);
    }

    #[test]
    fn test_prefix_information_to_bytes() {
        let pi = PrefixInformation {
            prefix: addr("2001:db8::"),
            prefix_len: 64,
            on_link: true,
            autonomous: false,
            valid_lifetime: INFINITE_LIFETIME,
            preferred_lifetime: 3600,
        };
        let bytes = pi.to_bytes();

        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[0], 3);
        assert_eq!(bytes[1], 4);
        assert_eq!(bytes[2], 64);
        assert_eq!(bytes[3], 0x80);
        assert_eq!(&bytes[4..8], &[0xff, 0xff, 0xff, 0xff]);
        assert_eq!(&bytes[8..12], &[0x00, 0x00, 0x0e, 0x10]);
        assert_eq!(&bytes[12..16], &[0, 0, 0, 0]);
        assert_eq!(&bytes[16..20], &[0x20, 0x01, 0x0d, 0xb8]);
        assert!(bytes[20..32].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_prefix_information_parse() {
        let mut raw = vec![
            0x03, 0x04, 0x30, 0xc0, // type, length, /48, L+A
            0x00, 0x27, 0x8d, 0x00, // valid 2592000
            0x00, 0x09, 0x3a, 0x80, // preferred 604800
            0x00, 0x00, 0x00, 0x00, // reserved
        ];
        raw.extend_from_slice(&addr("2001:db8:1::").octets());

        let pi = PrefixInformation::parse(&raw).unwrap();
        assert_eq!(pi.prefix, addr("2001:db8:1::"));
        assert_eq!(pi.prefix_len, 48);
        assert!(pi.on_link);
        assert!(pi.autonomous);
        assert_eq!(pi.valid_lifetime, DEFAULT_VALID_LIFETIME);
        assert_eq!(pi.preferred_lifetime, DEFAULT_PREFERRED_LIFETIME);
        assert_eq!(pi.to_bytes().as_slice(), raw.as_slice());
    }

    #[test]
    fn test_prefix_information_parse_invalid() {
        let good = PrefixInformation::default().to_bytes();

        assert!(PrefixInformation::parse(&good[..31]).is_err());

        let mut wrong_type = good;
        wrong_type[0] = 1;
        assert!(PrefixInformation::parse(&wrong_type).is_err());

        let mut wrong_len = good;
        wrong_len[1] = 3;
        assert!(PrefixInformation::parse(&wrong_len).is_err());
    }

    #[test]
    fn test_validate_prefix_len() {
        assert!(validate_prefix_len(2).is_err());
        assert!(validate_prefix_len(3).is_ok());
        assert!(validate_prefix_len(64).is_ok());
        assert!(validate_prefix_len(128).is_ok());
        assert!(validate_prefix_len(129).is_err());
    }

    #[test]
    fn test_prefix_intersect_nested() {
        assert!(prefix_intersect(
            &addr("2001:db8::"),
            32,
            &addr("2001:db8:1::"),
            48
        ));
        assert!(prefix_intersect(
            &addr("2001:db8:1::"),
            48,
            &addr("2001:db8::"),
            32
        ));
    }

    #[test]
    fn test_prefix_intersect_disjoint() {
        assert!(!prefix_intersect(
            &addr("2001:db8::"),
            32,
            &addr("2001:db9::"),
            32
        ));
        assert!(!prefix_intersect(
            &addr("2001:db8:0:1::"),
            64,
            &addr("2001:db8:0:2::"),
            64
        ));
    }

    #[test]
    fn test_prefix_intersect_host_bits_ignored() {
        // Bits beyond the shorter length do not matter
        assert!(prefix_intersect(
            &addr("2001:db8::1"),
            64,
            &addr("2001:db8::ffff"),
            64
        ));
        assert!(prefix_intersect(&addr("::1"), 128, &addr("::1"), 128));
        assert!(!prefix_intersect(&addr("::1"), 128, &addr("::2"), 128));
        assert!(prefix_intersect(&addr("::"), 0, &addr("ff02::1"), 128));
    }
}
