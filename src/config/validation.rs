//! Configuration validation

use super::Config;
use crate::protocol::ndisc::{
    prefix_intersect, validate_prefix_len, IPV6_MIN_MTU, SLAAC_PREFIX_LEN,
};
use crate::protocol::MacAddr;

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn print_diagnostics(&self) {
        for warning in &self.warnings {
            println!("[WARN] {}", warning);
        }
        for error in &self.errors {
            println!("[ERROR] {}", error);
        }
    }
}

/// Validate configuration and return warnings/errors
pub fn validate(config: &Config) -> ValidationResult {
    let mut result = ValidationResult::new();

    validate_router(config, &mut result);
    validate_prefixes(config, &mut result);

    result
}

fn validate_router(config: &Config, result: &mut ValidationResult) {
    let router = &config.router;

    match router.ifindex {
        None => result.error("router.ifindex: not specified"),
        Some(ifindex) if ifindex < 1 => {
            result.error(format!("router.ifindex: {} is not a valid interface", ifindex))
        }
        Some(_) => {}
    }

    if let Some(ref mac) = router.mac {
        match mac.parse::<MacAddr>() {
            Err(_) => result.error(format!("router.mac: invalid MAC address '{}'", mac)),
            Ok(addr) if addr.is_multicast() => {
                result.error(format!("router.mac: {} is a multicast address", addr))
            }
            Ok(_) => {}
        }
    }

    match router.mtu {
        None => result.warn("router.mtu: not specified, MTU option will not be advertised"),
        Some(mtu) if mtu < IPV6_MIN_MTU => result.error(format!(
            "router.mtu: {} is below the IPv6 minimum of {}",
            mtu, IPV6_MIN_MTU
        )),
        Some(_) => {}
    }

    if router.lifetime == 0 && router.preference != super::PreferenceConfig::Medium {
        result.error(format!(
            "router.preference: must be medium when lifetime is 0 (got {:?})",
            router.preference
        ));
    }
}

fn validate_prefixes(config: &Config, result: &mut ValidationResult) {
    let mut accepted: Vec<(usize, std::net::Ipv6Addr, u8)> = Vec::new();

    for (i, pfx) in config.prefixes.iter().enumerate() {
        let (addr, len) = match pfx.parse_prefix() {
            Ok(parsed) => parsed,
            Err(e) => {
                result.error(format!("prefix[{}]: {}", i, e));
                continue;
            }
        };

        if let Err(e) = validate_prefix_len(len) {
            result.error(format!("prefix[{}]: {}", i, e));
            continue;
        }

        if len > SLAAC_PREFIX_LEN {
            result.warn(format!(
                "prefix[{}]: {}/{} is longer than /64, hosts cannot autoconfigure from it",
                i, addr, len
            ));
        }

        if pfx.preferred_lifetime > pfx.valid_lifetime {
            result.warn(format!(
                "prefix[{}]: preferred_lifetime {} exceeds valid_lifetime {}",
                i, pfx.preferred_lifetime, pfx.valid_lifetime
            ));
        }

        if let Some((j, _, _)) = accepted
            .iter()
            .find(|(_, other, other_len)| prefix_intersect(other, *other_len, &addr, len))
        {
            result.error(format!(
                "prefix[{}]: {}/{} overlaps prefix[{}]",
                i, addr, len, j
            ));
            continue;
        }

        accepted.push((i, addr, len));
    }
}
