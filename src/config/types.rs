//! Configuration types

use crate::protocol::ndisc::{Preference, DEFAULT_PREFERRED_LIFETIME, DEFAULT_VALID_LIFETIME};
use crate::telemetry::LogConfig;
use crate::{Error, Result};
use serde::Deserialize;
use std::net::Ipv6Addr;

/// User-defined configuration (radv.toml)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub log: Option<LogConfig>,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default, rename = "prefix")]
    pub prefixes: Vec<PrefixConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    pub ifindex: Option<i32>,
    pub mac: Option<String>,
    pub mtu: Option<u32>,
    #[serde(default = "default_hop_limit")]
    pub hop_limit: u8,
    #[serde(default = "default_router_lifetime")]
    pub lifetime: u32,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub other: bool,
    #[serde(default)]
    pub preference: PreferenceConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            ifindex: None,
            mac: None,
            mtu: None,
            hop_limit: default_hop_limit(),
            lifetime: default_router_lifetime(),
            managed: false,
            other: false,
            preference: PreferenceConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceConfig {
    Low,
    #[default]
    Medium,
    High,
}

impl From<PreferenceConfig> for Preference {
    fn from(value: PreferenceConfig) -> Self {
        match value {
            PreferenceConfig::Low => Preference::Low,
            PreferenceConfig::Medium => Preference::Medium,
            PreferenceConfig::High => Preference::High,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrefixConfig {
    /// "2001:db8::/64"
    pub prefix: String,
    #[serde(default = "default_true")]
    pub on_link: bool,
    #[serde(default = "default_true")]
    pub autonomous: bool,
    #[serde(default = "default_preferred_lifetime")]
    pub preferred_lifetime: u32,
    #[serde(default = "default_valid_lifetime")]
    pub valid_lifetime: u32,
}

impl PrefixConfig {
    /// Split "addr/len" into its parts
    pub fn parse_prefix(&self) -> Result<(Ipv6Addr, u8)> {
        let (addr, len) = self
            .prefix
            .split_once('/')
            .ok_or_else(|| Error::Parse(format!("prefix '{}' missing length", self.prefix)))?;

        let addr: Ipv6Addr = addr
            .parse()
            .map_err(|_| Error::Parse(format!("invalid IPv6 prefix '{}'", self.prefix)))?;
        let len: u8 = len
            .parse()
            .map_err(|_| Error::Parse(format!("invalid prefix length in '{}'", self.prefix)))?;

        Ok((addr, len))
    }
}

fn default_true() -> bool {
    true
}

fn default_hop_limit() -> u8 {
    64
}

fn default_router_lifetime() -> u32 {
    1800
}

fn default_preferred_lifetime() -> u32 {
    DEFAULT_PREFERRED_LIFETIME
}

fn default_valid_lifetime() -> u32 {
    DEFAULT_VALID_LIFETIME
}
