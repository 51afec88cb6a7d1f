//! Configuration management
//!
//! Loads radv.toml and turns it into a configured (idle) session.

mod types;
mod validation;

pub use types::*;
pub use validation::{validate, ValidationResult};

use crate::advertise::{Radv, RadvPrefix, ThreadDefaultProvider};
use crate::protocol::MacAddr;
use crate::{Error, Result};
use std::path::Path;
use std::rc::Rc;
use tracing::debug;

/// Load configuration from a TOML file
pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Parse configuration from TOML text
pub fn parse(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
}

/// Build an idle session from configuration.
///
/// Every value goes through the session setters, so a configuration that
/// skipped `validate` still cannot produce an inconsistent session. The
/// session falls back to the thread default event loop when attached
/// without one.
pub fn build(config: &Config) -> Result<Radv> {
    let radv = Radv::with_event_provider(Rc::new(ThreadDefaultProvider));
    let router = &config.router;

    if let Some(ifindex) = router.ifindex {
        radv.set_ifindex(ifindex)?;
    }
    if let Some(ref mac) = router.mac {
        radv.set_mac(Some(mac.parse::<MacAddr>()?))?;
    }
    if let Some(mtu) = router.mtu {
        radv.set_mtu(mtu)?;
    }
    radv.set_hop_limit(router.hop_limit)?;
    radv.set_managed_information(router.managed)?;
    radv.set_other_information(router.other)?;
    // Preference first so a zero lifetime is checked against it
    radv.set_preference(router.preference.into());
    radv.set_router_lifetime(router.lifetime)?;

    for pfx in &config.prefixes {
        let (addr, len) = pfx.parse_prefix()?;
        let prefix = RadvPrefix::new();
        prefix.set_prefix(addr, len)?;
        prefix.set_onlink(pfx.on_link);
        prefix.set_address_autoconfiguration(pfx.autonomous);
        prefix.set_preferred_lifetime(pfx.preferred_lifetime);
        prefix.set_valid_lifetime(pfx.valid_lifetime);
        radv.add_prefix(&prefix)?;
    }

    debug!(
        ifindex = radv.ifindex(),
        prefixes = radv.n_prefixes(),
        "Built Router Advertisement session from config"
    );

    Ok(radv)
}
