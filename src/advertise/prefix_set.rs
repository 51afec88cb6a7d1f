//! Ordered set of advertised prefixes
//!
//! Members keep insertion order, which is also the order of the Prefix
//! Information options in an advertisement. Overlap is only checked when a
//! prefix is added; later changes to a member are not re-validated.

use super::prefix::RadvPrefix;
use crate::protocol::ndisc::prefix_intersect;
use crate::{Error, Result};
use tracing::debug;

#[derive(Debug, Default)]
pub struct PrefixSet {
    prefixes: Vec<RadvPrefix>,
}

impl PrefixSet {
    pub fn new() -> Self {
        Self {
            prefixes: Vec::new(),
        }
    }

    /// Find the first member whose range intersects `prefix`
    pub fn find_overlap(&self, prefix: &RadvPrefix) -> Option<&RadvPrefix> {
        let addr = prefix.prefix();
        let len = prefix.prefix_len();

        self.prefixes
            .iter()
            .find(|cur| prefix_intersect(&cur.prefix(), cur.prefix_len(), &addr, len))
    }

    /// Add a prefix, taking a new reference to it
    pub fn add(&mut self, prefix: &RadvPrefix) -> Result<()> {
        if let Some(existing) = self.find_overlap(prefix) {
            debug!(
                existing = %existing,
                prefix = %prefix,
                "IPv6 prefix already configured, ignoring"
            );
            return Err(Error::AlreadyExists {
                prefix: prefix.to_string(),
                existing: existing.to_string(),
            });
        }

        self.prefixes.push(prefix.clone());
        debug!(prefix = %prefix, count = self.prefixes.len(), "Added prefix");

        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RadvPrefix> {
        self.prefixes.iter()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
