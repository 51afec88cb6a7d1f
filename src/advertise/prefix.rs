//! Advertised prefix handle
//!
//! A `RadvPrefix` is shared between the caller and every session it was
//! added to. Cloning takes a reference, dropping releases one.

use crate::protocol::ndisc::{self, PrefixInformation, PREFIX_INFO_SIZE, SLAAC_PREFIX_LEN};
use crate::Result;
use std::cell::RefCell;
use std::fmt;
use std::net::Ipv6Addr;
use std::rc::Rc;
use tracing::debug;

/// Prefix to advertise in a Prefix Information option
#[derive(Clone, Default)]
pub struct RadvPrefix {
    opt: Rc<RefCell<PrefixInformation>>,
}

impl RadvPrefix {
    /// Create a prefix with RFC 4861 6.2.1 defaults: ::/64, on-link,
    /// autonomous, preferred 7 days, valid 30 days
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live handles to this prefix
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.opt)
    }

    /// Whether both handles refer to the same prefix
    pub fn ptr_eq(&self, other: &RadvPrefix) -> bool {
        Rc::ptr_eq(&self.opt, &other.opt)
    }

    /// Set prefix address and length (3..=128)
    pub fn set_prefix(&self, prefix: Ipv6Addr, prefix_len: u8) -> Result<()> {
        ndisc::validate_prefix_len(prefix_len)?;

        if prefix_len > SLAAC_PREFIX_LEN {
            debug!(
                prefix = %prefix,
                prefix_len,
                "Unusual prefix length greater than 64"
            );
        }

        let mut opt = self.opt.borrow_mut();
        opt.prefix = prefix;
        opt.prefix_len = prefix_len;

        Ok(())
    }

    pub fn set_onlink(&self, on_link: bool) {
        self.opt.borrow_mut().on_link = on_link;
    }

    pub fn set_address_autoconfiguration(&self, autonomous: bool) {
        self.opt.borrow_mut().autonomous = autonomous;
    }

    pub fn set_valid_lifetime(&self, seconds: u32) {
        self.opt.borrow_mut().valid_lifetime = seconds;
    }

    pub fn set_preferred_lifetime(&self, seconds: u32) {
        self.opt.borrow_mut().preferred_lifetime = seconds;
    }

    pub fn prefix(&self) -> Ipv6Addr {
        self.opt.borrow().prefix
    }

    pub fn prefix_len(&self) -> u8 {
        self.opt.borrow().prefix_len
    }

    pub fn on_link(&self) -> bool {
        self.opt.borrow().on_link
    }

    pub fn autonomous(&self) -> bool {
        self.opt.borrow().autonomous
    }

    pub fn valid_lifetime(&self) -> u32 {
        self.opt.borrow().valid_lifetime
    }

    pub fn preferred_lifetime(&self) -> u32 {
        self.opt.borrow().preferred_lifetime
    }

    /// Prefix longer than /64 cannot be used for SLAAC
    pub fn is_unusual(&self) -> bool {
        self.prefix_len() > SLAAC_PREFIX_LEN
    }

    /// Snapshot of the current option value
    pub fn option(&self) -> PrefixInformation {
        self.opt.borrow().clone()
    }

    /// Encoded Prefix Information option
    pub fn to_bytes(&self) -> [u8; PREFIX_INFO_SIZE] {
        self.opt.borrow().to_bytes()
    }
}

impl fmt::Display for RadvPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = self.opt.borrow();
        write!(f, "{}/{}", opt.prefix, opt.prefix_len)
    }
}

impl fmt::Debug for RadvPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadvPrefix")
            .field("opt", &*self.opt.borrow())
            .field("refs", &self.ref_count())
            .finish()
    }
}
