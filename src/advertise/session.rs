//! Router Advertisement session
//!
//! Holds the router-level parameters of one RA responder together with the
//! prefixes it announces. Router parameters may only change while the
//! session is idle; the host event loop reads them while advertising.

use super::event::{EventLoopProvider, EventLoopRef};
use super::prefix::RadvPrefix;
use super::prefix_set::PrefixSet;
use crate::protocol::ndisc::{Preference, RouterFlags, IPV6_MIN_MTU, PREFIX_INFO_SIZE};
use crate::protocol::MacAddr;
use crate::{Error, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RadvState {
    /// Configurable, not advertising
    #[default]
    Idle,
    /// Attached to an event loop and advertising
    Advertising,
}

#[derive(Debug)]
struct RadvInner {
    state: RadvState,
    /// -1 = unset
    ifindex: i32,
    mac_addr: Option<MacAddr>,
    mtu: Option<u32>,
    hop_limit: u8,
    lifetime: u32,
    flags: RouterFlags,
    prefixes: PrefixSet,
    event: Option<EventLoopRef>,
    event_priority: i64,
    provider: Option<Rc<dyn EventLoopProvider>>,
}

impl RadvInner {
    fn ensure_idle(&self) -> Result<()> {
        if self.state != RadvState::Idle {
            return Err(Error::Busy);
        }
        Ok(())
    }
}

impl Drop for RadvInner {
    fn drop(&mut self) {
        debug!(
            ifindex = self.ifindex,
            prefixes = self.prefixes.len(),
            "Releasing Router Advertisement session"
        );
    }
}

/// Router Advertisement session handle.
///
/// Cloning takes a reference; the session and everything it owns is
/// released when the last handle is dropped.
#[derive(Clone)]
pub struct Radv {
    inner: Rc<RefCell<RadvInner>>,
}

impl Default for Radv {
    fn default() -> Self {
        Self::new()
    }
}

impl Radv {
    /// Create an idle session with no prefixes and no event loop
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(RadvInner {
                state: RadvState::Idle,
                ifindex: -1,
                mac_addr: None,
                mtu: None,
                hop_limit: 0,
                lifetime: 0,
                flags: RouterFlags::default(),
                prefixes: PrefixSet::new(),
                event: None,
                event_priority: 0,
                provider: None,
            })),
        }
    }

    /// Create a session that asks `provider` for an event loop when
    /// attached without one
    pub fn with_event_provider(provider: Rc<dyn EventLoopProvider>) -> Self {
        let radv = Self::new();
        radv.inner.borrow_mut().provider = Some(provider);
        radv
    }

    /// Number of live handles to this session
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    // ------------------------------------------------------------------
    // Event loop
    // ------------------------------------------------------------------

    /// Attach to an event loop.
    ///
    /// With `None` the injected provider's default loop is used. Failing to
    /// get a default is not an error; the session just stays detached.
    pub fn attach_event(&self, event: Option<EventLoopRef>, priority: i64) -> Result<()> {
        let provider = {
            let inner = self.inner.borrow();
            if inner.event.is_some() {
                return Err(Error::Busy);
            }
            inner.provider.clone()
        };

        // The provider may call back into this session, so no borrow is held
        let event = match event {
            Some(event) => event,
            None => {
                let acquired = match provider {
                    Some(provider) => provider.acquire_default(),
                    None => Err(Error::NotReady("no default event loop provider".into())),
                };
                match acquired {
                    Ok(event) => event,
                    Err(e) => {
                        debug!(error = %e, "No default event loop, staying detached");
                        return Ok(());
                    }
                }
            }
        };

        let mut inner = self.inner.borrow_mut();
        if inner.event.is_some() {
            return Err(Error::Busy);
        }

        debug!(event = event.name(), priority, "Attached event loop");
        inner.event = Some(event);
        inner.event_priority = priority;

        Ok(())
    }

    /// Release the event loop reference
    pub fn detach_event(&self) {
        self.inner.borrow_mut().event = None;
    }

    pub fn event(&self) -> Option<EventLoopRef> {
        self.inner.borrow().event.clone()
    }

    pub fn event_priority(&self) -> i64 {
        self.inner.borrow().event_priority
    }

    // ------------------------------------------------------------------
    // State machine
    // ------------------------------------------------------------------

    /// Start advertising. Requires an attached event loop and an interface.
    pub fn start(&self) -> Result<()> {
        let mut inner = self.inner.borrow_mut();

        if inner.event.is_none() {
            return Err(Error::NotReady("no event loop attached".into()));
        }
        if inner.ifindex <= 0 {
            return Err(Error::NotReady(format!(
                "invalid interface index {}",
                inner.ifindex
            )));
        }

        if inner.state != RadvState::Idle {
            return Ok(());
        }

        inner.state = RadvState::Advertising;
        info!(
            ifindex = inner.ifindex,
            prefixes = inner.prefixes.len(),
            "Started IPv6 Router Advertisement daemon"
        );

        Ok(())
    }

    pub fn stop(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.state == RadvState::Advertising {
            info!(
                ifindex = inner.ifindex,
                "Stopping IPv6 Router Advertisement daemon"
            );
        }
        inner.state = RadvState::Idle;
    }

    pub fn state(&self) -> RadvState {
        self.inner.borrow().state
    }

    pub fn is_advertising(&self) -> bool {
        self.state() == RadvState::Advertising
    }

    // ------------------------------------------------------------------
    // Router parameters
    // ------------------------------------------------------------------

    /// Set the interface index (-1 = unset)
    pub fn set_ifindex(&self, ifindex: i32) -> Result<()> {
        if ifindex < -1 {
            return Err(Error::InvalidArgument(format!(
                "interface index {} is invalid",
                ifindex
            )));
        }

        let mut inner = self.inner.borrow_mut();
        inner.ensure_idle()?;
        inner.ifindex = ifindex;

        Ok(())
    }

    /// Set the source link-layer address (None clears it)
    pub fn set_mac(&self, mac_addr: Option<MacAddr>) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.ensure_idle()?;
        inner.mac_addr = mac_addr.filter(|mac| !mac.is_zero());

        Ok(())
    }

    /// Set the advertised link MTU (at least 1280)
    pub fn set_mtu(&self, mtu: u32) -> Result<()> {
        if mtu < IPV6_MIN_MTU {
            return Err(Error::InvalidArgument(format!(
                "MTU {} below IPv6 minimum {}",
                mtu, IPV6_MIN_MTU
            )));
        }

        let mut inner = self.inner.borrow_mut();
        inner.ensure_idle()?;
        inner.mtu = Some(mtu);

        Ok(())
    }

    /// Set Cur Hop Limit (0 = unspecified)
    pub fn set_hop_limit(&self, hop_limit: u8) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.ensure_idle()?;
        inner.hop_limit = hop_limit;

        Ok(())
    }

    /// Set Router Lifetime in seconds (0 = not a default router)
    pub fn set_router_lifetime(&self, lifetime: u32) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.ensure_idle()?;

        // RFC 4191 2.2: with a zero Router Lifetime the preference MUST be (00)
        if lifetime == 0 && inner.flags.preference != Preference::Medium {
            return Err(Error::InvalidTiming);
        }

        inner.lifetime = lifetime;

        Ok(())
    }

    /// Set M flag
    pub fn set_managed_information(&self, managed: bool) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.ensure_idle()?;
        inner.flags.managed = managed;

        Ok(())
    }

    /// Set O flag
    pub fn set_other_information(&self, other: bool) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.ensure_idle()?;
        inner.flags.other = other;

        Ok(())
    }

    /// Set Default Router Preference. Allowed in any state.
    ///
    /// Not checked against a zero router lifetime; the zero-lifetime rule is
    /// enforced by `set_router_lifetime` and by `advertised_flags_byte`.
    pub fn set_preference(&self, preference: Preference) {
        let mut inner = self.inner.borrow_mut();
        if inner.lifetime == 0 && preference != Preference::Medium {
            debug!(
                ?preference,
                "Preference set while router lifetime is 0, advertised as medium"
            );
        }
        inner.flags.preference = preference;
    }

    pub fn ifindex(&self) -> i32 {
        self.inner.borrow().ifindex
    }

    pub fn mac(&self) -> Option<MacAddr> {
        self.inner.borrow().mac_addr
    }

    pub fn mtu(&self) -> Option<u32> {
        self.inner.borrow().mtu
    }

    pub fn hop_limit(&self) -> u8 {
        self.inner.borrow().hop_limit
    }

    pub fn router_lifetime(&self) -> u32 {
        self.inner.borrow().lifetime
    }

    pub fn preference(&self) -> Preference {
        self.inner.borrow().flags.preference
    }

    /// Configured router flags
    pub fn router_flags(&self) -> RouterFlags {
        self.inner.borrow().flags
    }

    /// Flags byte for the RA header. A session that is not a default router
    /// always advertises medium preference.
    pub fn advertised_flags_byte(&self) -> u8 {
        let inner = self.inner.borrow();
        let mut flags = inner.flags;
        if inner.lifetime == 0 {
            flags.preference = Preference::Medium;
        }
        flags.to_byte()
    }

    // ------------------------------------------------------------------
    // Prefixes
    // ------------------------------------------------------------------

    /// Add a prefix to advertise. Fails if it overlaps a configured one.
    pub fn add_prefix(&self, prefix: &RadvPrefix) -> Result<()> {
        self.inner.borrow_mut().prefixes.add(prefix)
    }

    pub fn n_prefixes(&self) -> usize {
        self.inner.borrow().prefixes.len()
    }

    /// Prefix handles in advertisement order
    pub fn prefixes(&self) -> Vec<RadvPrefix> {
        self.inner.borrow().prefixes.iter().cloned().collect()
    }

    /// Encoded Prefix Information options in advertisement order
    pub fn prefix_options(&self) -> Vec<u8> {
        let inner = self.inner.borrow();
        let mut buf = Vec::with_capacity(inner.prefixes.len() * PREFIX_INFO_SIZE);
        for prefix in inner.prefixes.iter() {
            buf.extend_from_slice(&prefix.to_bytes());
        }
        buf
    }
}

impl fmt::Debug for Radv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Radv")
            .field("state", &inner.state)
            .field("ifindex", &inner.ifindex)
            .field("mac_addr", &inner.mac_addr)
            .field("mtu", &inner.mtu)
            .field("hop_limit", &inner.hop_limit)
            .field("lifetime", &inner.lifetime)
            .field("flags", &inner.flags)
            .field("prefixes", &inner.prefixes.len())
            .field("event", &inner.event)
            .finish()
    }
}
