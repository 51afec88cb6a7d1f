//! Event loop boundary
//!
//! The session never drives timers or sockets itself. It only holds a
//! reference to the host loop that does, plus the priority the host
//! should give its sources.

use crate::{Error, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Host event loop that schedules RA transmission
pub trait EventLoop: fmt::Debug {
    fn name(&self) -> &str;
}

/// Shared reference to a host event loop
pub type EventLoopRef = Rc<dyn EventLoop>;

/// Hands out the host's default event loop
pub trait EventLoopProvider: fmt::Debug {
    fn acquire_default(&self) -> Result<EventLoopRef>;
}

/// Event loop with no behaviour of its own, identified by name
#[derive(Debug)]
pub struct NamedEventLoop {
    name: String,
}

impl NamedEventLoop {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl EventLoop for NamedEventLoop {
    fn name(&self) -> &str {
        &self.name
    }
}

thread_local! {
    static THREAD_DEFAULT: RefCell<Weak<NamedEventLoop>> = RefCell::new(Weak::new());
}

/// Per-thread default loop.
///
/// Sessions asking for a default on the same thread share one loop for as
/// long as any of them holds it; a new one is created after the last
/// reference is gone.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDefaultProvider;

impl EventLoopProvider for ThreadDefaultProvider {
    fn acquire_default(&self) -> Result<EventLoopRef> {
        THREAD_DEFAULT
            .try_with(|slot| {
                let mut slot = slot.borrow_mut();
                if let Some(existing) = slot.upgrade() {
                    return existing as EventLoopRef;
                }
                let created = Rc::new(NamedEventLoop::new("default"));
                *slot = Rc::downgrade(&created);
                created as EventLoopRef
            })
            .map_err(|_| Error::NotReady("thread default event loop unavailable".into()))
    }
}
