//! Router Advertisement session and prefix inventory
//!
//! Handles are single-threaded (`Rc`), matching the one event loop thread
//! that owns a session.

mod event;
mod prefix;
mod prefix_set;
mod session;

pub use event::{EventLoop, EventLoopProvider, EventLoopRef, NamedEventLoop, ThreadDefaultProvider};
pub use prefix::RadvPrefix;
pub use prefix_set::PrefixSet;
pub use session::{Radv, RadvState};
