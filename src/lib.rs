//! radv - IPv6 Router Advertisement session
//!
//! Configuration state and prefix inventory of an RA responder
//! (RFC 4861, RFC 4191). Packet transmission and timers belong to the host.

pub mod advertise;
pub mod config;
pub mod error;
pub mod protocol;
pub mod telemetry;

pub use advertise::{Radv, RadvPrefix, RadvState};
pub use error::{Error, Result};
