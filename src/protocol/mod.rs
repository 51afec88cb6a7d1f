//! Protocol encodings consumed by the RA transmission path

pub mod ndisc;
pub mod types;

pub use ndisc::{PrefixInformation, Preference, RouterFlags};
pub use types::*;
