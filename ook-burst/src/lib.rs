//! An OOK burst generator for Brennenstuhl 3600-class remote-control receivers (BURSTER, §4.4).
//!
//! Shares the streaming-block contract and bit-timing discipline of `ble-phy-core` but is an
//! independent sibling: `trigger()` loads a fresh queue of amplitudes from a per-(mode, group)
//! codebook, and `work()` drains it into caller-supplied output buffers as amplitude-keyed
//! complex samples.

#[macro_use]
mod log;

mod burster;
mod codebook;
mod error;

pub use crate::burster::{Burster, BursterConfig, Label};
pub use crate::codebook::Codebook;
pub use crate::error::Error;
