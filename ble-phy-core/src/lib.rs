//! A BTLE advertising-channel physical-layer decoder.
//!
//! Reimplements the INTAKE/DECODER/EMITTER pipeline of a streaming BTLE demodulator: samples are
//! fed in one at a time, and every sample past warm-up is checked for a complete, CRC-valid
//! advertising PDU ending at that point. A successful decode whitens the payload, verifies the
//! CRC24, and parses the GAP AD structures it carries into a [`PacketRecord`].
//!
//! This crate only covers the advertising-channel physical layer (preamble through AD-structure
//! parsing); the upstream FM demodulator, the NRF24 sibling decoder, and any downstream message
//! sink or HCI tooling are out of scope and live elsewhere.

#[macro_use]
mod log;

pub mod ad_structure;
pub mod crc;
pub mod decoder;
mod error;
pub mod record;
pub mod ring;
pub mod sensor;
mod utils;
pub mod whitening;

pub use crate::decoder::Decoder;
pub use crate::error::Error;
pub use crate::record::{PacketRecord, Value};
pub use crate::sensor::{SensorMonitor, SensorMonitorConfig, SensorState};
