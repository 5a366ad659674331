//! Packet detection and decoding (DECODER, §4.2) on top of the [`RingBuffer`] (INTAKE, §4.1).

use crate::ad_structure;
use crate::crc::{crc24, ADVERTISING_CRC_INIT};
use crate::error::Error;
use crate::record::PacketRecord;
use crate::ring::RingBuffer;
use crate::utils::{swap_bits, HexSlice};
use crate::whitening::{whiten, ADVERTISING_CHANNEL};

/// Samples per symbol on the advertising channel (2 Msps sampling a 1 Mbps stream).
const SRATE: usize = 2;

/// BTLE advertising-channel access address.
const ADVERTISING_ACCESS_ADDRESS: u64 = 0x8E89_BED6;

/// |threshold| at or above this magnitude indicates a saturated or DC-biased window.
const THRESHOLD_LIMIT: i64 = 15500;

/// Streaming BTLE advertising-channel decoder.
///
/// Owns the ring buffer and the warm-up/debounce bookkeeping from INTAKE, and drives the
/// preamble/access-address/whitening/CRC/AD-structure pipeline from DECODER on every sample once
/// warm-up has completed.
pub struct Decoder {
    ring: RingBuffer,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder {
            ring: RingBuffer::new(),
        }
    }

    /// Feeds one sample into the decoder.
    ///
    /// Returns `Some(record)` exactly when a BTLE advertising PDU was recovered ending at this
    /// sample; this is the `true` case of the spec's `feed_one(sample) -> bool`, with the
    /// out-of-band `packetData` folded into the return value instead of a side channel.
    pub fn feed_one(&mut self, sample: u16) -> Option<PacketRecord> {
        if !self.ring.advance(sample) {
            return None;
        }

        match self.attempt_decode() {
            Ok(record) => {
                self.ring.debounce();
                info!("decoded BTLE advertising packet: {}", record);
                Some(record)
            }
            Err(e) => {
                debug!("decode attempt rejected: {}", e);
                None
            }
        }
    }

    /// Accepts either a signed or unsigned 16-bit sample, reinterpreted bitwise (§6, §9).
    pub fn feed_one_i16(&mut self, sample: i16) -> Option<PacketRecord> {
        self.feed_one(sample as u16)
    }

    /// Accepts a frequency-demodulated float sample in `[-pi, +pi]`, scaled per §6:
    /// `u16(x * 32768/pi)`.
    pub fn feed_one_float(&mut self, sample: f32) -> Option<PacketRecord> {
        const GAIN: f32 = 32768.0 / std::f32::consts::PI;
        self.feed_one((sample * GAIN) as i16 as u16)
    }

    fn attempt_decode(&self) -> Result<PacketRecord, Error> {
        let window = 8 * SRATE;
        let sum: i64 = (0..window).map(|c| self.ring.rb(c) as i64).sum();
        let threshold = sum / window as i64;

        let q = |k: usize| -> bool { (self.ring.rb(k * SRATE) as i64) > threshold };

        let q9 = q(9);
        let mut transitions = 0u32;
        for c in 0..8 {
            let (a, b) = (q(c), q(c + 1));
            let transitioned = if q9 { a && !b } else { !a && b };
            if transitioned {
                transitions += 1;
            }
        }
        if transitions != 4 {
            return Err(Error::PreambleMiss);
        }
        if threshold.abs() >= THRESHOLD_LIMIT {
            return Err(Error::ThresholdTooLarge);
        }

        let extract_byte = |l: usize| -> u8 {
            let mut byte = 0u8;
            for c in 0..8 {
                if q(l + c) {
                    byte |= 1 << (7 - c);
                }
            }
            byte
        };
        let extract_bytes = |l: usize, n: usize| -> Vec<u8> {
            (0..n).map(|i| extract_byte(l + i * 8)).collect()
        };

        let aa_bytes = extract_bytes(8, 4);
        let mut access_address: u64 = 0;
        for (i, &b) in aa_bytes.iter().enumerate() {
            access_address |= u64::from(swap_bits(b)) << (8 * i);
        }
        if access_address != ADVERTISING_ACCESS_ADDRESS {
            return Err(Error::WrongAccessAddress);
        }

        let mut header = extract_bytes(40, 2);
        whiten(&mut header, ADVERTISING_CHANNEL);
        let packet_length = (swap_bits(header[1]) & 0x3F) as usize;

        let mut pkt = extract_bytes(40, packet_length + 2 + 3);
        whiten(&mut pkt, ADVERTISING_CHANNEL);
        trace!("dewhitened pdu: {:?}", HexSlice(&pkt));

        let calced_crc = crc24(&pkt[..packet_length + 2], ADVERTISING_CRC_INIT);
        let received_crc = (u32::from(pkt[packet_length + 2]) << 16)
            | (u32::from(pkt[packet_length + 3]) << 8)
            | u32::from(pkt[packet_length + 4]);
        if received_crc != calced_crc {
            return Err(Error::CrcMismatch);
        }

        let mut record = PacketRecord::new();
        record.set("Timestamp", self.ring.sample_counter() as i64);
        record.set("Address", format!("0x{:08x}", access_address as u32));
        record.set("CRC", format!("0x{:06x}", received_crc));
        record.set("SampleIndex", self.ring.sample_counter() as i64);
        record.set("Threshold", threshold);

        if let Some(mac_bytes) = pkt.get(2..8) {
            let mac = (0..6)
                .rev()
                .map(|i| format!("{:02x}", swap_bits(mac_bytes[i])))
                .collect::<Vec<_>>()
                .join(":");
            record.set("MAC", mac);

            let total = packet_length + 2;
            if total >= 8 {
                ad_structure::parse(&pkt[8..total], total - 8, &mut record);
            }
        }

        Ok(record)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds the reversed-reader-index symbol table (`table[k] == Q(k)` once every sample below
    /// is fed) that makes `attempt_decode` extract exactly the given access address and
    /// whitened header/payload/CRC bytes.
    ///
    /// `Q(k)` reads `k` symbols before "now" (§4.1's `rb(l)`, age == `l`), so a byte read by
    /// `extract_byte(l)` is carried by symbols at indices `l..l+8`, and a *later* field (larger
    /// `l`) sits *further back in time* than an earlier one. The only free choice left once every
    /// field's bits are pinned down is the 8 preamble symbols below index 8 (index 8 itself is
    /// shared with the access address's top bit); those are filled with a strict alternation that
    /// satisfies the 4-transition check for either polarity.
    fn solve_symbol_table(constraints: &[(usize, bool)]) -> Vec<bool> {
        let max_index = constraints.iter().map(|&(i, _)| i).max().unwrap();
        let mut table = vec![false; max_index + 1];
        for &(i, v) in constraints {
            table[i] = v;
        }
        let v8 = table[8];
        for k in 0..8 {
            let dist_from_8 = 8 - k;
            table[k] = if dist_from_8 % 2 == 0 { v8 } else { !v8 };
        }
        table
    }

    fn byte_constraints(l: usize, byte: u8) -> [(usize, bool); 8] {
        let mut out = [(0usize, false); 8];
        for c in 0..8 {
            out[c] = (l + c, (byte >> (7 - c)) & 1 != 0);
        }
        out
    }

    /// Turns a solved symbol table into a sample stream, fed oldest (`table.last()`, index
    /// `table.len() - 1`) to newest (`table[0]`, the final sample fed), 2 samples/symbol.
    fn table_to_samples(table: &[bool], lo: i16, hi: i16) -> Vec<u16> {
        let mut out = Vec::with_capacity(table.len() * SRATE);
        for &bit in table.iter().rev() {
            let level = if bit { hi } else { lo } as u16;
            for _ in 0..SRATE {
                out.push(level);
            }
        }
        out
    }

    /// Builds the sample stream for one full advertising PDU: access address plus the already
    /// whitened header/payload/CRC bytes `extract_bytes(40, ..)` must read off the air.
    fn build_packet_samples(access_address: u32, whitened_pkt: &[u8]) -> Vec<u16> {
        let mut constraints = Vec::new();
        for i in 0..4 {
            let byte = ((access_address >> (8 * i)) & 0xFF) as u8;
            constraints.extend_from_slice(&byte_constraints(8 + 8 * i, swap_bits(byte)));
        }
        for (i, &byte) in whitened_pkt.iter().enumerate() {
            constraints.extend_from_slice(&byte_constraints(40 + 8 * i, byte));
        }
        let table = solve_symbol_table(&constraints);
        table_to_samples(&table, -5000, 5000)
    }

    fn feed_stream(dec: &mut Decoder, samples: &[u16]) -> Vec<PacketRecord> {
        samples.iter().filter_map(|&s| dec.feed_one(s)).collect()
    }

    fn whitened_flags_only_pdu(packet_length: u8, tamper_crc: bool) -> Vec<u8> {
        let header = [0x02u8, packet_length]; // ADV_NONCONN_IND
        let payload = [0xAAu8, 0xBBu8, 0xCCu8, 0xDDu8, 0xEEu8, 0xFFu8, 2, 0x01, 0x06]; // MAC + Flags AD

        let mut plain = Vec::new();
        plain.extend_from_slice(&header);
        plain.extend_from_slice(&payload);
        let crc = crc24(&plain, ADVERTISING_CRC_INIT);
        plain.push((((crc >> 16) & 0xFF) as u8) ^ if tamper_crc { 0x01 } else { 0x00 });
        plain.push(((crc >> 8) & 0xFF) as u8);
        plain.push((crc & 0xFF) as u8);

        whiten(&mut plain, ADVERTISING_CHANNEL);
        plain
    }

    #[test]
    fn end_to_end_flags_only_advertisement() {
        let whitened = whitened_flags_only_pdu(8, false);
        let samples = build_packet_samples(0x8E89_BED6, &whitened);

        let mut dec = Decoder::new();
        let mut stream = vec![0u16; crate::ring::CAPACITY];
        stream.extend(samples);
        let records = feed_stream(&mut dec, &stream);

        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(
            rec.get("Address"),
            Some(&crate::record::Value::Str("0x8e89bed6".to_owned()))
        );
        assert_eq!(
            rec.get("MAC"),
            Some(&crate::record::Value::Str("aa:bb:cc:dd:ee:ff".to_owned()))
        );
        assert_eq!(rec.get("Flags"), Some(&crate::record::Value::Int(6)));
    }

    #[test]
    fn crc_tamper_yields_zero_records() {
        let whitened = whitened_flags_only_pdu(8, true);
        let samples = build_packet_samples(0x8E89_BED6, &whitened);

        let mut dec = Decoder::new();
        let mut stream = vec![0u16; crate::ring::CAPACITY];
        stream.extend(samples);
        let records = feed_stream(&mut dec, &stream);
        assert!(records.is_empty());
    }

    #[test]
    fn warmup_never_emits_on_silence() {
        let mut dec = Decoder::new();
        for i in 0..crate::ring::CAPACITY {
            assert!(dec.feed_one(i as u16).is_none());
        }
    }
}
