//! The per-(mode, group) code table BURSTER draws from (§4.4).

use std::collections::HashMap;

/// Maps `(mode, group)` to its list of bit-string variants.
///
/// Only `(true, "A")` and `(false, "A")` are populated, with the eight 94-bit variants each
/// carried over from the reference implementation's remote-control codes. Any other `(mode,
/// group)` pair legitimately resolves to an empty variant list rather than an error — `group` is
/// a free-form string, and `"B"`/`"C"`/`"D"`/`"ALL"` are valid addresses that simply have nothing
/// behind them yet.
pub struct Codebook {
    cells: HashMap<(bool, String), Vec<&'static str>>,
}

impl Codebook {
    /// Builds the codebook shipped with this crate.
    pub fn standard() -> Self {
        let mut cells = HashMap::new();
        cells.insert((true, "A".to_owned()), ON_A.to_vec());
        cells.insert((false, "A".to_owned()), OFF_A.to_vec());
        Codebook { cells }
    }

    /// Returns the variants for `(mode, group)`, or an empty slice if that cell has no codes.
    pub fn variants(&self, mode: bool, group: &str) -> &[&'static str] {
        self.cells
            .get(&(mode, group.to_owned()))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for Codebook {
    fn default() -> Self {
        Self::standard()
    }
}

const ON_A: &[&str] = &[
    "1111110000000000000011010011011010010011101001101001101101001001001001101001101001101101001000",
    "1111110000000000000011010011011010010011101001101001101101001001001001101001101001101101001001",
    "1111110000000000000011010011011010010011010001101001101101001001001001101001101001101101001001",
    "1111110000000000000011010011011010010011010001101001101101001001001001101001101001101101001000",
    "1111110000000000000011010011011010010011001001101001101101001001001001101001101001101101001001",
    "1111110000000000000011010011011010010011001001101001101101001001001001101001101001101101001000",
    "1111110000000000000011010011011010010011011001101001101101001001001001101001101001101101001000",
    "1111110000000000000011010011011010010011011001101001101101001001001001101001101001101101001001",
];

const OFF_A: &[&str] = &[
    "1111110000000000000011010011011011010011001001001101001101101001101001101001101101101101001000",
    "1111110000000000000011010011011011010011001001001101001101101001101001101001101101101101001001",
    "1111110000000000000011010011011011010011010001001101001101101001101001101001101101101101001000",
    "1111110000000000000011010011011011010011010001001101001101101001101001101001101101101101001001",
    "1111110000000000000011010011011011010011101001001101001101101001101001101001101101101101001001",
    "1111110000000000000011010011011011010011101001001101001101101001101001101001101101101101001000",
    "1111110000000000000011010011011011010011011001001101001101101001101001101001101101101101001001",
    "1111110000000000000011010011011011010011011001001101001101101001101001101001101101101101001000",
];
