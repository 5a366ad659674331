//! Sample intake and the ring buffer it feeds (INTAKE, §4.1).

/// Ring buffer capacity, in samples. Part of the spec; not configurable.
pub const CAPACITY: usize = 1000;

/// Number of samples fed before the decoder is allowed to run for the first time.
const WARMUP: u32 = 1000;

/// Samples to skip immediately after a successful decode, so the same packet is not
/// re-detected at the next few adjacent sample offsets.
const DEBOUNCE: u32 = 20;

/// Fixed-capacity circular buffer of signed 16-bit samples, with the bookkeeping INTAKE needs
/// to gate the decoder (warm-up) and de-duplicate detections (debounce).
pub struct RingBuffer {
    buf: [i16; CAPACITY],
    /// Index of the most recently written sample.
    head: usize,
    /// Counts down from [`WARMUP`]; the decoder must not run while this is nonzero.
    skip: u32,
    /// Monotonically increasing count of samples fed. Doubles as `SampleIndex`/`Timestamp`.
    sample_counter: u64,
}

impl RingBuffer {
    pub fn new() -> Self {
        RingBuffer {
            buf: [0; CAPACITY],
            head: CAPACITY - 1,
            skip: WARMUP,
            sample_counter: 0,
        }
    }

    /// Reader index helper: the sample written `l` positions before the current head.
    ///
    /// `l == 0` is the most recently written sample; larger `l` reaches further into the past.
    /// `l` is not required to be less than [`CAPACITY`] (the caller may walk further back than a
    /// full buffer's worth of history), matching how far the decoder's own offsets can reach;
    /// indices simply wrap and re-read older, already-overwritten slots in that case.
    pub fn rb(&self, l: usize) -> i16 {
        let l = l % CAPACITY;
        self.buf[(self.head + CAPACITY - l) % CAPACITY]
    }

    /// Number of samples fed so far (saturates only in the sense that it is a `u64` counter).
    pub fn sample_counter(&self) -> u64 {
        self.sample_counter
    }

    /// Writes one sample, advancing the head. Returns `true` once warm-up has completed and the
    /// caller may attempt a decode at this sample.
    pub fn advance(&mut self, sample: u16) -> bool {
        self.head = (self.head + 1) % CAPACITY;
        self.buf[self.head] = sample as i16;

        if self.skip >= 1 {
            self.skip -= 1;
            return false;
        }
        self.sample_counter += 1;
        true
    }

    /// Called once a decode attempt at the current sample succeeds, to arm the debounce window.
    pub fn debounce(&mut self) {
        self.skip = DEBOUNCE;
    }
}

impl Default for RingBuffer {
    fn default() -> Self {
        Self::new()
    }
}
