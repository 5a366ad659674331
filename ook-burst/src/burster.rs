//! BURSTER: the OOK burst generator (§4.4).

use std::collections::VecDeque;

use num_complex::Complex32;
use rand::Rng;

use crate::codebook::Codebook;
use crate::error::Error;

/// Static parameters for a [`Burster`], mirroring the reference block's configurable properties.
#[derive(Debug, Clone)]
pub struct BursterConfig {
    pub mode: bool,
    pub group: String,
    pub rate_sps: f64,
    pub gain: f32,
    pub repeat: usize,
    pub start_label: Option<String>,
    pub end_label: Option<String>,
}

/// An in-band label `work` can post, carried out-of-line from the sample buffer it accompanies.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Offset into the slice passed to the `work` call that produced this label.
    pub offset: usize,
    pub tag: String,
    /// `start_label`'s optional payload: the total length of the burst, in samples.
    pub payload: Option<usize>,
}

/// Streaming OOK burst generator. `trigger` loads a fresh burst from the codebook; repeated
/// `work` calls drain it into caller-supplied output slices, across as many calls as needed.
pub struct Burster {
    codebook: Codebook,
    config: BursterConfig,
    samps_per_sym: usize,
    queue: VecDeque<f32>,
    sym_counter: usize,
    burst_total_len: usize,
    pending_start_label: bool,
    end_label_emitted: bool,
}

impl Burster {
    pub fn new(codebook: Codebook, config: BursterConfig) -> Self {
        Burster {
            codebook,
            config,
            samps_per_sym: 0,
            queue: VecDeque::new(),
            sym_counter: 0,
            burst_total_len: 0,
            pending_start_label: false,
            end_label_emitted: true,
        }
    }

    /// Materializes a fresh queue of amplitudes from the codebook and arms the burst.
    pub fn trigger(&mut self) -> Result<(), Error> {
        if self.config.repeat == 0 {
            return Err(Error::InvalidRepeat);
        }
        let samps_per_sym = (self.config.rate_sps * 500e-6).floor() as i64;
        if samps_per_sym < 1 {
            return Err(Error::InvalidRate);
        }
        self.samps_per_sym = samps_per_sym as usize;

        self.queue.clear();
        let variants = self.codebook.variants(self.config.mode, &self.config.group);
        if !variants.is_empty() {
            let mut rng = rand::thread_rng();
            for _ in 0..self.config.repeat {
                let code = variants[rng.gen_range(0..variants.len())];
                self.queue
                    .extend(code.bytes().map(|ch| if ch == b'1' { self.config.gain } else { 0.0 }));
            }
        }

        self.sym_counter = 0;
        self.burst_total_len = self.queue.len() * self.samps_per_sym;
        self.pending_start_label = !self.queue.is_empty();
        self.end_label_emitted = self.queue.is_empty();
        info!("burster trigger: mode={} group={} queue_len={}", self.config.mode, self.config.group, self.queue.len());
        Ok(())
    }

    /// Fills as much of `out` as the remaining queue allows, returning the number of samples
    /// written and any labels to post alongside them.
    pub fn work(&mut self, out: &mut [Complex32]) -> (usize, Vec<Label>) {
        let mut labels = Vec::new();
        if self.pending_start_label {
            if let Some(tag) = &self.config.start_label {
                labels.push(Label {
                    offset: 0,
                    tag: tag.clone(),
                    payload: Some(self.burst_total_len),
                });
            }
            self.pending_start_label = false;
        }

        let mut written = 0;
        for slot in out.iter_mut() {
            match self.queue.front().copied() {
                None => break,
                Some(amp) => {
                    *slot = Complex32::new(amp, 0.0);
                    written += 1;
                    self.sym_counter += 1;
                    if self.sym_counter >= self.samps_per_sym {
                        self.queue.pop_front();
                        self.sym_counter = 0;
                    }
                }
            }
        }
        if self.queue.is_empty() && !self.end_label_emitted {
            if let Some(tag) = &self.config.end_label {
                labels.push(Label {
                    offset: written - 1,
                    tag: tag.clone(),
                    payload: None,
                });
            }
            self.end_label_emitted = true;
        }
        (written, labels)
    }

    /// True once the current burst's queue has been fully drained.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(repeat: usize) -> BursterConfig {
        BursterConfig {
            mode: true,
            group: "A".to_owned(),
            rate_sps: 250e3,
            gain: 0.7,
            repeat,
            start_label: Some("burst_start".to_owned()),
            end_label: Some("burst_end".to_owned()),
        }
    }

    fn drain_fully(burster: &mut Burster) -> (Vec<Complex32>, Vec<Label>) {
        let mut samples = Vec::new();
        let mut labels = Vec::new();
        let mut buf = [Complex32::new(0.0, 0.0); 4096];
        loop {
            let (n, new_labels) = burster.work(&mut buf);
            for l in new_labels {
                labels.push(Label {
                    offset: l.offset + samples.len(),
                    ..l
                });
            }
            samples.extend_from_slice(&buf[..n]);
            if burster.is_idle() && n < buf.len() {
                break;
            }
        }
        (samples, labels)
    }

    #[test]
    fn burst_length_and_amplitude_match_the_closed_form() {
        let mut b = Burster::new(Codebook::standard(), config(3));
        b.trigger().unwrap();
        let (samples, labels) = drain_fully(&mut b);

        assert_eq!(samples.len(), 3 * 94 * 125);
        assert!(samples.iter().all(|s| (s.re == 0.0 || s.re == 0.7) && s.im == 0.0));

        let starts: Vec<_> = labels.iter().filter(|l| l.tag == "burst_start").collect();
        let ends: Vec<_> = labels.iter().filter(|l| l.tag == "burst_end").collect();
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].offset, 0);
        assert_eq!(starts[0].payload, Some(3 * 94 * 125));
        assert_eq!(ends.len(), 1);
        assert_eq!(ends[0].offset, samples.len() - 1);
    }

    #[test]
    fn empty_group_produces_a_silent_no_op_burst() {
        let mut b = Burster::new(
            Codebook::standard(),
            BursterConfig {
                group: "B".to_owned(),
                ..config(3)
            },
        );
        b.trigger().unwrap();
        let (samples, labels) = drain_fully(&mut b);
        assert!(samples.is_empty());
        assert!(labels.is_empty());
    }

    #[test]
    fn repeats_vary_across_draws_when_multiple_variants_exist() {
        let mut b = Burster::new(Codebook::standard(), config(20));
        b.trigger().unwrap();
        let (samples, _) = drain_fully(&mut b);
        let chunks: Vec<&[Complex32]> = samples.chunks(94 * 125).collect();
        assert_eq!(chunks.len(), 20);
        assert!(chunks.windows(2).any(|w| w[0] != w[1]), "20 repeats never varied");
    }

    #[test]
    fn rejects_a_rate_too_low_for_one_sample_per_symbol() {
        let mut b = Burster::new(Codebook::standard(), BursterConfig { rate_sps: 1.0, ..config(1) });
        assert_eq!(b.trigger(), Err(Error::InvalidRate));
    }
}
