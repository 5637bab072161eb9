//! Streaming approximate-quantile digest.
//!
//! A merging t-digest: values accumulate in a small buffer and are
//! periodically merged into a bounded list of weighted centroids, so a stream
//! of millions of samples is summarized in memory proportional to the
//! compression factor, not the stream length. Centroids near the extremes are
//! kept small (the scale function caps centroid weight at ~k'(q)), which is
//! what keeps tail percentiles accurate.
//!
//! Accuracy is approximate by construction. Queries interpolate between
//! centroid means, clamped to the observed min/max.

use crate::constants::{DIGEST_BUFFER_CAP, DIGEST_COMPRESSION};
use crate::error::{Result, SimError};

#[derive(Clone, Copy, Debug)]
struct Centroid {
    mean: f64,
    weight: f64,
}

/// Bounded-memory sketch of a value stream supporting percentile queries.
pub struct QuantileDigest {
    compression: f64,
    centroids: Vec<Centroid>,
    buffer: Vec<f64>,
    merged_weight: f64,
    min: f64,
    max: f64,
}

impl Default for QuantileDigest {
    fn default() -> Self {
        Self::new(DIGEST_COMPRESSION)
    }
}

impl QuantileDigest {
    pub fn new(compression: f64) -> Self {
        Self {
            compression: compression.max(10.0),
            centroids: Vec::new(),
            buffer: Vec::with_capacity(DIGEST_BUFFER_CAP),
            merged_weight: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Total number of values ingested (merged or still buffered).
    pub fn count(&self) -> u64 {
        self.merged_weight as u64 + self.buffer.len() as u64
    }

    /// Ingest one value. Triggers an automatic merge when the buffer fills.
    pub fn push(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.buffer.push(value);
        if self.buffer.len() >= DIGEST_BUFFER_CAP {
            self.compress();
        }
    }

    /// Scale function k1(q) = c/(2π) · asin(2q - 1).
    fn k(&self, q: f64) -> f64 {
        let x = (2.0 * q - 1.0).clamp(-1.0, 1.0);
        self.compression / (2.0 * std::f64::consts::PI) * x.asin()
    }

    /// Inverse scale function. The argument is clamped to k's range so a
    /// limit past the end of the stream maps to q = 1 instead of wrapping.
    fn k_inv(&self, k: f64) -> f64 {
        let k = k.clamp(-self.compression / 4.0, self.compression / 4.0);
        let x = (k * 2.0 * std::f64::consts::PI / self.compression).sin();
        (x + 1.0) / 2.0
    }

    /// Merge buffered values into the centroid list.
    pub fn compress(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        self.buffer.sort_by(|a, b| a.total_cmp(b));

        // Merge the sorted buffer and the existing (sorted) centroids into a
        // single ascending run.
        let mut incoming: Vec<Centroid> =
            Vec::with_capacity(self.centroids.len() + self.buffer.len());
        {
            let mut ci = self.centroids.iter().peekable();
            let mut bi = self.buffer.iter().peekable();
            loop {
                match (ci.peek(), bi.peek()) {
                    (Some(c), Some(v)) => {
                        if c.mean <= **v {
                            incoming.push(*ci.next().unwrap());
                        } else {
                            incoming.push(Centroid {
                                mean: *bi.next().unwrap(),
                                weight: 1.0,
                            });
                        }
                    }
                    (Some(_), None) => incoming.push(*ci.next().unwrap()),
                    (None, Some(_)) => incoming.push(Centroid {
                        mean: *bi.next().unwrap(),
                        weight: 1.0,
                    }),
                    (None, None) => break,
                }
            }
        }
        self.buffer.clear();

        let total: f64 = incoming.iter().map(|c| c.weight).sum();
        let mut merged: Vec<Centroid> = Vec::with_capacity(incoming.len().min(
            (2.0 * self.compression) as usize + 8,
        ));

        let mut acc = incoming[0];
        let mut weight_so_far = 0.0;
        let mut q_limit = self.k_inv(self.k(0.0) + 1.0);

        for c in &incoming[1..] {
            let q = (weight_so_far + acc.weight + c.weight) / total;
            if q <= q_limit {
                // Fold into the current centroid, weighted mean.
                let w = acc.weight + c.weight;
                acc.mean += (c.mean - acc.mean) * c.weight / w;
                acc.weight = w;
            } else {
                weight_so_far += acc.weight;
                merged.push(acc);
                q_limit = self.k_inv(self.k(weight_so_far / total) + 1.0);
                acc = *c;
            }
        }
        merged.push(acc);

        self.centroids = merged;
        self.merged_weight = total;
    }

    /// Approximate value at quantile `p` in [0, 1].
    ///
    /// Fails with [`SimError::IncompleteState`] when nothing has been merged
    /// yet, or when pushed values are still sitting in the buffer — callers
    /// must run a final [`compress`](Self::compress) before querying rather
    /// than receive an answer that ignores part of the stream.
    pub fn percentile(&self, p: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&p) {
            return Err(SimError::invalid("percentile", p, "must lie in [0, 1]"));
        }
        if self.centroids.is_empty() {
            return Err(SimError::IncompleteState(
                "percentile queried before any samples were merged",
            ));
        }
        if !self.buffer.is_empty() {
            return Err(SimError::IncompleteState(
                "buffered samples pending; compress before querying",
            ));
        }

        let total = self.merged_weight;
        let target = p * total;

        // Cumulative weight at each centroid's midpoint; interpolate between
        // neighboring midpoints, anchored at the observed extremes.
        let mut cum = 0.0;
        let mut prev_mid = 0.0;
        let mut prev_mean = self.min;
        for c in &self.centroids {
            let mid = cum + c.weight / 2.0;
            if target <= mid {
                let span = mid - prev_mid;
                let t = if span > 0.0 {
                    (target - prev_mid) / span
                } else {
                    0.0
                };
                return Ok((prev_mean + t * (c.mean - prev_mean)).clamp(self.min, self.max));
            }
            cum += c.weight;
            prev_mid = mid;
            prev_mean = c.mean;
        }

        // Above the last midpoint: interpolate toward the observed maximum.
        let span = total - prev_mid;
        let t = if span > 0.0 {
            (target - prev_mid) / span
        } else {
            1.0
        };
        Ok((prev_mean + t * (self.max - prev_mean)).clamp(self.min, self.max))
    }
}
