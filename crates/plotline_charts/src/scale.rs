use rustc_hash::FxHashMap;

use crate::key::{finite_number, Key};

// Tick-step thresholds: sqrt(50), sqrt(10), sqrt(2).
const E10: f64 = 7.0710678118654755;
const E5: f64 = 3.1622776601683795;
const E2: f64 = 1.4142135623730951;

/// Tick count used when rounding a domain outward.
pub const NICE_TICK_COUNT: usize = 10;

/// Continuous affine scale from `[domain_min, domain_max]` to `[range_min, range_max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    pub fn new(domain_min: f64, domain_max: f64, range_min: f64, range_max: f64) -> Self {
        Self {
            domain_min,
            domain_max,
            range_min,
            range_max,
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    pub fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }

    /// A zero-width domain maps everything to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let d = self.domain_max - self.domain_min;
        if d.abs() < 1e-12 {
            return (self.range_min + self.range_max) * 0.5;
        }
        let t = (value - self.domain_min) / d;
        self.range_min + t * (self.range_max - self.range_min)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let r = self.range_max - self.range_min;
        if r.abs() < 1e-12 {
            return self.domain_min;
        }
        let t = (px - self.range_min) / r;
        self.domain_min + t * (self.domain_max - self.domain_min)
    }

    /// Rounds the domain outward to tick-step boundaries.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = (self.domain_min, self.domain_max);
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }
        let mut prestep = f64::NAN;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if step == prestep || !step.is_finite() || step == 0.0 {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            }
            prestep = step;
        }
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }
        self.domain_min = start;
        self.domain_max = stop;
        self
    }

    /// Human-friendly tick values inside the domain (about `count` of them).
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = ordered(self.domain_min, self.domain_max);
        if count == 0 || !start.is_finite() || !stop.is_finite() {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let step = tick_increment(start, stop, count);
        if !step.is_finite() || step == 0.0 {
            return Vec::new();
        }
        // Negative increments encode 1/step to keep fractional ticks exact.
        let inv = step < 0.0;
        let (lo, hi) = if inv {
            ((start * -step).ceil(), (stop * -step).floor())
        } else {
            ((start / step).ceil(), (stop / step).floor())
        };
        if hi < lo {
            return Vec::new();
        }
        let n = (hi - lo) as usize + 1;
        (0..n)
            .map(|i| {
                let k = lo + i as f64;
                if inv {
                    k / -step
                } else {
                    k * step
                }
            })
            .collect()
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Tick step for `count` ticks over `[start, stop]`.
///
/// Steps are 1, 2 or 5 times a power of ten. Steps below 1 are returned as
/// the negated reciprocal (e.g. `-10.0` for `0.1`).
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Discrete scale placing `count` evenly spaced points over the range.
///
/// Point `i` sits at `range_min + i * step` with `step = span / count`,
/// so each point owns the band `[i * step, (i + 1) * step)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointScale {
    count: usize,
    start: f64,
    step: f64,
}

impl PointScale {
    pub fn new(count: usize, range_min: f64, range_max: f64) -> Self {
        if count == 0 {
            return Self {
                count: 0,
                start: range_min,
                step: 0.0,
            };
        }
        let span = (range_max - range_min).max(0.0);
        Self {
            count,
            start: range_min,
            step: span / count as f64,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn position(&self, idx: usize) -> Option<f64> {
        if idx >= self.count {
            return None;
        }
        Some(self.start + self.step * idx as f64)
    }

    /// Index owning pixel `px`: `round(px / step - 0.5)`, clamped into the domain.
    pub fn index_at(&self, px: f64) -> Option<usize> {
        if self.count == 0 || self.step <= 0.0 || !px.is_finite() {
            return None;
        }
        let raw = ((px - self.start) / self.step - 0.5).round();
        Some(raw.clamp(0.0, (self.count - 1) as f64) as usize)
    }
}

/// X scale for one of the three key domains.
#[derive(Clone, Debug, PartialEq)]
pub enum XScale {
    /// Epoch milliseconds.
    Time(LinearScale),
    Number(LinearScale),
    Category {
        scale: PointScale,
        domain: Vec<String>,
        /// Category to point index.
        positions: FxHashMap<String, usize>,
    },
}

impl XScale {
    /// Point scale over `domain` spread across `[0, width]`.
    pub fn category(domain: Vec<String>, width: f64) -> Self {
        let positions = domain
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self::Category {
            scale: PointScale::new(domain.len(), 0.0, width),
            domain,
            positions,
        }
    }

    pub fn is_continuous(&self) -> bool {
        !matches!(self, Self::Category { .. })
    }

    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Time(s) | Self::Number(s) => s.range(),
            Self::Category { scale, .. } => {
                (scale.start, scale.start + scale.step * scale.count as f64)
            }
        }
    }

    /// Step between category points; zero for continuous scales.
    pub fn step(&self) -> f64 {
        match self {
            Self::Category { scale, .. } => scale.step(),
            _ => 0.0,
        }
    }

    /// Pixel position of `key`, or `None` for a key of the wrong kind or an
    /// unknown category.
    pub fn map_key(&self, key: &Key) -> Option<f64> {
        match (self, key) {
            (Self::Time(s), Key::Time(_)) | (Self::Number(s), Key::Number(_)) => {
                key.as_f64().map(|v| s.map(v))
            }
            (Self::Category { scale, positions, .. }, Key::Category(c)) => {
                positions.get(c).and_then(|&i| scale.position(i))
            }
            _ => None,
        }
    }

    /// Key under `px`, or `None` outside the range.
    ///
    /// Continuous scales use the analytic inverse; category scales pick the
    /// point whose band contains `px`.
    pub fn invert(&self, px: f64) -> Option<Key> {
        if !self.contains_px(px) {
            return None;
        }
        match self {
            Self::Time(s) => Key::time_from_millis(s.invert(px)),
            Self::Number(s) => finite_number(s.invert(px)).map(Key::Number),
            Self::Category { scale, domain, .. } => scale
                .index_at(px)
                .and_then(|i| domain.get(i))
                .map(|c| Key::Category(c.clone())),
        }
    }

    pub fn contains_px(&self, px: f64) -> bool {
        let (lo, hi) = self.range();
        px.is_finite() && px >= lo.min(hi) && px <= lo.max(hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_maps_and_inverts() {
        let s = LinearScale::new(0.0, 100.0, 10.0, 210.0);
        assert!((s.map(50.0) - 110.0).abs() < 1e-9);
        assert!((s.invert(110.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn linear_invert_handles_descending_range() {
        let s = LinearScale::new(0.0, 100.0, 200.0, 100.0);
        assert!((s.invert(150.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn nice_rounds_outward() {
        let s = LinearScale::new(5.0, 20.0, 400.0, 0.0).nice(NICE_TICK_COUNT);
        assert_eq!(s.domain(), (4.0, 20.0));
        let s = LinearScale::new(0.13, 0.97, 0.0, 1.0).nice(NICE_TICK_COUNT);
        assert_eq!(s.domain(), (0.1, 1.0));
        let s = LinearScale::new(0.0, 20.0, 0.0, 1.0).nice(NICE_TICK_COUNT);
        assert_eq!(s.domain(), (0.0, 20.0));
    }

    #[test]
    fn ticks_are_round_numbers_within_domain() {
        let s = LinearScale::new(0.0, 10.0, 0.0, 1.0);
        assert_eq!(s.ticks(5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        let s = LinearScale::new(0.0, 1.0, 0.0, 1.0);
        assert_eq!(s.ticks(5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert!(s.ticks(0).is_empty());
    }

    #[test]
    fn point_scale_uses_even_bands() {
        let p = PointScale::new(5, 0.0, 400.0);
        assert_eq!(p.step(), 80.0);
        assert_eq!(p.position(2), Some(160.0));
        assert_eq!(p.position(5), None);
        assert_eq!(p.index_at(160.0), Some(2));
        assert_eq!(p.index_at(239.0), Some(2));
        assert_eq!(p.index_at(-50.0), Some(0));
        assert_eq!(p.index_at(1000.0), Some(4));
    }

    #[test]
    fn category_keys_map_to_their_points() {
        let domain: Vec<String> = ["a", "b", "c", "d", "e"].iter().map(|c| c.to_string()).collect();
        let x = XScale::category(domain, 400.0);
        assert_eq!(x.map_key(&Key::Category("a".into())), Some(0.0));
        assert_eq!(x.map_key(&Key::Category("d".into())), Some(240.0));
        assert_eq!(x.map_key(&Key::Category("z".into())), None);
        assert_eq!(x.map_key(&Key::Number(1.0)), None);
        assert_eq!(x.invert(170.0), Some(Key::Category("c".into())));
    }

    #[test]
    fn point_scale_with_zero_count_has_no_positions() {
        let p = PointScale::new(0, 0.0, 100.0);
        assert_eq!(p.step(), 0.0);
        assert!(p.position(0).is_none());
        assert!(p.index_at(10.0).is_none());
    }

    #[test]
    fn x_scale_rejects_mismatched_keys() {
        let x = XScale::Number(LinearScale::new(0.0, 10.0, 0.0, 100.0));
        assert_eq!(x.map_key(&Key::Number(5.0)), Some(50.0));
        assert_eq!(x.map_key(&Key::Category("5".into())), None);
    }
}
