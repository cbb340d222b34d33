//! Minimal linear/band scales and tick generation.

/// Maps a continuous domain onto a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
	pub domain: (f64, f64),
	pub range: (f64, f64),
}

impl LinearScale {
	pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
		Self { domain, range }
	}

	/// A zero-length domain maps everything to the middle of the range.
	pub fn scale(&self, v: f64) -> f64 {
		let (d0, d1) = self.domain;
		let (r0, r1) = self.range;
		if d1 == d0 {
			return (r0 + r1) / 2.0;
		}
		r0 + (v - d0) / (d1 - d0) * (r1 - r0)
	}

	/// A zero-length range maps everything back to the domain start.
	pub fn invert(&self, v: f64) -> f64 {
		let (d0, d1) = self.domain;
		let (r0, r1) = self.range;
		if r1 == r0 {
			return d0;
		}
		d0 + (v - r0) / (r1 - r0) * (d1 - d0)
	}

	/// Widen the domain outward to multiples of the tick step.
	pub fn nice(mut self, count: usize) -> Self {
		let (d0, d1) = self.domain;
		let step = tick_step(d0, d1, count);
		if step > 0.0 {
			let (lo, hi) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
			let (lo, hi) = ((lo / step).floor() * step, (hi / step).ceil() * step);
			self.domain = if d0 <= d1 { (lo, hi) } else { (hi, lo) };
		}
		self
	}

	pub fn ticks(&self, count: usize) -> Vec<f64> {
		ticks(self.domain.0, self.domain.1, count)
	}
}

/// Splits a range into equal bands, one per key, with fractional padding.
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
	keys: Vec<String>,
	range: (f64, f64),
	padding: f64,
}

impl BandScale {
	pub fn new<I, S>(keys: I, range: (f64, f64)) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			keys: keys.into_iter().map(Into::into).collect(),
			range,
			padding: 0.0,
		}
	}

	/// Inner and outer padding as a fraction of the step, clamped to `0..1`.
	pub fn padding(mut self, padding: f64) -> Self {
		self.padding = padding.clamp(0.0, 0.99);
		self
	}

	/// Distance between the starts of adjacent bands.
	pub fn step(&self) -> f64 {
		let n = self.keys.len() as f64;
		(self.range.1 - self.range.0) / (n + self.padding).max(1.0)
	}

	pub fn bandwidth(&self) -> f64 {
		self.step() * (1.0 - self.padding)
	}

	/// Start of the band for `key`, or `None` for an unknown key.
	pub fn position(&self, key: &str) -> Option<f64> {
		let i = self.keys.iter().position(|k| k == key)?;
		Some(self.range.0 + self.step() * (self.padding + i as f64))
	}
}

/// Step between roughly `count` ticks spanning `[min, max]`, rounded to
/// 1, 2 or 5 times a power of ten. Zero for degenerate input.
pub fn tick_step(min: f64, max: f64, count: usize) -> f64 {
	let span = (max - min).abs();
	if count == 0 || span == 0.0 || !span.is_finite() {
		return 0.0;
	}
	let raw = span / count as f64;
	let power = 10f64.powf(raw.log10().floor());
	let error = raw / power;
	let factor = if error >= 50f64.sqrt() {
		10.0
	} else if error >= 10f64.sqrt() {
		5.0
	} else if error >= 2f64.sqrt() {
		2.0
	} else {
		1.0
	};
	factor * power
}

/// "Nice" tick values inside `[min, max]`. Reversed bounds give descending
/// ticks; equal bounds give the single value.
pub fn ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
	if min == max && count > 0 && min.is_finite() {
		return vec![min];
	}
	let reverse = max < min;
	let (lo, hi) = if reverse { (max, min) } else { (min, max) };
	let step = tick_step(lo, hi, count);
	if step == 0.0 {
		return Vec::new();
	}
	let (start, stop) = ((lo / step).ceil() as i64, (hi / step).floor() as i64);
	// multiply rather than accumulate to keep values exact
	let mut out: Vec<f64> = (start..=stop).map(|i| i as f64 * step).collect();
	if reverse {
		out.reverse();
	}
	out
}
