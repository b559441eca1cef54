//! `#rrggbb` colors: random cluster colors and endpoint blending.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use super::error::ColorError;

/// Default brightness the strongest channel of a cluster color is scaled to.
pub const DEFAULT_TARGET_BRIGHTNESS: u8 = 181;

/// An opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
}

impl Color {
	/// Build a color from exact channel values.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Build a color from fractional channels, rounding and clamping each to 0..=255.
	pub fn make_color(r: f64, g: f64, b: f64) -> Self {
		let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
		Self::rgb(channel(r), channel(g), channel(b))
	}

	/// Draw a random color whose brightest channel lands on `target`.
	///
	/// All three channels are scaled by the same ratio, so the hue survives
	/// while perceived brightness is normalized across draws.
	pub fn random<R: Rng>(rng: &mut R, target: u8) -> Self {
		let (r, g, b) = (
			rng.random_range(0..=255u8),
			rng.random_range(0..=255u8),
			rng.random_range(0..=255u8),
		);
		let max = r.max(g).max(b);
		if max == 0 {
			return Self::rgb(target, target, target);
		}
		let ratio = f64::from(target) / f64::from(max);
		Self::make_color(
			f64::from(r) * ratio,
			f64::from(g) * ratio,
			f64::from(b) * ratio,
		)
	}

	/// Channel-wise mean of two colors, halves rounded up.
	pub fn average(self, other: Self) -> Self {
		let mean = |a: u8, b: u8| ((u16::from(a) + u16::from(b) + 1) / 2) as u8;
		Self::rgb(
			mean(self.r, other.r),
			mean(self.g, other.g),
			mean(self.b, other.b),
		)
	}

	/// Same color as a css `rgba(...)` string.
	pub fn to_rgba(self, alpha: f64) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

impl FromStr for Color {
	type Err = ColorError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let malformed = || ColorError(s.to_string());
		let hex = s.strip_prefix('#').ok_or_else(malformed)?;
		if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
			return Err(malformed());
		}
		let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| malformed());
		Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
	}
}
