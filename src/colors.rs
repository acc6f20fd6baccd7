// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns iteration counts into colours.
//!
//! A `ColorScheme` is nothing more than an ordered list of RGB anchor
//! colours; the last anchor is the colour of points that never
//! escaped.  Schemes are data, handed to a `ColorMapper` at
//! construction, so a palette can be swapped without touching the
//! compute core.  The mapper either picks the anchor for the bin an
//! iteration count falls into (`Discrete`) or blends between the two
//! anchors that bracket it (`Smooth`).

use image::Rgba;
use num::clamp;
use std::str::FromStr;

/// The alpha value written into every pixel.  Alpha carries no meaning
/// in a rendered fractal, so it is pinned to fully opaque.
pub const ALPHA: u8 = 255;

/// An ordered, non-empty list of RGB anchors.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScheme {
    anchors: Vec<[u8; 3]>,
}

impl ColorScheme {
    /// Builds a scheme from a list of anchors; `None` if the list is
    /// empty.
    pub fn new(anchors: Vec<[u8; 3]>) -> Option<ColorScheme> {
        if anchors.is_empty() {
            None
        } else {
            Some(ColorScheme { anchors })
        }
    }

    /// Black to white.  With smooth linear mapping this reproduces the
    /// classic `255 * i / max` gray scale.
    pub fn gray() -> ColorScheme {
        ColorScheme {
            anchors: vec![[0, 0, 0], [255, 255, 255]],
        }
    }

    /// Black through red and orange to a black interior.
    pub fn fire() -> ColorScheme {
        ColorScheme {
            anchors: vec![
                [0, 0, 0],
                [128, 0, 0],
                [255, 64, 0],
                [255, 165, 0],
                [255, 255, 128],
                [0, 0, 0],
            ],
        }
    }

    /// Deep blue fading to white, with a dark navy interior.
    pub fn ocean() -> ColorScheme {
        ColorScheme {
            anchors: vec![
                [0, 7, 100],
                [32, 107, 203],
                [237, 255, 255],
                [255, 170, 0],
                [0, 2, 0],
            ],
        }
    }

    /// Looks up one of the built-in schemes by name.
    pub fn named(name: &str) -> Option<ColorScheme> {
        match name {
            "gray" | "grey" => Some(ColorScheme::gray()),
            "fire" => Some(ColorScheme::fire()),
            "ocean" => Some(ColorScheme::ocean()),
            _ => None,
        }
    }

    /// The anchors, in order.
    pub fn anchors(&self) -> &[[u8; 3]] {
        &self.anchors
    }

    /// Number of anchors; never zero.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Always false; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// The colour of points inside the set.
    pub fn interior(&self) -> [u8; 3] {
        self.anchors[self.anchors.len() - 1]
    }
}

fn parse_channel(s: &str) -> Result<u8, String> {
    u8::from_str(s.trim()).map_err(|_| format!("'{}' is not a colour channel (0-255)", s))
}

fn parse_anchor(s: &str) -> Result<[u8; 3], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("'{}' is not an r,g,b triple", s));
    }
    Ok([
        parse_channel(parts[0])?,
        parse_channel(parts[1])?,
        parse_channel(parts[2])?,
    ])
}

/// Accepts either a built-in name or a list of `r,g,b` triples
/// separated by whitespace or `;`, e.g. `"0,0,0 255,128,0 255,255,255"`.
impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(scheme) = ColorScheme::named(s.trim()) {
            return Ok(scheme);
        }
        let anchors = s
            .split(|c: char| c == ';' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(parse_anchor)
            .collect::<Result<Vec<_>, _>>()?;
        ColorScheme::new(anchors).ok_or_else(|| "a palette needs at least one colour".to_string())
    }
}

/// Monotonic re-mappings of `i / max` that bias where the gradient
/// spends its anchors.  All of them map 0 to 0 and `max` to 1.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Ramp {
    /// `i / max`
    Linear,
    /// `sqrt(i / max)`; stretches the low counts.
    Sqrt,
    /// `(1 - 1/(1+i)) / (1 - 1/(1+max))`; nearly all of the gradient
    /// goes to the first few iterations.
    Inverse,
}

impl Ramp {
    /// Normalised position of `iterations` in `[0, 1]`.
    pub fn ratio(self, iterations: u32, max: u32) -> f64 {
        if max == 0 {
            return 1.0;
        }
        let i = f64::from(iterations.min(max));
        let m = f64::from(max);
        let r = match self {
            Ramp::Linear => i / m,
            Ramp::Sqrt => (i / m).sqrt(),
            Ramp::Inverse => (1.0 - 1.0 / (1.0 + i)) / (1.0 - 1.0 / (1.0 + m)),
        };
        clamp(r, 0.0, 1.0)
    }
}

impl FromStr for Ramp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Ramp::Linear),
            "sqrt" => Ok(Ramp::Sqrt),
            "inverse" => Ok(Ramp::Inverse),
            _ => Err(format!("unknown ramp '{}'; expected linear, sqrt or inverse", s)),
        }
    }
}

/// How iteration counts are turned into anchors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ColorMode {
    /// Split `[0, max]` into one equal bin per anchor.
    Discrete,
    /// Interpolate between neighbouring anchors.
    Smooth(Ramp),
}

/// A colour scheme bound to a mapping mode.  Read-only once built and
/// shared by reference between render workers.
#[derive(Clone, Debug)]
pub struct ColorMapper {
    scheme: ColorScheme,
    mode: ColorMode,
}

impl ColorMapper {
    /// Binds `scheme` to `mode`.
    pub fn new(scheme: ColorScheme, mode: ColorMode) -> ColorMapper {
        ColorMapper { scheme, mode }
    }

    /// The scheme in use.
    pub fn scheme(&self) -> &ColorScheme {
        &self.scheme
    }

    /// The mode in use.
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Maps an iteration count in `[0, max]` to an opaque colour.
    pub fn color(&self, iterations: u32, max: u32) -> Rgba<u8> {
        let [r, g, b] = match self.mode {
            ColorMode::Discrete => self.discrete(iterations, max),
            ColorMode::Smooth(ramp) => self.smooth(ramp.ratio(iterations, max)),
        };
        Rgba([r, g, b, ALPHA])
    }

    fn discrete(&self, iterations: u32, max: u32) -> [u8; 3] {
        let n = self.scheme.len();
        if max == 0 || iterations >= max {
            return self.scheme.interior();
        }
        let bin = (n as u64 * u64::from(iterations) / u64::from(max)) as usize;
        self.scheme.anchors[bin.min(n - 1)]
    }

    fn smooth(&self, ratio: f64) -> [u8; 3] {
        let anchors = &self.scheme.anchors;
        if anchors.len() == 1 {
            return anchors[0];
        }
        let last = anchors.len() - 1;
        let position = ratio * last as f64;
        // ratio == 1.0 lands on the final pair with a full fraction
        let low = (position.floor() as usize).min(last - 1);
        let fraction = position - low as f64;
        let (a, b) = (anchors[low], anchors[low + 1]);
        let mut out = [0u8; 3];
        for channel in 0..3 {
            let from = f64::from(a[channel]);
            let to = f64::from(b[channel]);
            out[channel] = clamp((from + (to - from) * fraction).round(), 0.0, 255.0) as u8;
        }
        out
    }
}

impl Default for ColorMapper {
    fn default() -> Self {
        ColorMapper::new(ColorScheme::gray(), ColorMode::Smooth(Ramp::Linear))
    }
}
