//! Color tables and helpers for plot scenes.

use serde::{Deserialize, Serialize};

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex string, e.g. `"#1f77b4"`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The matplotlib "tab20" qualitative palette. Series colors follow it so
/// exported scenes match the reference notebooks.
pub const TAB20: [Rgb; 20] = [
    Rgb::new(0x1f, 0x77, 0xb4),
    Rgb::new(0xae, 0xc7, 0xe8),
    Rgb::new(0xff, 0x7f, 0x0e),
    Rgb::new(0xff, 0xbb, 0x78),
    Rgb::new(0x2c, 0xa0, 0x2c),
    Rgb::new(0x98, 0xdf, 0x8a),
    Rgb::new(0xd6, 0x27, 0x28),
    Rgb::new(0xff, 0x98, 0x96),
    Rgb::new(0x94, 0x67, 0xbd),
    Rgb::new(0xc5, 0xb0, 0xd5),
    Rgb::new(0x8c, 0x56, 0x4b),
    Rgb::new(0xc4, 0x9c, 0x94),
    Rgb::new(0xe3, 0x77, 0xc2),
    Rgb::new(0xf7, 0xb6, 0xd2),
    Rgb::new(0x7f, 0x7f, 0x7f),
    Rgb::new(0xc7, 0xc7, 0xc7),
    Rgb::new(0xbc, 0xbd, 0x22),
    Rgb::new(0xdb, 0xdb, 0x8d),
    Rgb::new(0x17, 0xbe, 0xcf),
    Rgb::new(0x9e, 0xda, 0xe5),
];

/// Palette entry by index, wrapping past the end.
pub fn tab20(index: usize) -> Rgb {
    TAB20[index % TAB20.len()]
}

/// Composite an RGBA color over a white background, returning the opaque
/// color a renderer would actually display. Components in 0..=1.
pub fn blend_with_white(r: f64, g: f64, b: f64, a: f64) -> Rgb {
    let blend = |c: f64| -> u8 {
        let v = a * c + (1.0 - a);
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    Rgb {
        r: blend(r),
        g: blend(g),
        b: blend(b),
    }
}

/// Identifier of the colormap a renderer should use for a heatmap. The
/// renderer owns the actual color tables; scenes only carry the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMap {
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Blues,
    Greens,
    Oranges,
    Greys,
}

impl ColorMap {
    pub fn name(&self) -> &'static str {
        match self {
            ColorMap::Viridis => "viridis",
            ColorMap::Plasma => "plasma",
            ColorMap::Inferno => "inferno",
            ColorMap::Magma => "magma",
            ColorMap::Blues => "Blues",
            ColorMap::Greens => "Greens",
            ColorMap::Oranges => "Oranges",
            ColorMap::Greys => "Greys",
        }
    }
}
