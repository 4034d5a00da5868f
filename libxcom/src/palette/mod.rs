#![allow(clippy::module_name_repetitions)]

pub(crate) mod overlay;
pub(crate) mod primary;

pub(crate) use primary::PaletteSelector;

use image::{ImageBuffer, Rgba, RgbaImage};
use itertools::Itertools;
use serde::Serialize;

/// Number of bytes a 256 color palette occupies on disk (three 6-bit components per color)
pub const PALETTE_DATA_LEN: usize = 256 * 3;

/// A 24-bit RGB color
#[derive(Default, Debug, Eq, PartialEq, Hash, Copy, Clone, Serialize)]
pub struct Color {
    /// red component
    pub r: u8,
    /// green component
    pub g: u8,
    /// blue component
    pub b: u8,
}

impl Color {
    /// Creates a [`Color`] from 8-bit components
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Promotes stored 6-bit VGA components (0-63) to 8-bit by multiplying by 4.
    ///
    /// No rounding is applied, so the brightest stored value 63 becomes 252.
    #[must_use]
    pub const fn from_vga(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r.wrapping_mul(4),
            g: g.wrapping_mul(4),
            b: b.wrapping_mul(4),
        }
    }

    /// Creates a [`Color`] from a packed `0xRRGGBB` value
    #[must_use]
    pub const fn from_u32(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }

    /// Packs the color as `0xRRGGBB`
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Returns the color as RGBA bytes with the given alpha
    #[must_use]
    pub const fn to_rgba(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

impl From<Color> for [u8; 3] {
    fn from(value: Color) -> Self {
        [value.r, value.g, value.b]
    }
}

/// An immutable color table of either 256 colors (primary palettes) or 16 colors
/// (backdrop overlays)
#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
pub struct Palette {
    colors: Vec<Color>,
}

/// The 16 colors the tactical view uses in place of a `BACKPALS.DAT` entry
const TACTICAL_BACKDROP: [u32; 16] = [
    0x008c_9694,
    0x0084_8a8c,
    0x0073_7d84,
    0x006b_757b,
    0x005a_696b,
    0x0052_5d63,
    0x004a_515a,
    0x0039_4552,
    0x0031_3842,
    0x0029_3039,
    0x0021_2431,
    0x0018_1c21,
    0x0010_1418,
    0x0008_0c10,
    0x0000_0408,
    0x0000_0000,
];

impl Palette {
    /// Creates a palette from already promoted colors
    ///
    /// Returns `None` unless `colors` holds exactly 16 or 256 entries
    #[must_use]
    pub fn from_colors(colors: Vec<Color>) -> Option<Self> {
        matches!(colors.len(), 16 | 256).then_some(Self { colors })
    }

    /// Decodes packed 6-bit RGB triplets
    pub(crate) fn from_vga_bytes(data: &[u8]) -> Self {
        let colors = data
            .iter()
            .copied()
            .tuples()
            .map(|(r, g, b)| Color::from_vga(r, g, b))
            .collect();
        Self { colors }
    }

    /// The fixed 16 color backdrop ramp of the tactical view
    #[must_use]
    pub fn tactical_backdrop() -> Self {
        Self {
            colors: TACTICAL_BACKDROP.into_iter().map(Color::from_u32).collect(),
        }
    }

    /// Returns the color at `index`, if the palette has one
    #[must_use]
    pub fn get(&self, index: u8) -> Option<Color> {
        self.colors.get(usize::from(index)).copied()
    }

    /// Returns all colors of the palette
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Returns the number of colors in the palette (16 or 256)
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false, palettes hold 16 or 256 colors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns the RGBA value a pixel with palette index `index` renders as.
    ///
    /// Index 0 is always transparent, as are indexes this palette has no color for.
    #[must_use]
    pub fn rgba(&self, index: u8) -> [u8; 4] {
        match (index, self.get(index)) {
            (0, _) | (_, None) => [0; 4],
            (_, Some(c)) => c.to_rgba(u8::MAX),
        }
    }

    /// Returns a copy of this palette with its last `overlay.len()` entries replaced by the
    /// colors of `overlay`.
    ///
    /// This is how a 16 color backdrop overlay is combined with a 256 color palette.
    #[must_use]
    pub fn with_overlay(&self, overlay: &Self) -> Self {
        let mut colors = self.colors.clone();
        let start = colors.len().saturating_sub(overlay.len());
        for (dst, src) in colors[start..].iter_mut().zip(&overlay.colors) {
            *dst = *src;
        }
        Self { colors }
    }

    /// Renders the palette as a horizontal strip, one pixel column per color, all opaque
    #[must_use]
    pub fn swatch(&self, height: u32) -> RgbaImage {
        let width = u32::try_from(self.colors.len()).unwrap_or(u32::MAX);
        ImageBuffer::from_fn(width, height, |x, _| {
            Rgba(self.colors[x as usize].to_rgba(u8::MAX))
        })
    }
}

/// Maps palette indexes to RGBA bytes (4 bytes per index).
///
/// Index 0 maps to fully transparent, everything else to its palette color at full
/// opacity. This is a pure function of its inputs.
#[must_use]
pub fn rasterize(indices: &[u8], palette: &Palette) -> Vec<u8> {
    indices.iter().flat_map(|&i| palette.rgba(i)).collect()
}
