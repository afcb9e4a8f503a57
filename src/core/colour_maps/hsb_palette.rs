//! Precomputed HSB gradient palette.
//!
//! Entry `i` of an `N`-colour palette has hue `i / N`, full saturation and
//! brightness `i / (i + 8)`, so low step counts are dark and the colour
//! brightens as the step count grows. HSB to RGB conversion is done in `f32`
//! with `+ 0.5` rounding per channel.

use thiserror::Error;

use crate::core::actions::render_chunk::ports::colour_map::ColourMap;
use crate::core::data::colour::Colour;

pub const DEFAULT_PALETTE_SIZE: u32 = 256;

const BRIGHTNESS_KNEE: f32 = 8.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("palette size must be greater than zero")]
    Empty,
}

fn channel(value: f32) -> u8 {
    (value * 255.0 + 0.5) as u8
}

/// Converts hue/saturation/brightness (each nominally in `0.0..=1.0`) to RGB.
///
/// Hue wraps, so only its fractional part is used.
#[must_use]
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> Colour {
    if saturation == 0.0 {
        let grey = channel(brightness);
        return Colour {
            r: grey,
            g: grey,
            b: grey,
        };
    }

    let h = (hue - hue.floor()) * 6.0;
    let f = h - h.floor();
    let p = brightness * (1.0 - saturation);
    let q = brightness * (1.0 - saturation * f);
    let t = brightness * (1.0 - (saturation * (1.0 - f)));

    let (r, g, b) = match h as u32 {
        0 => (brightness, t, p),
        1 => (q, brightness, p),
        2 => (p, brightness, t),
        3 => (p, q, brightness),
        4 => (t, p, brightness),
        _ => (brightness, p, q),
    };

    Colour {
        r: channel(r),
        g: channel(g),
        b: channel(b),
    }
}

/// Brightness of palette entry `index`.
#[must_use]
pub fn brightness(index: u32) -> f32 {
    let i = index as f32;
    i / (i + BRIGHTNESS_KNEE)
}

fn gradient(size: u32) -> Vec<Colour> {
    (0..size)
        .map(|i| hsb_to_rgb(i as f32 / size as f32, 1.0, brightness(i)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HsbPalette {
    colours: Vec<Colour>,
}

impl HsbPalette {
    pub fn new(size: u32) -> Result<Self, PaletteError> {
        if size == 0 {
            return Err(PaletteError::Empty);
        }

        Ok(Self {
            colours: gradient(size),
        })
    }

    #[must_use]
    pub fn len(&self) -> u32 {
        self.colours.len() as u32
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    #[must_use]
    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }
}

impl Default for HsbPalette {
    fn default() -> Self {
        Self {
            colours: gradient(DEFAULT_PALETTE_SIZE),
        }
    }
}

impl ColourMap for HsbPalette {
    fn map(&self, steps: u32) -> Colour {
        self.colours[steps as usize % self.colours.len()]
    }

    fn display_name(&self) -> &str {
        "HSB gradient"
    }
}
