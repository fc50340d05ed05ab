//! Font metrics: pixel measurement and glyph drawing behind the `Typeface` trait.
//!
//! `TrueTypeFont` is the production implementation (ab_glyph + imageproc).
//! The font size is an em size in pixels, so a 50px font has a 50px em square
//! rather than a 50px ascent-to-descent height.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;

// ────────────────────────────────────────────────────────────────────────────
// Extents
// ────────────────────────────────────────────────────────────────────────────

/// Pixel size of a rendered string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
}

/// The largest single-character extent over a character set.
///
/// Its height is the line height of a wrapped block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CharCell {
    pub width: u32,
    pub height: u32,
}

impl CharCell {
    /// Measures every distinct non-control character in `texts`.
    /// An empty set yields a zero-sized cell.
    pub fn measure<'a, I>(typeface: &dyn Typeface, texts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let chars: BTreeSet<char> = texts
            .into_iter()
            .flat_map(str::chars)
            .filter(|c| !c.is_control())
            .collect();

        let mut buf = [0u8; 4];
        let cell = chars.iter().fold(CharCell::default(), |cell, c| {
            let extent = typeface.measure(c.encode_utf8(&mut buf));
            CharCell {
                width: cell.width.max(extent.width),
                height: cell.height.max(extent.height),
            }
        });
        debug!(
            chars = chars.len(),
            width = cell.width,
            height = cell.height,
            "Measured character cell"
        );
        cell
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Typeface trait
// ────────────────────────────────────────────────────────────────────────────

/// A font the pipeline can measure text with and draw onto a canvas.
pub trait Typeface: Send + Sync {
    fn measure(&self, text: &str) -> TextExtent;

    /// Draws one line of text with its top-left corner at `(x, y)`.
    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>);
}

/// A TrueType/OpenType font loaded from disk.
pub struct TrueTypeFont {
    font: FontVec,
    scale: PxScale,
    path: PathBuf,
}

impl TrueTypeFont {
    /// Parses font bytes and derives the pixel scale for an em size of `size_px`.
    pub fn from_bytes(path: &Path, data: Vec<u8>, size_px: f32) -> Result<Self, AppError> {
        let font = FontVec::try_from_vec(data).map_err(|e| AppError::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        // PxScale is ascent-to-descent height; convert from em size.
        let scale = match font.units_per_em() {
            Some(upm) if upm > 0.0 => PxScale::from(size_px * font.height_unscaled() / upm),
            _ => PxScale::from(size_px),
        };

        Ok(Self {
            font,
            scale,
            path: path.to_path_buf(),
        })
    }

    pub async fn load(path: &Path, size_px: f32) -> Result<Self, AppError> {
        let data = tokio::fs::read(path).await.map_err(|e| AppError::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let font = Self::from_bytes(path, data, size_px)?;
        debug!(
            "Loaded font {} at {}px (scale {:.1})",
            font.path.display(),
            size_px,
            font.scale.y
        );
        Ok(font)
    }
}

impl Typeface for TrueTypeFont {
    /// Height is never less than the font's ascent-to-descent span, so lines
    /// stacked at this pitch cannot overlap whatever glyphs they contain.
    fn measure(&self, text: &str) -> TextExtent {
        let (width, ink_height) = text_size(self.scale, &self.font, text);
        let line_height = self.font.as_scaled(self.scale).height().ceil() as u32;
        TextExtent {
            width,
            height: ink_height.max(line_height),
        }
    }

    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fixed-cell typeface for tests
// ────────────────────────────────────────────────────────────────────────────

/// Every character occupies a `cell_w × cell_h` box; non-space characters are
/// drawn as filled boxes. Lets rendering tests run without a font file.
#[cfg(test)]
pub(crate) struct BlockFace {
    pub cell_w: u32,
    pub cell_h: u32,
}

#[cfg(test)]
impl Typeface for BlockFace {
    fn measure(&self, text: &str) -> TextExtent {
        let n = text.chars().count() as u32;
        TextExtent {
            width: n * self.cell_w,
            height: if n == 0 { 0 } else { self.cell_h },
        }
    }

    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        use imageproc::drawing::draw_filled_rect_mut;
        use imageproc::rect::Rect;

        for (i, c) in text.chars().enumerate() {
            if c == ' ' {
                continue;
            }
            let left = x + (i as u32 * self.cell_w) as i32;
            draw_filled_rect_mut(
                canvas,
                Rect::at(left, y).of_size(self.cell_w, self.cell_h),
                color,
            );
        }
    }
}
