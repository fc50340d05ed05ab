//! Image renderer — draws a wrapped layout centered on a fresh canvas and saves it as PNG.

use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use tracing::debug;

use crate::errors::AppError;
use crate::layout::{Typeface, WrappedLayout};

pub const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);
pub const FOREGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Output image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// `<dir>/<id>.png`. No collision detection: the same id overwrites.
pub fn output_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{id}.png"))
}

/// Fails early when the output directory is missing, before any rendering starts.
pub async fn ensure_output_dir(dir: &Path) -> Result<(), AppError> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        _ => Err(AppError::OutputDir(dir.to_path_buf())),
    }
}

/// Top-left anchor that centers a `layout` block on the canvas.
/// Negative when the block is larger than the canvas.
pub fn block_origin(layout: &WrappedLayout, resolution: Resolution) -> (i32, i32) {
    (
        resolution.width as i32 / 2 - layout.width as i32 / 2,
        resolution.height as i32 / 2 - layout.height as i32 / 2,
    )
}

/// Draws the layout onto a new black canvas. Lines are left-aligned inside the block.
pub fn draw_layout(
    layout: &WrappedLayout,
    resolution: Resolution,
    typeface: &dyn Typeface,
) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(resolution.width, resolution.height, BACKGROUND);

    let line_count = layout.line_count().max(1) as u32;
    let line_height = (layout.height / line_count) as i32;
    let (x, y) = block_origin(layout, resolution);

    for (i, line) in layout.lines().enumerate() {
        typeface.draw(&mut canvas, x, y + i as i32 * line_height, line, FOREGROUND);
    }
    canvas
}

/// Renders `layout` and writes it to `path` in one shot.
pub fn render(
    layout: &WrappedLayout,
    resolution: Resolution,
    typeface: &dyn Typeface,
    path: &Path,
) -> Result<(), AppError> {
    let canvas = draw_layout(layout, resolution, typeface);
    canvas
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| AppError::Image {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        "Wrote {} ({} lines, {}x{} block)",
        path.display(),
        layout.line_count(),
        layout.width,
        layout.height
    );
    Ok(())
}
