//! PNG encoding for tightly packed RGBA8 buffers.

use anyhow::{Context, Result, ensure};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::renderer::RenderedImage;

/// Number of channels in RGBA8 format.
const RGBA8_CHANNELS: usize = 4;

/// Write a tightly packed RGBA8 buffer as PNG.
///
/// Uses default zlib compression with adaptive filtering; the figures are
/// mostly flat colour, so files stay small.
pub fn write_png_rgba8(path: &Path, data: &[u8], width: u32, height: u32) -> Result<()> {
    let expected = compute_expected_buffer_size(width, height)?;

    ensure!(
        data.len() == expected,
        "PNG writer requires tight RGBA8 buffer: expected {} bytes, got {}",
        expected,
        data.len()
    );

    let file = File::create(path)
        .with_context(|| format!("failed to create output PNG at {}", path.display()))?;

    let encoder = PngEncoder::new_with_quality(
        BufWriter::new(file),
        CompressionType::Default,
        FilterType::Adaptive,
    );
    encoder
        .write_image(data, width, height, ExtendedColorType::Rgba8)
        .context("failed to encode RGBA8 PNG")?;

    Ok(())
}

/// Write a rendered figure to `path`, replacing any existing file.
pub fn write_image(path: &Path, image: &RenderedImage) -> Result<()> {
    write_png_rgba8(path, image.as_bytes(), image.width, image.height)
}

/// Byte length of a `width` x `height` RGBA8 buffer, or an error on overflow.
fn compute_expected_buffer_size(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(RGBA8_CHANNELS))
        .ok_or_else(|| anyhow::anyhow!("image dimensions overflow when computing buffer size"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_buffers() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_png_rgba8(&dir.path().join("short.png"), &[0u8; 12], 2, 2).unwrap_err();
        assert!(err.to_string().contains("expected 16 bytes"));
    }

    #[test]
    fn oversized_dimensions_overflow() {
        assert!(compute_expected_buffer_size(u32::MAX, u32::MAX).is_err());
        assert_eq!(compute_expected_buffer_size(3, 2).unwrap(), 24);
    }

    #[test]
    fn writes_a_decodable_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        let data: Vec<u8> = (0..2 * 3).flat_map(|i| [i as u8 * 40, 0, 255, 255]).collect();
        write_png_rgba8(&path, &data, 2, 3).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 3));
        assert_eq!(decoded.as_raw(), &data);
    }
}
