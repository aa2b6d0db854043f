//! Minimal RGBA PNG encoding.
//!
//! Overlays are small (a few hundred pixels per side) and full-alpha, so a
//! plain color-type-6 encoder with zlib via flate2 and crc32fast checksums
//! is all that's needed.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::raster::OverlayImage;
use crate::{RenderError, Result};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Encode 8-bit RGBA pixel data as a PNG image.
pub fn encode_png(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    if pixels.len() != width * height * 4 {
        return Err(RenderError::Png(format!(
            "pixel buffer length {} does not match {}x{} RGBA",
            pixels.len(),
            width,
            height
        )));
    }

    let mut out = Vec::with_capacity(pixels.len() / 4 + 64);
    out.extend_from_slice(&PNG_SIGNATURE);

    // IHDR: dimensions, 8-bit depth, color type 6 (RGBA).
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);
    write_chunk(&mut out, b"IHDR", &ihdr);

    // IDAT: each scanline prefixed with filter type 0 (None), zlib-compressed.
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    for row in pixels.chunks_exact(width * 4) {
        encoder
            .write_all(&[0])
            .and_then(|_| encoder.write_all(row))
            .map_err(|e| RenderError::Png(e.to_string()))?;
    }
    let idat = encoder
        .finish()
        .map_err(|e| RenderError::Png(e.to_string()))?;
    write_chunk(&mut out, b"IDAT", &idat);

    write_chunk(&mut out, b"IEND", &[]);
    Ok(out)
}

/// Encode an overlay image as PNG.
pub fn encode_overlay(image: &OverlayImage) -> Result<Vec<u8>> {
    encode_png(&image.to_rgba8(), image.width(), image.height())
}

fn write_chunk(out: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
}
