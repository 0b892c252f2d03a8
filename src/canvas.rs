/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Canvas snapshots turned into page sources.

use crate::error::{BridgeError, Result};
use crate::host::FileData;

/// Raw RGBA pixels read back from a 2D canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanvasPixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Encode a canvas snapshot as PNG.
pub fn encode_png(pixels: &CanvasPixels) -> Result<Vec<u8>> {
    if pixels.width == 0 || pixels.height == 0 {
        return Err(BridgeError::Canvas("canvas has no area".into()));
    }
    let img = image::RgbaImage::from_raw(pixels.width, pixels.height, pixels.rgba.clone())
        .ok_or_else(|| {
            BridgeError::Canvas(format!(
                "{} bytes do not fill {}x{} RGBA",
                pixels.rgba.len(),
                pixels.width,
                pixels.height
            ))
        })?;

    let mut png_buf: Vec<u8> = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut png_buf),
            image::ImageFormat::Png,
        )
        .map_err(|e| BridgeError::Encode(e.to_string()))?;
    Ok(png_buf)
}

/// Snapshot as a page source the SDK can load.
pub fn to_file_data(pixels: &CanvasPixels) -> Result<FileData> {
    Ok(FileData {
        name: "canvas.png".into(),
        mime_type: "image/png".into(),
        bytes: encode_png(pixels)?,
    })
}
