use std::io::Cursor;

use anyhow::Context;
use image::RgbaImage;

use crate::foundation::{
    core::HexColor,
    error::{AdError, AdResult},
};

/// Decode any supported raster format into straight-alpha RGBA8.
pub fn decode_rgba(bytes: &[u8]) -> AdResult<RgbaImage> {
    if bytes.is_empty() {
        return Err(AdError::image("image bytes are empty"));
    }
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(AdError::image("decoded image has zero size"));
    }
    Ok(rgba)
}

pub fn encode_png(img: &RgbaImage) -> AdResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

/// Flatten straight-alpha pixels onto an opaque `backdrop` so every canvas is fully opaque.
pub fn flatten_onto(img: &mut RgbaImage, backdrop: HexColor) {
    let bg = backdrop.to_rgba8();
    for px in img.pixels_mut() {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        let inv = 255 - a;
        for i in 0..3 {
            px[i] = ((u16::from(px[i]) * a + u16::from(bg[i]) * inv + 127) / 255) as u8;
        }
        px[3] = 255;
    }
}
