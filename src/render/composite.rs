use image::RgbaImage;

use crate::foundation::error::{AdError, AdResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied RGBA8 with an extra layer opacity.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Composite a full-canvas premultiplied layer onto an opaque canvas.
///
/// The canvas is opaque, so its straight and premultiplied forms coincide and the result stays
/// opaque.
pub fn over_in_place(dst: &mut RgbaImage, layer: &[u8], opacity: f32) -> AdResult<()> {
    let expected = dst.as_raw().len();
    if layer.len() != expected {
        return Err(AdError::geometry(format!(
            "overlay has {} bytes, canvas expects {expected}",
            layer.len()
        )));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(layer.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite a premultiplied `w`×`h` sprite with its top-left corner at (`x0`, `y0`).
///
/// Pixels falling outside the canvas are clipped.
pub fn blit_over(
    dst: &mut RgbaImage,
    sprite: &[u8],
    w: u32,
    h: u32,
    x0: i64,
    y0: i64,
) -> AdResult<()> {
    let expected = (w as usize)
        .checked_mul(h as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| AdError::geometry("sprite size overflow"))?;
    if sprite.len() != expected {
        return Err(AdError::geometry(
            "blit_over expects a buffer matching width*height*4",
        ));
    }

    let (dw, dh) = dst.dimensions();
    for sy in 0..h {
        let y = y0 + i64::from(sy);
        if y < 0 || y >= i64::from(dh) {
            continue;
        }
        for sx in 0..w {
            let x = x0 + i64::from(sx);
            if x < 0 || x >= i64::from(dw) {
                continue;
            }
            let idx = ((sy as usize) * (w as usize) + (sx as usize)) * 4;
            let s = [sprite[idx], sprite[idx + 1], sprite[idx + 2], sprite[idx + 3]];
            let px = dst.get_pixel_mut(x as u32, y as u32);
            px.0 = over(px.0, s, 1.0);
        }
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}
