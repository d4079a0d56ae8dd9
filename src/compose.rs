use std::io::Cursor;

use anyhow::Context as _;
use image::{Rgba, RgbaImage, imageops};

use crate::{
    error::{MemeError, MemeResult},
    model::SpriteInstance,
    sprite::FRAME_EDGE,
};

/// Composite one meme frame and encode it as PNG.
///
/// The canvas is sized exactly to the background. The sprite frame is cropped
/// from `sheet`, scaled to the instance's destination box with
/// nearest-neighbor sampling (pixel-art sheets must keep hard edges), drawn
/// with optional rotation about the box center, then the foreground goes on
/// top at the origin, unscaled and never rotated.
///
/// Pure given decoded inputs; equal inputs produce byte-identical PNGs.
pub fn compose(
    background: &RgbaImage,
    sheet: &RgbaImage,
    instance: &SpriteInstance,
    foreground: Option<&RgbaImage>,
) -> MemeResult<Vec<u8>> {
    let mut canvas = background.clone();

    let frame = instance.style.frame();
    let (sheet_w, sheet_h) = sheet.dimensions();
    if frame.x + FRAME_EDGE > sheet_w || frame.y + FRAME_EDGE > sheet_h {
        return Err(MemeError::image_load(format!(
            "sprite sheet is {sheet_w}x{sheet_h}, too small for frame at ({}, {})",
            frame.x, frame.y
        )));
    }

    let cropped = imageops::crop_imm(sheet, frame.x, frame.y, FRAME_EDGE, FRAME_EDGE).to_image();
    let scaled = imageops::resize(
        &cropped,
        instance.size,
        instance.size,
        imageops::FilterType::Nearest,
    );

    match instance.rotate {
        Some(degrees) if degrees != 0.0 => {
            blit_rotated(&mut canvas, &scaled, instance.x, instance.y, degrees);
        }
        _ => blit_over(&mut canvas, &scaled, instance.x, instance.y),
    }

    if let Some(fg) = foreground {
        blit_over(&mut canvas, fg, 0, 0);
    }

    encode_png(canvas)
}

fn encode_png(canvas: RgbaImage) -> MemeResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(canvas)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode meme png")?;
    Ok(buf)
}

/// Alpha-over `src` onto `dst` with its top-left at `(ox, oy)`, clipping to
/// the canvas. Both blit paths share this blend, so a zero-degree rotation
/// is pixel-identical to the direct path.
fn blit_over(dst: &mut RgbaImage, src: &RgbaImage, ox: i64, oy: i64) {
    let (dw, dh) = dst.dimensions();
    for (sx, sy, &px) in src.enumerate_pixels() {
        let dx = ox + i64::from(sx);
        let dy = oy + i64::from(sy);
        if dx < 0 || dy < 0 || dx >= i64::from(dw) || dy >= i64::from(dh) {
            continue;
        }
        let (dx, dy) = (dx as u32, dy as u32);
        let blended = over(*dst.get_pixel(dx, dy), px);
        dst.put_pixel(dx, dy, blended);
    }
}

/// Alpha-over `src` rotated clockwise by `degrees` about the center of its
/// destination box, whose top-left is `(ox, oy)`.
///
/// Destination pixels inside the rotated bounding box are inverse-mapped
/// into the source square and nearest-sampled, the raster analogue of
/// translate-rotate-draw-at-(-size/2,-size/2) on a 2D canvas context.
fn blit_rotated(dst: &mut RgbaImage, src: &RgbaImage, ox: i64, oy: i64, degrees: f64) {
    let (dw, dh) = dst.dimensions();
    let size = f64::from(src.width());
    let theta = degrees.to_radians();
    let (sin, cos) = theta.sin_cos();

    // Center of the destination box in canvas coordinates.
    let cx = ox as f64 + size / 2.0;
    let cy = oy as f64 + size / 2.0;

    // Bounding box of the rotated square, clamped to the canvas.
    let half = size / 2.0 * (sin.abs() + cos.abs()) + 1.0;
    let x0 = ((cx - half).floor().max(0.0)) as u32;
    let y0 = ((cy - half).floor().max(0.0)) as u32;
    let x1 = ((cx + half).ceil().min(f64::from(dw))) as u32;
    let y1 = ((cy + half).ceil().min(f64::from(dh))) as u32;

    for dy in y0..y1 {
        for dx in x0..x1 {
            // Inverse-rotate the pixel center back into source space.
            let rx = dx as f64 + 0.5 - cx;
            let ry = dy as f64 + 0.5 - cy;
            let sx = (cos * rx + sin * ry + size / 2.0 - 0.5).round();
            let sy = (-sin * rx + cos * ry + size / 2.0 - 0.5).round();
            if sx < 0.0 || sy < 0.0 || sx >= size || sy >= size {
                continue;
            }
            let px = *src.get_pixel(sx as u32, sy as u32);
            let blended = over(*dst.get_pixel(dx, dy), px);
            dst.put_pixel(dx, dy, blended);
        }
    }
}

/// Straight-alpha source-over blend.
fn over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let ws = u32::from(src[3]);
    let wd = mul_div255(u32::from(dst[3]), 255 - ws);
    let wa = ws + wd;

    let mut out = [0u8; 4];
    out[3] = wa as u8;
    for i in 0..3 {
        let num = u32::from(src[i]) * ws + u32::from(dst[i]) * wd;
        out[i] = ((num + wa / 2) / wa) as u8;
    }
    Rgba(out)
}

fn mul_div255(x: u32, y: u32) -> u32 {
    (x * y + 127) / 255
}
