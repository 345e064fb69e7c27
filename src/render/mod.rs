//! # Card Raster Renderer
//!
//! Composites one card spec into an RGBA pixel buffer at the current scale
//! and encodes it as PNG.
//!
//! ## Architecture
//!
//! ```text
//! CardSpec + ScaleContext + ResolvedAssets → CardRenderer → PNG bytes
//!                        ↓
//!                  Paint in stacking order:
//!                  - background (solid fill or cover image)
//!                  - profile photo (rounded corners, border ring)
//!                  - name text (bitmap font, shadow pass)
//!                  - barcode (quiet zone + vector bars)
//! ```
//!
//! Malformed style fields degrade to defaults rather than erroring; the only
//! failure mode here is PNG encoding itself.

mod text;

pub use text::{draw_name, wrap_lines};

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};

use crate::barcode::{BarEncoding, EncodeCache, EncodeOptions, Symbology};
use crate::card::CardSpec;
use crate::color::{self, BLACK, WHITE};
use crate::error::CardError;
use crate::layout::ScaleContext;
use crate::resolve::ResolvedAssets;

/// One-shot renderer for a card spec at a fixed scale.
///
/// Holds only shared references: the spec stays owned by the host and is
/// never mutated.
pub struct CardRenderer<'a> {
    spec: &'a CardSpec,
    ctx: ScaleContext,
    assets: &'a ResolvedAssets,
}

impl<'a> CardRenderer<'a> {
    pub fn new(spec: &'a CardSpec, ctx: ScaleContext, assets: &'a ResolvedAssets) -> Self {
        Self { spec, ctx, assets }
    }

    /// Composite the card into an RGBA buffer.
    pub fn render(&self, cache: &mut EncodeCache) -> RgbaImage {
        let (w, h) = self.ctx.canvas_size();
        let mut canvas = RgbaImage::from_pixel(w, h, WHITE);

        self.draw_background(&mut canvas);
        self.draw_profile(&mut canvas);
        draw_name(&mut canvas, &self.spec.name, &self.spec.data.name, &self.ctx);
        self.draw_barcode(&mut canvas, cache);

        canvas
    }

    /// Composite and encode to PNG bytes.
    pub fn render_png(&self, cache: &mut EncodeCache) -> Result<Vec<u8>, CardError> {
        to_png(&self.render(cache))
    }

    fn draw_background(&self, canvas: &mut RgbaImage) {
        let (w, h) = (canvas.width(), canvas.height());
        if color::is_hex_color(&self.spec.background) {
            let fill = color::parse_hex_or(&self.spec.background, WHITE);
            for pixel in canvas.pixels_mut() {
                *pixel = fill;
            }
        } else if let Some(source) = &self.assets.background {
            let resized = image::imageops::resize(&source.to_rgba8(), w, h, FilterType::Triangle);
            for (x, y, pixel) in resized.enumerate_pixels() {
                canvas.put_pixel(x, y, *pixel);
            }
        }
        // Unresolvable URI: the canvas stays white, the broken-image analog.
    }

    fn draw_profile(&self, canvas: &mut RgbaImage) {
        let Some(image_box) = &self.spec.image else {
            return; // hidden
        };

        let x0 = self.ctx.scale_px(image_box.x);
        let y0 = self.ctx.scale_px(image_box.y);
        let box_w = self.ctx.scale_px(image_box.width).max(0) as u32;
        let box_h = self.ctx.scale_px(image_box.height).max(0) as u32;
        if box_w == 0 || box_h == 0 {
            return;
        }

        let radius = self.ctx.scale(image_box.border_radius.unwrap_or(0.0)).max(0.0);
        let border_width = self.ctx.scale(image_box.border_width.unwrap_or(0.0)).max(0.0);
        let border_color = image_box
            .border_color
            .as_deref()
            .map(|c| color::parse_hex_or(c, BLACK));

        match &self.assets.profile {
            Some(source) => {
                let resized =
                    image::imageops::resize(&source.to_rgba8(), box_w, box_h, FilterType::Triangle);
                for (dx, dy, pixel) in resized.enumerate_pixels() {
                    if in_rounded_rect(dx as f64, dy as f64, box_w as f64, box_h as f64, radius) {
                        put_pixel_clipped(canvas, x0 + dx as i64, y0 + dy as i64, *pixel);
                    }
                }
            }
            None => self.draw_placeholder(canvas, x0, y0, box_w, box_h, radius),
        }

        // Border ring: inside the outer rounded rect, outside the inset one.
        if border_width >= 0.5 {
            let ink = border_color.unwrap_or(BLACK);
            for dy in 0..box_h {
                for dx in 0..box_w {
                    let (fx, fy) = (dx as f64, dy as f64);
                    let outer = in_rounded_rect(fx, fy, box_w as f64, box_h as f64, radius);
                    let inner = in_rounded_rect(
                        fx - border_width,
                        fy - border_width,
                        box_w as f64 - 2.0 * border_width,
                        box_h as f64 - 2.0 * border_width,
                        (radius - border_width).max(0.0),
                    );
                    if outer && !inner {
                        put_pixel_clipped(canvas, x0 + dx as i64, y0 + dy as i64, ink);
                    }
                }
            }
        }
    }

    /// Crossed box standing in for a profile image that failed to resolve.
    fn draw_placeholder(
        &self,
        canvas: &mut RgbaImage,
        x0: i64,
        y0: i64,
        box_w: u32,
        box_h: u32,
        radius: f64,
    ) {
        let ink = Rgba([160, 160, 160, 255]);
        let (w, h) = (box_w as i64, box_h as i64);
        for dx in 0..w {
            if in_rounded_rect(dx as f64, 0.0, w as f64, h as f64, radius) {
                put_pixel_clipped(canvas, x0 + dx, y0, ink);
                put_pixel_clipped(canvas, x0 + dx, y0 + h - 1, ink);
            }
        }
        for dy in 0..h {
            if in_rounded_rect(0.0, dy as f64, w as f64, h as f64, radius) {
                put_pixel_clipped(canvas, x0, y0 + dy, ink);
                put_pixel_clipped(canvas, x0 + w - 1, y0 + dy, ink);
            }
        }
        // X pattern
        for i in 0..w.min(h) {
            let x1 = i * w / h.max(1);
            let x2 = w - 1 - x1;
            put_pixel_clipped(canvas, x0 + x1, y0 + i, ink);
            put_pixel_clipped(canvas, x0 + x2, y0 + i, ink);
        }
    }

    fn draw_barcode(&self, canvas: &mut RgbaImage, cache: &mut EncodeCache) {
        let bc = &self.spec.barcode;
        let x0 = self.ctx.scale_px(bc.x);
        let y0 = self.ctx.scale_px(bc.y);
        let box_w = self.ctx.scale(bc.width).max(0.0);
        let box_h = self.ctx.scale(bc.height).max(0.0);
        if box_w < 1.0 || box_h < 1.0 {
            return;
        }

        // Quiet zone behind the bars
        let quiet = color::parse_hex_or(bc.background.as_deref().unwrap_or("#ffffff"), WHITE);
        fill_rect(canvas, x0, y0, box_w.round() as i64, box_h.round() as i64, quiet);

        // The scaled box width doubles as the unit bar width with the box
        // width as bound, so the symbol always compresses to exactly fill
        // the box.
        let opts = EncodeOptions {
            bar_width: box_w,
            height: box_h,
            max_width: Some(box_w),
        };
        let encoding = match cache.encode(&self.spec.data.barcode, Symbology::Code128, &opts) {
            Ok(encoding) => encoding,
            Err(e) => {
                println!("[render] barcode encode failed: {e}");
                BarEncoding::empty()
            }
        };

        let ink = color::parse_hex_or(bc.color.as_deref().unwrap_or("#000000"), BLACK);
        for bar in &encoding.bars {
            let bar_x0 = (x0 as f64 + bar.x).round() as i64;
            let bar_x1 = (x0 as f64 + bar.x + bar.width).round() as i64;
            fill_rect(canvas, bar_x0, y0, bar_x1 - bar_x0, bar.height.round() as i64, ink);
        }
    }
}

/// Encode an RGBA buffer to PNG bytes.
pub fn to_png(canvas: &RgbaImage) -> Result<Vec<u8>, CardError> {
    use image::ImageEncoder;

    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder
        .write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e: image::ImageError| CardError::Render(e.to_string()))?;
    Ok(png_bytes)
}

/// Encode an RGBA buffer as a `data:image/png;base64,…` URI.
pub fn to_data_uri(canvas: &RgbaImage) -> Result<String, CardError> {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;

    let png = to_png(canvas)?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(&png)))
}

/// Set a pixel, ignoring out-of-canvas coordinates.
pub(crate) fn put_pixel_clipped(canvas: &mut RgbaImage, x: i64, y: i64, pixel: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, pixel);
    }
}

/// Fill an axis-aligned rectangle, clipped to the canvas.
pub(crate) fn fill_rect(canvas: &mut RgbaImage, x0: i64, y0: i64, w: i64, h: i64, pixel: Rgba<u8>) {
    for y in y0..y0 + h.max(0) {
        for x in x0..x0 + w.max(0) {
            put_pixel_clipped(canvas, x, y, pixel);
        }
    }
}

/// Point-in-rounded-rect test in box-local coordinates.
///
/// The radius clamps to half the short side, so oversized radii produce a
/// capsule instead of inverting the corners.
fn in_rounded_rect(x: f64, y: f64, w: f64, h: f64, radius: f64) -> bool {
    if w <= 0.0 || h <= 0.0 || x < 0.0 || y < 0.0 || x >= w || y >= h {
        return false;
    }
    let r = radius.min(w / 2.0).min(h / 2.0);
    if r <= 0.0 {
        return true;
    }
    let cx = if x < r {
        r
    } else if x > w - r {
        w - r
    } else {
        return true;
    };
    let cy = if y < r {
        r
    } else if y > h - r {
        h - r
    } else {
        return true;
    };
    let (dx, dy) = (x - cx, y - cy);
    dx * dx + dy * dy <= r * r
}
