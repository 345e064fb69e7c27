//! Name text rendering.
//!
//! Uses the Spleen 12x24 bitmap font, scaled nearest-neighbor to the card's
//! scaled font size. Bold weights render as a horizontal double-strike. The
//! optional text shadow is a hard offset pass; the blur radius is
//! approximated by a cross-shaped spread ring of extra passes.

use image::{Rgba, RgbaImage};
use spleen_font::{FONT_12X24, PSF2Font};

use super::put_pixel_clipped;
use crate::card::{NameBox, TextAlign, VerticalAlign};
use crate::color::{self, BLACK};
use crate::layout::ScaleContext;

/// Source glyph cell dimensions (Spleen 12x24).
const GLYPH_W: usize = 12;
const GLYPH_H: usize = 24;

/// Greedy word wrap to a character budget per line.
///
/// Words longer than a full line are hard-split. An empty budget still
/// yields one character per line rather than looping.
pub fn wrap_lines(text: &str, chars_per_line: usize, max_lines: Option<usize>) -> Vec<String> {
    let budget = chars_per_line.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        loop {
            let sep = usize::from(!current.is_empty());
            if current.chars().count() + sep + word.chars().count() <= budget {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                break;
            }
            if current.is_empty() {
                // Hard-split an overlong word
                let split_at = word
                    .char_indices()
                    .nth(budget)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                current.push_str(&word[..split_at]);
                word = &word[split_at..];
            }
            lines.push(std::mem::take(&mut current));
            if word.is_empty() {
                break;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if let Some(max) = max_lines {
        lines.truncate(max);
    }
    lines
}

/// Draw the card's name text into the canvas.
pub fn draw_name(canvas: &mut RgbaImage, name: &NameBox, text: &str, ctx: &ScaleContext) {
    if text.is_empty() {
        return;
    }

    let char_h = ctx.scale_px(name.font_size).max(1);
    let char_w = (char_h / 2).max(1); // 12:24 cell aspect
    let box_x = ctx.scale_px(name.x);
    let box_y = ctx.scale_px(name.y);
    let box_w = ctx.scale_px(name.width).max(char_w);

    let chars_per_line = (box_w / char_w).max(1) as usize;
    let lines = wrap_lines(text, chars_per_line, name.max_number_lines);
    if lines.is_empty() {
        return;
    }

    let total_h = lines.len() as i64 * char_h;
    // Absent height = auto: the box is exactly as tall as the wrapped text.
    let box_h = name.height.map(|h| ctx.scale_px(h)).unwrap_or(total_h);
    let y_start = box_y
        + match name.text_vertical_align {
            VerticalAlign::Top => 0,
            VerticalAlign::Center => (box_h - total_h) / 2,
            VerticalAlign::Bottom => box_h - total_h,
        };

    let ink = color::parse_hex_or(&name.color, BLACK);
    let bold = name.font_weight.is_bold();

    // Shadow pass first, so the main text paints over it.
    if let (Some(offset), Some(shadow_color)) = (name.text_shadow_offset, &name.text_shadow_color) {
        let shadow_ink = color::parse_hex_or(shadow_color, BLACK);
        let sx = ctx.scale(offset.width).round() as i64;
        let sy = ctx.scale(offset.height).round() as i64;
        let spread = ctx
            .scale(name.text_shadow_radius.unwrap_or(0.0))
            .round()
            .max(0.0) as i64;

        // Hard-shadow approximation of the blur radius: one center pass
        // plus a cross of spread passes.
        let mut passes = vec![(sx, sy)];
        if spread > 0 {
            passes.extend([(sx + spread, sy), (sx - spread, sy), (sx, sy + spread), (sx, sy - spread)]);
        }
        for (dx, dy) in passes {
            draw_lines(
                canvas,
                &lines,
                box_x + dx,
                y_start + dy,
                box_w,
                char_w,
                char_h,
                name.text_align,
                shadow_ink,
                bold,
            );
        }
    }

    draw_lines(
        canvas, &lines, box_x, y_start, box_w, char_w, char_h, name.text_align, ink, bold,
    );
}

#[allow(clippy::too_many_arguments)]
fn draw_lines(
    canvas: &mut RgbaImage,
    lines: &[String],
    box_x: i64,
    y_start: i64,
    box_w: i64,
    char_w: i64,
    char_h: i64,
    align: TextAlign,
    ink: Rgba<u8>,
    bold: bool,
) {
    for (line_idx, line) in lines.iter().enumerate() {
        let line_w = line.chars().count() as i64 * char_w;
        let x_start = box_x
            + match align {
                TextAlign::Center => (box_w - line_w) / 2,
                TextAlign::Right => box_w - line_w,
                TextAlign::Left | TextAlign::Auto | TextAlign::Justify => 0,
            };
        let y = y_start + line_idx as i64 * char_h;

        for (char_idx, ch) in line.chars().enumerate() {
            let glyph = glyph_bitmap(ch);
            let x = x_start + char_idx as i64 * char_w;
            blit_glyph(canvas, &glyph, x, y, char_w, char_h, ink);
            if bold {
                blit_glyph(canvas, &glyph, x + 1, y, char_w, char_h, ink);
            }
        }
    }
}

/// Generate a 12x24 glyph bitmap for a character (0 = off, 1 = on).
fn glyph_bitmap(ch: char) -> Vec<u8> {
    let mut glyph = vec![0u8; GLYPH_W * GLYPH_H];
    let mut spleen = PSF2Font::new(FONT_12X24).unwrap();
    let utf8 = ch.to_string();

    if let Some(spleen_glyph) = spleen.glyph_for_utf8(utf8.as_bytes()) {
        for (row_y, row) in spleen_glyph.enumerate() {
            for (col_x, on) in row.enumerate() {
                let idx = row_y * GLYPH_W + col_x;
                if idx < glyph.len() {
                    glyph[idx] = u8::from(on);
                }
            }
        }
    } else {
        draw_box(&mut glyph, GLYPH_W, GLYPH_H);
    }

    glyph
}

/// Box outline for characters the font lacks.
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = 1;
        glyph[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        glyph[y * width] = 1;
        glyph[y * width + width - 1] = 1;
    }
}

/// Nearest-neighbor blit of a source glyph into a `char_w` x `char_h` cell.
fn blit_glyph(
    canvas: &mut RgbaImage,
    glyph: &[u8],
    x: i64,
    y: i64,
    char_w: i64,
    char_h: i64,
    ink: Rgba<u8>,
) {
    for dy in 0..char_h {
        let sy = (dy * GLYPH_H as i64 / char_h) as usize;
        for dx in 0..char_w {
            let sx = (dx * GLYPH_W as i64 / char_w) as usize;
            if glyph[sy * GLYPH_W + sx] == 1 {
                put_pixel_clipped(canvas, x + dx, y + dy, ink);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::NameBox;
    use pretty_assertions::assert_eq;

    fn name_box(json: &str) -> NameBox {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_wrap_short_text() {
        assert_eq!(wrap_lines("Ada Lovelace", 20, None), vec!["Ada Lovelace"]);
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        assert_eq!(
            wrap_lines("Ada Lovelace of London", 12, None),
            vec!["Ada Lovelace", "of London"]
        );
    }

    #[test]
    fn test_wrap_hard_splits_long_word() {
        assert_eq!(wrap_lines("abcdefgh", 3, None), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_wrap_respects_max_lines() {
        assert_eq!(
            wrap_lines("one two three four", 5, Some(2)),
            vec!["one", "two"]
        );
    }

    #[test]
    fn test_wrap_zero_budget() {
        assert_eq!(wrap_lines("ab", 0, None), vec!["a", "b"]);
    }

    #[test]
    fn test_glyph_has_ink() {
        let glyph = glyph_bitmap('A');
        assert!(glyph.iter().any(|&p| p == 1));
    }

    #[test]
    fn test_draw_name_paints_ink() {
        let mut canvas = RgbaImage::from_pixel(600, 400, Rgba([255, 255, 255, 255]));
        let name = name_box(
            r##"{ "x": 100, "y": 100, "width": 1000, "color": "#ff0000", "fontSize": 48,
                 "textAlign": "center" }"##,
        );
        let ctx = ScaleContext::for_viewport(600.0);
        draw_name(&mut canvas, &name, "ADA", &ctx);

        let red = canvas
            .pixels()
            .filter(|p| **p == Rgba([255, 0, 0, 255]))
            .count();
        assert!(red > 0);
    }

    #[test]
    fn test_shadow_pass_paints_before_text() {
        let mut canvas = RgbaImage::from_pixel(600, 400, Rgba([255, 255, 255, 255]));
        let name = name_box(
            r##"{ "x": 100, "y": 100, "width": 1000, "color": "#ffffff", "fontSize": 48,
                 "textShadowColor": "#0000ff",
                 "textShadowOffset": { "width": 4, "height": 4 } }"##,
        );
        let ctx = ScaleContext::for_viewport(1200.0);
        draw_name(&mut canvas, &name, "ADA", &ctx);

        let blue = canvas
            .pixels()
            .filter(|p| **p == Rgba([0, 0, 255, 255]))
            .count();
        assert!(blue > 0);
    }

    #[test]
    fn test_empty_text_is_noop() {
        let mut canvas = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        let name = name_box(r##"{ "x": 0, "y": 0, "width": 10, "color": "#000", "fontSize": 5 }"##);
        let ctx = ScaleContext::for_viewport(1200.0);
        draw_name(&mut canvas, &name, "", &ctx);
        assert!(canvas.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }
}
