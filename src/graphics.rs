//! Shape and text rasterization.
//!
//! Everything here is written against the four primitive operations of
//! [`Canvas`], in logical coordinates, so rotation is handled once in the
//! framebuffer. Shapes may extend past the canvas; pixels that land outside
//! it are dropped.

mod font;
pub use font::*;

use core::mem::swap;

use embedded_graphics_core::{
    geometry::{Point, Size},
    pixelcolor::{Rgb565, RgbColor},
};
use log::debug;

/// Largest width, height or radius a shape is drawn with.
const MAX_EXTENT: i32 = 1 << 15;

fn extent(value: u32) -> i32 {
    i32::try_from(value).map_or(MAX_EXTENT, |v| v.min(MAX_EXTENT))
}

fn span(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Narrows a widened coordinate. Values past the `i32` range are pinned to
/// its ends, which lie outside every canvas.
fn point(x: i64, y: i64) -> Point {
    let narrow = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    Point::new(narrow(x), narrow(y))
}

/// `x0 + dx * t / dy`, truncated toward zero. Callers keep `t` within
/// `0..=dy`, so the result lies between `x0` and `x0 + dx`.
fn interpolate(x0: i64, dx: i64, t: i64, dy: i64) -> i64 {
    let step = i128::from(dx) * i128::from(t) / i128::from(dy);
    x0 + step as i64
}

/// Horizontal run from `a` to `b` inclusive on row `y`, clipped first.
fn clipped_hline<C: Canvas + ?Sized>(canvas: &mut C, a: i64, b: i64, y: i64, color: Rgb565) {
    let size = canvas.logical_size();
    if y < 0 || y >= i64::from(extent(size.height)) {
        return;
    }
    let (a, b) = (a.max(0), b.min(i64::from(extent(size.width)) - 1));
    if a > b {
        return;
    }
    canvas.draw_fast_hline(point(a, y), (b - a + 1) as i32, color);
}

/// A rectangle already clipped to the canvas, right and bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Area {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Intersects a rectangle with a canvas of `canvas` size at the origin.
pub(crate) fn clip(canvas: Size, top_left: Point, size: Size) -> Option<Area> {
    let right = top_left
        .x
        .saturating_add(extent(size.width))
        .min(extent(canvas.width));
    let bottom = top_left
        .y
        .saturating_add(extent(size.height))
        .min(extent(canvas.height));
    let left = top_left.x.max(0);
    let top = top_left.y.max(0);
    (left < right && top < bottom).then_some(Area {
        left,
        top,
        right,
        bottom,
    })
}

/// Octant selection for [`draw_circle_quadrants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Quadrants(u8);

impl Quadrants {
    const TOP_LEFT: Self = Self(0x1);
    const TOP_RIGHT: Self = Self(0x2);
    const BOTTOM_RIGHT: Self = Self(0x4);
    const BOTTOM_LEFT: Self = Self(0x8);
    const ALL: Self = Self(0xF);

    fn contains(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

/// Half selection for [`fill_circle_halves`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Halves(u8);

impl Halves {
    const RIGHT: Self = Self(0x1);
    const LEFT: Self = Self(0x2);
    const BOTH: Self = Self(0x3);

    fn contains(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

/// A logical drawing surface.
///
/// Implementors provide pixel access and a full fill; every other method is
/// built on those. Coordinates are logical, colors are RGB565 as the caller
/// sees them.
pub trait Canvas {
    /// Width and height of the logical canvas for the current rotation.
    fn logical_size(&self) -> Size;

    /// Writes one pixel. Points outside the canvas are ignored.
    fn set_pixel(&mut self, point: Point, color: Rgb565);

    /// Reads one pixel, black outside the canvas.
    fn pixel(&self, point: Point) -> Rgb565;

    /// Sets every pixel of the canvas.
    fn fill(&mut self, color: Rgb565);

    fn draw_pixel(&mut self, point: Point, color: Rgb565) {
        self.set_pixel(point, color);
    }

    fn fill_screen(&mut self, color: Rgb565) {
        self.fill(color);
    }

    /// Fills the screen with black.
    fn clear_screen(&mut self) {
        self.fill(Rgb565::BLACK);
    }

    /// Horizontal run of `width` pixels starting at `start`.
    fn draw_fast_hline(&mut self, start: Point, width: i32, color: Rgb565) {
        let size = self.logical_size();
        let Point { mut x, y } = start;
        let mut w = width;
        if y < 0 || y >= extent(size.height) || x >= extent(size.width) {
            return;
        }
        if x < 0 {
            w = w.saturating_add(x);
            x = 0;
        }
        w = w.min(extent(size.width) - x);
        for i in 0..w {
            self.set_pixel(Point::new(x + i, y), color);
        }
    }

    /// Vertical run of `height` pixels starting at `start`.
    fn draw_fast_vline(&mut self, start: Point, height: i32, color: Rgb565) {
        let size = self.logical_size();
        let Point { x, mut y } = start;
        let mut h = height;
        if x < 0 || x >= extent(size.width) || y >= extent(size.height) {
            return;
        }
        if y < 0 {
            h = h.saturating_add(y);
            y = 0;
        }
        h = h.min(extent(size.height) - y);
        for i in 0..h {
            self.set_pixel(Point::new(x, y + i), color);
        }
    }

    /// Bresenham line, both endpoints included.
    ///
    /// Only the part of the major axis that crosses the canvas is walked;
    /// the error term is advanced to the first visible step directly, so the
    /// lit pixels are the same as for the full walk.
    fn draw_line(&mut self, start: Point, end: Point, color: Rgb565) {
        let (mut x0, mut y0) = (i64::from(start.x), i64::from(start.y));
        let (mut x1, mut y1) = (i64::from(end.x), i64::from(end.y));

        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            swap(&mut x0, &mut y0);
            swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            swap(&mut x0, &mut x1);
            swap(&mut y0, &mut y1);
        }

        let size = self.logical_size();
        let (width, height) = (i64::from(extent(size.width)), i64::from(extent(size.height)));
        let (major, minor) = if steep { (height, width) } else { (width, height) };

        let first = x0.max(0);
        let last = x1.min(major - 1);
        if first > last {
            return;
        }

        let dx = x1 - x0;
        let dy = (y1 - y0).abs();
        let ystep = if y0 < y1 { 1 } else { -1 };
        let mut err = dx / 2;
        let mut y = y0;

        let skipped = first - x0;
        if skipped > 0 {
            let owed = i128::from(err) - i128::from(skipped) * i128::from(dy);
            let settled = owed.rem_euclid(i128::from(dx));
            let steps = (settled - owed) / i128::from(dx);
            // steps <= skipped, so the new y stays between y0 and y1
            y += steps as i64 * ystep;
            err = settled as i64;
        }

        for x in first..=last {
            if (0..minor).contains(&y) {
                if steep {
                    self.set_pixel(point(y, x), color);
                } else {
                    self.set_pixel(point(x, y), color);
                }
            } else if (ystep > 0) == (y >= minor) {
                // moving away from the canvas
                break;
            }
            err -= dy;
            if err < 0 {
                y += ystep;
                err += dx;
            }
        }
    }

    fn draw_rect(&mut self, top_left: Point, size: Size, color: Rgb565) {
        let (w, h) = (extent(size.width), extent(size.height));
        if w == 0 || h == 0 {
            return;
        }
        let (x, y) = (i64::from(top_left.x), i64::from(top_left.y));
        let (right, bottom) = (x + i64::from(w) - 1, y + i64::from(h) - 1);
        self.draw_fast_hline(point(x, y), w, color);
        self.draw_fast_hline(point(x, bottom), w, color);
        self.draw_fast_vline(point(x, y), h, color);
        self.draw_fast_vline(point(right, y), h, color);
    }

    /// Solid rectangle, clipped to the canvas before any pixel is written.
    fn fill_rect(&mut self, top_left: Point, size: Size, color: Rgb565) {
        let Some(area) = clip(self.logical_size(), top_left, size) else {
            return;
        };
        for y in area.top..area.bottom {
            for x in area.left..area.right {
                self.set_pixel(Point::new(x, y), color);
            }
        }
    }

    /// Rectangle outline with quarter-circle corners. The radius is limited
    /// to half the shorter side.
    fn draw_round_rect(&mut self, top_left: Point, size: Size, radius: u32, color: Rgb565) {
        let (w, h) = (extent(size.width), extent(size.height));
        if w == 0 || h == 0 {
            return;
        }
        let r = extent(radius).min(w.min(h) / 2);
        let (x, y) = (i64::from(top_left.x), i64::from(top_left.y));
        let (x1, y1) = (x + i64::from(w) - 1, y + i64::from(h) - 1);
        let inset = i64::from(r);

        self.draw_fast_hline(point(x + inset, y), w - 2 * r, color);
        self.draw_fast_hline(point(x + inset, y1), w - 2 * r, color);
        self.draw_fast_vline(point(x, y + inset), h - 2 * r, color);
        self.draw_fast_vline(point(x1, y + inset), h - 2 * r, color);

        let (left, top) = (x + inset, y + inset);
        let (right, bottom) = (x1 - inset, y1 - inset);
        draw_circle_quadrants(self, (left, top), r, Quadrants::TOP_LEFT, color);
        draw_circle_quadrants(self, (right, top), r, Quadrants::TOP_RIGHT, color);
        draw_circle_quadrants(self, (right, bottom), r, Quadrants::BOTTOM_RIGHT, color);
        draw_circle_quadrants(self, (left, bottom), r, Quadrants::BOTTOM_LEFT, color);
    }

    fn fill_round_rect(&mut self, top_left: Point, size: Size, radius: u32, color: Rgb565) {
        let (w, h) = (extent(size.width), extent(size.height));
        if w == 0 || h == 0 {
            return;
        }
        let r = extent(radius).min(w.min(h) / 2);
        let (x, y) = (i64::from(top_left.x), i64::from(top_left.y));
        let inset = i64::from(r);

        self.fill_rect(point(x + inset, y), Size::new(span(w - 2 * r), span(h)), color);

        let delta = h - 2 * r - 1;
        let right = x + i64::from(w) - inset - 1;
        fill_circle_halves(self, (right, y + inset), r, Halves::RIGHT, delta, color);
        fill_circle_halves(self, (x + inset, y + inset), r, Halves::LEFT, delta, color);
    }

    /// Midpoint circle outline.
    fn draw_circle(&mut self, center: Point, radius: u32, color: Rgb565) {
        let r = extent(radius);
        let (x0, y0) = (i64::from(center.x), i64::from(center.y));
        let rr = i64::from(r);

        self.set_pixel(point(x0 + rr, y0), color);
        self.set_pixel(point(x0 - rr, y0), color);
        self.set_pixel(point(x0, y0 - rr), color);
        self.set_pixel(point(x0, y0 + rr), color);

        draw_circle_quadrants(self, (x0, y0), r, Quadrants::ALL, color);
    }

    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb565) {
        let r = extent(radius);
        let (x0, y0) = (i64::from(center.x), i64::from(center.y));
        self.draw_fast_vline(point(x0, y0 - i64::from(r)), 2 * r + 1, color);
        fill_circle_halves(self, (x0, y0), r, Halves::BOTH, 0, color);
    }

    fn draw_triangle(&mut self, p0: Point, p1: Point, p2: Point, color: Rgb565) {
        self.draw_line(p0, p1, color);
        self.draw_line(p1, p2, color);
        self.draw_line(p2, p0, color);
    }

    /// Scanline triangle fill. Rows and spans outside the canvas are skipped
    /// before they are computed.
    fn fill_triangle(&mut self, p0: Point, p1: Point, p2: Point, color: Rgb565) {
        let widen = |p: Point| (i64::from(p.x), i64::from(p.y));
        let (mut p0, mut p1, mut p2) = (widen(p0), widen(p1), widen(p2));

        // sort by y: p0.y <= p1.y <= p2.y
        if p0.1 > p1.1 {
            swap(&mut p0, &mut p1);
        }
        if p1.1 > p2.1 {
            swap(&mut p1, &mut p2);
        }
        if p0.1 > p1.1 {
            swap(&mut p0, &mut p1);
        }
        let ((x0, y0), (x1, y1), (x2, y2)) = (p0, p1, p2);

        if y0 == y2 {
            let a = x0.min(x1).min(x2);
            let b = x0.max(x1).max(x2);
            clipped_hline(self, a, b, y0, color);
            return;
        }

        let height = i64::from(extent(self.logical_size().height));
        let (dx01, dy01) = (x1 - x0, y1 - y0);
        let (dx02, dy02) = (x2 - x0, y2 - y0);
        let (dx12, dy12) = (x2 - x1, y2 - y1);

        // The middle row belongs to the upper half only if the lower half is flat.
        let last = if y1 == y2 { y1 } else { y1 - 1 };

        for y in y0.max(0)..=last.min(height - 1) {
            let a = interpolate(x0, dx01, y - y0, dy01);
            let b = interpolate(x0, dx02, y - y0, dy02);
            clipped_hline(self, a.min(b), a.max(b), y, color);
        }

        for y in (last + 1).max(0)..=y2.min(height - 1) {
            let a = interpolate(x1, dx12, y - y1, dy12);
            let b = interpolate(x0, dx02, y - y0, dy02);
            clipped_hline(self, a.min(b), a.max(b), y, color);
        }
    }

    /// Draws one glyph with its top left corner at `position`.
    ///
    /// Characters the font does not cover are rejected without drawing.
    fn draw_char(
        &mut self,
        position: Point,
        ch: char,
        font: &Font<'_>,
        color: Rgb565,
    ) -> Result<(), TextError> {
        let rows = font
            .glyph(ch)
            .ok_or(TextError::UnsupportedCharacter(ch))?;
        let width = u32::from(font.width.min(16));
        let (x, y) = (i64::from(position.x), i64::from(position.y));
        for (dy, &bits) in (0..).zip(rows) {
            for dx in 0..width {
                if (u32::from(bits) << dx) & 0x8000 != 0 {
                    self.set_pixel(point(x + i64::from(dx), y + dy), color);
                }
            }
        }
        Ok(())
    }

    /// Draws `text`, wrapping at the right edge of the canvas.
    ///
    /// A wrapped line starts at x = 0 and drops one leading space. Drawing
    /// stops when the next line would not fit above the bottom edge. The
    /// whole string is checked against the font first; if any character is
    /// unsupported nothing is drawn.
    fn draw_string(
        &mut self,
        position: Point,
        text: &str,
        font: &Font<'_>,
        color: Rgb565,
    ) -> Result<(), TextError> {
        if let Some(ch) = text.chars().find(|ch| !font.supports(*ch)) {
            return Err(TextError::UnsupportedCharacter(ch));
        }

        let size = self.logical_size();
        let (width, height) = (i64::from(extent(size.width)), i64::from(extent(size.height)));
        let (w, h) = (i64::from(font.width), i64::from(font.height));
        let (mut x, mut y) = (i64::from(position.x), i64::from(position.y));

        for ch in text.chars() {
            if x + w >= width {
                x = 0;
                y += h;
                if y + h >= height {
                    break;
                }
                if ch == ' ' {
                    continue;
                }
            }
            self.draw_char(point(x, y), ch, font, color)?;
            x += w;
        }
        Ok(())
    }

    /// Copies a row-major block of pixels to the canvas.
    ///
    /// Unlike shapes, images are not clipped: if the block does not fit the
    /// canvas entirely, or `pixels` is shorter than `size` needs, nothing is
    /// drawn.
    fn draw_image(&mut self, top_left: Point, size: Size, pixels: &[Rgb565]) {
        let canvas = self.logical_size();
        let (w, h) = (size.width as usize, size.height as usize);
        let fits = top_left.x >= 0
            && top_left.y >= 0
            && u64::from(top_left.x as u32) + u64::from(size.width) <= u64::from(canvas.width)
            && u64::from(top_left.y as u32) + u64::from(size.height) <= u64::from(canvas.height);
        if !fits || pixels.len() < w * h {
            debug!(
                "image {}x{} at ({}, {}) rejected",
                size.width, size.height, top_left.x, top_left.y
            );
            return;
        }
        if w == 0 {
            return;
        }

        for (dy, line) in (0..).zip(pixels.chunks_exact(w).take(h)) {
            for (dx, &color) in (0..).zip(line) {
                self.set_pixel(top_left + Point::new(dx, dy), color);
            }
        }
    }
}

/// Outline arcs of the octant pairs selected by `quadrants`.
fn draw_circle_quadrants<C: Canvas + ?Sized>(
    canvas: &mut C,
    center: (i64, i64),
    r: i32,
    quadrants: Quadrants,
    color: Rgb565,
) {
    let (x0, y0) = center;
    let mut f = 1 - r;
    let mut ddf_x = 1;
    let mut ddf_y = -2 * r;
    let mut x = 0;
    let mut y = r;

    while x < y {
        if f >= 0 {
            y -= 1;
            ddf_y += 2;
            f += ddf_y;
        }
        x += 1;
        ddf_x += 2;
        f += ddf_x;

        let (dx, dy) = (i64::from(x), i64::from(y));
        if quadrants.contains(Quadrants::BOTTOM_LEFT) {
            canvas.set_pixel(point(x0 - dy, y0 + dx), color);
            canvas.set_pixel(point(x0 - dx, y0 + dy), color);
        }
        if quadrants.contains(Quadrants::BOTTOM_RIGHT) {
            canvas.set_pixel(point(x0 + dx, y0 + dy), color);
            canvas.set_pixel(point(x0 + dy, y0 + dx), color);
        }
        if quadrants.contains(Quadrants::TOP_RIGHT) {
            canvas.set_pixel(point(x0 + dy, y0 - dx), color);
            canvas.set_pixel(point(x0 + dx, y0 - dy), color);
        }
        if quadrants.contains(Quadrants::TOP_LEFT) {
            canvas.set_pixel(point(x0 - dx, y0 - dy), color);
            canvas.set_pixel(point(x0 - dy, y0 - dx), color);
        }
    }
}

/// Vertical spans between symmetric circle points, `delta` extra rows tall,
/// on the selected sides of the center column.
fn fill_circle_halves<C: Canvas + ?Sized>(
    canvas: &mut C,
    center: (i64, i64),
    r: i32,
    halves: Halves,
    delta: i32,
    color: Rgb565,
) {
    let (x0, y0) = center;
    let delta = delta + 1;
    let mut f = 1 - r;
    let mut ddf_x = 1;
    let mut ddf_y = -2 * r;
    let mut x = 0;
    let mut y = r;

    while x < y {
        if f >= 0 {
            y -= 1;
            ddf_y += 2;
            f += ddf_y;
        }
        x += 1;
        ddf_x += 2;
        f += ddf_x;

        let (dx, dy) = (i64::from(x), i64::from(y));
        if halves.contains(Halves::RIGHT) {
            canvas.draw_fast_vline(point(x0 + dx, y0 - dy), 2 * y + delta, color);
            canvas.draw_fast_vline(point(x0 + dy, y0 - dx), 2 * x + delta, color);
        }
        if halves.contains(Halves::LEFT) {
            canvas.draw_fast_vline(point(x0 - dx, y0 - dy), 2 * y + delta, color);
            canvas.draw_fast_vline(point(x0 - dy, y0 - dx), 2 * x + delta, color);
        }
    }
}
