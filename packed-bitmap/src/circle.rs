//! Circles and ellipses, rasterized with the integer midpoint algorithms.
//!
//! Outlines are plotted one pixel at a time, each pixel clipped against the image. Filled circles
//! are emitted as horizontal spans so every row is written with the word-level span fill.
use crate::{
    assertion::{check, check_color, check_coord, ELLIPSE_RADIUS_MAX, RADIUS_MAX},
    image::RasterMut,
    layout::PixelLayout,
    primitive::{hline_clipped, put_pixel_clipped, vline_clipped},
};

/// Steps of the midpoint circle walk over one octant.
///
/// Yields `(dx, dy)` offsets from `(0, radius)` until `dx > dy`. The remaining seven octants are
/// mirror images of these offsets.
#[derive(Debug, Clone)]
pub struct CircleOctant {
    dx: i32,
    dy: i32,
    decision: i32,
}

impl CircleOctant {
    pub fn new(radius: i32) -> Self {
        Self {
            dx: 0,
            dy: radius,
            decision: 1 - radius,
        }
    }
}

impl Iterator for CircleOctant {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.dx > self.dy {
            return None;
        }
        let step = (self.dx, self.dy);
        self.dx += 1;
        if self.decision < 0 {
            self.decision += 2 * self.dx + 1;
        } else {
            self.dy -= 1;
            self.decision += 2 * (self.dx - self.dy) + 1;
        }
        Some(step)
    }
}

/// Draws the outline of the circle of `radius` centered on (`cx`, `cy`).
///
/// A radius of 0 draws the center pixel only.
pub fn draw_circle<L, I>(image: &mut I, cx: i32, cy: i32, radius: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_coord!(cx, cy);
    check!(radius >= 0, "ERROR: radius < 0");
    check!(radius <= RADIUS_MAX, "ERROR: radius > 2^13 - 1");
    check_color!(L, color);

    if radius == 0 {
        put_pixel_clipped(image, cx, cy, color);
        return;
    }
    for (dx, dy) in CircleOctant::new(radius) {
        put_pixel_clipped(image, cx + dx, cy + dy, color);
        put_pixel_clipped(image, cx - dx, cy + dy, color);
        put_pixel_clipped(image, cx + dx, cy - dy, color);
        put_pixel_clipped(image, cx - dx, cy - dy, color);
        put_pixel_clipped(image, cx + dy, cy + dx, color);
        put_pixel_clipped(image, cx - dy, cy + dx, color);
        put_pixel_clipped(image, cx + dy, cy - dx, color);
        put_pixel_clipped(image, cx - dy, cy - dx, color);
    }
}

/// Fills the circle of `radius` centered on (`cx`, `cy`).
///
/// Each row covers the same pixels as the outline drawn by [draw_circle] on that row, and
/// everything between them.
pub fn fill_circle<L, I>(image: &mut I, cx: i32, cy: i32, radius: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_coord!(cx, cy);
    check!(radius >= 0, "ERROR: radius < 0");
    check!(radius <= RADIUS_MAX, "ERROR: radius > 2^13 - 1");
    check_color!(L, color);

    if radius == 0 {
        put_pixel_clipped(image, cx, cy, color);
        return;
    }
    let mut octant = CircleOctant::new(radius).peekable();
    while let Some((dx, dy)) = octant.next() {
        hline_clipped(image, cx - dy, cx + dy, cy + dx, color);
        hline_clipped(image, cx - dy, cx + dy, cy - dx, color);
        // Rows cy +- dy are widest on the last step before dy moves.
        let dy_moves = octant.peek().is_none_or(|&(_, next_dy)| next_dy != dy);
        if dy_moves {
            hline_clipped(image, cx - dx, cx + dx, cy + dy, color);
            hline_clipped(image, cx - dx, cx + dx, cy - dy, color);
        }
    }
}

/// Draws the outline of the axis-aligned ellipse with radii `rx` and `ry` centered on
/// (`cx`, `cy`).
///
/// A zero radius collapses the ellipse into a line along the other axis, or into the center pixel
/// when both are zero.
pub fn draw_ellipse<L, I>(image: &mut I, cx: i32, cy: i32, rx: i32, ry: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_coord!(cx, cy);
    check!(rx >= 0, "ERROR: rx < 0");
    check!(ry >= 0, "ERROR: ry < 0");
    check!(rx <= ELLIPSE_RADIUS_MAX, "ERROR: rx > 2^10 - 1");
    check!(ry <= ELLIPSE_RADIUS_MAX, "ERROR: ry > 2^10 - 1");
    check_color!(L, color);

    match (rx, ry) {
        (0, 0) => put_pixel_clipped(image, cx, cy, color),
        (0, _) => vline_clipped(image, cx, cy - ry, cy + ry, color),
        (_, 0) => hline_clipped(image, cx - rx, cx + rx, cy, color),
        _ => ellipse_outline(image, cx, cy, rx, ry, color),
    }
}

fn ellipse_outline<L, I>(image: &mut I, cx: i32, cy: i32, rx: i32, ry: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    let mut plot4 = |dx: i32, dy: i32| {
        put_pixel_clipped(image, cx + dx, cy + dy, color);
        put_pixel_clipped(image, cx - dx, cy + dy, color);
        put_pixel_clipped(image, cx + dx, cy - dy, color);
        put_pixel_clipped(image, cx - dx, cy - dy, color);
    };

    // Squared radii reach 2^20, their products 2^40.
    let rx_sq = rx as i64 * rx as i64;
    let ry_sq = ry as i64 * ry as i64;
    let (mut dx, mut dy) = (0, ry);
    let mut px = 0;
    let mut py = 2 * rx_sq * dy as i64;

    // Region 1: the outline is flatter than 45 degrees, step x every pixel.
    let mut p = ry_sq - rx_sq * ry as i64 + (rx_sq >> 2);
    while px < py {
        plot4(dx, dy);
        dx += 1;
        px += 2 * ry_sq;
        if p < 0 {
            p += px + ry_sq;
        } else {
            dy -= 1;
            py -= 2 * rx_sq;
            p += px - py + ry_sq;
        }
    }

    // Region 2: steeper than 45 degrees, step y every pixel.
    let (x, y) = (dx as i64, dy as i64);
    p = ry_sq * (x * x + x) + rx_sq * (y * y - y) - rx_sq * ry_sq;
    while dy >= 0 {
        plot4(dx, dy);
        dy -= 1;
        py -= 2 * rx_sq;
        if p > 0 {
            p += rx_sq - py;
        } else {
            dx += 1;
            px += 2 * ry_sq;
            p += px - py + rx_sq;
        }
    }
}
