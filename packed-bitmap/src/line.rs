//! Arbitrary lines.
//!
//! Lines are clipped to the image with Cohen-Sutherland outcodes and then rasterized with an
//! integer Bresenham walk. Clipping only narrows the range walked along the major axis: the walk
//! resumes the unclipped line's error term at the first step it draws, so a clipped line lights
//! exactly the visible pixels of the whole line. Horizontal and vertical lines skip both steps and
//! go straight to the word-level span routines.
//!
//! The endpoints are put in a canonical order before anything else, so `draw_line(p1, p2)` and
//! `draw_line(p2, p1)` always produce the same pixels.
use bitflags::bitflags;

use crate::{
    assertion::{check_color, check_coord},
    image::{Raster, RasterMut},
    layout::PixelLayout,
    primitive::{hline_clipped, put_pixel_clipped, vline_clipped},
};

bitflags! {
    /// The sides of a [ClipRect] that a point lies beyond.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Outcode: u8 {
        const LEFT = 1 << 1;
        const RIGHT = 1 << 2;
        const BOTTOM = 1 << 3;
        const TOP = 1 << 4;
    }
}

/// Clip bounds. `left` and `top` are inclusive, `right` and `bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClipRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ClipRect {
    /// The bounds of `image`.
    pub fn of<I: Raster + ?Sized>(image: &I) -> Self {
        Self {
            left: 0,
            top: 0,
            right: image.width() as i32,
            bottom: image.height() as i32,
        }
    }

    /// The bounds grown by `margin` pixels on every side.
    pub fn expanded(&self, margin: i32) -> Self {
        Self {
            left: self.left - margin,
            top: self.top - margin,
            right: self.right + margin,
            bottom: self.bottom + margin,
        }
    }

    pub fn outcode(&self, x: i32, y: i32) -> Outcode {
        let mut code = Outcode::empty();
        if x < self.left {
            code |= Outcode::LEFT;
        } else if x >= self.right {
            code |= Outcode::RIGHT;
        }
        if y < self.top {
            code |= Outcode::TOP;
        } else if y >= self.bottom {
            code |= Outcode::BOTTOM;
        }
        code
    }
}

/// Fractional bits kept by [lerp] before rounding.
const FIXED_SHIFT: u32 = 6;

/// The `p` coordinate of the point at `q == t` on the line through (`p1`, `q1`) and (`p2`, `q2`).
///
/// Products are formed in 64 bits: at the coordinate limits `dp * (t - q1) << FIXED_SHIFT` is
/// about 2^31 and would overflow an `i32`.
#[inline]
fn lerp(p1: i32, p2: i32, q1: i32, q2: i32, t: i32) -> i32 {
    let dq = (q2 - q1) as i64;
    if dq == 0 {
        return p1;
    }
    let dp = (p2 - p1) as i64;
    let scaled = ((dp * (t - q1) as i64) << FIXED_SHIFT) / dq;
    p1 + ((scaled + (1 << (FIXED_SHIFT - 1))) >> FIXED_SHIFT) as i32
}

/// A line segment between two inclusive endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Segment {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Whether the line moves further vertically than horizontally.
    pub fn is_steep(&self) -> bool {
        (self.x2 - self.x1).abs() < (self.y2 - self.y1).abs()
    }

    /// Orders the endpoints so the coordinate along the major axis increases.
    pub fn canonical(self) -> Self {
        let reversed = if self.is_steep() {
            self.y1 > self.y2
        } else {
            self.x1 > self.x2
        };
        if reversed {
            Self::new(self.x2, self.y2, self.x1, self.y1)
        } else {
            self
        }
    }

    fn x_at(&self, y: i32) -> i32 {
        lerp(self.x1, self.x2, self.y1, self.y2, y)
    }

    fn y_at(&self, x: i32) -> i32 {
        lerp(self.y1, self.y2, self.x1, self.x2, x)
    }

    /// Length along the major axis, length along the minor axis and the minor axis direction.
    fn extents(&self) -> (i32, i32, i32) {
        let (dx, dy) = (self.x2 - self.x1, self.y2 - self.y1);
        if self.is_steep() {
            (dy.abs(), dx.abs(), dx.signum())
        } else {
            (dx.abs(), dy.abs(), dy.signum())
        }
    }

    /// The pixel and error term a Bresenham walk of this canonical segment has after `step` steps
    /// along the major axis.
    fn walk_state(&self, step: i32) -> (i32, i32, i32) {
        let (major, minor, minor_sign) = self.extents();
        let start = major / 2;
        // The minor coordinate advances whenever the error would drop to zero or below, so after
        // `step` steps it has advanced the least number of times that keeps the error positive.
        // A two-pixel line starts at zero error and advances on every step.
        let (advances, error) = if start == 0 {
            (step, 0)
        } else {
            let (k, start, major, minor) = (step as i64, start as i64, major as i64, minor as i64);
            let advances = (k * minor - start).div_euclid(major) + 1;
            (advances as i32, (start - k * minor + advances * major) as i32)
        };
        let offset = minor_sign * advances;
        if self.is_steep() {
            (self.x1 + offset, self.y1 + step, error)
        } else {
            (self.x1 + step, self.y1 + offset, error)
        }
    }

    /// Clips the segment to `rect`, returning `None` when nothing of it is left.
    ///
    /// The endpoint order is preserved.
    pub fn clip(self, rect: &ClipRect) -> Option<Self> {
        let Segment {
            mut x1,
            mut y1,
            mut x2,
            mut y2,
        } = self;
        let mut code1 = rect.outcode(x1, y1);
        let mut code2 = rect.outcode(x2, y2);

        // Every pass moves one endpoint onto an edge.
        for _ in 0..8 {
            if (code1 | code2).is_empty() {
                return Some(Self::new(x1, y1, x2, y2));
            }
            if code1.intersects(code2) {
                return None;
            }

            let code = if code1.is_empty() { code2 } else { code1 };
            // Intersections are interpolated between the unclipped endpoints.
            let (x, y) = if code.contains(Outcode::TOP) {
                (self.x_at(rect.top), rect.top)
            } else if code.contains(Outcode::BOTTOM) {
                (self.x_at(rect.bottom - 1), rect.bottom - 1)
            } else if code.contains(Outcode::RIGHT) {
                (rect.right - 1, self.y_at(rect.right - 1))
            } else {
                (rect.left, self.y_at(rect.left))
            };

            if code1.is_empty() {
                (x2, y2) = (x, y);
                code2 = rect.outcode(x2, y2);
            } else {
                (x1, y1) = (x, y);
                code1 = rect.outcode(x1, y1);
            }
        }
        None
    }
}

/// Draws a line between (`x1`, `y1`) and (`x2`, `y2`), both inclusive.
pub fn draw_line<L, I>(image: &mut I, x1: i32, y1: i32, x2: i32, y2: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_coord!(x1, y1, x2, y2);
    check_color!(L, color);
    line_clipped(image, Segment::new(x1, y1, x2, y2), color, walk_one_loop::<L, I>);
}

/// [draw_line] rasterized with one loop per major axis.
pub fn draw_line_two_loop<L, I>(image: &mut I, x1: i32, y1: i32, x2: i32, y2: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_coord!(x1, y1, x2, y2);
    check_color!(L, color);
    line_clipped(image, Segment::new(x1, y1, x2, y2), color, walk_two_loop::<L, I>);
}

/// [draw_line] rasterized with a single loop whose steps are chosen up front.
pub fn draw_line_one_loop<L, I>(image: &mut I, x1: i32, y1: i32, x2: i32, y2: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_coord!(x1, y1, x2, y2);
    check_color!(L, color);
    line_clipped(image, Segment::new(x1, y1, x2, y2), color, walk_one_loop::<L, I>);
}

/// Pixels of slack added around the image before clipping. Interpolated intersections are off by
/// at most half a pixel, so a line with visible pixels is never clipped away.
const CLIP_MARGIN: i32 = 2;

/// Walks steps `first..=last` of a canonical segment, skipping pixels outside the image.
type Walk<I> = fn(&mut I, Segment, i32, i32, u32);

fn line_clipped<L, I>(image: &mut I, segment: Segment, color: u32, walk: Walk<I>)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    let segment = segment.canonical();
    if axis_aligned(image, segment, color) {
        return;
    }
    let bounds = ClipRect::of(image);
    let Some(clipped) = segment.clip(&bounds.expanded(CLIP_MARGIN)) else {
        return;
    };

    let (origin, ends, limit) = if segment.is_steep() {
        (segment.y1, (clipped.y1, clipped.y2), bounds.bottom - 1)
    } else {
        (segment.x1, (clipped.x1, clipped.x2), bounds.right - 1)
    };
    let (major, _, _) = segment.extents();
    let first = (ends.0.min(ends.1) - CLIP_MARGIN).max(0) - origin;
    let last = (ends.0.max(ends.1) + CLIP_MARGIN).min(limit) - origin;
    let (first, last) = (first.max(0), last.min(major));
    if first <= last {
        walk(image, segment, first, last, color);
    }
}

/// Draws horizontal and vertical segments with the span routines.
fn axis_aligned<L, I>(image: &mut I, segment: Segment, color: u32) -> bool
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    if segment.y1 == segment.y2 {
        hline_clipped(image, segment.x1, segment.x2, segment.y1, color);
        true
    } else if segment.x1 == segment.x2 {
        vline_clipped(image, segment.x1, segment.y1, segment.y2, color);
        true
    } else {
        false
    }
}

/// Bresenham with one loop per major axis.
fn walk_two_loop<L, I>(image: &mut I, segment: Segment, first: i32, last: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    let (major, minor, minor_sign) = segment.extents();
    let (mut x, mut y, mut error) = segment.walk_state(first);
    if segment.is_steep() {
        for y in y..=segment.y1 + last {
            put_pixel_clipped(image, x, y, color);
            error -= minor;
            if error <= 0 {
                x += minor_sign;
                error += major;
            }
        }
    } else {
        for x in x..=segment.x1 + last {
            put_pixel_clipped(image, x, y, color);
            error -= minor;
            if error <= 0 {
                y += minor_sign;
                error += major;
            }
        }
    }
}

/// Bresenham with a single loop. The major and minor steps are picked once, before the loop.
fn walk_one_loop<L, I>(image: &mut I, segment: Segment, first: i32, last: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    let (major, minor, minor_sign) = segment.extents();
    let (major_step, minor_step) = if segment.is_steep() {
        ((0, 1), (minor_sign, 0))
    } else {
        ((1, 0), (0, minor_sign))
    };

    let (mut x, mut y, mut error) = segment.walk_state(first);
    for _ in first..=last {
        put_pixel_clipped(image, x, y, color);
        error -= minor;
        if error <= 0 {
            x += minor_step.0;
            y += minor_step.1;
            error += major;
        }
        x += major_step.0;
        y += major_step.1;
    }
}
