//! Method-call syntax for the drawing routines.
//!
//! ```
//! use packed_bitmap::{Draw, ImageBuf, X2};
//!
//! let mut image = ImageBuf::<X2, 64>::new(64, 16, 0);
//! image.draw_line(0, 0, 63, 15, 3);
//! image.fill_circle(32, 8, 4, 2);
//! assert_eq!(image.get_pixel(32, 8), 2);
//! ```
use crate::{blit, circle, image::Raster, image::RasterMut, line, primitive};

/// Drawing operations on any writable image. See the free functions of the same name.
pub trait Draw: RasterMut {
    /// Sets every pixel to `color`. See [primitive::clear].
    fn fill(&mut self, color: u32);

    fn get_pixel(&self, x: i32, y: i32) -> u32;

    fn draw_point(&mut self, x: i32, y: i32, color: u32);

    fn draw_hline(&mut self, x1: i32, x2: i32, y: i32, color: u32);

    fn draw_vline(&mut self, x: i32, y1: i32, y2: i32, color: u32);

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: u32);

    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32);

    fn draw_rect_coord(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: u32);

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32);

    fn fill_rect_coord(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: u32);

    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32);

    fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32);

    fn draw_ellipse(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, color: u32);

    /// Copies a block of `src` into this image. See [blit::blit].
    #[allow(clippy::too_many_arguments)]
    fn blit<S>(&mut self, dx: u32, dy: u32, src: &S, sx: u32, sy: u32, width: u32, height: u32)
    where
        S: Raster<Layout = Self::Layout> + ?Sized;

    /// Copies a block of this image onto itself. See [blit::blit_within].
    #[allow(clippy::too_many_arguments)]
    fn blit_within(&mut self, dx: u32, dy: u32, sx: u32, sy: u32, width: u32, height: u32);
}

impl<T: RasterMut + ?Sized> Draw for T {
    fn fill(&mut self, color: u32) {
        primitive::clear(self, color)
    }

    fn get_pixel(&self, x: i32, y: i32) -> u32 {
        primitive::get_pixel(self, x, y)
    }

    fn draw_point(&mut self, x: i32, y: i32, color: u32) {
        primitive::draw_point(self, x, y, color)
    }

    fn draw_hline(&mut self, x1: i32, x2: i32, y: i32, color: u32) {
        primitive::draw_hline(self, x1, x2, y, color)
    }

    fn draw_vline(&mut self, x: i32, y1: i32, y2: i32, color: u32) {
        primitive::draw_vline(self, x, y1, y2, color)
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: u32) {
        line::draw_line(self, x1, y1, x2, y2, color)
    }

    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        primitive::draw_rect(self, x, y, width, height, color)
    }

    fn draw_rect_coord(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: u32) {
        primitive::draw_rect_coord(self, x1, y1, x2, y2, color)
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        primitive::fill_rect(self, x, y, width, height, color)
    }

    fn fill_rect_coord(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: u32) {
        primitive::fill_rect_coord(self, x1, y1, x2, y2, color)
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        circle::draw_circle(self, cx, cy, radius, color)
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        circle::fill_circle(self, cx, cy, radius, color)
    }

    fn draw_ellipse(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, color: u32) {
        circle::draw_ellipse(self, cx, cy, rx, ry, color)
    }

    fn blit<S>(&mut self, dx: u32, dy: u32, src: &S, sx: u32, sy: u32, width: u32, height: u32)
    where
        S: Raster<Layout = Self::Layout> + ?Sized,
    {
        blit::blit(self, dx, dy, src, sx, sy, width, height)
    }

    fn blit_within(&mut self, dx: u32, dy: u32, sx: u32, sy: u32, width: u32, height: u32) {
        blit::blit_within(self, dx, dy, sx, sy, width, height)
    }
}
