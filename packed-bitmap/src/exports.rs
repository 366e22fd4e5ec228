//! Per-layout function tables.
//!
//! [Exports] bundles every drawing routine of one layout behind plain function pointers, so
//! harnesses and benchmarks can be written once and run against each table in turn.
use bitflags::bitflags;

use crate::{
    blit::{blit, blit_within},
    circle::{draw_circle, draw_ellipse, fill_circle},
    image::{ImageRef, ImageView},
    layout::{LayoutId, PixelLayout},
    line::draw_line,
    primitive::{
        clear, draw_hline, draw_point, draw_rect, draw_rect_coord, draw_vline, fill_rect,
        fill_rect_coord, get_pixel,
    },
};

bitflags! {
    /// Groups of operations a table provides.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Features: u8 {
        /// Points, lines, rectangles, circles and ellipses.
        const PRIMITIVE = 1 << 0;
        /// Block copies.
        const BLIT = 1 << 1;
        /// Scaled copies.
        const SCALE = 1 << 2;
        /// Clearing and pixel access.
        const DRAW = 1 << 3;
    }
}

type View<'a, 'b, L> = &'a mut ImageView<'b, L>;

/// The drawing routines of layout `L`, operating on [ImageView]s.
pub struct Exports<L: PixelLayout> {
    pub layout: LayoutId,
    pub features: Features,
    pub clear: for<'a, 'b> fn(View<'a, 'b, L>, u32),
    pub get_pixel: for<'a, 'b> fn(&'a ImageRef<'b, L>, i32, i32) -> u32,
    pub draw_point: for<'a, 'b> fn(View<'a, 'b, L>, i32, i32, u32),
    pub draw_hline: for<'a, 'b> fn(View<'a, 'b, L>, i32, i32, i32, u32),
    pub draw_vline: for<'a, 'b> fn(View<'a, 'b, L>, i32, i32, i32, u32),
    pub draw_line: for<'a, 'b> fn(View<'a, 'b, L>, i32, i32, i32, i32, u32),
    pub draw_rect: for<'a, 'b> fn(View<'a, 'b, L>, i32, i32, i32, i32, u32),
    pub draw_rect_coord: for<'a, 'b> fn(View<'a, 'b, L>, i32, i32, i32, i32, u32),
    pub fill_rect: for<'a, 'b> fn(View<'a, 'b, L>, i32, i32, i32, i32, u32),
    pub fill_rect_coord: for<'a, 'b> fn(View<'a, 'b, L>, i32, i32, i32, i32, u32),
    pub draw_circle: for<'a, 'b> fn(View<'a, 'b, L>, i32, i32, i32, u32),
    pub fill_circle: for<'a, 'b> fn(View<'a, 'b, L>, i32, i32, i32, u32),
    pub draw_ellipse: for<'a, 'b> fn(View<'a, 'b, L>, i32, i32, i32, i32, u32),
    #[allow(clippy::type_complexity)]
    pub blit: for<'a, 'b, 'c, 'd> fn(
        View<'a, 'b, L>,
        u32,
        u32,
        &'c ImageRef<'d, L>,
        u32,
        u32,
        u32,
        u32,
    ),
    pub blit_within: for<'a, 'b> fn(View<'a, 'b, L>, u32, u32, u32, u32, u32, u32),
}

// The generic routines take the image type as a parameter, which fixes the view's lifetime. These
// wrappers leave it free so they coerce to the higher-ranked pointers above.
mod shims {
    use super::*;

    macro_rules! shim {
        ($name:ident => $target:path, ($($arg:ident: $ty:ty),*)) => {
            pub fn $name<L: PixelLayout>(image: &mut ImageView<'_, L>, $($arg: $ty),*) {
                $target(image, $($arg),*)
            }
        };
    }

    shim!(clear => super::clear, (color: u32));
    shim!(draw_point => super::draw_point, (x: i32, y: i32, color: u32));
    shim!(draw_hline => super::draw_hline, (x1: i32, x2: i32, y: i32, color: u32));
    shim!(draw_vline => super::draw_vline, (x: i32, y1: i32, y2: i32, color: u32));
    shim!(draw_line => super::draw_line, (x1: i32, y1: i32, x2: i32, y2: i32, color: u32));
    shim!(draw_rect => super::draw_rect, (x: i32, y: i32, width: i32, height: i32, color: u32));
    shim!(draw_rect_coord => super::draw_rect_coord, (x1: i32, y1: i32, x2: i32, y2: i32, color: u32));
    shim!(fill_rect => super::fill_rect, (x: i32, y: i32, width: i32, height: i32, color: u32));
    shim!(fill_rect_coord => super::fill_rect_coord, (x1: i32, y1: i32, x2: i32, y2: i32, color: u32));
    shim!(draw_circle => super::draw_circle, (cx: i32, cy: i32, radius: i32, color: u32));
    shim!(fill_circle => super::fill_circle, (cx: i32, cy: i32, radius: i32, color: u32));
    shim!(draw_ellipse => super::draw_ellipse, (cx: i32, cy: i32, rx: i32, ry: i32, color: u32));
    shim!(blit_within => super::blit_within, (dx: u32, dy: u32, sx: u32, sy: u32, width: u32, height: u32));

    pub fn get_pixel<L: PixelLayout>(image: &ImageRef<'_, L>, x: i32, y: i32) -> u32 {
        super::get_pixel(image, x, y)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn blit<L: PixelLayout>(
        dst: &mut ImageView<'_, L>,
        dx: u32,
        dy: u32,
        src: &ImageRef<'_, L>,
        sx: u32,
        sy: u32,
        width: u32,
        height: u32,
    ) {
        super::blit(dst, dx, dy, src, sx, sy, width, height)
    }
}

impl<L: PixelLayout> Exports<L> {
    pub const TABLE: Self = Self {
        layout: L::ID,
        features: Features::PRIMITIVE.union(Features::BLIT).union(Features::DRAW),
        clear: shims::clear::<L>,
        get_pixel: shims::get_pixel::<L>,
        draw_point: shims::draw_point::<L>,
        draw_hline: shims::draw_hline::<L>,
        draw_vline: shims::draw_vline::<L>,
        draw_line: shims::draw_line::<L>,
        draw_rect: shims::draw_rect::<L>,
        draw_rect_coord: shims::draw_rect_coord::<L>,
        fill_rect: shims::fill_rect::<L>,
        fill_rect_coord: shims::fill_rect_coord::<L>,
        draw_circle: shims::draw_circle::<L>,
        fill_circle: shims::fill_circle::<L>,
        draw_ellipse: shims::draw_ellipse::<L>,
        blit: shims::blit::<L>,
        blit_within: shims::blit_within::<L>,
    };
}
