//! Drawing primitives and block copies for word-packed 1, 2 and 4 bits-per-pixel bitmaps.
//!
//! Pixels are packed into 32-bit words, most significant or least significant pixel first. The
//! packing is chosen with a layout type parameter ([X1], [X1Lsb], [X2], [X2Lsb], [X4], [X4Lsb]), so
//! every routine is compiled separately for each layout it is used with and no pixel depth is ever
//! chosen at runtime.
//!
//! ## Images
//!
//! Routines draw on anything implementing [RasterMut]:
//!
//! - [ImageView] and [ImageRef] borrow external word storage, e.g. a display's frame buffer or a
//!   sprite in flash.
//! - [FixedImage] owns a word array sized for fixed dimensions.
//! - [ImageBuf] owns up to `CAP` words and can be resized with [ImageBuf::reset].
//!
//! All of them also implement `embedded-graphics`' `DrawTarget`.
//!
//! ## Drawing
//!
//! The routines live in [primitive], [line], [circle] and [blit], and are available as methods
//! through the [Draw] trait. Shapes are clipped to the image, so partially visible shapes are fine.
//! [Exports] bundles the routines of one layout into a table of function pointers.
//!
//! ```
//! use packed_bitmap::{blit, primitive, ImageBuf, X1};
//!
//! let mut screen = ImageBuf::<X1, 32>::new(128, 8, 0);
//! primitive::draw_hline(&mut screen, 30, 37, 6, 1);
//! blit::blit_within(&mut screen, 60, 0, 30, 6, 8, 1);
//! assert_eq!(primitive::get_pixel(&screen, 64, 0), 1);
//! ```
//!
//! ## Preconditions
//!
//! Arguments are validated when `debug_assertions` are enabled, and violations are reported to a
//! replaceable handler, see [assertion]. Release builds skip the checks.
//!
//! ## Features
//!
//! - `defmt` / `log`: log through the chosen backend and derive `defmt::Format`.
//! - `slow-multiply`: avoid multiplications when building fill words.
#![no_std]

#[cfg(test)]
extern crate std;

pub mod assertion;
pub mod blit;
pub mod circle;
pub mod draw;
pub mod exports;
pub mod image;
pub mod layout;
pub mod line;
pub mod primitive;

mod log;
#[cfg(test)]
mod testing;

pub use assertion::{hook_assert, AssertHandler, AssertReporter, Violation};
pub use blit::Strategy;
pub use draw::Draw;
pub use exports::{Exports, Features};
pub use image::{
    Alignment, ColorRange, Colorspace, FixedImage, ImageBuf, ImageHeader, ImageRef, ImageView,
    PixelFormat, Raster, RasterMut,
};
pub use layout::{LayoutId, PixelLayout, Word, X1, X1Lsb, X2, X2Lsb, X4, X4Lsb};
