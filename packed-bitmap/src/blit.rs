//! Block copies between images of the same layout.
//!
//! A copy runs row by row. Each row is copied with one of three [Strategy]s:
//!
//! - [Strategy::Pixel] reads and writes one pixel at a time.
//! - [Strategy::Aligned] applies when source and destination start at the same slot within a word.
//!   Interior words are copied whole, the first and last word are merged through masks.
//! - [Strategy::Shifted] handles every other case. Each destination word is assembled from the two
//!   source words it straddles, then merged like the aligned case.
//!
//! [blit] copies between two images. Copies inside one image go through [blit_within], which
//! orders rows and words so no source pixel is overwritten before it has been read.
use crate::{
    assertion::check,
    image::{Raster, RasterMut},
    layout::{
        head_mask, merge, pixel_mask, pixel_slot, pixel_to_bit_offset, pixel_to_word_index,
        read_slot, shift_toward_first, shift_toward_last, span_mask, tail_mask, PixelLayout, Word,
    },
    log::trace,
};

/// How each row of a copy is transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Strategy {
    /// One pixel at a time.
    Pixel,
    /// Whole words, for source and destination in the same phase.
    Aligned,
    /// Destination words assembled from two shifted source words.
    Shifted,
}

/// The strategy [blit] and [blit_within] use for a copy from column `sx` to column `dx`.
pub fn select_strategy<L: PixelLayout>(dx: u32, sx: u32, width: u32) -> Strategy {
    if width == 1 {
        Strategy::Pixel
    } else if pixel_slot::<L>(dx) == pixel_slot::<L>(sx) {
        Strategy::Aligned
    } else {
        Strategy::Shifted
    }
}

macro_rules! check_bounds {
    ($dst:expr, $src:expr, $dx:expr, $dy:expr, $sx:expr, $sy:expr, $width:expr, $height:expr) => {
        check!(
            $dx.saturating_add($width) <= $dst.width(),
            "ERROR: dx + width > dst width"
        );
        check!(
            $dy.saturating_add($height) <= $dst.height(),
            "ERROR: dy + height > dst height"
        );
        check!(
            $sx.saturating_add($width) <= $src.width(),
            "ERROR: sx + width > src width"
        );
        check!(
            $sy.saturating_add($height) <= $src.height(),
            "ERROR: sy + height > src height"
        );
    };
}

macro_rules! check_strategy {
    ($layout:ty, $strategy:expr, $dx:expr, $sx:expr) => {
        check!(
            $strategy != Strategy::Aligned
                || pixel_slot::<$layout>($dx) == pixel_slot::<$layout>($sx),
            "ERROR: aligned strategy needs matching phase"
        );
    };
}

/// Copies the `width` x `height` block at (`sx`, `sy`) of `src` to (`dx`, `dy`) of `dst`.
///
/// Both blocks must lie inside their images. An empty block is a no-op.
#[allow(clippy::too_many_arguments)]
pub fn blit<L, D, S>(
    dst: &mut D,
    dx: u32,
    dy: u32,
    src: &S,
    sx: u32,
    sy: u32,
    width: u32,
    height: u32,
) where
    L: PixelLayout,
    D: RasterMut<Layout = L> + ?Sized,
    S: Raster<Layout = L> + ?Sized,
{
    let strategy = select_strategy::<L>(dx, sx, width);
    trace!("blit: {:?} strategy", strategy);
    blit_with(strategy, dst, dx, dy, src, sx, sy, width, height);
}

/// [blit] with a caller-chosen [Strategy].
///
/// [Strategy::Aligned] requires `dx` and `sx` to start at the same slot within a word.
#[allow(clippy::too_many_arguments)]
pub fn blit_with<L, D, S>(
    strategy: Strategy,
    dst: &mut D,
    dx: u32,
    dy: u32,
    src: &S,
    sx: u32,
    sy: u32,
    width: u32,
    height: u32,
) where
    L: PixelLayout,
    D: RasterMut<Layout = L> + ?Sized,
    S: Raster<Layout = L> + ?Sized,
{
    check_bounds!(dst, src, dx, dy, sx, sy, width, height);
    check_strategy!(L, strategy, dx, sx);
    if width == 0 || height == 0 {
        return;
    }

    let region = Region {
        dx,
        dy,
        sx,
        sy,
        width,
        height,
        dst_words_per_row: dst.words_per_row(),
        src_words_per_row: src.words_per_row(),
    };
    let mut planes = Split {
        dst: dst.words_mut(),
        src: src.words(),
    };
    copy_region::<L, _>(&mut planes, &region, strategy);
}

/// Copies the `width` x `height` block at (`sx`, `sy`) of `image` to (`dx`, `dy`) of the same
/// image. The blocks may overlap.
#[allow(clippy::too_many_arguments)]
pub fn blit_within<L, I>(
    image: &mut I,
    dx: u32,
    dy: u32,
    sx: u32,
    sy: u32,
    width: u32,
    height: u32,
) where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    let strategy = select_strategy::<L>(dx, sx, width);
    trace!("blit: {:?} strategy", strategy);
    blit_within_with(strategy, image, dx, dy, sx, sy, width, height);
}

/// [blit_within] with a caller-chosen [Strategy].
#[allow(clippy::too_many_arguments)]
pub fn blit_within_with<L, I>(
    strategy: Strategy,
    image: &mut I,
    dx: u32,
    dy: u32,
    sx: u32,
    sy: u32,
    width: u32,
    height: u32,
) where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_bounds!(image, image, dx, dy, sx, sy, width, height);
    check_strategy!(L, strategy, dx, sx);
    if width == 0 || height == 0 {
        return;
    }

    let words_per_row = image.words_per_row();
    let region = Region {
        dx,
        dy,
        sx,
        sy,
        width,
        height,
        dst_words_per_row: words_per_row,
        src_words_per_row: words_per_row,
    };
    let mut planes = InPlace {
        words: image.words_mut(),
    };
    copy_region::<L, _>(&mut planes, &region, strategy);
}

/// Word access for the two sides of a copy.
trait Planes {
    fn src_word(&self, index: usize) -> Word;

    fn dst_word(&self, index: usize) -> Word;

    fn set_dst_word(&mut self, index: usize, word: Word);

    /// Copies `len` whole words. Overlapping ranges are copied as if through a temporary.
    fn copy_words(&mut self, src: usize, dst: usize, len: usize);
}

/// Source and destination in different buffers.
struct Split<'a> {
    dst: &'a mut [Word],
    src: &'a [Word],
}

impl Planes for Split<'_> {
    fn src_word(&self, index: usize) -> Word {
        self.src[index]
    }

    fn dst_word(&self, index: usize) -> Word {
        self.dst[index]
    }

    fn set_dst_word(&mut self, index: usize, word: Word) {
        self.dst[index] = word;
    }

    fn copy_words(&mut self, src: usize, dst: usize, len: usize) {
        self.dst[dst..dst + len].copy_from_slice(&self.src[src..src + len]);
    }
}

/// Source and destination in one buffer.
struct InPlace<'a> {
    words: &'a mut [Word],
}

impl Planes for InPlace<'_> {
    fn src_word(&self, index: usize) -> Word {
        self.words[index]
    }

    fn dst_word(&self, index: usize) -> Word {
        self.words[index]
    }

    fn set_dst_word(&mut self, index: usize, word: Word) {
        self.words[index] = word;
    }

    fn copy_words(&mut self, src: usize, dst: usize, len: usize) {
        self.words.copy_within(src..src + len, dst);
    }
}

/// A validated, non-empty copy.
#[derive(Debug, Clone, Copy)]
struct Region {
    dx: u32,
    dy: u32,
    sx: u32,
    sy: u32,
    width: u32,
    height: u32,
    dst_words_per_row: usize,
    src_words_per_row: usize,
}

impl Region {
    /// Moving down: copy the bottom row first.
    fn rows_reversed(&self) -> bool {
        self.dy > self.sy
    }

    /// Moving right within the same rows: copy the rightmost pixels first.
    fn columns_reversed(&self) -> bool {
        self.dy == self.sy && self.dx > self.sx
    }

    fn dst_last(&self) -> u32 {
        self.dx + self.width - 1
    }

    fn src_last(&self) -> u32 {
        self.sx + self.width - 1
    }
}

/// Copies one row. Takes the word index of the first word of the source and destination rows.
type RowCopy<P> = fn(&mut P, &Region, usize, usize, bool);

fn copy_region<L: PixelLayout, P: Planes>(planes: &mut P, region: &Region, strategy: Strategy) {
    let copy_row: RowCopy<P> = match strategy {
        Strategy::Pixel => copy_pixels::<L, P>,
        Strategy::Aligned => copy_aligned::<L, P>,
        Strategy::Shifted => copy_shifted::<L, P>,
    };
    let reversed = region.columns_reversed();
    let mut row = |y: u32| {
        let src_row = (region.sy + y) as usize * region.src_words_per_row;
        let dst_row = (region.dy + y) as usize * region.dst_words_per_row;
        copy_row(planes, region, src_row, dst_row, reversed);
    };

    if region.rows_reversed() {
        (0..region.height).rev().for_each(&mut row);
    } else {
        (0..region.height).for_each(&mut row);
    }
}

fn copy_pixels<L: PixelLayout, P: Planes>(
    planes: &mut P,
    region: &Region,
    src_row: usize,
    dst_row: usize,
    reversed: bool,
) {
    let mut copy = |i: u32| {
        let (sx, dx) = (region.sx + i, region.dx + i);
        let color = read_slot::<L>(planes.src_word(src_row + pixel_to_word_index::<L>(sx)), sx);
        let index = dst_row + pixel_to_word_index::<L>(dx);
        let word = merge(
            planes.dst_word(index),
            color << pixel_to_bit_offset::<L>(dx),
            pixel_mask::<L>(dx),
        );
        planes.set_dst_word(index, word);
    };

    if reversed {
        (0..region.width).rev().for_each(&mut copy);
    } else {
        (0..region.width).for_each(&mut copy);
    }
}

#[inline]
fn copy_masked<P: Planes>(planes: &mut P, src: usize, dst: usize, mask: Word) {
    let word = merge(planes.dst_word(dst), planes.src_word(src), mask);
    planes.set_dst_word(dst, word);
}

fn copy_aligned<L: PixelLayout, P: Planes>(
    planes: &mut P,
    region: &Region,
    src_row: usize,
    dst_row: usize,
    reversed: bool,
) {
    let last = region.dst_last();
    let src = src_row + pixel_to_word_index::<L>(region.sx);
    let dst = dst_row + pixel_to_word_index::<L>(region.dx);
    let tail = pixel_to_word_index::<L>(last) - pixel_to_word_index::<L>(region.dx);
    let (first_slot, last_slot) = (pixel_slot::<L>(region.dx), pixel_slot::<L>(last));

    if tail == 0 {
        copy_masked(planes, src, dst, span_mask::<L>(first_slot, last_slot));
        return;
    }

    // Moving right, the head word of the destination may be a body word of the source.
    if reversed {
        copy_masked(planes, src + tail, dst + tail, tail_mask::<L>(last_slot));
        planes.copy_words(src + 1, dst + 1, tail - 1);
        copy_masked(planes, src, dst, head_mask::<L>(first_slot));
    } else {
        copy_masked(planes, src, dst, head_mask::<L>(first_slot));
        planes.copy_words(src + 1, dst + 1, tail - 1);
        copy_masked(planes, src + tail, dst + tail, tail_mask::<L>(last_slot));
    }
}

fn copy_shifted<L: PixelLayout, P: Planes>(
    planes: &mut P,
    region: &Region,
    src_row: usize,
    dst_row: usize,
    reversed: bool,
) {
    let ppw = L::PIXELS_PER_WORD as i64;
    let last = region.dst_last();
    let (first_word, last_word) = (
        pixel_to_word_index::<L>(region.dx),
        pixel_to_word_index::<L>(last),
    );
    let (first_slot, last_slot) = (pixel_slot::<L>(region.dx), pixel_slot::<L>(last));
    let src_words = pixel_to_word_index::<L>(region.sx) as i64
        ..=pixel_to_word_index::<L>(region.src_last()) as i64;
    let shift = region.sx as i64 - region.dx as i64;

    // Words outside the source span only feed pixels that the masks discard.
    let read = |planes: &P, word: i64| {
        if src_words.contains(&word) {
            planes.src_word(src_row + word as usize)
        } else {
            0
        }
    };

    let mut copy = |index: usize| {
        let start = index as i64 * ppw + shift;
        let (word, offset) = (start.div_euclid(ppw), start.rem_euclid(ppw) as u32);
        let value = shift_toward_first::<L>(read(&*planes, word), offset)
            | shift_toward_last::<L>(read(&*planes, word + 1), L::PIXELS_PER_WORD - offset);
        let mask = match (index == first_word, index == last_word) {
            (true, true) => span_mask::<L>(first_slot, last_slot),
            (true, false) => head_mask::<L>(first_slot),
            (false, true) => tail_mask::<L>(last_slot),
            (false, false) => Word::MAX,
        };
        let dst = dst_row + index;
        planes.set_dst_word(dst, merge(planes.dst_word(dst), value, mask));
    };

    if reversed {
        (first_word..=last_word).rev().for_each(&mut copy);
    } else {
        (first_word..=last_word).for_each(&mut copy);
    }
}
