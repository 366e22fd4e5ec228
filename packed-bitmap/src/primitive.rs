//! Points, axis-aligned lines and rectangles.
//!
//! Spans are written a word at a time: a partial head word, zero or more whole words set to the
//! fill word, and a partial tail word. A span inside a single word collapses to one masked write.
//!
//! Public routines validate their arguments (see [crate::assertion]) and then clip against the
//! image bounds, so shapes that are partially or fully outside the image are legal.
use crate::{
    assertion::{check, check_color, check_coord},
    image::{Raster, RasterMut},
    layout::{
        fill_word, head_mask, merge, pixel_mask, pixel_slot, pixel_to_bit_offset,
        pixel_to_word_index, read_slot, span_mask, tail_mask, PixelLayout, Word,
    },
};

/// Sets every pixel of the image to `color`.
pub fn clear<L, I>(image: &mut I, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_color!(L, color);
    image.words_mut().fill(fill_word::<L>(color));
}

/// Reads the color of the pixel at (`x`, `y`), which must be inside the image.
pub fn get_pixel<L, I>(image: &I, x: i32, y: i32) -> u32
where
    L: PixelLayout,
    I: Raster<Layout = L> + ?Sized,
{
    check!(
        0 <= x && x < image.width() as i32,
        "ERROR: x out of image",
        0
    );
    check!(
        0 <= y && y < image.height() as i32,
        "ERROR: y out of image",
        0
    );
    read_pixel(image, x, y)
}

/// Sets the pixel at (`x`, `y`). Pixels outside the image are skipped.
pub fn draw_point<L, I>(image: &mut I, x: i32, y: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_coord!(x, y);
    check_color!(L, color);
    put_pixel_clipped(image, x, y, color);
}

/// Draws the pixels `x1..=x2` of row `y`. The endpoints may be given in either order.
pub fn draw_hline<L, I>(image: &mut I, x1: i32, x2: i32, y: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_coord!(x1, x2, y);
    check_color!(L, color);
    hline_clipped(image, x1, x2, y, color);
}

/// Draws the pixels `y1..=y2` of column `x`. The endpoints may be given in either order.
pub fn draw_vline<L, I>(image: &mut I, x: i32, y1: i32, y2: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_coord!(x, y1, y2);
    check_color!(L, color);
    vline_clipped(image, x, y1, y2, color);
}

/// Same result as [draw_vline], computing each row's word index from scratch.
///
/// Kept as the reference for the stride-stepping version.
pub fn draw_vline_indexed<L, I>(image: &mut I, x: i32, y1: i32, y2: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_coord!(x, y1, y2);
    check_color!(L, color);
    let Some((x, top, bottom)) = clip_column(image, x, y1, y2) else {
        return;
    };

    let words_per_row = image.words_per_row();
    let column = pixel_to_word_index::<L>(x);
    let mask = pixel_mask::<L>(x);
    let value = fill_word::<L>(color);
    let words = image.words_mut();
    for y in top..=bottom {
        let index = y * words_per_row + column;
        words[index] = merge(words[index], value, mask);
    }
}

/// Draws the outline of the `width` x `height` rectangle whose top-left corner is (`x`, `y`).
pub fn draw_rect<L, I>(image: &mut I, x: i32, y: i32, width: i32, height: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_coord!(x, y);
    check!(width >= 0, "ERROR: width < 0");
    check!(height >= 0, "ERROR: height < 0");
    check_color!(L, color);
    if width == 0 || height == 0 {
        return;
    }
    let (right, bottom) = (x.saturating_add(width - 1), y.saturating_add(height - 1));
    outline_clipped(image, x, y, right, bottom, color);
}

/// Draws the outline of the rectangle with inclusive corners (`x1`, `y1`) and (`x2`, `y2`).
pub fn draw_rect_coord<L, I>(image: &mut I, x1: i32, y1: i32, x2: i32, y2: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_coord!(x1, y1, x2, y2);
    check_color!(L, color);
    outline_clipped(image, x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2), color);
}

/// Fills the `width` x `height` rectangle whose top-left corner is (`x`, `y`).
pub fn fill_rect<L, I>(image: &mut I, x: i32, y: i32, width: i32, height: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_coord!(x, y);
    check!(width >= 0, "ERROR: width < 0");
    check!(height >= 0, "ERROR: height < 0");
    check_color!(L, color);
    if width == 0 || height == 0 {
        return;
    }
    let (right, bottom) = (x.saturating_add(width - 1), y.saturating_add(height - 1));
    fill_rect_clipped(image, x, y, right, bottom, color);
}

/// Fills the rectangle with inclusive corners (`x1`, `y1`) and (`x2`, `y2`).
pub fn fill_rect_coord<L, I>(image: &mut I, x1: i32, y1: i32, x2: i32, y2: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    check_coord!(x1, y1, x2, y2);
    check_color!(L, color);
    fill_rect_clipped(image, x1, y1, x2, y2, color);
}

#[inline]
pub(crate) fn contains<I: Raster + ?Sized>(image: &I, x: i32, y: i32) -> bool {
    0 <= x && x < image.width() as i32 && 0 <= y && y < image.height() as i32
}

/// Reads a pixel without validating the coordinates.
#[inline]
pub(crate) fn read_pixel<L, I>(image: &I, x: i32, y: i32) -> u32
where
    L: PixelLayout,
    I: Raster<Layout = L> + ?Sized,
{
    let x = x as u32;
    let index = y as usize * image.words_per_row() + pixel_to_word_index::<L>(x);
    read_slot::<L>(image.words()[index], x)
}

#[inline]
pub(crate) fn put_pixel_clipped<L, I>(image: &mut I, x: i32, y: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    if contains(image, x, y) {
        put_pixel(image, x, y, color);
    }
}

/// Writes a pixel that is known to be inside the image.
#[inline]
pub(crate) fn put_pixel<L, I>(image: &mut I, x: i32, y: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    let x = x as u32;
    let index = y as usize * image.words_per_row() + pixel_to_word_index::<L>(x);
    let words = image.words_mut();
    words[index] = merge(
        words[index],
        color << pixel_to_bit_offset::<L>(x),
        pixel_mask::<L>(x),
    );
}

/// Writes `fill` into the pixels `first..=last` of the row whose first word is `row`.
#[inline]
pub(crate) fn fill_span<L: PixelLayout>(
    words: &mut [Word],
    row: usize,
    first: u32,
    last: u32,
    fill: Word,
) {
    let head = row + pixel_to_word_index::<L>(first);
    let tail = row + pixel_to_word_index::<L>(last);
    let (first_slot, last_slot) = (pixel_slot::<L>(first), pixel_slot::<L>(last));

    if head == tail {
        words[head] = merge(words[head], fill, span_mask::<L>(first_slot, last_slot));
        return;
    }

    words[head] = merge(words[head], fill, head_mask::<L>(first_slot));
    words[head + 1..tail].fill(fill);
    words[tail] = merge(words[tail], fill, tail_mask::<L>(last_slot));
}

pub(crate) fn hline_clipped<L, I>(image: &mut I, x1: i32, x2: i32, y: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    if y < 0 || y >= image.height() as i32 {
        return;
    }
    let left = x1.min(x2).max(0);
    let right = x1.max(x2).min(image.width() as i32 - 1);
    if left > right {
        return;
    }

    let row = y as usize * image.words_per_row();
    fill_span::<L>(
        image.words_mut(),
        row,
        left as u32,
        right as u32,
        fill_word::<L>(color),
    );
}

/// Clips a column against the image, returning `(x, top, bottom)` with `top <= bottom`.
fn clip_column<I: Raster + ?Sized>(
    image: &I,
    x: i32,
    y1: i32,
    y2: i32,
) -> Option<(u32, usize, usize)> {
    if x < 0 || x >= image.width() as i32 {
        return None;
    }
    let top = y1.min(y2).max(0);
    let bottom = y1.max(y2).min(image.height() as i32 - 1);
    if top > bottom {
        return None;
    }
    Some((x as u32, top as usize, bottom as usize))
}

pub(crate) fn vline_clipped<L, I>(image: &mut I, x: i32, y1: i32, y2: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    let Some((x, top, bottom)) = clip_column(image, x, y1, y2) else {
        return;
    };

    let words_per_row = image.words_per_row();
    let first = top * words_per_row + pixel_to_word_index::<L>(x);
    let mask = pixel_mask::<L>(x);
    let value = fill_word::<L>(color);
    for word in image.words_mut()[first..]
        .iter_mut()
        .step_by(words_per_row)
        .take(bottom - top + 1)
    {
        *word = merge(*word, value, mask);
    }
}

/// Outline of an ordered rectangle, each pixel written once.
fn outline_clipped<L, I>(image: &mut I, left: i32, top: i32, right: i32, bottom: i32, color: u32)
where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    hline_clipped(image, left, right, top, color);
    if bottom != top {
        hline_clipped(image, left, right, bottom, color);
    }
    if bottom.saturating_sub(top) > 1 {
        vline_clipped(image, left, top + 1, bottom - 1, color);
        if right != left {
            vline_clipped(image, right, top + 1, bottom - 1, color);
        }
    }
}

/// Fills the rectangle with inclusive corners given in any order, clipped to the image.
pub(crate) fn fill_rect_clipped<L, I>(
    image: &mut I,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    color: u32,
) where
    L: PixelLayout,
    I: RasterMut<Layout = L> + ?Sized,
{
    let left = x1.min(x2).max(0);
    let right = x1.max(x2).min(image.width() as i32 - 1);
    let top = y1.min(y2).max(0);
    let bottom = y1.max(y2).min(image.height() as i32 - 1);
    if left > right || top > bottom {
        return;
    }

    let words_per_row = image.words_per_row();
    let fill = fill_word::<L>(color);
    let words = image.words_mut();
    for y in top as usize..=bottom as usize {
        fill_span::<L>(words, y * words_per_row, left as u32, right as u32, fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageBuf;
    use crate::layout::{X1, X1Lsb, X2, X4};
    use crate::testing::{
        assert_pixels, assert_white_on, for_each_layout, recording_hook, square_image,
        take_message, white, TestImage, BLACK,
    };

    fn in_rect(x: i32, y: i32, left: i32, top: i32, right: i32, bottom: i32) -> bool {
        left <= x && x <= right && top <= y && y <= bottom
    }

    fn on_rect_edge(x: i32, y: i32, left: i32, top: i32, right: i32, bottom: i32) -> bool {
        in_rect(x, y, left, top, right, bottom)
            && (x == left || x == right || y == top || y == bottom)
    }

    fn check_draw_point<L: PixelLayout>() {
        let ppw = L::PIXELS_PER_WORD as i32;
        let mut image = TestImage::<L>::new(4 * ppw as u32, 4, BLACK);
        let (width, height) = (image.width() as i32, image.height() as i32);
        let cases = [
            (0, 0),
            (ppw / 2 - 1, 0),
            (ppw / 2, 0),
            (ppw - 2, 0),
            (ppw - 1, 0),
            (0, 1),
            (width / 2, height - 1),
            (ppw, 0),
            (width - 1, 0),
        ];
        for (x, y) in cases {
            clear(&mut image, BLACK);
            draw_point(&mut image, x, y, white::<L>());
            assert_white_on(&image, &[(x, y)]);
        }
    }

    #[test]
    fn test_draw_point() {
        for_each_layout!(check_draw_point);
    }

    fn check_draw_point_colors_in_same_word<L: PixelLayout>() {
        let mut image = TestImage::<L>::new(4 * L::PIXELS_PER_WORD, 4, BLACK);
        let color_a = L::MAX_COLOR / 2 + 1;
        let color_b = L::MAX_COLOR;

        draw_point(&mut image, 5, 3, color_a);
        draw_point(&mut image, 3, 0, color_a);
        draw_point(&mut image, 4, 0, color_b);
        // Overwrite with a different color.
        draw_point(&mut image, 5, 3, color_b);
        assert_pixels(&image, |x, y| match (x, y) {
            (3, 0) => color_a,
            (4, 0) | (5, 3) => color_b,
            _ => BLACK,
        });
    }

    #[test]
    fn test_draw_point_colors_in_same_word() {
        for_each_layout!(check_draw_point_colors_in_same_word);
    }

    #[test]
    fn test_draw_point_off_image_is_skipped() {
        let mut image = ImageBuf::<X1, 4>::new(32, 4, 0);
        draw_point(&mut image, -1, 0, 1);
        draw_point(&mut image, 32, 0, 1);
        draw_point(&mut image, 0, 4, 1);
        assert_eq!(image.words(), &[0; 4]);
    }

    fn check_clear_with_each_color<L: PixelLayout>() {
        let mut image = TestImage::<L>::new(5, 3, BLACK);
        for color in 0..=L::MAX_COLOR {
            clear(&mut image, color);
            assert_pixels(&image, |_, _| color);
        }
    }

    #[test]
    fn test_clear_with_each_color() {
        for_each_layout!(check_clear_with_each_color);
    }

    fn check_draw_hline<L: PixelLayout>() {
        let mut image = square_image::<L>();
        let ppw = L::PIXELS_PER_WORD as i32;
        let right = image.width() as i32 - 1;
        let bottom = image.height() as i32 - 1;
        let cases = [
            // basic
            (0, 7, 1),
            (14, 17, 6),
            (11, 23, 2),
            // degenerate
            (0, 0, 0),
            (3, 3, 5),
            (right, right, bottom),
            // full width and bottom row
            (0, right, 5),
            (0, right, bottom),
            // word aligned and partial single word
            (0, ppw - 1, 6),
            (5, 10, 2),
            (0, ppw / 4 - 1, 2),
            (ppw / 2, ppw * 3 / 4 - 1, 2),
            // crossing word boundaries
            (ppw - 1, ppw, 2),
            (10, 20, 3),
            (ppw / 2, 3 * ppw + 1, 7),
        ];
        for (x1, x2, y) in cases {
            clear(&mut image, BLACK);
            draw_hline(&mut image, x1, x2, y, white::<L>());
            assert_pixels(&image, |x, py| {
                if py == y && x1 <= x && x <= x2 {
                    white::<L>()
                } else {
                    BLACK
                }
            });
        }
    }

    #[test]
    fn test_draw_hline() {
        for_each_layout!(check_draw_hline);
    }

    fn check_draw_hline_single_row_and_column<L: PixelLayout>() {
        let mut column = TestImage::<L>::new(1, 8, BLACK);
        draw_hline(&mut column, 0, 0, 3, white::<L>());
        assert_white_on(&column, &[(0, 3)]);

        let mut row = TestImage::<L>::new(8, 1, BLACK);
        draw_hline(&mut row, 2, 5, 0, white::<L>());
        assert_white_on(&row, &[(2, 0), (3, 0), (4, 0), (5, 0)]);
    }

    #[test]
    fn test_draw_hline_single_row_and_column() {
        for_each_layout!(check_draw_hline_single_row_and_column);
    }

    fn check_draw_hline_reversed_and_clipped<L: PixelLayout>() {
        let mut image = square_image::<L>();
        let right = image.width() as i32 - 1;

        draw_hline(&mut image, 9, 4, 1, white::<L>());
        draw_hline(&mut image, -5, 2, 2, white::<L>());
        draw_hline(&mut image, right - 2, right + 7, 3, white::<L>());
        draw_hline(&mut image, 0, 5, -1, white::<L>());
        draw_hline(&mut image, -20, -10, 4, white::<L>());
        assert_pixels(&image, |x, y| {
            let on = (y == 1 && (4..=9).contains(&x))
                || (y == 2 && x <= 2)
                || (y == 3 && x >= right - 2);
            if on {
                white::<L>()
            } else {
                BLACK
            }
        });
    }

    #[test]
    fn test_draw_hline_reversed_and_clipped() {
        for_each_layout!(check_draw_hline_reversed_and_clipped);
    }

    #[test]
    fn test_draw_hline_across_word_boundary() {
        let mut image = ImageBuf::<X1, 32>::new(128, 8, 0);
        draw_hline(&mut image, 30, 37, 6, 1);
        assert_pixels(&image, |x, y| (y == 6 && (30..=37).contains(&x)) as u32);

        #[rustfmt::skip]
        let expected_row: [u32; 4] = [
            0x0000_0003, 0xFC00_0000, 0, 0,
        ];
        assert_eq!(&image.words()[24..28], &expected_row);
    }

    #[test]
    fn test_draw_hline_masks_lsb_layout() {
        let mut image = ImageBuf::<X1Lsb, 4>::new(64, 2, 0);
        draw_hline(&mut image, 30, 37, 1, 1);
        assert_eq!(image.words(), &[0, 0, 0xC000_0000, 0x0000_003F]);
    }

    #[test]
    fn test_draw_hline_is_idempotent() {
        let mut once = ImageBuf::<X2, 16>::new(40, 4, 1);
        draw_hline(&mut once, 3, 35, 2, 2);
        let mut twice = once.clone();
        draw_hline(&mut twice, 3, 35, 2, 2);
        assert_eq!(once.words(), twice.words());
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_draw_hline_rejects_invalid_arguments() {
        let _recorder = recording_hook();
        let mut image = ImageBuf::<X4, 32>::new(32, 8, 0);

        draw_hline(&mut image, -2049, 0, 1, 1);
        assert_eq!(take_message(), Some("ERROR: x1 < -2^11"));
        draw_hline(&mut image, 0, 2048, 1, 1);
        assert_eq!(take_message(), Some("ERROR: x2 > 2^11 - 1"));
        draw_hline(&mut image, 0, 1, 2048, 1);
        assert_eq!(take_message(), Some("ERROR: y > 2^11 - 1"));
        draw_hline(&mut image, 0, 1, 1, 16);
        assert_eq!(take_message(), Some("ERROR: color > 2^bpp - 1"));

        // Nothing was drawn.
        assert!(image.words().iter().all(|word| *word == 0));
    }

    fn check_draw_vline<L: PixelLayout>() {
        let mut image = square_image::<L>();
        let ppw = L::PIXELS_PER_WORD as i32;
        let right = image.width() as i32 - 1;
        let bottom = image.height() as i32 - 1;
        let cases = [
            // basic
            (2, 0, 2),
            (17, 2, 4),
            (13, 1, 6),
            // degenerate
            (0, 0, 0),
            (4, 3, 3),
            (right, bottom, bottom),
            (10, 9, 1),
            // full height and edges
            (5, 0, bottom),
            (31, 0, 7),
            (right, 0, 7),
            // masks
            (ppw / 4, 0, 3),
            (ppw * 3 / 4, 0, 3),
            (ppw - 1, 0, 3),
            // clipped
            (10, -5, 5),
            (10, bottom - 5, bottom + 5),
            (10, -10, -5),
            (10, bottom + 5, bottom + 10),
            (-3, 0, 4),
        ];
        for (x, y1, y2) in cases {
            let (top, low) = (y1.min(y2), y1.max(y2));
            let expected = |px: i32, py: i32| {
                if px == x && top <= py && py <= low {
                    white::<L>()
                } else {
                    BLACK
                }
            };

            clear(&mut image, BLACK);
            draw_vline(&mut image, x, y1, y2, white::<L>());
            assert_pixels(&image, expected);

            clear(&mut image, BLACK);
            draw_vline_indexed(&mut image, x, y1, y2, white::<L>());
            assert_pixels(&image, expected);
        }
    }

    #[test]
    fn test_draw_vline() {
        for_each_layout!(check_draw_vline);
    }

    fn check_draw_vline_single_row_and_column<L: PixelLayout>() {
        let mut column = TestImage::<L>::new(1, 8, BLACK);
        draw_vline(&mut column, 0, 2, 5, white::<L>());
        assert_white_on(&column, &[(0, 2), (0, 3), (0, 4), (0, 5)]);

        let mut row = TestImage::<L>::new(8, 1, BLACK);
        draw_vline(&mut row, 6, 0, 0, white::<L>());
        assert_white_on(&row, &[(6, 0)]);
    }

    #[test]
    fn test_draw_vline_single_row_and_column() {
        for_each_layout!(check_draw_vline_single_row_and_column);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_draw_vline_rejects_invalid_arguments() {
        let _recorder = recording_hook();
        let mut image = ImageBuf::<X1, 32>::new(128, 8, 0);

        draw_vline(&mut image, -2049, 0, 10, 1);
        assert_eq!(take_message(), Some("ERROR: x < -2^11"));
        draw_vline(&mut image, 2048, 0, 10, 1);
        assert_eq!(take_message(), Some("ERROR: x > 2^11 - 1"));
        draw_vline(&mut image, 1, -2049, 10, 1);
        assert_eq!(take_message(), Some("ERROR: y1 < -2^11"));
        draw_vline(&mut image, 1, 10, 2048, 1);
        assert_eq!(take_message(), Some("ERROR: y2 > 2^11 - 1"));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "ERROR: y2 > 2^11 - 1")]
    fn test_draw_vline_out_of_range_panics_by_default() {
        let _lock = crate::testing::lock_handler();
        let mut image = ImageBuf::<X1, 32>::new(128, 8, 0);
        draw_vline(&mut image, 1, 10, 2048, 1);
    }

    fn check_fill_rect<L: PixelLayout>() {
        let mut image = square_image::<L>();
        let (width, height) = (image.width() as i32, image.height() as i32);
        let cases = [
            (0, 0, 4, 4),
            (5, 2, 3, 2),
            (7, 5, 1, 1),
            (28, 28, 4, 4),
            (2, 3, 5, 1),
            (10, 5, 1, 6),
            (0, 0, width, height),
            (-3, -2, 6, 5),
            (width - 2, height - 3, 10, 10),
        ];
        for (x, y, w, h) in cases {
            let expected = |px, py| {
                if in_rect(px, py, x, y, x + w - 1, y + h - 1) {
                    white::<L>()
                } else {
                    BLACK
                }
            };

            clear(&mut image, BLACK);
            fill_rect(&mut image, x, y, w, h, white::<L>());
            assert_pixels(&image, expected);

            clear(&mut image, BLACK);
            fill_rect_coord(&mut image, x + w - 1, y + h - 1, x, y, white::<L>());
            assert_pixels(&image, expected);
        }
    }

    #[test]
    fn test_fill_rect() {
        for_each_layout!(check_fill_rect);
    }

    fn check_fill_rect_single_row_and_column<L: PixelLayout>() {
        let mut column = TestImage::<L>::new(1, 8, BLACK);
        fill_rect(&mut column, 0, 1, 1, 3, white::<L>());
        assert_white_on(&column, &[(0, 1), (0, 2), (0, 3)]);

        let mut row = TestImage::<L>::new(8, 1, BLACK);
        fill_rect(&mut row, 3, 0, 3, 1, white::<L>());
        assert_white_on(&row, &[(3, 0), (4, 0), (5, 0)]);
    }

    #[test]
    fn test_fill_rect_single_row_and_column() {
        for_each_layout!(check_fill_rect_single_row_and_column);
    }

    #[test]
    fn test_fill_rect_zero_size_is_noop() {
        let mut image = ImageBuf::<X1, 4>::new(32, 4, 0);
        fill_rect(&mut image, 3, 1, 0, 2, 1);
        fill_rect(&mut image, 3, 1, 2, 0, 1);
        draw_rect(&mut image, 3, 1, 0, 2, 1);
        assert_eq!(image.words(), &[0; 4]);
    }

    fn check_rect_larger_than_image<L: PixelLayout>() {
        let mut image = TestImage::<L>::new(64, 8, BLACK);
        let (right, bottom) = (63, 7);

        fill_rect(&mut image, 10, 2, i32::MAX - 5, i32::MAX, white::<L>());
        assert_pixels(&image, |x, y| {
            if in_rect(x, y, 10, 2, right, bottom) {
                white::<L>()
            } else {
                BLACK
            }
        });

        clear(&mut image, BLACK);
        draw_rect(&mut image, -2048, 3, i32::MAX, i32::MAX, white::<L>());
        assert_pixels(&image, |_, y| if y == 3 { white::<L>() } else { BLACK });

        clear(&mut image, BLACK);
        draw_rect(&mut image, 5, -2048, i32::MAX, i32::MAX, white::<L>());
        assert_pixels(&image, |x, _| if x == 5 { white::<L>() } else { BLACK });
    }

    #[test]
    fn test_rect_larger_than_image() {
        for_each_layout!(check_rect_larger_than_image);
    }

    fn check_draw_rect<L: PixelLayout>() {
        let mut image = square_image::<L>();
        let (width, height) = (image.width() as i32, image.height() as i32);
        let cases = [
            (0, 0, 3, 3),
            (5, 2, 7, 3),
            (7, 5, 7, 5),
            (28, 28, 31, 31),
            (2, 3, 6, 3),
            (10, 5, 10, 10),
            (0, 0, width - 1, height - 1),
            (-2, 4, 5, height + 3),
        ];
        for (x1, y1, x2, y2) in cases {
            let expected = |px, py| {
                if on_rect_edge(px, py, x1, y1, x2, y2) {
                    white::<L>()
                } else {
                    BLACK
                }
            };

            clear(&mut image, BLACK);
            draw_rect_coord(&mut image, x1, y1, x2, y2, white::<L>());
            assert_pixels(&image, expected);

            clear(&mut image, BLACK);
            draw_rect_coord(&mut image, x2, y2, x1, y1, white::<L>());
            assert_pixels(&image, expected);

            clear(&mut image, BLACK);
            draw_rect(&mut image, x1, y1, x2 - x1 + 1, y2 - y1 + 1, white::<L>());
            assert_pixels(&image, expected);
        }
    }

    #[test]
    fn test_draw_rect() {
        for_each_layout!(check_draw_rect);
    }

    fn check_draw_rect_single_row_and_column<L: PixelLayout>() {
        let mut column = TestImage::<L>::new(1, 8, BLACK);
        draw_rect_coord(&mut column, 0, 1, 0, 3, white::<L>());
        assert_white_on(&column, &[(0, 1), (0, 2), (0, 3)]);

        let mut row = TestImage::<L>::new(8, 1, BLACK);
        draw_rect_coord(&mut row, 3, 0, 5, 0, white::<L>());
        assert_white_on(&row, &[(3, 0), (4, 0), (5, 0)]);
    }

    #[test]
    fn test_draw_rect_single_row_and_column() {
        for_each_layout!(check_draw_rect_single_row_and_column);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_rect_rejects_negative_size() {
        let _recorder = recording_hook();
        let mut image = ImageBuf::<X1, 4>::new(32, 4, 0);
        fill_rect(&mut image, 0, 0, -1, 2, 1);
        assert_eq!(take_message(), Some("ERROR: width < 0"));
        draw_rect(&mut image, 0, 0, 2, -1, 1);
        assert_eq!(take_message(), Some("ERROR: height < 0"));
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_get_pixel_rejects_outside_image() {
        let _recorder = recording_hook();
        let image = ImageBuf::<X1, 4>::new(32, 4, 1);
        assert_eq!(get_pixel(&image, 32, 0), 0);
        assert_eq!(take_message(), Some("ERROR: x out of image"));
        assert_eq!(get_pixel(&image, 0, -1), 0);
        assert_eq!(take_message(), Some("ERROR: y out of image"));
        assert_eq!(get_pixel(&image, 31, 3), 1);
        assert_eq!(take_message(), None);
    }
}
