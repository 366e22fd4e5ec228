//! Image descriptors and the buffers they describe.
//!
//! Every image is a [ImageHeader] plus a slice of packed [Word]s. The drawing routines only see
//! images through the [Raster] and [RasterMut] traits, so they work the same on borrowed storage
//! ([ImageRef], [ImageView]) and on owning images ([FixedImage], [ImageBuf]).
use core::{convert::Infallible, marker::PhantomData};

use embedded_graphics::{
    image::ImageDrawable,
    prelude::{Dimensions, DrawTarget, OriginDimensions, Point, Size},
    primitives::{PointsIter, Rectangle},
    Pixel,
};
use heapless::Vec;

use crate::{
    assertion::check,
    layout::{fill_word, word_to_bytes, LayoutId, PixelLayout, Word, WORD_BITS, WORD_BYTES},
    log::debug,
    primitive,
};

/// How pixel values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// Values index into an external palette.
    Index,
    /// Values are intensities, 0 being black.
    #[default]
    Grayscale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Colorspace {
    #[default]
    Unknown,
    Srgb,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorRange {
    #[default]
    Full,
    Limited,
}

/// Alignment of each row, in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alignment {
    Align8,
    Align16,
    #[default]
    Align32,
    Align64,
    Align128,
    Align256,
    Align512,
    Align1024,
}

impl Alignment {
    pub const fn bits(self) -> u32 {
        8 << (self as u32)
    }
}

/// Describes the packed pixel data of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImageHeader {
    layout: LayoutId,
    format: PixelFormat,
    colorspace: Colorspace,
    color_range: ColorRange,
    alignment: Alignment,
    width: u16,
    height: u16,
    // Bytes per row, always a multiple of the row alignment.
    stride: u16,
}

impl ImageHeader {
    pub const WIDTH_MAX: u32 = (1 << 13) - 1;
    pub const HEIGHT_MAX: u32 = (1 << 16) - 1;

    /// A header for a `width` x `height` image with word-aligned rows.
    pub fn new<L: PixelLayout>(width: u32, height: u32) -> Self {
        Self::with_alignment::<L>(width, height, Alignment::Align32)
    }

    /// A header whose rows are padded to `alignment`, which must be at least one word.
    pub fn with_alignment<L: PixelLayout>(width: u32, height: u32, alignment: Alignment) -> Self {
        check!(
            width <= Self::WIDTH_MAX,
            "ERROR: width > 2^13 - 1",
            Self::empty::<L>()
        );
        check!(
            height <= Self::HEIGHT_MAX,
            "ERROR: height > 2^16 - 1",
            Self::empty::<L>()
        );
        check!(
            alignment.bits() >= WORD_BITS,
            "ERROR: alignment < word size",
            Self::empty::<L>()
        );

        let row_bits = alignment.bits();
        let stride = (width * L::BITS_PER_PIXEL).div_ceil(row_bits) * row_bits / 8;
        Self {
            layout: L::ID,
            format: PixelFormat::Grayscale,
            colorspace: Colorspace::Unknown,
            color_range: ColorRange::Full,
            alignment,
            width: width as u16,
            height: height as u16,
            stride: stride as u16,
        }
    }

    /// A 0x0 header.
    pub const fn empty<L: PixelLayout>() -> Self {
        Self {
            layout: L::ID,
            format: PixelFormat::Grayscale,
            colorspace: Colorspace::Unknown,
            color_range: ColorRange::Full,
            alignment: Alignment::Align32,
            width: 0,
            height: 0,
            stride: 0,
        }
    }

    pub const fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    pub const fn with_colorspace(mut self, colorspace: Colorspace) -> Self {
        self.colorspace = colorspace;
        self
    }

    pub const fn with_color_range(mut self, color_range: ColorRange) -> Self {
        self.color_range = color_range;
        self
    }

    pub const fn layout(&self) -> LayoutId {
        self.layout
    }

    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    pub const fn colorspace(&self) -> Colorspace {
        self.colorspace
    }

    pub const fn color_range(&self) -> ColorRange {
        self.color_range
    }

    pub const fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub const fn width(&self) -> u32 {
        self.width as u32
    }

    pub const fn height(&self) -> u32 {
        self.height as u32
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }

    /// Bytes per row.
    pub const fn stride(&self) -> usize {
        self.stride as usize
    }

    pub const fn words_per_row(&self) -> usize {
        self.stride as usize / WORD_BYTES
    }

    /// Words covered by the image, `stride * height / 4`.
    pub const fn word_count(&self) -> usize {
        self.words_per_row() * self.height as usize
    }
}

/// Read access to a packed image.
pub trait Raster {
    type Layout: PixelLayout;

    fn header(&self) -> &ImageHeader;

    /// The image words, exactly [ImageHeader::word_count] long.
    fn words(&self) -> &[Word];

    fn width(&self) -> u32 {
        self.header().width()
    }

    fn height(&self) -> u32 {
        self.header().height()
    }

    fn stride(&self) -> usize {
        self.header().stride()
    }

    fn words_per_row(&self) -> usize {
        self.header().words_per_row()
    }

    /// The image data in display byte order, row padding included.
    fn packed_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.words()
            .iter()
            .flat_map(|word| word_to_bytes::<Self::Layout>(*word))
    }
}

/// Write access to a packed image.
pub trait RasterMut: Raster {
    fn words_mut(&mut self) -> &mut [Word];
}

/// A read-only image over borrowed words, e.g. a sprite stored in flash.
#[derive(Debug, Clone, Copy)]
pub struct ImageRef<'a, L: PixelLayout> {
    header: ImageHeader,
    words: &'a [Word],
    layout: PhantomData<L>,
}

impl<'a, L: PixelLayout> ImageRef<'a, L> {
    /// Wraps `words`, which must hold at least `header.word_count()` words of layout `L`.
    pub fn new(header: ImageHeader, words: &'a [Word]) -> Self {
        check!(
            header.layout() == L::ID,
            "ERROR: layout mismatch",
            Self::detached(words)
        );
        check!(
            words.len() >= header.word_count(),
            "ERROR: buffer too small for stride * height",
            Self::detached(words)
        );
        Self {
            header,
            words,
            layout: PhantomData,
        }
    }

    // A 0x0 image over `words`, used when the arguments are rejected.
    #[cfg_attr(not(debug_assertions), allow(dead_code))]
    fn detached(words: &'a [Word]) -> Self {
        Self {
            header: ImageHeader::empty::<L>(),
            words,
            layout: PhantomData,
        }
    }

    /// Wraps `words` as a `width` x `height` image with word-aligned rows.
    pub fn from_words(width: u32, height: u32, words: &'a [Word]) -> Self {
        Self::new(ImageHeader::new::<L>(width, height), words)
    }
}

impl<L: PixelLayout> Raster for ImageRef<'_, L> {
    type Layout = L;

    fn header(&self) -> &ImageHeader {
        &self.header
    }

    fn words(&self) -> &[Word] {
        &self.words[..self.header.word_count()]
    }
}

/// A mutable image over borrowed words.
#[derive(Debug)]
pub struct ImageView<'a, L: PixelLayout> {
    header: ImageHeader,
    words: &'a mut [Word],
    layout: PhantomData<L>,
}

impl<'a, L: PixelLayout> ImageView<'a, L> {
    /// Wraps `words`, which must hold at least `header.word_count()` words of layout `L`.
    pub fn new(header: ImageHeader, words: &'a mut [Word]) -> Self {
        check!(
            header.layout() == L::ID,
            "ERROR: layout mismatch",
            Self::detached(words)
        );
        check!(
            words.len() >= header.word_count(),
            "ERROR: buffer too small for stride * height",
            Self::detached(words)
        );
        Self {
            header,
            words,
            layout: PhantomData,
        }
    }

    #[cfg_attr(not(debug_assertions), allow(dead_code))]
    fn detached(words: &'a mut [Word]) -> Self {
        Self {
            header: ImageHeader::empty::<L>(),
            words,
            layout: PhantomData,
        }
    }

    /// Wraps `words` as a `width` x `height` image with word-aligned rows.
    pub fn from_words(width: u32, height: u32, words: &'a mut [Word]) -> Self {
        Self::new(ImageHeader::new::<L>(width, height), words)
    }

    /// Reborrows the view as read-only.
    pub fn as_image_ref(&self) -> ImageRef<'_, L> {
        ImageRef {
            header: self.header,
            words: self.words,
            layout: PhantomData,
        }
    }
}

impl<L: PixelLayout> Raster for ImageView<'_, L> {
    type Layout = L;

    fn header(&self) -> &ImageHeader {
        &self.header
    }

    fn words(&self) -> &[Word] {
        &self.words[..self.header.word_count()]
    }
}

impl<L: PixelLayout> RasterMut for ImageView<'_, L> {
    fn words_mut(&mut self) -> &mut [Word] {
        let count = self.header.word_count();
        &mut self.words[..count]
    }
}

/// An owning image with fixed dimensions, stored inline.
///
/// `N` must equal [image_word_count](crate::layout::image_word_count) for the dimensions.
///
/// ```
/// use packed_bitmap::{image::FixedImage, layout::{image_word_count, X1}};
///
/// let image = FixedImage::<X1, { image_word_count(128, 8, 1) }>::new(128, 8, 0);
/// ```
#[derive(Debug, Clone)]
pub struct FixedImage<L: PixelLayout, const N: usize> {
    header: ImageHeader,
    words: [Word; N],
    layout: PhantomData<L>,
}

impl<L: PixelLayout, const N: usize> FixedImage<L, N> {
    /// Creates an image with every pixel set to `color`.
    pub fn new(width: u32, height: u32, color: u32) -> Self {
        let header = ImageHeader::new::<L>(width, height);
        check!(
            header.word_count() == N,
            "ERROR: word count does not match dimensions",
            Self::detached()
        );
        check!(
            color <= L::MAX_COLOR,
            "ERROR: color > 2^bpp - 1",
            Self::detached()
        );
        debug!("new {}x{} fixed image", width, height);
        Self {
            header,
            words: [fill_word::<L>(color); N],
            layout: PhantomData,
        }
    }

    #[cfg_attr(not(debug_assertions), allow(dead_code))]
    fn detached() -> Self {
        Self {
            header: ImageHeader::empty::<L>(),
            words: [0; N],
            layout: PhantomData,
        }
    }

    pub fn as_view(&mut self) -> ImageView<'_, L> {
        ImageView {
            header: self.header,
            words: &mut self.words,
            layout: PhantomData,
        }
    }

    pub fn as_image_ref(&self) -> ImageRef<'_, L> {
        ImageRef {
            header: self.header,
            words: &self.words,
            layout: PhantomData,
        }
    }
}

impl<L: PixelLayout, const N: usize> Raster for FixedImage<L, N> {
    type Layout = L;

    fn header(&self) -> &ImageHeader {
        &self.header
    }

    fn words(&self) -> &[Word] {
        &self.words[..self.header.word_count()]
    }
}

impl<L: PixelLayout, const N: usize> RasterMut for FixedImage<L, N> {
    fn words_mut(&mut self) -> &mut [Word] {
        let count = self.header.word_count();
        &mut self.words[..count]
    }
}

/// An owning image that can be resized up to `CAP` words.
#[derive(Debug, Clone)]
pub struct ImageBuf<L: PixelLayout, const CAP: usize> {
    header: ImageHeader,
    words: Vec<Word, CAP>,
    layout: PhantomData<L>,
}

impl<L: PixelLayout, const CAP: usize> ImageBuf<L, CAP> {
    /// A 0x0 image.
    pub const fn empty() -> Self {
        Self {
            header: ImageHeader::empty::<L>(),
            words: Vec::new(),
            layout: PhantomData,
        }
    }

    /// Creates an image with every pixel set to `color`.
    pub fn new(width: u32, height: u32, color: u32) -> Self {
        let mut image = Self::empty();
        image.reset(width, height, color);
        image
    }

    /// Resizes the image, recomputing its stride, and sets every pixel to `color`.
    ///
    /// An image that would not fit in `CAP` words becomes 0x0.
    pub fn reset(&mut self, width: u32, height: u32, color: u32) {
        check!(color <= L::MAX_COLOR, "ERROR: color > 2^bpp - 1");
        let header = ImageHeader::new::<L>(width, height);
        check!(
            header.word_count() <= CAP,
            "ERROR: capacity too small"
        );

        self.words.clear();
        if self
            .words
            .resize(header.word_count(), fill_word::<L>(color))
            .is_err()
        {
            self.header = ImageHeader::empty::<L>();
            return;
        }
        self.header = header;
        debug!("image reset to {}x{}, stride {}", width, height, header.stride());
    }

    pub fn as_view(&mut self) -> ImageView<'_, L> {
        ImageView {
            header: self.header,
            words: &mut self.words,
            layout: PhantomData,
        }
    }

    pub fn as_image_ref(&self) -> ImageRef<'_, L> {
        ImageRef {
            header: self.header,
            words: &self.words,
            layout: PhantomData,
        }
    }
}

impl<L: PixelLayout, const CAP: usize> Default for ImageBuf<L, CAP> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<L: PixelLayout, const CAP: usize> Raster for ImageBuf<L, CAP> {
    type Layout = L;

    fn header(&self) -> &ImageHeader {
        &self.header
    }

    fn words(&self) -> &[Word] {
        &self.words
    }
}

impl<L: PixelLayout, const CAP: usize> RasterMut for ImageBuf<L, CAP> {
    fn words_mut(&mut self) -> &mut [Word] {
        &mut self.words
    }
}

impl<L: PixelLayout> OriginDimensions for ImageRef<'_, L> {
    fn size(&self) -> Size {
        self.header.size()
    }
}

impl<L: PixelLayout> ImageDrawable for ImageRef<'_, L> {
    type Color = L::Color;

    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        self.draw_sub_image(target, &self.bounding_box())
    }

    fn draw_sub_image<D>(&self, target: &mut D, area: &Rectangle) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        let area = self.bounding_box().intersection(area);
        let colors = area
            .points()
            .map(|point| L::raw_to_color(primitive::read_pixel(self, point.x, point.y)));
        target.fill_contiguous(&Rectangle::new(Point::zero(), area.size), colors)
    }
}

// `embedded-graphics` integration for every writable image type. Out-of-bounds pixels are
// skipped, and solid fills go through the word-level span fill.
macro_rules! impl_draw_target {
    ($([$($generics:tt)*] $image:ty),+ $(,)?) => {
        $(
            impl<$($generics)*> OriginDimensions for $image {
                fn size(&self) -> Size {
                    self.header.size()
                }
            }

            impl<$($generics)*> DrawTarget for $image {
                type Color = L::Color;

                type Error = Infallible;

                fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
                where
                    I: IntoIterator<Item = Pixel<Self::Color>>,
                {
                    for Pixel(point, color) in pixels {
                        primitive::put_pixel_clipped(self, point.x, point.y, L::color_to_raw(color));
                    }
                    Ok(())
                }

                fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
                    let area = self.bounding_box().intersection(area);
                    let Some(bottom_right) = area.bottom_right() else {
                        return Ok(()); // Nothing to fill
                    };
                    primitive::fill_rect_clipped(
                        self,
                        area.top_left.x,
                        area.top_left.y,
                        bottom_right.x,
                        bottom_right.y,
                        L::color_to_raw(color),
                    );
                    Ok(())
                }

                fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
                    primitive::clear(self, L::color_to_raw(color));
                    Ok(())
                }
            }
        )+
    };
}

impl_draw_target!(
    ['a, L: PixelLayout] ImageView<'a, L>,
    [L: PixelLayout, const N: usize] FixedImage<L, N>,
    [L: PixelLayout, const CAP: usize] ImageBuf<L, CAP>,
);
