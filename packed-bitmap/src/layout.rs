//! Pixel packing layouts and the word arithmetic shared by every drawing routine.
//!
//! Pixels are packed into 32-bit [Word]s. A layout fixes the number of bits per pixel (1, 2 or 4)
//! and the order of pixels inside a word:
//!
//! - MSB-first layouts ([X1], [X2], [X4]) store the left-most pixel in the most significant bits.
//!   Words are serialized big-endian, so the first byte holds the first pixels.
//! - LSB-first layouts ([X1Lsb], [X2Lsb], [X4Lsb]) store the left-most pixel in the least
//!   significant bits. Words are serialized little-endian, so again the first byte holds the first
//!   pixels, starting from its least significant bits.
//!
//! All helpers here are pure and branch on compile-time constants only.
use embedded_graphics::pixelcolor::{BinaryColor, Gray2, Gray4, GrayColor, PixelColor};

/// The storage unit of every image.
pub type Word = u32;

/// Bits per [Word].
pub const WORD_BITS: u32 = Word::BITS;
/// Bytes per [Word].
pub const WORD_BYTES: usize = core::mem::size_of::<Word>();

/// Runtime identifier of a [PixelLayout], as stored in an image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutId {
    X1,
    X1Lsb,
    X2,
    X2Lsb,
    X4,
    X4Lsb,
}

impl LayoutId {
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            LayoutId::X1 | LayoutId::X1Lsb => 1,
            LayoutId::X2 | LayoutId::X2Lsb => 2,
            LayoutId::X4 | LayoutId::X4Lsb => 4,
        }
    }

    pub const fn is_lsb_first(self) -> bool {
        matches!(self, LayoutId::X1Lsb | LayoutId::X2Lsb | LayoutId::X4Lsb)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Compile-time description of how pixels are packed into words.
///
/// Implemented by the six marker types in this module. Every drawing routine is generic over this
/// trait, so each layout gets its own monomorphized copy with all shifts and masks constant.
pub trait PixelLayout: sealed::Sealed + Copy + Default + core::fmt::Debug + 'static {
    const ID: LayoutId;
    const LOG2_BITS_PER_PIXEL: u32;
    const BITS_PER_PIXEL: u32 = 1 << Self::LOG2_BITS_PER_PIXEL;
    /// Whether pixel 0 of a word lives in its least significant bits.
    const LSB_FIRST: bool;
    const LOG2_PIXELS_PER_WORD: u32 = WORD_BITS.trailing_zeros() - Self::LOG2_BITS_PER_PIXEL;
    const PIXELS_PER_WORD: u32 = 1 << Self::LOG2_PIXELS_PER_WORD;
    /// Mask of a single pixel in the least significant position.
    const PIXEL_MASK: Word = (1 << Self::BITS_PER_PIXEL) - 1;
    /// Largest valid color value, `2^bpp - 1`.
    const MAX_COLOR: u32 = Self::PIXEL_MASK;

    /// The `embedded-graphics` color used when drawing through `DrawTarget`.
    type Color: PixelColor;

    fn color_to_raw(color: Self::Color) -> u32;

    fn raw_to_color(raw: u32) -> Self::Color;
}

macro_rules! impl_layout {
    (
        $(#[$meta:meta])*
        $name:ident, $log2_bpp:literal, $lsb_first:literal, $color:ty,
        |$c:ident| $to_raw:expr,
        |$r:ident| $from_raw:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub struct $name;

        impl sealed::Sealed for $name {}

        impl PixelLayout for $name {
            const ID: LayoutId = LayoutId::$name;
            const LOG2_BITS_PER_PIXEL: u32 = $log2_bpp;
            const LSB_FIRST: bool = $lsb_first;

            type Color = $color;

            #[inline]
            fn color_to_raw($c: $color) -> u32 {
                $to_raw
            }

            #[inline]
            fn raw_to_color($r: u32) -> $color {
                $from_raw
            }
        }
    };
}

impl_layout!(
    /// 1 bit per pixel, first pixel in the most significant bit.
    X1, 0, false, BinaryColor,
    |c| c.is_on() as u32,
    |r| BinaryColor::from(r != 0)
);
impl_layout!(
    /// 1 bit per pixel, first pixel in the least significant bit.
    X1Lsb, 0, true, BinaryColor,
    |c| c.is_on() as u32,
    |r| BinaryColor::from(r != 0)
);
impl_layout!(
    /// 2 bits per pixel, first pixel in the most significant bits.
    X2, 1, false, Gray2,
    |c| c.luma() as u32,
    |r| Gray2::new((r & 0b11) as u8)
);
impl_layout!(
    /// 2 bits per pixel, first pixel in the least significant bits.
    X2Lsb, 1, true, Gray2,
    |c| c.luma() as u32,
    |r| Gray2::new((r & 0b11) as u8)
);
impl_layout!(
    /// 4 bits per pixel, first pixel in the most significant bits.
    X4, 2, false, Gray4,
    |c| c.luma() as u32,
    |r| Gray4::new((r & 0b1111) as u8)
);
impl_layout!(
    /// 4 bits per pixel, first pixel in the least significant bits.
    X4Lsb, 2, true, Gray4,
    |c| c.luma() as u32,
    |r| Gray4::new((r & 0b1111) as u8)
);

/// Bytes per row for an image of `width` pixels, padded to a whole number of words.
pub const fn stride_bytes(width: u32, bits_per_pixel: u32) -> usize {
    (((width * bits_per_pixel + (WORD_BITS - 1)) & !(WORD_BITS - 1)) / 8) as usize
}

/// Number of words needed to store an image of the given dimensions.
///
/// ```
/// use packed_bitmap::layout::image_word_count;
///
/// assert_eq!(image_word_count(128, 8, 1), 32);
/// assert_eq!(image_word_count(10, 3, 4), 6);
/// ```
pub const fn image_word_count(width: u32, height: u32, bits_per_pixel: u32) -> usize {
    stride_bytes(width, bits_per_pixel) / WORD_BYTES * height as usize
}

/// Index of the word holding pixel `x`, relative to the start of its row.
#[inline]
pub fn pixel_to_word_index<L: PixelLayout>(x: u32) -> usize {
    (x >> L::LOG2_PIXELS_PER_WORD) as usize
}

/// Slot of pixel `x` within its word, counting from the first pixel of the word.
#[inline]
pub fn pixel_slot<L: PixelLayout>(x: u32) -> u32 {
    x & (L::PIXELS_PER_WORD - 1)
}

/// Position of the least significant bit of pixel `x` within its word.
#[inline]
pub fn pixel_to_bit_offset<L: PixelLayout>(x: u32) -> u32 {
    let slot_bits = pixel_slot::<L>(x) << L::LOG2_BITS_PER_PIXEL;
    if L::LSB_FIRST {
        slot_bits
    } else {
        WORD_BITS - L::BITS_PER_PIXEL - slot_bits
    }
}

/// Mask covering the inclusive bit range `start_bit..=end_bit`.
#[inline]
pub const fn build_mask(start_bit: u32, end_bit: u32) -> Word {
    (Word::MAX >> (WORD_BITS - 1 - end_bit)) & (Word::MAX << start_bit)
}

/// Mask covering the pixel slots `first..=last` of a single word.
#[inline]
pub fn span_mask<L: PixelLayout>(first: u32, last: u32) -> Word {
    let low = first << L::LOG2_BITS_PER_PIXEL;
    let high = ((last + 1) << L::LOG2_BITS_PER_PIXEL) - 1;
    if L::LSB_FIRST {
        build_mask(low, high)
    } else {
        build_mask(WORD_BITS - 1 - high, WORD_BITS - 1 - low)
    }
}

/// Mask covering slot `first` up to the end of the word.
#[inline]
pub fn head_mask<L: PixelLayout>(first: u32) -> Word {
    span_mask::<L>(first, L::PIXELS_PER_WORD - 1)
}

/// Mask covering the start of the word up to and including slot `last`.
#[inline]
pub fn tail_mask<L: PixelLayout>(last: u32) -> Word {
    span_mask::<L>(0, last)
}

/// Mask covering the single pixel `x`.
#[inline]
pub fn pixel_mask<L: PixelLayout>(x: u32) -> Word {
    L::PIXEL_MASK << pixel_to_bit_offset::<L>(x)
}

/// A word with `color` replicated into every pixel slot.
#[inline]
pub fn fill_word<L: PixelLayout>(color: u32) -> Word {
    if cfg!(feature = "slow-multiply") {
        replicate_by_shift::<L>(color)
    } else {
        replicate_by_multiply::<L>(color)
    }
}

#[inline]
fn replicate_by_multiply<L: PixelLayout>(color: u32) -> Word {
    // 0xFFFFFFFF, 0x55555555 or 0x11111111.
    (color & L::PIXEL_MASK).wrapping_mul(Word::MAX / L::PIXEL_MASK)
}

#[inline]
fn replicate_by_shift<L: PixelLayout>(color: u32) -> Word {
    let mut word = color & L::PIXEL_MASK;
    let mut filled_bits = L::BITS_PER_PIXEL;
    while filled_bits < WORD_BITS {
        word |= word << filled_bits;
        filled_bits <<= 1;
    }
    word
}

/// Replaces the bits of `word` selected by `mask` with the same bits of `value`.
#[inline]
pub const fn merge(word: Word, value: Word, mask: Word) -> Word {
    (word & !mask) | (value & mask)
}

/// Reads the color of pixel `x` from the word that holds it.
#[inline]
pub fn read_slot<L: PixelLayout>(word: Word, x: u32) -> u32 {
    (word >> pixel_to_bit_offset::<L>(x)) & L::PIXEL_MASK
}

/// Moves every pixel `count` slots toward slot 0. Pixels moved past slot 0 are dropped.
#[inline]
pub fn shift_toward_first<L: PixelLayout>(word: Word, count: u32) -> Word {
    let bits = count << L::LOG2_BITS_PER_PIXEL;
    if L::LSB_FIRST {
        word.checked_shr(bits).unwrap_or(0)
    } else {
        word.checked_shl(bits).unwrap_or(0)
    }
}

/// Moves every pixel `count` slots away from slot 0. Pixels moved past the last slot are dropped.
#[inline]
pub fn shift_toward_last<L: PixelLayout>(word: Word, count: u32) -> Word {
    let bits = count << L::LOG2_BITS_PER_PIXEL;
    if L::LSB_FIRST {
        word.checked_shl(bits).unwrap_or(0)
    } else {
        word.checked_shr(bits).unwrap_or(0)
    }
}

/// The bytes of `word` in display order.
#[inline]
pub fn word_to_bytes<L: PixelLayout>(word: Word) -> [u8; WORD_BYTES] {
    if L::LSB_FIRST {
        word.to_le_bytes()
    } else {
        word.to_be_bytes()
    }
}

/// Inverse of [word_to_bytes].
#[inline]
pub fn word_from_bytes<L: PixelLayout>(bytes: [u8; WORD_BYTES]) -> Word {
    if L::LSB_FIRST {
        Word::from_le_bytes(bytes)
    } else {
        Word::from_be_bytes(bytes)
    }
}
