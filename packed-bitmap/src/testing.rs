//! Helpers shared by the unit tests: reference rasterizers, image expectations and a recording
//! assertion handler.

use core::cell::Cell;
use std::sync::{Mutex as StdMutex, MutexGuard};
use std::vec::Vec;

use critical_section::Mutex;

use crate::assertion::{scoped_hook, HookGuard, Violation};
use crate::image::{ImageBuf, Raster};
use crate::layout::PixelLayout;
use crate::primitive::get_pixel;

/// Large enough for a `4 * ppw` square image in every layout.
pub const TEST_CAPACITY: usize = 1024;

pub type TestImage<L> = ImageBuf<L, TEST_CAPACITY>;

/// Runs a generic test body once per layout.
macro_rules! for_each_layout {
    ($check:ident) => {
        $check::<$crate::layout::X1>();
        $check::<$crate::layout::X1Lsb>();
        $check::<$crate::layout::X2>();
        $check::<$crate::layout::X2Lsb>();
        $check::<$crate::layout::X4>();
        $check::<$crate::layout::X4Lsb>();
    };
}

pub(crate) use for_each_layout;

pub fn white<L: PixelLayout>() -> u32 {
    L::MAX_COLOR
}

pub const BLACK: u32 = 0;

/// A black `4 * ppw` square image, the standard canvas of the drawing tests.
pub fn square_image<L: PixelLayout>() -> TestImage<L> {
    let side = 4 * L::PIXELS_PER_WORD;
    TestImage::<L>::new(side, side, BLACK)
}

/// Asserts that every pixel of `image` has the color returned by `expected`.
pub fn assert_pixels<L, I>(image: &I, expected: impl Fn(i32, i32) -> u32)
where
    L: PixelLayout,
    I: Raster<Layout = L>,
{
    for y in 0..image.height() as i32 {
        for x in 0..image.width() as i32 {
            assert_eq!(
                get_pixel(image, x, y),
                expected(x, y),
                "{:?}: pixel ({}, {})",
                L::ID,
                x,
                y
            );
        }
    }
}

/// Asserts that exactly the pixels in `points` (inside the image) are white.
pub fn assert_white_on<L, I>(image: &I, points: &[(i32, i32)])
where
    L: PixelLayout,
    I: Raster<Layout = L>,
{
    assert_pixels(image, |x, y| {
        if points.contains(&(x, y)) {
            white::<L>()
        } else {
            BLACK
        }
    });
}

/// Keeps the points of `points` that lie inside `image`.
pub fn visible<I: Raster + ?Sized>(image: &I, points: Vec<(i32, i32)>) -> Vec<(i32, i32)> {
    let (width, height) = (image.width() as i32, image.height() as i32);
    points
        .into_iter()
        .filter(|(x, y)| (0..width).contains(x) && (0..height).contains(y))
        .collect()
}

/// Reference Bresenham line. The endpoints are put in canonical order first, so the result does
/// not depend on their order.
pub fn bresenham_line(mut x1: i32, mut y1: i32, mut x2: i32, mut y2: i32) -> Vec<(i32, i32)> {
    let mut points = Vec::new();
    let steep = (x2 - x1).abs() < (y2 - y1).abs();
    if steep {
        core::mem::swap(&mut x1, &mut y1);
        core::mem::swap(&mut x2, &mut y2);
    }
    if x1 > x2 {
        core::mem::swap(&mut x1, &mut x2);
        core::mem::swap(&mut y1, &mut y2);
    }

    let dx = x2 - x1;
    let dy = (y2 - y1).abs();
    let ystep = if y1 < y2 { 1 } else { -1 };
    let mut error = dx / 2;
    let mut y = y1;
    for x in x1..=x2 {
        points.push(if steep { (y, x) } else { (x, y) });
        error -= dy;
        if error <= 0 {
            y += ystep;
            error += dx;
        }
    }
    points
}

/// Reference midpoint circle outline.
pub fn midpoint_circle(cx: i32, cy: i32, radius: i32) -> Vec<(i32, i32)> {
    let mut points = Vec::new();
    if radius == 0 {
        points.push((cx, cy));
        return points;
    }

    let (mut dx, mut dy, mut d) = (0, radius, 1 - radius);
    loop {
        for (px, py) in [
            (dx, dy),
            (-dx, dy),
            (dx, -dy),
            (-dx, -dy),
            (dy, dx),
            (-dy, dx),
            (dy, -dx),
            (-dy, -dx),
        ] {
            points.push((cx + px, cy + py));
        }

        dx += 1;
        if d < 0 {
            d += 2 * dx + 1;
        } else {
            dy -= 1;
            d += 2 * (dx - dy) + 1;
        }
        if dx > dy {
            break;
        }
    }
    points
}

/// Reference filled circle: every row spans the outline's extremes on that row.
pub fn filled_circle(cx: i32, cy: i32, radius: i32) -> Vec<(i32, i32)> {
    let outline = midpoint_circle(cx, cy, radius);
    let mut points = Vec::new();
    for y in cy - radius..=cy + radius {
        let row = outline.iter().filter(|(_, py)| *py == y).map(|(px, _)| *px);
        let (Some(left), Some(right)) = (row.clone().min(), row.max()) else {
            continue;
        };
        points.extend((left..=right).map(|x| (x, y)));
    }
    points
}

/// Reference two-region midpoint ellipse outline.
pub fn midpoint_ellipse(cx: i32, cy: i32, rx: i32, ry: i32) -> Vec<(i32, i32)> {
    let mut points = Vec::new();
    if rx == 0 && ry == 0 {
        points.push((cx, cy));
        return points;
    }
    if rx == 0 {
        points.extend((-ry..=ry).map(|y| (cx, cy + y)));
        return points;
    }
    if ry == 0 {
        points.extend((-rx..=rx).map(|x| (cx + x, cy)));
        return points;
    }

    let mut push4 = |dx: i32, dy: i32| {
        points.push((cx + dx, cy + dy));
        points.push((cx - dx, cy + dy));
        points.push((cx + dx, cy - dy));
        points.push((cx - dx, cy - dy));
    };

    let rx_sq = rx as i64 * rx as i64;
    let ry_sq = ry as i64 * ry as i64;
    let (mut dx, mut dy) = (0i32, ry);
    let mut px = 0i64;
    let mut py = 2 * rx_sq * dy as i64;

    let mut p = ry_sq - rx_sq * ry as i64 + (rx_sq >> 2);
    while px < py {
        push4(dx, dy);
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

    let (dx64, dy64) = (dx as i64, dy as i64);
    p = ry_sq * (dx64 * dx64 + dx64) + rx_sq * (dy64 * dy64 - dy64) - rx_sq * ry_sq;
    while dy >= 0 {
        push4(dx, dy);
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
    points
}

/// Simple diagonal stripes with every color of the layout, so copies are easy to tell apart.
pub fn pattern<L: PixelLayout>(x: i32, y: i32) -> u32 {
    ((x + 2 * y) as u32 / 3) % (L::MAX_COLOR + 1)
}

static HANDLER_LOCK: StdMutex<()> = StdMutex::new(());
static LAST_VIOLATION: Mutex<Cell<Option<Violation>>> = Mutex::new(Cell::new(None));

/// Serializes tests that depend on which assertion handler is installed.
pub fn lock_handler() -> MutexGuard<'static, ()> {
    HANDLER_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn record(violation: &Violation) {
    critical_section::with(|cs| LAST_VIOLATION.borrow(cs).set(Some(*violation)));
}

static RECORD: fn(&Violation) = record;

/// Keeps the recording handler installed. Fields drop in order: handler first, then the lock.
pub struct Recorder {
    _hook: HookGuard,
    _lock: MutexGuard<'static, ()>,
}

/// Installs a handler that records violations instead of panicking.
pub fn recording_hook() -> Recorder {
    let lock = lock_handler();
    take_violation();
    Recorder {
        _hook: scoped_hook(&RECORD),
        _lock: lock,
    }
}

/// Returns and clears the most recently recorded violation.
pub fn take_violation() -> Option<Violation> {
    critical_section::with(|cs| LAST_VIOLATION.borrow(cs).take())
}

/// Returns the message of the most recently recorded violation, clearing it.
pub fn take_message() -> Option<&'static str> {
    take_violation().map(|violation| violation.message)
}
