//! Element drawing surfaces and rendered bitmaps
//!
//! Each element owns a [`Surface`] sized to its last render. After drawing
//! completes the surface is snapshotted into an immutable [`Bitmap`] shared
//! through a [`BitmapHandle`]; parents blit those bitmaps into their own
//! surfaces and the root bitmap is flushed to the display.
//!
//! Pixels are `Option<Rgb565>`: `None` is transparent and is skipped when
//! blitting or flushing.

use std::convert::Infallible;
use std::rc::Rc;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use super::error::{UiError, UiResult};

/// Shared handle to a rendered bitmap
///
/// Handing out the same handle twice is how an element signals that its
/// cached rendering was reused.
pub type BitmapHandle = Rc<Bitmap>;

/// Allocate a transparent pixel buffer, reporting exhaustion as an error
fn alloc_pixels(count: usize) -> UiResult<Vec<Option<Rgb565>>> {
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(count)
        .map_err(|_| UiError::OutOfMemory {
            bytes: count * core::mem::size_of::<Option<Rgb565>>(),
        })?;
    pixels.resize(count, None);
    Ok(pixels)
}

// ============================================================================
// Surface
// ============================================================================

/// Heap-backed drawing surface implementing `DrawTarget<Color = Rgb565>`
pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<Option<Rgb565>>,
}

impl Surface {
    /// Allocate a fully transparent surface
    pub fn new(size: Size) -> UiResult<Self> {
        let width = size.width as usize;
        let height = size.height as usize;
        Ok(Self {
            width,
            height,
            pixels: alloc_pixels(width * height)?,
        })
    }

    /// Color at a pixel, `None` if transparent or out of bounds
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.pixels[y as usize * self.width + x as usize]
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Option<Rgb565>) {
        let idx = y * self.width + x;
        self.pixels[idx] = color;
    }

    /// Reset every pixel to transparent
    pub fn clear_transparent(&mut self) {
        self.pixels.fill(None);
    }

    /// Fill a rectangle, clipped to the surface
    pub fn fill_rect(&mut self, area: &Rectangle, color: Rgb565) {
        let x_start = (area.top_left.x.max(0) as usize).min(self.width);
        let y_start = (area.top_left.y.max(0) as usize).min(self.height);
        let x_end = (area.top_left.x as i64 + area.size.width as i64).clamp(0, self.width as i64)
            as usize;
        let y_end = (area.top_left.y as i64 + area.size.height as i64)
            .clamp(0, self.height as i64) as usize;

        for y in y_start..y_end {
            for x in x_start..x_end {
                self.set_pixel(x, y, Some(color));
            }
        }
    }

    /// Copy a bitmap's opaque pixels with its top-left corner at `at`
    pub fn blit(&mut self, bitmap: &Bitmap, at: Point) {
        for by in 0..bitmap.height {
            let y = at.y as i64 + by as i64;
            if y < 0 || y >= self.height as i64 {
                continue;
            }
            for bx in 0..bitmap.width {
                let x = at.x as i64 + bx as i64;
                if x < 0 || x >= self.width as i64 {
                    continue;
                }
                if let Some(color) = bitmap.pixels[by * bitmap.width + bx] {
                    self.set_pixel(x as usize, y as usize, Some(color));
                }
            }
        }
    }

    /// Freeze the current contents into a bitmap
    pub fn snapshot(&self) -> UiResult<Bitmap> {
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(self.pixels.len())
            .map_err(|_| UiError::OutOfMemory {
                bytes: self.pixels.len() * core::mem::size_of::<Option<Rgb565>>(),
            })?;
        pixels.extend_from_slice(&self.pixels);
        Ok(Bitmap {
            width: self.width,
            height: self.height,
            pixels,
        })
    }
}

impl OriginDimensions for Surface {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for Surface {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let x = coord.x;
            let y = coord.y;
            if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
                self.set_pixel(x as usize, y as usize, Some(color));
            }
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let mut colors = colors.into_iter();
        for row in 0..area.size.height as i32 {
            let y = area.top_left.y + row;
            for col in 0..area.size.width as i32 {
                let x = area.top_left.x + col;
                if let Some(color) = colors.next()
                    && x >= 0
                    && y >= 0
                    && (x as usize) < self.width
                    && (y as usize) < self.height
                {
                    self.set_pixel(x as usize, y as usize, Some(color));
                }
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_rect(area, color);
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(Some(color));
        Ok(())
    }
}

// ============================================================================
// Bitmap
// ============================================================================

/// Immutable rendering of an element
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<Option<Rgb565>>,
}

impl Bitmap {
    /// Build a bitmap from row-major pixels
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Option<Rgb565>>) -> UiResult<Self> {
        if pixels.len() != width * height {
            return Err(UiError::InvalidGeometry {
                width: width as i32,
                height: height as i32,
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }

    /// Color at a pixel, `None` if transparent or out of bounds
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.pixels[y as usize * self.width + x as usize]
    }

    /// Rotate clockwise about the center
    ///
    /// Quarter turns are exact pixel permutations. Any other angle is
    /// resampled nearest-neighbour into the rotated bounding box; uncovered
    /// corners stay transparent.
    pub fn rotated(&self, degrees: f32) -> UiResult<Bitmap> {
        let normalized = degrees.rem_euclid(360.0);
        let (w, h) = (self.width, self.height);

        if normalized == 0.0 {
            return Ok(self.clone());
        }

        if normalized == 90.0 || normalized == 180.0 || normalized == 270.0 {
            let (dw, dh) = if normalized == 180.0 { (w, h) } else { (h, w) };
            let mut pixels = alloc_pixels(dw * dh)?;
            for dy in 0..dh {
                for dx in 0..dw {
                    let (sx, sy) = match normalized as u32 {
                        90 => (dy, h - 1 - dx),
                        180 => (w - 1 - dx, h - 1 - dy),
                        _ => (w - 1 - dy, dx),
                    };
                    pixels[dy * dw + dx] = self.pixels[sy * w + sx];
                }
            }
            return Bitmap::from_pixels(dw, dh, pixels);
        }

        let radians = normalized.to_radians();
        let (sin, cos) = radians.sin_cos();
        let dw = (w as f32 * cos.abs() + h as f32 * sin.abs()).ceil() as usize;
        let dh = (w as f32 * sin.abs() + h as f32 * cos.abs()).ceil() as usize;
        let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
        let (dcx, dcy) = (dw as f32 / 2.0, dh as f32 / 2.0);

        let mut pixels = alloc_pixels(dw * dh)?;
        for dy in 0..dh {
            for dx in 0..dw {
                let ox = dx as f32 + 0.5 - dcx;
                let oy = dy as f32 + 0.5 - dcy;
                let sx = (ox * cos + oy * sin + cx).floor();
                let sy = (-ox * sin + oy * cos + cy).floor();
                if sx >= 0.0 && sy >= 0.0 && (sx as usize) < w && (sy as usize) < h {
                    pixels[dy * dw + dx] = self.pixels[sy as usize * w + sx as usize];
                }
            }
        }
        debug!("Rotated {}x{} bitmap by {} degrees", w, h, degrees);
        Bitmap::from_pixels(dw, dh, pixels)
    }

    /// Resample by a uniform factor (nearest neighbour)
    pub fn scaled(&self, factor: f32) -> UiResult<Bitmap> {
        if factor == 1.0 {
            return Ok(self.clone());
        }
        if factor <= 0.0 {
            return Err(UiError::InvalidGeometry {
                width: (self.width as f32 * factor) as i32,
                height: (self.height as f32 * factor) as i32,
            });
        }

        let dw = (self.width as f32 * factor).round() as usize;
        let dh = (self.height as f32 * factor).round() as usize;
        let mut pixels = alloc_pixels(dw * dh)?;
        for dy in 0..dh {
            let sy = ((dy as f32 / factor) as usize).min(self.height.saturating_sub(1));
            for dx in 0..dw {
                let sx = ((dx as f32 / factor) as usize).min(self.width.saturating_sub(1));
                pixels[dy * dw + dx] = self.pixels[sy * self.width + sx];
            }
        }
        Bitmap::from_pixels(dw, dh, pixels)
    }

    /// Draw the opaque pixels onto any display with the top-left at `origin`
    pub fn flush<D>(&self, display: &mut D, origin: Point) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let width = self.width;
        let pixels = self.pixels.iter().enumerate().filter_map(move |(idx, px)| {
            px.map(|color| {
                let x = (idx % width) as i32;
                let y = (idx / width) as i32;
                Pixel(origin + Point::new(x, y), color)
            })
        });
        display.draw_iter(pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{Line, Primitive, PrimitiveStyle};

    fn marked_bitmap() -> Bitmap {
        // 3x2 with a single red pixel at (0, 0)
        let mut surface = Surface::new(Size::new(3, 2)).unwrap();
        surface.fill_rect(&Rectangle::new(Point::zero(), Size::new(3, 2)), Rgb565::BLUE);
        surface.fill_rect(&Rectangle::new(Point::zero(), Size::new(1, 1)), Rgb565::RED);
        surface.snapshot().unwrap()
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = Surface::new(Size::new(4, 4)).unwrap();
        assert_eq!(surface.pixel(0, 0), None);
        assert_eq!(surface.pixel(3, 3), None);
    }

    #[test]
    fn test_draw_target_clips() {
        let mut surface = Surface::new(Size::new(5, 5)).unwrap();
        Line::new(Point::new(-3, 2), Point::new(10, 2))
            .into_styled(PrimitiveStyle::with_stroke(Rgb565::GREEN, 1))
            .draw(&mut surface)
            .unwrap();
        for x in 0..5 {
            assert_eq!(surface.pixel(x, 2), Some(Rgb565::GREEN));
        }
        assert_eq!(surface.pixel(0, 1), None);
    }

    #[test]
    fn test_blit_skips_transparent_pixels() {
        let mut src = Surface::new(Size::new(2, 1)).unwrap();
        src.fill_rect(&Rectangle::new(Point::zero(), Size::new(1, 1)), Rgb565::RED);
        let bitmap = src.snapshot().unwrap();

        let mut dst = Surface::new(Size::new(4, 4)).unwrap();
        dst.clear(Rgb565::WHITE).unwrap();
        dst.blit(&bitmap, Point::new(1, 1));
        assert_eq!(dst.pixel(1, 1), Some(Rgb565::RED));
        assert_eq!(dst.pixel(2, 1), Some(Rgb565::WHITE));
    }

    #[test]
    fn test_quarter_rotation_swaps_dimensions() {
        let bitmap = marked_bitmap();
        let rotated = bitmap.rotated(90.0).unwrap();
        assert_eq!(rotated.size(), Size::new(2, 3));
        // Top-left moves to top-right under a clockwise quarter turn
        assert_eq!(rotated.pixel(1, 0), Some(Rgb565::RED));

        let back = bitmap.rotated(-90.0).unwrap();
        assert_eq!(back.size(), Size::new(2, 3));
        assert_eq!(back.pixel(0, 2), Some(Rgb565::RED));

        let half = bitmap.rotated(180.0).unwrap();
        assert_eq!(half.size(), Size::new(3, 2));
        assert_eq!(half.pixel(2, 1), Some(Rgb565::RED));
    }

    #[test]
    fn test_arbitrary_rotation_grows_bounding_box() {
        let mut surface = Surface::new(Size::new(10, 10)).unwrap();
        surface.clear(Rgb565::BLUE).unwrap();
        let rotated = surface.snapshot().unwrap().rotated(45.0).unwrap();
        assert!(rotated.size().width > 10);
        // Corners of the bounding box are not covered by the source
        assert_eq!(rotated.pixel(0, 0), None);
        let center = rotated.size().width as i32 / 2;
        assert_eq!(rotated.pixel(center, center), Some(Rgb565::BLUE));
    }

    #[test]
    fn test_scaling_doubles_size() {
        let scaled = marked_bitmap().scaled(2.0).unwrap();
        assert_eq!(scaled.size(), Size::new(6, 4));
        assert_eq!(scaled.pixel(1, 1), Some(Rgb565::RED));
        assert_eq!(scaled.pixel(2, 1), Some(Rgb565::BLUE));
    }
}
