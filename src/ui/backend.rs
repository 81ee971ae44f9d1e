//! External rendering collaborators
//!
//! Elements never rasterise glyphs or decode images themselves. They ask a
//! [`FontBackend`] for text metrics and glyph bitmaps and an
//! [`ImageDecoder`] for pixel data. Default implementations are provided on
//! top of embedded-graphics mono fonts and the `image` crate.

use std::path::Path;

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use log::debug;

use super::core::Dimensions;
use super::error::{UiError, UiResult};
use super::surface::{Bitmap, Surface};

/// Text size variants
///
/// - `Small`: 5x8 font
/// - `Medium`: 6x10 font (default)
/// - `Large`: 10x20 font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TextSize {
    pub fn font(&self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => &embedded_graphics::mono_font::ascii::FONT_5X8,
            TextSize::Medium => &embedded_graphics::mono_font::ascii::FONT_6X10,
            TextSize::Large => &embedded_graphics::mono_font::ascii::FONT_10X20,
        }
    }
}

// ============================================================================
// Fonts
// ============================================================================

/// Text metrics and glyph rendering
pub trait FontBackend {
    /// Pixel extent of `text` set in `font`
    fn measure(&self, text: &str, font: TextSize) -> Dimensions;

    /// Height of one line of text
    fn line_height(&self, font: TextSize) -> i32;

    /// Width of the letter "M"
    fn em_width(&self, font: TextSize) -> i32;

    /// Rasterise `text` onto a transparent bitmap
    fn render_text(&self, text: &str, font: TextSize, color: Rgb565) -> UiResult<Bitmap>;
}

/// [`FontBackend`] over the embedded-graphics monospace fonts
#[derive(Debug, Clone, Copy, Default)]
pub struct MonoFontBackend;

impl FontBackend for MonoFontBackend {
    fn measure(&self, text: &str, font: TextSize) -> Dimensions {
        let mono = font.font();
        let chars = text.chars().count() as i32;
        let width = if chars == 0 {
            0
        } else {
            chars * mono.character_size.width as i32
                + (chars - 1) * mono.character_spacing as i32
        };
        Dimensions::new(width, mono.character_size.height as i32)
    }

    fn line_height(&self, font: TextSize) -> i32 {
        font.font().character_size.height as i32
    }

    fn em_width(&self, font: TextSize) -> i32 {
        font.font().character_size.width as i32
    }

    fn render_text(&self, text: &str, font: TextSize, color: Rgb565) -> UiResult<Bitmap> {
        let extent = self.measure(text, font);
        let size = extent.to_size().ok_or(UiError::InvalidGeometry {
            width: extent.width,
            height: extent.height,
        })?;
        let mut surface = Surface::new(size)?;
        let style = MonoTextStyle::new(font.font(), color);
        let Ok(_) = Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut surface);
        surface.snapshot()
    }
}

// ============================================================================
// Images
// ============================================================================

/// Decoded image in 8-bit RGBA, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    /// Convert to a bitmap, blending partially transparent pixels over
    /// `matte` and dropping fully transparent ones
    pub fn to_bitmap(&self, matte: Rgb565) -> UiResult<Bitmap> {
        let count = self.width as usize * self.height as usize;
        if self.rgba.len() != count * 4 {
            return Err(UiError::InvalidGeometry {
                width: self.width as i32,
                height: self.height as i32,
            });
        }

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|_| UiError::OutOfMemory { bytes: count * 4 })?;

        let blend = |c: u8, m: u8, a: u8| ((c as u32 * a as u32 + m as u32 * (255 - a as u32)) / 255) as u8;
        let (mr, mg, mb) = (matte.r() << 3, matte.g() << 2, matte.b() << 3);

        for px in self.rgba.chunks_exact(4) {
            let [r, g, b, a] = [px[0], px[1], px[2], px[3]];
            pixels.push(match a {
                0 => None,
                255 => Some(Rgb565::new(r >> 3, g >> 2, b >> 3)),
                _ => Some(Rgb565::new(
                    blend(r, mr, a) >> 3,
                    blend(g, mg, a) >> 2,
                    blend(b, mb, a) >> 3,
                )),
            });
        }

        Bitmap::from_pixels(self.width as usize, self.height as usize, pixels)
    }
}

/// Turns encoded image data into pixels
pub trait ImageDecoder {
    fn decode_file(&self, path: &Path) -> UiResult<DecodedImage>;
    fn decode_bytes(&self, bytes: &[u8]) -> UiResult<DecodedImage>;
}

/// [`ImageDecoder`] backed by the `image` crate (PNG and BMP)
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl RasterDecoder {
    fn finish(img: image::DynamicImage) -> DecodedImage {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!("Decoded {}x{} image", width, height);
        DecodedImage {
            width,
            height,
            rgba: rgba.into_raw(),
        }
    }
}

impl ImageDecoder for RasterDecoder {
    fn decode_file(&self, path: &Path) -> UiResult<DecodedImage> {
        let img = image::open(path).map_err(|e| UiError::ImageDecode(e.to_string()))?;
        Ok(Self::finish(img))
    }

    fn decode_bytes(&self, bytes: &[u8]) -> UiResult<DecodedImage> {
        let img = image::load_from_memory(bytes).map_err(|e| UiError::ImageDecode(e.to_string()))?;
        Ok(Self::finish(img))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_measure() {
        let fonts = MonoFontBackend;
        assert_eq!(fonts.measure("", TextSize::Medium), Dimensions::new(0, 10));
        assert_eq!(fonts.measure("abc", TextSize::Medium), Dimensions::new(18, 10));
        assert_eq!(fonts.line_height(TextSize::Large), 20);
        assert_eq!(fonts.em_width(TextSize::Small), 5);
    }

    #[test]
    fn test_render_text_matches_measure() {
        let fonts = MonoFontBackend;
        let bitmap = fonts.render_text("Hi", TextSize::Medium, Rgb565::BLACK).unwrap();
        assert_eq!(bitmap.size(), Size::new(12, 10));
        let inked = (0..12)
            .flat_map(|x| (0..10).map(move |y| (x, y)))
            .filter(|&(x, y)| bitmap.pixel(x, y).is_some())
            .count();
        assert!(inked > 0);
    }

    #[test]
    fn test_decoded_image_alpha_handling() {
        let img = DecodedImage {
            width: 2,
            height: 1,
            rgba: vec![255, 0, 0, 255, 0, 0, 255, 0],
        };
        let bitmap = img.to_bitmap(Rgb565::WHITE).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some(Rgb565::RED));
        assert_eq!(bitmap.pixel(1, 0), None);
    }

    #[test]
    fn test_decoded_image_rejects_short_buffer() {
        let img = DecodedImage {
            width: 2,
            height: 2,
            rgba: vec![0; 4],
        };
        assert!(matches!(
            img.to_bitmap(Rgb565::WHITE),
            Err(UiError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_raster_decoder_rejects_garbage() {
        let result = RasterDecoder.decode_bytes(&[1, 2, 3, 4]);
        assert!(matches!(result, Err(UiError::ImageDecode(_))));
    }
}
