//! Raster image element

use std::path::Path;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::ui::backend::{DecodedImage, ImageDecoder};
use crate::ui::config::{ElementConfig, HJustify};
use crate::ui::context::RenderContext;
use crate::ui::core::Dimensions;
use crate::ui::element::{Element, ElementBase, render_cached};
use crate::ui::error::{UiError, UiResult};
use crate::ui::styling::{Background, WHITE};
use crate::ui::surface::{Bitmap, BitmapHandle, Surface};

use super::label::justify_in;

/// Displays decoded pixel data at its natural size
///
/// Partially transparent pixels are blended over the matte colour when the
/// image is loaded; fully transparent ones let the parent show through.
pub struct Image {
    base: ElementBase,
    pixels: Option<Bitmap>,
    matte: Rgb565,
}

impl Default for Image {
    fn default() -> Self {
        Self::new()
    }
}

impl Image {
    /// Image with no pixel data; rendering fails until one is set
    pub fn new() -> Self {
        Self {
            base: ElementBase::new("Image").with_background(Background::transparent()),
            pixels: None,
            matte: WHITE,
        }
    }

    pub fn from_file(path: &Path, decoder: &dyn ImageDecoder) -> UiResult<Self> {
        let mut image = Self::new();
        image.set_image(&decoder.decode_file(path)?)?;
        Ok(image)
    }

    pub fn from_bytes(bytes: &[u8], decoder: &dyn ImageDecoder) -> UiResult<Self> {
        let mut image = Self::new();
        image.set_image(&decoder.decode_bytes(bytes)?)?;
        Ok(image)
    }

    pub fn with_config(mut self, config: ElementConfig) -> Self {
        self.base = self.base.with_config(config);
        self
    }

    /// Colour partially transparent pixels are blended over
    pub fn with_matte(mut self, matte: Rgb565) -> Self {
        self.matte = matte;
        self
    }

    pub fn set_image(&mut self, image: &DecodedImage) -> UiResult<()> {
        self.pixels = Some(image.to_bitmap(self.matte)?);
        self.base.force_redraw();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.pixels = None;
        self.base.force_redraw();
    }

    fn bitmap(&self) -> UiResult<&Bitmap> {
        self.pixels
            .as_ref()
            .ok_or(UiError::MissingDependency("image data"))
    }

    fn redraw(&mut self, surface: &mut Surface, _ctx: &RenderContext<'_>) -> UiResult<()> {
        let bitmap = self.bitmap()?;
        let area = Rectangle::new(Point::zero(), surface.size());
        surface.blit(bitmap, justify_in(bitmap.size(), area, HJustify::Center));
        Ok(())
    }
}

impl Element for Image {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn min_size(&self, _ctx: &RenderContext<'_>) -> UiResult<Dimensions> {
        Ok(Dimensions::from(self.bitmap()?.size()))
    }

    fn render(&mut self, requested: Dimensions, ctx: &RenderContext<'_>) -> UiResult<BitmapHandle> {
        render_cached(self, requested, ctx, Self::redraw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::backend::RasterDecoder;

    fn checker() -> DecodedImage {
        DecodedImage {
            width: 2,
            height: 2,
            rgba: vec![
                255, 0, 0, 255, 0, 0, 0, 0, //
                0, 0, 0, 0, 0, 0, 255, 255,
            ],
        }
    }

    #[test]
    fn test_min_size_is_image_size() {
        let ctx = RenderContext::new();
        let mut image = Image::new();
        image.set_image(&checker()).unwrap();
        assert_eq!(image.min_size(&ctx).unwrap(), Dimensions::new(2, 2));
    }

    #[test]
    fn test_missing_pixels_fail() {
        let ctx = RenderContext::new();
        let mut image = Image::new();
        assert_eq!(
            image.render(Dimensions::new(4, 4), &ctx).err(),
            Some(UiError::MissingDependency("image data"))
        );
    }

    #[test]
    fn test_transparent_pixels_stay_transparent() {
        let ctx = RenderContext::new();
        let mut image = Image::new();
        image.set_image(&checker()).unwrap();
        let bitmap = image.render(Dimensions::ZERO, &ctx).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some(Rgb565::RED));
        assert_eq!(bitmap.pixel(1, 0), None);
        assert_eq!(bitmap.pixel(1, 1), Some(Rgb565::BLUE));
    }

    #[test]
    fn test_decode_errors_surface() {
        assert!(matches!(
            Image::from_bytes(b"not an image", &RasterDecoder),
            Err(UiError::ImageDecode(_))
        ));
    }
}
