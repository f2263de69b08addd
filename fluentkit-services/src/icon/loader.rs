// SPDX-License-Identifier: LGPL-3.0-only
//! Rasterization of vector icon sources.

use tiny_skia::{Pixmap, Transform};

use crate::icon::error::RasterError;
use crate::icon::image::{Color, IconImage, IconSize};
use crate::icon::tint;

/// Turns vector icon sources into pixel images.
///
/// The icon manager calls this outside its cache lock, possibly from several
/// threads at once.
pub trait Rasterizer: Send + Sync {
    /// Render `data` scaled to fill exactly `size`.
    fn render(&self, data: &[u8], size: IconSize) -> Result<IconImage, RasterError>;

    /// Intrinsic size of the vector source.
    fn native_size(&self, data: &[u8]) -> Result<IconSize, RasterError>;

    /// Recolor a rendered image, keeping its alpha as the mask.
    fn apply_tint(&self, image: &IconImage, color: Color) -> IconImage {
        tint::apply_tint(image, color)
    }
}

/// SVG rasterizer backed by `resvg`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgRasterizer;

impl SvgRasterizer {
    /// Create a new SVG rasterizer.
    pub fn new() -> Self {
        Self
    }

    fn parse(&self, data: &[u8]) -> Result<usvg::Tree, RasterError> {
        Ok(usvg::Tree::from_data(data, &usvg::Options::default())?)
    }
}

impl Rasterizer for SvgRasterizer {
    fn render(&self, data: &[u8], size: IconSize) -> Result<IconImage, RasterError> {
        let tree = self.parse(data)?;
        let mut pixmap = Pixmap::new(size.width, size.height)
            .ok_or_else(|| RasterError(format!("Cannot allocate a {} pixmap", size)))?;

        let source = tree.size();
        let transform = Transform::from_scale(
            size.width as f32 / source.width(),
            size.height as f32 / source.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        Ok(IconImage::from_pixmap(&pixmap))
    }

    fn native_size(&self, data: &[u8]) -> Result<IconSize, RasterError> {
        let size = self.parse(data)?.size().to_int_size();
        Ok(IconSize::new(size.width(), size.height()))
    }
}
