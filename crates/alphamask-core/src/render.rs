use glam::Vec2;

use crate::classify::shade;
use crate::image::Image;
use crate::{CoreError, Coverage, Resolution, Texture};

/// Run the classifier for every pixel center of a `width x height` target.
///
/// Pixel `(x, y)` receives `fragCoord = (x + 0.5, y + 0.5)`; row 0 of the
/// returned image is the bottom row.
pub fn render<T: Texture + ?Sized>(texture: &T, width: u32, height: u32) -> Result<Image, CoreError> {
    let resolution = Resolution::from_pixels(width, height)?;
    let image = Image::from_fn(width, height, |x, y| {
        let frag_coord = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        shade(texture, resolution, frag_coord)
    })?;
    log::debug!("rendered {width}x{height} mask on the CPU");
    Ok(image)
}

// ---------------------------------------------------------------------------
// MaskStats
// ---------------------------------------------------------------------------

/// Per-frame tally of classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaskStats {
    pub covered: usize,
    pub empty: usize,
    /// Pixels that are neither pure red nor pure blue.
    pub other: usize,
}

impl MaskStats {
    pub fn from_image(image: &Image) -> Self {
        let mut stats = Self::default();
        for &texel in image.texels() {
            match Coverage::from_color(texel) {
                Some(Coverage::Covered) => stats.covered += 1,
                Some(Coverage::Empty) => stats.empty += 1,
                None => stats.other += 1,
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.covered + self.empty + self.other
    }

    /// Fraction of pixels classified as covered, 0.0 for an empty tally.
    pub fn coverage_ratio(&self) -> f32 {
        match self.total() {
            0 => 0.0,
            n => self.covered as f32 / n as f32,
        }
    }
}

/// Number of texels that differ between two images of the same size.
/// Images of different sizes differ everywhere.
pub fn count_mismatches(a: &Image, b: &Image) -> usize {
    if a.width() != b.width() || a.height() != b.height() {
        return a.texels().len().max(b.texels().len());
    }
    a.texels()
        .iter()
        .zip(b.texels())
        .filter(|(x, y)| x != y)
        .count()
}
