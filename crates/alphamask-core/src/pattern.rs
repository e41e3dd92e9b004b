//! In-memory alpha patterns used to drive the classifier without any image
//! decoding. Opaque texels are white with alpha 1, transparent ones are
//! black with alpha 0.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use glam::{Vec2, Vec4};

use crate::image::Image;
use crate::CoreError;

const OPAQUE: Vec4 = Vec4::ONE;
const TRANSPARENT: Vec4 = Vec4::ZERO;

fn alpha_texel(covered: bool) -> Vec4 {
    if covered {
        OPAQUE
    } else {
        TRANSPARENT
    }
}

/// Square cells of `cell` texels, opaque where `(cx + cy)` is even.
/// A `cell` of 0 is treated as 1.
pub fn checkerboard(width: u32, height: u32, cell: u32) -> Result<Image, CoreError> {
    let cell = cell.max(1);
    Image::from_fn(width, height, |x, y| alpha_texel((x / cell + y / cell) % 2 == 0))
}

/// Opaque disc of `radius` texels centered in the image.
pub fn disc(width: u32, height: u32, radius: f32) -> Result<Image, CoreError> {
    let center = Vec2::new(width as f32, height as f32) * 0.5;
    Image::from_fn(width, height, |x, y| {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        alpha_texel(p.distance(center) <= radius)
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseConfig {
    pub seed: i32,
    /// Noise frequency in cycles per texel.
    pub frequency: f32,
    /// Texels whose noise value (in [-1, 1]) exceeds this become opaque.
    pub threshold: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            frequency: 0.02,
            threshold: 0.0,
        }
    }
}

/// Blobby mask thresholded from OpenSimplex2 noise. Deterministic per seed.
pub fn noise_mask(width: u32, height: u32, config: NoiseConfig) -> Result<Image, CoreError> {
    let mut noise = FastNoiseLite::with_seed(config.seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(config.frequency));
    Image::from_fn(width, height, |x, y| {
        alpha_texel(noise.get_noise_2d(x as f32, y as f32) > config.threshold)
    })
}
