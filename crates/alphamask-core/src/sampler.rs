use glam::{Vec2, Vec4};

use crate::image::Image;
use crate::Texture;

/// How texel indices outside the image are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    #[default]
    ClampToEdge,
    Repeat,
    MirrorRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Texel containing the coordinate.
    #[default]
    Nearest,
    /// Bilinear blend of the four nearest texel centers.
    Linear,
}

/// CPU counterpart of a GPU sampler object, following wgpu's
/// `SamplerDescriptor` semantics. Nearest sampling matches the GPU exactly;
/// linear blend weights are exact here but quantized by hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sampler {
    pub address_mode: AddressMode,
    pub filter: FilterMode,
}

impl Sampler {
    pub fn new(address_mode: AddressMode, filter: FilterMode) -> Self {
        Self { address_mode, filter }
    }

    pub fn sample(&self, image: &Image, uv: Vec2) -> Vec4 {
        // NaN/inf coordinates have no meaningful texel; pin them to the origin.
        if !uv.is_finite() {
            return self.fetch(image, 0, 0);
        }
        match self.filter {
            FilterMode::Nearest => {
                let x = (uv.x * image.width() as f32).floor() as i64;
                let y = (uv.y * image.height() as f32).floor() as i64;
                self.fetch(image, x, y)
            }
            FilterMode::Linear => {
                // Beyond 2^31 texels f32 has no fraction left, and scaling can overflow to inf.
                let px = (uv.x * image.width() as f32 - 0.5).clamp(-LINEAR_LIMIT, LINEAR_LIMIT);
                let py = (uv.y * image.height() as f32 - 0.5).clamp(-LINEAR_LIMIT, LINEAR_LIMIT);
                let (x0, y0) = (px.floor(), py.floor());
                let (fx, fy) = (px - x0, py - y0);
                let (x0, y0) = (x0 as i64, y0 as i64);
                let (x1, y1) = (x0 + 1, y0 + 1);

                let bottom = self
                    .fetch(image, x0, y0)
                    .lerp(self.fetch(image, x1, y0), fx);
                let top = self
                    .fetch(image, x0, y1)
                    .lerp(self.fetch(image, x1, y1), fx);
                bottom.lerp(top, fy)
            }
        }
    }

    fn fetch(&self, image: &Image, x: i64, y: i64) -> Vec4 {
        let x = resolve(self.address_mode, x, image.width());
        let y = resolve(self.address_mode, y, image.height());
        image.texel(x, y)
    }
}

const LINEAR_LIMIT: f32 = 2_147_483_648.0;

/// Map an arbitrary texel index into `0..size`.
fn resolve(mode: AddressMode, i: i64, size: u32) -> u32 {
    let n = size as i64;
    let resolved = match mode {
        AddressMode::ClampToEdge => i.clamp(0, n - 1),
        AddressMode::Repeat => i.rem_euclid(n),
        AddressMode::MirrorRepeat => {
            let period = i.rem_euclid(2 * n);
            if period < n {
                period
            } else {
                2 * n - 1 - period
            }
        }
    };
    resolved as u32
}

// ---------------------------------------------------------------------------
// SampledImage — an image bound together with its sampler
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct SampledImage<'a> {
    pub image: &'a Image,
    pub sampler: Sampler,
}

impl<'a> SampledImage<'a> {
    pub fn new(image: &'a Image, sampler: Sampler) -> Self {
        Self { image, sampler }
    }
}

impl Texture for SampledImage<'_> {
    fn sample(&self, uv: Vec2) -> Vec4 {
        self.sampler.sample(self.image, uv)
    }
}
