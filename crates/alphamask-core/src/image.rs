use glam::Vec4;

use crate::CoreError;

/// A grid of RGBA texels stored row by row.
///
/// Row 0 is the bottom row (v = 0), matching the bottom-left origin used by
/// fragment coordinates. Indices passed to [`Image::texel`] must be in range.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    texels: Vec<Vec4>,
}

impl Image {
    /// An image filled with a single color.
    pub fn filled(width: u32, height: u32, color: Vec4) -> Result<Self, CoreError> {
        check_extent(width, height)?;
        Ok(Self {
            width,
            height,
            texels: vec![color; width as usize * height as usize],
        })
    }

    /// Build an image by evaluating `f(x, y)` for every texel.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> Vec4,
    ) -> Result<Self, CoreError> {
        check_extent(width, height)?;
        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                texels.push(f(x, y));
            }
        }
        Ok(Self { width, height, texels })
    }

    /// Decode tightly packed 8-bit RGBA. Every channel maps to `byte / 255`.
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self, CoreError> {
        check_extent(width, height)?;
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CoreError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        let texels = data
            .chunks_exact(4)
            .map(|px| {
                Vec4::new(
                    px[0] as f32 / 255.0,
                    px[1] as f32 / 255.0,
                    px[2] as f32 / 255.0,
                    px[3] as f32 / 255.0,
                )
            })
            .collect();
        Ok(Self { width, height, texels })
    }

    /// Encode as tightly packed 8-bit RGBA, clamping every channel to [0, 1].
    pub fn to_rgba8(&self) -> Vec<u8> {
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.texels
            .iter()
            .flat_map(|t| t.to_array().map(to_byte))
            .collect()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn texel(&self, x: u32, y: u32) -> Vec4 {
        self.texels[y as usize * self.width as usize + x as usize]
    }

    pub fn set_texel(&mut self, x: u32, y: u32, color: Vec4) {
        let w = self.width as usize;
        self.texels[y as usize * w + x as usize] = color;
    }

    pub fn texels(&self) -> &[Vec4] {
        &self.texels
    }

    /// Same image with the row order reversed.
    pub fn flipped_rows(&self) -> Self {
        let w = self.width as usize;
        let texels = self.texels.chunks_exact(w).rev().flatten().copied().collect();
        Self {
            width: self.width,
            height: self.height,
            texels,
        }
    }
}

fn check_extent(width: u32, height: u32) -> Result<(), CoreError> {
    if width == 0 || height == 0 {
        return Err(CoreError::EmptyImage { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_images_are_rejected() {
        assert_eq!(
            Image::filled(0, 4, Vec4::ZERO),
            Err(CoreError::EmptyImage { width: 0, height: 4 })
        );
        assert!(Image::from_fn(4, 0, |_, _| Vec4::ZERO).is_err());
        assert!(Image::from_rgba8(0, 0, &[]).is_err());
    }

    #[test]
    fn from_rgba8_checks_length() {
        let err = Image::from_rgba8(2, 2, &[0u8; 15]).unwrap_err();
        assert_eq!(err, CoreError::DataLength { expected: 16, actual: 15 });
    }

    #[test]
    fn from_rgba8_normalizes_channels() {
        let img = Image::from_rgba8(1, 1, &[255, 0, 51, 204]).unwrap();
        let t = img.texel(0, 0);
        assert_eq!(t.x, 1.0);
        assert_eq!(t.y, 0.0);
        assert!((t.z - 0.2).abs() < 1e-6);
        assert!((t.w - 0.8).abs() < 1e-6);
    }

    #[test]
    fn to_rgba8_clamps_out_of_range_channels() {
        let img = Image::filled(1, 1, Vec4::new(-0.5, 2.0, 0.5, 1.0)).unwrap();
        assert_eq!(img.to_rgba8(), vec![0, 255, 128, 255]);
    }

    #[test]
    fn rgba8_bytes_survive_decode_and_encode() {
        let bytes: Vec<u8> = (0..=255u8).step_by(5).take(16).collect();
        let img = Image::from_rgba8(2, 2, &bytes).unwrap();
        assert_eq!(img.to_rgba8(), bytes);
    }

    #[test]
    fn from_fn_is_row_major() {
        let img = Image::from_fn(3, 2, |x, y| Vec4::new(x as f32, y as f32, 0.0, 1.0)).unwrap();
        assert_eq!(img.texels()[1], Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(img.texels()[3], Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(img.texel(2, 1), Vec4::new(2.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn set_texel_overwrites_one_texel() {
        let mut img = Image::filled(2, 2, Vec4::ZERO).unwrap();
        img.set_texel(1, 0, Vec4::ONE);
        assert_eq!(img.texel(1, 0), Vec4::ONE);
        assert_eq!(img.texel(0, 1), Vec4::ZERO);
    }

    #[test]
    fn flipped_rows_reverses_row_order() {
        let img = Image::from_fn(2, 3, |_, y| Vec4::splat(y as f32)).unwrap();
        let flipped = img.flipped_rows();
        assert_eq!(flipped.texel(0, 0), Vec4::splat(2.0));
        assert_eq!(flipped.texel(1, 2), Vec4::splat(0.0));
        assert_eq!(flipped.flipped_rows(), img);
    }
}
