//! The per-fragment alpha classifier.
//!
//! Every function here is pure: the same resolution, fragment coordinate and
//! texture contents always produce the same color, and no invocation depends
//! on any other.

use glam::{Vec2, Vec4};

use crate::{Coverage, Resolution, Texture};

/// `fragCoord / iResolution.xy`. On-target fragments land in [0, 1]^2.
pub fn normalize(frag_coord: Vec2, resolution: Resolution) -> Vec2 {
    frag_coord / resolution.as_vec2()
}

/// Inspect the alpha channel. NaN compares false and so counts as empty.
pub fn classify(sample: Vec4) -> Coverage {
    if sample.w > 0.0 {
        Coverage::Covered
    } else {
        Coverage::Empty
    }
}

/// Full fragment program: normalize, sample, classify, emit an opaque color.
pub fn shade<T: Texture + ?Sized>(texture: &T, resolution: Resolution, frag_coord: Vec2) -> Vec4 {
    let uv = normalize(frag_coord, resolution);
    classify(texture.sample(uv)).color()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Image;
    use crate::sampler::{SampledImage, Sampler};
    use crate::{BLUE, RED};

    fn res() -> Resolution {
        Resolution::new(800.0, 600.0).unwrap()
    }

    fn solid_alpha(alpha: f32) -> impl Fn(Vec2) -> Vec4 {
        move |_| Vec4::new(0.3, 0.6, 0.9, alpha)
    }

    #[test]
    fn normalize_divides_elementwise() {
        let uv = normalize(Vec2::new(400.0, 150.0), res());
        assert_eq!(uv, Vec2::new(0.5, 0.25));
    }

    #[test]
    fn positive_alpha_is_red() {
        for a in [1e-6, 0.01, 0.5, 0.8, 1.0, 7.0] {
            assert_eq!(classify(Vec4::new(0.0, 0.0, 0.0, a)), Coverage::Covered);
            assert_eq!(shade(&solid_alpha(a), res(), Vec2::new(10.5, 10.5)), RED);
        }
    }

    #[test]
    fn zero_alpha_is_blue() {
        assert_eq!(classify(Vec4::new(1.0, 1.0, 1.0, 0.0)), Coverage::Empty);
        assert_eq!(shade(&solid_alpha(0.0), res(), Vec2::new(10.5, 10.5)), BLUE);
    }

    #[test]
    fn negative_zero_and_negative_alpha_are_blue() {
        assert_eq!(classify(Vec4::new(0.0, 0.0, 0.0, -0.0)), Coverage::Empty);
        assert_eq!(classify(Vec4::new(0.0, 0.0, 0.0, -0.5)), Coverage::Empty);
    }

    #[test]
    fn nan_alpha_is_blue() {
        assert_eq!(classify(Vec4::new(0.0, 0.0, 0.0, f32::NAN)), Coverage::Empty);
    }

    #[test]
    fn color_channels_of_the_sample_are_ignored() {
        let dark = Vec4::new(0.0, 0.0, 0.0, 0.4);
        let bright = Vec4::new(1.0, 1.0, 1.0, 0.4);
        assert_eq!(classify(dark), classify(bright));
    }

    #[test]
    fn output_is_always_opaque() {
        for a in [-1.0, 0.0, 0.2, 1.0] {
            assert_eq!(shade(&solid_alpha(a), res(), Vec2::new(1.5, 2.5)).w, 1.0);
        }
    }

    #[test]
    fn center_of_800x600_with_alpha_0_8_is_red() {
        // The closure only answers at the exact normalized center.
        let tex = |uv: Vec2| {
            assert_eq!(uv, Vec2::new(0.5, 0.5));
            Vec4::new(0.0, 0.0, 0.0, 0.8)
        };
        assert_eq!(shade(&tex, res(), Vec2::new(400.0, 300.0)), Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn center_of_800x600_with_alpha_zero_is_blue() {
        let tex = |uv: Vec2| {
            assert_eq!(uv, Vec2::new(0.5, 0.5));
            Vec4::new(0.2, 0.2, 0.2, 0.0)
        };
        assert_eq!(shade(&tex, res(), Vec2::new(400.0, 300.0)), Vec4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let img = Image::from_fn(8, 8, |x, y| {
            Vec4::new(0.0, 0.0, 0.0, if (x + y) % 3 == 0 { 0.0 } else { 1.0 })
        })
        .unwrap();
        let tex = SampledImage::new(&img, Sampler::default());
        let r = Resolution::from_pixels(8, 8).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                let frag = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                assert_eq!(shade(&tex, r, frag), shade(&tex, r, frag));
            }
        }
    }

    #[test]
    fn far_off_target_fragments_still_classify() {
        use crate::sampler::{AddressMode, FilterMode};
        let img = Image::filled(4, 4, Vec4::new(0.0, 0.0, 0.0, 1.0)).unwrap();
        for mode in [AddressMode::ClampToEdge, AddressMode::Repeat, AddressMode::MirrorRepeat] {
            let tex = SampledImage::new(&img, Sampler::new(mode, FilterMode::Linear));
            assert_eq!(shade(&tex, res(), Vec2::new(1e25, 1.0)), RED);
            assert_eq!(shade(&tex, res(), Vec2::new(-1e30, 1e30)), RED);
        }
    }

    #[test]
    fn image_texel_under_fragment_decides_color() {
        let mut img = Image::filled(800, 600, Vec4::ZERO).unwrap();
        img.set_texel(400, 300, Vec4::new(0.0, 0.0, 0.0, 0.8));
        let tex = SampledImage::new(&img, Sampler::default());
        assert_eq!(shade(&tex, res(), Vec2::new(400.0, 300.0)), RED);
        assert_eq!(shade(&tex, res(), Vec2::new(398.5, 300.5)), BLUE);
    }
}
