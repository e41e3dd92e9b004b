pub mod classify;
pub mod error;
pub mod image;
pub mod pattern;
pub mod render;
pub mod sampler;

pub use glam::{Vec2, Vec4};

pub use error::CoreError;

// ---------------------------------------------------------------------------
// Output colors
// ---------------------------------------------------------------------------

/// Written for fragments whose sampled alpha is strictly positive.
pub const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
/// Written for every other fragment.
pub const BLUE: Vec4 = Vec4::new(0.0, 0.0, 1.0, 1.0);

// ---------------------------------------------------------------------------
// Resolution — render target size, constant for a frame
// ---------------------------------------------------------------------------

/// Pixel dimensions of the render target (`iResolution.xy`).
///
/// Both components are finite and strictly positive, so dividing a fragment
/// coordinate by it never produces an infinity or NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution(Vec2);

impl Resolution {
    pub fn new(width: f32, height: f32) -> Result<Self, CoreError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self(Vec2::new(width, height)))
        } else {
            Err(CoreError::InvalidResolution { width, height })
        }
    }

    pub fn from_pixels(width: u32, height: u32) -> Result<Self, CoreError> {
        Self::new(width as f32, height as f32)
    }

    pub fn width(self) -> f32 {
        self.0.x
    }

    pub fn height(self) -> f32 {
        self.0.y
    }

    pub fn as_vec2(self) -> Vec2 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Coverage
// ---------------------------------------------------------------------------

/// Result of inspecting a sampled texel's alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coverage {
    /// alpha > 0
    Covered,
    /// alpha <= 0, or NaN
    Empty,
}

impl Coverage {
    pub fn color(self) -> Vec4 {
        match self {
            Coverage::Covered => RED,
            Coverage::Empty => BLUE,
        }
    }

    /// Inverse of [`Coverage::color`]. Any other color yields `None`.
    pub fn from_color(color: Vec4) -> Option<Self> {
        if color == RED {
            Some(Coverage::Covered)
        } else if color == BLUE {
            Some(Coverage::Empty)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Anything that can be sampled at a normalized coordinate (`iChannel0`).
///
/// Coordinates outside [0, 1] are the implementor's business: image-backed
/// textures resolve them through their [`sampler::Sampler`].
pub trait Texture {
    fn sample(&self, uv: Vec2) -> Vec4;
}

/// Procedural textures.
impl<F> Texture for F
where
    F: Fn(Vec2) -> Vec4,
{
    fn sample(&self, uv: Vec2) -> Vec4 {
        self(uv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_accepts_positive_finite() {
        let r = Resolution::new(800.0, 600.0).unwrap();
        assert_eq!(r.width(), 800.0);
        assert_eq!(r.height(), 600.0);
        assert_eq!(r.as_vec2(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn resolution_rejects_degenerate_sizes() {
        for (w, h) in [
            (0.0, 600.0),
            (800.0, 0.0),
            (-1.0, 600.0),
            (f32::NAN, 600.0),
            (800.0, f32::INFINITY),
        ] {
            assert!(
                matches!(Resolution::new(w, h), Err(CoreError::InvalidResolution { .. })),
                "{w}x{h} should be rejected"
            );
        }
    }

    #[test]
    fn resolution_from_zero_pixels_fails() {
        assert!(Resolution::from_pixels(0, 10).is_err());
        assert!(Resolution::from_pixels(10, 10).is_ok());
    }

    #[test]
    fn coverage_colors_are_opaque() {
        assert_eq!(Coverage::Covered.color(), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(Coverage::Empty.color(), Vec4::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(Coverage::Covered.color().w, 1.0);
        assert_eq!(Coverage::Empty.color().w, 1.0);
    }

    #[test]
    fn coverage_from_color_round_trips() {
        assert_eq!(Coverage::from_color(RED), Some(Coverage::Covered));
        assert_eq!(Coverage::from_color(BLUE), Some(Coverage::Empty));
        assert_eq!(Coverage::from_color(Vec4::ONE), None);
    }

    #[test]
    fn closures_are_textures() {
        let tex = |uv: Vec2| Vec4::new(uv.x, uv.y, 0.0, 1.0);
        assert_eq!(tex.sample(Vec2::new(0.25, 0.75)), Vec4::new(0.25, 0.75, 0.0, 1.0));
    }
}
