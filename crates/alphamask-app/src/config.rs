use alphamask_core::image::Image;
use alphamask_core::pattern::{self, NoiseConfig};
use alphamask_core::sampler::{AddressMode, FilterMode, Sampler};
use alphamask_core::CoreError;
use clap::{Parser, ValueEnum};

// ---------------------------------------------------------------------------
// Args — command-line configuration
// ---------------------------------------------------------------------------

/// Classify a procedural alpha pattern into a red/blue mask on the CPU and
/// the GPU and check that both agree.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about)]
pub struct Args {
    /// Render target width in pixels.
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Render target height in pixels.
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Source texture pattern.
    #[arg(long, value_enum, default_value_t = PatternKind::Disc)]
    pub pattern: PatternKind,

    /// Checkerboard cell size in texels.
    #[arg(long, default_value_t = 32)]
    pub cell: u32,

    /// Disc radius in texels. Defaults to a quarter of the shorter side.
    #[arg(long)]
    pub radius: Option<f32>,

    /// Noise seed.
    #[arg(long, default_value_t = 1337)]
    pub seed: i32,

    /// Noise frequency in cycles per texel.
    #[arg(long, default_value_t = 0.02)]
    pub frequency: f32,

    /// Noise values above this become opaque.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub threshold: f32,

    #[arg(long, value_enum, default_value_t = FilterArg::Nearest)]
    pub filter: FilterArg,

    #[arg(long, value_enum, default_value_t = AddressArg::Clamp)]
    pub address: AddressArg,

    /// Skip the GPU pass.
    #[arg(long)]
    pub cpu_only: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Checkerboard,
    Disc,
    Noise,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterArg {
    Nearest,
    Linear,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressArg {
    Clamp,
    Repeat,
    Mirror,
}

impl Args {
    pub fn sampler(&self) -> Sampler {
        let address_mode = match self.address {
            AddressArg::Clamp => AddressMode::ClampToEdge,
            AddressArg::Repeat => AddressMode::Repeat,
            AddressArg::Mirror => AddressMode::MirrorRepeat,
        };
        let filter = match self.filter {
            FilterArg::Nearest => FilterMode::Nearest,
            FilterArg::Linear => FilterMode::Linear,
        };
        Sampler::new(address_mode, filter)
    }

    /// Source texture, sized to match the render target.
    pub fn build_pattern(&self) -> Result<Image, CoreError> {
        let (w, h) = (self.width, self.height);
        match self.pattern {
            PatternKind::Checkerboard => pattern::checkerboard(w, h, self.cell),
            PatternKind::Disc => {
                let radius = self.radius.unwrap_or(w.min(h) as f32 * 0.25);
                pattern::disc(w, h, radius)
            }
            PatternKind::Noise => pattern::noise_mask(
                w,
                h,
                NoiseConfig {
                    seed: self.seed,
                    frequency: self.frequency,
                    threshold: self.threshold,
                },
            ),
        }
    }
}
