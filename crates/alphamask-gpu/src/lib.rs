pub mod context;
pub mod error;
pub mod mask_pass;
pub mod shader;

pub use context::GpuContext;
pub use error::GpuError;
pub use mask_pass::MaskPass;
