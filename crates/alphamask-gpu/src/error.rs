use alphamask_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("{width}x{height} texture exceeds the device limit of {max} texels per side")]
    TextureTooLarge { width: u32, height: u32, max: u32 },

    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to map readback buffer: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("readback callback was dropped before completing")]
    MapChannelClosed,

    #[error(transparent)]
    Core(#[from] CoreError),
}
