// Error types for BoxPick-3D

use thiserror::Error;

use crate::scene::IdColor;

/// Errors raised while bringing up or driving the window and GPU.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The platform event loop could not be created or exited abnormally.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The window could not be created.
    #[error("failed to create window: {0}")]
    WindowCreationFailed(#[from] winit::error::OsError),

    /// Failed to create surface.
    #[error("failed to create surface: {0}")]
    SurfaceCreationFailed(#[from] wgpu::CreateSurfaceError),

    /// No adapter can present to the window surface.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// The surface reports no usable texture format.
    #[error("surface configuration failed")]
    SurfaceConfigurationFailed,

    /// Surface lost or outdated; reconfigure and draw again.
    #[error("surface lost")]
    SurfaceLost,

    /// Out of memory.
    #[error("out of memory")]
    OutOfMemory,

    /// Timeout waiting for GPU.
    #[error("timeout waiting for GPU")]
    Timeout,

    /// Mapping the pick staging buffer failed.
    #[error("pick readback failed: {0}")]
    Readback(#[from] wgpu::BufferAsyncError),
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(err: wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::SurfaceLost,
            wgpu::SurfaceError::OutOfMemory => Self::OutOfMemory,
            wgpu::SurfaceError::Timeout => Self::Timeout,
        }
    }
}

/// Errors raised while assembling a scene.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// Two objects were given the same id color.
    #[error("id color {color} is used by objects {first} and {second}")]
    DuplicateIdColor {
        color: IdColor,
        first: usize,
        second: usize,
    },

    /// An object's id color equals the background clear color.
    #[error("id color {color} of object {index} equals the background color")]
    IdColorIsBackground { color: IdColor, index: usize },
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
