//! GPU bring-up for a single canvas or window.
//!
//! Limits are requested at the WebGL2 downlevel baseline so the same
//! context opens in browsers without WebGPU.

use std::fmt;

/// Why a canvas could not get a GPU context.
#[derive(Debug)]
pub enum RenderContextError {
    /// The canvas or window refused a surface.
    Surface(wgpu::CreateSurfaceError),
    /// No adapter can present to the surface.
    Adapter(wgpu::RequestAdapterError),
    /// The adapter would not open a device at the baseline limits.
    Device(wgpu::RequestDeviceError),
    /// The surface reports no usable configuration.
    NoSurfaceConfig,
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(e) => write!(f, "cannot create surface: {e}"),
            Self::Adapter(e) => write!(f, "no adapter for surface: {e}"),
            Self::Device(e) => write!(f, "cannot open device: {e}"),
            Self::NoSurfaceConfig => f.write_str("surface has no usable config"),
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            Self::Adapter(e) => Some(e),
            Self::Device(e) => Some(e),
            Self::NoSurfaceConfig => None,
        }
    }
}

/// Device, queue and swapchain of one canvas.
pub struct RenderContext {
    /// Logical device.
    pub device: wgpu::Device,
    /// Submission queue.
    pub queue: wgpu::Queue,
    surface: Option<wgpu::Surface<'static>>,
    config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    /// Open a context presenting to `target`, sized `size` physical pixels.
    ///
    /// # Errors
    ///
    /// Any step of surface, adapter or device setup failing.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(target)
            .map_err(RenderContextError::Surface)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::Adapter)?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Visualiser Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::Device)?;

        let config = swapchain_config(&surface, &adapter, size)?;
        surface.configure(&device, &config);
        log::info!(
            "GPU context {}x{} {:?} on {}",
            config.width,
            config.height,
            config.format,
            adapter.get_info().name
        );
        Ok(Self {
            device,
            queue,
            surface: Some(surface),
            config,
        })
    }

    /// Swapchain format.
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Swapchain size in physical pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Follow a canvas resize. A zero dimension leaves the swapchain alone.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    /// Configure the swapchain again, e.g. after it was lost.
    pub fn reconfigure(&self) {
        if let Some(surface) = &self.surface {
            surface.configure(&self.device, &self.config);
        }
    }

    /// Next swapchain image.
    ///
    /// # Errors
    ///
    /// The surface error, or [`wgpu::SurfaceError::Lost`] once the surface
    /// has been released.
    pub fn acquire_frame(
        &self,
    ) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        match &self.surface {
            Some(surface) => surface.get_current_texture(),
            None => Err(wgpu::SurfaceError::Lost),
        }
    }

    /// Detach from the canvas.
    pub fn release_surface(&mut self) {
        self.surface = None;
    }

    /// Fresh command encoder.
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Room Encoder"),
            })
    }

    /// Finish `encoder` and queue it.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Default config for `surface`, preferring an sRGB format, with vsync.
fn swapchain_config(
    surface: &wgpu::Surface<'_>,
    adapter: &wgpu::Adapter,
    (width, height): (u32, u32),
) -> Result<wgpu::SurfaceConfiguration, RenderContextError> {
    let mut config = surface
        .get_default_config(adapter, width.max(1), height.max(1))
        .ok_or(RenderContextError::NoSurfaceConfig)?;
    if let Some(srgb) = surface
        .get_capabilities(adapter)
        .formats
        .into_iter()
        .find(wgpu::TextureFormat::is_srgb)
    {
        config.format = srgb;
    }
    config.present_mode = wgpu::PresentMode::Fifo;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn missing_surface_config_reads_plainly() {
        let e = RenderContextError::NoSurfaceConfig;
        assert_eq!(e.to_string(), "surface has no usable config");
        assert!(e.source().is_none());
    }
}
