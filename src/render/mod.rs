pub mod colors;
pub mod scene;
pub mod shape;
pub mod surface;
pub mod text;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use vello::peniko::Color;
use vello::wgpu;
use vello::{AaConfig, AaSupport, RenderParams, Renderer, RendererOptions, Scene};
use winit::window::Window;

/// Swapchain formats vello can present into.
const PRESENTABLE_FORMATS: [wgpu::TextureFormat; 2] =
    [wgpu::TextureFormat::Rgba8Unorm, wgpu::TextureFormat::Bgra8Unorm];

/// First presentable format the surface supports, in its order of preference.
pub fn pick_surface_format(supported: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    supported
        .iter()
        .copied()
        .find(|format| PRESENTABLE_FORMATS.contains(format))
}

/// Window surface plus the vello renderer drawing into it.
pub struct RenderState {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub renderer: Renderer,
}

impl RenderState {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("No compatible GPU adapter found"))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = pick_surface_format(&caps.formats)
            .ok_or_else(|| anyhow!("Surface supports neither Rgba8Unorm nor Bgra8Unorm: {:?}", caps.formats))?;

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        // With a surface format set, vello builds its own blit pipeline for render_to_surface.
        let renderer = Renderer::new(
            &device,
            RendererOptions {
                surface_format: Some(format),
                use_cpu: false,
                antialiasing_support: AaSupport::area_only(),
                num_init_threads: None,
            },
        )
        .map_err(|e| anyhow!("Failed to create vello renderer: {e}"))?;

        tracing::info!(
            "GPU surface configured: {}x{} ({:?}) on {}",
            surface_config.width,
            surface_config.height,
            format,
            adapter.get_info().name
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            renderer,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Draw `scene` into the next swapchain image and present it.
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render(&mut self, scene: &Scene) -> Result<()> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let render_params = RenderParams {
            base_color: Color::BLACK,
            width: self.surface_config.width,
            height: self.surface_config.height,
            antialiasing_method: AaConfig::Area,
        };

        self.renderer
            .render_to_surface(&self.device, &self.queue, scene, &surface_texture, &render_params)
            .map_err(|e| anyhow!("vello render failed: {e}"))?;

        surface_texture.present();
        Ok(())
    }
}
