//! wgpu forward renderer implementing [`RenderBackend`].
//!
//! One pass per frame: a full-screen environment backdrop, then every
//! opaque mesh, then transparent meshes with alpha blending and depth
//! writes off. Each mesh owns a small uniform buffer and a bind group
//! holding its base texture; the bind group is rebuilt only when the
//! material's texture changes.

use std::mem::size_of;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;

use super::backend::{
    DrawItem, EnvironmentDesc, FrameView, MeshId, RenderBackend, TextureDesc,
    TextureId,
};
use super::pipeline_helpers::{
    create_depth_view, create_pipeline, depth_stencil_state, filtering_sampler,
    linear_sampler, texture_2d, uniform_buffer, PipelineSpec,
};
use super::render_context::RenderContext;
use crate::material::{Material, MaterialId, Shading};
use crate::scene::MeshData;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct GlobalsUniform {
    view_proj: [[f32; 4]; 4],
    inv_view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    ambient: [f32; 4],
    key_color: [f32; 4],
    key_direction: [f32; 4],
    clear_color: [f32; 4],
}

impl GlobalsUniform {
    fn from_frame(frame: &FrameView<'_>, has_environment: bool) -> Self {
        let view_proj = frame.proj * frame.view;
        let l = &frame.lighting;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            inv_view_proj: view_proj.inverse().to_cols_array_2d(),
            eye: frame.eye.extend(l.exposure).to_array(),
            ambient: l
                .ambient
                .extend(if l.tone_mapping { 1.0 } else { 0.0 })
                .to_array(),
            key_color: l.key_color.extend(0.0).to_array(),
            key_direction: l
                .key_direction
                .normalize_or(Vec3::Y)
                .extend(if has_environment { 1.0 } else { 0.0 })
                .to_array(),
            clear_color: l.clear_color.extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct DrawUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    emissive: [f32; 4],
    pbr: [f32; 4],
    params: [f32; 4],
    uv: [f32; 4],
}

impl DrawUniform {
    fn new(world: Mat4, m: &Material) -> Self {
        let shading = match m.shading {
            Shading::Unlit => 0.0,
            Shading::Standard => 1.0,
            Shading::Physical => 2.0,
        };
        let opacity = if m.transparent { m.opacity } else { 1.0 };
        Self {
            model: world.to_cols_array_2d(),
            color: m.color.extend(opacity).to_array(),
            emissive: m.emissive.extend(m.emissive_intensity).to_array(),
            pbr: [m.roughness, m.metalness, m.env_map_intensity, m.transmission],
            params: [shading, m.clearcoat, m.specular_intensity, 0.0],
            uv: [m.uv_scale.x, m.uv_scale.y, 0.0, 0.0],
        }
    }
}

struct GpuTexture {
    view: wgpu::TextureView,
}

struct GpuMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

struct DrawSlot {
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    map: Option<TextureId>,
    material: MaterialId,
}

/// GPU backend drawing the room to a window or canvas surface.
pub struct WgpuBackend {
    context: RenderContext,
    depth: wgpu::TextureView,
    globals_buffer: wgpu::Buffer,
    globals_layout: wgpu::BindGroupLayout,
    globals_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    background: wgpu::RenderPipeline,
    opaque: wgpu::RenderPipeline,
    transparent: wgpu::RenderPipeline,
    color_sampler: wgpu::Sampler,
    env_sampler: wgpu::Sampler,
    white: GpuTexture,
    black_env: GpuTexture,
    textures: Vec<GpuTexture>,
    meshes: Vec<GpuMesh>,
    slots: FxHashMap<MeshId, DrawSlot>,
    bound_environment: Option<TextureId>,
    disposed: bool,
}

impl WgpuBackend {
    /// Build pipelines and placeholder resources on `context`.
    #[must_use]
    pub fn new(context: RenderContext) -> Self {
        let device = &context.device;
        let (width, height) = context.size();

        let globals_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Globals Layout"),
                entries: &[
                    uniform_buffer(0),
                    texture_2d(1),
                    filtering_sampler(2),
                ],
            });
        let draw_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Draw Layout"),
                entries: &[
                    uniform_buffer(0),
                    texture_2d(1),
                    filtering_sampler(2),
                ],
            });

        let room_shader =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Room Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../../assets/shaders/room.wgsl").into(),
                ),
            });
        let background_shader =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Background Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../../assets/shaders/background.wgsl")
                        .into(),
                ),
            });

        let format = context.format();
        let vertex_layouts = [Vertex::layout()];
        let background = create_pipeline(
            device,
            &background_shader,
            format,
            &[&globals_layout],
            PipelineSpec {
                label: "Background",
                buffers: &[],
                blend: None,
                depth: depth_stencil_state(
                    false,
                    wgpu::CompareFunction::Always,
                ),
                cull_mode: None,
            },
        );
        let opaque = create_pipeline(
            device,
            &room_shader,
            format,
            &[&globals_layout, &draw_layout],
            PipelineSpec {
                label: "Room Opaque",
                buffers: &vertex_layouts,
                blend: None,
                depth: depth_stencil_state(true, wgpu::CompareFunction::Less),
                cull_mode: None,
            },
        );
        let transparent = create_pipeline(
            device,
            &room_shader,
            format,
            &[&globals_layout, &draw_layout],
            PipelineSpec {
                label: "Room Transparent",
                buffers: &vertex_layouts,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                depth: depth_stencil_state(false, wgpu::CompareFunction::Less),
                cull_mode: None,
            },
        );

        let color_sampler = linear_sampler(
            device,
            "Surface Sampler",
            wgpu::AddressMode::Repeat,
        );
        let env_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Environment Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let white = upload_rgba8(
            &context,
            "White Placeholder",
            1,
            1,
            &[255, 255, 255, 255],
            true,
        );
        let black_env = upload_rgba16f(
            &context,
            "Environment Placeholder",
            1,
            1,
            &[0.0, 0.0, 0.0, 1.0],
        );

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Uniform"),
            size: size_of::<GlobalsUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_group = globals_bind_group(
            device,
            &globals_layout,
            &globals_buffer,
            &black_env.view,
            &env_sampler,
        );
        let depth = create_depth_view(device, width, height);

        Self {
            context,
            depth,
            globals_buffer,
            globals_layout,
            globals_group,
            draw_layout,
            background,
            opaque,
            transparent,
            color_sampler,
            env_sampler,
            white,
            black_env,
            textures: Vec::new(),
            meshes: Vec::new(),
            slots: FxHashMap::default(),
            bound_environment: None,
            disposed: false,
        }
    }

    fn texture_view(&self, id: Option<TextureId>) -> &wgpu::TextureView {
        id.and_then(|id| self.textures.get(id.raw() as usize))
            .map_or(&self.white.view, |t| &t.view)
    }

    fn bind_environment(&mut self, environment: Option<TextureId>) {
        if self.bound_environment == environment {
            return;
        }
        let view = environment
            .and_then(|id| self.textures.get(id.raw() as usize))
            .map_or(&self.black_env.view, |t| &t.view);
        self.globals_group = globals_bind_group(
            &self.context.device,
            &self.globals_layout,
            &self.globals_buffer,
            view,
            &self.env_sampler,
        );
        self.bound_environment = environment;
    }

    fn prepare_draw(&mut self, draw: &DrawItem<'_>) {
        let uniform = DrawUniform::new(draw.world, draw.material);
        let map = draw.material.map;
        let stale = self
            .slots
            .get(&draw.mesh)
            .is_none_or(|s| s.map != map || s.material != draw.material_id);
        if stale {
            let device = &self.context.device;
            let buffer = match self.slots.remove(&draw.mesh) {
                Some(slot) => slot.uniform,
                None => device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Draw Uniform"),
                    size: size_of::<DrawUniform>() as wgpu::BufferAddress,
                    usage: wgpu::BufferUsages::UNIFORM
                        | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }),
            };
            let bind_group =
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Draw Bind Group"),
                    layout: &self.draw_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(
                                self.texture_view(map),
                            ),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::Sampler(
                                &self.color_sampler,
                            ),
                        },
                    ],
                });
            let _ = self.slots.insert(
                draw.mesh,
                DrawSlot {
                    uniform: buffer,
                    bind_group,
                    map,
                    material: draw.material_id,
                },
            );
        }
        if let Some(slot) = self.slots.get(&draw.mesh) {
            self.context.queue.write_buffer(
                &slot.uniform,
                0,
                bytemuck::bytes_of(&uniform),
            );
        }
    }
}

impl RenderBackend for WgpuBackend {
    fn create_texture(&mut self, desc: &TextureDesc<'_>) -> TextureId {
        let id = TextureId::from_raw(self.textures.len() as u32);
        self.textures.push(upload_rgba8(
            &self.context,
            desc.label,
            desc.width,
            desc.height,
            desc.pixels,
            desc.srgb,
        ));
        id
    }

    fn create_environment(&mut self, desc: &EnvironmentDesc<'_>) -> TextureId {
        let id = TextureId::from_raw(self.textures.len() as u32);
        self.textures.push(upload_rgba16f(
            &self.context,
            desc.label,
            desc.width,
            desc.height,
            desc.pixels,
        ));
        id
    }

    fn upload_mesh(&mut self, mesh: &MeshData) -> MeshId {
        use wgpu::util::DeviceExt;

        let vertices: Vec<Vertex> = mesh
            .positions
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex {
                position,
                normal: mesh.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                uv: mesh
                    .uvs
                    .as_ref()
                    .and_then(|uvs| uvs.get(i).copied())
                    .unwrap_or_default(),
            })
            .collect();
        let device = &self.context.device;
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Indices"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        let id = MeshId::from_raw(self.meshes.len() as u32);
        self.meshes.push(GpuMesh {
            vertices: vertex_buffer,
            indices: index_buffer,
            index_count: mesh.indices.len() as u32,
        });
        id
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || self.disposed {
            return;
        }
        self.context.resize(width, height);
        self.depth = create_depth_view(&self.context.device, width, height);
    }

    fn render(&mut self, frame: &FrameView<'_>) {
        if self.disposed {
            return;
        }
        self.bind_environment(frame.environment);
        let globals =
            GlobalsUniform::from_frame(frame, self.bound_environment.is_some());
        self.context.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&globals),
        );
        for draw in frame.draws {
            self.prepare_draw(draw);
        }

        let output = match self.context.acquire_frame() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost, reconfiguring");
                self.context.reconfigure();
                return;
            }
            Err(e) => {
                log::warn!("skipping frame: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let clear = frame.lighting.clear_color;

        let mut encoder = self.context.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Room Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r: f64::from(clear.x),
                                    g: f64::from(clear.y),
                                    b: f64::from(clear.z),
                                    a: 1.0,
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });

            pass.set_bind_group(0, &self.globals_group, &[]);
            pass.set_pipeline(&self.background);
            pass.draw(0..3, 0..1);

            let mut transparent_bound = None;
            for draw in frame.draws {
                let (Some(mesh), Some(slot)) = (
                    self.meshes.get(draw.mesh.raw() as usize),
                    self.slots.get(&draw.mesh),
                ) else {
                    continue;
                };
                let transparent = draw.material.transparent;
                if transparent_bound != Some(transparent) {
                    pass.set_pipeline(if transparent {
                        &self.transparent
                    } else {
                        &self.opaque
                    });
                    transparent_bound = Some(transparent);
                }
                pass.set_bind_group(1, &slot.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertices.slice(..));
                pass.set_index_buffer(
                    mesh.indices.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
        self.context.submit(encoder);
        output.present();
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.slots.clear();
        self.meshes.clear();
        self.textures.clear();
        self.bound_environment = None;
        self.context.release_surface();
        self.disposed = true;
        log::debug!("wgpu backend disposed");
    }
}

fn globals_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    environment: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Globals Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(environment),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn upload_rgba8(
    context: &RenderContext,
    label: &str,
    width: u32,
    height: u32,
    pixels: &[u8],
    srgb: bool,
) -> GpuTexture {
    let format = if srgb {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    };
    upload(context, label, width, height, format, 4, pixels)
}

fn upload_rgba16f(
    context: &RenderContext,
    label: &str,
    width: u32,
    height: u32,
    pixels: &[f32],
) -> GpuTexture {
    let halves: Vec<u16> = pixels
        .iter()
        .map(|&v| half::f16::from_f32(v).to_bits())
        .collect();
    upload(
        context,
        label,
        width,
        height,
        wgpu::TextureFormat::Rgba16Float,
        8,
        bytemuck::cast_slice(&halves),
    )
}

fn upload(
    context: &RenderContext,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    bytes_per_pixel: u32,
    data: &[u8],
) -> GpuTexture {
    let width = width.max(1);
    let height = height.max(1);
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = context.device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let expected = (width * height * bytes_per_pixel) as usize;
    if data.len() >= expected {
        context.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data[..expected],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * bytes_per_pixel),
                rows_per_image: Some(height),
            },
            size,
        );
    } else {
        log::warn!(
            "texture `{label}` has {} bytes, expected {expected}",
            data.len()
        );
    }
    GpuTexture {
        view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layouts_match_shader() {
        assert_eq!(size_of::<GlobalsUniform>(), 208);
        assert_eq!(size_of::<DrawUniform>(), 144);
        assert_eq!(size_of::<Vertex>(), 32);
    }

    #[test]
    fn opaque_materials_draw_at_full_opacity() {
        let mut m = Material::default();
        m.opacity = 0.3;
        let u = DrawUniform::new(Mat4::IDENTITY, &m);
        assert_eq!(u.color[3], 1.0);
        m.transparent = true;
        let u = DrawUniform::new(Mat4::IDENTITY, &m);
        assert!((u.color[3] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn shading_model_is_encoded() {
        let u = DrawUniform::new(Mat4::IDENTITY, &Material::unlit(None));
        assert_eq!(u.params[0], 0.0);
        let mut glass = Material::default();
        glass.shading = Shading::Physical;
        assert_eq!(DrawUniform::new(Mat4::IDENTITY, &glass).params[0], 2.0);
    }

    #[test]
    fn texture_repeat_is_per_axis() {
        let mut m = Material::default();
        m.uv_scale = glam::Vec2::new(4.0, 2.0);
        let u = DrawUniform::new(Mat4::IDENTITY, &m);
        assert_eq!(&u.uv[..2], &[4.0, 2.0]);
    }
}
