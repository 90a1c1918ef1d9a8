//! `wgpu` compute implementation of the Filter2D accelerator.

use std::sync::mpsc;

use anyhow::{ensure, Context, Result};
use bytemuck::{bytes_of, cast_slice};
use filter_core::{
    gpu::{pack_words, unpack_words, Filter2dParams},
    Accelerator, FilterCall,
};
use filter_shaders::compute;
use tracing::{debug, info};
use wgpu::{
    util::DeviceExt, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType, BufferBindingType,
    BufferUsages, CommandEncoderDescriptor, ComputePassDescriptor, ComputePipeline,
    ComputePipelineDescriptor, Device, DeviceDescriptor, Features, Instance, Limits,
    PipelineLayoutDescriptor, Queue, RequestAdapterOptions, ShaderStages,
};

/// Owns the device, queue and compiled pipeline; reusable across calls.
pub struct GpuFilter {
    device: Device,
    queue: Queue,
    layout: BindGroupLayout,
    pipeline: ComputePipeline,
    adapter_name: String,
}

impl GpuFilter {
    /// Blocking constructor; fails when no adapter or device is available.
    pub fn new() -> Result<Self> {
        pollster::block_on(Self::new_async())
    }

    pub async fn new_async() -> Result<Self> {
        let instance = Instance::default();
        let adapter = instance
            .request_adapter(&RequestAdapterOptions::default())
            .await
            .context("no compatible GPU adapter found for the filter2d accelerator")?;
        let adapter_info = adapter.get_info();
        info!(
            adapter = %adapter_info.name,
            backend = ?adapter_info.backend,
            "selected GPU adapter"
        );

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("filter2d_device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_defaults(),
                ..Default::default()
            })
            .await
            .context("failed to request wgpu device")?;

        let buffer_entry = |binding, ty: BufferBindingType| BindGroupLayoutEntry {
            binding,
            visibility: ShaderStages::COMPUTE,
            ty: BindingType::Buffer {
                ty,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Filter2dBindGroupLayout"),
            entries: &[
                buffer_entry(0, BufferBindingType::Uniform),
                buffer_entry(1, BufferBindingType::Storage { read_only: true }),
                buffer_entry(2, BufferBindingType::Storage { read_only: true }),
                buffer_entry(3, BufferBindingType::Storage { read_only: false }),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Filter2dPipelineLayout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("filter2d.wgsl"),
            source: wgpu::ShaderSource::Wgsl(compute::FILTER2D.into()),
        });

        let pipeline = device.create_compute_pipeline(&ComputePipelineDescriptor {
            label: Some("Filter2dPipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some(compute::FILTER2D_ENTRY),
            compilation_options: Default::default(),
            cache: None,
        });

        Ok(Self {
            device,
            queue,
            layout,
            pipeline,
            adapter_name: adapter_info.name,
        })
    }

    /// Name reported by the adapter driving this filter.
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    fn dispatch(&self, call: &FilterCall<'_>, src: &[u8], dst: &mut [u8]) -> Result<()> {
        let len = call.buffer_len();
        let src_words = pack_words(&src[..len]);
        let coeff_words = pack_words(call.kernel.as_raw_bytes());
        let output_size = (src_words.len() * std::mem::size_of::<u32>()) as wgpu::BufferAddress;

        let max_binding = u64::from(self.device.limits().max_storage_buffer_binding_size);
        ensure!(
            output_size <= max_binding,
            "image of {len} bytes exceeds the device storage binding limit of {max_binding} bytes"
        );

        let (groups_x, groups_y) = workgroup_grid(src_words.len(), &self.device.limits())?;
        let params = Filter2dParams::from_call(call, groups_x);
        debug!(
            words = src_words.len(),
            groups_x, groups_y, "dispatching filter2d kernel"
        );

        let params_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Filter2dParams"),
                contents: bytes_of(&params),
                usage: BufferUsages::UNIFORM,
            });
        let coeff_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Filter2dCoefficients"),
                contents: cast_slice(&coeff_words),
                usage: BufferUsages::STORAGE,
            });
        let src_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Filter2dSource"),
                contents: cast_slice(&src_words),
                usage: BufferUsages::STORAGE,
            });
        let dst_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Filter2dDestination"),
            size: output_size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let staging_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Filter2dStaging"),
            size: output_size,
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&BindGroupDescriptor {
            label: Some("Filter2dBindGroup"),
            layout: &self.layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: coeff_buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 2,
                    resource: src_buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 3,
                    resource: dst_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Filter2dEncoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&ComputePassDescriptor::default());
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(groups_x, groups_y, 1);
        }
        encoder.copy_buffer_to_buffer(&dst_buffer, 0, &staging_buffer, 0, output_size);
        self.queue.submit(Some(encoder.finish()));

        let buffer_slice = staging_buffer.slice(..);
        let (sender, receiver) = mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device
            .poll(wgpu::PollType::Wait)
            .context("failed to wait for the filter2d dispatch")?;
        receiver
            .recv()
            .context("readback callback was dropped before completing")?
            .context("failed to map filter2d readback buffer")?;

        {
            let data = buffer_slice.get_mapped_range();
            let words: &[u32] = cast_slice(&data);
            unpack_words(words, &mut dst[..len]);
        }
        staging_buffer.unmap();
        Ok(())
    }
}

impl Accelerator for GpuFilter {
    fn name(&self) -> &str {
        "gpu"
    }

    fn filter2d(&mut self, call: &FilterCall<'_>, src: &[u8], dst: &mut [u8]) -> Result<()> {
        call.validate(src, dst)?;
        self.dispatch(call, src, dst)
    }
}

/// Splits the word count into a 2D workgroup grid that respects the per-dimension limit.
fn workgroup_grid(words: usize, limits: &Limits) -> Result<(u32, u32)> {
    let groups = words.div_ceil(compute::FILTER2D_WORKGROUP_SIZE as usize).max(1);
    let max_per_dim = limits.max_compute_workgroups_per_dimension as usize;
    let groups_x = groups.min(max_per_dim);
    let groups_y = groups.div_ceil(groups_x);
    ensure!(
        groups_y <= max_per_dim,
        "filter2d dispatch of {groups} workgroups exceeds the device grid"
    );
    Ok((groups_x as u32, groups_y as u32))
}
