use crate::RenderError;
use walksim_assets::TextureImage;

/// A sampled 2D texture resident on the GPU.
pub(crate) struct GpuTexture {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Reject images the device cannot hold before wgpu's validation does.
pub(crate) fn check_size(image: &TextureImage, max_dimension: u32) -> Result<(), RenderError> {
    if image.width == 0 || image.height == 0 {
        return Err(RenderError::TextureUpload(format!(
            "texture is empty ({}x{})",
            image.width, image.height
        )));
    }
    if image.width > max_dimension || image.height > max_dimension {
        return Err(RenderError::TextureUpload(format!(
            "texture is {}x{}, device limit is {max_dimension}x{max_dimension}",
            image.width, image.height
        )));
    }
    Ok(())
}

impl GpuTexture {
    /// Upload an RGBA8 image as an sRGB texture with nearest filtering.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &TextureImage,
    ) -> Result<Self, RenderError> {
        check_size(image, device.limits().max_texture_dimension_2d)?;

        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("base_color_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.row_bytes()),
                rows_per_image: Some(image.height),
            },
            size,
        );
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::TextureUpload(err.to_string()));
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("base_color_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        tracing::debug!("uploaded texture {}x{}", image.width, image.height);

        Ok(Self { view, sampler })
    }
}
