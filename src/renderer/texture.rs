//! GPU textures with a full mip chain.
//!
//! Mip levels are produced on the CPU with `image::imageops::resize`, since wgpu has no
//! built-in mipmap generation. Every texture is sampled with repeat addressing and
//! trilinear filtering.

use crate::assets::texture::TextureImage;
use image::RgbaImage;
use image::imageops::{self, FilterType};

/// One level of a mip chain: width, height and tightly packed RGBA pixels.
pub type MipLevel = (u32, u32, Vec<u8>);

/// Number of levels down to 1x1 for a `width` x `height` base image.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Builds every mip level from an RGBA base image, largest first.
///
/// Returns an empty chain if `rgba` does not hold `width * height` pixels.
pub fn mip_chain(width: u32, height: u32, rgba: Vec<u8>) -> Vec<MipLevel> {
    let Some(base) = RgbaImage::from_raw(width, height, rgba) else {
        return Vec::new();
    };

    let levels = mip_level_count(width, height);
    let mut chain = Vec::with_capacity(levels as usize);
    let mut current = base;
    for _ in 1..levels {
        let (w, h) = ((current.width() / 2).max(1), (current.height() / 2).max(1));
        let next = imageops::resize(&current, w, h, FilterType::Triangle);
        chain.push((current.width(), current.height(), current.into_raw()));
        current = next;
    }
    chain.push((current.width(), current.height(), current.into_raw()));
    chain
}

/// An uploaded texture with its sampler and bind group.
pub struct GpuTexture {
    /// Texture with its full mip chain.
    pub texture: wgpu::Texture,
    /// View over every mip level.
    pub view: wgpu::TextureView,
    /// Repeating trilinear sampler.
    pub sampler: wgpu::Sampler,
    /// Texture and sampler bound at group 2.
    pub bind_group: wgpu::BindGroup,
}

impl GpuTexture {
    /// Uploads a decoded image as an sRGB texture with mipmaps.
    ///
    /// RGB images are expanded to RGBA first; wgpu has no three-channel format.
    ///
    /// # Arguments
    /// * `layout` - Texture bind group layout: texture at binding 0, sampler at binding 1
    /// * `label` - Debug label, usually the file name
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        image: &TextureImage,
        label: &str,
    ) -> Self {
        let chain = mip_chain(image.width, image.height, image.to_rgba());
        Self::from_levels(device, queue, layout, &chain, label)
    }

    /// A 1x1 opaque white texture, bound when a drawable has no texture of its own.
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue, layout: &wgpu::BindGroupLayout) -> Self {
        Self::from_levels(
            device,
            queue,
            layout,
            &[(1, 1, vec![u8::MAX; 4])],
            "Fallback White Texture",
        )
    }

    fn from_levels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        levels: &[MipLevel],
        label: &str,
    ) -> Self {
        let (width, height) = levels.first().map_or((1, 1), |(w, h, _)| (*w, *h));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len().max(1) as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, (w, h, pixels)) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                },
                pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * w),
                    rows_per_image: Some(*h),
                },
                wgpu::Extent3d {
                    width: *w,
                    height: *h,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
            label: Some(label),
        });

        Self {
            texture,
            view,
            sampler,
            bind_group,
        }
    }

    /// Releases the GPU memory immediately.
    pub fn dispose(self) {
        self.texture.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mip_level_count() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(300, 20), 9);
        assert_eq!(mip_level_count(0, 0), 1);
    }

    /// Each level halves both sides, never below one pixel.
    #[test]
    fn test_mip_chain_sizes() {
        let chain = mip_chain(8, 2, vec![200; 8 * 2 * 4]);
        let sizes: Vec<_> = chain.iter().map(|(w, h, _)| (*w, *h)).collect();
        assert_eq!(sizes, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
        assert!(chain.iter().all(|(w, h, p)| p.len() == (w * h * 4) as usize));
    }

    /// A uniform image stays uniform at every level.
    #[test]
    fn test_mip_chain_preserves_flat_color() {
        let chain = mip_chain(4, 4, [10u8, 20, 30, 255].repeat(16));
        let (_, _, last) = chain.last().expect("at least one level");
        assert_eq!(last, &vec![10, 20, 30, 255]);
    }

    #[test]
    fn test_mip_chain_rejects_short_buffer() {
        assert!(mip_chain(4, 4, vec![0; 7]).is_empty());
    }
}
