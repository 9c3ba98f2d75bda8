//! Heightmap sampling and terrain mesh construction.
//!
//! The terrain is a grid of independent quads laid over a grayscale image. Each quad spans
//! `step` pixels and carries its own four vertices, so neighbouring quads may pick
//! different atlas tiles without UV seams bleeding into each other.
//!
//! Heights are negated (`-sample * height_scale`): bright pixels become valleys. The
//! camera height follow in [`crate::game::collision`] samples the same image with the
//! same sign so the player walks on the rendered surface.

use crate::assets::AssetError;
use crate::math::vec::Vec3;
use crate::renderer::mesh::MeshData;
use crate::renderer::vertex::Vertex;
use image::DynamicImage;
use std::path::Path;

/// Pixel spacing between terrain vertices.
pub const STEP: usize = 10;

/// World units of height per sample value.
pub const HEIGHT_SCALE: f32 = 0.25;

/// Vertical placement of the terrain model.
pub const BASE_Y: f32 = -10.0;

/// Horizontal world units per heightmap pixel.
pub const HORIZONTAL_SCALE: f32 = 0.5;

/// Tiles per side of the terrain texture atlas.
const ATLAS_TILES: f32 = 16.0;

/// A grayscale height image.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    width: usize,
    height: usize,
    samples: Vec<u8>,
}

impl HeightMap {
    /// Builds a height map from raw row-major samples.
    ///
    /// Returns `None` if `samples` does not hold exactly `width * height` values or either
    /// dimension is zero.
    pub fn from_samples(width: usize, height: usize, samples: Vec<u8>) -> Option<Self> {
        (width > 0 && height > 0 && samples.len() == width * height).then_some(Self {
            width,
            height,
            samples,
        })
    }

    /// Converts any decoded image to 8-bit luminance.
    pub fn from_image(image: DynamicImage) -> Self {
        let luma = image.into_luma8();
        let (width, height) = (luma.width() as usize, luma.height() as usize);
        Self {
            width,
            height,
            samples: luma.into_raw(),
        }
    }

    /// Loads and converts the image at `path`.
    ///
    /// # Errors
    /// [`AssetError::Io`] or [`AssetError::Image`] if the file is missing or undecodable.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let bytes = std::fs::read(path).map_err(|e| AssetError::io(path, e))?;
        let image = image::load_from_memory(&bytes).map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::from_image(image);
        log::info!(
            "Loaded heightmap {} ({}x{})",
            path.display(),
            map.width,
            map.height
        );
        Ok(map)
    }

    /// Image width in pixels (X).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels (Z).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample at pixel `(x, z)`, clamped to the image edges.
    pub fn sample(&self, x: i64, z: i64) -> u8 {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let z = z.clamp(0, self.height as i64 - 1) as usize;
        self.samples[z * self.width + x]
    }

    /// Sample under a world-space XZ position on the placed terrain.
    ///
    /// The position is mapped into pixel space with
    /// `(world + (dim / 2) * 0.5) / 0.5`, clamped into the image and truncated.
    pub fn sample_at_world(&self, world_x: f32, world_z: f32) -> u8 {
        let to_pixel = |world: f32, dim: usize| {
            let local = (world + (dim as f32 / 2.0) * HORIZONTAL_SCALE) / HORIZONTAL_SCALE;
            local.clamp(0.0, (dim - 1) as f32) as i64
        };
        self.sample(to_pixel(world_x, self.width), to_pixel(world_z, self.height))
    }
}

/// Atlas tile origin for a normalised height, in UV units.
///
/// | height  | tile         |
/// |---------|--------------|
/// | > 0.9   | snow (2, 11) |
/// | > 0.8   | ice (3, 11)  |
/// | > 0.5   | rock (0, 14) |
/// | > 0.3   | soil (2, 15) |
/// | else    | grass (0, 11)|
pub fn subtexture_by_height(height: f32) -> [f32; 2] {
    let tile = if height > 0.9 {
        [2.0, 11.0]
    } else if height > 0.8 {
        [3.0, 11.0]
    } else if height > 0.5 {
        [0.0, 14.0]
    } else if height > 0.3 {
        [2.0, 15.0]
    } else {
        [0.0, 11.0]
    };
    [tile[0] / ATLAS_TILES, tile[1] / ATLAS_TILES]
}

/// Builds the terrain mesh in heightmap pixel space.
///
/// Quads start at every multiple of `step` strictly below `dim - step` on each axis, so the
/// last partial strip of pixels is only covered when it is at least one pixel wide.
/// A `step` of zero, or an image no larger than `step`, yields an empty mesh.
///
/// Per quad the vertices are TL, TR, BR, BL with normals `navg, n1, navg, n2`, where
/// `n1` and `n2` are the normals of the two triangles and `navg` their normalised sum.
pub fn build_mesh(map: &HeightMap, step: usize, height_scale: f32) -> MeshData {
    let mut mesh = MeshData::default();
    if step == 0 {
        return mesh;
    }

    let tile = 1.0 / ATLAS_TILES;
    let height_at = |x: usize, z: usize| -(map.sample(x as i64, z as i64) as f32) * height_scale;

    for x in (0..map.width.saturating_sub(step)).step_by(step) {
        for z in (0..map.height.saturating_sub(step)).step_by(step) {
            let (x0, z0) = (x as f32, z as f32);
            let (x1, z1) = ((x + step) as f32, (z + step) as f32);

            let h0 = height_at(x, z);
            let h1 = height_at(x + step, z);
            let h2 = height_at(x + step, z + step);
            let h3 = height_at(x, z + step);

            let p0 = Vec3::new(x0, h0, z0);
            let p1 = Vec3::new(x1, h1, z0);
            let p2 = Vec3::new(x1, h2, z1);
            let p3 = Vec3::new(x0, h3, z1);

            let n1 = (p1 - p0).cross(&(p2 - p0)).normalize();
            let n2 = (p2 - p0).cross(&(p3 - p0)).normalize();
            let navg = (n1 + n2).normalize();

            let max_h = h0.max(h1).max(h2).max(h3) / (255.0 * height_scale);
            let [u, v] = subtexture_by_height(max_h);

            let base = mesh.vertices.len() as u32;
            mesh.vertices.extend([
                Vertex::new(p0.0, navg.0, [u, v]),
                Vertex::new(p1.0, n1.0, [u + tile, v]),
                Vertex::new(p2.0, navg.0, [u + tile, v + tile]),
                Vertex::new(p3.0, n2.0, [u, v + tile]),
            ]);
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    log::debug!(
        "Terrain mesh: {} vertices, {} indices",
        mesh.vertices.len(),
        mesh.indices.len()
    );
    mesh
}

/// World transform that centres the terrain under the maze.
///
/// # Returns
/// `(origin, scale)`: origin `(-(W/2)*0.5, -10, -(H/2)*0.5)`, scale `(0.5, 1, 0.5)`.
pub fn terrain_placement(map: &HeightMap) -> (Vec3, Vec3) {
    let origin = Vec3::new(
        -(map.width as f32 / 2.0) * HORIZONTAL_SCALE,
        BASE_Y,
        -(map.height as f32 / 2.0) * HORIZONTAL_SCALE,
    );
    let scale = Vec3::new(HORIZONTAL_SCALE, 1.0, HORIZONTAL_SCALE);
    (origin, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat(width: usize, height: usize, value: u8) -> HeightMap {
        HeightMap::from_samples(width, height, vec![value; width * height]).expect("sized")
    }

    /// 100x100 at step 10 gives 9x9 quads; 101x101 picks up the extra strip.
    #[test]
    fn test_quad_counts() {
        let mesh = build_mesh(&flat(100, 100, 0), 10, HEIGHT_SCALE);
        assert_eq!(mesh.vertices.len(), 9 * 9 * 4);
        assert_eq!(mesh.indices.len(), 9 * 9 * 6);

        let mesh = build_mesh(&flat(101, 101, 0), 10, HEIGHT_SCALE);
        assert_eq!(mesh.vertices.len(), 10 * 10 * 4);

        let mesh = build_mesh(&flat(100, 40, 0), 10, HEIGHT_SCALE);
        assert_eq!(mesh.indices.len(), 9 * 3 * 6);
    }

    #[test]
    fn test_degenerate_inputs_give_empty_mesh() {
        assert!(build_mesh(&flat(10, 10, 0), 10, HEIGHT_SCALE).vertices.is_empty());
        assert!(build_mesh(&flat(5, 50, 0), 10, HEIGHT_SCALE).vertices.is_empty());
        assert!(build_mesh(&flat(50, 50, 0), 0, HEIGHT_SCALE).vertices.is_empty());
    }

    /// Indices follow 0,1,2, 0,2,3 from each quad's base.
    #[test]
    fn test_index_pattern() {
        let mesh = build_mesh(&flat(30, 21, 0), 10, HEIGHT_SCALE);
        assert_eq!(mesh.indices[..6], [0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.indices[6..12], [4, 5, 6, 4, 6, 7]);
    }

    /// Heights are negated and scaled; positions stay in pixel space.
    #[test]
    fn test_heights_and_positions() {
        let mesh = build_mesh(&flat(21, 21, 200), 10, HEIGHT_SCALE);
        let v = &mesh.vertices;
        assert_eq!(v[0].position, [0.0, -50.0, 0.0]);
        assert_eq!(v[1].position, [10.0, -50.0, 0.0]);
        assert_eq!(v[2].position, [10.0, -50.0, 10.0]);
        assert_eq!(v[3].position, [0.0, -50.0, 10.0]);
    }

    /// Flat terrain gets identical per-vertex normals, facing -Y under this winding.
    #[test]
    fn test_flat_normals() {
        let mesh = build_mesh(&flat(21, 21, 64), 10, HEIGHT_SCALE);
        for v in &mesh.vertices {
            assert_relative_eq!(v.normal[0], 0.0);
            assert_relative_eq!(v.normal[1], -1.0);
            assert_relative_eq!(v.normal[2], 0.0);
        }
    }

    #[test]
    fn test_atlas_bands() {
        let t = 1.0 / 16.0;
        assert_eq!(subtexture_by_height(0.95), [2.0 * t, 11.0 * t]);
        assert_eq!(subtexture_by_height(0.85), [3.0 * t, 11.0 * t]);
        assert_eq!(subtexture_by_height(0.6), [0.0, 14.0 * t]);
        assert_eq!(subtexture_by_height(0.4), [2.0 * t, 15.0 * t]);
        assert_eq!(subtexture_by_height(0.3), [0.0, 11.0 * t]);
        assert_eq!(subtexture_by_height(-1.0), [0.0, 11.0 * t]);
    }

    /// Negated heights are never positive, so every quad lands on grass.
    #[test]
    fn test_quads_resolve_to_grass() {
        let mesh = build_mesh(&flat(21, 21, 255), 10, HEIGHT_SCALE);
        let t = 1.0 / 16.0;
        assert_eq!(mesh.vertices[0].tex_coords, [0.0, 11.0 * t]);
        assert_eq!(mesh.vertices[2].tex_coords, [t, 12.0 * t]);
    }

    #[test]
    fn test_clamped_sampling() {
        let map = HeightMap::from_samples(2, 2, vec![1, 2, 3, 4]).expect("sized");
        assert_eq!(map.sample(-10, -10), 1);
        assert_eq!(map.sample(10, 0), 2);
        assert_eq!(map.sample(0, 10), 3);
        assert_eq!(map.sample(99, 99), 4);
    }

    /// World origin maps to the image centre; far positions clamp to the edge.
    #[test]
    fn test_sample_at_world() {
        let mut samples = vec![0; 100 * 100];
        samples[50 * 100 + 50] = 77;
        samples[99 * 100 + 99] = 9;
        let map = HeightMap::from_samples(100, 100, samples).expect("sized");
        assert_eq!(map.sample_at_world(0.0, 0.0), 77);
        assert_eq!(map.sample_at_world(1000.0, 1000.0), 9);
    }

    #[test]
    fn test_from_samples_rejects_bad_sizes() {
        assert!(HeightMap::from_samples(2, 2, vec![0; 3]).is_none());
        assert!(HeightMap::from_samples(0, 2, vec![]).is_none());
    }

    #[test]
    fn test_placement() {
        let (origin, scale) = terrain_placement(&flat(200, 100, 0));
        assert_eq!(origin, Vec3::new(-50.0, -10.0, -25.0));
        assert_eq!(scale, Vec3::new(0.5, 1.0, 0.5));
    }
}
