//! Drawable instances and their arena.
//!
//! A [`Scene`] owns every [`Drawable`] in a [`SlotMap`], keyed by [`DrawableKey`]. Drawables
//! refer to GPU meshes and textures by key only ([`MeshKey`], [`TextureKey`]), so many
//! instances share one mesh and the scene itself never touches the GPU.
//!
//! Each frame [`draw_order::DrawOrder::build`] partitions the arena into opaque and
//! back-to-front transparent lists for the renderer.

pub mod draw_order;

use crate::math::coordinates::constants::{MAZE_FLOOR_Y, MAZE_WALL_Y};
use crate::math::coordinates::maze_to_world;
use crate::math::mat::Mat4;
use crate::math::vec::Vec3;
use crate::maze::{MazeCell, MazeGrid};
use slotmap::{SlotMap, new_key_type};

pub use draw_order::DrawOrder;

new_key_type! {
    /// Handle to a [`Drawable`] in a [`Scene`].
    pub struct DrawableKey;
    /// Handle to an uploaded mesh owned by the renderer.
    pub struct MeshKey;
    /// Handle to an uploaded texture owned by the renderer.
    pub struct TextureKey;
}

/// Position, orientation (radians) and scale of an instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation.
    pub origin: Vec3,
    /// Rotation about X, then Y, then Z, in radians.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::splat(1.0),
        }
    }
}

impl Transform {
    /// Transform at `origin` with the given scale and no rotation.
    pub fn at(origin: Vec3, scale: Vec3) -> Self {
        Self {
            origin,
            scale,
            ..Default::default()
        }
    }

    /// Model matrix `T * Rx * Ry * Rz * S`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::model(self.origin, self.rotation, self.scale)
    }
}

/// Which part of the scene a drawable belongs to. Decides texture overrides and animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawGroup {
    /// Maze floor tiles and walls.
    Maze,
    /// The heightmap terrain.
    Terrain,
    /// Loaded models that move every frame.
    Animated,
    /// Floating alpha-blended cubes.
    Glass,
}

/// One placed instance of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable {
    /// Where and how the mesh is placed.
    pub transform: Transform,
    /// Drawn in the blended pass when set.
    pub transparent: bool,
    /// The instance's own texture; `None` draws with the white fallback.
    pub texture: Option<TextureKey>,
    /// Shared geometry.
    pub mesh: MeshKey,
    /// Owning group.
    pub group: DrawGroup,
}

/// Arena of every drawable in the world.
#[derive(Debug, Default)]
pub struct Scene {
    drawables: SlotMap<DrawableKey, Drawable>,
    /// Texture forced onto every opaque maze drawable.
    pub maze_texture: Option<TextureKey>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a drawable and returns its key.
    pub fn insert(&mut self, drawable: Drawable) -> DrawableKey {
        self.drawables.insert(drawable)
    }

    /// Looks up a drawable.
    pub fn get(&self, key: DrawableKey) -> Option<&Drawable> {
        self.drawables.get(key)
    }

    /// Removes a drawable, returning it if it was present.
    pub fn remove(&mut self, key: DrawableKey) -> Option<Drawable> {
        self.drawables.remove(key)
    }

    /// Iterates every drawable with its key, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (DrawableKey, &Drawable)> {
        self.drawables.iter()
    }

    /// Number of drawables.
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    /// Texture to bind when drawing `drawable` in the opaque pass.
    ///
    /// Maze drawables use [`Scene::maze_texture`] regardless of their own texture.
    pub fn opaque_texture(&self, drawable: &Drawable) -> Option<TextureKey> {
        match drawable.group {
            DrawGroup::Maze => self.maze_texture,
            _ => drawable.texture,
        }
    }

    /// Lays out the maze: a thin floor tile under every cell and a double-height cube on
    /// every wall cell, all sharing `cube`.
    ///
    /// # Returns
    /// The number of drawables added.
    pub fn populate_maze(
        &mut self,
        grid: &MazeGrid,
        cube: MeshKey,
        floor_texture: Option<TextureKey>,
    ) -> usize {
        let dims = grid.dimensions();
        let before = self.drawables.len();

        for (cell, kind) in grid.iter() {
            self.insert(Drawable {
                transform: Transform::at(
                    maze_to_world(&cell, dims, MAZE_FLOOR_Y),
                    Vec3::new(1.0, 0.05, 1.0),
                ),
                transparent: false,
                texture: floor_texture,
                mesh: cube,
                group: DrawGroup::Maze,
            });

            if kind == MazeCell::Wall {
                self.insert(Drawable {
                    transform: Transform::at(
                        maze_to_world(&cell, dims, MAZE_WALL_Y),
                        Vec3::new(1.0, 2.0, 1.0),
                    ),
                    transparent: false,
                    texture: None,
                    mesh: cube,
                    group: DrawGroup::Maze,
                });
            }
        }

        let added = self.drawables.len() - before;
        log::info!("Placed {added} maze drawables");
        added
    }

    /// Adds a transparent unit cube.
    pub fn add_glass_cube(
        &mut self,
        origin: Vec3,
        cube: MeshKey,
        texture: Option<TextureKey>,
    ) -> DrawableKey {
        self.insert(Drawable {
            transform: Transform::at(origin, Vec3::splat(1.0)),
            transparent: true,
            texture,
            mesh: cube,
            group: DrawGroup::Glass,
        })
    }

    /// Adds an opaque model that [`Scene::animate`] moves each frame.
    pub fn add_animated(&mut self, origin: Vec3, scale: Vec3, mesh: MeshKey) -> DrawableKey {
        self.insert(Drawable {
            transform: Transform::at(origin, scale),
            transparent: false,
            texture: None,
            mesh,
            group: DrawGroup::Animated,
        })
    }

    /// Adds the terrain drawable.
    pub fn add_terrain(
        &mut self,
        transform: Transform,
        mesh: MeshKey,
        texture: Option<TextureKey>,
    ) -> DrawableKey {
        self.insert(Drawable {
            transform,
            transparent: false,
            texture,
            mesh,
            group: DrawGroup::Terrain,
        })
    }

    /// Swings animated models along X and spins them about Y, for absolute time `t`
    /// in seconds.
    pub fn animate(&mut self, t: f32) {
        for drawable in self
            .drawables
            .values_mut()
            .filter(|d| d.group == DrawGroup::Animated)
        {
            drawable.transform.origin.0[0] = t.sin() * 3.0;
            drawable.transform.rotation.0[1] = t * 1.5;
        }
    }
}
