//! Per-frame partition of drawables into opaque and transparent lists.
//!
//! Transparent instances are ordered back to front (painter's algorithm) by the distance
//! from the viewer to each instance's origin. The transparent pass does not write depth.
//!
//! The sort is stable: instances at equal distance keep their arena order.

use super::Drawable;
use crate::math::vec::Vec3;

/// Keys split by pass, transparent ones sorted far to near.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOrder<K> {
    /// Opaque keys in input order.
    pub opaque: Vec<K>,
    /// Transparent keys, non-increasing distance from the viewer.
    pub transparent: Vec<K>,
}

impl<K> Default for DrawOrder<K> {
    fn default() -> Self {
        Self {
            opaque: Vec::new(),
            transparent: Vec::new(),
        }
    }
}

impl<K: Copy> DrawOrder<K> {
    /// Partitions `drawables` by their transparency flag and sorts the transparent set.
    ///
    /// # Arguments
    /// * `drawables` - Every candidate with its key
    /// * `viewer` - Camera position the distances are measured from
    pub fn build<'a, I>(drawables: I, viewer: Vec3) -> Self
    where
        I: IntoIterator<Item = (K, &'a Drawable)>,
    {
        let mut order = Self::default();
        let mut transparent = Vec::new();

        for (key, drawable) in drawables {
            if drawable.transparent {
                transparent.push((key, viewer.distance(&drawable.transform.origin)));
            } else {
                order.opaque.push(key);
            }
        }

        transparent.sort_by(|a, b| b.1.total_cmp(&a.1));
        order.transparent = transparent.into_iter().map(|(key, _)| key).collect();
        order
    }

    /// Total number of keys in both lists.
    pub fn len(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }

    /// Whether both lists are empty.
    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.transparent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{DrawGroup, MeshKey, Transform};

    fn drawable(x: f32, transparent: bool) -> Drawable {
        Drawable {
            transform: Transform::at(Vec3::new(x, 0.0, 0.0), Vec3::splat(1.0)),
            transparent,
            texture: None,
            mesh: MeshKey::default(),
            group: DrawGroup::Glass,
        }
    }

    /// Distances 5, 10 and 2 are drawn as 10, 5, 2.
    #[test]
    fn test_far_to_near() {
        let items = [drawable(5.0, true), drawable(10.0, true), drawable(2.0, true)];
        let order = DrawOrder::build(items.iter().enumerate(), Vec3::ZERO);
        assert_eq!(order.transparent, vec![1, 0, 2]);
        assert!(order.opaque.is_empty());
    }

    #[test]
    fn test_partition_keeps_opaque_order() {
        let items = [
            drawable(1.0, false),
            drawable(3.0, true),
            drawable(2.0, false),
            drawable(4.0, true),
        ];
        let order = DrawOrder::build(items.iter().enumerate(), Vec3::ZERO);
        assert_eq!(order.opaque, vec![0, 2]);
        assert_eq!(order.transparent, vec![3, 1]);
        assert_eq!(order.len(), 4);
    }

    /// Equal distances keep input order, including mirrored positions.
    #[test]
    fn test_ties_are_stable() {
        let items = [
            drawable(3.0, true),
            drawable(-3.0, true),
            drawable(7.0, true),
            drawable(3.0, true),
        ];
        let order = DrawOrder::build(items.iter().enumerate(), Vec3::ZERO);
        assert_eq!(order.transparent, vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_empty_input() {
        let order = DrawOrder::<usize>::build(std::iter::empty(), Vec3::ZERO);
        assert!(order.is_empty());
    }

    /// The result is non-increasing in distance for any viewer position.
    #[test]
    fn test_distances_non_increasing() {
        let items: Vec<_> = (0..20)
            .map(|i| drawable((i as f32 * 7.3) % 11.0 - 5.0, i % 3 != 0))
            .collect();
        let viewer = Vec3::new(1.5, 2.0, -0.5);
        let order = DrawOrder::build(items.iter().enumerate(), viewer);
        let distances: Vec<f32> = order
            .transparent
            .iter()
            .map(|&i| viewer.distance(&items[i].transform.origin))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] >= w[1]));

        let again = DrawOrder::build(items.iter().enumerate(), viewer);
        assert_eq!(order, again);
    }
}
