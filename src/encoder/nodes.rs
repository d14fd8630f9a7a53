use crate::bvh::{Bvh, BvhNode, NodeContent, NodeIdx, PrimitiveIdx};
use crate::geometry::{WorldBox, WorldPoint};

use super::layout::{GridLayout, TexelGrid, read_texel, texel_position};

/// BVH nodes as three parallel grids, one texel per node.
///
/// * `bounds_min`: min.xyz, first primitive (leaf) or left child (inner)
/// * `bounds_max`: max.xyz, primitive count (leaf) or right child (inner)
/// * `flags`: 1.0 for leaves, 0.0 for inner nodes
#[derive(Clone, Debug, PartialEq)]
pub struct NodeTextures {
    pub bounds_min: TexelGrid,
    pub bounds_max: TexelGrid,
    pub flags: TexelGrid,
    node_count: usize,
}

impl NodeTextures {
    pub fn encode(bvh: &Bvh, max_dimension: u32) -> NodeTextures {
        let layout = GridLayout::new(bvh.node_count(), 1, max_dimension);
        let mut textures = NodeTextures {
            bounds_min: TexelGrid::new(layout),
            bounds_max: TexelGrid::new(layout),
            flags: TexelGrid::new(layout),
            node_count: bvh.node_count(),
        };

        for (i, node) in bvh.nodes().iter().enumerate() {
            let (a, b, leaf) = match node.content {
                NodeContent::Leaf { first, count } => (first.raw() as f32, count as f32, 1.0),
                NodeContent::Inner { left, right } => (left.raw() as f32, right.raw() as f32, 0.0),
            };
            let min = &node.bounds.min;
            let max = &node.bounds.max;
            textures.bounds_min.set(i, 0, [min.x, min.y, min.z, a]);
            textures.bounds_max.set(i, 0, [max.x, max.y, max.z, b]);
            textures.flags.set(i, 0, [leaf, 0.0, 0.0, 0.0]);
        }

        textures
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn layout(&self) -> &GridLayout {
        self.bounds_min.layout()
    }

    pub fn decode(&self, index: usize) -> BvhNode {
        decode_node(
            index,
            self.layout().width(),
            self.bounds_min.as_floats(),
            self.bounds_max.as_floats(),
            self.flags.as_floats(),
        )
    }
}

/// Reconstructs node `index` from raw grid floats, the same way the kernel reads them.
pub fn decode_node(
    index: usize,
    width: u32,
    bounds_min: &[f32],
    bounds_max: &[f32],
    flags: &[f32],
) -> BvhNode {
    let position = texel_position(index, 0, width, 1);
    let [min_x, min_y, min_z, a] = read_texel(bounds_min, width, position);
    let [max_x, max_y, max_z, b] = read_texel(bounds_max, width, position);
    let [leaf, ..] = read_texel(flags, width, position);

    let content = if leaf > 0.5 {
        NodeContent::Leaf {
            first: PrimitiveIdx::from_raw(a as u32),
            count: b as u32,
        }
    } else {
        NodeContent::Inner {
            left: NodeIdx::from_raw(a as u32),
            right: NodeIdx::from_raw(b as u32),
        }
    };

    BvhNode {
        bounds: WorldBox::new(
            WorldPoint::new(min_x, min_y, min_z),
            WorldPoint::new(max_x, max_y, max_z),
        ),
        content,
    }
}
