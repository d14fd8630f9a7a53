use std::cmp::Ordering;

use index_vec::IndexVec;
use tracing::debug;

use crate::geometry::{WorldBox, WorldPoint};
use crate::scene::Primitive;

use super::{Bvh, BvhNode, NodeContent, NodeIdx, PrimitiveIdx};

/// Bounds and partitioning keys, computed once per primitive.
struct BuildInput {
    bounds: IndexVec<PrimitiveIdx, WorldBox>,
    centroids: IndexVec<PrimitiveIdx, WorldPoint>,
}

impl Bvh {
    /// Builds the hierarchy by recursive object-median splits.
    ///
    /// A range of at most `leaf_size` primitives becomes a leaf, larger ranges are stably sorted
    /// along the longest axis of their centroid bounds and halved.
    #[tracing::instrument(
        skip_all,
        fields(primitive_count = primitives.len(), leaf_size = leaf_size)
    )]
    pub fn build<P: Primitive>(primitives: &[P], leaf_size: usize) -> Bvh {
        let leaf_size = leaf_size.max(1);
        let input = BuildInput {
            bounds: primitives.iter().map(|p| p.bounding_box()).collect(),
            centroids: primitives.iter().map(|p| p.centroid()).collect(),
        };

        let mut order: Vec<PrimitiveIdx> = (0..primitives.len()).map(PrimitiveIdx::from).collect();
        let mut bvh = Bvh {
            nodes: IndexVec::with_capacity(node_count_estimate(primitives.len(), leaf_size)),
            order: Vec::new(),
            root: None,
        };

        if !order.is_empty() {
            bvh.root = Some(bvh.build_recursive(&input, &mut order, 0, leaf_size));
        }
        bvh.order = order;

        debug!(nodes = bvh.nodes.len(), "BVH built");
        bvh
    }

    fn build_recursive(
        &mut self,
        input: &BuildInput,
        range: &mut [PrimitiveIdx],
        start: usize,
        leaf_size: usize,
    ) -> NodeIdx {
        if range.len() <= leaf_size {
            let bounds = tight_bounds(range.iter().map(|i| &input.bounds[*i]));
            return self.nodes.push(BvhNode {
                bounds,
                content: NodeContent::Leaf {
                    first: PrimitiveIdx::from_usize(start),
                    count: range.len() as u32,
                },
            });
        }

        let axis = centroid_bounds(range.iter().map(|i| &input.centroids[*i])).longest_axis();
        // Stable, so equal keys keep their relative order
        range.sort_by(|a, b| {
            input.centroids[*a][axis]
                .partial_cmp(&input.centroids[*b][axis])
                .unwrap_or(Ordering::Equal)
        });

        let mid = range.len() / 2;
        let (left_range, right_range) = range.split_at_mut(mid);
        let left = self.build_recursive(input, left_range, start, leaf_size);
        let right = self.build_recursive(input, right_range, start + mid, leaf_size);

        let bounds = self.nodes[left].bounds.union(&self.nodes[right].bounds);
        self.nodes.push(BvhNode {
            bounds,
            content: NodeContent::Inner { left, right },
        })
    }
}

fn tight_bounds<'a>(boxes: impl Iterator<Item = &'a WorldBox>) -> WorldBox {
    boxes.fold(WorldBox::empty(), |acc, b| acc.union(b))
}

fn centroid_bounds<'a>(centroids: impl Iterator<Item = &'a WorldPoint>) -> WorldBox {
    let mut ret = WorldBox::empty();
    for c in centroids {
        ret.grow_point(c);
    }
    ret
}

/// Rough node count, for preallocation.
fn node_count_estimate(primitive_count: usize, leaf_size: usize) -> usize {
    if primitive_count == 0 {
        0
    } else {
        2 * primitive_count.div_ceil(leaf_size)
    }
}
