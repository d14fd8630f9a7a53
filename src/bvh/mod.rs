mod building;
mod printing;

use index_vec::IndexVec;

use crate::geometry::WorldBox;

pub use printing::BvhStatistics;

/// Maximum number of primitives in a leaf node unless configured otherwise.
pub const DEFAULT_LEAF_SIZE: usize = 16;

index_vec::define_index_type! {
    pub struct NodeIdx = u32;
    IMPL_RAW_CONVERSIONS = true;
}

index_vec::define_index_type! {
    pub struct PrimitiveIdx = u32;
    IMPL_RAW_CONVERSIONS = true;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeContent {
    /// Range `first..first + count` of the reordered primitive array.
    Leaf { first: PrimitiveIdx, count: u32 },
    Inner { left: NodeIdx, right: NodeIdx },
}

#[derive(Clone, Debug, PartialEq)]
pub struct BvhNode {
    pub bounds: WorldBox,
    pub content: NodeContent,
}

impl BvhNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.content, NodeContent::Leaf { .. })
    }
}

/// Binary bounding volume hierarchy stored as a flat node arena.
///
/// Children always precede their parent in `nodes`, so the root is the last node.
#[derive(Clone, Debug, Default)]
pub struct Bvh {
    nodes: IndexVec<NodeIdx, BvhNode>,
    /// `order[i]` is the index of the input primitive placed at position `i`.
    order: Vec<PrimitiveIdx>,
    root: Option<NodeIdx>,
}

impl Bvh {
    pub fn nodes(&self) -> &IndexVec<NodeIdx, BvhNode> {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn order(&self) -> &[PrimitiveIdx] {
        &self.order
    }

    pub fn root(&self) -> Option<NodeIdx> {
        self.root
    }

    /// Root index as the kernel sees it, -1 for an empty hierarchy.
    pub fn root_index(&self) -> i32 {
        self.root.map_or(-1, |root| root.raw() as i32)
    }

    pub fn root_bounds(&self) -> Option<&WorldBox> {
        self.root.map(|root| &self.nodes[root].bounds)
    }

    /// Reorders per-primitive data into leaf order.
    pub fn apply_order<T: Clone>(&self, items: &[T]) -> Vec<T> {
        assert2::assert!(items.len() == self.order.len());
        self.order.iter().map(|i| items[i.index()].clone()).collect()
    }
}
