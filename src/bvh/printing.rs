use std::fmt::Display;
use std::io::{self, Write};

use crate::util::Stats;

use super::{Bvh, NodeContent, NodeIdx};

/// Shape summary of a built hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct BvhStatistics {
    pub node_count: usize,
    pub inner_count: usize,
    pub leaf_count: usize,
    pub primitive_count: usize,
    /// Depth of leaves, the root being at depth 1.
    pub depth: Stats,
    pub leaf_fill: Stats,
}

impl Bvh {
    pub fn statistics(&self) -> BvhStatistics {
        let depth = match self.root {
            Some(root) => self.depth_statistics_recursive(root),
            None => Stats::default(),
        };

        let leaf_fill: Stats = self
            .nodes
            .iter()
            .filter_map(|node| match node.content {
                NodeContent::Leaf { count, .. } => Some(count as usize),
                NodeContent::Inner { .. } => None,
            })
            .collect();

        BvhStatistics {
            node_count: self.nodes.len(),
            inner_count: self.nodes.len() - leaf_fill.count,
            leaf_count: leaf_fill.count,
            primitive_count: self.order.len(),
            depth,
            leaf_fill,
        }
    }

    fn depth_statistics_recursive(&self, node: NodeIdx) -> Stats {
        match self.nodes[node].content {
            NodeContent::Leaf { .. } => Stats::single(1),
            NodeContent::Inner { left, right } => self
                .depth_statistics_recursive(left)
                .merge(&self.depth_statistics_recursive(right))
                .shifted(1),
        }
    }

    pub fn print_tree(&self) -> io::Result<()> {
        self.write_tree(&mut io::stdout().lock())
    }

    /// Writes an indented outline of the tree, root first.
    pub fn write_tree(&self, out: &mut impl Write) -> io::Result<()> {
        match self.root {
            Some(root) => self.write_recursive(out, 0, root),
            None => writeln!(out, "<EMPTY>"),
        }
    }

    fn write_recursive(
        &self,
        out: &mut impl Write,
        indent: usize,
        index: NodeIdx,
    ) -> io::Result<()> {
        let node = &self.nodes[index];
        let indent_str = "  ".repeat(indent);
        match node.content {
            NodeContent::Leaf { first, count } => writeln!(
                out,
                "{}- L{}: {:?}-{:?} [{}; {}]",
                indent_str,
                index.raw(),
                node.bounds.min,
                node.bounds.max,
                first.raw(),
                count
            ),
            NodeContent::Inner { left, right } => {
                writeln!(
                    out,
                    "{}- I{}: {:?}-{:?}",
                    indent_str,
                    index.raw(),
                    node.bounds.min,
                    node.bounds.max,
                )?;
                self.write_recursive(out, indent + 1, left)?;
                self.write_recursive(out, indent + 1, right)
            }
        }
    }
}

impl Display for BvhStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Nodes: {} ({} inner, {} leaves) over {} primitives",
            self.node_count, self.inner_count, self.leaf_count, self.primitive_count
        )?;
        if self.depth.count > 0 {
            writeln!(f, "Depth: {}", self.depth)?;
            write!(f, "Leaf nodes fill: {}", self.leaf_fill)
        } else {
            write!(f, "Depth: -")
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::WorldPoint;
    use crate::scene::{MaterialIdx, Sphere};
    use assert2::assert;

    fn row(count: usize) -> Vec<Sphere> {
        (0..count)
            .map(|i| {
                Sphere::new(
                    WorldPoint::new(i as f32, 0.0, 0.0),
                    0.25,
                    MaterialIdx::from_usize(0),
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn statistics_of_balanced_tree() {
        let bvh = Bvh::build(&row(64), 16);
        let stats = bvh.statistics();
        assert!(stats.node_count == 7);
        assert!(stats.leaf_count == 4);
        assert!(stats.inner_count == 3);
        assert!(stats.primitive_count == 64);
        assert!(stats.depth.min == 3);
        assert!(stats.depth.max == 3);
        assert!(stats.leaf_fill.min == 16);
        assert!(stats.leaf_fill.max == 16);
    }

    #[test]
    fn statistics_of_empty_tree() {
        let bvh = Bvh::build::<Sphere>(&[], 16);
        let stats = bvh.statistics();
        assert!(stats.node_count == 0);
        assert!(stats.leaf_count == 0);
        assert!(stats.depth.count == 0);
        assert!(stats.to_string().contains("Depth: -"));
    }

    #[test]
    fn tree_outline() {
        let bvh = Bvh::build(&row(3), 2);
        let mut out = Vec::new();
        bvh.write_tree(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.len() == 3);
        assert!(lines[0].starts_with("- I2:"));
        assert!(lines[1].starts_with("  - L0:"));
        assert!(lines[1].ends_with("[0; 1]"));
        assert!(lines[2].starts_with("  - L1:"));
        assert!(lines[2].ends_with("[1; 2]"));
    }
}
