//! Point quadtree used to carve the land into square regions
//!
//! Boxes are bucketed in leaf nodes; a leaf that overflows its capacity
//! splits into four equal quadrants and pushes its boxes down. A box that
//! straddles both centre lines stays with the node it reached. The leaf
//! squares left over once all samples are in are the town's macro regions.

use serde::{Deserialize, Serialize};

/// Axis-aligned box inserted into the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    /// Unit box anchored at a point
    pub fn unit_at(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + 1.0,
            max_y: y + 1.0,
        }
    }
}

/// A square leaf region, in land units (y grows southward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LandRegion {
    pub west: i32,
    pub north: i32,
    pub width: i32,
}

impl LandRegion {
    pub fn new(west: i32, north: i32, width: i32) -> Self {
        Self { west, north, width }
    }

    pub fn east(&self) -> i32 {
        self.west + self.width
    }

    pub fn south(&self) -> i32 {
        self.north + self.width
    }

    /// Number of unit parcels along each side
    pub fn parcels_per_side(&self) -> i32 {
        self.width / 2
    }
}

#[derive(Debug, Clone, Copy)]
struct SplitRule {
    capacity: usize,
    max_depth: u32,
    min_width: f64,
}

#[derive(Debug, Clone)]
struct QuadNode {
    center_x: f64,
    center_y: f64,
    width: f64,
    depth: u32,
    items: Vec<Rect>,
    /// Empty, or exactly four quadrants: NW, SW, NE, SE
    children: Vec<QuadNode>,
}

impl QuadNode {
    fn new(center_x: f64, center_y: f64, width: f64, depth: u32) -> Self {
        Self {
            center_x,
            center_y,
            width,
            depth,
            items: Vec::new(),
            children: Vec::new(),
        }
    }

    fn insert(&mut self, rect: Rect, rule: SplitRule) {
        if self.children.is_empty() {
            self.items.push(rect);
            if self.items.len() > rule.capacity
                && self.depth < rule.max_depth
                && self.width > rule.min_width
            {
                self.split(rule);
            }
        } else {
            self.insert_into_children(rect, rule);
        }
    }

    fn insert_into_children(&mut self, rect: Rect, rule: SplitRule) {
        let (cx, cy) = (self.center_x, self.center_y);

        if rect.min_x <= cx && rect.max_x >= cx && rect.min_y <= cy && rect.max_y >= cy {
            self.items.push(rect);
            return;
        }

        if rect.min_x <= cx {
            if rect.min_y <= cy {
                self.children[0].insert(rect, rule);
            }
            if rect.max_y >= cy {
                self.children[1].insert(rect, rule);
            }
        }
        if rect.max_x > cx {
            if rect.min_y <= cy {
                self.children[2].insert(rect, rule);
            }
            if rect.max_y >= cy {
                self.children[3].insert(rect, rule);
            }
        }
    }

    fn split(&mut self, rule: SplitRule) {
        let quarter = self.width / 4.0;
        let half = self.width / 2.0;
        let depth = self.depth + 1;
        let (cx, cy) = (self.center_x, self.center_y);

        self.children = vec![
            QuadNode::new(cx - quarter, cy - quarter, half, depth),
            QuadNode::new(cx - quarter, cy + quarter, half, depth),
            QuadNode::new(cx + quarter, cy - quarter, half, depth),
            QuadNode::new(cx + quarter, cy + quarter, half, depth),
        ];

        let items = std::mem::take(&mut self.items);
        for rect in items {
            self.insert_into_children(rect, rule);
        }
    }

    fn collect_leaves(&self, min_width: f64, out: &mut Vec<LandRegion>) {
        if self.children.is_empty() {
            if self.width > min_width {
                let half = self.width * 0.5;
                out.push(LandRegion::new(
                    (self.center_x - half) as i32,
                    (self.center_y - half) as i32,
                    self.width as i32,
                ));
            }
            return;
        }
        for child in &self.children {
            child.collect_leaves(min_width, out);
        }
    }

    fn max_depth(&self) -> u32 {
        self.children
            .iter()
            .map(|c| c.max_depth())
            .max()
            .unwrap_or(self.depth)
    }
}

/// Recursive quad-subdividing index over a square plot of land
#[derive(Debug, Clone)]
pub struct QuadTree {
    root: QuadNode,
    rule: SplitRule,
}

impl QuadTree {
    /// Nodes of this width or narrower never split and never become regions
    pub const MIN_REGION_WIDTH: f64 = 1.0;

    pub fn new(size: f64, capacity: usize, max_depth: u32) -> Self {
        Self {
            root: QuadNode::new(size / 2.0, size / 2.0, size, 0),
            rule: SplitRule {
                capacity,
                max_depth,
                min_width: Self::MIN_REGION_WIDTH,
            },
        }
    }

    pub fn insert(&mut self, rect: Rect) {
        let rule = self.rule;
        self.root.insert(rect, rule);
    }

    /// Leaf squares wider than one unit, in depth-first NW, SW, NE, SE order
    pub fn leaves(&self) -> Vec<LandRegion> {
        let mut out = Vec::new();
        self.root.collect_leaves(self.rule.min_width, &mut out);
        out
    }

    pub fn depth(&self) -> u32 {
        self.root.max_depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree_is_single_region() {
        let tree = QuadTree::new(16.0, 10, 20);
        assert_eq!(tree.leaves(), vec![LandRegion::new(0, 0, 16)]);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_split_on_overflow() {
        let mut tree = QuadTree::new(16.0, 2, 20);
        tree.insert(Rect::unit_at(1.0, 1.0));
        tree.insert(Rect::unit_at(13.0, 1.0));
        assert_eq!(tree.leaves().len(), 1);

        tree.insert(Rect::unit_at(1.0, 13.0));
        let leaves = tree.leaves();
        assert_eq!(leaves.len(), 4);
        assert!(leaves.iter().all(|r| r.width == 8));
        assert_eq!(leaves[0], LandRegion::new(0, 0, 8));
        assert_eq!(leaves[1], LandRegion::new(0, 8, 8));
        assert_eq!(leaves[2], LandRegion::new(8, 0, 8));
        assert_eq!(leaves[3], LandRegion::new(8, 8, 8));
    }

    #[test]
    fn test_leaves_tile_land_without_overlap() {
        let mut tree = QuadTree::new(16.0, 2, 20);
        for i in 0..12 {
            let p = (i as f64 * 1.3) % 15.0;
            tree.insert(Rect::unit_at(p, 15.0 - p));
        }
        let leaves = tree.leaves();
        let area: i32 = leaves.iter().map(|r| r.width * r.width).sum();
        assert!(area <= 256);
        for (i, a) in leaves.iter().enumerate() {
            for b in leaves.iter().skip(i + 1) {
                let disjoint = a.east() <= b.west
                    || b.east() <= a.west
                    || a.south() <= b.north
                    || b.south() <= a.north;
                assert!(disjoint, "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_unit_cells_are_dropped() {
        // Pile boxes into one corner until cells bottom out at width 1
        let mut tree = QuadTree::new(16.0, 1, 20);
        for _ in 0..4 {
            tree.insert(Rect::unit_at(0.1, 0.1));
        }
        tree.insert(Rect::unit_at(0.2, 0.2));
        assert!(tree.leaves().iter().all(|r| r.width > 1));
        assert!(tree.depth() >= 4);
    }

    #[test]
    fn test_region_edges() {
        let r = LandRegion::new(4, 2, 4);
        assert_eq!(r.east(), 8);
        assert_eq!(r.south(), 6);
        assert_eq!(r.parcels_per_side(), 2);
    }
}
