//! Spatial partition tree over donor triangle centroids.
//!
//! A binary tree built once per transfer and read-only afterwards, giving
//! average-case logarithmic range queries over the donor set. Nodes live in
//! an arena addressed by index; a node without children is terminal and owns
//! its points directly.

use crate::float_types::Real;
use crate::resolve::candidate::CandidateTest;
use crate::resolve::query::{FoundKind, Query};
use std::cmp::Ordering;

pub mod point;
pub use point::{StencilVertex, SurfacePoint};

#[derive(Debug, Clone)]
struct TreeNode {
    axis: usize,
    cutoff: Real,
    /// Arena indices of the (left, right) children; `None` for a terminal
    /// node.
    children: Option<(usize, usize)>,
    points: Vec<SurfacePoint>,
}

/// Statistics returned by [`SearchTree::build`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub interior: usize,
    pub terminal: usize,
    pub max_depth: usize,
    pub points: usize,
}

/// Binary space-partitioning tree over [`SurfacePoint`] centroids.
///
/// Invariant: for every interior node, all centroids in the left subtree
/// have coordinate ≤ cutoff on the node's axis, and all centroids in the
/// right subtree have coordinate ≥ cutoff.
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<TreeNode>,
}

impl SearchTree {
    /// Build the tree, taking ownership of the points. The root is always
    /// arena index 0. `leaf_size` bounds the point count of terminal nodes
    /// except where a degenerate coordinate distribution admits no split.
    pub fn build(points: Vec<SurfacePoint>, leaf_size: usize) -> (Self, BuildStats) {
        let leaf_size = leaf_size.max(1);
        let mut tree = Self { nodes: Vec::new() };
        let mut stats = BuildStats {
            points: points.len(),
            ..BuildStats::default()
        };
        if !points.is_empty() {
            tree.build_node(points, leaf_size, 0, &mut stats);
        }
        (tree, stats)
    }

    fn build_node(
        &mut self,
        mut points: Vec<SurfacePoint>,
        leaf_size: usize,
        depth: usize,
        stats: &mut BuildStats,
    ) -> usize {
        stats.max_depth = stats.max_depth.max(depth);
        if points.len() <= leaf_size {
            return self.push_terminal(points, stats);
        }

        let axis = widest_axis(&points);
        points.sort_by(|a, b| {
            a.centroid[axis]
                .partial_cmp(&b.centroid[axis])
                .unwrap_or(Ordering::Equal)
        });

        let Some(cut) = split_index(&points, axis) else {
            // Every centroid shares the coordinate on the widest axis; this
            // node stays terminal whatever its size.
            return self.push_terminal(points, stats);
        };
        let cutoff = points[cut - 1].centroid[axis];
        let right_points = points.split_off(cut);

        let idx = self.nodes.len();
        self.nodes.push(TreeNode {
            axis,
            cutoff,
            children: None,
            points: Vec::new(),
        });
        stats.interior += 1;

        let left = self.build_node(points, leaf_size, depth + 1, stats);
        let right = self.build_node(right_points, leaf_size, depth + 1, stats);
        self.nodes[idx].children = Some((left, right));
        idx
    }

    fn push_terminal(&mut self, points: Vec<SurfacePoint>, stats: &mut BuildStats) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(TreeNode {
            axis: 0,
            cutoff: 0.0,
            children: None,
            points,
        });
        stats.terminal += 1;
        idx
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Branch-and-bound descent. The near child (the query's side of the
    /// cutoff) is visited first; the far child only when the squared axis
    /// gap to the cutoff stays within `best distance × search radius` for
    /// the query's current found-kind, or within `gap_tolerance` (squared)
    /// while nothing has been found yet. Every point of each visited
    /// terminal node is handed to `test`.
    pub fn search<T: CandidateTest>(&self, query: &mut Query, test: &T, gap_tolerance: Real) {
        if !self.nodes.is_empty() {
            self.search_node(0, query, test, gap_tolerance);
        }
    }

    fn search_node<T: CandidateTest>(
        &self,
        idx: usize,
        query: &mut Query,
        test: &T,
        gap_tolerance: Real,
    ) {
        let node = &self.nodes[idx];
        let Some((left, right)) = node.children else {
            for candidate in &node.points {
                test.test(candidate, query);
            }
            return;
        };
        debug_assert!(node.points.is_empty(), "interior node holding points");

        let coord = query.point[node.axis];
        let (near, far) = if coord <= node.cutoff {
            (left, right)
        } else {
            (right, left)
        };
        self.search_node(near, query, test, gap_tolerance);

        let gap = (coord - node.cutoff) * (coord - node.cutoff);
        let visit_far = match query.found {
            FoundKind::Stencil => gap <= query.stencil_dist2 * query.search_radius,
            FoundKind::Closest => gap <= query.closest_dist2 * query.search_radius,
            FoundKind::None => gap <= gap_tolerance,
        };
        if visit_far {
            self.search_node(far, query, test, gap_tolerance);
        }
    }

    /// Check the partition invariant over the whole arena. Intended for
    /// validation; walks every subtree.
    pub fn partition_is_valid(&self) -> bool {
        if self.nodes.is_empty() {
            return true;
        }
        self.subtree_respects(0)
    }

    fn subtree_respects(&self, idx: usize) -> bool {
        let node = &self.nodes[idx];
        let Some((left, right)) = node.children else {
            return true;
        };
        let ok = |child: usize, check: &dyn Fn(Real) -> bool| {
            let mut points = Vec::new();
            self.collect_points(child, &mut points);
            points.iter().all(|p| check(p.centroid[node.axis]))
        };
        ok(left, &|c| c <= node.cutoff)
            && ok(right, &|c| c >= node.cutoff)
            && self.subtree_respects(left)
            && self.subtree_respects(right)
    }

    fn collect_points<'a>(&'a self, idx: usize, out: &mut Vec<&'a SurfacePoint>) {
        let node = &self.nodes[idx];
        match node.children {
            Some((left, right)) => {
                self.collect_points(left, out);
                self.collect_points(right, out);
            },
            None => out.extend(node.points.iter()),
        }
    }
}

/// Axis with the largest centroid-coordinate extent across `points`.
fn widest_axis(points: &[SurfacePoint]) -> usize {
    let mut lo = [Real::INFINITY; 3];
    let mut hi = [Real::NEG_INFINITY; 3];
    for p in points {
        for i in 0..3 {
            lo[i] = lo[i].min(p.centroid[i]);
            hi[i] = hi[i].max(p.centroid[i]);
        }
    }
    let mut axis = 0;
    for i in 1..3 {
        if hi[i] - lo[i] > hi[axis] - lo[axis] {
            axis = i;
        }
    }
    axis
}

/// Split index nearest the median such that the coordinate strictly
/// increases across it, keeping both sides non-empty. `None` when all
/// coordinates on the axis are equal. Expects `points` sorted on `axis`.
fn split_index(points: &[SurfacePoint], axis: usize) -> Option<usize> {
    let n = points.len();
    let valid =
        |cut: usize| cut > 0 && cut < n && points[cut - 1].centroid[axis] < points[cut].centroid[axis];
    let mid = n / 2;
    if valid(mid) {
        return Some(mid);
    }
    for off in 1..n {
        let hi = mid + off;
        if hi < n && valid(hi) {
            return Some(hi);
        }
        if off <= mid && valid(mid - off) {
            return Some(mid - off);
        }
        if hi >= n && off > mid {
            break;
        }
    }
    None
}
