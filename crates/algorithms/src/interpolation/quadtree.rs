//! Point quadtree for rectangular range queries
//!
//! Nodes live in a flat arena and refer to their children by index. A leaf
//! splits into four quadrants once it holds more than `node_capacity`
//! entries, unless it already sits at `max_depth`. Points on a split line go
//! to the east/north quadrant; all bounds are closed, so range queries are
//! exact with inclusive edges.

use spatia_core::Envelope;

use super::error::IndexError;

/// Default number of entries a leaf holds before it splits
pub const DEFAULT_NODE_CAPACITY: usize = 32;

/// Default depth below which leaves stop splitting
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// An item with a planar position
pub trait Spatial {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
}

/// Range-searchable collection of positioned items.
///
/// The interpolator only relies on this contract, so any index that answers
/// rectangle queries exactly can stand in for [`Quadtree`].
pub trait SpatialIndex<T> {
    fn insert(&mut self, item: T) -> Result<(), IndexError>;

    /// All items inside `envelope`, edges included, in no particular order
    fn query(&self, envelope: &Envelope) -> Result<Vec<&T>, IndexError>;

    /// Bounding box of the indexed items; fails when there are none
    fn root_bounding_box(&self) -> Result<Envelope, IndexError>;
}

/// Point quadtree over a fixed rectangle
#[derive(Debug, Clone)]
pub struct Quadtree<T> {
    items: Vec<T>,
    nodes: Vec<QuadNode>,
    extent: Option<Envelope>,
    node_capacity: usize,
    max_depth: usize,
}

#[derive(Debug, Clone)]
struct QuadNode {
    bounds: Envelope,
    depth: usize,
    /// Indices into `items` (leaves only)
    entries: Vec<usize>,
    /// SW, SE, NW, NE
    children: Option<[usize; 4]>,
}

impl QuadNode {
    fn leaf(bounds: Envelope, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            entries: Vec::new(),
            children: None,
        }
    }

    fn quadrant(&self, x: f64, y: f64) -> usize {
        let (mid_x, mid_y) = self.bounds.center();
        usize::from(x >= mid_x) | (usize::from(y >= mid_y) << 1)
    }

    fn quadrant_bounds(&self) -> [Envelope; 4] {
        let b = &self.bounds;
        let (mx, my) = b.center();
        [
            Envelope::new(b.min_x, b.min_y, mx, my),
            Envelope::new(mx, b.min_y, b.max_x, my),
            Envelope::new(b.min_x, my, mx, b.max_y),
            Envelope::new(mx, my, b.max_x, b.max_y),
        ]
    }
}

fn check_envelope(envelope: &Envelope) -> Result<(), IndexError> {
    if envelope.is_nan() || envelope.min_x > envelope.max_x || envelope.min_y > envelope.max_y {
        return Err(IndexError::InvalidEnvelope);
    }
    Ok(())
}

impl<T: Spatial> Quadtree<T> {
    /// Empty tree covering `bounds`
    pub fn new(bounds: Envelope) -> Result<Self, IndexError> {
        Self::with_limits(bounds, DEFAULT_NODE_CAPACITY, DEFAULT_MAX_DEPTH)
    }

    pub fn with_limits(
        bounds: Envelope,
        node_capacity: usize,
        max_depth: usize,
    ) -> Result<Self, IndexError> {
        check_envelope(&bounds)?;
        Ok(Self {
            items: Vec::new(),
            nodes: vec![QuadNode::leaf(bounds, 0)],
            extent: None,
            node_capacity: node_capacity.max(1),
            max_depth,
        })
    }

    /// Tree whose bounds are the extent of `items`
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Result<Self, IndexError> {
        let items: Vec<T> = items.into_iter().collect();
        let bounds = Envelope::from_points(items.iter().map(|t| (t.x(), t.y())))
            .ok_or(IndexError::Empty)?;
        let mut tree = Self::new(bounds)?;
        for item in items {
            tree.insert(item)?;
        }
        Ok(tree)
    }

    pub fn bounds(&self) -> Envelope {
        self.nodes[0].bounds
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter()
    }

    /// Deepest level reached so far
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    fn split(&mut self, node_idx: usize) {
        let first_child = self.nodes.len();
        let depth = self.nodes[node_idx].depth + 1;
        for bounds in self.nodes[node_idx].quadrant_bounds() {
            self.nodes.push(QuadNode::leaf(bounds, depth));
        }
        let children = [first_child, first_child + 1, first_child + 2, first_child + 3];
        let entries = std::mem::take(&mut self.nodes[node_idx].entries);
        self.nodes[node_idx].children = Some(children);

        for entry in entries {
            let item = &self.items[entry];
            let q = self.nodes[node_idx].quadrant(item.x(), item.y());
            self.nodes[children[q]].entries.push(entry);
        }
    }
}

impl<T: Spatial> SpatialIndex<T> for Quadtree<T> {
    fn insert(&mut self, item: T) -> Result<(), IndexError> {
        let (x, y) = (item.x(), item.y());
        if !self.bounds().contains_point(x, y) {
            return Err(IndexError::OutOfBounds { x, y });
        }

        let entry = self.items.len();
        self.items.push(item);
        match self.extent.as_mut() {
            Some(e) => e.expand_to_include(x, y),
            None => self.extent = Some(Envelope::new(x, y, x, y)),
        }

        let mut node_idx = 0;
        while let Some(children) = self.nodes[node_idx].children {
            node_idx = children[self.nodes[node_idx].quadrant(x, y)];
        }
        let node = &mut self.nodes[node_idx];
        node.entries.push(entry);
        if node.entries.len() > self.node_capacity && node.depth < self.max_depth {
            self.split(node_idx);
        }
        Ok(())
    }

    fn query(&self, envelope: &Envelope) -> Result<Vec<&T>, IndexError> {
        check_envelope(envelope)?;
        let mut found = Vec::new();
        let mut stack = vec![0usize];

        while let Some(idx) = stack.pop() {
            let node = self
                .nodes
                .get(idx)
                .ok_or_else(|| IndexError::Corrupt(format!("dangling node index {idx}")))?;
            if !node.bounds.intersects(envelope) {
                continue;
            }
            match node.children {
                Some(children) => stack.extend(children),
                None => {
                    for &entry in &node.entries {
                        let item = self.items.get(entry).ok_or_else(|| {
                            IndexError::Corrupt(format!("dangling item index {entry}"))
                        })?;
                        if envelope.contains_point(item.x(), item.y()) {
                            found.push(item);
                        }
                    }
                }
            }
        }
        Ok(found)
    }

    fn root_bounding_box(&self) -> Result<Envelope, IndexError> {
        self.extent.ok_or(IndexError::Empty)
    }
}
