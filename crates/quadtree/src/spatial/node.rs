//! Quadtree node and insertion.
//!
//! Nodes subdivide lazily: a leaf stores objects directly until it holds
//! `max_objects`, and the next arrival splits it into four quadrants (as long
//! as the leaf is wider than `min_width`). On a split the stored objects are
//! pushed down into whichever child contains them entirely. Objects that
//! straddle a quadrant boundary stay at the parent; once the parent is full,
//! [`Overflow`] decides whether further straddlers are kept or refused.

use std::fmt;

use tracing::{debug, trace};

use crate::config::{Overflow, RegionConfig, TreeConfig};
use crate::error::InsertError;
use crate::geometry::{AxisAlignedBox, Point};
use crate::object::Object;

/// Child slot of a subdivided node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Quadrant {
    /// All quadrants in child order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    /// Index into the children array (and into [`AxisAlignedBox::subdivide`]).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A node of a region quadtree.
///
/// The root owns the whole tree. Children are created as a complete set of
/// four and each covers one quadrant of the parent's boundary.
pub struct QuadTreeNode {
    boundary: AxisAlignedBox,
    objects: Vec<Object>,
    params: TreeConfig,
    children: Option<Box<[QuadTreeNode; 4]>>,
    is_root: bool,
}

impl QuadTreeNode {
    /// Create a root node with default subdivision parameters.
    pub fn new(center: Point, half_width: f64) -> Self {
        Self::with_config(center, half_width, &TreeConfig::default())
    }

    /// Create a root node with explicit width floor and capacity.
    pub fn with_params(center: Point, half_width: f64, min_width: f64, max_objects: usize) -> Self {
        Self::with_config(center, half_width, &TreeConfig::new(min_width, max_objects))
    }

    /// Create a root node with the given subdivision parameters.
    ///
    /// # Panics
    ///
    /// Panics if `half_width` is not finite and positive, `min_width` is not
    /// finite and positive, or `max_objects` is zero.
    pub fn with_config(center: Point, half_width: f64, params: &TreeConfig) -> Self {
        assert!(
            params.min_width.is_finite() && params.min_width > 0.0,
            "min_width must be finite and positive, got {}",
            params.min_width
        );
        assert!(params.max_objects > 0, "max_objects must be at least 1");
        let mut root = Self::leaf(AxisAlignedBox::new(center, half_width), *params);
        root.is_root = true;
        root
    }

    /// Create a root node covering `region` with the parameters in `tree`.
    pub fn from_config(tree: &TreeConfig, region: &RegionConfig) -> Self {
        let bounds = region.bounds();
        Self::with_config(bounds.center(), bounds.half_width(), tree)
    }

    fn leaf(boundary: AxisAlignedBox, params: TreeConfig) -> Self {
        Self {
            boundary,
            objects: Vec::with_capacity(params.max_objects),
            params,
            children: None,
            is_root: false,
        }
    }

    #[inline]
    pub fn boundary(&self) -> &AxisAlignedBox {
        &self.boundary
    }

    /// Objects stored directly at this node, in insertion order.
    #[inline]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// The four children in NW, NE, SW, SE order, if subdivided.
    #[inline]
    pub fn children(&self) -> Option<&[QuadTreeNode; 4]> {
        self.children.as_deref()
    }

    #[inline]
    pub fn child(&self, quadrant: Quadrant) -> Option<&QuadTreeNode> {
        self.children().map(|children| &children[quadrant.index()])
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    #[inline]
    pub fn min_width(&self) -> f64 {
        self.params.min_width
    }

    #[inline]
    pub fn max_objects(&self) -> usize {
        self.params.max_objects
    }

    #[inline]
    pub fn overflow(&self) -> Overflow {
        self.params.overflow
    }

    /// Insert an object, reporting only success or failure.
    pub fn insert(&mut self, object: impl Into<Object>) -> bool {
        self.try_insert(object).is_ok()
    }

    /// Insert an object.
    ///
    /// Fails with [`InsertError::OutOfBounds`] if the object is not contained
    /// in this node's boundary (the tree is left untouched), or with
    /// [`InsertError::CapacityExceeded`] if it straddles quadrants of a node
    /// that is already full and configured with [`Overflow::Reject`].
    pub fn try_insert(&mut self, object: impl Into<Object>) -> Result<(), InsertError> {
        let object = object.into();
        if !object.is_contained_in(&self.boundary) {
            debug!(position = %object.position(), "rejected object outside node boundary");
            return Err(InsertError::OutOfBounds);
        }
        self.place(object)
    }

    /// Route an object already known to be contained in this node.
    fn place(&mut self, object: Object) -> Result<(), InsertError> {
        if self.children.is_none() {
            if self.objects.len() < self.params.max_objects || !self.can_subdivide() {
                self.objects.push(object);
                return Ok(());
            }
            self.subdivide();
        }

        if self.place_in_children(object).is_ok() {
            return Ok(());
        }

        if self.objects.len() < self.params.max_objects || self.params.overflow == Overflow::Keep {
            self.objects.push(object);
            Ok(())
        } else {
            debug!(
                position = %object.position(),
                width = self.boundary.width(),
                "node at capacity, object straddles quadrants"
            );
            Err(InsertError::CapacityExceeded)
        }
    }

    /// Offer an object to the children in NW, NE, SW, SE order.
    fn place_in_children(&mut self, object: Object) -> Result<(), InsertError> {
        let Some(children) = self.children.as_deref_mut() else {
            return Err(InsertError::CapacityExceeded);
        };
        let mut result = Err(InsertError::CapacityExceeded);
        for child in children.iter_mut() {
            if !object.is_contained_in(&child.boundary) {
                continue;
            }
            match child.place(object) {
                Ok(()) => return Ok(()),
                Err(e) => result = Err(e),
            }
        }
        result
    }

    #[inline]
    fn can_subdivide(&self) -> bool {
        self.boundary.width() > self.params.min_width
    }

    fn subdivide(&mut self) {
        let params = self.params;
        let children = self.boundary.subdivide().map(|quadrant| Self::leaf(quadrant, params));
        self.children = Some(Box::new(children));

        let stored = std::mem::take(&mut self.objects);
        trace!(
            center = %self.boundary.center(),
            half_width = self.boundary.half_width(),
            pushed = stored.len(),
            "subdivided node"
        );
        for object in stored {
            if self.place_in_children(object).is_err() {
                self.objects.push(object);
            }
        }
    }

    /// Depth-first pre-order walk over this node and its descendants.
    ///
    /// Children are visited in NW, NE, SW, SE order.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }

    /// Total number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// Number of levels in this subtree. A leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .map(|children| children.iter().map(QuadTreeNode::depth).max().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Total number of objects stored in this subtree.
    pub fn len(&self) -> usize {
        self.nodes().map(|node| node.objects.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes().all(|node| node.objects.is_empty())
    }
}

impl fmt::Debug for QuadTreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadTreeNode")
            .field("boundary", &self.boundary)
            .field("objects", &self.objects.len())
            .field("nodes", &self.node_count())
            .field("is_root", &self.is_root)
            .finish()
    }
}

/// Iterator returned by [`QuadTreeNode::nodes`].
pub struct Nodes<'a> {
    stack: Vec<&'a QuadTreeNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a QuadTreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(children) = node.children() {
            self.stack.extend(children.iter().rev());
        }
        Some(node)
    }
}
