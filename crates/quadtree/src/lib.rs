//! Region quadtree for 2D spatial indexing and particle collision detection.
//!
//! A [`QuadTreeNode`] covers a square region and subdivides it lazily into
//! four quadrants as objects arrive. The tree answers range queries and finds
//! every overlapping pair of circular particles without comparing all pairs.
//!
//! Trees are built fresh for each use: construct a root, insert everything,
//! query, then discard. There is no removal.
//!
//! ```
//! use glam::DVec2;
//! use quadtree::{AxisAlignedBox, Object, Particle, QuadTreeNode};
//!
//! let mut root = QuadTreeNode::with_params(DVec2::new(0.5, 0.5), 0.5, 0.1, 1);
//! assert!(root.insert(Object::point(0.1, 0.1)));
//! assert!(root.insert(Particle::with_random_id(0.7, 0.7, 0.05)));
//! assert!(root.insert(Particle::with_random_id(0.75, 0.7, 0.05)));
//!
//! let everything = root.query(&AxisAlignedBox::from_center(0.5, 0.5, 0.5));
//! assert_eq!(everything.len(), 3);
//! assert_eq!(root.collisions_all().len(), 1);
//! ```

pub mod collision;
pub mod config;
pub mod error;
pub mod geometry;
pub mod object;
pub mod spatial;

// Re-export commonly used types
pub use collision::{brute_force, CollisionEvent};
pub use config::{Config, Overflow, RegionConfig, ScenarioConfig, TreeConfig};
pub use error::{ConfigError, InsertError};
pub use geometry::{AxisAlignedBox, Point};
pub use object::{Object, Particle, ParticleId};
pub use spatial::{Pruning, QuadTreeNode, Quadrant};
