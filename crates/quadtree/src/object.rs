//! Objects that can be stored in the tree.

use std::fmt;

use glam::DVec2;
use rand::Rng;

use crate::geometry::{AxisAlignedBox, Point};

/// Unique 128-bit particle identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleId(pub u128);

impl ParticleId {
    /// Draw a fresh identifier from the thread-local RNG.
    pub fn random() -> Self {
        Self(rand::rng().random())
    }

    /// Draw an identifier from the given RNG.
    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        Self(rng.random())
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// A circular particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    pub position: Point,
    pub radius: f64,
}

impl Particle {
    /// Create a particle.
    ///
    /// # Panics
    ///
    /// Panics if `radius` is negative or not finite.
    pub fn new(id: ParticleId, position: Point, radius: f64) -> Self {
        assert!(
            radius.is_finite() && radius >= 0.0,
            "particle radius must be finite and non-negative, got {radius}"
        );
        Self { id, position, radius }
    }

    /// Create a particle with a random identifier.
    pub fn with_random_id(x: f64, y: f64, radius: f64) -> Self {
        Self::new(ParticleId::random(), DVec2::new(x, y), radius)
    }

    /// Squared distance between centers.
    #[inline]
    pub fn distance_squared(&self, other: &Particle) -> f64 {
        self.position.distance_squared(other.position)
    }
}

/// Something storable in the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    /// A bare coordinate pair with no extent.
    Point(Point),
    /// A disk with an identifier.
    Particle(Particle),
}

impl Object {
    /// Shorthand for a point object.
    #[inline]
    pub fn point(x: f64, y: f64) -> Self {
        Object::Point(DVec2::new(x, y))
    }

    /// Reference point of the object (the disk center for particles).
    #[inline]
    pub fn position(&self) -> Point {
        match self {
            Object::Point(p) => *p,
            Object::Particle(p) => p.position,
        }
    }

    /// Containment in `bounds`: inclusive for points, disk-exclusive for
    /// particles.
    #[inline]
    pub fn is_contained_in(&self, bounds: &AxisAlignedBox) -> bool {
        match self {
            Object::Point(p) => bounds.contains_point(*p),
            Object::Particle(p) => bounds.contains_disk(p.position, p.radius),
        }
    }

    #[inline]
    pub fn as_particle(&self) -> Option<&Particle> {
        match self {
            Object::Particle(p) => Some(p),
            Object::Point(_) => None,
        }
    }
}

impl From<Particle> for Object {
    fn from(particle: Particle) -> Self {
        Object::Particle(particle)
    }
}

impl From<Point> for Object {
    fn from(point: Point) -> Self {
        Object::Point(point)
    }
}
