//! Collision detection between circular particles.
//!
//! Two particles collide when the squared distance between their centers is
//! strictly less than the squared sum of their radii. Events carry the
//! squared distance so no square root is taken on the hot path.
//!
//! Every particle in the tree lives at exactly one node, strictly inside that
//! node's boundary. Particles in sibling subtrees are therefore separated by a
//! quadrant edge and cannot overlap, so a node only has to compare:
//! - pairs among its own objects,
//! - its own objects against each child subtree,
//! - and recurse into each child for pairs stored deeper.

use std::collections::BTreeSet;

use glam::DVec2;

use crate::geometry::AxisAlignedBox;
use crate::object::{Object, Particle, ParticleId};
use crate::spatial::QuadTreeNode;

/// A detected overlap between two particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub first: ParticleId,
    pub second: ParticleId,
    /// Squared distance between the two centers.
    pub distance_squared: f64,
}

impl CollisionEvent {
    /// The two identifiers, smallest first.
    #[inline]
    pub fn pair(&self) -> (ParticleId, ParticleId) {
        if self.first <= self.second {
            (self.first, self.second)
        } else {
            (self.second, self.first)
        }
    }

    #[inline]
    pub fn involves(&self, id: ParticleId) -> bool {
        self.first == id || self.second == id
    }

    /// The identifier on the other side of `id`, if `id` is part of this event.
    #[inline]
    pub fn other(&self, id: ParticleId) -> Option<ParticleId> {
        if self.first == id {
            Some(self.second)
        } else if self.second == id {
            Some(self.first)
        } else {
            None
        }
    }
}

/// Check two particles for overlap.
#[inline]
pub fn check_particle_collision(a: &Particle, b: &Particle) -> Option<CollisionEvent> {
    let r = a.radius + b.radius;
    let squared = a.distance_squared(b);
    (squared < r * r).then_some(CollisionEvent {
        first: a.id,
        second: b.id,
        distance_squared: squared,
    })
}

/// All overlapping pairs by exhaustive O(n²) comparison.
pub fn brute_force(particles: &[Particle]) -> Vec<CollisionEvent> {
    let mut events = Vec::new();
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            events.extend(check_particle_collision(a, b));
        }
    }
    events
}

/// Collapse events into a set of unordered identifier pairs.
pub fn pair_set(events: &[CollisionEvent]) -> BTreeSet<(ParticleId, ParticleId)> {
    events.iter().map(CollisionEvent::pair).collect()
}

/// Whether `probe` can reach anything strictly inside `bounds`.
#[inline]
fn may_reach(bounds: &AxisAlignedBox, probe: &Particle) -> bool {
    let lo = bounds.min() - DVec2::splat(probe.radius);
    let hi = bounds.max() + DVec2::splat(probe.radius);
    let p = probe.position;
    p.x >= lo.x && p.x <= hi.x && p.y >= lo.y && p.y <= hi.y
}

impl QuadTreeNode {
    /// Every stored particle colliding with `probe`.
    ///
    /// A stored particle with the probe's identifier is skipped, so probing
    /// with a particle that is itself in the tree does not report a
    /// self-collision. Subtrees the probe's disk cannot reach are pruned.
    pub fn collisions_against(&self, probe: &Particle) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        self.collect_against(probe, &mut events);
        events
    }

    fn collect_against(&self, probe: &Particle, events: &mut Vec<CollisionEvent>) {
        for other in self.objects().iter().filter_map(Object::as_particle) {
            if other.id == probe.id {
                continue;
            }
            events.extend(check_particle_collision(probe, other));
        }

        if let Some(children) = self.children() {
            for child in children {
                if may_reach(child.boundary(), probe) {
                    child.collect_against(probe, events);
                }
            }
        }
    }

    /// Every colliding pair within this subtree, each reported once.
    pub fn collisions_all(&self) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        self.collect_all(&mut events);
        events
    }

    fn collect_all(&self, events: &mut Vec<CollisionEvent>) {
        let local: Vec<&Particle> = self.objects().iter().filter_map(Object::as_particle).collect();

        for (i, a) in local.iter().enumerate() {
            for b in &local[i + 1..] {
                events.extend(check_particle_collision(a, b));
            }
        }

        if let Some(children) = self.children() {
            for child in children {
                for particle in &local {
                    if may_reach(child.boundary(), particle) {
                        child.collect_against(particle, events);
                    }
                }
                child.collect_all(events);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::{BTreeMap, BTreeSet};

    fn particle(id: u128, x: f64, y: f64, r: f64) -> Particle {
        Particle::new(ParticleId(id), DVec2::new(x, y), r)
    }

    fn random_particles(rng: &mut StdRng, n: usize, min_r: f64, max_r: f64) -> Vec<Particle> {
        (0..n)
            .map(|_| {
                let r = rng.random_range(min_r..max_r);
                let x = rng.random_range(r + 1e-6..1.0 - r - 1e-6);
                let y = rng.random_range(r + 1e-6..1.0 - r - 1e-6);
                Particle::new(ParticleId::from_rng(rng), DVec2::new(x, y), r)
            })
            .collect()
    }

    fn build(particles: &[Particle], min_width: f64, max_objects: usize) -> QuadTreeNode {
        let mut root = QuadTreeNode::with_params(DVec2::new(0.5, 0.5), 0.5, min_width, max_objects);
        for p in particles {
            assert!(root.insert(*p), "failed to insert {p:?}");
        }
        root
    }

    #[test]
    fn test_close_pair_collides() {
        let a = particle(1, 0.0, 0.0, 0.05);
        let b = particle(2, 0.05, 0.0, 0.05);
        let event = check_particle_collision(&a, &b).unwrap();
        assert_eq!(event.pair(), (ParticleId(1), ParticleId(2)));
        assert!((event.distance_squared - 0.0025).abs() < 1e-12);
    }

    #[test]
    fn test_far_pair_does_not_collide() {
        let a = particle(1, 0.0, 0.0, 0.1);
        let b = particle(2, 1.0, 0.0, 0.1);
        assert!(check_particle_collision(&a, &b).is_none());
    }

    #[test]
    fn test_touching_pair_does_not_collide() {
        let a = particle(1, 0.0, 0.0, 0.5);
        let b = particle(2, 1.0, 0.0, 0.5);
        assert!(check_particle_collision(&a, &b).is_none());
    }

    #[test]
    fn test_tree_reports_close_pair() {
        let mut root = QuadTreeNode::with_params(DVec2::ZERO, 1.0, 0.01, 4);
        root.insert(particle(1, 0.0, 0.0, 0.05));
        root.insert(particle(2, 0.05, 0.0, 0.05));

        let events = root.collisions_all();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].pair(), (ParticleId(1), ParticleId(2)));
        assert!((events[0].distance_squared - 0.0025).abs() < 1e-12);
    }

    #[test]
    fn test_tree_ignores_far_pair() {
        let mut root = QuadTreeNode::with_params(DVec2::ZERO, 2.0, 0.01, 4);
        root.insert(particle(1, 0.0, 0.0, 0.1));
        root.insert(particle(2, 1.0, 0.0, 0.1));
        assert!(root.collisions_all().is_empty());
    }

    #[test]
    fn test_cross_level_pair_found() {
        // The straddler stays at the root while its neighbour sits in NE.
        let mut root = QuadTreeNode::with_params(DVec2::ZERO, 1.0, 0.01, 1);
        root.insert(particle(1, 0.3, 0.3, 0.1));
        root.insert(particle(2, 0.05, 0.05, 0.3));
        assert_eq!(root.objects().len(), 1);

        let events = root.collisions_all();
        assert_eq!(pair_set(&events), BTreeSet::from([(ParticleId(1), ParticleId(2))]));
    }

    #[test]
    fn test_against_skips_self_and_finds_neighbours() {
        let particles = [
            particle(1, 0.2, 0.2, 0.05),
            particle(2, 0.25, 0.2, 0.05),
            particle(3, 0.8, 0.8, 0.05),
        ];
        let root = build(&particles, 0.01, 1);

        let events = root.collisions_against(&particles[0]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].other(ParticleId(1)), Some(ParticleId(2)));

        let probe = particle(99, 0.8, 0.75, 0.02);
        let events = root.collisions_against(&probe);
        assert_eq!(events.len(), 1);
        assert!(events[0].involves(ParticleId(3)));
    }

    #[test]
    fn test_points_never_collide() {
        let mut root = QuadTreeNode::with_params(DVec2::new(0.5, 0.5), 0.5, 0.01, 2);
        root.insert(Object::point(0.5, 0.5));
        root.insert(Object::point(0.5, 0.5));
        root.insert(particle(1, 0.5, 0.5, 0.1));
        assert!(root.collisions_all().is_empty());
        assert_eq!(root.collisions_against(&particle(2, 0.5, 0.5, 0.1)).len(), 1);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for (n, max_objects) in [(50, 1), (300, 4), (600, 8)] {
            let particles = random_particles(&mut rng, n, 0.002, 0.03);
            let root = build(&particles, 0.01, max_objects);

            let tree = root.collisions_all();
            let brute = brute_force(&particles);
            assert_eq!(tree.len(), brute.len(), "duplicate or missing events for n={n}");
            assert_eq!(pair_set(&tree), pair_set(&brute));
        }
    }

    #[test]
    fn test_distances_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(11);
        let particles = random_particles(&mut rng, 200, 0.01, 0.04);
        let root = build(&particles, 0.01, 2);

        let brute: BTreeMap<_, _> = brute_force(&particles)
            .into_iter()
            .map(|e| (e.pair(), e.distance_squared))
            .collect();
        for event in root.collisions_all() {
            assert_eq!(brute.get(&event.pair()), Some(&event.distance_squared));
        }
    }

    #[test]
    fn test_against_is_symmetric() {
        let mut rng = StdRng::seed_from_u64(3);
        let particles = random_particles(&mut rng, 250, 0.005, 0.04);
        let root = build(&particles, 0.01, 3);

        let neighbours: BTreeMap<ParticleId, BTreeSet<ParticleId>> = particles
            .iter()
            .map(|p| {
                let hits = root
                    .collisions_against(p)
                    .iter()
                    .filter_map(|e| e.other(p.id))
                    .collect();
                (p.id, hits)
            })
            .collect();

        for (a, hits) in &neighbours {
            for b in hits {
                assert!(neighbours[b].contains(a), "{a} sees {b} but not the reverse");
            }
        }

        let from_probes: BTreeSet<_> = neighbours
            .iter()
            .flat_map(|(a, hits)| hits.iter().map(move |b| if a < b { (*a, *b) } else { (*b, *a) }))
            .collect();
        assert_eq!(from_probes, pair_set(&root.collisions_all()));
    }
}
