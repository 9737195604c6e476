//! Spatial proximity index
//!
//! Keeps the subset of world entities near enough to the ship to be worth
//! ray-testing. Membership is insertion-ordered, and that order is the
//! tie-break order used by the collision resolver.

use std::collections::HashSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityIndex};

/// Entities currently within the proximity threshold of the ship
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollidableSet {
    members: Vec<EntityId>,
}

impl CollidableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring membership up to date with the ship's position.
    ///
    /// Evicts members that are now farther than `threshold` or no longer
    /// exist (O(k) over the members), then appends every entity within
    /// `threshold` that is not yet a member (O(n) over the entities).
    pub fn refresh(&mut self, ship_pos: Vec3, index: &EntityIndex, threshold: f32) {
        let within = |e: &Entity| ship_pos.distance(e.pos) <= threshold;

        self.members.retain(|&id| index.get(id).is_some_and(|e| within(e)));

        let present: HashSet<EntityId> = self.members.iter().copied().collect();
        for entity in index.entities() {
            if within(entity) && !present.contains(&entity.id) {
                self.members.push(entity.id);
            }
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    /// Drop a member immediately (consumed powerups)
    pub fn remove(&mut self, id: EntityId) {
        self.members.retain(|m| *m != id);
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.members.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;
    use proptest::prelude::*;

    fn wall_at(id: EntityId, pos: Vec3) -> Entity {
        Entity::new(id, EntityKind::Wall, pos, Vec3::splat(2.0))
    }

    #[test]
    fn test_adds_within_threshold_only() {
        let entities = vec![
            wall_at(1, Vec3::new(0.0, 0.0, 10.0)),
            wall_at(2, Vec3::new(0.0, 0.0, 50.0)),
            wall_at(3, Vec3::new(30.0, 0.0, 0.0)),
        ];
        let mut set = CollidableSet::new();
        set.refresh(Vec3::ZERO, &EntityIndex::new(&entities), 30.0);

        // Exactly on the threshold counts as inside
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_evicts_several_members_in_one_pass() {
        let entities: Vec<Entity> = (1..=5)
            .map(|i| wall_at(i, Vec3::new(0.0, 0.0, i as f32)))
            .collect();
        let mut set = CollidableSet::new();
        set.refresh(Vec3::ZERO, &EntityIndex::new(&entities), 30.0);
        assert_eq!(set.len(), 5);

        // Ship jumps far ahead: every member must go, not every other one
        set.refresh(Vec3::new(0.0, 0.0, 500.0), &EntityIndex::new(&entities), 30.0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_evicts_entities_removed_from_world() {
        let mut entities = vec![wall_at(1, Vec3::ZERO), wall_at(2, Vec3::ONE)];
        let mut set = CollidableSet::new();
        set.refresh(Vec3::ZERO, &EntityIndex::new(&entities), 30.0);
        entities.retain(|e| e.id != 1);
        set.refresh(Vec3::ZERO, &EntityIndex::new(&entities), 30.0);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_evicts_from_large_set() {
        let entities: Vec<Entity> = (1..=20_000)
            .map(|i| wall_at(i, Vec3::new(0.0, 0.0, (i % 50) as f32)))
            .collect();
        let index = EntityIndex::new(&entities);
        let mut set = CollidableSet::new();
        set.refresh(Vec3::ZERO, &index, 30.0);
        // z in 0..=30 is 31 of every 50 entities
        assert_eq!(set.len(), 20_000 / 50 * 31);

        // Keep only z in 20..=49
        set.refresh(Vec3::new(0.0, 0.0, 49.0), &index, 29.0);
        assert_eq!(set.len(), 20_000 / 50 * 30);
        assert!(set.iter().all(|id| (id % 50) >= 20));

        set.refresh(Vec3::new(0.0, 0.0, 1.0e4), &index, 30.0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_membership_order_is_insertion_order() {
        let mut entities = vec![wall_at(7, Vec3::new(0.0, 0.0, 20.0))];
        let mut set = CollidableSet::new();
        set.refresh(Vec3::ZERO, &EntityIndex::new(&entities), 30.0);
        entities.insert(0, wall_at(3, Vec3::new(0.0, 0.0, 5.0)));
        set.refresh(Vec3::ZERO, &EntityIndex::new(&entities), 30.0);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![7, 3]);
    }

    fn arb_entities() -> impl Strategy<Value = Vec<Entity>> {
        prop::collection::vec((-80.0f32..80.0, -80.0f32..80.0, -80.0f32..80.0), 0..40).prop_map(
            |points| {
                points
                    .into_iter()
                    .enumerate()
                    .map(|(i, (x, y, z))| wall_at(i as EntityId + 1, Vec3::new(x, y, z)))
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_membership_matches_distance(
            entities in arb_entities(),
            start in (-50.0f32..50.0, -50.0f32..50.0, -50.0f32..50.0),
            ship in (-50.0f32..50.0, -50.0f32..50.0, -50.0f32..50.0),
        ) {
            let mut set = CollidableSet::new();
            set.refresh(Vec3::new(start.0, start.1, start.2), &EntityIndex::new(&entities), 30.0);
            let ship = Vec3::new(ship.0, ship.1, ship.2);
            set.refresh(ship, &EntityIndex::new(&entities), 30.0);

            for e in &entities {
                prop_assert_eq!(set.contains(e.id), ship.distance(e.pos) <= 30.0);
            }
            let mut ids: Vec<_> = set.iter().collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), set.len());
        }

        #[test]
        fn prop_refresh_is_idempotent(
            entities in arb_entities(),
            ship in (-50.0f32..50.0, -50.0f32..50.0, -50.0f32..50.0),
        ) {
            let ship = Vec3::new(ship.0, ship.1, ship.2);
            let mut set = CollidableSet::new();
            set.refresh(ship, &EntityIndex::new(&entities), 30.0);
            let first: Vec<_> = set.iter().collect();
            set.refresh(ship, &EntityIndex::new(&entities), 30.0);
            let second: Vec<_> = set.iter().collect();
            prop_assert_eq!(first, second);
        }
    }
}
