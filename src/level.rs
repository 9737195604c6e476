//! Level catalog
//!
//! A level is an ordered list of entity descriptors, either as a bare JSON
//! array or wrapped as `{ "name": .., "entities": [..] }`. Each descriptor is
//! validated on its own: a bad entry is skipped and reported, the rest load.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GameError;
use crate::sim::{Direction, Effect, Entity, EntityId, EntityKind};

/// A validated, ready-to-spawn entity description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: EntityKind,
    pub position: Vec3,
    /// Full box size
    pub size: Vec3,
    pub material: Option<String>,
    pub collidable: bool,
    /// Oscillates across the canal (asteroids only)
    pub moving: bool,
}

impl Placement {
    pub fn new(kind: EntityKind, position: Vec3, size: Vec3) -> Self {
        Self {
            kind,
            position,
            size,
            material: None,
            collidable: true,
            moving: false,
        }
    }

    pub fn moving(mut self) -> Self {
        self.moving = true;
        self
    }

    pub fn into_entity(self, id: EntityId) -> Entity {
        let oscillation = (self.moving && self.kind == EntityKind::Asteroid).then_some(Direction::Right);
        let mut entity = Entity::new(id, self.kind, self.position, self.size);
        entity.collidable = self.collidable;
        entity.oscillation = oscillation;
        entity.material = self.material;
        entity
    }
}

/// Wire form of a descriptor, before validation
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    kind: String,
    position: [f32; 3],
    size: [f32; 3],
    #[serde(default)]
    material: Option<String>,
    #[serde(default = "default_collidable")]
    collidable: bool,
    #[serde(default)]
    moving: bool,
    #[serde(default)]
    effect: Option<String>,
}

fn default_collidable() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    Bare(Vec<Value>),
    Named {
        #[serde(default)]
        name: Option<String>,
        entities: Vec<Value>,
    },
}

/// Decoded level: everything needed to (re)build the world
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelCatalog {
    pub name: String,
    pub placements: Vec<Placement>,
}

impl LevelCatalog {
    /// Decode a level document.
    ///
    /// Fails only when the document itself is unreadable. Malformed entries
    /// come back in the second tuple field.
    pub fn decode(json: &str) -> Result<(Self, Vec<GameError>), GameError> {
        let (name, entries) = match serde_json::from_str::<Document>(json)? {
            Document::Bare(entries) => (String::from("untitled"), entries),
            Document::Named { name, entities } => (name.unwrap_or_else(|| "untitled".into()), entities),
        };

        let mut placements = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();
        for (index, value) in entries.into_iter().enumerate() {
            match parse_entry(index, value) {
                Ok(placement) => placements.push(placement),
                Err(err) => {
                    log::warn!("{}", err);
                    skipped.push(err);
                }
            }
        }

        log::info!(
            "Decoded level '{}': {} entities, {} skipped",
            name,
            placements.len(),
            skipped.len()
        );
        Ok((Self { name, placements }, skipped))
    }

    /// Read and decode a level file from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: impl AsRef<std::path::Path>) -> Result<(Self, Vec<GameError>), GameError> {
        let json = std::fs::read_to_string(path)?;
        Self::decode(&json)
    }

    /// Built-in corridor used by the headless runner and tests
    pub fn demo() -> Self {
        let wall = |x, y, z, sx, sy, sz| Placement::new(EntityKind::Wall, Vec3::new(x, y, z), Vec3::new(sx, sy, sz));
        let powerup = |effect, x, z| Placement::new(EntityKind::Powerup(effect), Vec3::new(x, 0.0, z), Vec3::splat(2.0));
        let gate = |x| Placement::new(EntityKind::Finish, Vec3::new(x, 19.0, 300.0), Vec3::new(27.0, 42.0, 4.0));

        Self {
            name: "demo corridor".into(),
            placements: vec![
                powerup(Effect::Points, 0.0, 40.0),
                wall(-20.0, 0.0, 60.0, 20.0, 30.0, 4.0),
                wall(5.0, 15.0, 100.0, 10.0, 10.0, 10.0),
                powerup(Effect::Health, 10.0, 120.0),
                wall(20.0, 10.0, 140.0, 20.0, 20.0, 4.0),
                Placement::new(EntityKind::Asteroid, Vec3::new(0.0, 0.0, 180.0), Vec3::splat(6.0)).moving(),
                powerup(Effect::Invincible, -10.0, 200.0),
                Placement::new(EntityKind::Asteroid, Vec3::new(-15.0, 5.0, 220.0), Vec3::splat(8.0)),
                gate(-27.0),
                gate(0.0),
                gate(27.0),
            ],
        }
    }

    /// Build world entities, drawing ids from `next_id`
    pub fn instantiate(&self, mut next_id: impl FnMut() -> EntityId) -> Vec<Entity> {
        self.placements
            .iter()
            .cloned()
            .map(|placement| placement.into_entity(next_id()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

fn parse_entry(index: usize, value: Value) -> Result<Placement, GameError> {
    let malformed = |reason: String| GameError::MalformedEntry { index, reason };

    let raw: RawDescriptor = serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;

    let effect = match raw.effect.as_deref() {
        None => None,
        Some("points") => Some(Effect::Points),
        Some("health") => Some(Effect::Health),
        Some("invincible") => Some(Effect::Invincible),
        Some(other) => return Err(malformed(format!("unknown effect `{other}`"))),
    };

    let kind = match raw.kind.as_str() {
        "wall" => EntityKind::Wall,
        "asteroid" => EntityKind::Asteroid,
        "finish" => EntityKind::Finish,
        "powerup" => EntityKind::Powerup(effect.ok_or_else(|| malformed("powerup without effect".into()))?),
        other => return Err(malformed(format!("unknown kind `{other}`"))),
    };

    let position = Vec3::from_array(raw.position);
    let size = Vec3::from_array(raw.size);
    if !position.is_finite() {
        return Err(malformed("position is not finite".into()));
    }
    if !size.is_finite() || size.min_element() <= 0.0 {
        return Err(malformed("size must be positive".into()));
    }

    Ok(Placement {
        kind,
        position,
        size,
        material: raw.material,
        collidable: raw.collidable,
        moving: raw.moving,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bare_list() {
        let json = r#"[
            { "kind": "wall", "position": [5, 15, 100], "size": [10, 10, 10], "material": "green" },
            { "kind": "powerup", "position": [0, 0, 40], "size": [2, 2, 2], "effect": "health" }
        ]"#;
        let (catalog, skipped) = LevelCatalog::decode(json).unwrap();
        assert!(skipped.is_empty());
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.placements[0].kind, EntityKind::Wall);
        assert_eq!(catalog.placements[0].material.as_deref(), Some("green"));
        assert!(catalog.placements[0].collidable);
        assert_eq!(catalog.placements[1].kind, EntityKind::Powerup(Effect::Health));
    }

    #[test]
    fn test_decode_named_document() {
        let json = r#"{ "name": "canal one", "entities": [
            { "kind": "finish", "position": [0, 0, 300], "size": [80, 40, 4] }
        ] }"#;
        let (catalog, _) = LevelCatalog::decode(json).unwrap();
        assert_eq!(catalog.name, "canal one");
        assert_eq!(catalog.placements[0].kind, EntityKind::Finish);
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let json = r#"[
            { "kind": "tree", "position": [0, 0, 0], "size": [1, 1, 1] },
            { "kind": "wall", "size": [1, 1, 1] },
            { "kind": "powerup", "position": [0, 0, 0], "size": [1, 1, 1] },
            { "kind": "wall", "position": [0, 0, 0], "size": [0, 1, 1] },
            { "kind": "asteroid", "position": [1, 2, 3], "size": [3, 3, 3], "moving": true }
        ]"#;
        let (catalog, skipped) = LevelCatalog::decode(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.placements[0].kind, EntityKind::Asteroid);
        assert!(catalog.placements[0].moving);

        let indices: Vec<usize> = skipped
            .iter()
            .map(|e| match e {
                GameError::MalformedEntry { index, .. } => *index,
                other => panic!("unexpected error {other}"),
            })
            .collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_unreadable_document_fails() {
        assert!(matches!(
            LevelCatalog::decode("{\"walls\": 3}"),
            Err(GameError::LevelParse(_))
        ));
        assert!(LevelCatalog::decode("not json").is_err());
    }

    #[test]
    fn test_instantiate_assigns_ids_and_oscillation() {
        let catalog = LevelCatalog::demo();
        let mut next = 100;
        let entities = catalog.instantiate(|| {
            next += 1;
            next
        });
        assert_eq!(entities.len(), catalog.len());
        assert_eq!(entities[0].id, 101);
        let moving: Vec<_> = entities.iter().filter(|e| e.oscillation.is_some()).collect();
        assert_eq!(moving.len(), 1);
        assert_eq!(moving[0].kind, EntityKind::Asteroid);
    }

    #[test]
    fn test_shipped_corridor_decodes_cleanly() {
        let (catalog, skipped) = LevelCatalog::decode(include_str!("../levels/corridor.json")).unwrap();
        assert!(skipped.is_empty());
        assert_eq!(catalog.name, "trench run");
        assert_eq!(catalog.placements.iter().filter(|p| p.kind == EntityKind::Finish).count(), 3);
        assert_eq!(catalog.placements.iter().filter(|p| !p.collidable).count(), 1);
    }

    #[test]
    fn test_moving_flag_ignored_for_walls() {
        let entity = Placement::new(EntityKind::Wall, Vec3::ZERO, Vec3::ONE).moving().into_entity(1);
        assert!(entity.oscillation.is_none());
    }
}
