//! Deterministic in-memory host.
//!
//! A stand-in for a real game-server host, used by tests and CLI demos. It
//! implements the full boundary contract: cell lookup (with an invocation
//! counter so callers can verify caching), load/unload bookkeeping, and
//! entity enumeration in a deterministic order (BTreeMap over entity id).

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::Vec3;
use uuid::Uuid;

use crate::platform::{Cell, Entity, HostError, Locate, World};

/// Default cell edge length in world units.
pub const DEFAULT_CELL_SIZE: f32 = 16.0;

/// Unique identifier for an entity on the in-memory host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// What kind of thing an entity is. Only `Player` matters to GridKit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Creature,
    Item,
}

struct EntityRecord {
    position: Vec3,
    kind: EntityKind,
}

#[derive(Default)]
struct WorldState {
    entities: BTreeMap<EntityId, EntityRecord>,
    loaded: HashSet<(i32, i32)>,
}

struct WorldInner {
    name: String,
    cell_size: f32,
    state: Mutex<WorldState>,
    /// Number of `cell_at` invocations, successful or not.
    lookups: AtomicUsize,
    /// When set, every cell lookup fails as if the world were gone.
    detached: AtomicBool,
}

/// A named world on the in-memory host.
///
/// Cloning is cheap and clones refer to the same world; equality and hashing
/// follow reference identity, so two independently created worlds are never
/// equal even if they share a name.
#[derive(Clone)]
pub struct MemoryWorld {
    inner: Arc<WorldInner>,
}

impl MemoryWorld {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_cell_size(name, DEFAULT_CELL_SIZE)
    }

    pub fn with_cell_size(name: impl Into<String>, cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive");
        Self {
            inner: Arc::new(WorldInner {
                name: name.into(),
                cell_size,
                state: Mutex::new(WorldState::default()),
                lookups: AtomicUsize::new(0),
                detached: AtomicBool::new(false),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn cell_size(&self) -> f32 {
        self.inner.cell_size
    }

    /// Convert a world position to the coordinates of its containing cell.
    pub fn position_to_cell(&self, position: Vec3) -> (i32, i32) {
        (
            (position.x / self.inner.cell_size).floor() as i32,
            (position.z / self.inner.cell_size).floor() as i32,
        )
    }

    /// Spawn an entity at the given position. The returned value keeps a
    /// handle to this world so its containing cell can be derived later.
    pub fn spawn(&self, position: Vec3, kind: EntityKind) -> MemoryEntity {
        let id = EntityId::new();
        self.state()
            .entities
            .insert(id, EntityRecord { position, kind });
        MemoryEntity {
            world: self.clone(),
            id,
            position,
            kind,
        }
    }

    pub fn entity_count(&self) -> usize {
        self.state().entities.len()
    }

    /// The block at integer block coordinates (x, y, z).
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> MemoryBlock {
        MemoryBlock {
            world: self.clone(),
            x,
            y,
            z,
        }
    }

    /// A point location within this world.
    pub fn point_at(&self, position: Vec3) -> MemoryPoint {
        MemoryPoint {
            world: self.clone(),
            position,
        }
    }

    /// How many times `cell_at` has been invoked on this world.
    pub fn lookup_count(&self) -> usize {
        self.inner.lookups.load(Ordering::Relaxed)
    }

    /// Detach the world from the host: every subsequent cell lookup fails
    /// with [`HostError::WorldUnavailable`].
    pub fn detach(&self) {
        self.inner.detached.store(true, Ordering::Relaxed);
    }

    fn state(&self) -> MutexGuard<'_, WorldState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for MemoryWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryWorld")
            .field("name", &self.inner.name)
            .finish()
    }
}

impl PartialEq for MemoryWorld {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for MemoryWorld {}

impl Hash for MemoryWorld {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.inner) as usize).hash(state);
    }
}

impl World for MemoryWorld {
    type Cell = MemoryCell;

    fn cell_at(&self, x: i32, z: i32) -> Result<Self::Cell, HostError> {
        self.inner.lookups.fetch_add(1, Ordering::Relaxed);
        if self.inner.detached.load(Ordering::Relaxed) {
            return Err(HostError::WorldUnavailable {
                world: self.inner.name.clone(),
            });
        }
        tracing::debug!(world = %self.inner.name, x, z, "cell lookup");
        Ok(MemoryCell {
            world: self.clone(),
            x,
            z,
        })
    }
}

/// A cell on the in-memory host.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryCell {
    world: MemoryWorld,
    x: i32,
    z: i32,
}

impl Cell for MemoryCell {
    type World = MemoryWorld;
    type Entity = MemoryEntity;

    fn world(&self) -> MemoryWorld {
        self.world.clone()
    }

    fn x(&self) -> i32 {
        self.x
    }

    fn z(&self) -> i32 {
        self.z
    }

    fn is_loaded(&self) -> bool {
        self.world.state().loaded.contains(&(self.x, self.z))
    }

    fn load(&self) -> bool {
        tracing::debug!(x = self.x, z = self.z, "loading cell");
        self.world.state().loaded.insert((self.x, self.z));
        true
    }

    fn unload(&self) -> bool {
        tracing::debug!(x = self.x, z = self.z, "unloading cell");
        self.world.state().loaded.remove(&(self.x, self.z))
    }

    fn entities(&self) -> Vec<MemoryEntity> {
        let state = self.world.state();
        state
            .entities
            .iter()
            .filter(|(_, record)| {
                self.world.position_to_cell(record.position) == (self.x, self.z)
            })
            .map(|(id, record)| MemoryEntity {
                world: self.world.clone(),
                id: *id,
                position: record.position,
                kind: record.kind,
            })
            .collect()
    }
}

/// An entity on the in-memory host. Equality follows the entity id.
#[derive(Debug, Clone)]
pub struct MemoryEntity {
    world: MemoryWorld,
    id: EntityId,
    position: Vec3,
    kind: EntityKind,
}

impl MemoryEntity {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }
}

impl PartialEq for MemoryEntity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MemoryEntity {}

impl Entity for MemoryEntity {
    type Player = MemoryPlayer;

    fn as_player(&self) -> Option<MemoryPlayer> {
        (self.kind == EntityKind::Player).then(|| MemoryPlayer {
            id: self.id,
            position: self.position,
        })
    }
}

impl Locate for MemoryEntity {
    type Cell = MemoryCell;

    fn cell(&self) -> Result<MemoryCell, HostError> {
        let (x, z) = self.world.position_to_cell(self.position);
        self.world.cell_at(x, z)
    }
}

/// The player view of a player entity.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryPlayer {
    id: EntityId,
    position: Vec3,
}

impl MemoryPlayer {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
}

/// A block at integer coordinates on the in-memory host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBlock {
    world: MemoryWorld,
    x: i32,
    y: i32,
    z: i32,
}

impl Locate for MemoryBlock {
    type Cell = MemoryCell;

    fn cell(&self) -> Result<MemoryCell, HostError> {
        let cell_size = self.world.cell_size();
        let x = (self.x as f32 / cell_size).floor() as i32;
        let z = (self.z as f32 / cell_size).floor() as i32;
        self.world.cell_at(x, z)
    }
}

/// A point location within a world on the in-memory host.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryPoint {
    world: MemoryWorld,
    position: Vec3,
}

impl Locate for MemoryPoint {
    type Cell = MemoryCell;

    fn cell(&self) -> Result<MemoryCell, HostError> {
        let (x, z) = self.world.position_to_cell(self.position);
        self.world.cell_at(x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_to_cell_basic() {
        let world = MemoryWorld::new("overworld");
        assert_eq!(world.position_to_cell(Vec3::new(10.0, 0.0, 10.0)), (0, 0));
        assert_eq!(world.position_to_cell(Vec3::new(20.0, 0.0, -5.0)), (1, -1));
        assert_eq!(world.position_to_cell(Vec3::new(-0.5, 0.0, 0.0)), (-1, 0));
    }

    #[test]
    fn worlds_compare_by_identity() {
        let a = MemoryWorld::new("overworld");
        let b = MemoryWorld::new("overworld");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn cell_at_counts_lookups() {
        let world = MemoryWorld::new("overworld");
        assert_eq!(world.lookup_count(), 0);
        world.cell_at(0, 0).unwrap();
        world.cell_at(3, -2).unwrap();
        assert_eq!(world.lookup_count(), 2);
    }

    #[test]
    fn detached_world_fails_lookups() {
        let world = MemoryWorld::new("overworld");
        world.detach();
        let err = world.cell_at(0, 0).unwrap_err();
        assert_eq!(
            err,
            HostError::WorldUnavailable {
                world: "overworld".into()
            }
        );
        // Failed lookups still count.
        assert_eq!(world.lookup_count(), 1);
    }

    #[test]
    fn load_unload_bookkeeping() {
        let world = MemoryWorld::new("overworld");
        let cell = world.cell_at(0, 0).unwrap();
        assert!(!cell.is_loaded());
        assert!(cell.load());
        assert!(cell.is_loaded());
        assert!(cell.unload());
        assert!(!cell.is_loaded());
        // Unloading an unloaded cell is a no-op.
        assert!(!cell.unload());
    }

    #[test]
    fn entities_are_scoped_to_cell() {
        let world = MemoryWorld::new("overworld");
        let inside = world.spawn(Vec3::new(4.0, 0.0, 4.0), EntityKind::Creature);
        world.spawn(Vec3::new(40.0, 0.0, 4.0), EntityKind::Creature);

        let cell = world.cell_at(0, 0).unwrap();
        let entities = cell.entities();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0], inside);
    }

    #[test]
    fn entity_order_is_deterministic() {
        let world = MemoryWorld::new("overworld");
        for _ in 0..10 {
            world.spawn(Vec3::new(1.0, 0.0, 1.0), EntityKind::Item);
        }
        let cell = world.cell_at(0, 0).unwrap();
        let ids: Vec<EntityId> = cell.entities().iter().map(MemoryEntity::id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(cell.entities().iter().map(MemoryEntity::id).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn player_subtype_test() {
        let world = MemoryWorld::new("overworld");
        let player = world.spawn(Vec3::ZERO, EntityKind::Player);
        let creature = world.spawn(Vec3::ZERO, EntityKind::Creature);
        assert_eq!(player.as_player().map(|p| p.id()), Some(player.id()));
        assert!(creature.as_player().is_none());
    }

    #[test]
    fn entity_location_derives_cell() {
        let world = MemoryWorld::new("overworld");
        let entity = world.spawn(Vec3::new(33.0, 0.0, -1.0), EntityKind::Creature);
        let cell = entity.cell().unwrap();
        assert_eq!((cell.x(), cell.z()), (2, -1));
    }

    #[test]
    fn block_location_derives_cell() {
        let world = MemoryWorld::new("overworld");
        assert_eq!(
            world.block_at(20, 64, -5).cell().map(|c| (c.x(), c.z())),
            Ok((1, -1))
        );
        assert_eq!(
            world.block_at(-16, 0, 15).cell().map(|c| (c.x(), c.z())),
            Ok((-1, 0))
        );
    }

    #[test]
    fn point_location_derives_cell() {
        let world = MemoryWorld::new("overworld");
        let point = world.point_at(Vec3::new(-0.5, 70.0, 16.0));
        assert_eq!(point.cell().map(|c| (c.x(), c.z())), Ok((-1, 1)));
    }

    #[test]
    fn custom_cell_size() {
        let world = MemoryWorld::with_cell_size("big", 192.0);
        assert_eq!(world.position_to_cell(Vec3::new(191.0, 0.0, 192.0)), (0, 1));
    }
}
