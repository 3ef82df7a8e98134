use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use gridkit_host::{Cell, Entity, HostError, Locate, World};

/// Entity type produced by cells of world `W`.
pub type CellEntity<W> = <<W as World>::Cell as Cell>::Entity;

/// Player type produced by entities of world `W`.
pub type CellPlayer<W> = <CellEntity<W> as Entity>::Player;

/// Neighbor offsets, in enumeration order: the row above, both sides, the row
/// below.
const ADJACENT_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// An immutable-identity, lazily-resolved handle to the grid cell at
/// (world, x, z).
///
/// Constructing a handle never touches the host. The first call to
/// [`resolve`](CellHandle::resolve) (directly or through one of the methods
/// that delegate to the resolved cell) performs the host lookup and caches
/// the cell; the cache is written at most once and never cleared, so a handle
/// keeps answering from its cached cell even if the host-side cell goes stale.
///
/// Equality and hashing cover only (world, x, z); the cache slot never
/// participates.
#[derive(Clone)]
pub struct CellHandle<W: World> {
    world: W,
    x: i32,
    z: i32,
    cell: OnceLock<W::Cell>,
}

impl<W: World> CellHandle<W> {
    /// Handle to the cell at (x, z), unresolved.
    pub fn new(world: W, x: i32, z: i32) -> Self {
        Self {
            world,
            x,
            z,
            cell: OnceLock::new(),
        }
    }

    /// Wrap an already-resolved cell. Captures its world and coordinates
    /// eagerly and pre-populates the cache, so resolving this handle will
    /// never call back into the host.
    pub fn from_cell(cell: W::Cell) -> Self {
        let world = cell.world();
        let x = cell.x();
        let z = cell.z();
        let slot = OnceLock::new();
        let _ = slot.set(cell);
        Self {
            world,
            x,
            z,
            cell: slot,
        }
    }

    /// Handle to the cell containing a location-like value (an entity, a
    /// block, a point location). Derives the owning cell through the host and
    /// delegates to [`from_cell`](CellHandle::from_cell).
    pub fn from_location<L>(location: &L) -> Result<Self, HostError>
    where
        L: Locate<Cell = W::Cell>,
    {
        Ok(Self::from_cell(location.cell()?))
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    /// Whether the cell has already been resolved.
    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }

    /// The resolved cell, from cache if available.
    ///
    /// The first call on an unresolved handle performs the host lookup, which
    /// may block for as long as the host takes to load the cell. Subsequent
    /// calls never re-invoke the host. A host failure leaves the handle
    /// unresolved, so a later call will retry the lookup.
    pub fn resolve(&self) -> Result<&W::Cell, HostError> {
        if let Some(cell) = self.cell.get() {
            return Ok(cell);
        }
        tracing::debug!(x = self.x, z = self.z, "resolving cell via host lookup");
        let cell = self.world.cell_at(self.x, self.z)?;
        Ok(self.cell.get_or_init(|| cell))
    }

    /// Whether the host currently has this cell loaded. Resolves first.
    pub fn is_loaded(&self) -> Result<bool, HostError> {
        Ok(self.resolve()?.is_loaded())
    }

    /// Ask the host to load this cell. Resolves first.
    pub fn load(&self) -> Result<bool, HostError> {
        Ok(self.resolve()?.load())
    }

    /// Ask the host to unload this cell. Resolves first.
    pub fn unload(&self) -> Result<bool, HostError> {
        Ok(self.resolve()?.unload())
    }

    /// Snapshot of all entities inside the cell, in host order. Resolves
    /// first.
    pub fn entities(&self) -> Result<Vec<CellEntity<W>>, HostError> {
        Ok(self.resolve()?.entities())
    }

    /// The players inside the cell, in the same relative order as
    /// [`entities`](CellHandle::entities). Resolves first.
    pub fn players(&self) -> Result<Vec<CellPlayer<W>>, HostError> {
        Ok(self
            .entities()?
            .iter()
            .filter_map(|entity| entity.as_player())
            .collect())
    }

    /// Handles for the eight neighboring cells, none of them resolved.
    ///
    /// Ordered row by row: (-1,-1), (0,-1), (1,-1), (-1,0), (1,0), (-1,1),
    /// (0,1), (1,1). Never touches the host; each neighbor resolves on its
    /// own first access.
    pub fn adjacent(&self) -> [Self; 8] {
        ADJACENT_OFFSETS.map(|(dx, dz)| Self::new(self.world.clone(), self.x + dx, self.z + dz))
    }
}

impl<W: World> PartialEq for CellHandle<W> {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.z == other.z && self.world == other.world
    }
}

impl<W: World> Eq for CellHandle<W> {}

impl<W: World> Hash for CellHandle<W> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.world.hash(state);
        self.x.hash(state);
        self.z.hash(state);
    }
}

impl<W: World> fmt::Debug for CellHandle<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellHandle")
            .field("world", &self.world)
            .field("x", &self.x)
            .field("z", &self.z)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl<W: World> fmt::Display for CellHandle<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell ({}, {}) in {:?}", self.x, self.z, self.world)
    }
}
