use std::fmt::Debug;
use std::hash::Hash;

/// Errors surfaced by the host platform.
///
/// The host owns cell storage and loading; when it cannot produce a cell the
/// failure is reported here and passed through to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The world is no longer reachable on the host (shut down, unloaded, or
    /// otherwise detached).
    #[error("world `{world}` is not available on the host")]
    WorldUnavailable { world: String },
    /// The host failed to look up or create the cell at the given coordinates.
    #[error("host failed to provide cell ({x}, {z}) in world `{world}`: {reason}")]
    CellLookup {
        world: String,
        x: i32,
        z: i32,
        reason: String,
    },
}

/// A spatial namespace on the host: the thing cells belong to.
///
/// Worlds act as identities as well as lookup roots, so they must be cheap to
/// clone and comparable; two values are the same world iff they compare equal.
pub trait World: Clone + Eq + Hash + Debug {
    type Cell: Cell<World = Self>;

    /// Look up (or create) the cell at grid coordinates (x, z).
    ///
    /// Synchronous and potentially expensive on a real host; callers that
    /// need bounded latency must wrap it themselves.
    fn cell_at(&self, x: i32, z: i32) -> Result<Self::Cell, HostError>;
}

/// A resolved grid cell on the host.
pub trait Cell: Clone {
    type World: World<Cell = Self>;
    type Entity: Entity;

    fn world(&self) -> Self::World;
    fn x(&self) -> i32;
    fn z(&self) -> i32;

    /// Whether the host currently has this cell loaded.
    fn is_loaded(&self) -> bool;
    /// Ask the host to load this cell. Returns whether the cell is loaded
    /// afterwards.
    fn load(&self) -> bool;
    /// Ask the host to unload this cell. Returns whether the unload took
    /// effect.
    fn unload(&self) -> bool;

    /// Snapshot of all entities inside this cell, in the order the host
    /// reports them. Not a live view.
    fn entities(&self) -> Vec<Self::Entity>;
}

/// An entity living in a cell. The only capability GridKit needs beyond
/// enumeration is the human-player subtype test.
pub trait Entity: Clone {
    type Player: Clone;

    /// The player view of this entity, if it is one.
    fn as_player(&self) -> Option<Self::Player>;
}

/// Anything with a containing cell: entities, blocks, point locations.
///
/// Deriving the cell may consult the host, so it can fail the same way a
/// direct cell lookup can.
pub trait Locate {
    type Cell: Cell;

    fn cell(&self) -> Result<Self::Cell, HostError>;
}
