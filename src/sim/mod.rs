//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or terminal dependencies

pub mod arena;
pub mod collision;
pub mod player;
pub mod spawner;
pub mod state;
pub mod tick;

pub use arena::{Arena, EntityId, Role};
pub use collision::{Aabb, circles_overlap, overlap_ratio_hit};
pub use spawner::Spawner;
pub use state::{
    Entity, EntityKind, Explosion, ExplosionSize, GameEvent, GamePhase, GameState, Mob, Player,
    PlayerState, PowerUpKind,
};
pub use tick::{TickInput, tick};
