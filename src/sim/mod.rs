//! Deterministic simulation helpers shared by the games
//!
//! Nothing here touches rendering or the platform layer:
//! - Fixed timestep only, the caller passes `dt`
//! - Randomness comes from the caller's seeded RNG
//! - Stable iteration order (slice order)

pub mod bodies;
pub mod collision;
pub mod hierarchy;
pub mod tiles;
pub mod volume;

pub use bodies::{Body, Ray, pick_closest, ray_sphere, resolve_sphere_pair};
pub use collision::{Axis, Contact, Rect, circle_rect_overlap, circles_overlap, move_and_collide};
pub use hierarchy::Transform;
pub use tiles::{TileGrid, TileKind};
pub use volume::{Aabb3, Push, resolve_min_penetration};
