//! Live terrain generator overrides. A world's generation pipeline can be replaced
//! while the world is running, refined strategy by strategy, and restored exactly.

pub mod block;
pub mod biome;
pub mod chunk;
pub mod gen;

pub mod world;
pub mod patch;
pub mod inject;
pub mod world_override;
pub mod registry;

// Reference host implementing the patching capability.
pub mod host;

pub use world::WorldId;
pub use world_override::{WorldOverride, OverrideError};
pub use registry::OverrideRegistry;
