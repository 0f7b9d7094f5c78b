//! The capability of redirecting the host's references to a world's chunk pipeline.
//! This crate never touches host-owned state by itself, every redirection goes
//! through a [`ReferencePatcher`] implementation provided for the host.

use std::sync::Arc;

use thiserror::Error;

use crate::gen::ChunkPipeline;
use crate::world::WorldId;


/// A host-internal structure holding a reference to a world's chunk pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostHolder {
    /// The main chunk provider of the world.
    Provider,
    /// The chunk map tracking chunks sent to connected players.
    ChunkMap,
    /// The chunk task scheduler, only present on some host variants.
    TaskScheduler,
}

/// Result of probing a host world, it describes which holders reference the
/// pipeline and therefore must be patched together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostShape {
    holders: Vec<HostHolder>,
}

impl HostShape {

    pub fn new(holders: impl IntoIterator<Item = HostHolder>) -> Self {
        Self { holders: holders.into_iter().collect() }
    }

    /// The holders to patch, in patch order.
    #[inline]
    pub fn holders(&self) -> &[HostHolder] {
        &self.holders
    }

    #[inline]
    pub fn has(&self, holder: HostHolder) -> bool {
        self.holders.contains(&holder)
    }

}

/// What the host runs for a world before any override, restored on reset.
#[derive(Clone)]
pub struct HostPipelines {
    /// The pipeline referenced by the host's holders.
    pub pipeline: Arc<dyn ChunkPipeline>,
    /// A generator the host runs instead of its pipeline, if any.
    pub custom_generator: Option<Arc<dyn ChunkPipeline>>,
}

impl HostPipelines {

    /// The pipeline chunks are actually generated with.
    #[inline]
    pub fn effective(&self) -> &Arc<dyn ChunkPipeline> {
        self.custom_generator.as_ref().unwrap_or(&self.pipeline)
    }

}

/// Locate and overwrite the host's live references to a world's chunk pipeline.
pub trait ReferencePatcher: Send + Sync {

    /// Detect the shape of the host for the given world, this is done once before
    /// the first patch and fails if the host is not recognized.
    fn probe(&self, world: &WorldId) -> Result<HostShape, PatchError>;

    /// Return the pipelines the host currently uses for the world.
    fn current(&self, world: &WorldId) -> Result<HostPipelines, PatchError>;

    /// Replace every reference to the world's pipeline held by the holders of the
    /// given shape, as one logical operation, and clear any custom generator that
    /// would make the host bypass the pipeline. On error, no holder must have been
    /// modified.
    fn patch(&self, world: &WorldId, shape: &HostShape, pipeline: Arc<dyn ChunkPipeline>) -> Result<(), PatchError>;

    /// Put back pipelines previously returned by [`Self::current`], including the
    /// custom generator. On error, no holder must have been modified.
    fn restore(&self, world: &WorldId, shape: &HostShape, original: &HostPipelines) -> Result<(), PatchError>;

}

/// Error of a [`ReferencePatcher`].
#[derive(Error, Debug)]
pub enum PatchError {
    /// The host has no such world.
    #[error("world {0} not found in the host")]
    WorldNotFound(WorldId),
    /// The host's internal shape for this world was not recognized.
    #[error("unsupported host for world {world}: {reason}")]
    UnsupportedHost {
        world: WorldId,
        reason: &'static str,
    },
    /// A holder announced by the probe could not be found when patching.
    #[error("missing pipeline reference in {holder:?} of world {world}")]
    MissingReference {
        world: WorldId,
        holder: HostHolder,
    },
}
