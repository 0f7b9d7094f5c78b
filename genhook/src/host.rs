//! A reference host, holding its worlds' pipeline references in the same places a
//! real server does, and the [`ReferencePatcher`] able to redirect them. This is what
//! the override layer is tested against and what the demo server runs.

use std::sync::Arc;

use glam::IVec3;
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::gen::{ChunkBiomes, ChunkPipeline, DecorationStage, GeneratingChunk, HeightKind};
use crate::patch::{HostHolder, HostPipelines, HostShape, PatchError, ReferencePatcher};
use crate::chunk::{Chunk, CHUNK_WIDTH};
use crate::world::WorldId;
use crate::biome::Biome;
use crate::block;


/// The variant of host running a world, it determines where pipeline references are
/// held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostVariant {
    /// References are held by the provider and the chunk map.
    Standard,
    /// Like standard, with an additional chunk task scheduler holding a reference.
    Threaded,
    /// An old host whose chunk map does not expose its reference.
    Legacy,
}

/// A world of the reference host.
pub struct HostWorld {
    id: WorldId,
    seed: i64,
    variant: HostVariant,
    provider: RwLock<Arc<dyn ChunkPipeline>>,
    chunk_map: RwLock<Arc<dyn ChunkPipeline>>,
    scheduler: Option<RwLock<Arc<dyn ChunkPipeline>>>,
    /// A generator given at world creation, it takes precedence over the pipeline.
    custom_generator: RwLock<Option<Arc<dyn ChunkPipeline>>>,
}

impl HostWorld {

    /// Create a new world using the given pipeline in all of its holders.
    pub fn new(id: WorldId, seed: i64, variant: HostVariant, pipeline: Arc<dyn ChunkPipeline>) -> Self {
        Self {
            id,
            seed,
            variant,
            provider: RwLock::new(Arc::clone(&pipeline)),
            scheduler: (variant == HostVariant::Threaded).then(|| RwLock::new(Arc::clone(&pipeline))),
            chunk_map: RwLock::new(pipeline),
            custom_generator: RwLock::new(None),
        }
    }

    #[inline]
    pub fn id(&self) -> &WorldId {
        &self.id
    }

    #[inline]
    pub fn seed(&self) -> i64 {
        self.seed
    }

    #[inline]
    pub fn variant(&self) -> HostVariant {
        self.variant
    }

    /// Set a custom generator, the host then bypasses its pipeline.
    pub fn set_custom_generator(&self, generator: Arc<dyn ChunkPipeline>) {
        *self.custom_generator.write() = Some(generator);
    }

    pub fn has_custom_generator(&self) -> bool {
        self.custom_generator.read().is_some()
    }

    /// Return the pipeline referenced by the given holder, if the world has it.
    pub fn pipeline(&self, holder: HostHolder) -> Option<Arc<dyn ChunkPipeline>> {
        match holder {
            HostHolder::Provider => Some(self.provider.read().clone()),
            HostHolder::ChunkMap => Some(self.chunk_map.read().clone()),
            HostHolder::TaskScheduler => self.scheduler.as_ref().map(|s| s.read().clone()),
        }
    }

    /// Return the pipeline chunk workers currently generate with.
    pub fn active_pipeline(&self) -> Arc<dyn ChunkPipeline> {
        if let Some(generator) = &*self.custom_generator.read() {
            return Arc::clone(generator);
        }
        match &self.scheduler {
            Some(scheduler) => scheduler.read().clone(),
            None => self.provider.read().clone(),
        }
    }

    /// Generate a chunk: classify its biomes, place its blocks and run every
    /// decoration stage. The pipeline is read once so the whole chunk is generated by
    /// the same pipeline.
    pub fn generate_chunk(&self, cx: i32, cz: i32) -> Box<Chunk> {

        let pipeline = self.active_pipeline();
        let biomes = ChunkBiomes::classify(cx, cz, &|pos: IVec3| pipeline.classify(pos));

        let mut chunk = Chunk::new();
        let mut generating = GeneratingChunk::new(cx, cz, self.seed, &biomes, &mut chunk);
        pipeline.generate(&mut generating);
        for stage in DecorationStage::ALL {
            pipeline.decorate(stage, &mut generating);
        }

        trace!("{}: generated chunk {cx}/{cz}", self.id);
        chunk

    }

}


/// The default pipeline of the reference host, a flat grass world with a few flowers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatPipeline;

impl FlatPipeline {

    /// Height of the grass layer.
    pub const SURFACE: i32 = 4;
    /// Number of flowers attempted per chunk.
    const FLOWERS: usize = 4;

}

impl ChunkPipeline for FlatPipeline {

    fn classify(&self, _pos: IVec3) -> Biome {
        Biome::Plains
    }

    fn height(&self, _x: i32, _z: i32, kind: HeightKind) -> i32 {
        match kind {
            HeightKind::Surface | HeightKind::OceanFloor => Self::SURFACE,
            HeightKind::LowestSpawn => Self::SURFACE + 1,
        }
    }

    fn generate(&self, chunk: &mut GeneratingChunk) {
        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_WIDTH {
                chunk.set_block(IVec3::new(x as i32, 0, z as i32), block::BEDROCK);
                chunk.fill_column(x, z, 1, Self::SURFACE, block::DIRT);
                chunk.set_block(IVec3::new(x as i32, Self::SURFACE, z as i32), block::GRASS);
            }
        }
    }

    fn decorate(&self, stage: DecorationStage, chunk: &mut GeneratingChunk) {

        if stage != DecorationStage::Features {
            return;
        }

        let mut state = chunk.chunk_seed() as u64;
        for _ in 0..Self::FLOWERS {

            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let x = ((state >> 33) % CHUNK_WIDTH as u64) as i32;
            let z = ((state >> 41) % CHUNK_WIDTH as u64) as i32;

            let ground = IVec3::new(x, Self::SURFACE, z);
            if chunk.block(ground) == block::GRASS {
                chunk.set_block(ground + IVec3::Y, block::DANDELION);
            }

        }

    }

}


/// Patcher of the reference host's worlds.
#[derive(Default)]
pub struct HostPatcher {
    worlds: RwLock<IndexMap<WorldId, Arc<HostWorld>>>,
}

impl HostPatcher {

    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loaded world.
    pub fn add_world(&self, world: Arc<HostWorld>) {
        self.worlds.write().insert(world.id().clone(), world);
    }

    /// Unregister an unloaded world.
    pub fn remove_world(&self, id: &WorldId) -> Option<Arc<HostWorld>> {
        self.worlds.write().shift_remove(id)
    }

    pub fn world(&self, id: &WorldId) -> Option<Arc<HostWorld>> {
        self.worlds.read().get(id).cloned()
    }

    fn world_or_err(&self, id: &WorldId) -> Result<Arc<HostWorld>, PatchError> {
        self.world(id).ok_or_else(|| PatchError::WorldNotFound(id.clone()))
    }

    /// Internal function to write the pipeline in every holder of the shape and
    /// replace the custom generator, either all of them or none.
    fn write_holders(&self,
        world: &WorldId,
        shape: &HostShape,
        pipeline: Arc<dyn ChunkPipeline>,
        custom_generator: Option<Arc<dyn ChunkPipeline>>,
    ) -> Result<(), PatchError> {

        let host_world = self.world_or_err(world)?;

        // Check every holder before modifying any of them.
        if shape.has(HostHolder::TaskScheduler) && host_world.scheduler.is_none() {
            return Err(PatchError::MissingReference {
                world: world.clone(),
                holder: HostHolder::TaskScheduler,
            });
        }

        // All holders are locked together, chunk workers see either all old or all
        // new references, always in the same order to avoid deadlocks.
        let mut custom = host_world.custom_generator.write();
        let mut provider = host_world.provider.write();
        let mut chunk_map = host_world.chunk_map.write();
        let mut scheduler = match &host_world.scheduler {
            Some(scheduler) if shape.has(HostHolder::TaskScheduler) => Some(scheduler.write()),
            _ => None,
        };

        for &holder in shape.holders() {
            match holder {
                HostHolder::Provider => *provider = Arc::clone(&pipeline),
                HostHolder::ChunkMap => *chunk_map = Arc::clone(&pipeline),
                HostHolder::TaskScheduler => {
                    if let Some(scheduler) = &mut scheduler {
                        **scheduler = Arc::clone(&pipeline);
                    }
                }
            }
        }

        *custom = custom_generator;
        Ok(())

    }

}

impl ReferencePatcher for HostPatcher {

    fn probe(&self, world: &WorldId) -> Result<HostShape, PatchError> {
        let host_world = self.world_or_err(world)?;
        match host_world.variant {
            HostVariant::Standard => Ok(HostShape::new([HostHolder::Provider, HostHolder::ChunkMap])),
            HostVariant::Threaded => Ok(HostShape::new([HostHolder::Provider, HostHolder::ChunkMap, HostHolder::TaskScheduler])),
            HostVariant::Legacy => Err(PatchError::UnsupportedHost {
                world: world.clone(),
                reason: "chunk map does not expose its pipeline",
            }),
        }
    }

    fn current(&self, world: &WorldId) -> Result<HostPipelines, PatchError> {
        let host_world = self.world_or_err(world)?;
        let pipeline = host_world.provider.read().clone();
        let custom_generator = host_world.custom_generator.read().clone();
        Ok(HostPipelines { pipeline, custom_generator })
    }

    fn patch(&self, world: &WorldId, shape: &HostShape, pipeline: Arc<dyn ChunkPipeline>) -> Result<(), PatchError> {
        self.write_holders(world, shape, pipeline, None)?;
        debug!("{world}: patched {:?}", shape.holders());
        Ok(())
    }

    fn restore(&self, world: &WorldId, shape: &HostShape, original: &HostPipelines) -> Result<(), PatchError> {
        self.write_holders(world, shape, Arc::clone(&original.pipeline), original.custom_generator.clone())?;
        debug!("{world}: restored {:?}", shape.holders());
        Ok(())
    }

}
