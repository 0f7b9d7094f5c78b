//! The host server, owning worlds and their chunk workers, and the override registry
//! patching them.

use std::collections::HashMap;
use std::time::Instant;
use std::sync::Arc;

use tracing::{debug, info, warn};

use genhook::host::{FlatPipeline, HostPatcher, HostVariant, HostWorld};
use genhook::patch::ReferencePatcher;
use genhook::gen::DecorationStage;
use genhook::chunk::{Chunk, CHUNK_WIDTH};
use genhook::{block, OverrideError, OverrideRegistry, WorldId};

use glam::IVec3;

use crate::pool::ChunkWorkerPool;
use crate::terrain::{Bands, Hills, SnowCover};
use crate::config;


/// Server world seed is currently hardcoded.
const SEED: i64 = 9999;


/// Summary of a generated area, used to compare phases.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AreaSummary {
    /// Number of chunks generated.
    pub chunks: usize,
    /// Lowest and highest surface heights.
    pub min_height: i32,
    pub max_height: i32,
    /// Count of each top block, by block name.
    pub top_blocks: Vec<(&'static str, usize)>,
}

/// A host server with a single overworld.
pub struct Server {
    world: Arc<HostWorld>,
    pool: ChunkWorkerPool,
    registry: OverrideRegistry,
}

impl Server {

    /// Create the server, its world and the chunk workers.
    pub fn new() -> std::io::Result<Self> {

        let variant = if config::threaded_host() {
            HostVariant::Threaded
        } else {
            HostVariant::Standard
        };

        let world = Arc::new(HostWorld::new(WorldId::new("overworld"), SEED, variant, Arc::new(FlatPipeline)));
        let patcher = Arc::new(HostPatcher::new());
        patcher.add_world(Arc::clone(&world));

        info!("world {} created, variant: {variant:?}, workers: {}", world.id(), config::workers());

        Ok(Self {
            // A whole area can be pending, so requests never wait on replies.
            pool: ChunkWorkerPool::new(Arc::clone(&world), config::workers(), area(config::radius()).count())?,
            registry: OverrideRegistry::new(patcher as Arc<dyn ReferencePatcher>),
            world,
        })

    }

    /// Run every phase: generate with the host pipeline, override and refine it, then
    /// reset and check that the host generates exactly as before.
    pub fn run(&mut self) -> Result<(), OverrideError> {

        let radius = config::radius();
        let controller = self.registry.get_or_create(self.world.id())?;

        let vanilla = self.generate_area(radius);
        info!("host pipeline: {vanilla:?}");

        controller.set_biome_classifier(Arc::new(Bands { width: 24 }))?;
        controller.set_noise_sampler(Arc::new(Hills { base: 70, amplitude: 12.0 }))?;
        controller.world_decorator()?
            .with_custom_decoration(DecorationStage::Surface, Arc::new(SnowCover));
        info!("overridden pipeline: {:?}", self.generate_area(radius));

        // Swap the sampler while workers are generating, each chunk is generated by a
        // single sampler.
        for (cx, cz) in area(radius) {
            self.request(cx, cz);
        }
        controller.set_noise_sampler(Arc::new(Hills { base: 90, amplitude: 4.0 }))?;
        let raced = self.collect(area(radius).count());
        info!("raced pipeline: {raced:?}");

        controller.reset()?;
        let restored = self.generate_area(radius);
        if restored == vanilla {
            info!("host pipeline restored: {restored:?}");
        } else {
            warn!("host pipeline differs after reset: {restored:?}");
        }

        Ok(())

    }

    /// Reset every world before stopping.
    pub fn stop(&mut self) -> Result<(), OverrideError> {
        info!("stopping, resetting {} worlds", self.registry.len());
        self.registry.reset_all()
    }

    /// Generate every chunk in the square of given radius and summarize it.
    fn generate_area(&mut self, radius: i32) -> AreaSummary {
        let start = Instant::now();
        for (cx, cz) in area(radius) {
            self.request(cx, cz);
        }
        let summary = self.collect(area(radius).count());
        debug!("generated {} chunks in {:?}", summary.chunks, start.elapsed());
        summary
    }

    /// Request a chunk, waiting for workers to make room if the queue is full.
    fn request(&mut self, cx: i32, cz: i32) {
        while !self.pool.request(cx, cz) {
            std::thread::yield_now();
        }
    }

    /// Wait for the given number of chunks and summarize them.
    fn collect(&mut self, count: usize) -> AreaSummary {

        let mut summary = AreaSummary { min_height: i32::MAX, max_height: i32::MIN, ..Default::default() };
        let mut top_blocks = HashMap::new();

        for _ in 0..count {
            let Some(generated) = self.pool.recv() else { break };
            summary.chunks += 1;
            summarize_chunk(&generated.chunk, &mut summary, &mut top_blocks);
        }

        summary.top_blocks = top_blocks.into_iter().collect();
        summary.top_blocks.sort();
        summary

    }

}

/// Iterate the chunks of a square of given radius around the origin.
fn area(radius: i32) -> impl Iterator<Item = (i32, i32)> {
    (-radius..=radius).flat_map(move |cx| (-radius..=radius).map(move |cz| (cx, cz)))
}

fn summarize_chunk(chunk: &Chunk, summary: &mut AreaSummary, top_blocks: &mut HashMap<&'static str, usize>) {
    for x in 0..CHUNK_WIDTH as i32 {
        for z in 0..CHUNK_WIDTH as i32 {
            let Some(y) = chunk.highest_block(IVec3::new(x, 0, z)) else { continue };
            summary.min_height = summary.min_height.min(y);
            summary.max_height = summary.max_height.max(y);
            *top_blocks.entry(block::name(chunk.block(IVec3::new(x, y, z)))).or_default() += 1;
        }
    }
}
