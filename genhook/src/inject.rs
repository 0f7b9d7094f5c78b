//! The replacement pipeline installed into a host world.

use std::sync::Arc;

use glam::IVec3;
use parking_lot::RwLock;
use tracing::trace;

use crate::gen::{BiomeClassifier, ChunkPipeline, DecorationStage, GeneratingChunk, HeightKind,
    HostClassifier, TerrainGenerator, WorldDecorator};
use crate::world_override::OverrideError;
use crate::biome::Biome;


/// The pipeline object installed in place of the host's original pipeline. The host
/// only ever calls into this object, which forwards to the strategies it currently
/// holds, so strategies can be swapped without patching the host again.
///
/// Each generation entry point takes a snapshot of the strategy it needs before
/// calling it, so a call observes either the old or the new strategy for its whole
/// duration even if a swap happens concurrently. The locks are only held for the
/// time needed to clone the strategy reference.
pub struct InjectedPipeline {
    terrain: RwLock<Arc<dyn TerrainGenerator>>,
    classifier: RwLock<Arc<dyn BiomeClassifier>>,
    decorator: Arc<WorldDecorator>,
}

impl InjectedPipeline {

    /// Create a pipeline that generates terrain with the given generator. The biome
    /// classifier defaults to the original pipeline's one and the decorator runs the
    /// original pipeline's default decorations.
    pub(crate) fn new(original: &Arc<dyn ChunkPipeline>, terrain: Arc<dyn TerrainGenerator>) -> Self {
        Self {
            terrain: RwLock::new(terrain),
            classifier: RwLock::new(Arc::new(HostClassifier::new(Arc::clone(original)))),
            decorator: Arc::new(WorldDecorator::new(Arc::clone(original))),
        }
    }

    /// Get the terrain generator currently used.
    pub fn terrain_generator(&self) -> Arc<dyn TerrainGenerator> {
        self.terrain.read().clone()
    }

    /// Get the biome classifier currently used.
    pub fn biome_classifier(&self) -> Arc<dyn BiomeClassifier> {
        self.classifier.read().clone()
    }

    /// Get the decorator of this pipeline, it is the same for the pipeline's lifetime.
    pub fn world_decorator(&self) -> &Arc<WorldDecorator> {
        &self.decorator
    }

    /// Replace the terrain generator, the new one is used from the next chunk
    /// generated. A generator forwarding to this very pipeline is rejected.
    pub fn set_terrain_generator(&self, terrain: Arc<dyn TerrainGenerator>) -> Result<(), OverrideError> {
        if self.is_self(terrain.backing_pipeline()) {
            return Err(OverrideError::Precondition("terrain generator forwards to its own pipeline"));
        }
        *self.terrain.write() = terrain;
        Ok(())
    }

    /// Replace the biome classifier, the new one is used from the next
    /// classification. A classifier forwarding to this very pipeline is rejected.
    pub fn set_biome_classifier(&self, classifier: Arc<dyn BiomeClassifier>) -> Result<(), OverrideError> {
        if self.is_self(classifier.backing_pipeline()) {
            return Err(OverrideError::Precondition("biome classifier forwards to its own pipeline"));
        }
        *self.classifier.write() = classifier;
        Ok(())
    }

    /// Internal function returning true if the given backing pipeline is this one.
    fn is_self(&self, backing: Option<&Arc<dyn ChunkPipeline>>) -> bool {
        backing.is_some_and(|backing| std::ptr::eq(Arc::as_ptr(backing) as *const (), self as *const Self as *const ()))
    }

}

impl ChunkPipeline for InjectedPipeline {

    fn classify(&self, pos: IVec3) -> Biome {
        let classifier = self.biome_classifier();
        classifier.classify(pos)
    }

    fn height(&self, x: i32, z: i32, kind: HeightKind) -> i32 {
        let terrain = self.terrain_generator();
        terrain.height(x, z, kind)
    }

    fn generate(&self, chunk: &mut GeneratingChunk) {
        trace!("generate chunk {}/{}", chunk.cx(), chunk.cz());
        let terrain = self.terrain_generator();
        terrain.place_blocks(chunk);
    }

    fn decorate(&self, stage: DecorationStage, chunk: &mut GeneratingChunk) {
        self.decorator.decorate(stage, chunk);
    }

}
