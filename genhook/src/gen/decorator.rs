//! Post-terrain decoration of an injected pipeline.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::{ChunkPipeline, Decoration, DecorationStage, GeneratingChunk};


/// Decorations run after terrain placement. A decorator is created once with its
/// injected pipeline and lives as long as it, so decorations registered here are kept
/// when the terrain generator or biome classifier are replaced.
///
/// For each stage, the host's default decorations run first, unless disabled, then
/// custom decorations run in registration order.
pub struct WorldDecorator {
    /// The pipeline providing default decorations, this is the host's original one.
    defaults: Arc<dyn ChunkPipeline>,
    /// Decoration settings, indexed by stage.
    stages: [RwLock<StageDecorations>; 3],
}

#[derive(Clone)]
struct StageDecorations {
    default_enabled: bool,
    custom: Vec<Arc<dyn Decoration>>,
}

impl WorldDecorator {

    pub(crate) fn new(defaults: Arc<dyn ChunkPipeline>) -> Self {
        Self {
            defaults,
            stages: std::array::from_fn(|_| RwLock::new(StageDecorations {
                default_enabled: true,
                custom: Vec::new(),
            })),
        }
    }

    /// Add a custom decoration to the given stage.
    pub fn with_custom_decoration(&self, stage: DecorationStage, decoration: Arc<dyn Decoration>) -> &Self {
        let mut decorations = self.stages[stage.index()].write();
        decorations.custom.push(decoration);
        debug!("custom decoration added to {stage:?}, now {}", decorations.custom.len());
        self
    }

    /// Disable the host's default decorations of the given stage, custom decorations
    /// of this stage still run.
    pub fn disable_default_decorations(&self, stage: DecorationStage) -> &Self {
        self.stages[stage.index()].write().default_enabled = false;
        debug!("default decorations disabled for {stage:?}");
        self
    }

    /// Return true if the host's default decorations of this stage are still run.
    pub fn is_default_enabled(&self, stage: DecorationStage) -> bool {
        self.stages[stage.index()].read().default_enabled
    }

    /// Return the number of custom decorations registered for the given stage.
    pub fn custom_count(&self, stage: DecorationStage) -> usize {
        self.stages[stage.index()].read().custom.len()
    }

    /// Run the given stage on the chunk.
    pub fn decorate(&self, stage: DecorationStage, chunk: &mut GeneratingChunk) {

        // Decorations may be added concurrently, so we work on a snapshot and never
        // call a decoration while holding the lock.
        let decorations = self.stages[stage.index()].read().clone();

        if decorations.default_enabled {
            self.defaults.decorate(stage, chunk);
        }

        for decoration in &decorations.custom {
            decoration.decorate(chunk);
        }

    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use glam::IVec3;
    use crate::gen::{ChunkBiomes, HeightKind};
    use crate::chunk::Chunk;
    use crate::biome::Biome;
    use crate::block;

    /// A pipeline whose only default decoration is a dirt block at the column origin.
    struct DirtDefaults;
    impl ChunkPipeline for DirtDefaults {
        fn classify(&self, _pos: IVec3) -> Biome { Biome::Plains }
        fn height(&self, _x: i32, _z: i32, _kind: HeightKind) -> i32 { 0 }
        fn generate(&self, _chunk: &mut GeneratingChunk) { }
        fn decorate(&self, stage: DecorationStage, chunk: &mut GeneratingChunk) {
            if stage == DecorationStage::Surface {
                chunk.set_block(IVec3::new(0, 10, 0), block::DIRT);
            }
        }
    }

    /// Runs after defaults, so it sees the dirt block.
    fn grass_on_dirt(chunk: &mut GeneratingChunk) {
        if chunk.block(IVec3::new(0, 10, 0)) == block::DIRT {
            chunk.set_block(IVec3::new(0, 11, 0), block::TALL_GRASS);
        }
    }

    fn sand_block(chunk: &mut GeneratingChunk) {
        chunk.set_block(IVec3::new(1, 5, 1), block::SAND);
    }

    fn run(decorator: &WorldDecorator, stage: DecorationStage) -> Box<Chunk> {
        let biomes = ChunkBiomes::classify(0, 0, &|_: IVec3| Biome::Plains);
        let mut chunk = Chunk::new();
        decorator.decorate(stage, &mut GeneratingChunk::new(0, 0, 0, &biomes, &mut chunk));
        chunk
    }

    #[test]
    fn defaults_then_custom() {

        let decorator = WorldDecorator::new(Arc::new(DirtDefaults));
        decorator.with_custom_decoration(DecorationStage::Surface, Arc::new(grass_on_dirt));

        let chunk = run(&decorator, DecorationStage::Surface);
        assert_eq!(chunk.block(IVec3::new(0, 10, 0)), block::DIRT);
        assert_eq!(chunk.block(IVec3::new(0, 11, 0)), block::TALL_GRASS);

        // Other stages are not affected.
        let chunk = run(&decorator, DecorationStage::Features);
        assert_eq!(chunk.highest_block(IVec3::ZERO), None);

    }

    #[test]
    fn disabled_defaults() {

        let decorator = WorldDecorator::new(Arc::new(DirtDefaults));
        decorator
            .disable_default_decorations(DecorationStage::Surface)
            .with_custom_decoration(DecorationStage::Surface, Arc::new(sand_block));

        assert!(!decorator.is_default_enabled(DecorationStage::Surface));
        assert!(decorator.is_default_enabled(DecorationStage::Carving));
        assert_eq!(decorator.custom_count(DecorationStage::Surface), 1);

        let chunk = run(&decorator, DecorationStage::Surface);
        assert_eq!(chunk.block(IVec3::new(0, 10, 0)), block::AIR);
        assert_eq!(chunk.block(IVec3::new(1, 5, 1)), block::SAND);

    }

}
