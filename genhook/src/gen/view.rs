//! Strategies viewing an existing pipeline, and the promotion of block placers to
//! terrain generators.

use std::sync::Arc;

use glam::IVec3;

use crate::biome::Biome;

use super::{BiomeClassifier, BlockPlacer, ChunkPipeline, GeneratingChunk, HeightKind, TerrainGenerator};


/// Height reported by generators that cannot know their heights, such as
/// [`PlacerTerrain`]. This is only advisory, callers should not rely on its value.
pub const PLACEHOLDER_HEIGHT: i32 = 65;


/// A terrain generator forwarding to a host pipeline, this is how the host's own
/// generation is exposed as a strategy.
#[derive(Clone)]
pub struct HostTerrain {
    pipeline: Arc<dyn ChunkPipeline>,
}

impl HostTerrain {

    pub fn new(pipeline: Arc<dyn ChunkPipeline>) -> Self {
        Self { pipeline }
    }

}

impl TerrainGenerator for HostTerrain {

    fn height(&self, x: i32, z: i32, kind: HeightKind) -> i32 {
        self.pipeline.height(x, z, kind)
    }

    fn place_blocks(&self, chunk: &mut GeneratingChunk) {
        self.pipeline.generate(chunk);
    }

    fn backing_pipeline(&self) -> Option<&Arc<dyn ChunkPipeline>> {
        Some(&self.pipeline)
    }

}

/// A biome classifier forwarding to a host pipeline.
#[derive(Clone)]
pub struct HostClassifier {
    pipeline: Arc<dyn ChunkPipeline>,
}

impl HostClassifier {

    pub fn new(pipeline: Arc<dyn ChunkPipeline>) -> Self {
        Self { pipeline }
    }

}

impl BiomeClassifier for HostClassifier {

    fn classify(&self, pos: IVec3) -> Biome {
        self.pipeline.classify(pos)
    }

    fn backing_pipeline(&self) -> Option<&Arc<dyn ChunkPipeline>> {
        Some(&self.pipeline)
    }

}

/// A terrain generator wrapping a [`BlockPlacer`]. Heights cannot be known without
/// generating the chunk, so [`PLACEHOLDER_HEIGHT`] is returned for every query.
pub struct PlacerTerrain {
    placer: Arc<dyn BlockPlacer>,
}

impl PlacerTerrain {

    pub fn new(placer: Arc<dyn BlockPlacer>) -> Self {
        Self { placer }
    }

}

impl TerrainGenerator for PlacerTerrain {

    fn height(&self, _x: i32, _z: i32, _kind: HeightKind) -> i32 {
        PLACEHOLDER_HEIGHT
    }

    fn place_blocks(&self, chunk: &mut GeneratingChunk) {
        self.placer.place_blocks(chunk);
    }

}
