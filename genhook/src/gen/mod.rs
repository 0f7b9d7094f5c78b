//! Generator contracts. A world's terrain is produced by a pipeline of pluggable
//! strategies: biome classification, noise height sampling, block placement and
//! post-terrain decoration. Each contract is independent of the others, composition
//! is done by adapters such as [`NoiseTerrainBridge`].
//!
//! Every contract requires `Send + Sync` because the host calls generation entry
//! points from many chunk workers concurrently, each worker with its own disjoint
//! [`GeneratingChunk`].

use std::sync::Arc;

use glam::IVec3;

use crate::chunk::{Chunk, CHUNK_WIDTH, CHUNK_HEIGHT};
use crate::biome::Biome;
use crate::block;

mod bridge;
pub use bridge::{NoiseTerrainBridge, BridgeConfig, SEA_LEVEL};

mod decorator;
pub use decorator::WorldDecorator;

mod view;
pub use view::{HostTerrain, HostClassifier, PlacerTerrain, PLACEHOLDER_HEIGHT};


/// The different classes of height the host may sample for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeightKind {
    /// Height of the highest non-air block, including fluids.
    Surface,
    /// Height of the highest solid block, ignoring fluids.
    OceanFloor,
    /// The lowest height where a player can be spawned in the column.
    LowestSpawn,
}

/// Decoration passes run by the host after terrain placement, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationStage {
    /// Caves and ravines are carved out of the raw terrain.
    Carving,
    /// Surface adjustments such as freezing water or sprinkling snow.
    Surface,
    /// Vegetation, ores and small structures.
    Features,
}

impl DecorationStage {

    /// All stages, in the order the host runs them.
    pub const ALL: [DecorationStage; 3] = [Self::Carving, Self::Surface, Self::Features];

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Carving => 0,
            Self::Surface => 1,
            Self::Features => 2,
        }
    }

}


/// Biome classification strategy. Classification must be deterministic for a given
/// position and internal state because the host may query a position many times
/// across its passes.
pub trait BiomeClassifier: Send + Sync {

    /// Classify the given block position, the Y component is usually ignored.
    fn classify(&self, pos: IVec3) -> Biome;

    /// If this classifier only forwards to a pipeline, return that pipeline. See
    /// [`TerrainGenerator::backing_pipeline`].
    fn backing_pipeline(&self) -> Option<&Arc<dyn ChunkPipeline>> {
        None
    }

}

/// Noise sampling strategy, only producing raw heights without placing any block.
pub trait NoiseSampler: Send + Sync {

    /// Sample the height of the given kind for the column at X/Z block coordinates.
    fn height(&self, x: i32, z: i32, kind: HeightKind) -> i32;

}

/// A full terrain generation strategy, giving height estimates and placing the blocks
/// of a chunk.
pub trait TerrainGenerator: Send + Sync {

    /// Return the height of the given kind for the column at X/Z block coordinates.
    fn height(&self, x: i32, z: i32, kind: HeightKind) -> i32;

    /// Place the blocks of the given chunk. The generator has full license over this
    /// chunk and must not touch any other.
    fn place_blocks(&self, chunk: &mut GeneratingChunk);

    /// If this generator only forwards to a pipeline, return that pipeline. This is
    /// used to reject generators that would call back into the pipeline they are
    /// installed in.
    fn backing_pipeline(&self) -> Option<&Arc<dyn ChunkPipeline>> {
        None
    }

}

/// A strategy that only knows how to place blocks, without any knowledge of the
/// resulting heights. See [`PlacerTerrain`] for how it is promoted to a terrain
/// generator.
pub trait BlockPlacer: Send + Sync {

    /// Place the blocks of the given chunk.
    fn place_blocks(&self, chunk: &mut GeneratingChunk);

}

/// A custom decoration run during one of the [`DecorationStage`].
pub trait Decoration: Send + Sync {

    /// Decorate the given chunk.
    fn decorate(&self, chunk: &mut GeneratingChunk);

}

/// The pipeline object the host holds a reference to and calls for each chunk it
/// generates. Both the host's own pipeline and the injected override pipeline
/// implement this.
pub trait ChunkPipeline: Send + Sync {

    /// Classify the biome at the given position.
    fn classify(&self, pos: IVec3) -> Biome;

    /// Return the height of the given kind for the column at X/Z block coordinates.
    fn height(&self, x: i32, z: i32, kind: HeightKind) -> i32;

    /// Place the blocks of the given chunk.
    fn generate(&self, chunk: &mut GeneratingChunk);

    /// Run the given decoration stage on the chunk.
    fn decorate(&self, stage: DecorationStage, chunk: &mut GeneratingChunk);

}

/// Return true if both references point to the same pipeline object.
#[inline]
pub fn same_pipeline(a: &Arc<dyn ChunkPipeline>, b: &Arc<dyn ChunkPipeline>) -> bool {
    // Compare data pointers only, vtables may be duplicated between codegen units.
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}


impl<F> BiomeClassifier for F
where
    F: Fn(IVec3) -> Biome + Send + Sync,
{
    fn classify(&self, pos: IVec3) -> Biome {
        self(pos)
    }
}

impl<F> NoiseSampler for F
where
    F: Fn(i32, i32, HeightKind) -> i32 + Send + Sync,
{
    fn height(&self, x: i32, z: i32, kind: HeightKind) -> i32 {
        self(x, z, kind)
    }
}

impl<F> BlockPlacer for F
where
    F: Fn(&mut GeneratingChunk) + Send + Sync,
{
    fn place_blocks(&self, chunk: &mut GeneratingChunk) {
        self(chunk)
    }
}

impl<F> Decoration for F
where
    F: Fn(&mut GeneratingChunk) + Send + Sync,
{
    fn decorate(&self, chunk: &mut GeneratingChunk) {
        self(chunk)
    }
}


/// Biomes of every column of a chunk, classified by the host before block placement.
#[derive(Clone)]
pub struct ChunkBiomes {
    inner: [Biome; CHUNK_WIDTH * CHUNK_WIDTH],
}

impl ChunkBiomes {

    /// Classify every column of the given chunk with a classifier.
    pub fn classify(cx: i32, cz: i32, classifier: &(impl BiomeClassifier + ?Sized)) -> Self {
        Self {
            inner: std::array::from_fn(|i| {
                let x = (i % CHUNK_WIDTH) as i32;
                let z = (i / CHUNK_WIDTH) as i32;
                classifier.classify(IVec3::new(cx * 16 + x, 0, cz * 16 + z))
            }),
        }
    }

    /// Get the biome of the given chunk-local column.
    #[inline]
    pub fn get(&self, x: usize, z: usize) -> Biome {
        self.inner[x + z * CHUNK_WIDTH]
    }

}

/// Return true if the chunk-local position is inside of the chunk.
#[inline]
fn in_chunk(pos: IVec3) -> bool {
    (0..CHUNK_WIDTH as i32).contains(&pos.x)
        && (0..CHUNK_WIDTH as i32).contains(&pos.z)
        && (0..CHUNK_HEIGHT as i32).contains(&pos.y)
}

/// The context given to strategies generating a single chunk. It gives read-only
/// access to what the host has already computed for this chunk and write access to
/// the chunk's block volume. Positions are chunk-local unless stated otherwise.
pub struct GeneratingChunk<'a> {
    cx: i32,
    cz: i32,
    seed: i64,
    biomes: &'a ChunkBiomes,
    chunk: &'a mut Chunk,
}

impl<'a> GeneratingChunk<'a> {

    /// Create a generating context for the chunk at the given chunk coordinates.
    pub fn new(cx: i32, cz: i32, seed: i64, biomes: &'a ChunkBiomes, chunk: &'a mut Chunk) -> Self {
        Self { cx, cz, seed, biomes, chunk }
    }

    /// Chunk X coordinate.
    #[inline]
    pub fn cx(&self) -> i32 {
        self.cx
    }

    /// Chunk Z coordinate.
    #[inline]
    pub fn cz(&self) -> i32 {
        self.cz
    }

    /// The seed of the world being generated.
    #[inline]
    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// A seed specific to this chunk, derived from the world seed.
    pub fn chunk_seed(&self) -> i64 {
        self.seed
            ^ (self.cx as i64).wrapping_mul(341873128712)
            ^ (self.cz as i64).wrapping_mul(132897987541)
    }

    /// Return the global block position of the chunk-local column.
    #[inline]
    pub fn global_column(&self, x: usize, z: usize) -> (i32, i32) {
        (self.cx * 16 + x as i32, self.cz * 16 + z as i32)
    }

    /// Biome of the chunk-local column, as classified by the host.
    #[inline]
    pub fn biome(&self, x: usize, z: usize) -> Biome {
        self.biomes.get(x, z)
    }

    /// Get the block at the chunk-local position, air outside of the chunk.
    #[inline]
    pub fn block(&self, pos: IVec3) -> u8 {
        if in_chunk(pos) {
            self.chunk.block(pos)
        } else {
            block::AIR
        }
    }

    /// Set the block at the chunk-local position, positions outside of the chunk are
    /// ignored.
    #[inline]
    pub fn set_block(&mut self, pos: IVec3, id: u8) {
        if in_chunk(pos) {
            self.chunk.set_block(pos, id);
        }
    }

    /// Fill the chunk-local column from `from_y` (included) to `to_y` (excluded), the
    /// range is clamped to the chunk's vertical range. Columns outside of the chunk
    /// are ignored.
    pub fn fill_column(&mut self, x: usize, z: usize, from_y: i32, to_y: i32, id: u8) {
        if x >= CHUNK_WIDTH || z >= CHUNK_WIDTH {
            return;
        }
        let from_y = from_y.max(0);
        let to_y = to_y.min(CHUNK_HEIGHT as i32);
        if from_y < to_y {
            let start = IVec3::new(x as i32, from_y, z as i32);
            self.chunk.fill_blocks(start, IVec3::new(1, to_y - from_y, 1), id);
        }
    }

    /// Return the Y coordinate of the highest non-air block in the chunk-local column.
    #[inline]
    pub fn surface_height(&self, x: usize, z: usize) -> Option<i32> {
        if x >= CHUNK_WIDTH || z >= CHUNK_WIDTH {
            return None;
        }
        self.chunk.highest_block(IVec3::new(x as i32, 0, z as i32))
    }

}
