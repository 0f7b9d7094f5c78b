//! Adapter building a full terrain generator from a noise sampler and a biome
//! classifier.

use std::sync::Arc;

use glam::IVec3;

use crate::world_override::OverrideError;
use crate::chunk::{CHUNK_WIDTH, CHUNK_HEIGHT};
use crate::block;

use super::{BiomeClassifier, NoiseSampler, TerrainGenerator, GeneratingChunk, HeightKind};


/// Columns whose surface is below this height are filled with water up to it.
pub const SEA_LEVEL: i32 = 64;
/// Number of filler blocks placed below the top block of a column.
const FILLER_DEPTH: i32 = 3;


/// Configuration of a [`NoiseTerrainBridge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Sampled surface heights below this are raised to it, this must be in the
    /// chunk's vertical range.
    pub min_height: i32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self { min_height: 1 }
    }
}

/// A terrain generator that delegates heights to a [`NoiseSampler`] and paints each
/// column with the default materials of the biome given by a [`BiomeClassifier`].
///
/// The painting policy is fixed: a bedrock floor, the biome base block, a few filler
/// blocks, the top block and water up to [`SEA_LEVEL`]. Generators needing another
/// palette should implement [`TerrainGenerator`] directly.
pub struct NoiseTerrainBridge {
    classifier: Arc<dyn BiomeClassifier>,
    sampler: Arc<dyn NoiseSampler>,
    config: BridgeConfig,
}

impl NoiseTerrainBridge {

    /// Create a new bridge with the default configuration.
    pub fn new(classifier: Arc<dyn BiomeClassifier>, sampler: Arc<dyn NoiseSampler>) -> Self {
        Self { classifier, sampler, config: BridgeConfig::default() }
    }

    /// Create a new bridge with a custom configuration, the configuration is rejected
    /// if its minimum height is outside of the chunk's vertical range.
    pub fn with_config(
        classifier: Arc<dyn BiomeClassifier>,
        sampler: Arc<dyn NoiseSampler>,
        config: BridgeConfig,
    ) -> Result<Self, OverrideError> {
        if config.min_height < 0 || config.min_height >= CHUNK_HEIGHT as i32 {
            return Err(OverrideError::Precondition("bridge minimum height out of chunk range"));
        }
        Ok(Self { classifier, sampler, config })
    }

    /// The classifier used to select materials.
    #[inline]
    pub fn classifier(&self) -> &Arc<dyn BiomeClassifier> {
        &self.classifier
    }

    /// The sampler all heights are delegated to.
    #[inline]
    pub fn sampler(&self) -> &Arc<dyn NoiseSampler> {
        &self.sampler
    }

    #[inline]
    pub fn config(&self) -> BridgeConfig {
        self.config
    }

    /// Return the surface height actually painted for the given column.
    #[inline]
    pub fn painted_height(&self, x: i32, z: i32) -> i32 {
        self.sampler.height(x, z, HeightKind::Surface)
            .clamp(self.config.min_height, CHUNK_HEIGHT as i32 - 1)
    }

}

impl TerrainGenerator for NoiseTerrainBridge {

    fn height(&self, x: i32, z: i32, kind: HeightKind) -> i32 {
        self.sampler.height(x, z, kind)
    }

    fn place_blocks(&self, chunk: &mut GeneratingChunk) {
        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_WIDTH {

                let (gx, gz) = chunk.global_column(x, z);
                let biome = self.classifier.classify(IVec3::new(gx, 0, gz));
                let materials = biome.materials();
                let top = self.painted_height(gx, gz);

                chunk.fill_column(x, z, 0, top - FILLER_DEPTH, materials.base);
                chunk.fill_column(x, z, top - FILLER_DEPTH, top, materials.filler);
                chunk.set_block(IVec3::new(x as i32, top, z as i32), materials.top);

                if top > 0 {
                    chunk.set_block(IVec3::new(x as i32, 0, z as i32), block::BEDROCK);
                }

                if top < SEA_LEVEL - 1 {
                    chunk.fill_column(x, z, top + 1, SEA_LEVEL, block::WATER_STILL);
                    if biome.is_frozen() {
                        chunk.set_block(IVec3::new(x as i32, SEA_LEVEL - 1, z as i32), block::ICE);
                    }
                }

            }
        }
    }

}
