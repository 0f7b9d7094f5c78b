//! Strategies installed by the demo on top of the host's generation.

use glam::IVec3;

use genhook::gen::{BiomeClassifier, Decoration, GeneratingChunk, HeightKind, NoiseSampler};
use genhook::chunk::CHUNK_WIDTH;
use genhook::biome::Biome;
use genhook::block;


/// Rolling hills made of two crossed sine waves.
pub struct Hills {
    pub base: i32,
    pub amplitude: f64,
}

impl NoiseSampler for Hills {

    fn height(&self, x: i32, z: i32, kind: HeightKind) -> i32 {
        let wave = (x as f64 / 23.0).sin() + (z as f64 / 17.0).cos();
        let surface = self.base + (wave * self.amplitude * 0.5) as i32;
        match kind {
            HeightKind::Surface | HeightKind::OceanFloor => surface,
            HeightKind::LowestSpawn => surface + 1,
        }
    }

}

/// Biomes laid out in bands along the X axis.
pub struct Bands {
    pub width: i32,
}

impl BiomeClassifier for Bands {

    fn classify(&self, pos: IVec3) -> Biome {
        const BANDS: [Biome; 4] = [Biome::Plains, Biome::Desert, Biome::Forest, Biome::Tundra];
        BANDS[pos.x.div_euclid(self.width).rem_euclid(BANDS.len() as i32) as usize]
    }

}

/// Snow layer on top of every frozen column.
pub struct SnowCover;

impl Decoration for SnowCover {

    fn decorate(&self, chunk: &mut GeneratingChunk) {
        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_WIDTH {
                if !chunk.biome(x, z).is_frozen() {
                    continue;
                }
                if let Some(y) = chunk.surface_height(x, z) {
                    chunk.set_block(IVec3::new(x as i32, y + 1, z as i32), block::SNOW);
                }
            }
        }
    }

}
