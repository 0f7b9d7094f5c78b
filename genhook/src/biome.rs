//! Biome classification results and the default materials each biome paints its
//! surface with.

use crate::block;


/// Identifier of a biome, this is the result of biome classification for a position.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Biome {
    #[default]
    Void,
    Forest,
    Taiga,
    Desert,
    Plains,
    IceDesert,
    Tundra,
    Nether,
}

/// Default materials of a biome, used when painting a column of terrain without a
/// custom block palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiomeMaterials {
    /// The block placed at the surface height of the column.
    pub top: u8,
    /// The block placed in the few layers below the top block.
    pub filler: u8,
    /// The block filling everything below the filler layers.
    pub base: u8,
}

impl Biome {

    /// Return the default materials for this biome.
    pub fn materials(self) -> BiomeMaterials {
        let (top, filler, base) = match self {
            Biome::Desert | Biome::IceDesert => (block::SAND, block::SAND, block::SANDSTONE),
            Biome::Nether => (block::NETHERRACK, block::NETHERRACK, block::NETHERRACK),
            Biome::Tundra => (block::SNOW_BLOCK, block::DIRT, block::STONE),
            Biome::Void => (block::STONE, block::STONE, block::STONE),
            _ => (block::GRASS, block::DIRT, block::STONE),
        };
        BiomeMaterials { top, filler, base }
    }

    /// Return true if the water of this biome freezes at sea level.
    #[inline]
    pub fn is_frozen(self) -> bool {
        matches!(self, Biome::Tundra | Biome::IceDesert | Biome::Taiga)
    }

}
