//! The block volume of a single chunk, written by terrain generators.

use glam::IVec3;

use crate::block::AIR;


/// Chunk size in both X and Z coordinates.
pub const CHUNK_WIDTH: usize = 16;
/// Chunk height.
pub const CHUNK_HEIGHT: usize = 128;
/// Internal chunk size, in number of elements per chunk.
const CHUNK_SIZE: usize = CHUNK_HEIGHT * CHUNK_WIDTH * CHUNK_WIDTH;


/// Calculate the index in the chunk's arrays for the given chunk-local position. The
/// layout is `_xxx xzzz zyyy yyyy`, so a column is contiguous in memory. Only firsts
/// relevant bits are taken in each coordinate component.
#[inline]
fn calc_index(pos: IVec3) -> usize {
    debug_assert!(pos.y >= 0 && pos.y < CHUNK_HEIGHT as i32);
    let x = pos.x as u32 & 0b1111;
    let z = pos.z as u32 & 0b1111;
    let y = pos.y as u32 & 0b1111111;
    ((x << 11) | (z << 7) | y) as usize
}

/// Data structure storing the blocks of a chunk, chunks are a world subdivision of
/// 16x128x16 blocks.
#[derive(Clone)]
pub struct Chunk {
    /// The numeric identifier of the block.
    block: ChunkByteArray,
}

impl Chunk {

    /// Create a new empty chunk, full of air blocks.
    pub fn new() -> Box<Self> {
        Box::new(Self {
            block: [AIR; CHUNK_SIZE],
        })
    }

    /// Get block id at the given global position (rebased to chunk-local).
    /// Panics if Y component of the position is not between 0 and 128 (excluded).
    #[inline]
    pub fn block(&self, pos: IVec3) -> u8 {
        self.block[calc_index(pos)]
    }

    /// Set block id at the given global position (rebased to chunk-local).
    /// Panics if Y component of the position is not between 0 and 128 (excluded).
    #[inline]
    pub fn set_block(&mut self, pos: IVec3, block: u8) {
        self.block[calc_index(pos)] = block;
    }

    /// Fill the given chunk area with given block id.
    /// Panics if Y component of the position is not between 0 and 128 (excluded).
    pub fn fill_blocks(&mut self, start: IVec3, size: IVec3, id: u8) {
        for x in start.x..start.x + size.x {
            for z in start.z..start.z + size.z {
                // A column is contiguous, Y is the lowest part of the index.
                let index = calc_index(IVec3::new(x, start.y, z));
                self.block[index..index + size.y as usize].fill(id);
            }
        }
    }

    /// Return the Y coordinate of the highest non-air block in the given column, or
    /// none if the whole column is air. Only X and Z components are used.
    pub fn highest_block(&self, pos: IVec3) -> Option<i32> {
        let base = calc_index(IVec3::new(pos.x, 0, pos.z));
        self.block[base..base + CHUNK_HEIGHT].iter()
            .rposition(|&id| id != AIR)
            .map(|y| y as i32)
    }

}

/// Type alias for a chunk array that stores `u8 * CHUNK_SIZE` values.
type ChunkByteArray = [u8; CHUNK_SIZE];
