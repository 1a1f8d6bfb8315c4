//! Chunk walking
//!
//! `ChunkWalker` is a cursor over `(offset, remaining)`. Each step consumes
//! one 8-byte header plus the padded payload and yields the chunk; it stops
//! as soon as fewer than 8 bytes remain. It never inspects chunk contents, so
//! callers decide when to stop (e.g. at the first "data" chunk).

use std::iter::FusedIterator;

use super::ChunkId;

/// Size of a chunk header: 4-byte id + 4-byte LE size
pub const CHUNK_HEADER_LEN: usize = 8;

/// First chunk header follows "RIFF", the RIFF size and "WAVE"
pub const FIRST_CHUNK_OFFSET: usize = 12;

/// One chunk as found in the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub id: ChunkId,
    /// Offset of the chunk header
    pub offset: usize,
    /// Payload size as declared in the header
    pub size: u32,
    /// Payload bytes actually present (shorter than `size` if truncated)
    pub payload: &'a [u8],
}

impl<'a> Chunk<'a> {
    /// Offset of the first payload byte
    pub fn payload_offset(&self) -> usize {
        self.offset + CHUNK_HEADER_LEN
    }

    pub fn is_truncated(&self) -> bool {
        self.payload.len() < self.size as usize
    }
}

/// Bytes occupied by a payload including its alignment pad byte
fn padded_len(size: u32) -> usize {
    size as usize + (size & 1) as usize
}

/// Iterator over the chunks of a RIFF buffer
#[derive(Debug, Clone)]
pub struct ChunkWalker<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> ChunkWalker<'a> {
    /// Walk from the first chunk after the RIFF/WAVE header
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::at(buffer, FIRST_CHUNK_OFFSET)
    }

    /// Walk from an arbitrary offset
    pub fn at(buffer: &'a [u8], offset: usize) -> Self {
        Self { buffer, offset }
    }

    /// Offset of the next chunk header
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left from the cursor to the end of the buffer
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }
}

impl<'a> Iterator for ChunkWalker<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        if self.remaining() < CHUNK_HEADER_LEN {
            return None;
        }

        let header = &self.buffer[self.offset..self.offset + CHUNK_HEADER_LEN];
        let id = ChunkId([header[0], header[1], header[2], header[3]]);
        let size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        let payload_start = self.offset + CHUNK_HEADER_LEN;
        let payload_end = payload_start
            .saturating_add(size as usize)
            .min(self.buffer.len());

        let chunk = Chunk {
            id,
            offset: self.offset,
            size,
            payload: &self.buffer[payload_start..payload_end],
        };

        // May land past the end; remaining() then reports 0 and the walk ends
        self.offset = payload_start.saturating_add(padded_len(size));

        Some(chunk)
    }
}

impl FusedIterator for ChunkWalker<'_> {}
