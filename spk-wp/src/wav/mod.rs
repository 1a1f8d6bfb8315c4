//! Read-side subset of the RIFF/WAVE container
//!
//! Only what peak extraction needs: the "RIFF" tag, the chunk sequence, the
//! "fmt " fields and the location of the first "data" chunk. All multi-byte
//! fields are little-endian.
//!
//! ```text
//! offset  size  field
//!      0     4  "RIFF"
//!      4     4  RIFF size
//!      8     4  "WAVE"
//!     12     8  chunk header: id (4 ASCII bytes) + payload size (u32 LE)
//!     20     n  payload, plus one pad byte when n is odd
//!    ...        more chunks
//! ```

mod chunk;
mod layout;
pub mod pcm;

pub use chunk::{Chunk, ChunkWalker, CHUNK_HEADER_LEN, FIRST_CHUNK_OFFSET};
pub use layout::{read_layout, FmtInfo, WavLayout, DEFAULT_BITS_PER_SAMPLE, DEFAULT_CHANNELS};

use std::fmt;

/// Four-character chunk identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    pub const RIFF: ChunkId = ChunkId(*b"RIFF");
    pub const FMT: ChunkId = ChunkId(*b"fmt ");
    pub const DATA: ChunkId = ChunkId(*b"data");
    pub const LIST: ChunkId = ChunkId(*b"LIST");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId(\"{}\")", self)
    }
}
