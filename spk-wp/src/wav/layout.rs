//! Locating the PCM payload
//!
//! `read_layout` validates the RIFF tag, walks chunks until the first "data"
//! chunk and reports where the samples are and how they are framed.

use serde::Serialize;

use super::{pcm, Chunk, ChunkId, ChunkWalker};
use crate::error::FormatError;

/// Channel count assumed when "data" precedes "fmt " (lenient mode)
pub const DEFAULT_CHANNELS: u16 = 2;

/// Bit depth assumed when "data" precedes "fmt " (lenient mode)
pub const DEFAULT_BITS_PER_SAMPLE: u16 = 16;

/// Fixed portion of a "fmt " payload
const FMT_MIN_LEN: usize = 16;

const FORMAT_PCM: u16 = 1;
const FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Fields of the "fmt " chunk that matter for peak extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FmtInfo {
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl FmtInfo {
    /// Parse the fixed fields (payload +0, +2, +4, +14)
    pub fn parse(chunk: &Chunk<'_>) -> Result<Self, FormatError> {
        let p = chunk.payload;
        if p.len() < FMT_MIN_LEN {
            return Err(FormatError::TruncatedChunk {
                id: chunk.id,
                needed: FMT_MIN_LEN,
                available: p.len(),
            });
        }

        Ok(Self {
            audio_format: u16::from_le_bytes([p[0], p[1]]),
            num_channels: u16::from_le_bytes([p[2], p[3]]),
            sample_rate: u32::from_le_bytes([p[4], p[5], p[6], p[7]]),
            bits_per_sample: u16::from_le_bytes([p[14], p[15]]),
        })
    }

    /// Integer PCM, either plain or WAVE_FORMAT_EXTENSIBLE
    pub fn is_pcm(&self) -> bool {
        matches!(self.audio_format, FORMAT_PCM | FORMAT_EXTENSIBLE)
    }
}

/// Where the PCM samples live and how they are framed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WavLayout {
    pub num_channels: u16,
    pub bits_per_sample: u16,
    /// `None` when no "fmt " chunk preceded "data"
    pub sample_rate: Option<u32>,
    /// Offset of the first PCM byte
    pub data_offset: usize,
    /// Payload size declared in the "data" header
    pub data_size: u32,
    /// Payload bytes actually present in the buffer
    pub data_len: usize,
    pub fmt_found: bool,
}

impl WavLayout {
    pub fn bytes_per_sample(&self) -> usize {
        pcm::bytes_per_sample(self.bits_per_sample)
    }

    /// Bytes per interleaved frame (one sample per channel)
    pub fn frame_width(&self) -> usize {
        self.bytes_per_sample() * self.num_channels as usize
    }

    /// Whole frames in the readable payload; trailing partial frames are ignored
    pub fn total_samples(&self) -> usize {
        match self.frame_width() {
            0 => 0,
            width => self.data_len / width,
        }
    }

    /// Readable PCM bytes of `buffer`
    pub fn data<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        &buffer[self.data_offset..self.data_offset + self.data_len]
    }
}

/// Validate the RIFF tag and locate the first "data" chunk
///
/// In strict mode a "data" chunk without a preceding "fmt " chunk, or a
/// non-PCM format code, is rejected instead of decoded with defaults.
pub fn read_layout(buffer: &[u8], strict: bool) -> Result<WavLayout, FormatError> {
    if buffer.get(..4) != Some(ChunkId::RIFF.as_bytes().as_slice()) {
        return Err(FormatError::NotRiff);
    }

    let mut fmt: Option<FmtInfo> = None;

    for chunk in ChunkWalker::new(buffer) {
        match chunk.id {
            ChunkId::FMT => {
                let info = FmtInfo::parse(&chunk)?;
                if strict && !info.is_pcm() {
                    return Err(FormatError::UnsupportedAudioFormat(info.audio_format));
                }
                fmt = Some(info);
            }
            ChunkId::DATA => return layout_for(&chunk, fmt, strict),
            _ => {}
        }
    }

    Err(FormatError::MissingDataChunk)
}

fn layout_for(
    data: &Chunk<'_>,
    fmt: Option<FmtInfo>,
    strict: bool,
) -> Result<WavLayout, FormatError> {
    let (num_channels, bits_per_sample, sample_rate) = match fmt {
        Some(info) => (info.num_channels, info.bits_per_sample, Some(info.sample_rate)),
        None if strict => return Err(FormatError::MissingFmtChunk),
        None => (DEFAULT_CHANNELS, DEFAULT_BITS_PER_SAMPLE, None),
    };

    Ok(WavLayout {
        num_channels,
        bits_per_sample,
        sample_rate,
        data_offset: data.payload_offset(),
        data_size: data.size,
        data_len: data.payload.len(),
        fmt_found: fmt.is_some(),
    })
}
