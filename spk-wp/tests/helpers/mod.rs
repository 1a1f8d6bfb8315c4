//! Shared test helpers
//!
//! - `WavBuilder`: byte-level RIFF writer for atypical or malformed layouts
//! - `write_hound_wav`: real WAV files through hound
//! - `reference_peaks`: peaks computed from hound's own decoder

#![allow(dead_code)]

use std::path::Path;

/// Assemble RIFF buffers chunk by chunk
pub struct WavBuilder {
    tag: [u8; 4],
    chunks: Vec<([u8; 4], Vec<u8>)>,
}

impl WavBuilder {
    pub fn new() -> Self {
        Self {
            tag: *b"RIFF",
            chunks: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: &[u8; 4]) -> Self {
        self.tag = *tag;
        self
    }

    /// PCM "fmt " chunk at 44.1 kHz
    pub fn fmt(self, channels: u16, bits: u16) -> Self {
        self.fmt_with(1, channels, 44_100, bits)
    }

    pub fn fmt_with(self, format: u16, channels: u16, sample_rate: u32, bits: u16) -> Self {
        let block_align = channels * bits.div_ceil(8);
        let mut p = Vec::with_capacity(16);
        p.extend_from_slice(&format.to_le_bytes());
        p.extend_from_slice(&channels.to_le_bytes());
        p.extend_from_slice(&sample_rate.to_le_bytes());
        p.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
        p.extend_from_slice(&block_align.to_le_bytes());
        p.extend_from_slice(&bits.to_le_bytes());
        self.chunk(b"fmt ", p)
    }

    pub fn data(self, payload: Vec<u8>) -> Self {
        self.chunk(b"data", payload)
    }

    pub fn chunk(mut self, id: &[u8; 4], payload: Vec<u8>) -> Self {
        self.chunks.push((*id, payload));
        self
    }

    /// Serialize, padding odd payloads to even length
    pub fn build(self) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(b"WAVE");
        for (id, payload) in &self.chunks {
            body.extend_from_slice(id);
            body.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            body.extend_from_slice(payload);
            if payload.len() % 2 == 1 {
                body.push(0);
            }
        }

        let mut out = Vec::with_capacity(body.len() + 8);
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(&body);
        out
    }
}

/// Interleaved 16-bit little-endian PCM
pub fn pcm16(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Interleaved 24-bit little-endian PCM (low three bytes of each value)
pub fn pcm24(samples: &[i32]) -> Vec<u8> {
    samples.iter().flat_map(|s| {
        let b = s.to_le_bytes();
        [b[0], b[1], b[2]]
    }).collect()
}

/// Interleaved 32-bit little-endian PCM
pub fn pcm32(samples: &[i32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Write interleaved integer samples with hound
pub fn write_hound_wav(path: &Path, channels: u16, bits: u16, samples: &[i32]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: 44_100,
        bits_per_sample: bits,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create WAV writer");
    for &sample in samples {
        writer.write_sample(sample).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV file");
}

/// Sine wave at `amplitude` of full scale, same value on every channel
pub fn sine(frames: usize, channels: u16, bits: u16, amplitude: f64) -> Vec<i32> {
    let full = ((1i64 << (bits - 1)) - 1) as f64;
    let mut out = Vec::with_capacity(frames * channels as usize);
    for i in 0..frames {
        let t = i as f64 / 44_100.0;
        let v = (amplitude * full * (2.0 * std::f64::consts::PI * 440.0 * t).sin()) as i32;
        for _ in 0..channels {
            out.push(v);
        }
    }
    out
}

/// Peaks of a WAV file computed from hound's decoded samples
pub fn reference_peaks(path: &Path, target: usize) -> Vec<f32> {
    let mut reader = hound::WavReader::open(path).expect("Failed to open WAV");
    let spec = reader.spec();
    let first_channel: Vec<i32> = reader
        .samples::<i32>()
        .map(|s| s.expect("Failed to decode sample"))
        .step_by(spec.channels as usize)
        .collect();

    let full_scale = 2f64.powi(spec.bits_per_sample as i32 - 1);
    let per_peak = (first_channel.len() / target).max(1);

    first_channel
        .chunks(per_peak)
        .map(|window| {
            window
                .iter()
                .map(|&s| (s as f64).abs() / full_scale)
                .fold(0.0f64, f64::max)
                .clamp(0.0, 1.0) as f32
        })
        .collect()
}
