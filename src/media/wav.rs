//! PCM16 mono to RIFF/WAVE container.
//!
//! The speech endpoint returns raw little-endian 16-bit mono samples as base64. Players accept
//! them only once wrapped in a canonical 44-byte WAVE header, and most fail silently when a
//! chunk size is off, so the header layout here is exact:
//!
//! | offset | field | value |
//! |---|---|---|
//! | 0 | `RIFF` | |
//! | 4 | chunk size | `36 + data_len` |
//! | 8 | `WAVE` | |
//! | 12 | `fmt ` | subchunk size 16 |
//! | 20 | format | 1 (PCM) |
//! | 22 | channels | 1 |
//! | 24 | sample rate | |
//! | 28 | byte rate | `sample_rate * 2` |
//! | 32 | block align | 2 |
//! | 34 | bits per sample | 16 |
//! | 36 | `data` | subchunk size `data_len` |
//! | 44 | samples | |

use crate::{
    foundation::error::{PlannerError, PlannerResult},
    media::blob::{MIME_WAV, MediaBlob},
};

/// Sample rate of the speech endpoint's PCM output.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

pub const WAV_HEADER_LEN: usize = 44;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BLOCK_ALIGN: u16 = CHANNELS * BITS_PER_SAMPLE / 8;

/// Wrap little-endian PCM16 bytes in a WAVE container.
///
/// An odd byte count cannot hold whole samples and is rejected.
pub fn wrap_pcm16(pcm_le: &[u8], sample_rate: u32) -> PlannerResult<Vec<u8>> {
    if sample_rate == 0 {
        return Err(PlannerError::media("sample rate must be > 0"));
    }
    if pcm_le.len() % 2 != 0 {
        return Err(PlannerError::media(format!(
            "PCM16 payload has odd length {}",
            pcm_le.len()
        )));
    }
    let data_len = u32::try_from(pcm_le.len())
        .ok()
        .filter(|len| *len <= u32::MAX - 36)
        .ok_or_else(|| PlannerError::media("PCM payload too large for a WAVE container"))?;
    let byte_rate = sample_rate
        .checked_mul(u32::from(BLOCK_ALIGN))
        .ok_or_else(|| PlannerError::media(format!("sample rate {sample_rate} is too large")))?;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + pcm_le.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&BLOCK_ALIGN.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(pcm_le);
    Ok(out)
}

pub fn encode_wav(samples: &[i16], sample_rate: u32) -> PlannerResult<Vec<u8>> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for s in samples {
        pcm.extend_from_slice(&s.to_le_bytes());
    }
    wrap_pcm16(&pcm, sample_rate)
}

/// Decode base64 PCM16 from the speech endpoint into a playable `audio/wav` blob.
pub fn pcm_base64_to_wav(b64: &str, sample_rate: u32) -> PlannerResult<MediaBlob> {
    let pcm = MediaBlob::from_base64("audio/L16", b64)?;
    let wav = wrap_pcm16(pcm.bytes(), sample_rate)?;
    tracing::debug!(
        pcm_bytes = pcm.len(),
        sample_rate,
        "wrapped speech PCM in WAVE container"
    );
    Ok(MediaBlob::new(MIME_WAV, wav))
}

/// Parsed WAVE header plus decoded PCM16 samples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WavInfo {
    pub riff_size: u32,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_len: u32,
    pub samples: Vec<i16>,
}

impl WavInfo {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.channels) / f64::from(self.sample_rate)
    }
}

fn le_u16(bytes: &[u8], at: usize) -> PlannerResult<u16> {
    bytes
        .get(at..at + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or_else(|| PlannerError::media("truncated WAVE header"))
}

fn le_u32(bytes: &[u8], at: usize) -> PlannerResult<u32> {
    bytes
        .get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| PlannerError::media("truncated WAVE header"))
}

/// Parse a PCM16 WAVE file, walking chunks so that extra chunks before `data` are tolerated.
pub fn parse_wav(bytes: &[u8]) -> PlannerResult<WavInfo> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(PlannerError::media("not a RIFF/WAVE file"));
    }
    let riff_size = le_u32(bytes, 4)?;

    let mut fmt: Option<(u16, u16, u32, u32, u16, u16)> = None;
    let mut pos = 12usize;
    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let size = le_u32(bytes, pos + 4)? as usize;
        let body = pos + 8;
        match id {
            b"fmt " => {
                if size < 16 {
                    return Err(PlannerError::media("fmt chunk shorter than 16 bytes"));
                }
                fmt = Some((
                    le_u16(bytes, body)?,
                    le_u16(bytes, body + 2)?,
                    le_u32(bytes, body + 4)?,
                    le_u32(bytes, body + 8)?,
                    le_u16(bytes, body + 12)?,
                    le_u16(bytes, body + 14)?,
                ));
            }
            b"data" => {
                let Some((format, channels, sample_rate, byte_rate, block_align, bits)) = fmt
                else {
                    return Err(PlannerError::media("data chunk before fmt chunk"));
                };
                if format != 1 || bits != 16 {
                    return Err(PlannerError::media(format!(
                        "unsupported WAVE encoding (format={format}, bits={bits})"
                    )));
                }
                let data = bytes
                    .get(body..body + size)
                    .ok_or_else(|| PlannerError::media("data chunk exceeds file length"))?;
                let samples = data
                    .chunks_exact(2)
                    .map(|b| i16::from_le_bytes([b[0], b[1]]))
                    .collect();
                return Ok(WavInfo {
                    riff_size,
                    channels,
                    sample_rate,
                    byte_rate,
                    block_align,
                    bits_per_sample: bits,
                    data_len: size as u32,
                    samples,
                });
            }
            _ => {}
        }
        // Chunks are word aligned.
        pos = body + size + (size & 1);
    }
    Err(PlannerError::media("WAVE file has no data chunk"))
}

#[cfg(test)]
#[path = "../../tests/unit/media/wav.rs"]
mod tests;
