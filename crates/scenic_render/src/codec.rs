//! Framebuffer persistence
//!
//! Two layouts are supported, chosen by file extension:
//!
//! - `.png`: 8-bit, samples clamped to `[0, 1]`, written through `image`
//! - anything else: the native float layout, a 20-byte header followed by
//!   the raw `f32` samples
//!
//! Native header, all fields little-endian:
//!
//! | offset | field    | type      |
//! |--------|----------|-----------|
//! | 0      | magic    | `b"SCFB"` |
//! | 4      | version  | `u32`     |
//! | 8      | width    | `u32`     |
//! | 12     | height   | `u32`     |
//! | 16     | channels | `u32`     |

use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use scenic_core::{AssetError, FrameBuffer, SceneError};

/// Magic bytes of the native layout
pub const NATIVE_MAGIC: [u8; 4] = *b"SCFB";
/// Current native layout version
pub const NATIVE_VERSION: u32 = 1;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct NativeHeader {
    magic: [u8; 4],
    version: u32,
    width: u32,
    height: u32,
    channels: u32,
}

const HEADER_SIZE: usize = std::mem::size_of::<NativeHeader>();

fn invalid_data(msg: impl Into<String>) -> SceneError {
    SceneError::Io(io::Error::new(ErrorKind::InvalidData, msg.into()))
}

fn to_u32(value: usize, what: &str) -> Result<u32, SceneError> {
    u32::try_from(value).map_err(|_| invalid_data(format!("{} {} does not fit in u32", what, value)))
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

/// Encode a framebuffer in the native layout
pub fn encode_native(fb: &FrameBuffer) -> Result<Vec<u8>, SceneError> {
    let header = NativeHeader {
        magic: NATIVE_MAGIC,
        version: NATIVE_VERSION.to_le(),
        width: to_u32(fb.width(), "width")?.to_le(),
        height: to_u32(fb.height(), "height")?.to_le(),
        channels: to_u32(fb.channels(), "channels")?.to_le(),
    };
    let samples: Vec<u32> = fb.as_slice().iter().map(|s| s.to_bits().to_le()).collect();

    let mut bytes = Vec::with_capacity(HEADER_SIZE + samples.len() * 4);
    bytes.extend_from_slice(bytemuck::bytes_of(&header));
    bytes.extend_from_slice(bytemuck::cast_slice(&samples));
    Ok(bytes)
}

/// Decode a framebuffer from the native layout
pub fn decode_native(bytes: &[u8]) -> Result<FrameBuffer, SceneError> {
    if bytes.len() < HEADER_SIZE {
        return Err(invalid_data("framebuffer file is truncated"));
    }
    let header: NativeHeader = bytemuck::pod_read_unaligned(&bytes[..HEADER_SIZE]);
    if header.magic != NATIVE_MAGIC {
        return Err(invalid_data("not a framebuffer file"));
    }
    let version = u32::from_le(header.version);
    if version != NATIVE_VERSION {
        return Err(invalid_data(format!("unsupported framebuffer version {}", version)));
    }

    let width = u32::from_le(header.width) as usize;
    let height = u32::from_le(header.height) as usize;
    let channels = u32::from_le(header.channels) as usize;

    let samples: Vec<f32> = bytes[HEADER_SIZE..]
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    FrameBuffer::from_data(width, height, channels, samples).ok_or_else(|| {
        invalid_data(format!(
            "expected {}x{}x{} samples, found {} bytes of data",
            width,
            height,
            channels,
            bytes.len() - HEADER_SIZE
        ))
    })
}

/// Write a framebuffer to `path`, choosing the layout by extension
pub fn save(fb: &FrameBuffer, path: &Path) -> Result<(), SceneError> {
    if is_png(path) {
        save_png(fb, path)
    } else {
        fs::write(path, encode_native(fb)?)?;
        Ok(())
    }
}

/// Read a framebuffer written in the native layout
pub fn load_native(path: &Path) -> Result<FrameBuffer, SceneError> {
    decode_native(&fs::read(path)?)
}

fn save_png(fb: &FrameBuffer, path: &Path) -> Result<(), SceneError> {
    let color = match fb.channels() {
        3 => image::ExtendedColorType::Rgb8,
        4 => image::ExtendedColorType::Rgba8,
        n => return Err(invalid_data(format!("cannot write {} channels as PNG", n))),
    };
    let bytes: Vec<u8> = fb
        .as_slice()
        .iter()
        .map(|s| (s.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();

    image::save_buffer(
        path,
        &bytes,
        to_u32(fb.width(), "width")?,
        to_u32(fb.height(), "height")?,
        color,
    )
    .map_err(|err| match err {
        image::ImageError::IoError(io) => SceneError::Io(io),
        other => SceneError::Asset(AssetError::from(other)),
    })
}
