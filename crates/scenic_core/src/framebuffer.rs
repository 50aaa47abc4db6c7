//! Framebuffer pixel storage
//!
//! A [`FrameBuffer`] is a row-major grid of `f32` samples with 3 (rgb) or
//! 4 (rgba) channels per pixel. Renderers resize it to their resolution
//! before writing.

use thiserror::Error;

/// Channel count for a framebuffer format name, `None` if unknown
pub fn channels_for_format(format: &str) -> Option<usize> {
    match format {
        "rgb" => Some(3),
        "rgba" => Some(4),
        _ => None,
    }
}

/// Sample count for the given dimensions, `None` if it overflows `usize`
pub fn sample_count(width: usize, height: usize, channels: usize) -> Option<usize> {
    width.checked_mul(height)?.checked_mul(channels)
}

/// Requested dimensions have more samples than `usize` can count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Framebuffer of {width}x{height} with {channels} channels is too large")]
pub struct SizeOverflow {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

/// Pixel data written by a render pass
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

impl FrameBuffer {
    /// Create an empty (0x0) framebuffer with the given channel count
    pub fn new(channels: usize) -> Self {
        Self {
            width: 0,
            height: 0,
            channels,
            data: Vec::new(),
        }
    }

    /// Create a framebuffer from existing samples
    ///
    /// Returns `None` if `data.len() != width * height * channels` or the
    /// product overflows.
    pub fn from_data(width: usize, height: usize, channels: usize, data: Vec<f32>) -> Option<Self> {
        if sample_count(width, height, channels)? != data.len() {
            return None;
        }
        Some(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Resize and clear to zero
    ///
    /// Leaves the framebuffer untouched if the sample count overflows.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), SizeOverflow> {
        let len = sample_count(width, height, self.channels).ok_or(SizeOverflow {
            width,
            height,
            channels: self.channels,
        })?;
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(len, 0.0);
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Check if the framebuffer holds no pixels
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// All samples, row-major
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// All samples, row-major, mutable
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Samples of one pixel
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[f32]> {
        let offset = self.offset(x, y)?;
        Some(&self.data[offset..offset + self.channels])
    }

    /// Write one pixel; extra channels in `color` are ignored, missing ones untouched
    pub fn set_pixel(&mut self, x: usize, y: usize, color: &[f32]) {
        if let Some(offset) = self.offset(x, y) {
            let n = color.len().min(self.channels);
            self.data[offset..offset + n].copy_from_slice(&color[..n]);
        }
    }

    /// Fill every pixel with one color
    pub fn fill(&mut self, color: &[f32]) {
        if self.channels == 0 {
            return;
        }
        let n = color.len().min(self.channels);
        for pixel in self.data.chunks_exact_mut(self.channels) {
            pixel[..n].copy_from_slice(&color[..n]);
        }
    }

    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) * self.channels)
    }
}
