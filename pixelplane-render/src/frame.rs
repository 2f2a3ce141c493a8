use crate::error::RenderError;
use crate::shader::Rgba;

/// An RGBA pixel buffer, 4 bytes per pixel, row-major.
///
/// The dimensions and the byte vector live together and only change
/// together, so `pixels().len() == width * height * 4` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Byte length of a `width`×`height` RGBA buffer, or `None` on overflow.
fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
}

impl FrameBuffer {
    /// Allocate a buffer filled with `fill`.
    ///
    /// Allocation failure is reported instead of aborting so the caller can
    /// shut down cleanly.
    pub fn try_new(width: u32, height: u32, fill: Rgba) -> crate::Result<Self> {
        let bytes = byte_len(width, height).ok_or(RenderError::Allocation { bytes: usize::MAX })?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(bytes)
            .map_err(|_| RenderError::Allocation { bytes })?;
        pixels.extend(fill.to_array().iter().copied().cycle().take(bytes));
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to the bytes. The slice can't change length, so the
    /// dimension invariant survives.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn is_consistent(&self) -> bool {
        byte_len(self.width, self.height) == Some(self.pixels.len())
    }

    pub fn has_dims(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }

    /// Change the dimensions, reusing the existing allocation when it is big
    /// enough. Pixel contents are unspecified afterwards.
    pub fn reshape(&mut self, width: u32, height: u32) -> crate::Result<()> {
        if self.has_dims(width, height) {
            return Ok(());
        }
        let bytes = byte_len(width, height).ok_or(RenderError::Allocation { bytes: usize::MAX })?;
        if bytes > self.pixels.len() {
            self.pixels
                .try_reserve_exact(bytes - self.pixels.len())
                .map_err(|_| RenderError::Allocation { bytes })?;
        }
        self.pixels.resize(bytes, 0);
        self.width = width;
        self.height = height;
        Ok(())
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of range for {}×{} buffer",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let i = self.offset(x, y);
        let p = &self.pixels[i..i + 4];
        Rgba {
            r: p[0],
            g: p[1],
            b: p[2],
            a: p[3],
        }
    }

    /// Write one pixel. Panics on out-of-range coordinates.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&color.to_array());
    }

    /// A new buffer of the given size, sampled nearest-neighbour from this one.
    ///
    /// Used on resize so the screen keeps showing the old picture, stretched,
    /// until the compute worker publishes a frame at the new size.
    pub fn resampled(&self, width: u32, height: u32) -> crate::Result<Self> {
        let mut out = Self::try_new(width, height, Rgba::BACKDROP)?;
        if self.width == 0 || self.height == 0 {
            return Ok(out);
        }
        let src_stride = self.stride();
        let dst_stride = out.stride();
        for y in 0..height as usize {
            let sy = y * self.height as usize / height as usize;
            let src_row = &self.pixels[sy * src_stride..(sy + 1) * src_stride];
            let dst_row = &mut out.pixels[y * dst_stride..(y + 1) * dst_stride];
            for (x, dst) in dst_row.chunks_exact_mut(4).enumerate() {
                let sx = x * self.width as usize / width as usize;
                dst.copy_from_slice(&src_row[sx * 4..sx * 4 + 4]);
            }
        }
        Ok(out)
    }
}
