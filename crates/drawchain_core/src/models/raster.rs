//! RGBA canvas buffers handed in by the room layer.
//!
//! Pixels are stored row-major, 4 bytes per pixel (R, G, B, A), non-premultiplied.
//! Decoding from PNG/base64 happens outside the engine.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};

pub const BYTES_PER_PIXEL: usize = 4;

pub const WHITE: [u8; 4] = [255, 255, 255, 255];
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Immutable RGBA raster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RasterData", into = "RasterData")]
pub struct Raster {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

/// Wire shape of a raster; validated on conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Raster {
    /// Wrap a pixel buffer, checking that its length matches the dimensions.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if rgba.len() != expected {
            return Err(ScoringError::InvalidRaster {
                width,
                height,
                expected,
                found: rgba.len(),
            });
        }
        Ok(Self { width, height, rgba })
    }

    /// Canvas filled with a single color.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut rgba = Vec::with_capacity(pixel_count * BYTES_PER_PIXEL);
        for _ in 0..pixel_count {
            rgba.extend_from_slice(&color);
        }
        Self { width, height, rgba }
    }

    /// Blank white canvas, the starting state of every drawing chain.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::filled(width, height, WHITE)
    }

    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        let mut rgba = Vec::with_capacity(width as usize * height as usize * BYTES_PER_PIXEL);
        for y in 0..height {
            for x in 0..width {
                rgba.extend_from_slice(&f(x, y));
            }
        }
        Self { width, height, rgba }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn same_dimensions(&self, other: &Raster) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Pixel at (x, y). Panics when out of bounds, like slice indexing.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        [self.rgba[idx], self.rgba[idx + 1], self.rgba[idx + 2], self.rgba[idx + 3]]
    }

    /// Iterate over pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.rgba.chunks_exact(BYTES_PER_PIXEL)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba
    }

    /// Copy of this raster with the rectangle painted in `color` (clipped to the canvas).
    pub fn with_rect(&self, x: u32, y: u32, w: u32, h: u32, color: [u8; 4]) -> Self {
        let mut rgba = self.rgba.clone();
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for py in y.min(self.height)..y_end {
            for px in x.min(self.width)..x_end {
                let idx = (py as usize * self.width as usize + px as usize) * BYTES_PER_PIXEL;
                rgba[idx..idx + BYTES_PER_PIXEL].copy_from_slice(&color);
            }
        }
        Self { width: self.width, height: self.height, rgba }
    }
}

impl TryFrom<RasterData> for Raster {
    type Error = ScoringError;

    fn try_from(data: RasterData) -> Result<Self> {
        Raster::new(data.width, data.height, data.rgba)
    }
}

impl From<Raster> for RasterData {
    fn from(raster: Raster) -> Self {
        RasterData { width: raster.width, height: raster.height, rgba: raster.rgba }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_short_buffer() {
        let err = Raster::new(2, 2, vec![0; 15]).unwrap_err();
        match err {
            ScoringError::InvalidRaster { expected, found, .. } => {
                assert_eq!(expected, 16);
                assert_eq!(found, 15);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_with_rect_clips_to_canvas() {
        let canvas = Raster::blank(10, 10).with_rect(8, 8, 5, 5, BLACK);
        assert_eq!(canvas.pixel(9, 9), BLACK);
        assert_eq!(canvas.pixel(7, 7), WHITE);
        let black = canvas.pixels().filter(|p| p[0] == 0).count();
        assert_eq!(black, 4);
    }

    #[test]
    fn test_serde_validates_length() {
        let bad = r#"{"width":1,"height":1,"rgba":[0,0,0]}"#;
        assert!(serde_json::from_str::<Raster>(bad).is_err());

        let good = r#"{"width":1,"height":1,"rgba":[1,2,3,4]}"#;
        let raster: Raster = serde_json::from_str(good).unwrap();
        assert_eq!(raster.pixel(0, 0), [1, 2, 3, 4]);
    }
}
