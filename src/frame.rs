//! Frame - 8-bit RGB pixel container
//!
//! Provides:
//! - Conversion from the Android Bitmap pixel layout (packed ARGB ints)
//! - Conversion to/from `image::RgbImage` for file decoding and encoding

use image::RgbImage;

use crate::error::{ImagingError, Result};

/// RGB color representation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack from Android `0xAARRGGBB`, dropping alpha
    #[inline]
    pub fn from_argb(argb: i32) -> Self {
        let c = argb as u32;
        Self {
            r: ((c >> 16) & 0xFF) as u8,
            g: ((c >> 8) & 0xFF) as u8,
            b: (c & 0xFF) as u8,
        }
    }

    /// Pack as opaque `0xFFRRGGBB`
    #[inline]
    pub fn to_argb(&self) -> i32 {
        (0xFF00_0000u32 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32) as i32
    }
}

/// Image frame, row-major and tightly packed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Rgb>,
}

/// Number of pixels for a `width` x `height` frame, rejecting empty or overflowing sizes
pub fn pixel_count(width: i64, height: i64) -> Result<usize> {
    if width <= 0 || height <= 0 {
        return Err(ImagingError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(ImagingError::InvalidDimensions { width, height })
}

impl Frame {
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self> {
        let expected = pixel_count(width as i64, height as i64)?;
        if pixels.len() != expected {
            return Err(ImagingError::BufferSize { expected, actual: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    /// Frame filled with a single color
    pub fn filled(width: usize, height: usize, color: Rgb) -> Result<Self> {
        let count = pixel_count(width as i64, height as i64)?;
        Ok(Self { width, height, pixels: vec![color; count] })
    }

    /// Create from packed ARGB ints (`Bitmap.getPixels` layout)
    pub fn from_argb_ints(data: &[i32], width: usize, height: usize) -> Result<Self> {
        let pixels = data.iter().map(|&c| Rgb::from_argb(c)).collect();
        Self::new(width, height, pixels)
    }

    /// Decode a burst of packed ARGB frames. A missing (null) frame or one
    /// that does not hold exactly `width * height` pixels fails the whole burst.
    pub fn from_argb_frames(frames: &[Option<Vec<i32>>], width: i64, height: i64) -> Result<Vec<Self>> {
        let expected = pixel_count(width, height)?;
        frames
            .iter()
            .map(|frame| match frame {
                Some(data) => Self::from_argb_ints(data, width as usize, height as usize),
                None => Err(ImagingError::BufferSize { expected, actual: 0 }),
            })
            .collect()
    }

    /// Create from raw RGB byte array
    pub fn from_rgb_bytes(data: &[u8], width: usize, height: usize) -> Result<Self> {
        if data.len() % 3 != 0 {
            return Err(ImagingError::BufferSize {
                expected: pixel_count(width as i64, height as i64)? * 3,
                actual: data.len(),
            });
        }
        let pixels = data
            .chunks_exact(3)
            .map(|chunk| Rgb::new(chunk[0], chunk[1], chunk[2]))
            .collect();
        Self::new(width, height, pixels)
    }

    pub fn from_rgb_image(image: &RgbImage) -> Result<Self> {
        Self::from_rgb_bytes(image.as_raw(), image.width() as usize, image.height() as usize)
    }

    pub fn to_argb_ints(&self) -> Vec<i32> {
        self.pixels.iter().map(Rgb::to_argb).collect()
    }

    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            out.extend_from_slice(&[p.r, p.g, p.b]);
        }
        out
    }

    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        let width = u32::try_from(self.width).map_err(|_| ImagingError::InvalidDimensions {
            width: self.width as i64,
            height: self.height as i64,
        })?;
        let height = u32::try_from(self.height).map_err(|_| ImagingError::InvalidDimensions {
            width: self.width as i64,
            height: self.height as i64,
        })?;
        RgbImage::from_raw(width, height, self.to_rgb_bytes()).ok_or(ImagingError::BufferSize {
            expected: self.width * self.height * 3,
            actual: self.pixels.len() * 3,
        })
    }

    #[inline]
    pub fn same_size(&self, other: &Frame) -> bool {
        self.width == other.width && self.height == other.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_unpack_and_pack() {
        let c = Rgb::from_argb(0x80_11_22_33u32 as i32);
        assert_eq!(c, Rgb::new(0x11, 0x22, 0x33));
        assert_eq!(c.to_argb() as u32, 0xFF_11_22_33);
    }

    #[test]
    fn test_from_argb_ints_rejects_wrong_length() {
        let data = vec![0i32; 5];
        match Frame::from_argb_ints(&data, 2, 2) {
            Err(ImagingError::BufferSize { expected, actual }) => {
                assert_eq!(expected, 4);
                assert_eq!(actual, 5);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            Frame::new(0, 3, Vec::new()),
            Err(ImagingError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_argb_frames_decode() {
        let frames = vec![
            Some(vec![0xFF_01_02_03u32 as i32, 0x00_04_05_06]),
            Some(vec![0; 2]),
        ];
        let decoded = Frame::from_argb_frames(&frames, 2, 1).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].pixels, vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]);
    }

    #[test]
    fn test_argb_frames_null_frame_rejected() {
        let frames = vec![Some(vec![0; 4]), None];
        assert!(matches!(
            Frame::from_argb_frames(&frames, 2, 2),
            Err(ImagingError::BufferSize { expected: 4, actual: 0 })
        ));
    }

    #[test]
    fn test_argb_frames_wrong_length_rejected() {
        let frames = vec![Some(vec![0; 4]), Some(vec![0; 3])];
        assert!(matches!(
            Frame::from_argb_frames(&frames, 2, 2),
            Err(ImagingError::BufferSize { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_argb_frames_bad_dimensions_rejected() {
        let frames = vec![Some(vec![0; 4])];
        for (w, h) in [(0, 4), (4, 0), (-2, -2), (-1, 4)] {
            assert!(matches!(
                Frame::from_argb_frames(&frames, w, h),
                Err(ImagingError::InvalidDimensions { .. })
            ));
        }
    }

    #[test]
    fn test_rgb_image_conversion() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgb([9, 8, 7]));
        let frame = Frame::from_rgb_image(&img).unwrap();
        assert_eq!(frame.width, 3);
        assert_eq!(frame.height, 2);
        assert_eq!(frame.pixels[5], Rgb::new(9, 8, 7));
        assert_eq!(frame.to_rgb_image().unwrap(), img);
    }
}
