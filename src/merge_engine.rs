//! Merge Engine - multi-exposure fusion
//!
//! Frames are averaged per channel. The first frame fixes the output size;
//! frames of any other size are skipped but still count toward the divisor.

use rayon::prelude::*;

use crate::error::{ImagingError, Result};
use crate::frame::{Frame, Rgb};

/// Merge result with bookkeeping for the caller
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub frame: Frame,
    pub merged: usize,
    pub skipped: usize,
}

/// Average a burst of frames into one
pub fn merge_exposures(frames: &[Frame]) -> Result<MergeOutcome> {
    let base = frames.first().ok_or(ImagingError::NoFrames)?;
    if base.width == 0 || base.pixels.len() != base.width * base.height {
        return Err(ImagingError::InvalidDimensions {
            width: base.width as i64,
            height: base.height as i64,
        });
    }

    let accepted: Vec<&Frame> = frames
        .iter()
        .enumerate()
        .filter_map(|(i, f)| {
            if f.same_size(base) && f.pixels.len() == base.pixels.len() {
                Some(f)
            } else {
                log::warn!(
                    "Skipping frame {}: {}x{} does not match {}x{}",
                    i, f.width, f.height, base.width, base.height
                );
                None
            }
        })
        .collect();

    let divisor = frames.len() as u32;
    let width = base.width;
    let mut pixels = vec![Rgb::default(); base.pixels.len()];

    pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, out_row)| {
            let offset = row * width;
            for (x, out) in out_row.iter_mut().enumerate() {
                let idx = offset + x;
                let (mut r, mut g, mut b) = (0u32, 0u32, 0u32);
                for frame in &accepted {
                    let p = frame.pixels[idx];
                    r += p.r as u32;
                    g += p.g as u32;
                    b += p.b as u32;
                }
                *out = Rgb::new(
                    (r / divisor).min(255) as u8,
                    (g / divisor).min(255) as u8,
                    (b / divisor).min(255) as u8,
                );
            }
        });

    let merged = accepted.len();
    let skipped = frames.len() - merged;
    log::debug!(
        "Merged {} frame(s) at {}x{}, skipped {}",
        merged, base.width, base.height, skipped
    );

    Ok(MergeOutcome {
        frame: Frame { width: base.width, height: base.height, pixels },
        merged,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, v: u8) -> Frame {
        Frame::filled(width, height, Rgb::new(v, v, v)).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(merge_exposures(&[]), Err(ImagingError::NoFrames)));
    }

    #[test]
    fn test_single_frame_is_identity() {
        let frame = Frame::from_rgb_bytes(&[1, 2, 3, 250, 251, 252], 2, 1).unwrap();
        let outcome = merge_exposures(&[frame.clone()]).unwrap();
        assert_eq!(outcome.frame, frame);
        assert_eq!(outcome.merged, 1);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_mean_of_three() {
        let frames = vec![solid(4, 3, 10), solid(4, 3, 20), solid(4, 3, 30)];
        let outcome = merge_exposures(&frames).unwrap();
        assert!(outcome.frame.pixels.iter().all(|p| *p == Rgb::new(20, 20, 20)));
    }

    #[test]
    fn test_mean_truncates() {
        let frames = vec![solid(1, 1, 1), solid(1, 1, 2)];
        let outcome = merge_exposures(&frames).unwrap();
        assert_eq!(outcome.frame.pixels[0], Rgb::new(1, 1, 1));
    }

    #[test]
    fn test_channels_are_independent() {
        let a = Frame::filled(2, 2, Rgb::new(255, 0, 100)).unwrap();
        let b = Frame::filled(2, 2, Rgb::new(255, 255, 0)).unwrap();
        let outcome = merge_exposures(&[a, b]).unwrap();
        assert_eq!(outcome.frame.pixels[3], Rgb::new(255, 127, 50));
    }

    #[test]
    fn test_mismatched_frame_skipped_but_counted() {
        let frames = vec![solid(2, 2, 90), solid(3, 3, 200), solid(2, 2, 90)];
        let outcome = merge_exposures(&frames).unwrap();
        assert_eq!((outcome.merged, outcome.skipped), (2, 1));
        assert_eq!(outcome.frame.width, 2);
        assert_eq!(outcome.frame.pixels[0], Rgb::new(60, 60, 60));
    }
}
