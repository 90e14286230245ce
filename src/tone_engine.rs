//! Tone Engine - 8-bit tone curves applied through lookup tables

use rayon::prelude::*;

use crate::frame::Frame;

pub trait ToneCurve {
    fn map(&self, value: u8) -> u8;

    fn lut(&self) -> [u8; 256] {
        let mut lut = [0u8; 256];
        for (i, out) in lut.iter_mut().enumerate() {
            *out = self.map(i as u8);
        }
        lut
    }
}

/// Logistic S-curve: `1 / (1 + exp(-contrast * (x - midpoint)))` over x in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmoidCurve {
    pub contrast: f32,
    pub midpoint: f32,
}

impl Default for SigmoidCurve {
    fn default() -> Self {
        Self { contrast: 6.0, midpoint: 0.5 }
    }
}

impl SigmoidCurve {
    pub fn new(contrast: f32, midpoint: f32) -> Self {
        Self { contrast, midpoint }
    }
}

impl ToneCurve for SigmoidCurve {
    fn map(&self, value: u8) -> u8 {
        let x = value as f32 / 255.0;
        let y = 1.0 / (1.0 + (-self.contrast * (x - self.midpoint)).exp());
        // truncation, not rounding
        (y * 255.0).clamp(0.0, 255.0) as u8
    }
}

/// Apply `curve` to every channel of every pixel
pub fn tone_map_in_place<C: ToneCurve + ?Sized>(frame: &mut Frame, curve: &C) {
    let lut = curve.lut();
    let width = frame.width.max(1);
    frame.pixels.par_chunks_mut(width).for_each(|row| {
        for p in row {
            p.r = lut[p.r as usize];
            p.g = lut[p.g as usize];
            p.b = lut[p.b as usize];
        }
    });
}
