use itertools::iproduct;
use rand::{Rng as _, SeedableRng as _, rngs::SmallRng};

use crate::encoder::Texel;

/// 1/g and 1/g² for the plastic number g, the R2 sequence increments.
const R2_ALPHA: [f32; 2] = [0.754_877_7, 0.569_840_3];

/// Square grid of low-discrepancy values in [0, 1), four independent channels per texel.
///
/// Each channel is the R2 sequence evaluated at the texel coordinate with its own random offset,
/// so neighbouring pixels get well spread samples.
#[derive(Clone, Debug, PartialEq)]
pub struct NoisePattern {
    size: u32,
    texels: Vec<Texel>,
}

impl NoisePattern {
    pub fn generate(size: u32, seed: u64) -> NoisePattern {
        let size = size.max(1);
        let mut rng = SmallRng::seed_from_u64(seed);
        let offsets: [f32; 4] = std::array::from_fn(|_| rng.random::<f32>());

        let texels = iproduct!(0..size, 0..size)
            .map(|(y, x)| {
                let base = x as f64 * R2_ALPHA[0] as f64 + y as f64 * R2_ALPHA[1] as f64;
                offsets.map(|offset| {
                    let value = (offset as f64 + base).fract() as f32;
                    // Rounding to f32 may land on 1.0
                    if value >= 1.0 { 0.0 } else { value }
                })
            })
            .collect();

        NoisePattern { size, texels }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn get(&self, x: u32, y: u32) -> Texel {
        self.texels[(y * self.size + x) as usize]
    }

    pub fn texels(&self) -> &[Texel] {
        &self.texels
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.texels)
    }
}
