use rand::Rng;

use crate::grid::Grid;
use crate::heightfield::HeightField;

pub type Rgb8 = [u8; 3];

/// A 2D grid of RGB triples derived from a height field.
pub type ColorField = Grid<Rgb8>;

/// Elevations below this value in 8-bit band space become flat grass.
pub const GRASS_CUTOFF: i32 = 5;

/// Dark green, green, olive drab.
const GRASS_COLORS: [Rgb8; 3] = [[0, 100, 0], [0, 128, 0], [107, 142, 35]];

/// A channel value with uniform jitter. `span > 0` draws upward from
/// `base`, `span < 0` draws downward, `span == 0` is fixed.
#[derive(Clone, Copy, Debug)]
struct Jitter {
    base: i32,
    span: i32,
}

impl Jitter {
    const fn fixed(base: i32) -> Self {
        Self { base, span: 0 }
    }

    const fn up(base: i32, span: i32) -> Self {
        Self { base, span }
    }

    const fn down(base: i32, span: i32) -> Self {
        Self { base, span: -span }
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> i32 {
        match self.span {
            0 => self.base,
            s if s > 0 => self.base + rng.gen_range(0..s),
            s => self.base - rng.gen_range(0..-s),
        }
    }
}

/// How a band colors its cells and which perturbation it receives.
#[derive(Clone, Copy, Debug)]
enum Paint {
    /// Independent channel jitter, then independent wrap noise per
    /// channel.
    Rgb { r: Jitter, g: Jitter, b: Jitter },
    /// One shared gray with shared wrap noise (snow transition).
    Slate(Jitter),
    /// Gray equal to the band-space height, untouched by noise.
    Snow,
}

/// Half-open elevation band `[lo, hi)` in 8-bit band space.
#[derive(Clone, Copy, Debug)]
struct Band {
    lo: i32,
    hi: i32,
    paint: Paint,
}

/// Ordered low to high: dark grass, light grass, yellow grass, brown
/// dirt, dark dirt, gravel, snow transition, snow cap.
const BANDS: [Band; 8] = [
    Band {
        lo: 0,
        hi: 50,
        paint: Paint::Rgb {
            r: Jitter::fixed(0),
            g: Jitter::up(128, 65),
            b: Jitter::fixed(0),
        },
    },
    Band {
        lo: 50,
        hi: 75,
        paint: Paint::Rgb {
            r: Jitter::up(64, 65),
            g: Jitter::up(128, 33),
            b: Jitter::up(0, 33),
        },
    },
    Band {
        lo: 75,
        hi: 100,
        paint: Paint::Rgb {
            r: Jitter::up(128, 33),
            g: Jitter::up(160, 33),
            b: Jitter::up(32, 33),
        },
    },
    Band {
        lo: 100,
        hi: 125,
        paint: Paint::Rgb {
            r: Jitter::up(160, 21),
            g: Jitter::down(192, 65),
            b: Jitter::down(64, 33),
        },
    },
    Band {
        lo: 125,
        hi: 150,
        paint: Paint::Rgb {
            r: Jitter::down(180, 61),
            g: Jitter::down(120, 21),
            b: Jitter::fixed(20),
        },
    },
    Band {
        lo: 150,
        hi: 175,
        paint: Paint::Rgb {
            r: Jitter::down(180, 41),
            g: Jitter::down(120, 21),
            b: Jitter::up(20, 41),
        },
    },
    Band {
        lo: 175,
        hi: 225,
        paint: Paint::Slate(Jitter::up(128, 98)),
    },
    Band {
        lo: 225,
        hi: i32::MAX,
        paint: Paint::Snow,
    },
];

/// Classify a normalized height field into a `width x height` color
/// texture. Height samples are index-mapped onto the grid (identity
/// when the dimensions match), converted once into 8-bit band space,
/// and run through the band table plus noise stages.
///
/// Pure in everything but the RNG: repeated calls on a continuing
/// source yield fresh, independently jittered fields.
pub fn classify<R: Rng>(
    field: &HeightField,
    width: usize,
    height: usize,
    rng: &mut R,
) -> ColorField {
    let mut colors = ColorField::new_with(width, height, [0u8; 3]);
    for y in 0..height {
        for x in 0..width {
            let val = field.mapped(x, y, width, height);
            let h = band_space(val);
            let rgb = cell_color(h, rng);
            colors.set(x, y, dither(rgb, rng));
        }
    }
    colors
}

/// Convert a normalized sample into the single 0..=255 space used for
/// the grass cutoff, the band bounds, and the snow gray.
fn band_space(value: f32) -> i32 {
    (value.clamp(0.0, 1.0) * 255.0).round() as i32
}

/// Base color for one cell in band space, before dithering.
fn cell_color<R: Rng>(h: i32, rng: &mut R) -> [i32; 3] {
    if h < GRASS_CUTOFF {
        let c = GRASS_COLORS[rng.gen_range(0..GRASS_COLORS.len())];
        return [c[0] as i32, c[1] as i32, c[2] as i32];
    }
    shade_for_band(h, rng)
}

fn band_for(h: i32) -> &'static Band {
    BANDS
        .iter()
        .find(|band| band.lo <= h && h < band.hi)
        .unwrap_or(&BANDS[BANDS.len() - 1])
}

/// Jittered band color plus the per-band wrap perturbation.
fn shade_for_band<R: Rng>(h: i32, rng: &mut R) -> [i32; 3] {
    match band_for(h).paint {
        Paint::Rgb { r, g, b } => {
            let base = [r.draw(rng), g.draw(rng), b.draw(rng)];
            [
                wrap_channel(base[0] + flip_rand(rng, 20)),
                wrap_channel(base[1] + flip_rand(rng, 20)),
                wrap_channel(base[2] + flip_rand(rng, 20)),
            ]
        }
        Paint::Slate(jitter) => {
            let gray = wrap_channel(jitter.draw(rng) + flip_rand(rng, 20));
            [gray, gray, gray]
        }
        Paint::Snow => [h, h, h],
    }
}

/// Uniform magnitude in `[0, range)` with a coin-flipped sign.
fn flip_rand<R: Rng>(rng: &mut R, range: i32) -> i32 {
    if rng.gen_range(0..2) == 0 {
        rng.gen_range(0..range)
    } else {
        -rng.gen_range(0..range)
    }
}

/// Wrap a perturbed channel back into byte range: truncated remainder
/// then absolute value, not a clamp. `wrap_channel(-19) == 19`,
/// `wrap_channel(260) == 5`.
pub fn wrap_channel(value: i32) -> i32 {
    (value % 255).abs()
}

/// Add one shared `uniform(0,1)/20` nudge to all three channels in
/// normalized space to break up visible banding, then round back to
/// bytes.
fn dither<R: Rng>(rgb: [i32; 3], rng: &mut R) -> Rgb8 {
    let noise = rng.gen::<f32>() / 20.0;
    let mut out = [0u8; 3];
    for (byte, channel) in out.iter_mut().zip(rgb) {
        let v = (channel as f32 / 255.0 + noise).clamp(0.0, 1.0);
        *byte = (v * 255.0).round() as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightfield::{self, HeightFieldParams};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_band_bounds_are_half_open() {
        assert_eq!(band_for(0).lo, 0);
        assert_eq!(band_for(49).lo, 0);
        assert_eq!(band_for(50).lo, 50);
        assert_eq!(band_for(74).lo, 50);
        assert_eq!(band_for(75).lo, 75);
        assert_eq!(band_for(174).lo, 150);
        assert_eq!(band_for(175).lo, 175);
        assert_eq!(band_for(224).lo, 175);
        assert_eq!(band_for(225).lo, 225);
        assert_eq!(band_for(255).lo, 225);
    }

    #[test]
    fn test_low_elevation_picks_fixed_grass_palette() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for h in 0..GRASS_CUTOFF {
            for _ in 0..20 {
                let rgb = cell_color(h, &mut rng);
                let rgb8 = [rgb[0] as u8, rgb[1] as u8, rgb[2] as u8];
                assert!(GRASS_COLORS.contains(&rgb8), "unexpected grass {rgb8:?}");
            }
        }
    }

    #[test]
    fn test_snow_cap_is_unperturbed_height_gray() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for h in [225, 240, 255] {
            assert_eq!(shade_for_band(h, &mut rng), [h, h, h]);
        }
    }

    #[test]
    fn test_snow_transition_stays_gray() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for h in [175, 200, 224] {
            let [r, g, b] = shade_for_band(h, &mut rng);
            assert_eq!(r, g);
            assert_eq!(g, b);
            assert!((0..=255).contains(&r));
        }
    }

    #[test]
    fn test_wrap_channel_law() {
        for value in -1000..1000 {
            let wrapped = wrap_channel(value);
            assert!((0..=255).contains(&wrapped), "{value} -> {wrapped}");
        }
        assert_eq!(wrap_channel(-19), 19);
        assert_eq!(wrap_channel(260), 5);
        assert_eq!(wrap_channel(255), 0);
    }

    #[test]
    fn test_perturbed_channels_stay_in_byte_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for h in GRASS_CUTOFF..=255 {
            let rgb = cell_color(h, &mut rng);
            for channel in rgb {
                assert!((0..=255).contains(&channel), "h={h} channel={channel}");
            }
        }
    }

    #[test]
    fn test_classify_deterministic_per_seed() {
        let params = HeightFieldParams {
            edge_size: 3,
            roughness: 0.5,
        };
        let field = heightfield::generate(&params, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();

        let a = classify(&field, 16, 16, &mut ChaCha8Rng::seed_from_u64(5));
        let b = classify(&field, 16, 16, &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_classify_twice_on_continuing_rng_differs() {
        let params = HeightFieldParams {
            edge_size: 3,
            roughness: 0.5,
        };
        let field = heightfield::generate(&params, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let first = classify(&field, 16, 16, &mut rng);
        let second = classify(&field, 16, 16, &mut rng);

        assert_eq!(first.width(), 16);
        assert_eq!(second.height(), 16);
        // Same field, continuing draws: independently jittered output.
        assert!(first != second);
    }

    #[test]
    fn test_classify_matches_grid_dimensions_identity() {
        // A flat snow-cap field classifies every cell through the
        // no-noise branch, so only the dither separates cells.
        let field = HeightField::from_fn(2, |_, _| 1.0).unwrap();
        let size = field.size();
        let colors = classify(&field, size, size, &mut ChaCha8Rng::seed_from_u64(7));
        for (_, _, rgb) in colors.iter() {
            assert_eq!(rgb[0], rgb[1]);
            assert_eq!(rgb[1], rgb[2]);
            // 255 base, dither can only push upward into the clamp.
            assert_eq!(rgb[0], 255);
        }
    }
}
