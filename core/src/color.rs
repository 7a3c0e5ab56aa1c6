use std::fmt;

use serde::{Deserialize, Serialize};

// (red, green, blue), each nominally in [0, 1]
pub type Rgb = [f32; 3];

// Raw-height band edges for the realistic scheme
pub const COAST_CEILING: f32 = 8.0;
pub const VEGETATION_CEILING: f32 = 23.0;

pub const WATER: Rgb = [0.0, 0.0, 1.0];
// 139-69-19, saddle brown
pub const COAST: Rgb = [139.0 / 255.0, 69.0 / 255.0, 19.0 / 255.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    // Black lowlands, blue slopes, white peaks
    #[default]
    MonochromeBlue,
    // Water, coast, vegetation, then grey rock fading to snow
    Realistic,
    // Blue through green to red
    SpectrumPhase,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 3] = [
        ColorScheme::MonochromeBlue,
        ColorScheme::Realistic,
        ColorScheme::SpectrumPhase,
    ];

    // The scheme after this one, wrapping around
    pub fn next(self) -> Self {
        match self {
            ColorScheme::MonochromeBlue => ColorScheme::Realistic,
            ColorScheme::Realistic => ColorScheme::SpectrumPhase,
            ColorScheme::SpectrumPhase => ColorScheme::MonochromeBlue,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorScheme::MonochromeBlue => "Monochrome blue",
            ColorScheme::Realistic => "Realistic",
            ColorScheme::SpectrumPhase => "Spectrum phase",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Height as a fraction of the peak. A zero (or otherwise unusable) peak
// means a flat floor, so everything maps to 0.
#[inline]
fn normalized(height: f32, max_height: f32) -> f32 {
    if max_height > 0.0 && max_height.is_finite() && height.is_finite() {
        height / max_height
    } else {
        0.0
    }
}

// Map one height to a color under `scheme`
pub fn color_for(height: f32, max_height: f32, scheme: ColorScheme) -> Rgb {
    let f = normalized(height, max_height);
    match scheme {
        ColorScheme::MonochromeBlue => monochrome_blue(f),
        ColorScheme::Realistic => realistic(height, f),
        ColorScheme::SpectrumPhase => spectrum_phase(f),
    }
}

fn monochrome_blue(f: f32) -> Rgb {
    let blue = f;
    let green = blue * f;
    let red = green * f;
    [red, green, blue]
}

// Bands are picked on the raw height, shading inside them on `f`
fn realistic(height: f32, f: f32) -> Rgb {
    match height {
        h if h == 0.0 => WATER,
        h if h < COAST_CEILING => COAST,
        h if h < VEGETATION_CEILING => {
            let green = f;
            let blue = green * f;
            let red = blue * f;
            [red, green, blue]
        }
        _ => {
            let grey = f * f;
            [grey, grey, grey]
        }
    }
}

fn spectrum_phase(f: f32) -> Rgb {
    let red = (2.0 * f - 1.0).max(0.0);
    let blue = (1.0 - 2.0 * f).max(0.0);
    let green = (1.0 - red - blue).clamp(0.0, 1.0);
    [red, green, blue]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-6)
    }

    #[test]
    fn monochrome_powers_of_f() {
        assert_eq!(color_for(0.5, 1.0, ColorScheme::MonochromeBlue), [0.125, 0.25, 0.5]);
        assert_eq!(color_for(4.0, 4.0, ColorScheme::MonochromeBlue), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn zero_max_height_is_black_not_nan() {
        let c = color_for(0.0, 0.0, ColorScheme::MonochromeBlue);
        assert_eq!(c, [0.0, 0.0, 0.0]);
        for scheme in ColorScheme::ALL {
            assert!(color_for(0.0, 0.0, scheme).iter().all(|v| v.is_finite()));
            assert!(color_for(3.0, 0.0, scheme).iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn spectrum_phase_endpoints() {
        assert!(close(color_for(0.0, 10.0, ColorScheme::SpectrumPhase), [0.0, 0.0, 1.0]));
        assert!(close(color_for(5.0, 10.0, ColorScheme::SpectrumPhase), [0.0, 1.0, 0.0]));
        assert!(close(color_for(10.0, 10.0, ColorScheme::SpectrumPhase), [1.0, 0.0, 0.0]));
        // Quarter way: blue fading into green
        assert!(close(color_for(2.5, 10.0, ColorScheme::SpectrumPhase), [0.0, 0.5, 0.5]));
    }

    #[test]
    fn realistic_bands() {
        let max = 100.0;
        assert_eq!(color_for(0.0, max, ColorScheme::Realistic), WATER);
        assert_eq!(color_for(0.1, max, ColorScheme::Realistic), COAST);
        assert_eq!(color_for(7.99, max, ColorScheme::Realistic), COAST);

        let f = 0.1;
        assert!(close(
            color_for(10.0, max, ColorScheme::Realistic),
            [f * f * f, f, f * f]
        ));

        let f = 0.5;
        assert!(close(
            color_for(50.0, max, ColorScheme::Realistic),
            [f * f, f * f, f * f]
        ));
        // 23 is already rock
        let f = 0.23;
        assert!(close(
            color_for(23.0, max, ColorScheme::Realistic),
            [f * f, f * f, f * f]
        ));
    }

    #[test]
    fn coast_is_brown_in_rgb_order() {
        let [r, g, b] = COAST;
        assert!(r > g && g > b);
    }

    #[test]
    fn channels_stay_normalized() {
        let max = 300.0;
        for scheme in ColorScheme::ALL {
            for i in 0..=300 {
                let h = i as f32;
                for v in color_for(h, max, scheme) {
                    assert!(
                        (-1e-6..=1.0 + 1e-6).contains(&v),
                        "{:?} at {} gave {}",
                        scheme,
                        h,
                        v
                    );
                }
            }
        }
    }

    #[test]
    fn scheme_cycle_wraps() {
        let s = ColorScheme::default();
        assert_eq!(s, ColorScheme::MonochromeBlue);
        assert_eq!(s.next(), ColorScheme::Realistic);
        assert_eq!(s.next().next(), ColorScheme::SpectrumPhase);
        assert_eq!(s.next().next().next(), s);
    }
}
