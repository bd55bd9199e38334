//! Color space conversions, using the conversion matrices and transfer
//! functions published with CSS Color Level 4.
//!
//! Conversions go through an XYZ D65 hub: every supported space knows how to
//! reach it, and from there the sRGB pair and the XYZ variants can be
//! produced. Lab and LCH live relative to the D50 white point and are
//! chromatically adapted with the Bradford matrices.

use super::{Color, ColorSpace};

type Matrix = [[f64; 3]; 3];

const SRGB_TO_XYZ_D65: Matrix = [
    [0.41239079926595934, 0.357584339383878, 0.1804807884018343],
    [0.21263900587151027, 0.715168678767756, 0.07219231536073371],
    [0.01933081871559182, 0.11919477979462598, 0.9505321522496607],
];

const XYZ_D65_TO_SRGB: Matrix = [
    [3.2409699419045226, -1.537383177570094, -0.4986107602930034],
    [-0.9692436362808796, 1.8759675015077202, 0.04155505740717559],
    [0.05563007969699366, -0.20397695888897652, 1.0569715142428786],
];

const DISPLAY_P3_TO_XYZ_D65: Matrix = [
    [0.4865709486482162, 0.26566769316909306, 0.19821728523436247],
    [0.2289745640697488, 0.6917385218365064, 0.079286914093745],
    [0.0, 0.04511338185890264, 1.043944368900976],
];

const A98_RGB_TO_XYZ_D65: Matrix = [
    [0.5766690429101305, 0.1855582379065463, 0.1882286462349947],
    [0.29734497525053605, 0.6273635662554661, 0.07529145849399788],
    [0.02703136138641234, 0.07068885253582723, 0.9913375368376388],
];

const PROPHOTO_RGB_TO_XYZ_D50: Matrix = [
    [0.7977604896723027, 0.13518583717574031, 0.0313493495815248],
    [0.2880711282292934, 0.7118432178101014, 0.00008565396060525902],
    [0.0, 0.0, 0.8251046025104601],
];

const REC2020_TO_XYZ_D65: Matrix = [
    [0.6369580483012914, 0.14461690358620832, 0.16888097516417205],
    [0.2627002120112671, 0.6779980715188708, 0.05930171646986196],
    [0.0, 0.028072693049087428, 1.060985057710791],
];

/// Bradford chromatic adaptation between the D65 and D50 white points
const XYZ_D65_TO_D50: Matrix = [
    [1.0479298208405488, 0.022946793341019088, -0.05019222954313557],
    [0.029627815688159344, 0.990434484573249, -0.01707382502938514],
    [-0.009243058152591178, 0.015055144896577895, 0.7518742899580008],
];

const XYZ_D50_TO_D65: Matrix = [
    [0.9554734527042182, -0.023098536874261423, 0.0632593086610217],
    [-0.028369706963208136, 1.0099954580058226, 0.021041398966943008],
    [0.012314001688319899, -0.020507696433477912, 1.3303659366080753],
];

const OKLAB_TO_LMS: Matrix = [
    [1.0, 0.3963377773761749, 0.2158037573099136],
    [1.0, -0.1055613458156586, -0.0638541728258133],
    [1.0, -0.0894841775298119, -1.2914855480194092],
];

const LMS_TO_XYZ_D65: Matrix = [
    [1.2268798758459243, -0.5578149944602171, 0.2813910456659647],
    [-0.0405757452148008, 1.112286803280317, -0.0717110580655164],
    [-0.0763729366746601, -0.4214933324022432, 1.5869240198367816],
];

const KAPPA: f64 = 24389.0 / 27.0;
const EPSILON: f64 = 216.0 / 24389.0;
const D50_WHITE: [f64; 3] = [
    0.3457 / 0.3585,
    1.0,
    (1.0 - 0.3457 - 0.3585) / 0.3585,
];

impl Color {
    /// Converts the color to another supported space through an XYZ D65 hub.
    ///
    /// Every parsed space can be converted *from*; the supported targets are
    /// `srgb`, `srgb-linear`, `xyz`, `xyz-d50` and `xyz-d65` (plus the
    /// identity). Other targets return `None`. hsl and hwb colors already
    /// carry sRGB parameters, so converting them to `srgb` just relabels.
    pub fn to(&self, target: ColorSpace) -> Option<Color> {
        if target == self.space {
            return Some(self.clone());
        }

        if matches!(self.space, ColorSpace::Hsl | ColorSpace::Hwb) && target == ColorSpace::Srgb {
            return Some(self.with_params(target, self.params));
        }

        let xyz = self.to_xyz_d65();
        let params = match target {
            ColorSpace::Srgb => encode_srgb(multiply(&XYZ_D65_TO_SRGB, xyz)),
            ColorSpace::SrgbLinear => multiply(&XYZ_D65_TO_SRGB, xyz),
            ColorSpace::Xyz | ColorSpace::XyzD65 => xyz,
            ColorSpace::XyzD50 => multiply(&XYZ_D65_TO_D50, xyz),
            _ => return None,
        };

        Some(self.with_params(target, params))
    }

    fn with_params(&self, space: ColorSpace, params: [f64; 3]) -> Color {
        Color {
            space,
            params,
            alpha: self.alpha,
            function_name: self.function_name.clone(),
            args: params.iter().copied().map(Some).collect(),
        }
    }

    fn to_xyz_d65(&self) -> [f64; 3] {
        let params = self.params;
        match self.space {
            ColorSpace::Srgb | ColorSpace::Hsl | ColorSpace::Hwb => {
                multiply(&SRGB_TO_XYZ_D65, linearize_srgb(params))
            }
            ColorSpace::SrgbLinear => multiply(&SRGB_TO_XYZ_D65, params),
            ColorSpace::DisplayP3 => multiply(&DISPLAY_P3_TO_XYZ_D65, linearize_srgb(params)),
            ColorSpace::A98Rgb => multiply(&A98_RGB_TO_XYZ_D65, linearize_a98(params)),
            ColorSpace::ProphotoRgb => multiply(
                &XYZ_D50_TO_D65,
                multiply(&PROPHOTO_RGB_TO_XYZ_D50, linearize_prophoto(params)),
            ),
            ColorSpace::Rec2020 => multiply(&REC2020_TO_XYZ_D65, linearize_rec2020(params)),
            ColorSpace::Lab => multiply(&XYZ_D50_TO_D65, lab_to_xyz_d50(params)),
            ColorSpace::Lch => multiply(&XYZ_D50_TO_D65, lab_to_xyz_d50(lch_to_lab(params))),
            ColorSpace::Oklab => oklab_to_xyz_d65(params),
            ColorSpace::Oklch => oklab_to_xyz_d65(lch_to_lab(params)),
            ColorSpace::Xyz | ColorSpace::XyzD65 => params,
            ColorSpace::XyzD50 => multiply(&XYZ_D50_TO_D65, params),
        }
    }
}

/// The HLS to RGB conversion hsl() and hwb() build on. The hue is a fraction
/// of a full turn; lightness and saturation are fractions too.
pub(crate) fn hls_to_rgb(hue: f64, lightness: f64, saturation: f64) -> [f64; 3] {
    if saturation == 0.0 {
        return [lightness, lightness, lightness];
    }

    let m2 = if lightness <= 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let m1 = 2.0 * lightness - m2;

    [
        hue_component(m1, m2, hue + 1.0 / 3.0),
        hue_component(m1, m2, hue),
        hue_component(m1, m2, hue - 1.0 / 3.0),
    ]
}

fn hue_component(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

fn multiply(matrix: &Matrix, vector: [f64; 3]) -> [f64; 3] {
    matrix.map(|row| row[0] * vector[0] + row[1] * vector[1] + row[2] * vector[2])
}

/// The sRGB transfer function, extended to negative values; display-p3 uses
/// the same curve
fn linearize_srgb(rgb: [f64; 3]) -> [f64; 3] {
    rgb.map(|v| {
        let abs = v.abs();
        if abs <= 0.04045 {
            v / 12.92
        } else {
            v.signum() * ((abs + 0.055) / 1.055).powf(2.4)
        }
    })
}

fn encode_srgb(rgb: [f64; 3]) -> [f64; 3] {
    rgb.map(|v| {
        let abs = v.abs();
        if abs <= 0.0031308 {
            v * 12.92
        } else {
            v.signum() * (1.055 * abs.powf(1.0 / 2.4) - 0.055)
        }
    })
}

fn linearize_a98(rgb: [f64; 3]) -> [f64; 3] {
    rgb.map(|v| v.signum() * v.abs().powf(563.0 / 256.0))
}

fn linearize_prophoto(rgb: [f64; 3]) -> [f64; 3] {
    const ET2: f64 = 16.0 / 512.0;
    rgb.map(|v| {
        if v.abs() <= ET2 {
            v / 16.0
        } else {
            v.signum() * v.abs().powf(1.8)
        }
    })
}

fn linearize_rec2020(rgb: [f64; 3]) -> [f64; 3] {
    const ALPHA: f64 = 1.09929682680944;
    const BETA: f64 = 0.018053968510807;
    rgb.map(|v| {
        if v.abs() < BETA * 4.5 {
            v / 4.5
        } else {
            v.signum() * ((v.abs() + ALPHA - 1.0) / ALPHA).powf(1.0 / 0.45)
        }
    })
}

fn lab_to_xyz_d50(lab: [f64; 3]) -> [f64; 3] {
    let [lightness, a, b] = lab;

    let f1 = (lightness + 16.0) / 116.0;
    let f0 = f1 + a / 500.0;
    let f2 = f1 - b / 200.0;

    let x = if f0.powi(3) > EPSILON {
        f0.powi(3)
    } else {
        (116.0 * f0 - 16.0) / KAPPA
    };
    let y = if lightness > KAPPA * EPSILON {
        f1.powi(3)
    } else {
        lightness / KAPPA
    };
    let z = if f2.powi(3) > EPSILON {
        f2.powi(3)
    } else {
        (116.0 * f2 - 16.0) / KAPPA
    };

    [x * D50_WHITE[0], y * D50_WHITE[1], z * D50_WHITE[2]]
}

/// Polar to rectangular, shared by lch and oklch; the hue is in degrees
fn lch_to_lab(lch: [f64; 3]) -> [f64; 3] {
    let [lightness, chroma, hue] = lch;
    let hue = hue.to_radians();
    [lightness, chroma * hue.cos(), chroma * hue.sin()]
}

fn oklab_to_xyz_d65(lab: [f64; 3]) -> [f64; 3] {
    let lms = multiply(&OKLAB_TO_LMS, lab).map(|v| v.powi(3));
    multiply(&LMS_TO_XYZ_D65, lms)
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_close(actual: [f64; 3], expected: [f64; 3], tolerance: f64) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!(
                (a - e).abs() < tolerance,
                "expected {expected:?}, got {actual:?}"
            );
        }
    }

    fn color(space: ColorSpace, params: [f64; 3]) -> Color {
        Color {
            space,
            params,
            alpha: 1.0,
            function_name: None,
            args: params.iter().copied().map(Some).collect(),
        }
    }

    #[test]
    fn hls_conversion() {
        assert_close(hls_to_rgb(0.0, 0.5, 1.0), [1.0, 0.0, 0.0], 1e-9);
        assert_close(hls_to_rgb(1.0 / 3.0, 0.5, 0.5), [0.25, 0.75, 0.25], 1e-9);
        assert_close(hls_to_rgb(0.5, 0.5, 1.0), [0.0, 1.0, 1.0], 1e-9);
        assert_close(hls_to_rgb(0.25, 0.25, 0.0), [0.25, 0.25, 0.25], 1e-9);
        // hues wrap around
        assert_close(hls_to_rgb(1.5, 0.5, 1.0), hls_to_rgb(0.5, 0.5, 1.0), 1e-9);
    }

    #[test]
    fn srgb_xyz_roundtrip() {
        let red = color(ColorSpace::Srgb, [1.0, 0.0, 0.0]);
        let xyz = red.to(ColorSpace::XyzD65).map(|c| c.params);
        assert_close(
            xyz.unwrap_or_default(),
            [0.41239079926595934, 0.21263900587151027, 0.01933081871559182],
            1e-12,
        );

        let back = red
            .to(ColorSpace::XyzD65)
            .and_then(|c| c.to(ColorSpace::Srgb))
            .map(|c| c.params);
        assert_close(back.unwrap_or_default(), [1.0, 0.0, 0.0], 1e-9);
    }

    #[test]
    fn white_survives_every_space() {
        for space in [
            ColorSpace::Srgb,
            ColorSpace::SrgbLinear,
            ColorSpace::DisplayP3,
            ColorSpace::A98Rgb,
            ColorSpace::ProphotoRgb,
            ColorSpace::Rec2020,
        ] {
            let white = color(space, [1.0, 1.0, 1.0]);
            let srgb = white.to(ColorSpace::Srgb).map(|c| c.params);
            assert_close(srgb.unwrap_or_default(), [1.0, 1.0, 1.0], 1e-4);
        }

        let lab_white = color(ColorSpace::Lab, [100.0, 0.0, 0.0]);
        let srgb = lab_white.to(ColorSpace::Srgb).map(|c| c.params);
        assert_close(srgb.unwrap_or_default(), [1.0, 1.0, 1.0], 1e-4);

        let oklab_white = color(ColorSpace::Oklab, [1.0, 0.0, 0.0]);
        let srgb = oklab_white.to(ColorSpace::Srgb).map(|c| c.params);
        assert_close(srgb.unwrap_or_default(), [1.0, 1.0, 1.0], 1e-3);
    }

    #[test]
    fn hsl_params_are_already_srgb() {
        let green = color(ColorSpace::Hsl, [0.25, 0.75, 0.25]);
        let srgb = green.to(ColorSpace::Srgb).map(|c| c.params);
        assert_close(srgb.unwrap_or_default(), [0.25, 0.75, 0.25], 1e-12);
    }

    #[test]
    fn lch_matches_lab() {
        // lch with hue 0 is lab with b = 0
        let lch = color(ColorSpace::Lch, [50.0, 30.0, 0.0]);
        let lab = color(ColorSpace::Lab, [50.0, 30.0, 0.0]);
        let a = lch.to(ColorSpace::XyzD50).map(|c| c.params);
        let b = lab.to(ColorSpace::XyzD50).map(|c| c.params);
        assert_close(a.unwrap_or_default(), b.unwrap_or_default(), 1e-12);
    }

    #[test]
    fn unsupported_targets_are_refused() {
        let c = color(ColorSpace::Srgb, [0.5, 0.5, 0.5]);
        assert!(c.to(ColorSpace::Lab).is_none());
        assert!(c.to(ColorSpace::Hsl).is_none());
    }
}
