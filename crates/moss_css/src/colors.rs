//! CSS Color Level 4 value parsing.
//!
//! `parse_color` classifies a component value as a color: the named color
//! keywords, hex notation, and the color functions (`rgb()`, `hsl()`,
//! `hwb()`, `lab()`, `lch()`, `oklab()`, `oklch()` and `color()`), in both
//! the legacy comma syntax and the space syntax with an optional slash
//! separated alpha.

use std::fmt;

use itertools::Itertools;
use lazy_static::lazy_static;
use serde::Serialize;

use crate::ast::{Node, NodeKind};
use crate::parser::{parse_one_component_value, Input};

pub mod convert;

/// A named CSS color and its hex spelling
pub struct NamedColor {
    pub name: &'static str,
    pub value: &'static str,
}

/// A color space a parsed color carries its parameters in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorSpace {
    Srgb,
    SrgbLinear,
    DisplayP3,
    A98Rgb,
    ProphotoRgb,
    Rec2020,
    Hsl,
    Hwb,
    Lab,
    Lch,
    Oklab,
    Oklch,
    Xyz,
    XyzD50,
    XyzD65,
}

impl ColorSpace {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorSpace::Srgb => "srgb",
            ColorSpace::SrgbLinear => "srgb-linear",
            ColorSpace::DisplayP3 => "display-p3",
            ColorSpace::A98Rgb => "a98-rgb",
            ColorSpace::ProphotoRgb => "prophoto-rgb",
            ColorSpace::Rec2020 => "rec2020",
            ColorSpace::Hsl => "hsl",
            ColorSpace::Hwb => "hwb",
            ColorSpace::Lab => "lab",
            ColorSpace::Lch => "lch",
            ColorSpace::Oklab => "oklab",
            ColorSpace::Oklch => "oklch",
            ColorSpace::Xyz => "xyz",
            ColorSpace::XyzD50 => "xyz-d50",
            ColorSpace::XyzD65 => "xyz-d65",
        }
    }

    /// The space idents `color()` accepts as its first argument
    fn for_color_function(ident: &str) -> Option<ColorSpace> {
        match ident {
            "srgb" => Some(ColorSpace::Srgb),
            "srgb-linear" => Some(ColorSpace::SrgbLinear),
            "display-p3" => Some(ColorSpace::DisplayP3),
            "a98-rgb" => Some(ColorSpace::A98Rgb),
            "prophoto-rgb" => Some(ColorSpace::ProphotoRgb),
            "rec2020" => Some(ColorSpace::Rec2020),
            "xyz" => Some(ColorSpace::Xyz),
            "xyz-d50" => Some(ColorSpace::XyzD50),
            "xyz-d65" => Some(ColorSpace::XyzD65),
            _ => None,
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A specified color.
///
/// `rgb()`, `hsl()` and `hwb()` convert to sRGB triplets in `params` while
/// the space keeps the name of the notation they were written in; the
/// lab-family functions and `color()` store their native coordinates.
/// `args` keeps the original channel values for interpolation: `None` for
/// the `none` keyword, hue channels in degrees. The alpha channel is
/// clamped to [0, 1]; the other channels are not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Color {
    pub space: ColorSpace,
    pub params: [f64; 3],
    pub alpha: f64,
    pub function_name: Option<String>,
    pub args: Vec<Option<f64>>,
}

/// A successfully parsed color value: either the `currentColor` keyword or
/// an actual color
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParsedColor {
    CurrentColor,
    Color(Color),
}

lazy_static! {
    /// The CSS2 basic and CSS3 extended named colors, `rebeccapurple`
    /// included. The values resolve through the same hex parser as hash
    /// tokens.
    pub static ref CSS_COLOR_NAMES: &'static [NamedColor] = &[
        NamedColor { name: "aliceblue", value: "#f0f8ff" },
        NamedColor { name: "antiquewhite", value: "#faebd7" },
        NamedColor { name: "aqua", value: "#00ffff" },
        NamedColor { name: "aquamarine", value: "#7fffd4" },
        NamedColor { name: "azure", value: "#f0ffff" },
        NamedColor { name: "beige", value: "#f5f5dc" },
        NamedColor { name: "bisque", value: "#ffe4c4" },
        NamedColor { name: "black", value: "#000000" },
        NamedColor { name: "blanchedalmond", value: "#ffebcd" },
        NamedColor { name: "blue", value: "#0000ff" },
        NamedColor { name: "blueviolet", value: "#8a2be2" },
        NamedColor { name: "brown", value: "#a52a2a" },
        NamedColor { name: "burlywood", value: "#deb887" },
        NamedColor { name: "cadetblue", value: "#5f9ea0" },
        NamedColor { name: "chartreuse", value: "#7fff00" },
        NamedColor { name: "chocolate", value: "#d2691e" },
        NamedColor { name: "coral", value: "#ff7f50" },
        NamedColor { name: "cornflowerblue", value: "#6495ed" },
        NamedColor { name: "cornsilk", value: "#fff8dc" },
        NamedColor { name: "crimson", value: "#dc143c" },
        NamedColor { name: "cyan", value: "#00ffff" },
        NamedColor { name: "darkblue", value: "#00008b" },
        NamedColor { name: "darkcyan", value: "#008b8b" },
        NamedColor { name: "darkgoldenrod", value: "#b8860b" },
        NamedColor { name: "darkgray", value: "#a9a9a9" },
        NamedColor { name: "darkgreen", value: "#006400" },
        NamedColor { name: "darkgrey", value: "#a9a9a9" },
        NamedColor { name: "darkkhaki", value: "#bdb76b" },
        NamedColor { name: "darkmagenta", value: "#8b008b" },
        NamedColor { name: "darkolivegreen", value: "#556b2f" },
        NamedColor { name: "darkorange", value: "#ff8c00" },
        NamedColor { name: "darkorchid", value: "#9932cc" },
        NamedColor { name: "darkred", value: "#8b0000" },
        NamedColor { name: "darksalmon", value: "#e9967a" },
        NamedColor { name: "darkseagreen", value: "#8fbc8f" },
        NamedColor { name: "darkslateblue", value: "#483d8b" },
        NamedColor { name: "darkslategray", value: "#2f4f4f" },
        NamedColor { name: "darkslategrey", value: "#2f4f4f" },
        NamedColor { name: "darkturquoise", value: "#00ced1" },
        NamedColor { name: "darkviolet", value: "#9400d3" },
        NamedColor { name: "deeppink", value: "#ff1493" },
        NamedColor { name: "deepskyblue", value: "#00bfff" },
        NamedColor { name: "dimgray", value: "#696969" },
        NamedColor { name: "dimgrey", value: "#696969" },
        NamedColor { name: "dodgerblue", value: "#1e90ff" },
        NamedColor { name: "firebrick", value: "#b22222" },
        NamedColor { name: "floralwhite", value: "#fffaf0" },
        NamedColor { name: "forestgreen", value: "#228b22" },
        NamedColor { name: "fuchsia", value: "#ff00ff" },
        NamedColor { name: "gainsboro", value: "#dcdcdc" },
        NamedColor { name: "ghostwhite", value: "#f8f8ff" },
        NamedColor { name: "gold", value: "#ffd700" },
        NamedColor { name: "goldenrod", value: "#daa520" },
        NamedColor { name: "gray", value: "#808080" },
        NamedColor { name: "green", value: "#008000" },
        NamedColor { name: "greenyellow", value: "#adff2f" },
        NamedColor { name: "grey", value: "#808080" },
        NamedColor { name: "honeydew", value: "#f0fff0" },
        NamedColor { name: "hotpink", value: "#ff69b4" },
        NamedColor { name: "indianred", value: "#cd5c5c" },
        NamedColor { name: "indigo", value: "#4b0082" },
        NamedColor { name: "ivory", value: "#fffff0" },
        NamedColor { name: "khaki", value: "#f0e68c" },
        NamedColor { name: "lavender", value: "#e6e6fa" },
        NamedColor { name: "lavenderblush", value: "#fff0f5" },
        NamedColor { name: "lawngreen", value: "#7cfc00" },
        NamedColor { name: "lemonchiffon", value: "#fffacd" },
        NamedColor { name: "lightblue", value: "#add8e6" },
        NamedColor { name: "lightcoral", value: "#f08080" },
        NamedColor { name: "lightcyan", value: "#e0ffff" },
        NamedColor { name: "lightgoldenrodyellow", value: "#fafad2" },
        NamedColor { name: "lightgray", value: "#d3d3d3" },
        NamedColor { name: "lightgreen", value: "#90ee90" },
        NamedColor { name: "lightgrey", value: "#d3d3d3" },
        NamedColor { name: "lightpink", value: "#ffb6c1" },
        NamedColor { name: "lightsalmon", value: "#ffa07a" },
        NamedColor { name: "lightseagreen", value: "#20b2aa" },
        NamedColor { name: "lightskyblue", value: "#87cefa" },
        NamedColor { name: "lightslategray", value: "#778899" },
        NamedColor { name: "lightslategrey", value: "#778899" },
        NamedColor { name: "lightsteelblue", value: "#b0c4de" },
        NamedColor { name: "lightyellow", value: "#ffffe0" },
        NamedColor { name: "lime", value: "#00ff00" },
        NamedColor { name: "limegreen", value: "#32cd32" },
        NamedColor { name: "linen", value: "#faf0e6" },
        NamedColor { name: "magenta", value: "#ff00ff" },
        NamedColor { name: "maroon", value: "#800000" },
        NamedColor { name: "mediumaquamarine", value: "#66cdaa" },
        NamedColor { name: "mediumblue", value: "#0000cd" },
        NamedColor { name: "mediumorchid", value: "#ba55d3" },
        NamedColor { name: "mediumpurple", value: "#9370db" },
        NamedColor { name: "mediumseagreen", value: "#3cb371" },
        NamedColor { name: "mediumslateblue", value: "#7b68ee" },
        NamedColor { name: "mediumspringgreen", value: "#00fa9a" },
        NamedColor { name: "mediumturquoise", value: "#48d1cc" },
        NamedColor { name: "mediumvioletred", value: "#c71585" },
        NamedColor { name: "midnightblue", value: "#191970" },
        NamedColor { name: "mintcream", value: "#f5fffa" },
        NamedColor { name: "mistyrose", value: "#ffe4e1" },
        NamedColor { name: "moccasin", value: "#ffe4b5" },
        NamedColor { name: "navajowhite", value: "#ffdead" },
        NamedColor { name: "navy", value: "#000080" },
        NamedColor { name: "oldlace", value: "#fdf5e6" },
        NamedColor { name: "olive", value: "#808000" },
        NamedColor { name: "olivedrab", value: "#6b8e23" },
        NamedColor { name: "orange", value: "#ffa500" },
        NamedColor { name: "orangered", value: "#ff4500" },
        NamedColor { name: "orchid", value: "#da70d6" },
        NamedColor { name: "palegoldenrod", value: "#eee8aa" },
        NamedColor { name: "palegreen", value: "#98fb98" },
        NamedColor { name: "paleturquoise", value: "#afeeee" },
        NamedColor { name: "palevioletred", value: "#db7093" },
        NamedColor { name: "papayawhip", value: "#ffefd5" },
        NamedColor { name: "peachpuff", value: "#ffdab9" },
        NamedColor { name: "peru", value: "#cd853f" },
        NamedColor { name: "pink", value: "#ffc0cb" },
        NamedColor { name: "plum", value: "#dda0dd" },
        NamedColor { name: "powderblue", value: "#b0e0e6" },
        NamedColor { name: "purple", value: "#800080" },
        NamedColor { name: "red", value: "#ff0000" },
        NamedColor { name: "rosybrown", value: "#bc8f8f" },
        NamedColor { name: "royalblue", value: "#4169e1" },
        NamedColor { name: "saddlebrown", value: "#8b4513" },
        NamedColor { name: "salmon", value: "#fa8072" },
        NamedColor { name: "sandybrown", value: "#f4a460" },
        NamedColor { name: "seagreen", value: "#2e8b57" },
        NamedColor { name: "seashell", value: "#fff5ee" },
        NamedColor { name: "sienna", value: "#a0522d" },
        NamedColor { name: "silver", value: "#c0c0c0" },
        NamedColor { name: "skyblue", value: "#87ceeb" },
        NamedColor { name: "slateblue", value: "#6a5acd" },
        NamedColor { name: "slategray", value: "#708090" },
        NamedColor { name: "slategrey", value: "#708090" },
        NamedColor { name: "snow", value: "#fffafa" },
        NamedColor { name: "springgreen", value: "#00ff7f" },
        NamedColor { name: "steelblue", value: "#4682b4" },
        NamedColor { name: "tan", value: "#d2b48c" },
        NamedColor { name: "teal", value: "#008080" },
        NamedColor { name: "thistle", value: "#d8bfd8" },
        NamedColor { name: "tomato", value: "#ff6347" },
        NamedColor { name: "turquoise", value: "#40e0d0" },
        NamedColor { name: "violet", value: "#ee82ee" },
        NamedColor { name: "wheat", value: "#f5deb3" },
        NamedColor { name: "white", value: "#ffffff" },
        NamedColor { name: "whitesmoke", value: "#f5f5f5" },
        NamedColor { name: "yellow", value: "#ffff00" },
        NamedColor { name: "yellowgreen", value: "#9acd32" },
        NamedColor { name: "rebeccapurple", value: "#663399" },
    ];
}

/// Parse a color value as defined in CSS Color Level 4.
///
/// Returns `None` when the input is not a valid color value; no error is
/// raised. A string input is tokenized first; a sequence input must hold a
/// single significant component value.
pub fn parse_color<'i>(input: impl Into<Input<'i>>) -> Option<ParsedColor> {
    let token = parse_one_component_value(input, true);

    match &token.kind {
        NodeKind::Ident { lower_value, .. } => match lower_value.as_str() {
            "currentcolor" => Some(ParsedColor::CurrentColor),
            "transparent" => Some(ParsedColor::Color(Color {
                space: ColorSpace::Srgb,
                params: [0.0, 0.0, 0.0],
                alpha: 0.0,
                function_name: None,
                args: vec![Some(0.0), Some(0.0), Some(0.0)],
            })),
            name => {
                let entry = CSS_COLOR_NAMES.iter().find(|entry| entry.name == name)?;
                parse_hash_color(entry.value.get(1..).unwrap_or("")).map(ParsedColor::Color)
            }
        },
        NodeKind::Hash { value, .. } => parse_hash_color(value).map(ParsedColor::Color),
        NodeKind::Function {
            lower_name,
            arguments,
            ..
        } => parse_color_function(lower_name, arguments).map(ParsedColor::Color),
        _ => None,
    }
}

/// Hex notation: 3, 4, 6 or 8 hex digits. The short forms double every
/// digit; the last channel is the alpha when four are present.
fn parse_hash_color(value: &str) -> Option<Color> {
    if !value.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(16)).collect();
    let mut channels: Vec<f64> = match digits.len() {
        3 | 4 => digits.iter().map(|d| (d * 16 + d) as f64 / 255.0).collect(),
        6 | 8 => digits
            .iter()
            .tuples()
            .map(|(high, low)| (high * 16 + low) as f64 / 255.0)
            .collect(),
        _ => return None,
    };

    let alpha = if channels.len() == 4 {
        channels.pop().unwrap_or(1.0)
    } else {
        1.0
    };

    let params = match channels.as_slice() {
        &[r, g, b] => [r, g, b],
        _ => return None,
    };

    Some(Color {
        space: ColorSpace::Srgb,
        params,
        alpha,
        function_name: None,
        args: channels.into_iter().map(Some).collect(),
    })
}

fn parse_color_function(name: &str, arguments: &[Node]) -> Option<Color> {
    let tokens: Vec<&Node> = arguments
        .iter()
        .filter(|token| token.is_significant())
        .collect();

    // color() carries its space as a leading ident
    let (space, tokens) = if name == "color" {
        let (first, rest) = tokens.split_first()?;
        let NodeKind::Ident { lower_value, .. } = &first.kind else {
            return None;
        };
        (
            Some(ColorSpace::for_color_function(lower_value)?),
            rest.to_vec(),
        )
    } else {
        (None, tokens)
    };

    // color() only knows the space syntax; the comma form is legacy
    // rgb()/hsl() territory
    let (channels, alpha_token) = split_arguments(&tokens, name != "color")?;
    let alpha = parse_alpha(alpha_token)?;

    match name {
        "rgb" | "rgba" => parse_rgb(name, &channels, alpha),
        "hsl" | "hsla" => parse_hsl(name, &channels, alpha),
        "hwb" => parse_hwb(&channels, alpha),
        "lab" => parse_lab_like(name, ColorSpace::Lab, &channels, alpha, 100.0, 125.0),
        "oklab" => parse_lab_like(name, ColorSpace::Oklab, &channels, alpha, 1.0, 0.4),
        "lch" => parse_lch_like(name, ColorSpace::Lch, &channels, alpha, 100.0, 150.0),
        "oklch" => parse_lch_like(name, ColorSpace::Oklch, &channels, alpha, 1.0, 0.4),
        "color" => parse_color_space_channels(space?, &channels, alpha),
        _ => None,
    }
}

/// Splits a function's significant arguments into three channel tokens and
/// an optional alpha token. Accepted shapes: the legacy comma syntax (where
/// a fourth channel is the alpha) when `comma_allowed` is set, three space
/// separated channels, or three channels followed by `/` and an alpha.
fn split_arguments<'t>(
    tokens: &[&'t Node],
    comma_allowed: bool,
) -> Option<(Vec<&'t Node>, Option<&'t Node>)> {
    let length = tokens.len();

    if comma_allowed
        && (length == 5 || length == 7)
        && tokens
            .iter()
            .skip(1)
            .tuples()
            .all(|(comma, _)| comma.is_literal(","))
    {
        let mut channels: Vec<&Node> = tokens.iter().step_by(2).copied().collect();
        let alpha = if channels.len() == 4 {
            channels.pop()
        } else {
            None
        };
        return Some((channels, alpha));
    }

    match tokens {
        &[a, b, c] => Some((vec![a, b, c], None)),
        &[a, b, c, slash, alpha] if slash.is_literal("/") => Some((vec![a, b, c], Some(alpha))),
        _ => None,
    }
}

/// An absent alpha is 1; numbers and percentages clamp to [0, 1]; anything
/// else invalidates the color
fn parse_alpha(token: Option<&Node>) -> Option<f64> {
    let Some(token) = token else {
        return Some(1.0);
    };

    match &token.kind {
        NodeKind::Number { value, .. } => Some(value.clamp(0.0, 1.0)),
        NodeKind::Percentage { value, .. } => Some((value / 100.0).clamp(0.0, 1.0)),
        _ => None,
    }
}

/// A color channel: a number (divided by `number_divisor`), a percentage of
/// `percentage_reference`, or the `none` keyword
fn parse_channel(
    token: &Node,
    number_divisor: f64,
    percentage_reference: f64,
) -> Option<Option<f64>> {
    match &token.kind {
        NodeKind::Number { value, .. } => Some(Some(value / number_divisor)),
        NodeKind::Percentage { value, .. } => Some(Some(value / 100.0 * percentage_reference)),
        NodeKind::Ident { lower_value, .. } if lower_value == "none" => Some(None),
        _ => None,
    }
}

/// A channel that only accepts percentages (or `none`), as a fraction
fn parse_percentage_channel(token: &Node) -> Option<Option<f64>> {
    match &token.kind {
        NodeKind::Percentage { value, .. } => Some(Some(value / 100.0)),
        NodeKind::Ident { lower_value, .. } if lower_value == "none" => Some(None),
        _ => None,
    }
}

/// The hue parser: a plain number is degrees, angle dimensions convert from
/// their unit. Returns a fraction of a full turn; `none` reads as zero but
/// stays `None` in the args.
fn parse_hue(token: &Node) -> Option<Option<f64>> {
    let turns = match &token.kind {
        NodeKind::Number { value, .. } => value / 360.0,
        NodeKind::Dimension {
            value, lower_unit, ..
        } => match lower_unit.as_str() {
            "deg" => value / 360.0,
            "grad" => value / 400.0,
            "rad" => value / std::f64::consts::TAU,
            "turn" => *value,
            _ => return None,
        },
        NodeKind::Ident { lower_value, .. } if lower_value == "none" => return Some(None),
        _ => return None,
    };

    Some(Some(turns))
}

fn params_from(args: &[Option<f64>]) -> Option<[f64; 3]> {
    match args {
        &[a, b, c] => Some([a.unwrap_or(0.0), b.unwrap_or(0.0), c.unwrap_or(0.0)]),
        _ => None,
    }
}

/// rgb()/rgba(): numbers scale by 255, percentages by 100
fn parse_rgb(name: &str, channels: &[&Node], alpha: f64) -> Option<Color> {
    let args = channels
        .iter()
        .map(|token| parse_channel(token, 255.0, 1.0))
        .collect::<Option<Vec<_>>>()?;

    Some(Color {
        space: ColorSpace::Srgb,
        params: params_from(&args)?,
        alpha,
        function_name: Some(name.to_string()),
        args,
    })
}

/// hsl()/hsla(): converted to sRGB at parse time, the hsl space label and
/// the original hue/saturation/lightness kept for interpolation
fn parse_hsl(name: &str, channels: &[&Node], alpha: f64) -> Option<Color> {
    let &[h, s, l] = channels else {
        return None;
    };

    let hue = parse_hue(h)?;
    let saturation = parse_percentage_channel(s)?;
    let lightness = parse_percentage_channel(l)?;

    let rgb = convert::hls_to_rgb(
        hue.unwrap_or(0.0),
        lightness.unwrap_or(0.0),
        saturation.unwrap_or(0.0),
    );

    Some(Color {
        space: ColorSpace::Hsl,
        params: rgb,
        alpha,
        function_name: Some(name.to_string()),
        args: vec![hue.map(|hue| hue * 360.0), saturation, lightness],
    })
}

/// hwb(): whiteness and blackness mix into a full-saturation hue; when they
/// sum to one or more the result is the gray they describe
fn parse_hwb(channels: &[&Node], alpha: f64) -> Option<Color> {
    let &[h, w, b] = channels else {
        return None;
    };

    let hue = parse_hue(h)?;
    let white = parse_percentage_channel(w)?;
    let black = parse_percentage_channel(b)?;

    let whiteness = white.unwrap_or(0.0);
    let blackness = black.unwrap_or(0.0);

    let rgb = if whiteness + blackness >= 1.0 {
        let gray = whiteness / (whiteness + blackness);
        [gray, gray, gray]
    } else {
        convert::hls_to_rgb(hue.unwrap_or(0.0), 0.5, 1.0)
            .map(|channel| channel * (1.0 - whiteness - blackness) + whiteness)
    };

    Some(Color {
        space: ColorSpace::Hwb,
        params: rgb,
        alpha,
        function_name: Some("hwb".to_string()),
        args: vec![hue.map(|hue| hue * 360.0), white, black],
    })
}

/// lab() and oklab(): native coordinates, with the percentage references of
/// the respective function
fn parse_lab_like(
    name: &str,
    space: ColorSpace,
    channels: &[&Node],
    alpha: f64,
    l_reference: f64,
    ab_reference: f64,
) -> Option<Color> {
    let &[l, a, b] = channels else {
        return None;
    };

    let args = vec![
        parse_channel(l, 1.0, l_reference)?,
        parse_channel(a, 1.0, ab_reference)?,
        parse_channel(b, 1.0, ab_reference)?,
    ];

    Some(Color {
        space,
        params: params_from(&args)?,
        alpha,
        function_name: Some(name.to_string()),
        args,
    })
}

/// lch() and oklch(): like the lab pair, with a hue as the third channel,
/// stored in degrees
fn parse_lch_like(
    name: &str,
    space: ColorSpace,
    channels: &[&Node],
    alpha: f64,
    l_reference: f64,
    c_reference: f64,
) -> Option<Color> {
    let &[l, c, h] = channels else {
        return None;
    };

    let hue_degrees = parse_hue(h)?.map(|hue| hue * 360.0);
    let args = vec![
        parse_channel(l, 1.0, l_reference)?,
        parse_channel(c, 1.0, c_reference)?,
        hue_degrees,
    ];

    Some(Color {
        space,
        params: params_from(&args)?,
        alpha,
        function_name: Some(name.to_string()),
        args,
    })
}

/// color(): three coordinates in the named space; numbers as-is and
/// percentages as fractions
fn parse_color_space_channels(space: ColorSpace, channels: &[&Node], alpha: f64) -> Option<Color> {
    let args = channels
        .iter()
        .map(|token| parse_channel(token, 1.0, 1.0))
        .collect::<Option<Vec<_>>>()?;

    Some(Color {
        space,
        params: params_from(&args)?,
        alpha,
        function_name: Some("color".to_string()),
        args,
    })
}
