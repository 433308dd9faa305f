use log::warn;
use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, clap::ValueEnum)]
pub enum Units {
    In,
    #[default]
    Mm,
    Cm,
}

impl Units {
    pub fn to_mm(&self) -> f64 {
        match self {
            Units::In => 25.4,
            Units::Mm => 1.0,
            Units::Cm => 10.0,
        }
    }

    pub fn to_in(&self) -> f64 {
        self.to_mm() / 25.4
    }
}

/// Width and height in some length unit or in pixels.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Size {
        Size { width, height }
    }

    pub fn map(self, f: impl Fn(f64) -> f64) -> Size {
        Size::new(f(self.width), f(self.height))
    }

    pub fn zip(self, other: Size, f: impl Fn(f64, f64) -> f64) -> Size {
        Size::new(f(self.width, other.width), f(self.height, other.height))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

pub fn mtg_card_size(units: Units) -> Size {
    match units {
        Units::In => Size::new(2.48425197, 3.46456693),
        Units::Mm => Size::new(63.1, 88.0),
        Units::Cm => Size::new(6.31, 8.8),
    }
}

// (name, mm, in, cm), sourced from the Adobe website
const PAPER_SIZES: [(&str, [f64; 2], [f64; 2], [f64; 2]); 11] = [
    ("A0", [841.0, 1189.0], [33.1, 46.8], [84.1, 118.9]),
    ("A1", [594.0, 841.0], [23.4, 33.1], [59.4, 84.1]),
    ("A2", [420.0, 594.0], [16.5, 23.4], [42.0, 59.4]),
    ("A3", [297.0, 420.0], [11.7, 16.5], [29.7, 42.0]),
    ("A4", [210.0, 297.0], [8.3, 11.7], [21.0, 29.7]),
    ("A5", [148.0, 210.0], [5.8, 8.3], [14.8, 21.0]),
    ("A6", [105.0, 148.0], [4.1, 5.8], [10.5, 14.8]),
    ("A7", [74.0, 105.0], [2.9, 4.1], [7.4, 10.5]),
    ("A8", [52.0, 74.0], [2.0, 2.9], [5.2, 7.4]),
    ("A9", [37.0, 52.0], [1.5, 2.0], [3.7, 5.2]),
    ("A10", [26.0, 37.0], [1.0, 1.5], [2.6, 3.7]),
];

/// A named paper size (case-insensitive), e.g. "a4".
pub fn paper_size(name: &str, units: Units) -> Option<Size> {
    PAPER_SIZES
        .iter()
        .find(|(n, ..)| n.eq_ignore_ascii_case(name))
        .map(|(_, mm, inches, cm)| {
            let [width, height] = match units {
                Units::Mm => mm,
                Units::In => inches,
                Units::Cm => cm,
            };
            Size::new(*width, *height)
        })
}

fn parse_width_height(spec: &str) -> Option<Size> {
    let (width, height) = spec.to_lowercase().split_once('x').map(|(w, h)| {
        (w.trim().parse::<f64>(), h.trim().parse::<f64>())
    })?;
    match (width, height) {
        (Ok(width), Ok(height)) if width > 0.0 && height > 0.0 => Some(Size::new(width, height)),
        _ => None,
    }
}

/// A paper size keyword (A0 - A10) or `WIDTHxHEIGHT` in `units`.
pub fn parse_paper_size(spec: &str, units: Units) -> Result<Size> {
    paper_size(spec, units)
        .or_else(|| parse_width_height(spec))
        .ok_or_else(|| {
            let names: Vec<&str> = PAPER_SIZES.iter().map(|(n, ..)| *n).collect();
            Error::InvalidArgument(format!(
                "Paper size not supported: {}. Try one of: {}, or define the dimensions in a WIDTHxHEIGHT format",
                spec,
                names.join(", ")
            ))
        })
}

pub fn parse_card_size(spec: &str) -> Result<Size> {
    parse_width_height(spec).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "Card size must be in the format WIDTHxHEIGHT, got {}",
            spec
        ))
    })
}

/// Pixels per size unit of an image with a known physical size, averaged over both axes.
pub fn pixels_per_unit(pixels: (u32, u32), size: Size) -> f64 {
    let horizontal = pixels.0 as f64 / size.width;
    let vertical = pixels.1 as f64 / size.height;
    if (horizontal - vertical).abs() > 1.0 {
        warn!(
            "resolutions differ across dimensions: {:.1} = {}/{} and {:.1} = {}/{}",
            horizontal, pixels.0, size.width, vertical, pixels.1, size.height
        );
    }
    (horizontal + vertical) / 2.0
}
