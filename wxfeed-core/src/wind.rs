//! Wind helpers for values read out of reports, where numbers arrive as strings.

use std::fmt;

/// A value that may or may not hold a number: report text or an actual number.
pub trait Reading {
    fn number(&self) -> Option<f64>;
}

impl Reading for str {
    fn number(&self) -> Option<f64> {
        self.trim().parse::<f64>().ok().filter(|n| n.is_finite())
    }
}

impl Reading for String {
    fn number(&self) -> Option<f64> {
        self.as_str().number()
    }
}

impl<T: Reading + ?Sized> Reading for &T {
    fn number(&self) -> Option<f64> {
        (**self).number()
    }
}

macro_rules! numeric_reading {
    ($($t:ty),*) => {$(
        impl Reading for $t {
            fn number(&self) -> Option<f64> {
                Some(f64::from(*self)).filter(|n| n.is_finite())
            }
        }
    )*};
}

numeric_reading!(u8, u16, u32, i8, i16, i32, f32, f64);

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compass {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Compass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compass::N => "N",
            Compass::NE => "NE",
            Compass::E => "E",
            Compass::SE => "SE",
            Compass::S => "S",
            Compass::SW => "SW",
            Compass::W => "W",
            Compass::NW => "NW",
        }
    }
}

impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper bounds (exclusive) of the compass bands starting at 23 degrees.
/// Anything below 23 or at/above 338 is north.
const BANDS: &[(f64, Compass)] = &[
    (68.0, Compass::NE),
    (113.0, Compass::E),
    (158.0, Compass::SE),
    (203.0, Compass::S),
    (248.0, Compass::SW),
    (293.0, Compass::W),
    (338.0, Compass::NW),
];

/// Eight-point compass direction for a bearing in degrees. `None` for non-numeric input.
pub fn wind_direction(degrees: impl Reading) -> Option<Compass> {
    let degrees = degrees.number()?;
    if !(23.0..338.0).contains(&degrees) {
        return Some(Compass::N);
    }
    BANDS.iter().find(|(upper, _)| degrees < *upper).map(|&(_, point)| point)
}

/// Inclusive upper bounds in km/h for Beaufort forces 1 through 11.
const BEAUFORT: [f64; 11] = [5.5, 11.0, 19.0, 28.0, 38.0, 49.0, 61.0, 74.0, 88.0, 102.0, 117.0];

/// Beaufort force (0-12) for a wind speed in km/h. `None` for non-numeric input.
pub fn beaufort_scale(km_per_hour: impl Reading) -> Option<u8> {
    let speed = km_per_hour.number()?;
    if speed < 1.0 {
        return Some(0);
    }
    let force = BEAUFORT.iter().position(|&upper| speed <= upper).unwrap_or(BEAUFORT.len());
    u8::try_from(force + 1).ok()
}
