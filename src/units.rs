use core::str::FromStr;

/// Celsius passthrough
pub fn to_celsius(celsius: f64) -> f64 {
    celsius
}

pub fn to_kelvin(celsius: f64) -> f64 {
    celsius + 273.15
}

pub fn to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Unit reported by [`crate::Max6675::get`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Unit {
    Celsius,
    Kelvin,
    Fahrenheit,
}

impl Unit {
    /// Convert degrees Celsius into this unit
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            Unit::Celsius => to_celsius(celsius),
            Unit::Kelvin => to_kelvin(celsius),
            Unit::Fahrenheit => to_fahrenheit(celsius),
        }
    }

    /// Parse a one-letter selector: `"c"`, `"k"` or `"f"`
    pub fn from_selector(selector: &str) -> Result<Self, UnknownUnit> {
        match selector {
            "c" => Ok(Unit::Celsius),
            "k" => Ok(Unit::Kelvin),
            "f" => Ok(Unit::Fahrenheit),
            _ => Err(UnknownUnit),
        }
    }
}

/// A unit selector did not name a supported unit
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnknownUnit;

impl FromStr for Unit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::from_selector(s)
    }
}
