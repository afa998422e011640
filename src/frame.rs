/// One 16-bit reading from the MAX6675, as shifted out MSB first.
///
/// ```text
///  15    14 .. 3       2      1     0
/// sign | temperature | open | id | tri-state
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Frame(pub u16);

impl Frame {
    /// Set when the thermocouple input is open
    const OPEN_BIT: u16 = 1 << 2;
    const SIGN_BIT: u16 = 1 << 15;
    /// Status bits below the temperature field
    const STATUS_SHIFT: u32 = 3;
    /// Weight of the sign bit once the status bits are shifted out
    const SIGN_WEIGHT: i32 = 4096;
    /// Degrees Celsius per count
    pub const RESOLUTION: f64 = 0.25;

    /// Combine two bytes received MSB first
    pub fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Frame(u16::from_be_bytes(bytes))
    }

    /// The device reports no thermocouple connected
    pub fn no_connection(&self) -> bool {
        self.0 & Self::OPEN_BIT != 0
    }

    /// Temperature field in 0.25 °C counts.
    /// Status bits are not inspected here.
    pub fn counts(&self) -> i32 {
        let field = i32::from(self.0 >> Self::STATUS_SHIFT);
        if self.0 & Self::SIGN_BIT != 0 {
            field - Self::SIGN_WEIGHT
        } else {
            field
        }
    }

    /// Temperature in degrees Celsius, or `None` when the thermocouple is open
    pub fn celsius(&self) -> Option<f64> {
        if self.no_connection() {
            None
        } else {
            Some(f64::from(self.counts()) * Self::RESOLUTION)
        }
    }
}
