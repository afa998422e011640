pub mod bitbang;
pub mod spi;

use embedded_hal::spi::{Mode, MODE_0};

pub use self::bitbang::BitBangInterface;
pub use self::spi::SpiInterface;

/// Order in which the bits of each byte travel on the data line
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BitOrder {
    /// Most significant bit first
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

/// Serial bus settings applied to a transport once, at driver construction
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BusConfig {
    /// SCK frequency in Hz
    pub clock_hz: u32,
    /// Clock polarity and phase
    pub mode: Mode,
    pub bit_order: BitOrder,
}

impl BusConfig {
    /// The MAX6675 shifts data out MSB first and tolerates up to 5 MHz.
    /// Clock idles low and data is sampled on the rising edge.
    pub const MAX6675: BusConfig = BusConfig {
        clock_hz: 5_000_000,
        mode: MODE_0,
        bit_order: BitOrder::MsbFirst,
    };
}

/// A method of communicating with the sensor
pub trait SensorInterface {
    /// Interface error type
    type InterfaceError;

    /// Apply clock rate, mode and bit order before the first read
    fn configure(&mut self, config: &BusConfig) -> Result<(), Self::InterfaceError>;

    /// Read one frame into `buffer`.
    /// Returns the number of bytes the transport actually delivered.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::InterfaceError>;
}
