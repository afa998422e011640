use embedded_hal as hal;
use hal::digital::OutputPin;
use hal::spi::SpiBus;

use super::{BitOrder, BusConfig, SensorInterface};
use crate::Error;
#[cfg(feature = "rttdebug")]
use panic_rtt_core::rprintln;

/// This combines the hardware SPI bus and
/// associated control pins such as:
/// - CSN : Chip Select (aka SS or Slave Select)
///
/// The SPI bus clock rate and mode are fixed by the HAL that built it:
/// set them from [`BusConfig::MAX6675`] when creating the bus.
pub struct SpiInterface<SPI, CSN> {
    /// the SPI port to use when communicating
    spi: SPI,
    /// the Chip Select pin (GPIO output) to use when communicating
    csn: CSN,
    /// settings recorded by `configure`
    config: BusConfig,
}

impl<SPI, CSN, CommE, PinE> SpiInterface<SPI, CSN>
where
    SPI: SpiBus<u8, Error = CommE>,
    CSN: OutputPin<Error = PinE>,
{
    pub fn new(spi: SPI, csn: CSN) -> Self {
        Self {
            spi,
            csn,
            config: BusConfig::MAX6675,
        }
    }

    /// Release owned resources
    pub fn release(self) -> (SPI, CSN) {
        (self.spi, self.csn)
    }

    /// Settings last applied by `configure`
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    fn read_block(&mut self, buffer: &mut [u8]) -> Result<(), Error<CommE, PinE>> {
        self.csn.set_low().map_err(Error::Pin)?;
        let rc = self.spi.read(buffer).and_then(|_| self.spi.flush());
        self.csn.set_high().map_err(Error::Pin)?;
        rc.map_err(Error::Comm)?;

        // hardware SPI shifts MSB first; undo that for LSB-first framing
        if self.config.bit_order == BitOrder::LsbFirst {
            for byte in buffer.iter_mut() {
                *byte = byte.reverse_bits();
            }
        }

        Ok(())
    }
}

impl<SPI, CSN, CommE, PinE> SensorInterface for SpiInterface<SPI, CSN>
where
    SPI: SpiBus<u8, Error = CommE>,
    CSN: OutputPin<Error = PinE>,
{
    type InterfaceError = Error<CommE, PinE>;

    fn configure(&mut self, config: &BusConfig) -> Result<(), Self::InterfaceError> {
        self.config = *config;
        //ensure that the device is initially deselected
        self.csn.set_high().map_err(Error::Pin)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::InterfaceError> {
        self.read_block(buffer)?;

        #[cfg(feature = "rttdebug")]
        rprintln!("spi read {:x?} ", buffer);

        Ok(buffer.len())
    }
}
