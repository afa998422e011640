use core::convert::Infallible;

use embedded_hal as hal;
use hal::delay::DelayNs;
use hal::digital::{InputPin, OutputPin};
use hal::spi::{Phase, Polarity};

use super::{BitOrder, BusConfig, SensorInterface};
use crate::Error;
#[cfg(feature = "rttdebug")]
use panic_rtt_core::rprintln;

/// Software (bit-banged) SPI over three GPIOs.
///
/// Read-only 3-wire variant: the MAX6675 has no data input, so there is
/// no MOSI line.
/// - CLK : serial clock, driven by us
/// - CS  : chip select, active low
/// - DO  : data out of the device, sampled by us
///
/// Clock timing comes from the delay source; the actual rate will be
/// somewhat lower than requested because of pin toggling overhead.
pub struct BitBangInterface<CLK, CS, DO, D> {
    clk: CLK,
    cs: CS,
    data_out: DO,
    delay: D,
    config: BusConfig,
    /// half of one clock period, in nanoseconds
    half_period_ns: u32,
}

impl<CLK, CS, DO, D, PinE> BitBangInterface<CLK, CS, DO, D>
where
    CLK: OutputPin<Error = PinE>,
    CS: OutputPin<Error = PinE>,
    DO: InputPin<Error = PinE>,
    D: DelayNs,
{
    pub fn new(clk: CLK, cs: CS, data_out: DO, delay: D) -> Self {
        Self {
            clk,
            cs,
            data_out,
            delay,
            config: BusConfig::MAX6675,
            half_period_ns: half_period_ns(BusConfig::MAX6675.clock_hz),
        }
    }

    /// Release owned resources
    pub fn release(self) -> (CLK, CS, DO, D) {
        (self.clk, self.cs, self.data_out, self.delay)
    }

    /// Settings last applied by `configure`
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Drive the clock to its active (`true`) or idle (`false`) level
    fn set_clock(&mut self, active: bool) -> Result<(), Error<Infallible, PinE>> {
        let idle_high = self.config.mode.polarity == Polarity::IdleHigh;
        if active != idle_high {
            self.clk.set_high().map_err(Error::Pin)
        } else {
            self.clk.set_low().map_err(Error::Pin)
        }
    }

    fn read_byte(&mut self) -> Result<u8, Error<Infallible, PinE>> {
        let first_edge = self.config.mode.phase == Phase::CaptureOnFirstTransition;
        let mut byte: u8 = 0;
        for i in 0..8 {
            let mut bit = false;

            self.delay.delay_ns(self.half_period_ns);
            self.set_clock(true)?;
            if first_edge {
                bit = self.data_out.is_high().map_err(Error::Pin)?;
            }

            self.delay.delay_ns(self.half_period_ns);
            self.set_clock(false)?;
            if !first_edge {
                bit = self.data_out.is_high().map_err(Error::Pin)?;
            }

            match self.config.bit_order {
                BitOrder::MsbFirst => byte = (byte << 1) | (bit as u8),
                BitOrder::LsbFirst => byte |= (bit as u8) << i,
            }
        }
        Ok(byte)
    }

    fn read_block(&mut self, buffer: &mut [u8]) -> Result<(), Error<Infallible, PinE>> {
        for byte in buffer.iter_mut() {
            *byte = self.read_byte()?;
        }
        Ok(())
    }
}

impl<CLK, CS, DO, D, PinE> SensorInterface for BitBangInterface<CLK, CS, DO, D>
where
    CLK: OutputPin<Error = PinE>,
    CS: OutputPin<Error = PinE>,
    DO: InputPin<Error = PinE>,
    D: DelayNs,
{
    type InterfaceError = Error<Infallible, PinE>;

    fn configure(&mut self, config: &BusConfig) -> Result<(), Self::InterfaceError> {
        self.config = *config;
        self.half_period_ns = half_period_ns(config.clock_hz);

        #[cfg(feature = "rttdebug")]
        rprintln!("bitbang half period {} ns", self.half_period_ns);

        self.set_clock(false)?;
        self.cs.set_high().map_err(Error::Pin)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::InterfaceError> {
        self.cs.set_low().map_err(Error::Pin)?;
        let rc = self.read_block(buffer);
        // a failed sample can leave the clock active mid-bit
        let idle = match rc {
            Ok(()) => Ok(()),
            Err(_) => self.set_clock(false),
        };
        self.cs.set_high().map_err(Error::Pin)?;
        rc?;
        idle?;

        Ok(buffer.len())
    }
}

/// Half of the clock period for `clock_hz`, rounded up so we never run fast
fn half_period_ns(clock_hz: u32) -> u32 {
    const HALF_SECOND_NS: u64 = 500_000_000;
    let hz = u64::from(clock_hz.max(1));
    let half = (HALF_SECOND_NS + hz - 1) / hz;
    half.max(1) as u32
}
