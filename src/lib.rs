/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Driver for the MAX6675 cold-junction-compensated
//! thermocouple-to-digital converter.
//!
//! ```ignore
//! let mut sensor = Builder::new_spi(spi_bus, cs_pin, Unit::Celsius)?;
//! let temp = sensor.get()?;
//! if sensor.no_connection() {
//!     // thermocouple unplugged, `temp` is NaN
//! }
//! ```

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

use core::convert::Infallible;

use embedded_hal as hal;
use hal::delay::DelayNs;
use hal::digital::{InputPin, OutputPin};
use hal::spi::SpiBus;

#[cfg(feature = "rttdebug")]
use panic_rtt_core::rprintln;

mod frame;
mod interface;
mod units;

pub use frame::Frame;
pub use interface::{BitBangInterface, BitOrder, BusConfig, SensorInterface, SpiInterface};
pub use units::{to_celsius, to_fahrenheit, to_kelvin, Unit, UnknownUnit};

/// Errors in this crate
#[derive(Debug, PartialEq)]
pub enum Error<CommE, PinE> {
    /// Sensor communication error
    Comm(CommE),
    /// Pin setting error
    Pin(PinE),

    /// The transport delivered a frame of the wrong length
    UnexpectedByteCount(usize),
    /// Neither a hardware transport nor all three software-bus pins were given
    MissingTransport,
    /// Unit selector did not name a supported unit
    UnknownUnit,
    /// The pre-read fault check refused to take a reading
    FaultCheckRejected,
}

/// Broad classes of [`Error`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad construction parameters or unit selector
    Config,
    /// The bus failed or returned a malformed frame
    Transport,
    /// A fault check vetoed the read
    Rejected,
}

impl<CommE, PinE> Error<CommE, PinE> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Comm(_) | Error::Pin(_) | Error::UnexpectedByteCount(_) => {
                ErrorKind::Transport
            }
            Error::MissingTransport | Error::UnknownUnit => ErrorKind::Config,
            Error::FaultCheckRejected => ErrorKind::Rejected,
        }
    }
}

impl<CommE, PinE> From<UnknownUnit> for Error<CommE, PinE> {
    fn from(_: UnknownUnit) -> Self {
        Error::UnknownUnit
    }
}

/// Fault flags left by the most recent read.
///
/// The MAX6675 only reports an open thermocouple. The remaining flags
/// mirror the MAX31855 fault set and always read `false` here.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Faults {
    /// Thermocouple input is open
    pub no_connection: bool,
    /// Reserved
    pub short_to_ground: bool,
    /// Reserved
    pub short_to_vcc: bool,
    /// Reserved
    pub unknown_error: bool,
}

impl Faults {
    pub fn any(&self) -> bool {
        self.no_connection || self.short_to_ground || self.short_to_vcc || self.unknown_error
    }
}

/// Bytes per reading
const FRAME_LEN: usize = 2;

/// Pre-read validation run by [`Max6675::get`].
/// Receives the flags left by the previous read; return `false` to refuse the read.
pub type FaultCheck = fn(&Faults) -> bool;

pub struct Builder {}

impl Builder {
    /// Create a new driver using a hardware SPI bus
    pub fn new_spi<SPI, CSN, CommE, PinE>(
        spi: SPI,
        csn: CSN,
        unit: Unit,
    ) -> Result<Max6675<SpiInterface<SPI, CSN>>, Error<CommE, PinE>>
    where
        SPI: SpiBus<u8, Error = CommE>,
        CSN: OutputPin<Error = PinE>,
    {
        #[cfg(feature = "rttdebug")]
        rprintln!("using hardware SPI");

        let iface = interface::SpiInterface::new(spi, csn);
        Max6675::new_with_interface(iface, unit)
    }

    /// Create a new driver using software SPI on three GPIO pins
    pub fn new_bitbang<CLK, CS, DO, D, PinE>(
        clk: CLK,
        cs: CS,
        data_out: DO,
        delay: D,
        unit: Unit,
    ) -> Result<Max6675<BitBangInterface<CLK, CS, DO, D>>, Error<Infallible, PinE>>
    where
        CLK: OutputPin<Error = PinE>,
        CS: OutputPin<Error = PinE>,
        DO: InputPin<Error = PinE>,
        D: DelayNs,
    {
        #[cfg(feature = "rttdebug")]
        rprintln!("using software SPI");

        let iface = interface::BitBangInterface::new(clk, cs, data_out, delay);
        Max6675::new_with_interface(iface, unit)
    }

    /// Like [`Builder::new_bitbang`], for pins looked up from an optional pin map.
    /// Fails with [`Error::MissingTransport`] unless all three pins are present.
    pub fn try_new_bitbang<CLK, CS, DO, D, PinE>(
        clk: Option<CLK>,
        cs: Option<CS>,
        data_out: Option<DO>,
        delay: D,
        unit: Unit,
    ) -> Result<Max6675<BitBangInterface<CLK, CS, DO, D>>, Error<Infallible, PinE>>
    where
        CLK: OutputPin<Error = PinE>,
        CS: OutputPin<Error = PinE>,
        DO: InputPin<Error = PinE>,
        D: DelayNs,
    {
        match (clk, cs, data_out) {
            (Some(clk), Some(cs), Some(data_out)) => {
                Self::new_bitbang(clk, cs, data_out, delay, unit)
            }
            _ => Err(Error::MissingTransport),
        }
    }

    /// Create a new driver on a transport the caller already built
    pub fn new_with_interface<SI, CommE, PinE>(
        sensor_interface: SI,
        unit: Unit,
    ) -> Result<Max6675<SI>, Error<CommE, PinE>>
    where
        SI: SensorInterface<InterfaceError = Error<CommE, PinE>>,
    {
        #[cfg(feature = "rttdebug")]
        rprintln!("using caller-supplied transport");

        Max6675::new_with_interface(sensor_interface, unit)
    }
}

pub struct Max6675<SI> {
    pub(crate) si: SI,

    pub(crate) unit: Unit,
    pub(crate) faults: Faults,
    pub(crate) fault_check: Option<FaultCheck>,
}

impl<SI, CommE, PinE> Max6675<SI>
where
    SI: SensorInterface<InterfaceError = Error<CommE, PinE>>,
{
    pub(crate) fn new_with_interface(
        mut sensor_interface: SI,
        unit: Unit,
    ) -> Result<Self, SI::InterfaceError> {
        sensor_interface.configure(&BusConfig::MAX6675)?;
        Ok(Self {
            si: sensor_interface,
            unit,
            faults: Faults::default(),
            fault_check: None,
        })
    }

    /// Install a check that [`Max6675::get`] runs before every read
    pub fn with_fault_check(mut self, check: FaultCheck) -> Self {
        self.fault_check = Some(check);
        self
    }

    /// Release the transport
    pub fn release(self) -> SI {
        self.si
    }

    /// Unit used by [`Max6675::get`]
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Fault flags from the most recent read
    pub fn faults(&self) -> Faults {
        self.faults
    }

    /// The most recent read found the thermocouple disconnected
    pub fn no_connection(&self) -> bool {
        self.faults.no_connection
    }

    /// Read one raw frame from the device
    pub fn read_raw(&mut self) -> Result<u16, SI::InterfaceError> {
        let mut block = [0u8; FRAME_LEN];
        let count = self.si.read(&mut block)?;
        if count != FRAME_LEN {
            return Err(Error::UnexpectedByteCount(count));
        }
        let raw = Frame::from_be_bytes(block).0;

        #[cfg(feature = "rttdebug")]
        rprintln!("raw value: 0x{:04X}", raw);

        Ok(raw)
    }

    /// Thermocouple temperature in degrees Celsius.
    /// Returns NaN and sets [`Faults::no_connection`] when the thermocouple is open.
    pub fn read_temp_c(&mut self) -> Result<f64, SI::InterfaceError> {
        self.faults = Faults::default();
        let frame = Frame(self.read_raw()?);
        let temp_c = match frame.celsius() {
            Some(temp_c) => temp_c,
            None => {
                self.faults.no_connection = true;
                return Ok(f64::NAN);
            }
        };

        #[cfg(feature = "rttdebug")]
        rprintln!("thermocouple temperature {} deg. C", temp_c);

        Ok(temp_c)
    }

    /// Thermocouple temperature in the configured unit.
    /// NaN when the thermocouple is open.
    pub fn get(&mut self) -> Result<f64, SI::InterfaceError> {
        if let Some(check) = self.fault_check {
            if !check(&self.faults) {
                return Err(Error::FaultCheckRejected);
            }
        }
        let celsius = self.read_temp_c()?;
        Ok(self.unit.convert(celsius))
    }
}
