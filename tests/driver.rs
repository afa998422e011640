use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::pin::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
use max6675::{Builder, Error, ErrorKind, Unit};

fn spi_frames(frames: &[u16]) -> (SpiMock<u8>, PinMock) {
    let mut spi_tx = Vec::new();
    let mut cs_tx = vec![PinTransaction::set(PinState::High)];
    for frame in frames {
        spi_tx.push(SpiTransaction::read_vec(frame.to_be_bytes().to_vec()));
        spi_tx.push(SpiTransaction::flush());
        cs_tx.push(PinTransaction::set(PinState::Low));
        cs_tx.push(PinTransaction::set(PinState::High));
    }
    (SpiMock::new(&spi_tx), PinMock::new(&cs_tx))
}

fn level(high: bool) -> PinState {
    if high {
        PinState::High
    } else {
        PinState::Low
    }
}

#[test]
fn spi_reads_celsius() {
    let (spi, csn) = spi_frames(&[0x0190]);
    let mut sensor = Builder::new_spi(spi, csn, Unit::Celsius).unwrap();

    assert_eq!(sensor.get().unwrap(), 12.5);
    assert!(!sensor.no_connection());

    let (mut spi, mut csn) = sensor.release().release();
    spi.done();
    csn.done();
}

#[test]
fn spi_unplugged_then_reconnected() {
    let (spi, csn) = spi_frames(&[0x0004, 0x0190]);
    let mut sensor = Builder::new_spi(spi, csn, Unit::Fahrenheit).unwrap();

    assert!(sensor.get().unwrap().is_nan());
    assert!(sensor.no_connection());

    assert_eq!(sensor.get().unwrap(), 54.5);
    assert!(!sensor.no_connection());

    let (mut spi, mut csn) = sensor.release().release();
    spi.done();
    csn.done();
}

#[test]
fn spi_raw_frame() {
    let (spi, csn) = spi_frames(&[0xFFF8]);
    let mut sensor = Builder::new_spi(spi, csn, Unit::Celsius).unwrap();

    assert_eq!(sensor.read_raw().unwrap(), 0xFFF8);

    let (mut spi, mut csn) = sensor.release().release();
    spi.done();
    csn.done();
}

#[test]
fn bitbang_reads_kelvin() {
    let mut clk_tx = vec![PinTransaction::set(PinState::Low)];
    let mut data_tx = Vec::new();
    for i in (0..16).rev() {
        clk_tx.push(PinTransaction::set(PinState::High));
        clk_tx.push(PinTransaction::set(PinState::Low));
        data_tx.push(PinTransaction::get(level(0x0190u16 & (1 << i) != 0)));
    }
    let cs_tx = [
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ];

    let mut sensor = Builder::new_bitbang(
        PinMock::new(&clk_tx),
        PinMock::new(&cs_tx),
        PinMock::new(&data_tx),
        NoopDelay::new(),
        Unit::Kelvin,
    )
    .unwrap();

    assert_eq!(sensor.get().unwrap(), 12.5 + 273.15);
    assert_eq!(sensor.unit(), Unit::Kelvin);

    let (mut clk, mut cs, mut data, _) = sensor.release().release();
    clk.done();
    cs.done();
    data.done();
}

#[test]
fn bitbang_needs_all_three_pins() {
    let pins = || {
        let clk = PinMock::new(&[]);
        let cs = PinMock::new(&[]);
        let data = PinMock::new(&[]);
        (clk, cs, data)
    };

    for missing in 0..3 {
        let (clk, cs, data) = pins();
        let (mut clk_done, mut cs_done, mut data_done) = (clk.clone(), cs.clone(), data.clone());

        let result = Builder::try_new_bitbang(
            if missing == 0 { None } else { Some(clk) },
            if missing == 1 { None } else { Some(cs) },
            if missing == 2 { None } else { Some(data) },
            NoopDelay::new(),
            Unit::Celsius,
        );
        let err = result.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(matches!(err, Error::MissingTransport));

        clk_done.done();
        cs_done.done();
        data_done.done();
    }
}

#[test]
fn bitbang_with_all_pins_present() {
    let clk = PinMock::new(&[PinTransaction::set(PinState::Low)]);
    let cs = PinMock::new(&[PinTransaction::set(PinState::High)]);
    let data = PinMock::new(&[]);

    let sensor = Builder::try_new_bitbang(
        Some(clk),
        Some(cs),
        Some(data),
        NoopDelay::new(),
        Unit::Celsius,
    )
    .ok()
    .unwrap();

    let (mut clk, mut cs, mut data, _) = sensor.release().release();
    clk.done();
    cs.done();
    data.done();
}

#[test]
fn unit_from_selector_text() {
    let unit: Unit = "f".parse().unwrap();
    assert_eq!(unit, Unit::Fahrenheit);

    let err: Error<(), ()> = "celsius".parse::<Unit>().unwrap_err().into();
    assert_eq!(err.kind(), ErrorKind::Config);
}
