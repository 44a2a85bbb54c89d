#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

/*! # MAX31865
 *
 * A blocking driver for the Analog Devices MAX31865 RTD-to-digital
 * converter, the analog front end for 2-, 3- and 4-wire platinum
 * resistance thermometers.
 *
 * The driver owns the register protocol and the conversion sequencing:
 * bit-field encoding of the configuration register, the timed 1-shot
 * conversion sequence (bias up, settle, trigger, wait, read, bias down)
 * and the fault-register lifecycle. Converting the returned resistance
 * code to a temperature is left to the caller.
 *
 * The chip is driven at up to 1 MHz in SPI mode 1 (clock idle low, data
 * sampled on the trailing edge), most-significant bit first. The platform
 * layer applies these parameters when it constructs the
 * [`SpiDevice`](embedded_hal::spi::SpiDevice) handed to the driver.
 */

mod error;
mod registers;
mod rtd;
mod traits;

#[cfg(test)]
mod testutil;

pub use error::Max31865Error;
pub use registers::{Configuration, FaultStatus, FaultThresholds, Filter, WiringMode};
pub use rtd::{BIAS_SETTLE_TIME_MS, CONVERSION_TIME_MS};
pub use traits::{Addressing, Interact};

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{MODE_1, Mode, SpiDevice};

/// Results of MAX31865-specific function calls.
pub type Max31865Result<T, E> = Result<T, Max31865Error<E>>;

/// SPI mode the chip is driven in: clock idle low, data sampled on the
/// trailing edge.
pub const SPI_MODE: Mode = MODE_1;

/// SPI clock rate the driver is specified for.
pub const SPI_CLOCK_HZ: u32 = 1_000_000;

/// A MAX31865 RTD front end.
///
/// Takes ownership of a SPI device (implementing the
/// [`SpiDevice`](embedded_hal::spi::SpiDevice) trait, which encodes
/// exclusive use of the bus with chip select) and a timer object
/// implementing the [`DelayNs`](embedded_hal::delay::DelayNs) trait for
/// the bias-settle and conversion waits.
pub struct Max31865<S, D> {
    pub(crate) spi: S,
    pub(crate) delay: D,
    pub(crate) bias_normally_off: bool,
}

impl<S, D> Max31865<S, D> {
    /// Creates a new instance of `Max31865` with the given SPI device.
    ///
    /// No bus traffic is generated; the chip keeps whatever register state
    /// it had. [`Max31865Builder`] is the usual way to obtain a driver
    /// with the chip brought to a known state.
    pub fn new(spi: S, delay: D) -> Self {
        Max31865 {
            spi,
            delay,
            bias_normally_off: true,
        }
    }

    /// Consumes the driver and releases the SPI device and timer.
    pub fn release(self) -> (S, D) {
        (self.spi, self.delay)
    }
}

/// Builder for creating a [`Max31865`] instance with the chip initialized
/// to a known safe state.
pub struct Max31865Builder {
    wires: WiringMode,
    filter: Filter,
    bias_normally_off: bool,
}

impl Default for Max31865Builder {
    fn default() -> Self {
        Max31865Builder {
            wires: WiringMode::TwoWire,
            filter: Filter::Hz60,
            bias_normally_off: true,
        }
    }
}

impl Max31865Builder {
    /// Sets the wiring mode of the connected RTD.
    pub fn with_wires(mut self, wires: WiringMode) -> Self {
        self.wires = wires;
        self
    }

    /// Sets the mains rejection filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Controls whether the bias voltage is toggled around each 1-shot
    /// conversion (the default, saving power between readings at the cost
    /// of the settle delay) or left under caller control for continuously
    /// biased operation.
    pub fn with_bias_normally_off(mut self, bias_normally_off: bool) -> Self {
        self.bias_normally_off = bias_normally_off;
        self
    }

    /// Builds a new `Max31865` instance and brings the chip to a known
    /// state: wiring mode and filter applied, bias off, auto conversion
    /// off, fault thresholds opened to the full range, faults cleared.
    pub fn build<S: SpiDevice, D: DelayNs>(
        self,
        spi: S,
        delay: D,
    ) -> Max31865Result<Max31865<S, D>, S::Error> {
        let mut dev = Max31865 {
            spi,
            delay,
            bias_normally_off: self.bias_normally_off,
        };
        dev.set_wires(self.wires)?;
        dev.enable_50hz(self.filter == Filter::Hz50)?;
        dev.enable_bias(false)?;
        dev.auto_convert(false)?;
        FaultThresholds::default().write(&mut dev)?;
        dev.clear_fault()?;
        Ok(dev)
    }
}

#[cfg(test)]
mod tests {
    use crate::registers::{
        CONFIG_REG, HIGH_FAULT_LSB_REG, HIGH_FAULT_MSB_REG, LOW_FAULT_LSB_REG, LOW_FAULT_MSB_REG,
    };
    use crate::testutil::{read8, write8};
    use crate::{Max31865Builder, WiringMode};
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::spi::Mock as SpiMock;

    #[test]
    fn builder_brings_the_chip_to_a_known_state() {
        // Chip out of reset, configuration register all zero.
        let mut expectations = vec![];
        // wiring mode
        expectations.extend(read8(CONFIG_REG, 0x00));
        expectations.extend(write8(CONFIG_REG, 0x10));
        // mains filter (60 Hz keeps the bit clear)
        expectations.extend(read8(CONFIG_REG, 0x10));
        expectations.extend(write8(CONFIG_REG, 0x10));
        // bias off
        expectations.extend(read8(CONFIG_REG, 0x10));
        expectations.extend(write8(CONFIG_REG, 0x10));
        // auto conversion off
        expectations.extend(read8(CONFIG_REG, 0x10));
        expectations.extend(write8(CONFIG_REG, 0x10));
        // thresholds opened to the full range
        expectations.extend(write8(LOW_FAULT_LSB_REG, 0x00));
        expectations.extend(write8(LOW_FAULT_MSB_REG, 0x00));
        expectations.extend(write8(HIGH_FAULT_LSB_REG, 0xff));
        expectations.extend(write8(HIGH_FAULT_MSB_REG, 0xff));
        // fault clear
        expectations.extend(read8(CONFIG_REG, 0x10));
        expectations.extend(write8(CONFIG_REG, 0x12));

        let dev = Max31865Builder::default()
            .with_wires(WiringMode::ThreeWire)
            .build(SpiMock::new(&expectations), NoopDelay::new())
            .unwrap();

        let (mut spi, _) = dev.release();
        spi.done();
    }
}
