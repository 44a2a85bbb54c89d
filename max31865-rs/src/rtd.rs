use crate::{
    Max31865, Max31865Result,
    registers::{
        Configuration, FaultStatus, FaultThresholds, HIGH_FAULT_MSB_REG, LOW_FAULT_MSB_REG,
        RTD_MSB_REG, WiringMode,
    },
    traits::Interact,
};
use embedded_hal::{delay::DelayNs, spi::SpiDevice};

/// Settle time after switching the bias voltage on, in milliseconds.
///
/// Ten RC time constants of the RTD input network plus margin for the bias
/// voltage to stabilize. A conversion triggered earlier reads a code that
/// is still slewing towards the true resistance.
pub const BIAS_SETTLE_TIME_MS: u32 = 10;

/// Worst-case duration of a single conversion, in milliseconds, per the
/// datasheet. The result registers hold stale data until this interval has
/// elapsed after the 1-shot trigger.
pub const CONVERSION_TIME_MS: u32 = 55;

impl<S: SpiDevice, D: DelayNs> Max31865<S, D> {
    /// Set the wiring-compensation bit for the connected RTD.
    ///
    /// 2-wire and 4-wire sensors share the cleared state; the register
    /// format does not distinguish them.
    pub fn set_wires(&mut self, wires: WiringMode) -> Max31865Result<(), S::Error> {
        let mut config = Configuration::new();
        config.read(self)?;
        config.set_three_wire(matches!(wires, WiringMode::ThreeWire));
        config.write(self)
    }

    /// Switch the RTD bias voltage on or off.
    ///
    /// After switching on, the bias needs [`BIAS_SETTLE_TIME_MS`] before a
    /// conversion produces a valid code. [`read_rtd`](Self::read_rtd)
    /// sequences this on its own when the driver runs with bias normally
    /// off.
    pub fn enable_bias(&mut self, enable: bool) -> Max31865Result<(), S::Error> {
        let mut config = Configuration::new();
        config.read(self)?;
        config.set_bias(enable);
        config.write(self)
    }

    /// Switch continuous conversion mode on or off.
    ///
    /// In continuous mode the chip converts at the mains filter rate with
    /// bias permanently up. The 1-shot path never touches this bit; it is
    /// purely a caller-facing mode switch.
    pub fn auto_convert(&mut self, enable: bool) -> Max31865Result<(), S::Error> {
        let mut config = Configuration::new();
        config.read(self)?;
        config.set_auto_convert(enable);
        config.write(self)
    }

    /// Select 50 Hz mains rejection instead of the default 60 Hz.
    pub fn enable_50hz(&mut self, enable: bool) -> Max31865Result<(), S::Error> {
        let mut config = Configuration::new();
        config.read(self)?;
        config.set_filter_50hz(enable);
        config.write(self)
    }

    /// Program the fault comparator window.
    ///
    /// Values are raw codes in the format of the RTD result registers, i.e.
    /// the value returned by [`read_rtd`](Self::read_rtd) shifted left by
    /// one.
    pub fn set_thresholds(&mut self, lower: u16, upper: u16) -> Max31865Result<(), S::Error> {
        FaultThresholds { lower, upper }.write(self)
    }

    /// Read back the programmed low comparator threshold.
    pub fn lower_threshold(&mut self) -> Max31865Result<u16, S::Error> {
        self.read_u16(LOW_FAULT_MSB_REG)
    }

    /// Read back the programmed high comparator threshold.
    pub fn upper_threshold(&mut self) -> Max31865Result<u16, S::Error> {
        self.read_u16(HIGH_FAULT_MSB_REG)
    }

    /// Read the latched fault status register, unmodified.
    pub fn read_fault(&mut self) -> Max31865Result<FaultStatus, S::Error> {
        let mut status = FaultStatus::new();
        status.read(self)?;
        Ok(status)
    }

    /// Clear all latched fault bits.
    ///
    /// Writing 1 to the fault-status-clear bit also requires the 1-shot
    /// and fault-detection cycle bits to be written as 0, per the register
    /// contract; the bias, conversion-mode, wiring and filter bits are
    /// preserved. The clear is not read back for verification.
    pub fn clear_fault(&mut self) -> Max31865Result<(), S::Error> {
        let mut config = Configuration::new();
        config.read(self)?;
        config.set_one_shot(false);
        config.set_fault_cycle(0);
        config.set_fault_status_clear(true);
        config.write(self)
    }

    /// Run a single conversion and return the 15-bit resistance code.
    ///
    /// With bias normally off (the default), the sequence is: switch bias
    /// on, block [`BIAS_SETTLE_TIME_MS`], set the 1-shot trigger, block
    /// [`CONVERSION_TIME_MS`], read the result registers, switch bias back
    /// off. The two delays block the calling thread; the chip offers no
    /// conversion-complete signal on the bus, so the worst-case conversion
    /// time has to elapse before the result registers are valid.
    ///
    /// The returned code carries no fault information; the low fault-flag
    /// bit of the result registers is discarded. Poll
    /// [`read_fault`](Self::read_fault) separately.
    pub fn read_rtd(&mut self) -> Max31865Result<u16, S::Error> {
        if self.bias_normally_off {
            self.enable_bias(true)?;
            self.delay.delay_ms(BIAS_SETTLE_TIME_MS);
        }

        let mut config = Configuration::new();
        config.read(self)?;
        config.set_one_shot(true);
        config.write(self)?;
        self.delay.delay_ms(CONVERSION_TIME_MS);

        let raw = self.read_u16(RTD_MSB_REG)?;
        // Low bit is the fault flag, not part of the magnitude.
        let code = raw >> 1;

        if self.bias_normally_off {
            self.enable_bias(false)?;
        }
        Ok(code)
    }
}
