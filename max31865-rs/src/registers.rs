use crate::{
    Max31865, Max31865Error, Max31865Result,
    traits::{Addressing, Interact},
};
use bitfield_struct::bitfield;
use embedded_hal::{
    delay::DelayNs,
    spi::{Operation, SpiDevice},
};

pub(crate) const CONFIG_REG: u8 = 0x00; // Configuration register
pub(crate) const RTD_MSB_REG: u8 = 0x01; // RTD resistance data, high byte
pub(crate) const HIGH_FAULT_MSB_REG: u8 = 0x03; // High fault threshold, high byte
pub(crate) const HIGH_FAULT_LSB_REG: u8 = 0x04; // High fault threshold, low byte
pub(crate) const LOW_FAULT_MSB_REG: u8 = 0x05; // Low fault threshold, high byte
pub(crate) const LOW_FAULT_LSB_REG: u8 = 0x06; // Low fault threshold, low byte
pub(crate) const FAULT_STATUS_REG: u8 = 0x07; // Fault status register

// A register address is presented with its high bit set for a write
// access and clear for a read access.
pub(crate) const WRITE_MARKER: u8 = 0x80;

impl<S: SpiDevice, D: DelayNs> Max31865<S, D> {
    /// Read `buf.len()` register bytes starting at `addr` in a single
    /// blocking bus round trip. Multi-byte registers arrive most-significant
    /// byte first.
    pub(crate) fn read_register(
        &mut self,
        addr: u8,
        buf: &mut [u8],
    ) -> Max31865Result<(), S::Error> {
        let addr = [addr & !WRITE_MARKER];
        self.spi
            .transaction(&mut [Operation::Write(&addr), Operation::Read(buf)])?;
        Ok(())
    }

    pub(crate) fn read_u8(&mut self, addr: u8) -> Max31865Result<u8, S::Error> {
        let mut buf = [0u8; 1];
        self.read_register(addr, &mut buf)?;
        Ok(buf[0])
    }

    pub(crate) fn read_u16(&mut self, addr: u8) -> Max31865Result<u16, S::Error> {
        let mut buf = [0u8; 2];
        self.read_register(addr, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Write one register byte in a single blocking bus write.
    pub(crate) fn write_u8(&mut self, addr: u8, value: u8) -> Max31865Result<(), S::Error> {
        self.spi.write(&[addr | WRITE_MARKER, value])?;
        Ok(())
    }
}

/// # Configuration register
///
/// The single 8-bit register through which the MAX31865 operating mode is
/// selected. It holds the bias-voltage switch, the conversion mode, the
/// 1-shot trigger, the wiring compensation mode, the fault-detection cycle
/// controls and the mains filter selection.
///
/// The driver never caches this register: the chip clears the 1-shot bit on
/// its own once a conversion completes, and the fault-detection cycle bits
/// are self-clearing too, so a cached view goes stale. Every mutation reads
/// the register, modifies the target field and writes the result back.
#[bitfield(u8)]
pub struct Configuration {
    /// Mains rejection filter selection: `true` rejects 50 Hz, `false`
    /// rejects 60 Hz. Must only be changed while auto conversion is off.
    pub filter_50hz: bool,
    /// Fault status clear. Writing 1 clears all latched bits in the fault
    /// status register; the chip returns this bit and the fault-detection
    /// cycle bits to 0 on its own afterwards.
    pub fault_status_clear: bool,
    /// Fault-detection cycle control. Non-zero values start the manual or
    /// automatic fault-detection cycles; the chip clears the bits once the
    /// cycle has run.
    #[bits(2)]
    pub fault_cycle: u8,
    /// Wiring compensation: set for a 3-wire RTD, clear for 2- or 4-wire.
    pub three_wire: bool,
    /// 1-shot trigger. Setting this bit while bias is up starts a single
    /// conversion; it self-clears when the result registers are updated.
    pub one_shot: bool,
    /// Conversion mode: set for continuous conversions at the filter rate,
    /// clear for normally-off (1-shot) operation.
    pub auto_convert: bool,
    /// Bias voltage switch for the RTD excitation. Must be up and settled
    /// before a conversion produces a valid code.
    pub bias: bool,
}

impl Addressing for Configuration {
    const ADDR: u8 = CONFIG_REG;
}

impl Interact for Configuration {
    fn read<S: SpiDevice, D: DelayNs>(
        &mut self,
        dev: &mut Max31865<S, D>,
    ) -> Result<(), Max31865Error<S::Error>> {
        *self = Self::from_bits(dev.read_u8(Self::ADDR)?);
        Ok(())
    }

    fn write<S: SpiDevice, D: DelayNs>(
        &self,
        dev: &mut Max31865<S, D>,
    ) -> Result<(), Max31865Error<S::Error>> {
        dev.write_u8(Self::ADDR, self.into_bits())
    }
}

/// # Fault status register
///
/// Latched fault conditions detected during conversions and comparator
/// checks. Read-only; bits stay set until cleared through
/// [`clear_fault`](crate::Max31865::clear_fault).
#[bitfield(u8)]
pub struct FaultStatus {
    #[bits(2)]
    __: u8,
    /// Any input voltage above VDD or below GND1.
    pub overvoltage_undervoltage: bool,
    /// RTDIN- below 0.85 x Vbias (FORCE- open).
    pub rtdin_low: bool,
    /// REFIN- below 0.85 x Vbias (FORCE- open).
    pub refin_high: bool,
    /// REFIN- above 0.85 x Vbias.
    pub refin_low: bool,
    /// Conversion result at or below the programmed low threshold.
    pub under_threshold: bool,
    /// Conversion result at or above the programmed high threshold.
    pub over_threshold: bool,
}

impl FaultStatus {
    /// Whether any fault condition is latched.
    pub fn has_fault(&self) -> bool {
        self.into_bits() != 0
    }
}

impl Addressing for FaultStatus {
    const ADDR: u8 = FAULT_STATUS_REG;
}

impl Interact for FaultStatus {
    fn read<S: SpiDevice, D: DelayNs>(
        &mut self,
        dev: &mut Max31865<S, D>,
    ) -> Result<(), Max31865Error<S::Error>> {
        *self = Self::from_bits(dev.read_u8(Self::ADDR)?);
        Ok(())
    }

    /// The fault status register is read-only; faults are cleared through
    /// [`clear_fault`](crate::Max31865::clear_fault) instead.
    fn write<S: SpiDevice, D: DelayNs>(
        &self,
        _dev: &mut Max31865<S, D>,
    ) -> Result<(), Max31865Error<S::Error>> {
        Ok(())
    }
}

/// Fault comparator thresholds.
///
/// The chip compares every conversion result (including the fault flag bit)
/// against these two 16-bit registers and latches the threshold fault bits
/// when the result falls outside the window. The full open range
/// `(0x0000, 0xFFFF)` effectively disables the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultThresholds {
    /// Raw low comparator threshold, in the format returned by
    /// [`read_rtd`](crate::Max31865::read_rtd) shifted left by one.
    pub lower: u16,
    /// Raw high comparator threshold, same format as `lower`.
    pub upper: u16,
}

impl Default for FaultThresholds {
    fn default() -> Self {
        FaultThresholds {
            lower: 0x0000,
            upper: 0xFFFF,
        }
    }
}

impl Addressing for FaultThresholds {
    const ADDR: u8 = HIGH_FAULT_MSB_REG;
}

impl Interact for FaultThresholds {
    fn read<S: SpiDevice, D: DelayNs>(
        &mut self,
        dev: &mut Max31865<S, D>,
    ) -> Result<(), Max31865Error<S::Error>> {
        self.upper = dev.read_u16(HIGH_FAULT_MSB_REG)?;
        self.lower = dev.read_u16(LOW_FAULT_MSB_REG)?;
        Ok(())
    }

    /// Thresholds live in dedicated registers and are written
    /// unconditionally, low byte then high byte per threshold.
    fn write<S: SpiDevice, D: DelayNs>(
        &self,
        dev: &mut Max31865<S, D>,
    ) -> Result<(), Max31865Error<S::Error>> {
        dev.write_u8(LOW_FAULT_LSB_REG, (self.lower & 0xff) as u8)?;
        dev.write_u8(LOW_FAULT_MSB_REG, (self.lower >> 8) as u8)?;
        dev.write_u8(HIGH_FAULT_LSB_REG, (self.upper & 0xff) as u8)?;
        dev.write_u8(HIGH_FAULT_MSB_REG, (self.upper >> 8) as u8)?;
        Ok(())
    }
}

/// RTD lead configurations supported by the MAX31865.
///
/// The register format does not distinguish 2-wire from 4-wire; both use
/// the cleared wiring bit. 3-wire mode enables lead-resistance
/// compensation through the FORCE+ lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WiringMode {
    /// RTD connected with two leads.
    TwoWire,
    /// RTD connected with three leads.
    ThreeWire,
    /// RTD connected with four leads.
    FourWire,
}

/// Mains rejection filter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Reject 50 Hz mains noise.
    Hz50,
    /// Reject 60 Hz mains noise (chip default).
    #[default]
    Hz60,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_bit_layout() {
        assert_eq!(Configuration::new().with_bias(true).into_bits(), 0x80);
        assert_eq!(
            Configuration::new().with_auto_convert(true).into_bits(),
            0x40
        );
        assert_eq!(Configuration::new().with_one_shot(true).into_bits(), 0x20);
        assert_eq!(Configuration::new().with_three_wire(true).into_bits(), 0x10);
        assert_eq!(Configuration::new().with_fault_cycle(0b11).into_bits(), 0x0c);
        assert_eq!(
            Configuration::new().with_fault_status_clear(true).into_bits(),
            0x02
        );
        assert_eq!(Configuration::new().with_filter_50hz(true).into_bits(), 0x01);
    }

    #[test]
    fn configuration_round_trip() {
        let config = Configuration::from_bits(0b1101_0001);
        assert!(config.bias());
        assert!(config.auto_convert());
        assert!(!config.one_shot());
        assert!(config.three_wire());
        assert_eq!(config.fault_cycle(), 0);
        assert!(config.filter_50hz());
        assert_eq!(config.into_bits(), 0b1101_0001);
    }

    #[test]
    fn fault_status_bit_layout() {
        let status = FaultStatus::from_bits(0x80);
        assert!(status.over_threshold());
        assert!(status.has_fault());

        let status = FaultStatus::from_bits(0x44);
        assert!(status.under_threshold());
        assert!(status.overvoltage_undervoltage());
        assert!(!status.refin_low());

        assert!(!FaultStatus::from_bits(0x00).has_fault());
    }
}
