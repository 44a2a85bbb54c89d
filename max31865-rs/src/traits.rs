use crate::{Max31865, Max31865Error};
use embedded_hal::{delay::DelayNs, spi::SpiDevice};

/// Addresses of registers in the MAX31865.
pub trait Addressing {
    /// Register address with the read/write marker bit clear.
    const ADDR: u8;
}

/// Trait for interacting with the MAX31865 register file.
pub trait Interact: Addressing {
    /// Read the register value from the MAX31865.
    fn read<S: SpiDevice, D: DelayNs>(
        &mut self,
        dev: &mut Max31865<S, D>,
    ) -> Result<(), Max31865Error<S::Error>>;
    /// Write the register value to the MAX31865.
    fn write<S: SpiDevice, D: DelayNs>(
        &self,
        dev: &mut Max31865<S, D>,
    ) -> Result<(), Max31865Error<S::Error>>;
}
