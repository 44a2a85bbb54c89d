//! Mock bus plumbing shared by the unit tests.

use embedded_hal::delay::DelayNs;
use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;

use crate::registers::WRITE_MARKER;

/// Expected bus traffic for one 8-bit register read returning `value`.
pub(crate) fn read8(addr: u8, value: u8) -> [SpiTransaction<u8>; 4] {
    [
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(vec![addr & !WRITE_MARKER]),
        SpiTransaction::read_vec(vec![value]),
        SpiTransaction::transaction_end(),
    ]
}

/// Expected bus traffic for one 16-bit register read returning `bytes`,
/// most-significant byte first.
pub(crate) fn read16(addr: u8, bytes: [u8; 2]) -> [SpiTransaction<u8>; 4] {
    [
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(vec![addr & !WRITE_MARKER]),
        SpiTransaction::read_vec(bytes.to_vec()),
        SpiTransaction::transaction_end(),
    ]
}

/// Expected bus traffic for one 8-bit register write of `value`.
pub(crate) fn write8(addr: u8, value: u8) -> [SpiTransaction<u8>; 3] {
    [
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(vec![addr | WRITE_MARKER, value]),
        SpiTransaction::transaction_end(),
    ]
}

/// A delay that only records how long it was asked to block.
#[derive(Debug, Default)]
pub(crate) struct RecordingDelay {
    pub(crate) elapsed_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}
