#[derive(Debug)]
/// MAX31865 Hardware Errors
pub enum Max31865Error<E> {
    /// SPI bus errors.
    Spi(E),
}

impl<E> From<E> for Max31865Error<E> {
    fn from(value: E) -> Self {
        Self::Spi(value)
    }
}
