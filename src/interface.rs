//! Bus transport between the driver and the panel controller.

mod spi;
pub use spi::*;

/// Command and data transport.
///
/// Every call is one complete transfer: implementations select command or
/// data mode, frame the bytes with chip-select and block until they are
/// on the wire.
pub trait Interface {
    /// Error type
    type Error: core::fmt::Debug;

    /// Send a single command byte with the D/C line in command mode.
    fn send_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send a run of parameter or pixel bytes with the D/C line in data mode.
    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: Interface + ?Sized> Interface for &mut T {
    type Error = T::Error;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        T::send_command(self, command)
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::send_data(self, data)
    }
}
