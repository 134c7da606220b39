//! MIPI DCS commands used by the driver at runtime.
//!
//! Opcodes that only appear inside initialization scripts live next to the
//! model that sends them; this module holds the standard instructions and
//! typed wrappers for the commands whose parameters are computed.

use crate::{interface::Interface, options::ColorInversion};

/// Standard DCS instruction opcodes.
pub struct Instruction;

impl Instruction {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
}

/// A command with its parameter bytes.
pub trait DcsCommand {
    /// Returns the instruction code.
    fn instruction(&self) -> u8;

    /// Fills the given buffer with the command parameters and returns how
    /// many bytes were written.
    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize;
}

/// Sends [`DcsCommand`]s and raw instructions over an [`Interface`].
pub trait InterfaceExt: Interface {
    /// Sends a DCS command to the display.
    fn write_command(&mut self, command: impl DcsCommand) -> Result<(), Self::Error> {
        let mut param_bytes: [u8; 16] = [0; 16];
        let n = command.fill_params_buf(&mut param_bytes);
        self.write_raw(command.instruction(), &param_bytes[..n])
    }

    /// Sends an instruction followed by its parameters.
    ///
    /// The data phase is skipped entirely when `params` is empty.
    fn write_raw(&mut self, instruction: u8, params: &[u8]) -> Result<(), Self::Error> {
        self.send_command(instruction)?;
        if !params.is_empty() {
            self.send_data(params)?;
        }
        Ok(())
    }
}

impl<T: Interface + ?Sized> InterfaceExt for T {}

/// Starts a pixel data write at the top left of the address window.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteMemoryStart;

impl DcsCommand for WriteMemoryStart {
    fn instruction(&self) -> u8 {
        Instruction::RAMWR
    }

    fn fill_params_buf(&self, _buffer: &mut [u8]) -> usize {
        0
    }
}

/// Sets the column range of the address window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetColumnAddress {
    start: u16,
    end: u16,
}

impl SetColumnAddress {
    /// Creates a new column range, both ends inclusive.
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }
}

impl DcsCommand for SetColumnAddress {
    fn instruction(&self) -> u8 {
        Instruction::CASET
    }

    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize {
        fill_range(buffer, self.start, self.end)
    }
}

/// Sets the row (page) range of the address window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPageAddress {
    start: u16,
    end: u16,
}

impl SetPageAddress {
    /// Creates a new row range, both ends inclusive.
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }
}

impl DcsCommand for SetPageAddress {
    fn instruction(&self) -> u8 {
        Instruction::RASET
    }

    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize {
        fill_range(buffer, self.start, self.end)
    }
}

fn fill_range(buffer: &mut [u8], start: u16, end: u16) -> usize {
    buffer[0..2].copy_from_slice(&start.to_be_bytes());
    buffer[2..4].copy_from_slice(&end.to_be_bytes());
    4
}

/// Memory access control (MADCTL), the panel's orientation register.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SetAddressMode(u8);

impl SetAddressMode {
    /// Row address order, mirrors vertically.
    pub const MY: u8 = 0x80;
    /// Column address order, mirrors horizontally.
    pub const MX: u8 = 0x40;
    /// Row/column exchange.
    pub const MV: u8 = 0x20;
    /// Vertical refresh order.
    pub const ML: u8 = 0x10;
    /// BGR subpixel order.
    pub const BGR: u8 = 0x08;

    /// Wraps a raw register value.
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Raw register value.
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl DcsCommand for SetAddressMode {
    fn instruction(&self) -> u8 {
        Instruction::MADCTL
    }

    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize {
        buffer[0] = self.0;
        1
    }
}

/// Enter or exit display inversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetInvertMode(ColorInversion);

impl SetInvertMode {
    pub const fn new(inversion: ColorInversion) -> Self {
        Self(inversion)
    }
}

impl DcsCommand for SetInvertMode {
    fn instruction(&self) -> u8 {
        match self.0 {
            ColorInversion::Normal => Instruction::INVOFF,
            ColorInversion::Inverted => Instruction::INVON,
        }
    }

    fn fill_params_buf(&self, _buffer: &mut [u8]) -> usize {
        0
    }
}
