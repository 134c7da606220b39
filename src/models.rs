//! Display models.

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::{
    dcs::{self, InterfaceExt, SetAddressMode},
    interface::Interface,
    options::{ColorInversion, ColorOrder, ModelOptions, Rotation},
    script::{self, CommandScript},
};

mod st7735r;

pub use st7735r::*;

/// Display model.
///
/// A model describes one panel variant: its controller RAM geometry, the
/// scripts that bring it up and the orientation register value for each
/// rotation.
pub trait Model {
    /// The framebuffer size in pixels, in the unrotated orientation.
    const FRAMEBUFFER_SIZE: (u16, u16);

    /// Default start margin of the visible area inside controller RAM.
    const DISPLAY_OFFSET: (u16, u16) = (0, 0);

    /// Default channel order of stored pixels.
    const COLOR_ORDER: ColorOrder = ColorOrder::Rgb;

    /// Duration of the active low reset pulse in ms.
    const RESET_DURATION: u32 = 100;

    /// Time to wait after releasing reset in ms.
    const RESET_RECOVERY: u32 = 100;

    /// Bring-up phases, executed in order.
    const INIT_SCRIPTS: &'static [CommandScript<'static>];

    /// Orientation register value for each rotation, indexed by
    /// [`Rotation::index`].
    const ADDRESS_MODES: [SetAddressMode; 4];

    /// Orientation register value for `rotation`.
    fn address_mode(rotation: Rotation) -> SetAddressMode {
        Self::ADDRESS_MODES[rotation.index()]
    }

    /// Initializes the display for this model and returns the value of
    /// MADCTL set by init.
    ///
    /// The hardware reset has already been performed by the caller.
    fn init<DELAY, DI>(
        &mut self,
        di: &mut DI,
        delay: &mut DELAY,
        options: &ModelOptions,
    ) -> Result<SetAddressMode, DI::Error>
    where
        DELAY: DelayNs,
        DI: Interface,
    {
        for (phase, commands) in Self::INIT_SCRIPTS.iter().enumerate() {
            debug!("init phase {} ({} commands)", phase + 1, commands.len());
            script::execute(di, delay, commands.iter().copied())?;
        }

        if options.invert_colors == ColorInversion::Inverted {
            di.write_command(dcs::SetInvertMode::new(options.invert_colors))?;
        }

        let madctl = Self::address_mode(options.rotation);
        if options.rotation != Rotation::Deg0 {
            di.write_command(madctl)?;
        }

        Ok(madctl)
    }

    /// Updates the address window of the display.
    ///
    /// Coordinates are absolute controller RAM positions, offsets included.
    fn update_address_window<DI>(
        di: &mut DI,
        sx: u16,
        sy: u16,
        ex: u16,
        ey: u16,
    ) -> Result<(), DI::Error>
    where
        DI: Interface,
    {
        di.write_command(dcs::SetColumnAddress::new(sx, ex))?;
        di.write_command(dcs::SetPageAddress::new(sy, ey))
    }

    ///
    /// We need WriteMemoryStart before writing pixels
    ///
    fn write_memory_start<DI>(di: &mut DI) -> Result<(), DI::Error>
    where
        DI: Interface,
    {
        di.write_command(dcs::WriteMemoryStart)
    }

    ///
    /// Writes the orientation register for `rotation` and returns the value
    /// written.
    ///
    fn update_rotation<DI>(di: &mut DI, rotation: Rotation) -> Result<SetAddressMode, DI::Error>
    where
        DI: Interface,
    {
        let madctl = Self::address_mode(rotation);
        di.write_command(madctl)?;
        Ok(madctl)
    }

    ///
    /// Enters or leaves display inversion.
    ///
    fn set_invert_mode<DI>(di: &mut DI, inversion: ColorInversion) -> Result<(), DI::Error>
    where
        DI: Interface,
    {
        di.write_command(dcs::SetInvertMode::new(inversion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        _mock::{Event, MockDelay, MockDisplayInterface},
        script::ScriptEntry,
    };

    struct TwoPhaseModel;

    impl Model for TwoPhaseModel {
        const FRAMEBUFFER_SIZE: (u16, u16) = (16, 8);
        const INIT_SCRIPTS: &'static [CommandScript<'static>] = &[
            &[ScriptEntry::CommandWithDelay {
                opcode: 0x01,
                args: &[],
                delay: 20,
            }],
            &[ScriptEntry::Command {
                opcode: 0x3A,
                args: &[0x05],
            }],
        ];
        const ADDRESS_MODES: [SetAddressMode; 4] = [
            SetAddressMode::new(0x00),
            SetAddressMode::new(0x60),
            SetAddressMode::new(0xC0),
            SetAddressMode::new(0xA0),
        ];
    }

    fn options(rotation: Rotation, invert_colors: ColorInversion) -> ModelOptions {
        let mut options = ModelOptions::full_size::<TwoPhaseModel>();
        options.rotation = rotation;
        options.invert_colors = invert_colors;
        options
    }

    #[test]
    fn init_runs_phases_in_order() {
        let mut di = MockDisplayInterface::new();
        let mut delay = MockDelay::default();

        let madctl = TwoPhaseModel
            .init(
                &mut di,
                &mut delay,
                &options(Rotation::Deg0, ColorInversion::Normal),
            )
            .unwrap();

        assert_eq!(madctl, SetAddressMode::new(0x00));
        assert_eq!(
            di.events,
            [
                Event::Command(0x01),
                Event::Command(0x3A),
                Event::Data([0x05].to_vec()),
            ]
        );
        assert_eq!(delay.sleeps_ms, [20]);
    }

    #[test]
    fn init_applies_rotation_and_inversion_after_scripts() {
        let mut di = MockDisplayInterface::new();
        let mut delay = MockDelay::default();

        let madctl = TwoPhaseModel
            .init(
                &mut di,
                &mut delay,
                &options(Rotation::Deg90, ColorInversion::Inverted),
            )
            .unwrap();

        assert_eq!(madctl.bits(), 0x60);
        assert_eq!(di.commands(), [0x01, 0x3A, 0x21, 0x36]);
        assert_eq!(di.params_of(0x36), Some(&[0x60][..]));
    }

    #[test]
    fn address_window_then_memory_write() {
        let mut di = MockDisplayInterface::new();
        TwoPhaseModel::update_address_window(&mut di, 2, 3, 129, 162).unwrap();
        TwoPhaseModel::write_memory_start(&mut di).unwrap();
        assert_eq!(
            di.events,
            [
                Event::Command(0x2A),
                Event::Data([0, 2, 0, 129].to_vec()),
                Event::Command(0x2B),
                Event::Data([0, 3, 0, 162].to_vec()),
                Event::Command(0x2C),
            ]
        );
    }
}
