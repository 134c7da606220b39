use crate::{
    dcs::{Instruction, SetAddressMode},
    models::Model,
    options::ColorOrder,
    script::{CommandScript, ScriptEntry, LONG_DELAY},
};

/// Sitronix vendor opcodes used during bring-up.
struct Cmd;

impl Cmd {
    const FRMCTR1: u8 = 0xB1;
    const FRMCTR2: u8 = 0xB2;
    const FRMCTR3: u8 = 0xB3;
    const INVCTR: u8 = 0xB4;
    const PWCTR1: u8 = 0xC0;
    const PWCTR2: u8 = 0xC1;
    const PWCTR3: u8 = 0xC2;
    const PWCTR4: u8 = 0xC3;
    const PWCTR5: u8 = 0xC4;
    const VMCTR1: u8 = 0xC5;
    const GMCTRP1: u8 = 0xE0;
    const GMCTRN1: u8 = 0xE1;
}

const MADCTL_DEFAULT: u8 = SetAddressMode::MX | SetAddressMode::MY | SetAddressMode::BGR;

/// Power, frame rate and pixel format setup.
const POWER_UP: CommandScript<'static> = &[
    ScriptEntry::CommandWithDelay {
        opcode: Instruction::SWRESET,
        args: &[],
        delay: 150,
    },
    ScriptEntry::CommandWithDelay {
        opcode: Instruction::SLPOUT,
        args: &[],
        delay: LONG_DELAY,
    },
    ScriptEntry::Command {
        opcode: Cmd::FRMCTR1,
        args: &[0x01, 0x2C, 0x2D],
    },
    ScriptEntry::Command {
        opcode: Cmd::FRMCTR2,
        args: &[0x01, 0x2C, 0x2D],
    },
    ScriptEntry::Command {
        opcode: Cmd::FRMCTR3,
        args: &[0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D],
    },
    ScriptEntry::Command {
        opcode: Cmd::INVCTR,
        args: &[0x07],
    },
    ScriptEntry::Command {
        opcode: Cmd::PWCTR1,
        args: &[0xA2, 0x02, 0x84],
    },
    ScriptEntry::Command {
        opcode: Cmd::PWCTR2,
        args: &[0xC5],
    },
    ScriptEntry::Command {
        opcode: Cmd::PWCTR3,
        args: &[0x0A, 0x00],
    },
    ScriptEntry::Command {
        opcode: Cmd::PWCTR4,
        args: &[0x8A, 0x2A],
    },
    ScriptEntry::Command {
        opcode: Cmd::PWCTR5,
        args: &[0x8A, 0xEE],
    },
    ScriptEntry::Command {
        opcode: Cmd::VMCTR1,
        args: &[0x0E],
    },
    ScriptEntry::Command {
        opcode: Instruction::INVOFF,
        args: &[],
    },
    ScriptEntry::Command {
        opcode: Instruction::MADCTL,
        args: &[MADCTL_DEFAULT],
    },
    ScriptEntry::Command {
        opcode: Instruction::COLMOD,
        args: &[0x05],
    },
];

/// Default address window.
const ADDRESS_DEFAULTS: CommandScript<'static> = &[
    ScriptEntry::Command {
        opcode: Instruction::CASET,
        args: &[0x00, 0x00, 0x00, 0x7F],
    },
    ScriptEntry::Command {
        opcode: Instruction::RASET,
        args: &[0x00, 0x00, 0x00, 0x7F],
    },
];

/// Gamma tables, then display on.
const GAMMA_DISPLAY_ON: CommandScript<'static> = &[
    ScriptEntry::Command {
        opcode: Cmd::GMCTRP1,
        args: &[
            0x02, 0x1c, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2d, 0x29, 0x25, 0x2B, 0x39, 0x00, 0x01,
            0x03, 0x10,
        ],
    },
    ScriptEntry::Command {
        opcode: Cmd::GMCTRN1,
        args: &[
            0x03, 0x1d, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D, 0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00,
            0x02, 0x10,
        ],
    },
    ScriptEntry::CommandWithDelay {
        opcode: Instruction::NORON,
        args: &[],
        delay: 10,
    },
    ScriptEntry::CommandWithDelay {
        opcode: Instruction::DISPON,
        args: &[],
        delay: 100,
    },
];

const INIT_SCRIPTS: &[CommandScript<'static>] = &[POWER_UP, ADDRESS_DEFAULTS, GAMMA_DISPLAY_ON];

const ADDRESS_MODES: [SetAddressMode; 4] = [
    SetAddressMode::new(MADCTL_DEFAULT),
    SetAddressMode::new(SetAddressMode::MY | SetAddressMode::MV | SetAddressMode::BGR),
    SetAddressMode::new(SetAddressMode::BGR),
    SetAddressMode::new(SetAddressMode::MX | SetAddressMode::MV | SetAddressMode::BGR),
];

/// ST7735R 1.8" display, 128x160, RGB565.
///
/// The panel RAM expects red and blue swapped, so stored pixels default to
/// [`ColorOrder::Bgr`].
pub struct ST7735R;

impl Model for ST7735R {
    const FRAMEBUFFER_SIZE: (u16, u16) = (128, 160);
    const COLOR_ORDER: ColorOrder = ColorOrder::Bgr;
    const INIT_SCRIPTS: &'static [CommandScript<'static>] = INIT_SCRIPTS;
    const ADDRESS_MODES: [SetAddressMode; 4] = ADDRESS_MODES;
}

/// ST7735R 1.44" display, 128x128 visible inside the 132x162 controller
/// RAM.
pub struct ST7735R144;

impl Model for ST7735R144 {
    const FRAMEBUFFER_SIZE: (u16, u16) = (128, 128);
    const DISPLAY_OFFSET: (u16, u16) = (2, 3);
    const COLOR_ORDER: ColorOrder = ColorOrder::Bgr;
    const INIT_SCRIPTS: &'static [CommandScript<'static>] = INIT_SCRIPTS;
    const ADDRESS_MODES: [SetAddressMode; 4] = ADDRESS_MODES;
}
