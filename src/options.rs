//! [ModelOptions] and other helper types.

use crate::models::Model;

/// [ModelOptions] are passed to the [`init`](Model::init) method of [Model]
/// implementations.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ModelOptions {
    /// Channel order of stored pixels.
    pub color_order: ColorOrder,
    /// Initial display rotation.
    pub rotation: Rotation,
    /// Whether to invert colors for this display/model.
    pub invert_colors: ColorInversion,
    /// Start margin of the visible area inside the controller RAM, in the
    /// unrotated orientation.
    pub display_offset: (u16, u16),
}

impl ModelOptions {
    /// Creates model options for the entire framebuffer of model `M`.
    pub fn full_size<M: Model>() -> Self {
        Self {
            color_order: M::COLOR_ORDER,
            rotation: Rotation::default(),
            invert_colors: ColorInversion::default(),
            display_offset: M::DISPLAY_OFFSET,
        }
    }

    /// RAM offset for the current rotation; the axes swap with the panel.
    pub(crate) fn rotated_offset(&self) -> (u16, u16) {
        let (x, y) = self.display_offset;
        if self.rotation.is_transposed() {
            (y, x)
        } else {
            (x, y)
        }
    }
}

/// Display rotation, clockwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// No rotation.
    #[default]
    Deg0,
    /// 90° clockwise rotation.
    Deg90,
    /// 180° clockwise rotation.
    Deg180,
    /// 270° clockwise rotation.
    Deg270,
}

impl Rotation {
    /// All rotations, in register table order.
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Index into per-rotation tables, `0..=3`.
    pub const fn index(self) -> usize {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    /// Returns `true` if rows and columns are swapped.
    pub const fn is_transposed(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Rotates by 180° more.
    pub const fn opposite(self) -> Self {
        Self::ALL[(self.index() + 2) & 3]
    }
}

/// A rotation index outside `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRotation(pub u8);

impl TryFrom<u8> for Rotation {
    type Error = InvalidRotation;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(InvalidRotation(value))
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> Self {
        rotation.index() as u8
    }
}

/// Order in which pixels are stored in the framebuffer.
///
/// Callers always pass colors as RGB565. `Bgr` swaps the red and blue
/// fields on every store, for panels whose RAM expects BGR565.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorOrder {
    /// Store pixels unchanged.
    #[default]
    Rgb,
    /// Swap the 5-bit red and blue fields.
    Bgr,
}

impl ColorOrder {
    /// Converts a raw RGB565 value to the stored representation.
    pub const fn encode(self, rgb565: u16) -> u16 {
        match self {
            ColorOrder::Rgb => rgb565,
            ColorOrder::Bgr => swap_red_blue(rgb565),
        }
    }

    /// Converts a stored value back to RGB565.
    pub const fn decode(self, stored: u16) -> u16 {
        // The swap is an involution.
        self.encode(stored)
    }
}

const fn swap_red_blue(value: u16) -> u16 {
    let r = (value >> 11) & 0x1F;
    let g = (value >> 5) & 0x3F;
    let b = value & 0x1F;
    (b << 11) | (g << 5) | r
}

/// Color inversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorInversion {
    /// Normal colors.
    #[default]
    Normal,
    /// Inverted colors.
    Inverted,
}

impl From<bool> for ColorInversion {
    fn from(inverted: bool) -> Self {
        if inverted {
            ColorInversion::Inverted
        } else {
            ColorInversion::Normal
        }
    }
}
