//! Off-screen pixel store addressed in physical panel coordinates.
//!
//! Drawing uses logical coordinates, which depend on the current
//! [`Rotation`]; every access is mapped to the physical grid before it
//! touches memory. Pixels are kept in the panel's native channel order (see
//! [`ColorOrder`]) so a frame can be streamed without further conversion.
//! It implements `embedded_graphics_core::DrawTarget` for the logical view.

use core::slice::ChunksExact;

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::{
        raw::{RawData, RawU16},
        Rgb565,
    },
    primitives::Rectangle,
    Pixel,
};

use crate::{
    graphics::{clip, Canvas},
    options::{ColorOrder, Rotation},
    ConfigurationError,
};

/// Widest physical row the transfer path can send in one piece.
pub const MAX_PANEL_WIDTH: u16 = 256;

/// Backing memory for a [`Framebuffer`], one `u16` per pixel.
pub trait PixelStorage {
    fn as_pixels(&self) -> &[u16];
    fn as_pixels_mut(&mut self) -> &mut [u16];
}

impl PixelStorage for &mut [u16] {
    fn as_pixels(&self) -> &[u16] {
        self
    }
    fn as_pixels_mut(&mut self) -> &mut [u16] {
        self
    }
}

impl<const N: usize> PixelStorage for [u16; N] {
    fn as_pixels(&self) -> &[u16] {
        self
    }
    fn as_pixels_mut(&mut self) -> &mut [u16] {
        self
    }
}

/// Rotation-aware framebuffer.
///
/// The physical dimensions are fixed at construction; only the logical view
/// changes with [`set_rotation`](Self::set_rotation).
pub struct Framebuffer<BUF> {
    buffer: BUF,
    width: u16,
    height: u16,
    rotation: Rotation,
    color_order: ColorOrder,
}

impl<BUF> Framebuffer<BUF>
where
    BUF: PixelStorage,
{
    /// Wraps `buffer` as a `width` x `height` physical framebuffer.
    pub fn new(
        buffer: BUF,
        width: u16,
        height: u16,
        color_order: ColorOrder,
    ) -> Result<Self, ConfigurationError> {
        if width == 0 || height == 0 || width > MAX_PANEL_WIDTH {
            return Err(ConfigurationError::InvalidDisplaySize);
        }
        let required = usize::from(width) * usize::from(height);
        let provided = buffer.as_pixels().len();
        if provided < required {
            return Err(ConfigurationError::BufferTooSmall { required, provided });
        }

        Ok(Self {
            buffer,
            width,
            height,
            rotation: Rotation::Deg0,
            color_order,
        })
    }

    /// Physical (unrotated) size.
    pub fn physical_size(&self) -> Size {
        Size::new(u32::from(self.width), u32::from(self.height))
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Changes the logical view. Stored pixels are not touched.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub fn color_order(&self) -> ColorOrder {
        self.color_order
    }

    /// Maps a logical coordinate to the physical grid for the current
    /// rotation. The result is only meaningful for in-bounds input.
    pub fn map_logical_to_physical(&self, point: Point) -> Point {
        let w = i32::from(self.width);
        let h = i32::from(self.height);
        let Point { x, y } = point;
        match self.rotation {
            Rotation::Deg0 => Point::new(x, y),
            Rotation::Deg90 => Point::new(y, h - 1 - x),
            Rotation::Deg180 => Point::new(w - 1 - x, h - 1 - y),
            Rotation::Deg270 => Point::new(w - 1 - y, x),
        }
    }

    /// Stored values of the active area, row-major, physical order.
    pub fn as_pixels(&self) -> &[u16] {
        let len = self.len();
        &self.buffer.as_pixels()[..len]
    }

    /// Physical rows, top to bottom.
    pub fn rows(&self) -> ChunksExact<'_, u16> {
        self.as_pixels().chunks_exact(usize::from(self.width))
    }

    /// Releases the backing storage.
    pub fn release(self) -> BUF {
        self.buffer
    }

    fn len(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Buffer index for a logical point, `None` when it is off the canvas.
    fn index_of(&self, point: Point) -> Option<usize> {
        let size = self.logical_size();
        if point.x < 0 || point.y < 0 || point.x as u32 >= size.width || point.y as u32 >= size.height
        {
            return None;
        }
        let p = self.map_logical_to_physical(point);
        if p.x < 0 || p.y < 0 || p.x >= i32::from(self.width) || p.y >= i32::from(self.height) {
            return None;
        }
        Some(p.y as usize * usize::from(self.width) + p.x as usize)
    }

    fn encode(&self, color: Rgb565) -> u16 {
        self.color_order.encode(RawU16::from(color).into_inner())
    }
}

impl<BUF> Canvas for Framebuffer<BUF>
where
    BUF: PixelStorage,
{
    fn logical_size(&self) -> Size {
        let physical = self.physical_size();
        if self.rotation.is_transposed() {
            Size::new(physical.height, physical.width)
        } else {
            physical
        }
    }

    fn set_pixel(&mut self, point: Point, color: Rgb565) {
        if let Some(index) = self.index_of(point) {
            let value = self.encode(color);
            self.buffer.as_pixels_mut()[index] = value;
        }
    }

    fn pixel(&self, point: Point) -> Rgb565 {
        match self.index_of(point) {
            Some(index) => {
                let stored = self.buffer.as_pixels()[index];
                Rgb565::from(RawU16::new(self.color_order.decode(stored)))
            }
            None => Rgb565::from(RawU16::new(0)),
        }
    }

    fn fill(&mut self, color: Rgb565) {
        let value = self.encode(color);
        let len = self.len();
        self.buffer.as_pixels_mut()[..len].fill(value);
    }

    fn fill_rect(&mut self, top_left: Point, size: Size, color: Rgb565) {
        let Some(area) = clip(self.logical_size(), top_left, size) else {
            return;
        };
        let value = self.encode(color);
        let width = usize::from(self.width);
        for y in area.top..area.bottom {
            for x in area.left..area.right {
                // The clipped area is inside the canvas, so the mapping is too.
                let p = self.map_logical_to_physical(Point::new(x, y));
                self.buffer.as_pixels_mut()[p.y as usize * width + p.x as usize] = value;
            }
        }
    }
}

impl<BUF> OriginDimensions for Framebuffer<BUF>
where
    BUF: PixelStorage,
{
    fn size(&self) -> Size {
        self.logical_size()
    }
}

impl<BUF> DrawTarget for Framebuffer<BUF>
where
    BUF: PixelStorage,
{
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_rect(area.top_left, area.size, color);
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}
