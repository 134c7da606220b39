#![no_std]

//! This crate provides a framebuffered driver for ST7735 TFT displays.
//!
//! Drawing happens in memory, in logical coordinates that follow the
//! current [`Rotation`](options::Rotation). Nothing reaches the panel until
//! [`Display::present`] streams the whole framebuffer over the bus, one row
//! per transfer.
//!
//! ## Example
//! ```ignore
//! use embedded_graphics_core::{geometry::Point, pixelcolor::{Rgb565, RgbColor}};
//! use st7735_fb::{
//!     graphics::Canvas,
//!     interface::SpiInterface,
//!     models::ST7735R,
//!     options::Rotation,
//!     Builder,
//! };
//!
//! let di = SpiInterface::new(spi, dc);
//! let mut pixels = [0u16; 128 * 160];
//! let mut display = Builder::new(ST7735R, di, &mut pixels[..])
//!     .reset_pin(rst)
//!     .backlight_pin(bl)
//!     .rotation(Rotation::Deg90)
//!     .init(&mut delay)
//!     .unwrap();
//!
//! display.fill_circle(Point::new(80, 64), 20, Rgb565::RED);
//! display.present().unwrap();
//! ```
//!
//! Any [`embedded_graphics`](https://docs.rs/embedded-graphics) drawable can
//! be drawn as well, since [`Display`] and [`Framebuffer`](framebuffer::Framebuffer)
//! implement `DrawTarget`.

#[cfg(test)]
extern crate std;

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::Rgb565,
    primitives::Rectangle,
    Pixel,
};
use embedded_hal::digital::OutputPin;
use log::debug;

pub mod interface;

pub mod options;
use options::{ColorInversion, Rotation};

mod builder;
pub use builder::*;

pub mod dcs;
use dcs::SetAddressMode;

pub mod framebuffer;
use framebuffer::{Framebuffer, PixelStorage};

pub mod graphics;
use graphics::Canvas;

pub mod models;
use models::Model;

pub mod script;
pub mod transfer;

#[cfg(test)]
mod _mock;

///
/// Display driver to connect to TFT displays.
///
/// Obtained from [`Builder::init`], so the panel is always initialized
/// before anything can be drawn or presented.
///
pub struct Display<DI, MODEL, BUF, RST, BL>
where
    DI: interface::Interface,
    MODEL: Model,
    BUF: PixelStorage,
    RST: OutputPin,
    BL: OutputPin,
{
    // DCS provider
    di: DI,
    // Model
    model: MODEL,
    framebuffer: Framebuffer<BUF>,
    // Reset pin
    rst: Option<RST>,
    // Backlight pin
    bl: Option<BL>,
    // Model Options, includes current rotation
    options: options::ModelOptions,
    // Current MADCTL value copy for runtime updates
    madctl: SetAddressMode,
}

impl<DI, M, BUF, RST, BL> Display<DI, M, BUF, RST, BL>
where
    DI: interface::Interface,
    M: Model,
    BUF: PixelStorage,
    RST: OutputPin,
    BL: OutputPin,
{
    ///
    /// Returns currently set rotation
    ///
    pub fn rotation(&self) -> Rotation {
        self.options.rotation
    }

    ///
    /// Sets display rotation.
    ///
    /// The orientation register is written first; the logical canvas only
    /// changes if that write succeeds. Pixels already in the framebuffer are
    /// not moved.
    ///
    pub fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DI::Error> {
        let madctl = M::update_rotation(&mut self.di, rotation)?;
        debug!("rotation {:?}, madctl {:#04x}", rotation, madctl.bits());
        self.madctl = madctl;
        self.options.rotation = rotation;
        self.framebuffer.set_rotation(rotation);
        Ok(())
    }

    /// Value last written to the orientation register.
    pub fn madctl(&self) -> SetAddressMode {
        self.madctl
    }

    ///
    /// Enters or leaves panel color inversion. The framebuffer is unchanged.
    ///
    pub fn invert_colors(&mut self, inversion: ColorInversion) -> Result<(), DI::Error> {
        M::set_invert_mode(&mut self.di, inversion)?;
        debug!("inversion {:?}", inversion);
        self.options.invert_colors = inversion;
        Ok(())
    }

    /// Turns the backlight on. Does nothing without a backlight pin.
    pub fn backlight_on(&mut self) -> Result<(), BL::Error> {
        if let Some(bl) = self.bl.as_mut() {
            debug!("backlight on");
            bl.set_high()?;
        }
        Ok(())
    }

    /// Turns the backlight off. Does nothing without a backlight pin.
    pub fn backlight_off(&mut self) -> Result<(), BL::Error> {
        if let Some(bl) = self.bl.as_mut() {
            debug!("backlight off");
            bl.set_low()?;
        }
        Ok(())
    }

    ///
    /// Sends the whole framebuffer to the panel.
    ///
    /// Sets the address window to the full physical extent, shifted by the
    /// start offset for the current rotation, then writes every row. Blocks
    /// until the last row is sent. On a bus error the panel may show a
    /// partial frame; calling `present` again resends everything.
    ///
    pub fn present(&mut self) -> Result<(), DI::Error> {
        let size = self.framebuffer.physical_size();
        let (ox, oy) = self.options.rotated_offset();
        // Validated at init: offset plus size fits in the controller range.
        let ex = ox + size.width as u16 - 1;
        let ey = oy + size.height as u16 - 1;

        M::update_address_window(&mut self.di, ox, oy, ex, ey)?;
        M::write_memory_start(&mut self.di)?;
        transfer::write_frame(&mut self.di, &self.framebuffer)
    }

    /// The in-memory frame.
    pub fn framebuffer(&self) -> &Framebuffer<BUF> {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer<BUF> {
        &mut self.framebuffer
    }

    ///
    /// Release resources allocated to this driver back.
    /// This returns the display interface, the model, the pixel storage and
    /// the pins if they were set.
    ///
    pub fn release(self) -> (DI, M, BUF, Option<RST>, Option<BL>) {
        (
            self.di,
            self.model,
            self.framebuffer.release(),
            self.rst,
            self.bl,
        )
    }
}

impl<DI, M, BUF, RST, BL> Canvas for Display<DI, M, BUF, RST, BL>
where
    DI: interface::Interface,
    M: Model,
    BUF: PixelStorage,
    RST: OutputPin,
    BL: OutputPin,
{
    fn logical_size(&self) -> Size {
        self.framebuffer.logical_size()
    }

    fn set_pixel(&mut self, point: Point, color: Rgb565) {
        self.framebuffer.set_pixel(point, color);
    }

    fn pixel(&self, point: Point) -> Rgb565 {
        self.framebuffer.pixel(point)
    }

    fn fill(&mut self, color: Rgb565) {
        self.framebuffer.fill(color);
    }

    fn fill_rect(&mut self, top_left: Point, size: Size, color: Rgb565) {
        self.framebuffer.fill_rect(top_left, size, color);
    }
}

impl<DI, M, BUF, RST, BL> OriginDimensions for Display<DI, M, BUF, RST, BL>
where
    DI: interface::Interface,
    M: Model,
    BUF: PixelStorage,
    RST: OutputPin,
    BL: OutputPin,
{
    fn size(&self) -> Size {
        self.framebuffer.logical_size()
    }
}

impl<DI, M, BUF, RST, BL> DrawTarget for Display<DI, M, BUF, RST, BL>
where
    DI: interface::Interface,
    M: Model,
    BUF: PixelStorage,
    RST: OutputPin,
    BL: OutputPin,
{
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.framebuffer.draw_iter(pixels)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.framebuffer.fill_solid(area, color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.framebuffer.clear(color)
    }
}
