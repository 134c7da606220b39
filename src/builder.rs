//! [super::Display] builder module

use embedded_graphics_core::pixelcolor::{Rgb565, RgbColor};
use embedded_hal::{delay::DelayNs, digital};
use log::debug;

use crate::{
    framebuffer::{Framebuffer, PixelStorage, MAX_PANEL_WIDTH},
    graphics::Canvas,
    interface::Interface,
    models::Model,
    options::{ColorInversion, ColorOrder, ModelOptions, Rotation},
    Display,
};

/// Builder for [Display] instances.
///
/// Exposes all possible display options.
///
/// # Examples
///
/// ```ignore
/// use st7735_fb::{Builder, options::Rotation, models::ST7735R, interface::SpiInterface};
///
/// let di = SpiInterface::new(spi, dc);
/// let mut pixels = [0u16; 128 * 160];
/// let mut display = Builder::new(ST7735R, di, &mut pixels[..])
///     .rotation(Rotation::Deg90)
///     .reset_pin(rst)
///     .backlight_pin(bl)
///     .init(&mut delay)?;
/// ```
pub struct Builder<DI, MODEL, BUF, RST, BL>
where
    DI: Interface,
    MODEL: Model,
{
    di: DI,
    model: MODEL,
    buffer: BUF,
    rst: Option<RST>,
    bl: Option<BL>,
    options: ModelOptions,
}

impl<DI, MODEL, BUF> Builder<DI, MODEL, BUF, NoPin, NoPin>
where
    DI: Interface,
    MODEL: Model,
    BUF: PixelStorage,
{
    ///
    /// Constructs a new builder for given [Model].
    ///
    #[must_use]
    pub fn new(model: MODEL, di: DI, buffer: BUF) -> Self {
        Self {
            di,
            model,
            buffer,
            rst: None,
            bl: None,
            options: ModelOptions::full_size::<MODEL>(),
        }
    }
}

impl<DI, MODEL, BUF, RST, BL> Builder<DI, MODEL, BUF, RST, BL>
where
    DI: Interface,
    MODEL: Model,
    BUF: PixelStorage,
    RST: digital::OutputPin,
    BL: digital::OutputPin,
{
    ///
    /// Sets the initial rotation. Applied after the init scripts.
    ///
    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.options.rotation = rotation;
        self
    }

    ///
    /// Sets the channel order pixels are stored in.
    ///
    #[must_use]
    pub fn color_order(mut self, color_order: ColorOrder) -> Self {
        self.options.color_order = color_order;
        self
    }

    ///
    /// Sets the invert color flag
    ///
    #[must_use]
    pub fn invert_colors(mut self, color_inversion: ColorInversion) -> Self {
        self.options.invert_colors = color_inversion;
        self
    }

    ///
    /// Sets the start margin of the visible area inside controller RAM, in
    /// the unrotated orientation.
    ///
    #[must_use]
    pub fn display_offset(mut self, x: u16, y: u16) -> Self {
        self.options.display_offset = (x, y);
        self
    }

    ///
    /// Sets the reset pin. Without one no hardware reset is performed and
    /// the scripts' software reset does the job.
    ///
    #[must_use]
    pub fn reset_pin<RST2: digital::OutputPin>(self, rst: RST2) -> Builder<DI, MODEL, BUF, RST2, BL> {
        Builder {
            di: self.di,
            model: self.model,
            buffer: self.buffer,
            rst: Some(rst),
            bl: self.bl,
            options: self.options,
        }
    }

    ///
    /// Sets the backlight pin, driven high during init.
    ///
    #[must_use]
    pub fn backlight_pin<BL2: digital::OutputPin>(self, bl: BL2) -> Builder<DI, MODEL, BUF, RST, BL2> {
        Builder {
            di: self.di,
            model: self.model,
            buffer: self.buffer,
            rst: self.rst,
            bl: Some(bl),
            options: self.options,
        }
    }

    ///
    /// Consumes the builder to create a new [Display] with an optional reset [OutputPin](digital::OutputPin).
    /// Blocks using the provided [DelayNs] `delay_source` to perform the display initialization.
    /// The display is cleared to black in memory; nothing is shown until
    /// [Display::present] is called.
    ///
    pub fn init(
        mut self,
        delay_source: &mut impl DelayNs,
    ) -> Result<Display<DI, MODEL, BUF, RST, BL>, InitError<DI::Error, RST::Error, BL::Error>> {
        let (width, height) = MODEL::FRAMEBUFFER_SIZE;
        validate_offset((width, height), self.options.display_offset)
            .map_err(InitError::InvalidConfiguration)?;

        let mut framebuffer = Framebuffer::new(self.buffer, width, height, self.options.color_order)
            .map_err(InitError::InvalidConfiguration)?;

        if let Some(ref mut bl) = self.bl {
            bl.set_high().map_err(InitError::BacklightPin)?;
        }

        if let Some(ref mut rst) = self.rst {
            debug!("hardware reset");
            rst.set_low().map_err(InitError::ResetPin)?;
            delay_source.delay_ms(MODEL::RESET_DURATION);
            rst.set_high().map_err(InitError::ResetPin)?;
            delay_source.delay_ms(MODEL::RESET_RECOVERY);
        }

        let madctl = self
            .model
            .init(&mut self.di, delay_source, &self.options)
            .map_err(InitError::Interface)?;

        framebuffer.set_rotation(self.options.rotation);
        framebuffer.fill(Rgb565::BLACK);
        debug!(
            "display ready: {}x{}, {:?}, madctl {:#04x}",
            width,
            height,
            self.options.rotation,
            madctl.bits()
        );

        Ok(Display {
            di: self.di,
            model: self.model,
            framebuffer,
            rst: self.rst,
            bl: self.bl,
            options: self.options,
            madctl,
        })
    }
}

/// Checks that the visible area plus its start margin stays within the
/// controller's 8-bit coordinate range in every rotation.
fn validate_offset(size: (u16, u16), offset: (u16, u16)) -> Result<(), ConfigurationError> {
    let longest = u32::from(size.0.max(size.1));
    let margin = u32::from(offset.0.max(offset.1));
    if longest + margin > u32::from(MAX_PANEL_WIDTH) {
        return Err(ConfigurationError::InvalidDisplayOffset);
    }
    Ok(())
}

/// Error returned by [`Builder::init`].
#[derive(Debug)]
pub enum InitError<DI, RST, BL> {
    /// Error caused by the display interface.
    Interface(DI),

    /// Error caused by the reset pin's [`OutputPin`](embedded_hal::digital::OutputPin) implementation.
    ResetPin(RST),

    /// Error caused by the backlight pin's [`OutputPin`](embedded_hal::digital::OutputPin) implementation.
    BacklightPin(BL),

    /// Invalid configuration error.
    ///
    /// This error is returned when the configuration passed to the builder is
    /// invalid. For example, when the pixel storage is smaller than the panel.
    InvalidConfiguration(ConfigurationError),
}

/// Specifics of [InitError::InvalidConfiguration] if configuration was found invalid
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Width or height is zero, or the width exceeds the transfer row buffer.
    InvalidDisplaySize,
    /// The start offset pushes the visible area out of controller RAM.
    InvalidDisplayOffset,
    /// The pixel storage holds fewer pixels than the panel has.
    BufferTooSmall { required: usize, provided: usize },
}

/// Marker type for an absent pin.
pub enum NoPin {}

impl digital::OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl digital::ErrorType for NoPin {
    type Error = core::convert::Infallible;
}
