//! Streaming the framebuffer to panel RAM.

use heapless::Vec;
use log::trace;

use crate::{
    framebuffer::{Framebuffer, PixelStorage, MAX_PANEL_WIDTH},
    interface::Interface,
};

/// Bytes in the widest row the panel path accepts.
pub const ROW_BUFFER_LEN: usize = MAX_PANEL_WIDTH as usize * 2;

/// Sends every physical row of `framebuffer` as one data transfer,
/// top to bottom, each pixel high byte first.
///
/// The address window and the memory write command must already be set.
pub(crate) fn write_frame<DI, BUF>(
    di: &mut DI,
    framebuffer: &Framebuffer<BUF>,
) -> Result<(), DI::Error>
where
    DI: Interface,
    BUF: PixelStorage,
{
    let size = framebuffer.physical_size();
    trace!("writing {} rows of {} pixels", size.height, size.width);

    for (index, line) in framebuffer.rows().enumerate() {
        // Rows are at most MAX_PANEL_WIDTH pixels, checked by Framebuffer::new.
        let row: Vec<u8, ROW_BUFFER_LEN> = line.iter().flat_map(|px| px.to_be_bytes()).collect();
        trace!("row {}: {} bytes", index, row.len());
        di.send_data(&row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use embedded_graphics_core::{geometry::Point, pixelcolor::Rgb565};

    use super::*;
    use crate::{
        _mock::{Event, MockBusError, MockDisplayInterface},
        graphics::Canvas,
        options::ColorOrder,
    };

    fn framebuffer() -> Framebuffer<[u16; 12]> {
        let mut fb = Framebuffer::new([0; 12], 4, 3, ColorOrder::Rgb).unwrap();
        fb.set_pixel(Point::new(0, 0), Rgb565::new(0x1F, 0, 0x01));
        fb.set_pixel(Point::new(3, 2), Rgb565::new(0, 0x3F, 0));
        fb
    }

    #[test]
    fn one_transfer_per_row() {
        let mut di = MockDisplayInterface::new();
        write_frame(&mut di, &framebuffer()).unwrap();

        let rows = di.data();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == 4 * 2));
        assert_eq!(rows.iter().map(|row| row.len()).sum::<usize>(), 4 * 3 * 2);
        assert!(di.commands().is_empty());
    }

    #[test]
    fn pixels_are_sent_high_byte_first() {
        let mut di = MockDisplayInterface::new();
        write_frame(&mut di, &framebuffer()).unwrap();

        let rows = di.data();
        assert_eq!(&rows[0][..2], &[0xF8, 0x01]);
        assert_eq!(&rows[2][6..], &[0x07, 0xE0]);
    }

    #[test]
    fn widest_row_fits_the_buffer() {
        let mut storage = [0xABCDu16; MAX_PANEL_WIDTH as usize];
        let fb = Framebuffer::new(
            &mut storage[..],
            MAX_PANEL_WIDTH,
            1,
            ColorOrder::Rgb,
        )
        .unwrap();
        let mut di = MockDisplayInterface::new();
        write_frame(&mut di, &fb).unwrap();

        let rows = di.data();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), ROW_BUFFER_LEN);
        assert_eq!(&rows[0][ROW_BUFFER_LEN - 2..], &[0xAB, 0xCD]);
    }

    #[test]
    fn bus_failure_stops_the_frame() {
        let mut di = MockDisplayInterface::failing_after(1);
        assert_eq!(write_frame(&mut di, &framebuffer()), Err(MockBusError));
        assert_eq!(di.events.len(), 1);
        assert!(matches!(di.events[0], Event::Data(_)));
    }
}
