use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use super::Interface;

/// Spi interface error
#[derive(Clone, Copy, Debug)]
pub enum SpiError<SPI, DC> {
    Spi(SPI),
    Dc(DC),
}

/// 4-line serial interface: SPI plus a data/command select pin.
///
/// Chip-select is owned by the [`SpiDevice`], which asserts it for the
/// duration of every `write`, so each command and each data run is framed
/// separately on the bus.
pub struct SpiInterface<SPI, DC> {
    spi: SPI,
    dc: DC,
}

impl<SPI, DC> SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    /// Create new interface
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self { spi, dc }
    }

    /// Release the DC pin and SPI peripheral back, deconstructing the interface
    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }
}

impl<SPI, DC> Interface for SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    type Error = SpiError<SPI::Error, DC::Error>;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.dc.set_low().map_err(SpiError::Dc)?;
        self.spi.write(&[command]).map_err(SpiError::Spi)
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.dc.set_high().map_err(SpiError::Dc)?;
        self.spi.write(data).map_err(SpiError::Spi)
    }
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use embedded_hal::spi::{ErrorKind, ErrorType, Operation};

    use super::*;
    use crate::_mock::MockPin;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Transaction {
        Write { dc_high: bool, bytes: Vec<u8> },
    }

    #[derive(Default)]
    struct RecordingSpi {
        transactions: Vec<Vec<u8>>,
        fail: bool,
    }

    impl ErrorType for RecordingSpi {
        type Error = ErrorKind;
    }

    impl SpiDevice for RecordingSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), ErrorKind> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            let mut bytes = Vec::new();
            for op in operations {
                if let Operation::Write(data) = op {
                    bytes.extend_from_slice(data);
                }
            }
            self.transactions.push(bytes);
            Ok(())
        }
    }

    fn record(spi: &RecordingSpi, dc: &MockPin) -> Vec<Transaction> {
        spi.transactions
            .iter()
            .zip(dc.levels.iter())
            .map(|(bytes, &dc_high)| Transaction::Write {
                dc_high,
                bytes: bytes.clone(),
            })
            .collect()
    }

    #[test]
    fn command_and_data_use_separate_transactions() {
        let mut di = SpiInterface::new(RecordingSpi::default(), MockPin::default());
        di.send_command(0x2A).unwrap();
        di.send_data(&[0x00, 0x02, 0x00, 0x81]).unwrap();

        let (spi, dc) = di.release();
        assert_eq!(
            record(&spi, &dc),
            [
                Transaction::Write {
                    dc_high: false,
                    bytes: Vec::from([0x2A]),
                },
                Transaction::Write {
                    dc_high: true,
                    bytes: Vec::from([0x00, 0x02, 0x00, 0x81]),
                },
            ]
        );
    }

    #[test]
    fn bus_failure_is_propagated() {
        let spi = RecordingSpi {
            fail: true,
            ..Default::default()
        };
        let mut di = SpiInterface::new(spi, MockPin::default());
        assert!(matches!(
            di.send_data(&[1, 2]),
            Err(SpiError::Spi(ErrorKind::Other))
        ));
    }
}
