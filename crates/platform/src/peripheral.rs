//! Panel transport abstraction
//!
//! E-paper panels on the EXT4 board share one SPI bus that runs in two
//! electrical modes: the usual 4-wire write-mostly mode for commands and
//! image data, and a 3-wire half-duplex mode on the shared data line for
//! reading OTP. [`PanelBus`] captures both, plus the auxiliary I2C `begin`
//! the board needs for its sensors.
//!
//! Chip-select and data/command are plain GPIO driven by the panel driver,
//! not by the bus: the OTP protocol toggles CS around every single byte.

use embedded_hal::spi::SpiBus;

/// Byte-level transport to the panel.
pub trait PanelBus {
    /// Error type
    type Error: core::fmt::Debug;

    /// Start (or restart) the 4-wire bus with the given configuration.
    fn begin(&mut self, config: SpiConfig) -> Result<(), Self::Error>;

    /// Switch to 3-wire half-duplex mode for OTP reads.
    fn begin_three_wire(&mut self) -> Result<(), Self::Error>;

    /// Release the bus.
    fn end(&mut self) -> Result<(), Self::Error>;

    /// Write one byte.
    fn write(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Read one byte.
    fn read(&mut self) -> Result<u8, Self::Error>;

    /// Write a block of bytes.
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        for &byte in data {
            self.write(byte)?;
        }
        Ok(())
    }

    /// Start the auxiliary I2C bus for board features.
    fn begin_wire(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// SPI mode (CPOL, CPHA)
    pub mode: SpiMode,
    /// Bit order
    pub bit_order: BitOrder,
}

impl SpiConfig {
    /// Mode 0, MSB first: what every supported panel expects.
    pub const fn panel(frequency: u32) -> Self {
        Self {
            frequency,
            mode: SpiMode::Mode0,
            bit_order: BitOrder::MsbFirst,
        }
    }
}

/// SPI modes (CPOL, CPHA)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

/// Bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

/// [`PanelBus`] over an `embedded-hal` [`SpiBus`].
///
/// For boards that route the panel's bidirectional data line to both MOSI
/// and MISO: the 3-wire mode then needs no reconfiguration and reads are
/// plain bus reads.
///
/// `embedded-hal` has no way to change the SPI clock, so the model-dependent
/// frequency passed to [`PanelBus::begin`] is only recorded by
/// [`HalBus::new`]. Build the bus with [`HalBus::with_clock`] to have it
/// applied, or configure the `SpiBus` for the panel's rate beforehand.
pub struct HalBus<SPI> {
    spi: SPI,
    clock: Option<fn(&mut SPI, &SpiConfig)>,
    config: Option<SpiConfig>,
    three_wire: bool,
}

impl<SPI> HalBus<SPI> {
    /// Wrap an SPI bus. The clock requested by `begin` is recorded, not
    /// applied.
    pub fn new(spi: SPI) -> Self {
        Self {
            spi,
            clock: None,
            config: None,
            three_wire: false,
        }
    }

    /// Wrap an SPI bus and call `apply` with every configuration passed to
    /// `begin`, so the board can retune the peripheral clock.
    pub fn with_clock(spi: SPI, apply: fn(&mut SPI, &SpiConfig)) -> Self {
        Self {
            clock: Some(apply),
            ..Self::new(spi)
        }
    }

    /// Last configuration passed to [`PanelBus::begin`], `None` when ended.
    pub fn config(&self) -> Option<SpiConfig> {
        self.config
    }

    /// Whether the bus is in OTP read mode.
    pub fn is_three_wire(&self) -> bool {
        self.three_wire
    }

    /// Give the SPI bus back.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiBus> PanelBus for HalBus<SPI> {
    type Error = SPI::Error;

    fn begin(&mut self, config: SpiConfig) -> Result<(), Self::Error> {
        if let Some(apply) = self.clock {
            apply(&mut self.spi, &config);
        }
        self.config = Some(config);
        self.three_wire = false;
        Ok(())
    }

    fn begin_three_wire(&mut self) -> Result<(), Self::Error> {
        self.three_wire = true;
        Ok(())
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        self.config = None;
        self.three_wire = false;
        self.spi.flush()
    }

    fn write(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.spi.write(&[byte])
    }

    fn read(&mut self) -> Result<u8, Self::Error> {
        let mut byte = [0u8];
        self.spi.read(&mut byte)?;
        let [value] = byte;
        Ok(value)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.spi.write(data)
    }
}
