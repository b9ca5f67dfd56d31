//! OTP calibration reader
//!
//! The panel's OTP holds the two PSR bytes the fast update is built on. It
//! is read over the 3-wire half-duplex bus, one byte per CS frame, as a
//! stream starting at address 0 after one dummy byte:
//!
//! ```text
//! read:    dummy  OTP[0]  OTP[1] ...  OTP[sig]  ...  OTP[psr]  OTP[psr+1]
//!                 ^ bank signature    ^ recheck      ^ calibration
//! ```
//!
//! `OTP[0] == 0xA5` selects bank 0, anything else bank 1. Banked layouts
//! repeat the signature at the start of bank 1; reading anything but `0xA5`
//! there means the OTP content cannot be trusted.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use eink_specs::{OtpLayout, PanelProfile, ScreenModel};
use platform::PanelBus;

use crate::error::Error;
use crate::interface::PanelInterface;

/// Command enabling OTP read-out.
const OTP_READ: u8 = 0xA2;

/// Signature byte of a valid bank.
const SIGNATURE: u8 = 0xA5;

/// PSR bytes read from OTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration([u8; 2]);

impl Calibration {
    /// Placeholder for models with configuration embedded in the controller.
    pub const EMBEDDED: Self = Self([0x00, 0x00]);

    /// Calibration from its two PSR bytes.
    pub const fn new(psr: [u8; 2]) -> Self {
        Self(psr)
    }

    /// PSR bytes as read, used for global update.
    pub const fn psr(&self) -> [u8; 2] {
        self.0
    }

    /// PSR bytes with the fast update bits set.
    pub const fn fast_psr(&self) -> [u8; 2] {
        let [first, second] = self.0;
        [first | 0x10, second | 0x02]
    }
}

/// Read the calibration of `model`.
///
/// Models without OTP return [`Calibration::EMBEDDED`] and never touch the
/// bus. Otherwise the bus is left in 3-wire mode; the caller resets the
/// panel and restarts 4-wire SPI.
pub(crate) fn read_otp<BUS, DC, CS, BUSY, RST, PWR, DELAY>(
    interface: &mut PanelInterface<BUS, DC, CS, BUSY, RST, PWR, DELAY>,
    model: ScreenModel,
    profile: &PanelProfile,
) -> Result<Calibration, Error>
where
    BUS: PanelBus,
    DC: OutputPin,
    CS: OutputPin,
    BUSY: InputPin,
    RST: OutputPin,
    PWR: OutputPin,
    DELAY: DelayNs,
{
    if !profile.has_otp() {
        debug!("OTP embedded in controller");
        return Ok(Calibration::EMBEDDED);
    }

    interface.enter_otp(OTP_READ)?;
    let _dummy = interface.read_otp_byte()?;
    let signature = interface.read_otp_byte()?;
    let bank = u8::from(signature != SIGNATURE);
    let mut address: u16 = 1;

    if let OtpLayout::Fixed {
        bank1_override: Some(psr),
        ..
    } = profile.otp
    {
        if bank == 1 {
            info!("OTP bank 1, fixed PSR {:#x} {:#x}", psr[0], psr[1]);
            return Ok(Calibration::new(psr));
        }
    }

    let offsets = profile
        .otp
        .bank(bank)
        .ok_or(Error::UnsupportedModel(model))?;

    if offsets.signature > 0 {
        skip(interface, offsets.signature.saturating_sub(address))?;
        let check = interface.read_otp_byte()?;
        address = offsets.signature.saturating_add(1);
        if check != SIGNATURE {
            error!("OTP bank {} check read {:#x}", bank, check);
            return Err(Error::OtpBankMismatch { bank, found: check });
        }
    }

    skip(interface, offsets.psr.saturating_sub(address))?;
    let psr = [interface.read_otp_byte()?, interface.read_otp_byte()?];
    info!("OTP bank {}, PSR {:#x} {:#x}", bank, psr[0], psr[1]);
    Ok(Calibration::new(psr))
}

fn skip<BUS, DC, CS, BUSY, RST, PWR, DELAY>(
    interface: &mut PanelInterface<BUS, DC, CS, BUSY, RST, PWR, DELAY>,
    count: u16,
) -> Result<(), Error>
where
    BUS: PanelBus,
    DC: OutputPin,
    CS: OutputPin,
    BUSY: InputPin,
    RST: OutputPin,
    PWR: OutputPin,
    DELAY: DelayNs,
{
    for _ in 0..count {
        interface.read_otp_byte()?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use eink_specs::models::{
        EPD_213_KS_0E, EPD_266_KS_0C, EPD_271_KS_09, EPD_287_PS_09, EPD_290_KS_0F,
    };
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use platform::mocks::{Event, MockBoard};

    /// Stream as the panel sends it: one dummy byte, then OTP from address 0.
    fn otp_stream(len: usize, bytes: &[(usize, u8)]) -> Vec<u8> {
        let mut stream = vec![0x00; len + 1];
        for (address, value) in bytes {
            stream[address + 1] = *value;
        }
        stream
    }

    fn read(board: &MockBoard, model: ScreenModel) -> Result<Calibration, Error> {
        let mut interface = PanelInterface::new(board.bus(), board.pins(), NoopDelay::new());
        read_otp(&mut interface, model, model.profile().unwrap())
    }

    #[test]
    fn fast_psr_sets_mode_bits() {
        let calibration = Calibration::new([0x05, 0x40]);
        assert_eq!(calibration.psr(), [0x05, 0x40]);
        assert_eq!(calibration.fast_psr(), [0x15, 0x42]);
    }

    #[test]
    fn embedded_models_skip_the_bus() {
        let board = MockBoard::new();
        assert_eq!(read(&board, EPD_290_KS_0F).unwrap(), Calibration::EMBEDDED);
        assert!(board.events().is_empty());
    }

    #[test]
    fn banked_bank0_reads_primary_offset() {
        let board = MockBoard::new();
        board.queue_reads(&otp_stream(
            0x0FB6,
            &[(0, 0xA5), (0x0FB4, 0x25), (0x0FB5, 0x01)],
        ));
        assert_eq!(read(&board, EPD_266_KS_0C).unwrap().psr(), [0x25, 0x01]);
        // dummy + addresses 0..=0x0FB5
        assert_eq!(board.reads(), 0x0FB6 + 1);
        assert_eq!(board.count(Event::BeginThreeWire), 1);
        assert_eq!(board.commands(), vec![0xA2]);
    }

    #[test]
    fn banked_bank1_rechecks_signature() {
        let board = MockBoard::new();
        board.queue_reads(&otp_stream(
            0x1FB6,
            &[(0, 0x00), (0x1000, 0xA5), (0x1FB4, 0x33), (0x1FB5, 0x44)],
        ));
        assert_eq!(read(&board, EPD_266_KS_0C).unwrap().psr(), [0x33, 0x44]);
        assert_eq!(board.reads(), 0x1FB6 + 1);
    }

    #[test]
    fn bank1_mismatch_is_fatal() {
        let board = MockBoard::new();
        board.queue_reads(&otp_stream(0x0C01, &[(0, 0x00), (0x0C00, 0x5A)]));
        let err = read(&board, EPD_213_KS_0E).unwrap_err();
        assert_eq!(err, Error::OtpBankMismatch { bank: 1, found: 0x5A });
        assert!(err.is_fatal());
        // stopped right after the recheck byte
        assert_eq!(board.reads(), 0x0C01 + 1);
    }

    #[test]
    fn fixed_layout_bank0_reads_shared_offset() {
        let board = MockBoard::new();
        board.queue_reads(&otp_stream(
            0x004D,
            &[(0, 0xA5), (0x004B, 0xCF), (0x004C, 0x8D)],
        ));
        assert_eq!(read(&board, EPD_271_KS_09).unwrap().psr(), [0xCF, 0x8D]);
    }

    #[test]
    fn fixed_layout_bank1_reads_same_offset_without_recheck() {
        let board = MockBoard::new();
        board.queue_reads(&otp_stream(
            0x004D,
            &[(0, 0x00), (0x004B, 0x0F), (0x004C, 0x49)],
        ));
        assert_eq!(read(&board, EPD_287_PS_09).unwrap().psr(), [0x0F, 0x49]);
        // dummy + addresses 0..=0x4C, nothing more
        assert_eq!(board.reads(), 0x004D + 1);
    }

    #[test]
    fn e_family_bank0_reads_primary_offset() {
        let board = MockBoard::new();
        board.queue_reads(&otp_stream(
            0x0B1D,
            &[(0, 0xA5), (0x0B1B, 0x07), (0x0B1C, 0x20)],
        ));
        assert_eq!(read(&board, EPD_213_KS_0E).unwrap().psr(), [0x07, 0x20]);
        assert_eq!(board.reads(), 0x0B1D + 1);
    }

    #[test]
    fn e_family_bank1_reads_after_recheck() {
        let board = MockBoard::new();
        board.queue_reads(&otp_stream(
            0x171D,
            &[(0, 0x00), (0x0C00, 0xA5), (0x171B, 0x17), (0x171C, 0x22)],
        ));
        assert_eq!(read(&board, EPD_213_KS_0E).unwrap().psr(), [0x17, 0x22]);
        assert_eq!(board.reads(), 0x171D + 1);
    }

    #[test]
    fn ks_09_bank1_returns_fixed_pair() {
        let board = MockBoard::new();
        board.queue_reads(&[0x00, 0x12]);
        assert_eq!(read(&board, EPD_271_KS_09).unwrap().psr(), [0xCF, 0x82]);
        assert_eq!(board.reads(), 2);
    }
}
