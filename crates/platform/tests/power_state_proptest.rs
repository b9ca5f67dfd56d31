//! Property-based tests for the power-state flags.

use platform::{PowerState, SpiConfig};

proptest::proptest! {
    /// `contains` is a plain subset test on the raw flags.
    #[test]
    fn contains_matches_mask_subset(mask in 0u8..=0x1F) {
        for state in [PowerState::OFF, PowerState::GPIO, PowerState::ON, PowerState::SLEEP] {
            let expected = state.bits() & mask == mask;
            assert_eq!(state.contains(mask), expected,
                "state {} mask {:#x}", state.name(), mask);
        }
    }

    /// Any frequency survives `SpiConfig::panel` unchanged.
    #[test]
    fn panel_config_keeps_frequency(hz in 1u32..=u32::MAX) {
        assert_eq!(SpiConfig::panel(hz).frequency, hz);
    }
}
