//! Property-based tests for the divider calculation and the driver's
//! handling of rejected rates.
#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use pdm_mic::clock_math::{compute, ClockError, MAX_SERIAL_DIVISOR, OVERSAMPLING_RATIO};
use pdm_mic::mock::MockI2s;
use pdm_mic::{DriverState, PdmMic, PinBinding};
use platform::{ClockSource, GclkId, I2s, PinId, AUDIO_PLL_HZ};
use proptest::prelude::*;

fn any_source() -> impl Strategy<Value = ClockSource> {
    prop_oneof![
        Just(ClockSource::Dfll48m),
        Just(ClockSource::Osc8m),
        Just(ClockSource::Fdpll96m(AUDIO_PLL_HZ)),
        (32_000_000u32..=96_000_000u32).prop_map(ClockSource::Fdpll96m),
    ]
}

proptest! {
    /// Any accepted configuration reproduces the bit clock exactly.
    #[test]
    fn accepted_divisors_are_exact(
        hz in 1u32..=200_000u32,
        source in any_source(),
        gclk in 0u8..=8u8,
    ) {
        let gclk = GclkId::new(gclk).unwrap();
        if let Ok(cfg) = compute(hz, source, gclk) {
            let total = u64::from(cfg.gclk_divisor) * u64::from(cfg.serial_divisor);
            prop_assert_eq!(u64::from(cfg.bit_clock_hz) * total, u64::from(source.frequency_hz()));
            prop_assert_eq!(cfg.bit_clock_hz, hz * OVERSAMPLING_RATIO);
            prop_assert_eq!(cfg.sample_rate_hz(), hz);
            prop_assert!(cfg.gclk_divisor >= 1 && cfg.gclk_divisor <= gclk.max_divisor());
            prop_assert!(cfg.serial_divisor >= 1);
            prop_assert!(u32::from(cfg.serial_divisor) <= MAX_SERIAL_DIVISOR);
        }
    }

    /// An inexact rejection really means the reference does not divide.
    #[test]
    fn not_exact_means_remainder(hz in 1u32..=192_000u32, source in any_source()) {
        if let Err(ClockError::NotExact { required_hz, reference_hz }) =
            compute(hz, source, GclkId::gclk3())
        {
            prop_assert!(reference_hz % required_hz != 0 || reference_hz < required_hz);
        }
    }

    /// Calculation never panics, whatever the input.
    #[test]
    fn compute_never_panics(hz in any::<u32>(), source in any_source()) {
        let _ = compute(hz, source, GclkId::gclk3());
    }

    /// A rejected rate leaves a running driver running with its old divisors.
    #[test]
    fn rejected_rate_keeps_driver_running(hz in 1u32..=400_000u32) {
        // SAFETY: private mock, no real peripheral.
        let i2s = unsafe { I2s::steal() };
        let binding = PinBinding::new(PinId::pa(10), PinId::pa(8)).unwrap();
        let mut mic = PdmMic::new(i2s, MockI2s::new(), binding);
        mic.begin().unwrap();
        mic.configure(16_000, false).unwrap();
        let before = mic.clock_config();

        if mic.configure(hz, false).is_err() {
            prop_assert_eq!(mic.state(), DriverState::Running);
            prop_assert_eq!(mic.clock_config(), before);
        } else {
            prop_assert_eq!(mic.clock_config().unwrap().sample_rate_hz(), hz);
        }
    }
}
