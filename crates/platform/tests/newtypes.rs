//! Type system enforcement tests for the platform newtypes.
//! These newtypes keep invalid rates and generator ids out of the driver.
#![allow(clippy::unwrap_used)]

// ── SampleRateHz ─────────────────────────────────────────────────────────────

#[test]
fn sample_rate_hz_rejects_zero() {
    use platform::audio_types::SampleRateHz;
    let err = SampleRateHz::new(0).unwrap_err();
    assert_eq!(err.value, 0);
    assert_eq!(err.min, 1);
}

#[test]
fn sample_rate_hz_accepts_pdm_rates() {
    use platform::audio_types::SampleRateHz;
    for hz in [8_000, 16_000, 32_000, 44_100, 48_000, 192_000] {
        assert!(SampleRateHz::new(hz).is_ok(), "{hz} Hz should be accepted");
    }
}

#[test]
fn sample_rate_hz_rejects_above_maximum() {
    use platform::audio_types::SampleRateHz;
    // 192001 × 64 would exceed the I2S serial clock ceiling
    assert!(SampleRateHz::new(192_001).is_err());
}

#[test]
fn sample_rate_hz_is_four_bytes() {
    use platform::audio_types::SampleRateHz;
    assert_eq!(core::mem::size_of::<SampleRateHz>(), 4);
}

#[test]
fn sample_rate_hz_try_from_matches_new() {
    use platform::audio_types::SampleRateHz;
    assert_eq!(SampleRateHz::try_from(16_000), SampleRateHz::new(16_000));
    assert_eq!(u32::from(SampleRateHz::new(16_000).unwrap()), 16_000);
}

// ── GclkId ───────────────────────────────────────────────────────────────────

#[test]
fn gclk_id_accepts_all_generators() {
    use platform::clock::GclkId;
    for id in 0..=8 {
        assert_eq!(GclkId::new(id).unwrap().get(), id);
    }
}

#[test]
fn gclk_id_rejects_out_of_range() {
    use platform::clock::GclkId;
    assert!(GclkId::new(9).is_err());
    assert!(GclkId::new(255).is_err());
}

#[test]
fn gclk3_is_the_default_generator() {
    use platform::clock::GclkId;
    assert_eq!(GclkId::gclk3(), GclkId::new(3).unwrap());
}

// ── ChannelMode ──────────────────────────────────────────────────────────────

#[test]
fn channel_mode_defaults_to_mono() {
    use platform::audio_types::ChannelMode;
    assert_eq!(ChannelMode::default(), ChannelMode::Mono);
    assert_eq!(ChannelMode::default().channels(), 1);
}

#[test]
fn voice_rate_constant() {
    use platform::audio_types::SampleRateHz;
    assert_eq!(SampleRateHz::VOICE, SampleRateHz::new(16_000).unwrap());
}
