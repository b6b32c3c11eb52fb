//! Persisted microphone settings.
#![cfg(feature = "serde")]
#![allow(clippy::unwrap_used)]

use pdm_mic::PdmConfig;
use platform::ChannelMode;

#[test]
fn test_settings_from_json() {
    let cfg: PdmConfig =
        serde_json::from_str(r#"{"sample_rate":48000,"mode":"Stereo"}"#).unwrap();
    assert_eq!(cfg, PdmConfig::new(48_000, ChannelMode::Stereo).unwrap());
}

#[test]
fn test_out_of_range_rate_rejected_on_load() {
    let res: Result<PdmConfig, _> = serde_json::from_str(r#"{"sample_rate":0,"mode":"Mono"}"#);
    assert!(res.is_err());
    let res: Result<PdmConfig, _> =
        serde_json::from_str(r#"{"sample_rate":500000,"mode":"Mono"}"#);
    assert!(res.is_err());
}

#[test]
fn test_default_serializes_as_plain_hz() {
    let json = serde_json::to_string(&PdmConfig::default()).unwrap();
    assert_eq!(json, r#"{"sample_rate":16000,"mode":"Mono"}"#);
}
