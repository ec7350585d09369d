use super::*;

#[test]
fn rgb_hex_forms() {
    let c = Rgb8::hex(0xEAB308);
    assert_eq!(c.to_hex(), "EAB308");
    assert_eq!(c.css(), "#eab308");
    assert_eq!(c.css_with_alpha(0x4d), "#eab3084d");
    assert_eq!(Rgb8::parse("#eab308").unwrap(), c);
    assert!(Rgb8::parse("eab30").is_err());
    assert!(Rgb8::parse("zzzzzz").is_err());
}

#[test]
fn rgb_serializes_as_hex_string() {
    let json = serde_json::to_string(&Rgb8::hex(0x3B82F6)).unwrap();
    assert_eq!(json, "\"3B82F6\"");
    let back: Rgb8 = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Rgb8::hex(0x3B82F6));
}

#[test]
fn slide_size_px_and_emu() {
    let s = SlideSize::WIDE_16_9;
    assert_eq!(s.to_px(96.0), (960, 540));
    assert_eq!(inches_to_emu(s.width_in), 9_144_000);
    assert!(SlideSize::new(0.0, 1.0).is_err());
}
