use super::*;

#[test]
fn hex_parses_short_long_and_alpha_forms() {
    assert_eq!(Rgba8::from_hex("#2e8b57").unwrap(), Rgba8::rgb(0x2e, 0x8b, 0x57));
    assert_eq!(Rgba8::from_hex("fff").unwrap(), Rgba8::WHITE);
    assert_eq!(
        Rgba8::from_hex("#00000080").unwrap(),
        Rgba8::rgba(0, 0, 0, 0x80)
    );
    assert!(Rgba8::from_hex("#12345").is_err());
    assert!(Rgba8::from_hex("#zzzzzz").is_err());
}

#[test]
fn hex_round_trips_through_serde() {
    let c: Rgba8 = serde_json::from_str("\"#28A745\"").unwrap();
    assert_eq!(c, Rgba8::rgb(0x28, 0xa7, 0x45));
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#28a745\"");
}

#[test]
fn lerp_matches_endpoints_and_rounds_midpoint() {
    let a = Rgba8::rgb(0, 100, 200);
    let b = Rgba8::rgb(255, 0, 100);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Rgba8::rgb(128, 50, 150));
}

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    let c = Canvas::new(4, 2).unwrap();
    assert_eq!(c.rgba8_len(), 32);
}

#[test]
fn fps_frame_duration() {
    let fps = Fps::new(2, 1).unwrap();
    assert_eq!(fps.frame_duration_secs(), 0.5);
    assert_eq!(fps.frames_to_secs(7), 3.5);
    assert!(Fps::new(0, 1).is_err());
}
