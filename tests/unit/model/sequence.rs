use super::*;
use crate::model::frame::Period;

fn frame(year: i32, month: u8) -> Frame {
    Frame::new(Period { year, month }, format!("{month}/{year}"))
        .with_image("ndvi", Some(format!("/media/{year}-{month}.png")))
}

#[test]
fn accepts_strictly_increasing_periods() {
    let seq = FrameSequence::new(vec![frame(2023, 12), frame(2024, 1), frame(2024, 2)]).unwrap();
    assert_eq!(seq.len(), 3);
    assert_eq!(seq.last_index(), Some(2));
    assert_eq!(seq[1].period, Period { year: 2024, month: 1 });
}

#[test]
fn rejects_duplicate_or_descending_periods() {
    assert!(FrameSequence::new(vec![frame(2024, 1), frame(2024, 1)]).is_err());
    assert!(FrameSequence::new(vec![frame(2024, 2), frame(2024, 1)]).is_err());
}

#[test]
fn empty_sequence_has_no_last_index() {
    let seq = FrameSequence::new(Vec::new()).unwrap();
    assert!(seq.is_empty());
    assert_eq!(seq.last_index(), None);
}

#[test]
fn image_urls_clamps_range_and_skips_missing() {
    let mut frames = vec![frame(2024, 1), frame(2024, 2), frame(2024, 3)];
    frames[1] = frames[1].clone().with_image("ndvi", None);
    let seq = FrameSequence::new(frames).unwrap();
    assert_eq!(
        seq.image_urls("ndvi", 0..10),
        vec!["/media/2024-1.png".to_string(), "/media/2024-3.png".to_string()]
    );
    assert!(seq.image_urls("ndvi", 5..10).is_empty());
}
