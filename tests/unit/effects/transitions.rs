use super::*;

#[test]
fn kind_parses_aliases() {
    assert_eq!(parse_transition("Fade").unwrap(), TransitionKind::Fade);
    assert_eq!(parse_transition(" crossfade ").unwrap(), TransitionKind::Fade);
    assert_eq!(parse_transition("cut").unwrap(), TransitionKind::None);
    assert_eq!("dissolve".parse::<TransitionKind>().unwrap(), TransitionKind::Dissolve);
}

#[test]
fn kind_rejects_unknown_and_empty() {
    assert!(parse_transition("").is_err());
    assert!(parse_transition("wipe").is_err());
}

#[test]
fn serde_uses_lowercase_names() {
    let k: TransitionKind = serde_json::from_str("\"slide\"").unwrap();
    assert_eq!(k, TransitionKind::Slide);
    assert!(TransitionKind::None.is_cut());
    assert!(!TransitionKind::Fade.is_cut());
}
