use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TimelineError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TimelineError::feed_load("x")
            .to_string()
            .contains("feed load error:")
    );
    assert!(
        TimelineError::image_load("x")
            .to_string()
            .contains("image load error:")
    );
    assert!(TimelineError::render("x").to_string().contains("render error:"));
    assert!(TimelineError::export("x").to_string().contains("export error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TimelineError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
