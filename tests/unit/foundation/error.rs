use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FourcutError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(FourcutError::decode("x").to_string().contains("decode error:"));
    assert!(FourcutError::render("x").to_string().contains("render error:"));
    assert!(
        FourcutError::session("x")
            .to_string()
            .contains("session error:")
    );
    assert!(
        FourcutError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FourcutError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
