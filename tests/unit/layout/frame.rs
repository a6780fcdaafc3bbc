use super::*;
use serde_json::json;

#[test]
fn defaults_fill_missing_fields() {
    let layout: FrameLayout = serde_json::from_value(json!({
        "slots": [
            {"x": 0.0, "y": 0.0, "width": 0.5, "height": 0.5},
            {"x": 0.5, "y": 0.0, "width": 0.5, "height": 0.5},
            {"x": 0.0, "y": 0.5, "width": 0.5, "height": 0.5},
            {"x": 0.5, "y": 0.5, "width": 0.5, "height": 0.5}
        ]
    }))
    .unwrap();
    assert_eq!(layout.border_width, 15.0);
    assert_eq!(layout.footer_height_ratio, 0.08);
    assert_eq!(layout.slots, SlotRect::GRID_2X2);
    assert_eq!(layout.footer(), FooterContent::Empty);
    layout.validate().unwrap();
}

#[test]
fn legacy_field_names_are_accepted() {
    let layout: FrameLayout = serde_json::from_value(json!({
        "frameWidth": 18,
        "frameColor": "#001F3F",
        "slotColor": "#F5F5F0",
        "textColor": "#FFFFFF",
        "bottomText": "Hope",
        "title": "",
        "logoStyle": true,
        "fontFamily": "Inter, sans-serif",
        "slots": [
            {"x": 0, "y": 0, "width": 0.5, "height": 0.5},
            {"x": 0.5, "y": 0, "width": 0.5, "height": 0.5},
            {"x": 0, "y": 0.5, "width": 0.5, "height": 0.5},
            {"x": 0.5, "y": 0.5, "width": 0.5, "height": 0.5}
        ]
    }))
    .unwrap();
    assert_eq!(layout.border_width, 18.0);
    assert_eq!(layout.border_color, Color::rgb(0x00, 0x1f, 0x3f));
    assert!(layout.use_badge_style);
    assert_eq!(
        layout.footer(),
        FooterContent::Badge {
            primary: "Hope",
            secondary: None
        }
    );
}

#[test]
fn newline_caption_splits_into_lines() {
    let layout = FrameLayout {
        footer_text: Some("MERRY\nCHRISTMAS".to_string()),
        ..FrameLayout::default()
    };
    assert_eq!(
        layout.footer(),
        FooterContent::Lines(vec!["MERRY", "CHRISTMAS"])
    );
}

#[test]
fn blank_caption_is_treated_as_absent() {
    let layout = FrameLayout {
        footer_text: Some("   ".to_string()),
        ..FrameLayout::default()
    };
    assert_eq!(layout.caption(), None);
    assert_eq!(layout.footer(), FooterContent::Empty);
}

#[test]
fn caption_and_logo_are_mutually_exclusive() {
    let layout = FrameLayout {
        footer_text: Some("hi".to_string()),
        footer_logo_image: Some("logo.png".to_string()),
        ..FrameLayout::default()
    };
    let err = layout.validate().unwrap_err();
    assert!(err.to_string().contains("mutually exclusive"));
}

#[test]
fn slot_outside_interior_is_rejected() {
    let mut layout = FrameLayout::default();
    layout.slots[3] = SlotRect::new(0.6, 0.5, 0.5, 0.5);
    assert!(layout.validate().is_err());

    layout.slots[3] = SlotRect::new(-0.1, 0.5, 0.5, 0.5);
    assert!(layout.validate().is_err());
}

#[test]
fn footer_ratio_and_border_ranges() {
    let layout = FrameLayout {
        footer_height_ratio: 1.0,
        ..FrameLayout::default()
    };
    assert!(layout.validate().is_err());

    let layout = FrameLayout {
        border_width: f64::NAN,
        ..FrameLayout::default()
    };
    assert!(layout.validate().is_err());
}

#[test]
fn edge_detection_tolerates_float_sums() {
    let s = SlotRect::new(0.1 + 0.2, 0.0, 0.7, 1.0);
    assert!(s.reaches_right());
    assert!(s.reaches_bottom());
    assert!(!s.at_origin());
    assert!(SlotRect::GRID_2X2[0].at_origin());
}

#[test]
fn divider_width_defaults_to_border() {
    let mut layout = FrameLayout::default();
    assert_eq!(layout.divider_width(), 15.0);
    layout.divider_width = Some(10.0);
    assert_eq!(layout.divider_width(), 10.0);
}
