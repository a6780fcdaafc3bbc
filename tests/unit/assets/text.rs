use super::*;

const WHITE: TextBrushRgba8 = TextBrushRgba8 {
    r: 255,
    g: 255,
    b: 255,
    a: 255,
};

#[test]
fn empty_library_resolves_nothing_and_skips_layout() {
    let mut lib = FontLibrary::new();
    assert!(lib.is_empty());
    assert_eq!(lib.resolve("Inter, sans-serif"), None);
    assert!(lib.layout_line("Hope", "Inter", 24.0, WHITE).unwrap().is_none());
}

#[test]
fn layout_rejects_bad_sizes() {
    let mut lib = FontLibrary::new();
    assert!(lib.layout_line("x", "Inter", 0.0, WHITE).is_err());
    assert!(lib.layout_line("x", "Inter", f32::NAN, WHITE).is_err());
}

#[test]
fn add_font_rejects_non_font_bytes() {
    let mut lib = FontLibrary::new();
    assert!(lib.add_font(b"not a font".to_vec()).is_err());
    assert!(lib.is_empty());
}

#[test]
fn load_dir_ignores_other_files_and_bad_fonts() {
    let dir = std::path::PathBuf::from("target").join("unit_font_dir");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("readme.txt"), b"hello").unwrap();
    std::fs::write(dir.join("broken.ttf"), b"garbage").unwrap();

    let lib = FontLibrary::load_dir(&dir).unwrap();
    assert!(lib.is_empty());
    assert!(FontLibrary::load_dir(&dir.join("missing")).is_err());
}

#[test]
fn font_extension_filter() {
    assert!(is_font_file(Path::new("a/Inter.TTF")));
    assert!(is_font_file(Path::new("b.otf")));
    assert!(is_font_file(Path::new("c.ttc")));
    assert!(!is_font_file(Path::new("d.woff2")));
    assert!(!is_font_file(Path::new("noext")));
}

fn fixture_font() -> Vec<u8> {
    std::fs::read("tests/data/fonts/Tuffy.ttf").unwrap()
}

#[test]
fn registered_font_resolves_and_lays_out() {
    let mut lib = FontLibrary::new();
    let family = lib.add_font(fixture_font()).unwrap();
    assert_eq!(family, "Tuffy");
    assert_eq!(lib.families().collect::<Vec<_>>(), vec!["Tuffy"]);
    assert_eq!(lib.resolve("\"tuffy\", serif"), Some("Tuffy"));
    assert_eq!(lib.resolve("Playfair Display, serif"), Some("Tuffy"));

    let short = lib.layout_line("Hope", "Inter", 24.0, WHITE).unwrap().unwrap();
    let long = lib
        .layout_line("PEACE ATTIC", "Inter", 24.0, WHITE)
        .unwrap()
        .unwrap();
    assert!(short.width() > 0.0 && short.height() > 0.0);
    assert!(long.width() > 2.0 * short.width());
    assert_eq!(long.layout.lines().count(), 1);
}
