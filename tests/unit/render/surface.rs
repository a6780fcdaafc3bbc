use super::*;

fn checker(w: u32, h: u32) -> RasterSurface {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            if (x + y) % 2 == 0 {
                data.extend_from_slice(&[255, 255, 255, 255]);
            } else {
                data.extend_from_slice(&[0, 64, 0, 128]);
            }
        }
    }
    RasterSurface {
        width: w,
        height: h,
        data,
    }
}

#[test]
fn pixel_lookup_is_bounds_checked() {
    let s = checker(3, 2);
    assert_eq!(s.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(1, 0), Some([0, 64, 0, 128]));
    assert_eq!(s.pixel(3, 0), None);
    assert_eq!(s.pixel(0, 2), None);
}

#[test]
fn rgba_image_is_unpremultiplied() {
    let img = checker(2, 1).to_rgba_image().unwrap();
    assert_eq!(img.get_pixel(1, 0).0, [0, 128, 0, 128]);
}

#[test]
fn png_decodes_back_to_same_size() {
    let s = checker(5, 4);
    let png = s.to_png_bytes().unwrap();
    let back = image::load_from_memory(&png).unwrap();
    assert_eq!((back.width(), back.height()), (5, 4));
}

#[test]
fn jpeg_and_data_urls_carry_mime_types() {
    let s = checker(8, 8);
    let jpeg = s.to_jpeg_bytes(90).unwrap();
    assert_eq!(&jpeg[..2], &[0xff, 0xd8]);

    let png_url = s.to_data_url(ExportFormat::Png).unwrap();
    assert!(png_url.starts_with("data:image/png;base64,"));
    let jpeg_url = s.to_data_url(ExportFormat::Jpeg { quality: 80 }).unwrap();
    assert!(jpeg_url.starts_with("data:image/jpeg;base64,"));
}

#[test]
fn content_key_is_stable_sha256_hex() {
    let a = checker(4, 4).content_key().unwrap();
    let b = checker(4, 4).content_key().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_ne!(a, checker(4, 5).content_key().unwrap());
}

#[test]
fn sha256_hex_known_vector() {
    assert_eq!(
        sha256_hex(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn mismatched_surface_is_a_render_error() {
    let s = RasterSurface {
        width: 2,
        height: 2,
        data: vec![0; 4],
    };
    assert!(matches!(s.to_rgba_image(), Err(FourcutError::Render(_))));
}

#[test]
fn write_png_creates_parent_dirs() {
    let path = std::path::PathBuf::from("target")
        .join("unit_surface")
        .join("nested")
        .join("out.png");
    let _ = std::fs::remove_file(&path);
    checker(3, 3).write_png(&path).unwrap();
    assert!(path.exists());
}
