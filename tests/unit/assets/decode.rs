use std::io::Cursor;

use base64::Engine as _;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let photo = decode_image(&png_bytes(3, 2, [100, 50, 200, 128])).unwrap();
    assert_eq!(photo.natural_size(), (3, 2));
    assert_eq!(
        &photo.rgba8_premul[..4],
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage() {
    let err = decode_image(b"definitely not a png").unwrap_err();
    assert!(err.to_string().contains("decode image"));
}

#[test]
fn data_uri_round_trips_png_payload() {
    let png = png_bytes(4, 4, [0, 255, 0, 255]);
    let b64 = base64::engine::general_purpose::STANDARD.encode(&png);
    let uri = format!("data:image/png;base64,{b64}");
    let photo = decode_data_uri(&uri).unwrap();
    assert_eq!(photo.natural_size(), (4, 4));
    assert_eq!(&photo.rgba8_premul[..4], &[0, 255, 0, 255]);
}

#[test]
fn data_uri_tolerates_wrapped_payload() {
    let png = png_bytes(1, 1, [1, 2, 3, 255]);
    let b64 = base64::engine::general_purpose::STANDARD.encode(&png);
    let (a, b) = b64.split_at(b64.len() / 2);
    let uri = format!("data:image/png;base64,{a}\n{b}");
    assert!(decode_data_uri(&uri).is_ok());
}

#[test]
fn data_uri_rejects_malformed_headers() {
    for uri in [
        "image/png;base64,AAAA",
        "data:image/png;base64",
        "data:image/png,AAAA",
        "data:text/plain;base64,AAAA",
        "data:image/png;base64,@@@",
    ] {
        assert!(
            matches!(decode_data_uri(uri), Err(FourcutError::Decode(_))),
            "{uri}"
        );
    }
}

#[test]
fn parse_svg_ok_and_err() {
    let ok = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="5"></svg>"#;
    let tree = parse_svg(ok, None).unwrap();
    assert_eq!(tree.size().width(), 10.0);
    assert!(parse_svg(b"<svg", None).is_err());
}

#[test]
fn rasterize_svg_fills_requested_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
        <rect width="10" height="10" fill="#ff0000"/></svg>"##;
    let tree = parse_svg(svg, None).unwrap();
    let out = rasterize_svg(&tree, 20, 8).unwrap();
    assert_eq!(out.natural_size(), (20, 8));
    assert_eq!(out.rgba8_premul.len(), 20 * 8 * 4);
    assert_eq!(&out.rgba8_premul[..4], &[255, 0, 0, 255]);
    assert!(rasterize_svg(&tree, 0, 8).is_err());
}
