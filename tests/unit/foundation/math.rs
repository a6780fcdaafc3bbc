use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn premultiply_then_unpremultiply_keeps_opaque_and_clears_transparent() {
    let mut px = vec![10u8, 20, 30, 255, 200, 100, 50, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[10, 20, 30, 255]);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[10, 20, 30, 255]);
}

#[test]
fn half_alpha_unpremultiply_is_close_to_source() {
    let mut px = vec![200u8, 100, 50, 128];
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);
    for (got, want) in px[..3].iter().zip([200u8, 100, 50]) {
        assert!((i16::from(*got) - i16::from(want)).abs() <= 1);
    }
}

#[test]
fn reference_scale_uses_200_unit_width() {
    assert_eq!(reference_scale(1200.0), 6.0);
    assert_eq!(reference_scale(200.0), 1.0);
}
