use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use super::*;

fn solid(px: [u8; 4], n: usize) -> Vec<u8> {
    px.iter().copied().cycle().take(n * 4).collect()
}

#[test]
fn crossfade_endpoints_are_exact() {
    let a = [10, 20, 30, 255];
    let b = [200, 150, 100, 255];
    assert_eq!(crossfade(a, b, 0.0), a);
    assert_eq!(crossfade(a, b, 1.0), b);
}

#[test]
fn fade_endpoints_match_layers() {
    let from = solid([12, 34, 56, 255], 16);
    let to = solid([210, 180, 90, 255], 16);
    let mut dst = vec![0u8; from.len()];

    fade_in_place(&mut dst, &from, &to, 0.0).unwrap();
    assert_eq!(dst, from);
    fade_in_place(&mut dst, &from, &to, 1.0).unwrap();
    assert_eq!(dst, to);

    fade_in_place(&mut dst, &from, &to, 0.5).unwrap();
    assert!(dst[0] > from[0] && dst[0] < to[0]);
}

#[test]
fn fade_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(fade_in_place(&mut dst, &[0u8; 8], &[0u8; 4], 0.5).is_err());
}

#[test]
fn slide_shifts_columns_left() {
    // 4x1 strip: from = columns 0..4 tagged by red, to = tagged by green.
    let from: Vec<u8> = (0..4u8).flat_map(|x| [x, 0, 0, 255]).collect();
    let to: Vec<u8> = (0..4u8).flat_map(|x| [0, x, 0, 255]).collect();
    let mut dst = vec![0u8; 16];

    slide_in_place(&mut dst, &from, &to, 4, 1, 0.0).unwrap();
    assert_eq!(dst, from);

    slide_in_place(&mut dst, &from, &to, 4, 1, 0.5).unwrap();
    assert_eq!(
        dst,
        vec![2, 0, 0, 255, 3, 0, 0, 255, 0, 0, 0, 255, 0, 1, 0, 255]
    );

    slide_in_place(&mut dst, &from, &to, 4, 1, 1.0).unwrap();
    assert_eq!(dst, to);
}

#[test]
fn slide_checks_dimensions() {
    let mut dst = vec![0u8; 16];
    assert!(slide_in_place(&mut dst, &[0u8; 16], &[0u8; 16], 3, 1, 0.5).is_err());
}

#[test]
fn dissolve_is_reproducible_with_a_seed() {
    let from = solid([0, 0, 0, 255], 1000);
    let to = solid([255, 255, 255, 255], 1000);
    let mut a = vec![0u8; from.len()];
    let mut b = vec![0u8; from.len()];

    let na = dissolve_in_place(&mut a, &from, &to, 0.3, &mut Pcg64Mcg::seed_from_u64(7)).unwrap();
    let nb = dissolve_in_place(&mut b, &from, &to, 0.3, &mut Pcg64Mcg::seed_from_u64(7)).unwrap();
    assert_eq!(na, nb);
    assert_eq!(a, b);
}

#[test]
fn dissolve_extremes_are_total() {
    let from = solid([1, 2, 3, 255], 64);
    let to = solid([9, 8, 7, 255], 64);
    let mut dst = vec![0u8; from.len()];
    let mut rng = Pcg64Mcg::seed_from_u64(1);

    assert_eq!(dissolve_in_place(&mut dst, &from, &to, 0.0, &mut rng).unwrap(), 0);
    assert_eq!(dst, from);
    assert_eq!(dissolve_in_place(&mut dst, &from, &to, 1.0, &mut rng).unwrap(), 64);
    assert_eq!(dst, to);
}
