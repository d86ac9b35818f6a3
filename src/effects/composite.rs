use rand::Rng;

use crate::foundation::error::{TimelineError, TimelineResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

pub fn crossfade(a: PremulRgba8, b: PremulRgba8, t: f32) -> PremulRgba8 {
    let t = t.clamp(0.0, 1.0);
    let tt = ((t * 255.0).round() as i32).clamp(0, 255) as u16;
    let it = 255u16 - tt;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let av = mul_div255(u16::from(a[i]), it);
        let bv = mul_div255(u16::from(b[i]), tt);
        out[i] = add_sat_u8(av, bv);
    }
    out
}

fn check_layers(dst: &[u8], from: &[u8], to: &[u8], what: &str) -> TimelineResult<()> {
    if dst.len() != from.len() || dst.len() != to.len() || !dst.len().is_multiple_of(4) {
        return Err(TimelineError::render(format!(
            "{what} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

/// Write the cross-fade of `from` (weight `1 - t`) and `to` (weight `t`) into `dst`.
///
/// `t == 0` reproduces `from` byte for byte and `t == 1` reproduces `to`.
pub fn fade_in_place(dst: &mut [u8], from: &[u8], to: &[u8], t: f32) -> TimelineResult<()> {
    check_layers(dst, from, to, "fade_in_place")?;
    for ((d, a), b) in dst
        .chunks_exact_mut(4)
        .zip(from.chunks_exact(4))
        .zip(to.chunks_exact(4))
    {
        let out = crossfade([a[0], a[1], a[2], a[3]], [b[0], b[1], b[2], b[3]], t);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Horizontal push: `from` moves left by `t * width` pixels while `to` enters from the right
/// edge by the same offset.
pub fn slide_in_place(
    dst: &mut [u8],
    from: &[u8],
    to: &[u8],
    width: u32,
    height: u32,
    t: f32,
) -> TimelineResult<()> {
    check_layers(dst, from, to, "slide_in_place")?;
    let w = width as usize;
    let row = w * 4;
    if dst.len() != row * height as usize {
        return Err(TimelineError::render(
            "slide_in_place expects buffers matching width*height*4",
        ));
    }

    let offset = ((t.clamp(0.0, 1.0) * width as f32).round() as usize).min(w);
    let keep = w - offset;
    for y in 0..height as usize {
        let base = y * row;
        // Columns [0, keep) show `from` shifted left; [keep, w) show the leading edge of `to`.
        dst[base..base + keep * 4].copy_from_slice(&from[base + offset * 4..base + row]);
        dst[base + keep * 4..base + row].copy_from_slice(&to[base..base + offset * 4]);
    }
    Ok(())
}

/// Stochastic dissolve: each pixel independently takes `to`'s value with probability `t`,
/// otherwise `from`'s. Returns the number of revealed pixels.
pub fn dissolve_in_place<R: Rng + ?Sized>(
    dst: &mut [u8],
    from: &[u8],
    to: &[u8],
    t: f32,
    rng: &mut R,
) -> TimelineResult<usize> {
    check_layers(dst, from, to, "dissolve_in_place")?;
    let t = t.clamp(0.0, 1.0);
    let mut revealed = 0usize;
    for ((d, a), b) in dst
        .chunks_exact_mut(4)
        .zip(from.chunks_exact(4))
        .zip(to.chunks_exact(4))
    {
        if rng.random::<f32>() < t {
            d.copy_from_slice(b);
            revealed += 1;
        } else {
            d.copy_from_slice(a);
        }
    }
    Ok(revealed)
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
