/// Deterministic per-tag colours.
///
/// A tag's colour is its family's base colour nudged by a jitter taken from
/// a BLAKE3 hash of the tag string, so `jpeg` and `png` are both recognisably
/// "image" yet distinct, and every run renders the same tag identically.
use super::Family;
use crate::model::Rgba;

/// Two independent fractions in [0, 1) derived from `tag`.
pub fn jitter_fractions(tag: &str) -> (f32, f32) {
    let hash = blake3::hash(tag.as_bytes());
    let bytes = hash.as_bytes();
    let mut first = [0u8; 8];
    let mut second = [0u8; 8];
    first.copy_from_slice(&bytes[..8]);
    second.copy_from_slice(&bytes[8..16]);
    (unit_fraction(u64::from_le_bytes(first)), unit_fraction(u64::from_le_bytes(second)))
}

/// Top 24 bits of `bits` as a fraction in [0, 1); exact in `f32`.
fn unit_fraction(bits: u64) -> f32 {
    (bits >> 40) as f32 / (1u64 << 24) as f32
}

/// Colour for `tag` within `family`. Hue moves by up to `±hue_jitter`,
/// saturation by up to `±saturation_jitter`.
pub fn tag_color(tag: &str, family: Family, hue_jitter: f32, saturation_jitter: f32) -> Rgba {
    let (h0, s0, v) = family.base_hsv();
    let (jh, js) = jitter_fractions(tag);
    let hue = (h0 + (jh - 0.5) * 2.0 * hue_jitter).rem_euclid(1.0);
    let sat = (s0 + (js - 0.5) * 2.0 * saturation_jitter).clamp(0.0, 1.0);
    hsv_to_rgba(hue, sat, v)
}

/// HSV (all in [0, 1]) to opaque RGBA.
pub fn hsv_to_rgba(h: f32, s: f32, v: f32) -> Rgba {
    let h6 = h.rem_euclid(1.0) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgba { r, g, b, a: 1.0 }
}
