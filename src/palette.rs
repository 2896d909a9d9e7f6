//! Colour tables for the charts: viridis for the trend lines, Paired for bars and wedges.

use crate::realiterator::Linspace;
use plotters::style::RGBColor;

/// viridis sampled every 1/8
const VIRIDIS_ANCHORS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

const PAIRED: [RGBColor; 12] = [
    RGBColor(166, 206, 227),
    RGBColor(31, 120, 180),
    RGBColor(178, 223, 138),
    RGBColor(51, 160, 44),
    RGBColor(251, 154, 153),
    RGBColor(227, 26, 28),
    RGBColor(253, 191, 111),
    RGBColor(255, 127, 0),
    RGBColor(202, 178, 214),
    RGBColor(106, 61, 154),
    RGBColor(255, 255, 153),
    RGBColor(177, 89, 40),
];

/// colour at position t in [0, 1] along viridis, linear between anchors
pub fn viridis_at(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0. } else { t.max(0.).min(1.) };
    let last = VIRIDIS_ANCHORS.len() - 1;
    let scaled = t * last as f64;
    let i = (scaled.floor() as usize).min(last - 1);
    let frac = scaled - i as f64;
    let (r0, g0, b0) = VIRIDIS_ANCHORS[i];
    let (r1, g1, b1) = VIRIDIS_ANCHORS[i + 1];
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

/// n colours evenly spaced over viridis, first and last included
pub fn viridis(n: usize) -> Vec<RGBColor> {
    Linspace::new(0., 1., n as u64).map(viridis_at).collect()
}

/// n colours from the Paired table, starting over after 12
pub fn paired(n: usize) -> Vec<RGBColor> {
    PAIRED.iter().cycle().take(n).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viridis_ends() {
        let c = viridis(3);
        assert_eq!(c.len(), 3);
        assert_eq!(c[0], RGBColor(68, 1, 84));
        assert_eq!(c[1], RGBColor(33, 144, 141));
        assert_eq!(c[2], RGBColor(253, 231, 37));
    }

    #[test]
    fn viridis_clamps_out_of_range() {
        assert_eq!(viridis_at(-1.), RGBColor(68, 1, 84));
        assert_eq!(viridis_at(2.), RGBColor(253, 231, 37));
    }

    #[test]
    fn paired_cycles() {
        let c = paired(14);
        assert_eq!(c.len(), 14);
        assert_eq!(c[0], RGBColor(166, 206, 227));
        assert_eq!(c[12], c[0]);
        assert_eq!(c[13], c[1]);
    }
}
