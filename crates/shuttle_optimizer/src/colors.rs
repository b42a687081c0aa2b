use rand::{Rng, SeedableRng, rngs::StdRng};

const GOLDEN_RATIO_CONJUGATE: f32 = 0.618_034;
const SATURATION: f32 = 0.85;
const BRIGHTNESS: f32 = 0.9;
const SEED: u64 = 0;

/// `count` well-separated `#rrggbb` colors.
///
/// The starting hue comes from a fixed seed and every following hue is
/// shifted by the golden ratio, so the same count always yields the same palette.
pub fn route_colors(count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut hue: f32 = rng.random();

    (0..count)
        .map(|_| {
            let (r, g, b) = hsb_to_rgb(hue, SATURATION, BRIGHTNESS);
            hue = (hue + GOLDEN_RATIO_CONJUGATE) % 1.0;
            format!("#{r:02x}{g:02x}{b:02x}")
        })
        .collect()
}

fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> (u8, u8, u8) {
    let to_byte = |value: f32| (value * 255.0 + 0.5) as u8;

    if saturation == 0.0 {
        let value = to_byte(brightness);
        return (value, value, value);
    }

    let h = (hue - hue.floor()) * 6.0;
    let f = h - h.floor();
    let p = brightness * (1.0 - saturation);
    let q = brightness * (1.0 - saturation * f);
    let t = brightness * (1.0 - saturation * (1.0 - f));

    let (r, g, b) = match h as u8 {
        0 => (brightness, t, p),
        1 => (q, brightness, p),
        2 => (p, brightness, t),
        3 => (p, q, brightness),
        4 => (t, p, brightness),
        _ => (brightness, p, q),
    };

    (to_byte(r), to_byte(g), to_byte(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_colors_are_deterministic() {
        let colors = route_colors(5);

        assert_eq!(colors, route_colors(5));
        assert_eq!(colors.len(), 5);
        assert!(colors.iter().all(|color| color.len() == 7 && color.starts_with('#')));
        assert_eq!(route_colors(3), colors[..3]);
        assert!(route_colors(0).is_empty());
    }

    #[test]
    fn test_consecutive_colors_differ() {
        let colors = route_colors(8);

        for pair in colors.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_hsb_to_rgb() {
        assert_eq!(hsb_to_rgb(0.0, 1.0, 1.0), (255, 0, 0));
        assert_eq!(hsb_to_rgb(1.0 / 3.0, 1.0, 1.0), (0, 255, 0));
        assert_eq!(hsb_to_rgb(0.5, 0.0, 0.5), (128, 128, 128));
    }
}
