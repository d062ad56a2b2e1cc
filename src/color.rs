use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            to_color32(Hsl::new(hue, 0.75, 0.55).into_color())
        })
        .collect()
}

/// Red → yellow → green scale for `t` in `[0, 1]`; values outside are clamped.
pub fn diverging(t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;
    let red = Hsl::new(0.0, 0.7, 0.5);
    let yellow = Hsl::new(55.0, 0.8, 0.55);
    let green = Hsl::new(120.0, 0.55, 0.4);
    let hsl = if t < 0.5 {
        red.mix(yellow, t * 2.0)
    } else {
        yellow.mix(green, (t - 0.5) * 2.0)
    };
    to_color32(hsl.into_color())
}

/// Position of `value` within `extent`, 0.5 for a degenerate extent.
pub fn normalize(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if (hi - lo).abs() < f64::EPSILON {
        0.5
    } else {
        (value - lo) / (hi - lo)
    }
}

// ---------------------------------------------------------------------------
// Color mapping: group label → Color32
// ---------------------------------------------------------------------------

/// Maps group labels (categories, levels, ...) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<&'static str, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map assigning one palette entry per label, in order.
    pub fn new(labels: &[&'static str]) -> Self {
        let mapping = labels
            .iter()
            .copied()
            .zip(generate_palette(labels.len()))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::LIGHT_BLUE,
        }
    }

    /// Look up the colour for a label; unknown or missing labels get the default.
    pub fn color_for(&self, label: Option<&str>) -> Color32 {
        label
            .and_then(|l| self.mapping.get(l))
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_distinct_entries() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn color_map_falls_back_to_default() {
        let map = ColorMap::new(&["Remote", "Hybrid"]);
        assert_ne!(map.color_for(Some("Remote")), map.color_for(Some("Hybrid")));
        assert_eq!(map.color_for(Some("Moon")), Color32::LIGHT_BLUE);
        assert_eq!(map.color_for(None), Color32::LIGHT_BLUE);
    }

    #[test]
    fn scale_ends_differ() {
        assert_ne!(diverging(0.0), diverging(1.0));
        assert_eq!(diverging(-3.0), diverging(0.0));
        assert_eq!(normalize(5.0, (5.0, 5.0)), 0.5);
        assert_eq!(normalize(7.5, (5.0, 10.0)), 0.5);
    }
}
