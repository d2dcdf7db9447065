use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette (bar chart)
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            to_color32(hsl.into_color())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Diverging scale (correlation heat map)
// ---------------------------------------------------------------------------

/// Map a correlation coefficient in `[-1, 1]` onto a cool/warm diverging
/// scale centred at zero: blue for -1, near-white for 0, red for +1.
/// NaN (undefined correlation) renders as grey.
pub fn diverging(value: f64) -> Color32 {
    if value.is_nan() {
        return Color32::GRAY;
    }
    let t = (value.clamp(-1.0, 1.0) as f32 + 1.0) / 2.0;

    let cold: LinSrgb = Srgb::new(0.23, 0.30, 0.75).into_linear();
    let warm: LinSrgb = Srgb::new(0.71, 0.02, 0.15).into_linear();
    let center: LinSrgb = Srgb::new(0.87, 0.87, 0.87).into_linear();

    let rgb = if t < 0.5 {
        cold.mix(center, t * 2.0)
    } else {
        center.mix(warm, (t - 0.5) * 2.0)
    };
    to_color32(Srgb::from_linear(rgb))
}

/// Text colour that stays readable on top of a `diverging` cell.
pub fn annotation_color(value: f64) -> Color32 {
    if value.is_nan() || value.abs() < 0.6 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(5).len(), 5);
    }

    #[test]
    fn diverging_scale_is_centred() {
        let zero = diverging(0.0);
        // Near-white centre.
        assert!(zero.r() > 200 && zero.g() > 200 && zero.b() > 200);
        let neg = diverging(-1.0);
        let pos = diverging(1.0);
        assert!(neg.b() > neg.r());
        assert!(pos.r() > pos.b());
    }

    #[test]
    fn nan_renders_grey() {
        assert_eq!(diverging(f64::NAN), Color32::GRAY);
    }
}
