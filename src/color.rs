use egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::datasets::{Pollutant, ScoreCategory, Sex, Species};

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generate `n` visually distinct colors using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            hsl_to_color32(Hsl::new(hue, 0.65, 0.5))
        })
        .collect()
}

/// Fixed iris species colors shared by the scatter, parallel and matrix
/// charts.
pub fn species_color(species: Species) -> Color32 {
    match species {
        Species::Setosa => Color32::from_rgb(214, 39, 40),      // red
        Species::Versicolor => Color32::from_rgb(31, 119, 180), // blue
        Species::Virginica => Color32::from_rgb(44, 160, 44),   // green
    }
}

/// Fixed ranking score-category colors.
pub fn category_color(category: ScoreCategory) -> Color32 {
    match category {
        ScoreCategory::Teaching => Color32::from_rgb(31, 119, 180), // blue
        ScoreCategory::Research => Color32::from_rgb(44, 160, 44),  // green
        ScoreCategory::Citations => Color32::from_rgb(255, 127, 14), // orange
        ScoreCategory::IndustryIncome => Color32::from_rgb(148, 103, 189), // purple
        ScoreCategory::International => Color32::from_rgb(227, 119, 194), // pink
        ScoreCategory::Overall => Color32::from_rgb(127, 127, 127),
    }
}

/// (hue, saturation) of the sequential ramp used for one abalone sex.
pub fn sex_hue(sex: Sex) -> (f32, f32) {
    match sex {
        Sex::Male => (210.0, 0.70),   // blues
        Sex::Female => (0.0, 0.70),   // reds
        Sex::Infant => (120.0, 0.55), // greens
    }
}

/// (hue, saturation) of the band ramp used for one pollutant.
pub fn pollutant_hue(pollutant: Pollutant) -> (f32, f32) {
    match pollutant {
        Pollutant::Co => (0.0, 0.75),     // reds
        Pollutant::No2 => (30.0, 0.85),   // oranges
        Pollutant::O3 => (0.0, 0.0),      // greys
        Pollutant::Pm25 => (120.0, 0.55), // greens
        Pollutant::Pm10 => (210.0, 0.70), // blues
        Pollutant::So2 => (280.0, 0.55),  // purples
    }
}

/// One shade along a light-to-dark sequential ramp, `t` in [0, 1].
pub fn shade((hue, saturation): (f32, f32), t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lightness = 0.92 - 0.62 * t;
    hsl_to_color32(Hsl::new(hue, saturation, lightness))
}

/// `n` shades of one hue, lightest first, for horizon bands.
pub fn band_shades(hue_sat: (f32, f32), n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![shade(hue_sat, 1.0)];
    }
    (0..n)
        .map(|i| shade(hue_sat, (i + 1) as f32 / n as f32))
        .collect()
}
