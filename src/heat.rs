//! Heat colour gradient for bin counts

/// Heat map color gradient from blue (low) to red (high)
const HEAT_COLORS: &[[u8; 3]] = &[
    [0, 0, 80],    // Dark blue (0.0)
    [0, 0, 180],   // Blue
    [0, 100, 255], // Light blue
    [0, 200, 255], // Cyan
    [0, 255, 200], // Cyan-green
    [0, 255, 100], // Green
    [100, 255, 0], // Yellow-green
    [200, 255, 0], // Yellow
    [255, 200, 0], // Orange
    [255, 100, 0], // Red-orange
    [255, 0, 0],   // Red (1.0)
];

/// Normalize a bin count to 0-1 on a log scale
pub fn normalized_count(count: usize, max_count: usize) -> f64 {
    if count == 0 {
        0.0
    } else if max_count > 1 {
        (count as f64).ln() / (max_count as f64).ln()
    } else {
        1.0
    }
}

/// Color from the gradient for a normalized value (0-1)
pub fn heat_rgb(normalized: f64) -> [u8; 3] {
    let t = if normalized.is_nan() {
        0.0
    } else {
        normalized.clamp(0.0, 1.0)
    };
    let scaled = t * (HEAT_COLORS.len() - 1) as f64;
    let idx = scaled.floor() as usize;
    let frac = scaled - idx as f64;

    if idx >= HEAT_COLORS.len() - 1 {
        return HEAT_COLORS[HEAT_COLORS.len() - 1];
    }

    let c1 = HEAT_COLORS[idx];
    let c2 = HEAT_COLORS[idx + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac) as u8;
    [lerp(c1[0], c2[0]), lerp(c1[1], c2[1]), lerp(c1[2], c2[2])]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_ends() {
        assert_eq!(heat_rgb(0.0), [0, 0, 80]);
        assert_eq!(heat_rgb(1.0), [255, 0, 0]);
        assert_eq!(heat_rgb(7.0), [255, 0, 0]);
        assert_eq!(heat_rgb(f64::NAN), [0, 0, 80]);
    }

    #[test]
    fn test_log_normalization() {
        assert_eq!(normalized_count(0, 100), 0.0);
        assert_eq!(normalized_count(1, 1), 1.0);
        assert_eq!(normalized_count(100, 100), 1.0);
        assert!((normalized_count(10, 100) - 0.5).abs() < 1e-12);
    }
}
