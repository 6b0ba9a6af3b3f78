//! File naming for committed cases

use chrono::NaiveDateTime;

use crate::constants::hist::MAX_PERCENTILE_IN_NAME;

/// `YYYYMMDD_HHMM`
pub fn time_tag(timestamp: NaiveDateTime) -> String {
    timestamp.format("%Y%m%d_%H%M").to_string()
}

/// Stem shared by every artifact of one case, e.g.
/// `Precip_quantile_99.500_W500_quantile_12.000_lat_-5_lon_200_time_20050516_0630`
///
/// Coordinates are truncated toward zero.
pub fn common_filename(
    x_name: &str,
    x_percentile: f64,
    y_name: &str,
    y_percentile: f64,
    lat: f64,
    lon: f64,
    timestamp: NaiveDateTime,
) -> String {
    format!(
        "{}_quantile_{:05.3}_{}_quantile_{:05.3}_lat_{:02}_lon_{:03}_time_{}",
        x_name,
        capped(x_percentile),
        y_name,
        capped(y_percentile),
        lat.trunc() as i64,
        lon.trunc() as i64,
        time_tag(timestamp)
    )
}

fn capped(percentile: f64) -> f64 {
    if percentile.is_nan() {
        return 0.0;
    }
    percentile.min(MAX_PERCENTILE_IN_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2005, 5, 16)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_time_tag() {
        assert_eq!(time_tag(at(6, 30)), "20050516_0630");
    }

    #[test]
    fn test_common_filename() {
        let name = common_filename("Precip", 99.5, "W500", 5.25, -5.7, 200.0, at(6, 30));
        assert_eq!(
            name,
            "Precip_quantile_99.500_W500_quantile_5.250_lat_-5_lon_200_time_20050516_0630"
        );
    }

    #[test]
    fn test_percentile_capped_and_padded() {
        let name = common_filename("a", 100.0, "b", 0.5, 3.2, 7.9, at(0, 0));
        assert_eq!(name, "a_quantile_99.999_b_quantile_0.500_lat_03_lon_007_time_20050516_0000");
    }
}
