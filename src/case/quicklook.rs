//! Quicklook imagery around a committed sample
//!
//! The global quicklook images are equirectangular and start at 17.5 W. They
//! are read from a local mirror laid out like the archive, or downloaded from
//! the archive and kept in the mirror.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Datelike, NaiveDateTime, Timelike};
use image::{Rgb, RgbImage};

use crate::constants::case::{
    QUICKLOOK_BASE_URL, QUICKLOOK_FETCH_TIMEOUT_SECS, QUICKLOOK_HALF_LAT, QUICKLOOK_HALF_LON,
    QUICKLOOK_LON_ORIGIN_OFFSET,
};
use crate::constants::plot::MARKER_HALF_SIZE;
use crate::error::Result;

const MARKER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const PLACEHOLDER_GREY: Rgb<u8> = Rgb([128, 128, 128]);
const PLACEHOLDER_SIZE: (u32, u32) = (1440, 720);

/// Archive path of the image for `var` at `timestamp`, relative to the archive root
pub fn relative_path(var: &str, timestamp: NaiveDateTime) -> String {
    format!(
        "{upper}/Y{y:4}/M{m:02}/D{d:02}/{var}_globe_c1440_NR_BETA9-SNAP_{y:4}{m:02}{d:02}_{hh:02}{mm:02}z.png",
        upper = var.to_uppercase(),
        var = var,
        y = timestamp.year(),
        m = timestamp.month(),
        d = timestamp.day(),
        hh = timestamp.hour(),
        mm = timestamp.minute(),
    )
}

pub fn url(var: &str, timestamp: NaiveDateTime) -> String {
    url_at(QUICKLOOK_BASE_URL, var, timestamp)
}

pub fn url_at(base: &str, var: &str, timestamp: NaiveDateTime) -> String {
    format!("{}/{}", base.trim_end_matches('/'), relative_path(var, timestamp))
}

/// Where the mirrored copy of an archive image would live
pub fn mirror_path(mirror: &Path, var: &str, timestamp: NaiveDateTime) -> PathBuf {
    mirror.join(relative_path(var, timestamp))
}

/// Download and decode one archive image
pub fn fetch(url: &str) -> Result<RgbImage> {
    profiling::scope!("quicklook::fetch");
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(QUICKLOOK_FETCH_TIMEOUT_SECS))
        .build()?;
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
    Ok(image::load_from_memory(&bytes)?.to_rgb8())
}

/// Places a global quicklook image can come from, tried in field order
#[derive(Debug, Clone, Copy, Default)]
pub struct QuicklookSource<'a> {
    pub mirror: Option<&'a Path>,
    /// Archive root to download from; `None` stays offline
    pub base_url: Option<&'a str>,
}

impl QuicklookSource<'_> {
    /// The global image for `var` at `timestamp`, or a grey stand-in
    pub fn load_or_placeholder(&self, var: &str, timestamp: NaiveDateTime) -> RgbImage {
        if let Some(mirror) = self.mirror {
            let path = mirror_path(mirror, var, timestamp);
            if path.is_file() {
                match image::open(&path) {
                    Ok(img) => return img.to_rgb8(),
                    Err(e) => log::warn!("could not read quicklook {} ({})", path.display(), e),
                }
            }
        }

        if let Some(base) = self.base_url {
            let url = url_at(base, var, timestamp);
            match fetch(&url) {
                Ok(img) => {
                    if let Some(mirror) = self.mirror {
                        keep(&img, &mirror_path(mirror, var, timestamp));
                    }
                    return img;
                }
                Err(e) => log::warn!("quicklook download from {} failed: {}", url, e),
            }
        }

        log::warn!("no {} quicklook for {}, using placeholder", var, timestamp);
        placeholder()
    }
}

fn keep(img: &RgbImage, path: &Path) {
    let saved = path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .map_err(image::ImageError::IoError)
        .and_then(|_| img.save(path));
    match saved {
        Ok(()) => log::debug!("kept quicklook at {}", path.display()),
        Err(e) => log::warn!("could not keep quicklook at {}: {}", path.display(), e),
    }
}

fn placeholder() -> RgbImage {
    RgbImage::from_pixel(PLACEHOLDER_SIZE.0, PLACEHOLDER_SIZE.1, PLACEHOLDER_GREY)
}

/// Cut a 60 x 30 degree window centred on (lon, lat) out of a global image
///
/// The window wraps across the date line. Near the poles it is shifted to
/// stay inside the image and the marker moves with the point instead.
pub fn crop_around(global: &RgbImage, lon: f64, lat: f64) -> RgbImage {
    let (w, h) = (global.width() as i64, global.height() as i64);
    let half_w = (w as f64 * (QUICKLOOK_HALF_LON / 360.0)) as i64;
    let half_h = (h as f64 * (QUICKLOOK_HALF_LAT / 180.0)) as i64;
    if half_w == 0 || half_h == 0 {
        return global.clone();
    }

    let cx = ((lon + QUICKLOOK_LON_ORIGIN_OFFSET).rem_euclid(360.0) / 360.0 * w as f64) as i64;
    let cy = ((90.0 - lat) / 180.0 * h as f64) as i64;

    let left = cx - half_w;
    let mut upper = cy - half_h;
    let lower = cy + half_h;
    let mut marker_shift = 0;
    if lower >= h {
        marker_shift = lower - h;
        upper = h - 1 - 2 * half_h;
    } else if upper < 0 {
        marker_shift = upper;
        upper = 0;
    }

    let (out_w, out_h) = (2 * half_w, 2 * half_h);
    let mut out = RgbImage::new(out_w as u32, out_h as u32);
    for oy in 0..out_h {
        let sy = (upper + oy).clamp(0, h - 1);
        for ox in 0..out_w {
            let sx = (left + ox).rem_euclid(w);
            out.put_pixel(ox as u32, oy as u32, *global.get_pixel(sx as u32, sy as u32));
        }
    }

    draw_marker(&mut out, half_w, half_h + marker_shift, MARKER_COLOR);
    out
}

/// Filled square of side `2 * MARKER_HALF_SIZE + 1`, clipped to the image
pub fn draw_marker(img: &mut RgbImage, cx: i64, cy: i64, color: Rgb<u8>) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    for x in (cx - MARKER_HALF_SIZE)..=(cx + MARKER_HALF_SIZE) {
        for y in (cy - MARKER_HALF_SIZE)..=(cy + MARKER_HALF_SIZE) {
            if (0..w).contains(&x) && (0..h).contains(&y) {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
