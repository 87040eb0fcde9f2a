//! Ship name extraction from the top-right corner of a sheet.
//!
//! The name block is printed in the top-right quadrant of every sheet,
//! so we crop that region, keep only the large ink shapes (dropping
//! speckle that confuses the OCR engine), and hand the cleaned-up mask
//! to a locally-installed `tesseract` executable.

use common_failures::prelude::*;
use failure::format_err;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::drawing::draw_polygon_mut;
use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::process::Command;

use crate::binarize::otsu_inverted;
use crate::dict::Dictionary;
use crate::errors::RunCommandError;
use crate::geom::polygon_area;
use crate::sheet::open_sheet;

/// Tunable knobs for ship name extraction.
#[derive(Clone, Debug)]
pub struct NameParams {
    /// Ink shapes with a contour area at or below this are dropped from
    /// the OCR mask as scanner speckle.
    pub min_area: f64,
}

impl Default for NameParams {
    fn default() -> NameParams {
        NameParams { min_area: 3.0 }
    }
}

/// What we read off a single sheet: the raw OCR text and the cleaned-up
/// tokens derived from it.
#[derive(Clone, Debug)]
pub struct NameReading {
    /// Unprocessed OCR engine output.
    pub raw: String,
    /// Pre-filtered tokens, ready for dictionary correction.
    pub tokens: Vec<String>,
}

/// Build the OCR input mask for the name region of a sheet: crop the
/// top-right quadrant, binarize, drop small ink specks, and return a
/// dark-text-on-white image the OCR engine is happiest with.
pub fn name_region_mask(img: &DynamicImage, params: &NameParams) -> GrayImage {
    let (width, height) = (img.width(), img.height());
    // The name block sits in the right half of the top 40% of the sheet.
    // 'as' is safe here because the scale factors are less than one.
    let crop_x = (f64::from(width) * 0.5) as u32;
    let crop_h = (f64::from(height) * 0.4) as u32;
    let region = img.crop_imm(crop_x, 0, width - crop_x, crop_h);
    let gray = region.to_luma8();
    let ink = otsu_inverted(&gray);

    let mut mask = GrayImage::new(gray.width(), gray.height());
    let contours = find_contours::<i32>(&ink);
    trace!("{} contours in the name region", contours.len());
    for contour in &contours {
        // Only outer borders: a letter's enclosed holes stay empty.
        if contour.border_type != BorderType::Outer {
            continue;
        }
        if polygon_area(&contour.points) > params.min_area {
            draw_polygon_mut(&mut mask, &contour.points, Luma([255]));
        }
    }
    image::imageops::invert(&mut mask);
    mask
}

/// Run the OCR engine over a prepared mask and return its raw UTF-8
/// text.  Requires a `tesseract` executable on the `PATH`.
pub fn ocr_mask(mask: &GrayImage) -> Result<String> {
    let mkerr = || RunCommandError::new("tesseract");

    let scratch = tempfile::tempdir()?;
    let input_path = scratch.path().join("name-region.png");
    mask.save(&input_path).io_write_context(&input_path)?;
    let output_base = scratch.path().join("name-region");

    // Page segmentation mode 6: assume a single uniform block of text.
    let output = Command::new("tesseract")
        .arg(&input_path)
        .arg(&output_base)
        .arg("--oem")
        .arg("3")
        .arg("--psm")
        .arg("6")
        .output()
        .with_context(|_| mkerr())?;
    if !output.status.success() {
        return Err(format_err!(
            "tesseract failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    let text_path = output_base.with_extension("txt");
    let text = fs::read_to_string(&text_path).io_read_context(&text_path)?;
    Ok(text)
}

/// Reduce raw OCR text to the tokens that could plausibly be part of a
/// ship name.
///
/// Only the first four non-empty lines are considered.  A token exactly
/// matching a known misreading is expanded to its substitution phrase
/// immediately; otherwise tokens containing lowercase are discarded as
/// OCR noise (names are printed in capitals), surviving tokens are
/// stripped to uppercase letters, digits and hyphens, and pure-digit
/// tokens are dropped.
pub fn tokens_from_raw(raw: &str, dict: &Dictionary) -> Vec<String> {
    lazy_static! {
        static ref NON_TOKEN: Regex = Regex::new("[^A-Z0-9-]").unwrap();
        static ref PURE_DIGITS: Regex = Regex::new("^[0-9]+$").unwrap();
    }

    let mut tokens = vec![];
    let lines = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(4);
    for line in lines {
        for word in line.split_whitespace() {
            if let Some(substitution) = dict.substitution(word) {
                tokens.extend(substitution.split_whitespace().map(str::to_owned));
                continue;
            }
            if word.chars().any(char::is_lowercase) {
                continue;
            }
            let filtered = NON_TOKEN.replace_all(word, "");
            if filtered.is_empty() || PURE_DIGITS.is_match(&filtered) {
                continue;
            }
            tokens.push(filtered.into_owned());
        }
    }
    tokens
}

/// Read the ship name region of the sheet at `path`: decode, mask, OCR
/// and pre-filter.  Dictionary substitutions apply during pre-filtering;
/// distance-based correction is left to the caller.
pub fn read_ship_name(path: &Path, dict: &Dictionary, params: &NameParams) -> Result<NameReading> {
    let img = open_sheet(path)?;
    debug!(
        "loaded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    let mask = name_region_mask(&img, params);
    let raw = ocr_mask(&mask)?;
    trace!("raw OCR text from {}:\n{}", path.display(), raw);
    let tokens = tokens_from_raw(&raw, dict);
    Ok(NameReading { raw, tokens })
}
