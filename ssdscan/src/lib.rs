//! This crate scans rasterized ship system display (SSD) sheets.  It
//! powers two small command-line tools: `ssd2overlay`, which detects the
//! checkbox-shaped damage boxes printed on a sheet and emits an HTML/CSS
//! overlay reproducing their positions, and `ssdname`, which reads the
//! ship name printed in the top-right corner of a sheet using an external
//! OCR engine and spell-corrects it against a ship name dictionary.
//!
//! ## Example code
//!
//! ```
//! use ssdscan::{correct_word, DictLine, Dictionary};
//!
//! let mut dict = Dictionary::new();
//! dict.insert(DictLine::Allowed("FEDERATION".to_owned()));
//!
//! // OCR output is noisy; tokens are snapped to the nearest known word.
//! assert_eq!(correct_word("FEDRATION", &dict, 0.4), "FEDERATION");
//! ```
//!
//! ## Pipelines
//!
//! Both pipelines are sequential and stateless between invocations:
//!
//! - Checkbox detection binarizes the sheet, filters contours down to
//!   near-square quadrilaterals, and de-duplicates overlapping hits
//!   before the overlay markup is rendered.  See [`find_checkboxes`].
//! - Ship name reading crops the top-right region, binarizes it, runs
//!   the OCR engine and corrects the resulting tokens.  See
//!   [`read_ship_name`].
//!
//! Image decoding is delegated to the `image` crate, contour extraction
//! to `imageproc`, and text recognition to a locally-installed
//! `tesseract` executable.

#![warn(missing_docs)]

mod binarize;
mod correct;
mod detect;
mod dict;
mod errors;
mod geom;
mod name;
mod overlay;
mod sheet;

pub use common_failures::{Error, Result};

pub use crate::binarize::{adaptive_inverted, otsu_inverted};
pub use crate::correct::{correct_tokens, correct_word, edit_distance};
pub use crate::detect::{deduplicate, detect_boxes, find_checkboxes, DetectParams};
pub use crate::dict::{DictLine, Dictionary};
pub use crate::errors::{
    DictionaryLoadError, ImageReadError, MalformedDictionaryEntry, RunCommandError,
};
pub use crate::geom::Rect;
pub use crate::name::{name_region_mask, read_ship_name, tokens_from_raw, NameParams, NameReading};
pub use crate::overlay::{group_origin, html_document, stylesheet, BOX_SIZE_PX};
pub use crate::sheet::open_sheet;
