//! Loading sheet images from disk.

use common_failures::prelude::*;
use image::DynamicImage;
use std::path::Path;

use crate::errors::ImageReadError;

/// Open and decode a sheet image.  Decoding is delegated entirely to
/// the `image` crate; failures of any kind are reported against the
/// offending path.
pub fn open_sheet(path: &Path) -> Result<DynamicImage> {
    Ok(image::open(path).with_context(|_| ImageReadError::new(path))?)
}

#[test]
fn missing_sheets_report_their_path() {
    let err = open_sheet(Path::new("no-such-sheet.png")).unwrap_err();
    assert!(format!("{}", err).contains("no-such-sheet.png"));
}
