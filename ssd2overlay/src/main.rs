use common_failures::prelude::*;
use common_failures::quick_main;
use docopt::Docopt;
use failure::format_err;
use log::debug;
use serde_derive::Deserialize;
use ssdscan::{find_checkboxes, group_origin, html_document, open_sheet, stylesheet, DetectParams};
use std::fs;
use std::path::Path;

const USAGE: &str = "
Detect checkbox marks in a scanned SSD sheet and write an HTML/CSS
overlay reproducing their positions next to the input image.

Usage: ssd2overlay <image>
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_image: String,
}

quick_main!(run);

fn run() -> Result<()> {
    env_logger::init();

    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let path = Path::new(&args.arg_image);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| format_err!("no filename in {}", path.display()))?;
    let bg_filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| format_err!("no filename in {}", path.display()))?;

    let img = open_sheet(path)?;
    let (width, height) = (img.width(), img.height());
    println!(
        "Loaded image '{}' ({}px x {}px)",
        path.display(),
        width,
        height
    );

    let params = DetectParams::default();
    let boxes = find_checkboxes(&img, &params);
    println!(
        "Found {} potential boxes after filtering and de-duplication.",
        boxes.len()
    );
    if boxes.is_empty() {
        println!("No boxes found. No files generated.");
        return Ok(());
    }

    let (min_x, min_y) = group_origin(&boxes);
    println!(
        "Master group top-left determined at: x={}px, y={}px",
        min_x, min_y
    );

    let html_path = path.with_extension("html");
    let css_path = path.with_extension("css");
    let css_filename = format!("{}.css", stem);
    debug!(
        "writing {} and {}",
        html_path.display(),
        css_path.display()
    );

    fs::write(&html_path, html_document(stem, &css_filename, &boxes))
        .io_write_context(&html_path)?;
    println!("Successfully generated '{}'", html_path.display());
    fs::write(&css_path, stylesheet(bg_filename, width, height, &boxes))
        .io_write_context(&css_path)?;
    println!("Successfully generated '{}'", css_path.display());

    Ok(())
}
