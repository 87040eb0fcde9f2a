use common_failures::prelude::*;
use common_failures::quick_main;
use docopt::Docopt;
use log::debug;
use serde_derive::Deserialize;
use ssdscan::{correct_tokens, read_ship_name, Dictionary, NameParams};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

const USAGE: &str = "
Read the ship name printed on a scanned SSD sheet, or on every *.png
sheet in a directory, and spell-correct it against a ship name
dictionary.

Usage: ssdname [options] <input>

Options:
  --min-area=AREA           Minimum contour area kept when building the
                            OCR mask [default: 3].
  --dict=FILE               Ship name dictionary used for spellchecking
                            [default: dictionary.txt].
  --max-distance-ratio=R    Maximum edit distance for a match, as a
                            fraction of the token length [default: 0.4].
  -d, --debug               Annotate corrected names with the original
                            text, and prefix batch output with filenames.
  --vv                      Also dump raw OCR text (implies --debug).
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_input: String,
    flag_min_area: f64,
    flag_dict: String,
    flag_max_distance_ratio: f64,
    flag_debug: bool,
    flag_vv: bool,
}

impl Args {
    fn debug(&self) -> bool {
        self.flag_debug || self.flag_vv
    }
}

quick_main!(run);

fn run() -> Result<()> {
    env_logger::init();

    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let dict = match Dictionary::load(&args.flag_dict) {
        Ok(dict) => dict,
        Err(err) => {
            eprintln!("Warning: {}. Running without dictionary features.", err);
            Dictionary::new()
        }
    };
    let params = NameParams {
        min_area: args.flag_min_area,
    };

    let input = Path::new(&args.arg_input);
    if input.is_dir() {
        // Deterministic batch order: lexicographic by filename.  One
        // unreadable sheet must not abort the rest of the batch.
        let mut sheets: Vec<PathBuf> = fs::read_dir(input)
            .io_read_context(input)?
            .collect::<std::io::Result<Vec<_>>>()
            .io_read_context(input)?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(OsStr::to_str)
                    .map_or(false, |ext| ext.eq_ignore_ascii_case("png"))
            })
            .collect();
        sheets.sort();
        debug!("processing {} sheets in {}", sheets.len(), input.display());
        for sheet in &sheets {
            if let Err(err) = process_sheet(sheet, &dict, &params, &args, true) {
                eprint!("{}", err.display_causes_and_backtrace());
            }
        }
        Ok(())
    } else {
        process_sheet(input, &dict, &params, &args, false)
    }
}

/// Read, correct and print one sheet's ship name.
fn process_sheet(
    path: &Path,
    dict: &Dictionary,
    params: &NameParams,
    args: &Args,
    in_batch: bool,
) -> Result<()> {
    let reading = read_ship_name(path, dict, params)?;
    let basename = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    if args.flag_vv {
        println!(
            "--- Raw OCR for {} ---\n{}\n--------------------",
            basename, reading.raw
        );
    }

    let extracted = reading.tokens.join(" ");
    let corrected = correct_tokens(&reading.tokens, dict, args.flag_max_distance_ratio).join(" ");
    let output = if args.debug() && corrected.to_uppercase() != extracted.to_uppercase() {
        format!("{} (original: {})", corrected, extracted)
    } else {
        corrected
    };

    if in_batch {
        if args.debug() {
            println!("{}: {}", basename, output);
        } else {
            println!("{}", output);
        }
    } else if args.debug() {
        println!(
            "Result from '{}' (min_area={}):\n---\n{}\n---",
            path.display(),
            args.flag_min_area,
            output
        );
    } else {
        println!("{}", output);
    }
    Ok(())
}
