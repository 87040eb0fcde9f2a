//! Domain-specific failures.  Ordinary I/O errors are wrapped with
//! `common_failures` context instead.

use failure::Fail;
use std::path::{Path, PathBuf};

/// We could not open or decode an input sheet image.
#[derive(Debug, Fail)]
#[fail(display = "could not read image {:?}", path)]
pub struct ImageReadError {
    path: PathBuf,
}

impl ImageReadError {
    pub(crate) fn new(path: &Path) -> ImageReadError {
        ImageReadError {
            path: path.to_owned(),
        }
    }

    /// The path of the image we failed to read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// We could not load a ship name dictionary.  Callers are expected to
/// treat this as recoverable and run without dictionary features.
#[derive(Debug, Fail)]
#[fail(display = "could not load dictionary {:?}", path)]
pub struct DictionaryLoadError {
    path: PathBuf,
}

impl DictionaryLoadError {
    pub(crate) fn new(path: &Path) -> DictionaryLoadError {
        DictionaryLoadError {
            path: path.to_owned(),
        }
    }

    /// The path of the dictionary we failed to load.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A substitution line in a dictionary file was missing its `|`
/// delimiter.  The loader warns and skips the line.
#[derive(Debug, Fail)]
#[fail(display = "malformed direct substitution entry in dictionary: {:?}", line)]
pub struct MalformedDictionaryEntry {
    line: String,
}

impl MalformedDictionaryEntry {
    pub(crate) fn new<S: Into<String>>(line: S) -> MalformedDictionaryEntry {
        MalformedDictionaryEntry { line: line.into() }
    }

    /// The offending dictionary line.
    pub fn line(&self) -> &str {
        &self.line
    }
}

/// An error occurred running an external command.
#[derive(Debug, Fail)]
#[fail(display = "error running external command {:?}", command)]
pub struct RunCommandError {
    command: String,
}

impl RunCommandError {
    /// Create a new error for the specified command. This is private because
    /// we probably want to add the command arguments at some point.
    pub(crate) fn new<S: Into<String>>(command: S) -> RunCommandError {
        RunCommandError {
            command: command.into(),
        }
    }

    /// The name of the command that failed.
    pub fn command(&self) -> &str {
        &self.command
    }
}
