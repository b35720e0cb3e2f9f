//! Loading fonts from the filesystem
//!
//! Fonts are distributed both as plain `.flf` text and as single-entry zip
//! archives, often still carrying the `.flf` extension. [`load_font`] accepts
//! either.

use std::fs;
use std::io::{Cursor, Read as _};
use std::path::Path;

use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::font::{Font, FormatError};

/// Reads and decodes a font file, naming the font after the file.
///
/// If the file is a zip archive, its first entry is decoded; otherwise the
/// bytes are decoded as they are.
///
/// # Errors
/// [`LoadError`] when the file cannot be read, the archive cannot be
/// unpacked, or the payload is not a font. Not being an archive is not an
/// error.
pub fn load_font(path: impl AsRef<Path>) -> Result<Font, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let payload = unwrap_archive(path, bytes)?;
    let font = Font::parse(payload)?;
    Ok(match path.file_name() {
        Some(name) => font.named(name.to_string_lossy()),
        None => font,
    })
}

fn unwrap_archive(path: &Path, bytes: Vec<u8>) -> Result<Vec<u8>, LoadError> {
    let mut archive = match ZipArchive::new(Cursor::new(&bytes)) {
        Ok(archive) => archive,
        Err(_) => {
            log::debug!("{} is not an archive, reading it as is", path.display());
            return Ok(bytes);
        }
    };
    if archive.is_empty() {
        return Err(LoadError::EmptyArchive);
    }
    let mut payload = Vec::new();
    archive.by_index(0)?.read_to_end(&mut payload)?;
    Ok(payload)
}

/// An error loading a font file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file cannot be read.
    #[error("cannot read the font file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is a zip archive whose first entry cannot be extracted.
    #[error("cannot extract the archived font: {0}")]
    Archive(#[from] ZipError),
    /// The file is a zip archive with no entries at all.
    #[error("the archive has no entries")]
    EmptyArchive,
    /// The payload is not a valid font.
    #[error(transparent)]
    Format(#[from] FormatError),
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write as _;

    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use super::{LoadError, load_font};

    const FIXTURE: &str = "flf2a$ 1 1 4 0 1\none line of comments\n#@@\n";

    #[test]
    fn loads_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.flf");
        fs::write(&path, FIXTURE).unwrap();
        let font = load_font(&path).unwrap();
        assert_eq!(font.name(), Some("plain.flf"));
        assert_eq!(font.comments(), "one line of comments");
        assert!(font.glyph(' ').is_ok());
    }

    #[test]
    fn loads_zip_archives() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("packed.flf");
        let mut writer = ZipWriter::new(fs::File::create(&path).unwrap());
        writer
            .start_file("packed", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(FIXTURE.as_bytes()).unwrap();
        writer.finish().unwrap();

        let font = load_font(&path).unwrap();
        assert_eq!(font.name(), Some("packed.flf"));
        assert!(font.glyph(' ').is_ok());
    }

    #[test]
    fn empty_archives_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.flf");
        let writer = ZipWriter::new(fs::File::create(&path).unwrap());
        writer.finish().unwrap();
        assert!(matches!(load_font(&path), Err(LoadError::EmptyArchive)));
    }

    #[test]
    fn missing_files_are_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nowhere.flf");
        assert!(matches!(load_font(&path), Err(LoadError::Io(_))));
    }

    #[test]
    fn garbage_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.flf");
        fs::write(&path, "not a font at all").unwrap();
        assert!(matches!(load_font(&path), Err(LoadError::Format(_))));
    }
}
