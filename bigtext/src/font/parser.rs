//! Decoding the `.flf` font format
//!
//! A font file is a header line, a comment block, then one glyph after
//! another. Rows of a glyph end in the font's *endmark* character, doubled on
//! the glyph's last row. The first 95 glyphs fill character codes 32 through
//! 126 in order; further glyphs name their code in a tag line.

use std::mem;
use std::str::{self, FromStr};
use std::sync::Arc;

use bstr::{BString, ByteSlice as _};
use itertools::Itertools as _;
use thiserror::Error;

use crate::font::Font;
use crate::glyph::Glyph;
use crate::smoosh::{SmooshRule, Smoosher};

/// Slots in a font's glyph table; codes at or above this are not stored.
pub(crate) const TABLE_SIZE: usize = 256;

/// Character codes of Ä Ö Ü ä ö ü ß, which older fonts store unlabeled in
/// seven extra glyphs directly after `~`.
const DEUTSCH_CODES: [usize; 7] = [196, 214, 220, 228, 246, 252, 223];

/// The first sequentially numbered code, the space character.
const FIRST_CODE: usize = 32;

/// Codes through this one are assigned sequentially; after that, glyphs are
/// expected to carry explicit code tags.
const LAST_SEQUENTIAL_CODE: usize = 126;

pub(crate) fn parse(bytes: &[u8]) -> Result<Font, FormatError> {
    let normalized = normalize_newlines(bytes);
    let mut lines = normalized.lines();
    let Some(header_line) = lines.next() else {
        return Err(FormatError::Empty);
    };
    let header = Header::parse(header_line)?;
    let comments =
        String::from_utf8_lossy(&bstr::join("\n", lines.by_ref().take(header.comment_lines)))
            .into_owned();
    let rules = Arc::new(Smoosher::with_rules(
        header.hardblank,
        SmooshRule::from_old_layout(header.old_layout),
    ));
    let glyphs = scan_glyphs(lines, &header, &rules)?;
    Ok(Font {
        glyphs,
        header,
        rules,
        comments,
        name: None,
        line_separator: '\n',
        strict: true,
    })
}

/// Both DOS and bare-CR line endings appear in fonts found in the wild.
fn normalize_newlines(bytes: &[u8]) -> BString {
    bytes
        .replace("\r\n", "\n")
        .into_iter()
        .map(|c| if c == b'\r' { b'\n' } else { c })
        .collect()
}

fn scan_glyphs<'a>(
    lines: impl Iterator<Item = &'a [u8]>,
    header: &Header,
    rules: &Arc<Smoosher>,
) -> Result<Vec<Option<Glyph>>, FormatError> {
    let mut table: Vec<Option<Vec<BString>>> = vec![None; TABLE_SIZE];
    let mut rows: Vec<BString> = Vec::new();
    let mut code = FIRST_CODE;
    let mut endmark = None;
    for line in lines {
        let mark = match endmark {
            Some(mark) => mark,
            // the endmark is whatever character the first glyph row ends in
            None => {
                let Some(&mark) = line.last() else {
                    return Err(FormatError::NoGlyphData);
                };
                endmark = Some(mark);
                mark
            }
        };
        if code > LAST_SEQUENTIAL_CODE
            && let Some(tagged) = explicit_code(line, mark)
        {
            code = tagged;
            continue;
        }
        if code >= TABLE_SIZE {
            // rows of a glyph the table cannot hold; skip until the next tag
            continue;
        }
        if line.ends_with(&[mark, mark]) {
            rows.push(line[..line.len() - 2].into());
            finish_glyph(&mut table, code, mem::take(&mut rows), header);
            code += 1;
        } else if line.ends_with(&[mark]) {
            rows.push(line[..line.len() - 1].into());
        }
    }
    for (legacy, &code) in (127..).zip(&DEUTSCH_CODES) {
        if table[code].is_none() {
            table.swap(code, legacy);
        }
    }
    if table.iter().all(Option::is_none) {
        return Err(FormatError::NoGlyphData);
    }
    let table = table
        .into_iter()
        .map(|slot| slot.map(|rows| Glyph::with_rules(rows, Arc::clone(rules))))
        .collect();
    Ok(table)
}

/// Stores a finished glyph, or drops it when its height contradicts the
/// header. A dropped glyph leaves its slot empty; decoding carries on.
fn finish_glyph(
    table: &mut [Option<Vec<BString>>],
    code: usize,
    rows: Vec<BString>,
    header: &Header,
) {
    if rows.len() == header.height {
        table[code] = Some(rows);
    } else {
        log::warn!(
            "glyph at code {code} has {} rows where the header declares {}; leaving the slot empty",
            rows.len(),
            header.height,
        );
    }
}

/// Recognizes a code tag line: decimal digits, a word boundary, then at least
/// one more character, and no endmark at the end. Returns the tagged code.
fn explicit_code(line: &[u8], endmark: u8) -> Option<usize> {
    if line.is_empty() || line.last() == Some(&endmark) {
        return None;
    }
    let digits = line.iter().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 || digits == line.len() {
        return None;
    }
    if line[digits] == b'_' || line[digits].is_ascii_alphanumeric() {
        return None;
    }
    let number = str::from_utf8(&line[..digits]).ok()?;
    // overflowing tags still address some out-of-range slot
    Some(number.parse().unwrap_or(usize::MAX))
}

/// The decoded first line of a font file.
#[derive(Clone, Copy, Debug)]
pub struct Header {
    /// A byte rendered as a blank but treated as visible when glyphs are
    /// measured and merged.
    pub hardblank: u8,
    /// Rows per glyph; every stored glyph has exactly this many.
    pub height: usize,
    /// Rows from the glyph top to the baseline. Stored, not interpreted.
    pub baseline: usize,
    /// Declared upper bound on row length, endmarks included. Stored, not
    /// interpreted.
    pub max_length: usize,
    /// The legacy layout code; see [`SmooshRule::from_old_layout`].
    pub old_layout: i32,
    /// Number of comment lines between the header and the first glyph.
    pub comment_lines: usize,
    /// Default print direction, 0 for left-to-right. Stored, not interpreted.
    pub print_direction: Option<u32>,
    /// The newer layout bit mask. Stored, not interpreted.
    pub full_layout: Option<u32>,
    /// Declared number of code-tagged glyphs. Stored, not interpreted.
    pub codetag_count: Option<u32>,
}

impl Header {
    pub(crate) fn parse(line: &[u8]) -> Result<Self, FormatError> {
        let mut fields = line.split(|&c| c == b' ').filter(|field| !field.is_empty());
        let Some([signature, height, baseline, max_length, old_layout, comment_lines]) =
            fields.next_array()
        else {
            return Err(FormatError::TruncatedHeader(line.into()));
        };
        let Some(hardblank) = signature.strip_prefix(b"flf2a") else {
            return Err(FormatError::BadSignature(signature.into()));
        };
        // the byte right after the signature; anything further is ignored
        let &hardblank = hardblank.first().ok_or(FormatError::MissingHardblank)?;
        Ok(Self {
            hardblank,
            height: parse_field("height", height)?,
            baseline: parse_field("baseline", baseline)?,
            max_length: parse_field("max_length", max_length)?,
            old_layout: parse_field("old_layout", old_layout)?,
            comment_lines: parse_field("comment_lines", comment_lines)?,
            print_direction: fields
                .next()
                .map(|field| parse_field("print_direction", field))
                .transpose()?,
            full_layout: fields
                .next()
                .map(|field| parse_field("full_layout", field))
                .transpose()?,
            codetag_count: fields
                .next()
                .map(|field| parse_field("codetag_count", field))
                .transpose()?,
        })
    }
}

fn parse_field<T: FromStr>(name: &'static str, bytes: &[u8]) -> Result<T, FormatError> {
    str::from_utf8(bytes)
        .ok()
        .and_then(|field| field.parse().ok())
        .ok_or_else(|| FormatError::BadField {
            field: name,
            value: bytes.into(),
        })
}

/// An error decoding `.flf` data.
///
/// Only problems that leave no usable font are errors; a single bad glyph is
/// logged and skipped instead.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The input has no lines at all.
    #[error("the font data is empty")]
    Empty,
    /// The first header field does not begin with `flf2a`.
    #[error(r#""{0}" does not begin with "flf2a""#)]
    BadSignature(BString),
    /// The header line has fewer than the six required fields.
    #[error(r#"header "{0}" does not include enough fields"#)]
    TruncatedHeader(BString),
    /// The signature field ends without a hardblank character.
    #[error("the header is missing the hardblank character")]
    MissingHardblank,
    /// A numeric header field that does not parse.
    #[error(r#""{value}" cannot be parsed as the {field} field"#)]
    BadField {
        /// Name of the offending field
        field: &'static str,
        /// The bytes found in its place
        value: BString,
    },
    /// No glyph rows follow the header and comments.
    #[error("no glyph data after the header")]
    NoGlyphData,
}
