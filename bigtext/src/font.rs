//! Fonts: glyph tables decoded from `.flf` data

mod parser;

use std::iter::repeat_n;
use std::sync::Arc;

use bstr::BString;
use thiserror::Error;

#[cfg(feature = "fonts")]
pub use bigtext_fonts::FontFile;
pub use parser::{FormatError, Header};

use crate::glyph::{Glyph, ShapeMismatch};
use crate::smoosh::Smoosher;

/// A parsed font: a 256-slot glyph table indexed by character code, plus the
/// header and the smoosh rules it declares.
///
/// All glyphs of one font share one [`Smoosher`], so a clone of a font is
/// still cheap to compose with.
#[derive(Clone, Debug)]
pub struct Font {
    glyphs: Vec<Option<Glyph>>,
    header: Header,
    rules: Arc<Smoosher>,
    comments: String,
    name: Option<String>,
    line_separator: char,
    strict: bool,
}

impl Font {
    pub(crate) const STANDARD: &'static [u8] = include_bytes!("standard.flf");

    /// Decodes the contents of an `.flf` file, plain text only; for files on
    /// disk (possibly zipped) see [`crate::load::load_font`].
    ///
    /// # Errors
    /// [`FormatError`] when the header is malformed or no glyphs can be
    /// extracted. A single bad glyph block is logged and skipped instead.
    pub fn parse(bytes: impl AsRef<[u8]>) -> Result<Self, FormatError> {
        parser::parse(bytes.as_ref())
    }

    /// The `standard` font included with this crate.
    #[expect(clippy::missing_panics_doc, reason = "should be caught in tests")]
    #[must_use]
    pub fn standard() -> Self {
        Self::parse(Self::STANDARD)
            .expect("Should be tested")
            .named("standard")
    }

    /// Decodes a font from the collection in the `bigtext-fonts` crate.
    ///
    /// Only available with the `fonts` feature (on by default).
    #[cfg(feature = "fonts")]
    #[expect(clippy::missing_panics_doc, reason = "should be caught in tests")]
    #[must_use]
    pub fn built_in(font: FontFile) -> Self {
        Self::parse(font.as_bytes())
            .expect("Should be tested")
            .named(font.name())
    }

    /// Looks up the glyph for a character.
    ///
    /// Character codes above 255 are never present. On a miss, a lenient font
    /// (see [`Font::strict`]) substitutes its `?` glyph before giving up.
    ///
    /// # Errors
    /// [`RenderError::NotFound`] when the character (and, for lenient fonts,
    /// `?`) has no glyph.
    pub fn glyph(&self, c: char) -> Result<&Glyph, RenderError> {
        self.slot(c)
            .or_else(|| if self.strict { None } else { self.slot('?') })
            .ok_or(RenderError::NotFound(c))
    }

    /// Renders one line of text by kerning its glyphs together, left to
    /// right. The empty string renders to a zero-width glyph of the font's
    /// height.
    ///
    /// # Errors
    /// [`RenderError::NotFound`] for characters the font cannot supply.
    pub fn render(&self, text: &str) -> Result<Glyph, RenderError> {
        let mut rendered = self.empty_glyph();
        for c in text.chars() {
            rendered = rendered.kern(self.glyph(c)?)?;
        }
        Ok(rendered)
    }

    /// Renders each line of the input separately; lines are split on the
    /// font's [line separator](Font::line_separator).
    ///
    /// # Errors
    /// As for [`Font::render`].
    pub fn render_multiline(&self, text: &str) -> Result<Vec<Glyph>, RenderError> {
        text.split(self.line_separator)
            .map(|line| self.render(line))
            .collect()
    }

    /// The decoded header.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The comment block between the header and the glyphs, usually credits.
    #[must_use]
    pub fn comments(&self) -> &str {
        &self.comments
    }

    /// The font's name, when loaded from a file or a built-in collection.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Names the font.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Chooses between strict lookups (the default) and lenient ones, which
    /// fall back to the `?` glyph for missing characters.
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the separator [`Font::render_multiline`] splits on. Defaults to
    /// `'\n'`.
    #[must_use]
    pub const fn line_separator(mut self, separator: char) -> Self {
        self.line_separator = separator;
        self
    }

    fn slot(&self, c: char) -> Option<&Glyph> {
        let code = usize::try_from(u32::from(c)).ok()?;
        self.glyphs.get(code)?.as_ref()
    }

    fn empty_glyph(&self) -> Glyph {
        Glyph::with_rules(
            repeat_n(BString::default(), self.header.height),
            Arc::clone(&self.rules),
        )
    }
}

/// An error rendering text with a [`Font`].
#[derive(Debug, Error)]
pub enum RenderError {
    /// Composed glyphs disagree on height.
    #[error(transparent)]
    Shape(#[from] ShapeMismatch),
    /// The font has no glyph for a character of the input.
    #[error("the font has no glyph for {0:?}")]
    NotFound(char),
}

#[cfg(test)]
mod tests {
    use super::{Font, RenderError};

    #[test]
    fn parse_standard() {
        let font = Font::standard();
        assert_eq!(font.name(), Some("standard"));
        assert_eq!(font.header().hardblank, b'$');
        assert_eq!(font.header().height, 4);
        assert_eq!(font.header().baseline, 4);
        assert_eq!(font.header().old_layout, 0);
        assert_eq!(font.header().comment_lines, 3);
        for code in 32..=126 {
            let c = char::from_u32(code).unwrap();
            assert!(font.glyph(c).is_ok(), "missing glyph for {c:?}");
        }
        for c in ['Ä', 'Ö', 'Ü', 'ä', 'ö', 'ü', 'ß'] {
            assert!(font.glyph(c).is_ok(), "missing glyph for {c:?}");
        }
    }

    #[test]
    fn standard_glyphs_share_the_declared_height() {
        let font = Font::standard();
        for code in 32..=126 {
            let c = char::from_u32(code).unwrap();
            assert_eq!(font.glyph(c).unwrap().height(), 4, "for {c:?}");
        }
    }

    #[test]
    fn hi() {
        let rendered = Font::standard().render("hi").unwrap().to_string();
        let expected = concat!(
            "# # ### ", "\n",
            "###  #  ", "\n",
            "# #  #  ", "\n",
            "# # ### ",
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn words_keep_a_gap() {
        // the space glyph is a lone hardblank column, so words stay apart
        let rendered = Font::standard().render("l l").unwrap().to_string();
        let expected = concat!(
            "#    #   ", "\n",
            "#    #   ", "\n",
            "#    #   ", "\n",
            "###  ### ",
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn empty_input_renders_empty() {
        let rendered = Font::standard().render("").unwrap();
        assert_eq!(rendered.height(), 4);
        assert_eq!(rendered.width(), 0);
        assert_eq!(rendered.to_string(), "\n\n\n");
    }

    #[test]
    fn render_multiline_splits() {
        let font = Font::standard();
        let blocks = font.render_multiline("a\nb").unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], font.render("a").unwrap());
        assert_eq!(blocks[1], font.render("b").unwrap());

        let custom = font.clone().line_separator(';');
        assert_eq!(custom.render_multiline("a;b").unwrap().len(), 2);
        // the default separator is now an ordinary missing character
        assert!(custom.render_multiline("a\nb").is_err());
    }

    #[test]
    fn strict_fonts_reject_missing_characters() {
        let font = Font::standard();
        assert!(matches!(
            font.render("snowman \u{2603}"),
            Err(RenderError::NotFound('\u{2603}'))
        ));
    }

    #[test]
    fn lenient_fonts_substitute_question_marks() {
        let font = Font::standard().strict(false);
        let substituted = font.render("\u{2603}").unwrap();
        assert_eq!(substituted, font.render("?").unwrap());
    }

    #[test]
    fn deutsch_characters_render() {
        assert!(Font::standard().render("ÄÖÜäöüß").is_ok());
    }

    #[cfg(feature = "fonts")]
    mod built_in {
        use crate::font::{Font, FontFile};

        #[test]
        fn parse_all() {
            for font in FontFile::ALL {
                let parsed = Font::parse(font.as_bytes())
                    .unwrap_or_else(|error| panic!("cannot parse {font:?}: {error}"));
                assert!(parsed.glyph('A').is_ok(), "{font:?} is missing A");
            }
        }

        #[test]
        fn mono_renders_text_verbatim() {
            let font = Font::built_in(FontFile::Mono);
            assert_eq!(font.name(), Some("mono"));
            assert_eq!(font.render("hello").unwrap().to_string(), "hello");
            assert_eq!(font.render("a b").unwrap().to_string(), "a b");
        }

        #[test]
        fn tiny_squeezes_to_three_rows() {
            let rendered = Font::built_in(FontFile::Tiny).render("hi").unwrap();
            assert_eq!(rendered.height(), 3);
            let expected = concat!(
                "# # ### ", "\n",
                "###  #  ", "\n",
                "# # ### ",
            );
            assert_eq!(rendered.to_string(), expected);
        }
    }
}
