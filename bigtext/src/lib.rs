//! Render text as large multi-row ASCII art using FIGlet `.flf` fonts.
//!
//! A [`Glyph`](glyph::Glyph) is a rectangular grid of sub-characters. Adjacent
//! glyphs are *kerned*: pulled together until they nearly touch, with the
//! overlapping columns merged by an ordered chain of
//! [smoosh rules](smoosh::SmooshRule).
//!
//! # Example
//!
//! ```
//! # use bigtext::font::Font;
//! let rendered = Font::standard().render("hi")?.to_string();
//! let expected = concat!(
//!     "# # ### ", "\n",
//!     "###  #  ", "\n",
//!     "# #  #  ", "\n",
//!     "# # ### ",
//! );
//! assert_eq!(rendered, expected);
//! # Ok::<(), bigtext::font::RenderError>(())
//! ```
//!
//! ## Feature flags
//!
//! - `fonts` (default): embeds the font collection from the `bigtext-fonts`
//!   crate, available through [`Font::built_in`](font::Font::built_in) and
//!   [`FontRegistry::builtin`](registry::FontRegistry::builtin)

pub mod font;
pub mod glyph;
pub mod load;
pub mod registry;
pub mod smoosh;
