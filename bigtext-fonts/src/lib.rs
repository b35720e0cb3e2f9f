//! The font collection for the `bigtext` crate.
//!
//! Each font is a `.flf` file compiled into the binary; this crate only
//! carries the bytes and their names, decoding them is `bigtext`'s job.

macro_rules! fonts {
    ($($variant:ident => $stem:literal,)*) => {
        /// The embedded font files
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        #[non_exhaustive]
        pub enum FontFile {
            $(
                #[doc = concat!("The `", $stem, ".flf` font")]
                $variant,
            )*
        }

        impl FontFile {
            /// Every font in the collection
            pub const ALL: [Self; const { 0 $(+ { _ = $stem; 1 })* }] = [$(Self::$variant),*];

            /// The raw contents of the font file
            #[must_use]
            pub const fn as_bytes(self) -> &'static [u8] {
                match self {
                    $(Self::$variant => include_bytes!(concat!("../fonts/", $stem, ".flf")),)*
                }
            }

            /// The font's name, the stem of its file name
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $stem,)*
                }
            }

            /// Looks a font up by name
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($stem => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

fonts! {
    Mono => "mono",
    Tiny => "tiny",
}
