//! Render text as large ASCII art on the command line

mod logger;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use bigtext::font::Font;
use bigtext::load::load_font;
use bigtext::registry::FontRegistry;
use clap::Parser;

/// Renders text as large ASCII art.
///
/// Each line of the input becomes its own block of output. Set the
/// `BIGTEXT_LOG` environment variable (`error` through `trace`) to see what
/// the font machinery is doing on stderr.
#[derive(Parser)]
#[command(version, about = "Render text as large ASCII art")]
struct Cli {
    /// The text to render; embedded newlines start a new block
    #[arg(required_unless_present = "list")]
    input: Option<String>,
    /// Render with a font file, plain or zipped `.flf`
    #[arg(short, long, value_name = "PATH")]
    font: Option<PathBuf>,
    /// Render with a built-in font
    #[arg(short, long, value_name = "NAME", conflicts_with = "font")]
    builtin: Option<String>,
    /// List the built-in font names and exit
    #[arg(long)]
    list: bool,
    /// Substitute ? for characters the font does not provide
    #[arg(long)]
    lenient: bool,
}

impl Cli {
    fn font(&self, registry: &FontRegistry) -> Result<Font> {
        let font = if let Some(path) = &self.font {
            load_font(path).with_context(|| format!("cannot load font from {}", path.display()))?
        } else if let Some(name) = &self.builtin {
            registry
                .get(name)
                .with_context(|| format!("no built-in font named {name:?}"))?
                .clone()
        } else {
            Font::standard()
        };
        Ok(if self.lenient { font.strict(false) } else { font })
    }
}

fn main() -> Result<()> {
    logger::init();
    let cli = Cli::parse();
    let registry = FontRegistry::builtin();
    if cli.list {
        let mut names: Vec<&str> = registry.names().collect();
        names.sort_unstable();
        for name in names {
            println!("{name}");
        }
        return Ok(());
    }
    let font = cli.font(&registry)?;
    let input = cli.input.as_deref().unwrap_or_default();
    for block in font.render_multiline(input)? {
        println!("{block}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::Cli;

    #[test]
    fn arguments_are_consistent() {
        Cli::command().debug_assert();
    }
}
