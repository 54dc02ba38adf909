//! Text cleanup pipeline for exported datasheet text.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPreset {
    /// Minimal cleanup: Unicode NFC normalization only
    Minimal,
    /// Standard cleanup: NFC + bullets + whitespace
    #[default]
    Standard,
    /// Aggressive cleanup: standard plus stray-character removal and tighter spacing
    Aggressive,
}

/// Options for text cleanup.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Standardize bullet characters (●, ○, ■ → •)
    pub standardize_bullets: bool,

    /// Remove Private Use Area (PUA) characters (symbol-font glyphs)
    pub remove_pua: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Collapse runs of spaces and strip trailing spaces
    pub normalize_whitespace: bool,

    /// Maximum consecutive newlines (0 = unlimited)
    pub max_consecutive_newlines: u8,

    /// Preserve YAML frontmatter during cleanup
    pub preserve_frontmatter: bool,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::Minimal => Self::minimal(),
            CleanupPreset::Standard => Self::standard(),
            CleanupPreset::Aggressive => Self::aggressive(),
        }
    }

    /// Minimal cleanup options.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: true,
            standardize_bullets: false,
            remove_pua: false,
            remove_replacement_char: false,
            normalize_whitespace: false,
            max_consecutive_newlines: 0,
            preserve_frontmatter: true,
        }
    }

    /// Standard cleanup options.
    pub fn standard() -> Self {
        Self {
            standardize_bullets: true,
            normalize_whitespace: true,
            max_consecutive_newlines: 2,
            ..Self::minimal()
        }
    }

    /// Aggressive cleanup options.
    pub fn aggressive() -> Self {
        Self {
            remove_pua: true,
            remove_replacement_char: true,
            max_consecutive_newlines: 1,
            ..Self::standard()
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Text cleanup pipeline.
pub struct CleanupPipeline {
    options: CleanupOptions,
    spaces: Regex,
    trailing: Regex,
    newlines: Option<(Regex, String)>,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Result<Self> {
        let newlines = match options.max_consecutive_newlines as usize {
            0 => None,
            max => Some((
                Regex::new(&format!(r"\n{{{},}}", max + 1))?,
                "\n".repeat(max),
            )),
        };
        Ok(Self {
            options,
            spaces: Regex::new(r"[ \t]{2,}")?,
            trailing: Regex::new(r"(?m)[ \t]+$")?,
            newlines,
        })
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Result<Self> {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// Process text through the cleanup pipeline.
    pub fn process(&self, text: &str) -> String {
        let frontmatter = if self.options.preserve_frontmatter {
            split_frontmatter(text)
        } else {
            None
        };

        match frontmatter {
            Some((fm, content)) => format!("{}\n{}", fm, self.process_content(content)),
            None => self.process_content(text),
        }
    }

    fn process_content(&self, text: &str) -> String {
        let mut result: String = if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        if self.options.standardize_bullets {
            result = standardize_bullets(&result);
        }

        if self.options.remove_pua {
            result = result.chars().filter(|c| !is_private_use(*c)).collect();
        }

        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }

        // Table cells are joined with tabs in plain text; keep them
        if self.options.normalize_whitespace {
            result = self.trailing.replace_all(&result, "").into_owned();
            result = self
                .spaces
                .replace_all(&result, |caps: &regex::Captures<'_>| {
                    if caps[0].contains('\t') {
                        "\t".to_string()
                    } else {
                        " ".to_string()
                    }
                })
                .into_owned();
        }

        if let Some((ref re, ref replacement)) = self.newlines {
            result = re.replace_all(&result, replacement.as_str()).into_owned();
        }

        result.trim().to_string()
    }
}

fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let stripped = text.strip_prefix("---\n")?;
    let end = stripped.find("\n---\n")?;
    let fm_end = 4 + end + 4;
    Some((&text[..fm_end], &text[fm_end + 1..]))
}

fn standardize_bullets(text: &str) -> String {
    const BULLETS: [char; 10] = ['●', '○', '■', '□', '◆', '◇', '▪', '▫', '►', '▻'];
    text.chars()
        .map(|c| if BULLETS.contains(&c) { '•' } else { c })
        .collect()
}

fn is_private_use(c: char) -> bool {
    let code = c as u32;
    (0xE000..=0xF8FF).contains(&code)
        || (0xF0000..=0xFFFFD).contains(&code)
        || (0x100000..=0x10FFFD).contains(&code)
}
