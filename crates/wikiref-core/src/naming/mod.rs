//! Naming conventions for page names.
//!
//! A file on disk is spelled `Page-Name.md`; a wiki reference to it is
//! spelled `Page Name`. The sixteen [`NamingConvention`] variants re-spell
//! arbitrary text as words joined by a separator.

use serde::{Deserialize, Serialize};

mod spelling;


pub use spelling::{words_with_spelling_suggestions, SpellChecker, MAX_SPELLING_COMBINATIONS};

/// Extension implied by a wiki link
pub const WIKI_PAGE_EXTENSION: &str = ".md";

/// Per-word case transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStyle {
    /// Words keep their spelling
    Clean,
    /// First letter upper case, rest lower case
    Capitalized,
    Lowercase,
    Uppercase,
}

impl CaseStyle {
    pub fn apply(self, word: &str) -> String {
        match self {
            CaseStyle::Clean => word.to_string(),
            CaseStyle::Lowercase => word.to_lowercase(),
            CaseStyle::Uppercase => word.to_uppercase(),
            CaseStyle::Capitalized => {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        let mut out: String = first.to_uppercase().collect();
                        out.push_str(&chars.as_str().to_lowercase());
                        out
                    }
                    None => String::new(),
                }
            }
        }
    }
}

/// Joiner placed between consecutive words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Separator {
    Spaced,
    Spliced,
    Dashed,
    Underscored,
}

impl Separator {
    pub fn as_str(self) -> &'static str {
        match self {
            Separator::Spaced => " ",
            Separator::Spliced => "",
            Separator::Dashed => "-",
            Separator::Underscored => "_",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamingConvention {
    pub case: CaseStyle,
    pub separator: Separator,
}

impl NamingConvention {
    pub const fn new(case: CaseStyle, separator: Separator) -> Self {
        Self { case, separator }
    }

    pub const ALL: [NamingConvention; 16] = {
        use CaseStyle::*;
        use Separator::*;
        [
            Self::new(Clean, Spaced),
            Self::new(Capitalized, Spaced),
            Self::new(Lowercase, Spaced),
            Self::new(Uppercase, Spaced),
            Self::new(Clean, Spliced),
            Self::new(Capitalized, Spliced),
            Self::new(Lowercase, Spliced),
            Self::new(Uppercase, Spliced),
            Self::new(Clean, Dashed),
            Self::new(Capitalized, Dashed),
            Self::new(Lowercase, Dashed),
            Self::new(Uppercase, Dashed),
            Self::new(Clean, Underscored),
            Self::new(Capitalized, Underscored),
            Self::new(Lowercase, Underscored),
            Self::new(Uppercase, Underscored),
        ]
    };

    pub fn convert(&self, text: &str) -> String {
        convert(text, *self)
    }
}

/// Maximal runs of alphanumeric characters
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
}

/// Re-spell `text` in the given convention.
///
/// Any run of non-alphanumeric characters becomes exactly one separator;
/// leading and trailing runs are dropped.
///
/// ```
/// use wikiref_core::naming::{convert, CaseStyle, NamingConvention, Separator};
///
/// let dashed = NamingConvention::new(CaseStyle::Lowercase, Separator::Dashed);
/// assert_eq!(convert("  My  Page--Name ", dashed), "my-page-name");
/// ```
pub fn convert(text: &str, convention: NamingConvention) -> String {
    let separator = convention.separator.as_str();
    let mut out = String::with_capacity(text.len());
    for (i, word) in words(text).enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(&convention.case.apply(word));
    }
    out
}

/// `Page Name` -> `Page-Name`
pub fn wiki_ref_as_file_name(wiki_ref: &str) -> String {
    wiki_ref.replace(' ', "-")
}

/// `Page Name` -> `Page-Name.md`
pub fn wiki_ref_as_page_file_name(wiki_ref: &str) -> String {
    format!("{}{}", wiki_ref_as_file_name(wiki_ref), WIKI_PAGE_EXTENSION)
}

/// `Page-Name` -> `Page Name`; no other character changes
pub fn file_name_as_wiki_ref(file_name: &str) -> String {
    file_name.replace('-', " ")
}
