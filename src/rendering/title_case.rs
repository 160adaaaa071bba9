use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Title-case styles understood by Hugo's `titleCaseStyle` setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TitleCaseStyle {
    /// Associated Press: short function words stay lowercase.
    #[default]
    Ap,
    /// Chicago Manual of Style, same small-word rules as AP here.
    Chicago,
    /// Capitalize every word.
    Go,
    /// Capitalize the first letter only.
    FirstUpper,
    /// Leave the input untouched.
    None,
}

/// Words kept lowercase by the AP and Chicago styles unless they open or
/// close the title.
const SMALL_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "en", "for", "if", "in", "nor", "of", "on",
    "or", "per", "the", "to", "up", "via", "vs", "yet",
];

impl FromStr for TitleCaseStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ap" => Ok(Self::Ap),
            "chicago" => Ok(Self::Chicago),
            "go" => Ok(Self::Go),
            "firstupper" => Ok(Self::FirstUpper),
            "none" => Ok(Self::None),
            other => Err(format!(
                "Invalid title case style '{other}'. Expected: ap, chicago, go, firstupper, none"
            )),
        }
    }
}

impl TryFrom<String> for TitleCaseStyle {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TitleCaseStyle> for String {
    fn from(style: TitleCaseStyle) -> Self {
        style.to_string()
    }
}

impl fmt::Display for TitleCaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ap => "ap",
            Self::Chicago => "chicago",
            Self::Go => "go",
            Self::FirstUpper => "firstupper",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

impl TitleCaseStyle {
    /// Apply this style to `input`.
    ///
    /// Only first letters are touched; the rest of each word keeps its case,
    /// so acronyms like `AWS` or `gRPC` survive.
    pub fn apply(self, input: &str) -> String {
        match self {
            Self::None => input.to_string(),
            Self::FirstUpper => capitalize(input),
            Self::Go => input
                .split(' ')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
            Self::Ap | Self::Chicago => {
                let words: Vec<&str> = input.split(' ').collect();
                let last = words.len().saturating_sub(1);
                words
                    .iter()
                    .enumerate()
                    .map(|(i, word)| {
                        let lower = word.to_lowercase();
                        if i != 0 && i != last && SMALL_WORDS.contains(&lower.as_str()) {
                            lower
                        } else {
                            capitalize(word)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
