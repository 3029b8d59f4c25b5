use regex::{Regex, RegexBuilder};

/// Section titles that are usually front or back matter rather than content.
pub const DEFAULT_BLOCKED_PHRASES: &[&str] = &[
    "half title",
    "series page",
    "title page",
    "epilogue",
    "cover",
    "bibliography",
    "index",
    "contents",
    "preface",
    "acknowledgments",
    "copyright",
];

/// Case-insensitive whole-word matcher over a set of phrases.
///
/// A title is blocked when any phrase occurs in it on word boundaries, so
/// "Index" and "Subject Index" are both blocked while "Indexing Strategies" is
/// not. Multi-word phrases match anywhere in the title as well.
#[derive(Debug, Clone)]
pub struct Blocklist {
    phrases: Vec<String>,
    pattern: Option<Regex>,
}

impl Blocklist {
    pub fn new<I, S>(phrases: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Vec<String> = phrases
            .into_iter()
            .map(Into::into)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        let pattern = compile(&phrases)?;
        Ok(Blocklist { phrases, pattern })
    }

    /// A blocklist that excludes nothing.
    pub fn empty() -> Self {
        Blocklist {
            phrases: Vec::new(),
            pattern: None,
        }
    }

    /// The default phrases plus `extra`.
    pub fn with_defaults<I, S>(extra: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases = DEFAULT_BLOCKED_PHRASES
            .iter()
            .map(|p| p.to_string())
            .chain(extra.into_iter().map(Into::into));
        Blocklist::new(phrases)
    }

    /// `extra` on top of the default phrases, or on its own when
    /// `include_defaults` is false.
    pub fn configured(extra: Vec<String>, include_defaults: bool) -> Result<Self, regex::Error> {
        if include_defaults {
            Blocklist::with_defaults(extra)
        } else {
            Blocklist::new(extra)
        }
    }

    pub fn is_blocked(&self, title: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(title))
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

impl Default for Blocklist {
    fn default() -> Self {
        let phrases: Vec<String> = DEFAULT_BLOCKED_PHRASES.iter().map(|p| p.to_string()).collect();
        // The default phrases are fixed literals, so compilation cannot fail.
        let pattern = compile(&phrases).ok().flatten();
        Blocklist { phrases, pattern }
    }
}

/// Build `\b(?:p1|p2|...)\b`. An empty alternation would match every title,
/// so no phrases means no pattern.
fn compile(phrases: &[String]) -> Result<Option<Regex>, regex::Error> {
    if phrases.is_empty() {
        return Ok(None);
    }

    let alternation = phrases
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
        .case_insensitive(true)
        .build()
        .map(Some)
}
