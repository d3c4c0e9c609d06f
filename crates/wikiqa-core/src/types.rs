//! Domain types shared by the parser, the index engines and the evaluator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Placeholder indexed in place of an empty categories or body string.
pub const EMPTY_FIELD_PLACEHOLDER: &str = ".";

/// One logical article cut out of a wiki dump file.
///
/// `title` is never empty. `categories` and `body` are empty when the
/// article had no categories line or no text; the indexer substitutes
/// [`EMPTY_FIELD_PLACEHOLDER`] for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub title: String,
    pub categories: String,
    pub body: String,
}

/// How words are reduced before they reach the index.
///
/// An index must be queried with the mode it was built with. A mismatch is
/// not detected; it only degrades recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMode {
    #[default]
    None,
    Stem,
    Lemmatize,
}

impl NormalizationMode {
    /// Resolve the legacy `(lemmatize, stem)` flag pair. Asking for both
    /// keeps lemmatization and drops stemming.
    pub fn from_flags(lemmatize: bool, stem: bool) -> Self {
        match (lemmatize, stem) {
            (true, true) => {
                tracing::warn!(
                    "cannot lemmatize and stem at the same time, defaulting to lemmatize only"
                );
                Self::Lemmatize
            }
            (true, false) => Self::Lemmatize,
            (false, true) => Self::Stem,
            (false, false) => Self::None,
        }
    }

    /// Short stable name, used for index directories and reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Stem => "stem",
            Self::Lemmatize => "lemma",
        }
    }
}

impl fmt::Display for NormalizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NormalizationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "raw" => Ok(Self::None),
            "stem" | "porter" => Ok(Self::Stem),
            "lemma" | "lemmatize" => Ok(Self::Lemmatize),
            other => Err(Error::InvalidConfiguration(format!(
                "unknown normalization mode '{}'",
                other
            ))),
        }
    }
}

/// The record written to the index engine.
///
/// - `title`: stored verbatim, matched only as a whole string
/// - `categories`: normalized category terms joined by spaces
/// - `contents`: title + normalized categories + normalized body, the only
///   field queries run against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub title: String,
    pub categories: String,
    pub contents: String,
}

/// Stored fields read back from the index for a hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedRecord {
    pub title: String,
    pub categories: String,
    pub contents: String,
}

/// One ranked hit. Higher scores are better; the scale depends on the
/// ranking function that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    pub document: RetrievedRecord,
    pub score: f32,
}

/// One quiz question with its ground-truth answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub category: String,
    pub clue: String,
    pub expected_answer_title: String,
}

impl QuizItem {
    /// The query text issued for this question.
    pub fn query_text(&self) -> String {
        format!("{} {}", self.category, self.clue)
    }
}

pub const DEFAULT_LM_DIRICHLET_MU: f32 = 2000.0;
pub const DEFAULT_LM_JELINEK_MERCER_LAMBDA: f32 = 0.7;

/// The closed set of scoring strategies a query can be ranked with.
///
/// Passed explicitly on every query; switching between them never touches
/// the index.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RankingFunction {
    /// Okapi BM25 as implemented natively by the engine.
    #[default]
    Bm25,
    /// TF-IDF with length normalization.
    Classic,
    /// Counts matching query terms.
    Boolean,
    /// Divergence from independence, chi-squared measure.
    Dfi,
    /// Divergence from randomness: geometric basic model, Bernoulli
    /// after-effect, H1 length normalization.
    Dfr,
    /// Query likelihood with Dirichlet prior smoothing.
    LmDirichlet { mu: f32 },
    /// Query likelihood with Jelinek-Mercer smoothing.
    LmJelinekMercer { lambda: f32 },
}

impl RankingFunction {
    /// Every variant with its default parameters.
    pub const ALL: [RankingFunction; 7] = [
        RankingFunction::Bm25,
        RankingFunction::Classic,
        RankingFunction::Boolean,
        RankingFunction::Dfi,
        RankingFunction::Dfr,
        RankingFunction::LmDirichlet { mu: DEFAULT_LM_DIRICHLET_MU },
        RankingFunction::LmJelinekMercer { lambda: DEFAULT_LM_JELINEK_MERCER_LAMBDA },
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bm25 => "bm25",
            Self::Classic => "classic",
            Self::Boolean => "boolean",
            Self::Dfi => "dfi",
            Self::Dfr => "dfr",
            Self::LmDirichlet { .. } => "lm_dirichlet",
            Self::LmJelinekMercer { .. } => "lm_jelinek_mercer",
        }
    }
}

impl fmt::Display for RankingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LmDirichlet { mu } => write!(f, "{}:{}", self.name(), mu),
            Self::LmJelinekMercer { lambda } => write!(f, "{}:{}", self.name(), lambda),
            _ => f.write_str(self.name()),
        }
    }
}

impl FromStr for RankingFunction {
    type Err = Error;

    /// Accepts `name` or `name:parameter`, e.g. `lm_dirichlet:1500`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let (name, param) = match normalized.split_once(':') {
            Some((name, param)) => (name.to_string(), Some(param.to_string())),
            None => (normalized, None),
        };
        let parse_param = |default: f32| -> Result<f32, Error> {
            match &param {
                None => Ok(default),
                Some(p) => p
                    .parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .ok_or_else(|| {
                        Error::InvalidConfiguration(format!(
                            "invalid parameter '{}' for ranking function '{}'",
                            p, name
                        ))
                    }),
            }
        };
        let ranking = match name.as_str() {
            "bm25" | "default" => Self::Bm25,
            "classic" | "tfidf" => Self::Classic,
            "boolean" => Self::Boolean,
            "dfi" => Self::Dfi,
            "dfr" => Self::Dfr,
            "lm_dirichlet" => Self::LmDirichlet { mu: parse_param(DEFAULT_LM_DIRICHLET_MU)? },
            "lm_jelinek_mercer" => {
                let lambda = parse_param(DEFAULT_LM_JELINEK_MERCER_LAMBDA)?;
                if lambda >= 1.0 {
                    return Err(Error::InvalidConfiguration(format!(
                        "lm_jelinek_mercer lambda must be in (0, 1), got {}",
                        lambda
                    )));
                }
                Self::LmJelinekMercer { lambda }
            }
            other => {
                return Err(Error::InvalidConfiguration(format!(
                    "unknown ranking function '{}'",
                    other
                )))
            }
        };
        let takes_param = matches!(
            ranking,
            Self::LmDirichlet { .. } | Self::LmJelinekMercer { .. }
        );
        if param.is_some() && !takes_param {
            return Err(Error::InvalidConfiguration(format!(
                "ranking function '{}' takes no parameter",
                ranking.name()
            )));
        }
        Ok(ranking)
    }
}

impl TryFrom<String> for RankingFunction {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RankingFunction> for String {
    fn from(value: RankingFunction) -> Self {
        value.to_string()
    }
}
