use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::scorer::{score, MatchBand, MatchResult};
use super::skills::SkillSet;
use crate::workflows::catalog::JobPosting;

/// Whether postings the candidate shares no skills with stay in the ranked view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroScorePolicy {
    /// Show the whole catalog, zero-score postings last.
    #[default]
    Include,
    /// Drop every zero-score posting.
    Exclude,
    /// Show zero-score postings only while the candidate has no recognized skills.
    HideOnceSkilled,
}

impl ZeroScorePolicy {
    pub fn keeps_zero_scores(self, candidate: &SkillSet) -> bool {
        match self {
            ZeroScorePolicy::Include => true,
            ZeroScorePolicy::Exclude => false,
            ZeroScorePolicy::HideOnceSkilled => candidate.is_empty(),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ZeroScorePolicy::Include => "include",
            ZeroScorePolicy::Exclude => "exclude",
            ZeroScorePolicy::HideOnceSkilled => "hide_once_skilled",
        }
    }
}

impl fmt::Display for ZeroScorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown zero-score policy '{0}'")]
pub struct UnknownZeroScorePolicy(pub String);

impl FromStr for ZeroScorePolicy {
    type Err = UnknownZeroScorePolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "include" => Ok(ZeroScorePolicy::Include),
            "exclude" => Ok(ZeroScorePolicy::Exclude),
            "hide_once_skilled" => Ok(ZeroScorePolicy::HideOnceSkilled),
            _ => Err(UnknownZeroScorePolicy(value.to_string())),
        }
    }
}

/// One posting in a ranked view together with its match explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedPosting<'a> {
    pub posting: &'a JobPosting,
    #[serde(flatten)]
    pub result: MatchResult,
}

impl RankedPosting<'_> {
    pub fn band(&self) -> MatchBand {
        self.result.band()
    }
}

/// Score every posting and order them by descending score.
///
/// Equal scores keep their catalog order, so identical inputs always rank identically.
pub fn rank<'a, I>(
    candidate: &SkillSet,
    postings: I,
    policy: ZeroScorePolicy,
) -> Vec<RankedPosting<'a>>
where
    I: IntoIterator<Item = &'a JobPosting>,
{
    let keep_zero = policy.keeps_zero_scores(candidate);

    let mut ranked: Vec<RankedPosting<'a>> = postings
        .into_iter()
        .map(|posting| RankedPosting {
            posting,
            result: score(candidate, &posting.required_skills),
        })
        .filter(|entry| keep_zero || entry.result.score > 0)
        .collect();

    // `sort_by` is stable; ties stay in catalog order.
    ranked.sort_by(|left, right| right.result.score.cmp(&left.result.score));
    ranked
}
