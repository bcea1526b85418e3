use serde::{Deserialize, Serialize};

use super::skills::SkillSet;

/// Explainable overlap between a candidate and one posting's required skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u8,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

impl MatchResult {
    pub fn band(&self) -> MatchBand {
        MatchBand::for_score(self.score)
    }
}

/// Display tier for a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Strong,
    Moderate,
    Weak,
}

impl MatchBand {
    pub const fn for_score(score: u8) -> Self {
        if score > 70 {
            MatchBand::Strong
        } else if score > 40 {
            MatchBand::Moderate
        } else {
            MatchBand::Weak
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            MatchBand::Strong => "strong",
            MatchBand::Moderate => "moderate",
            MatchBand::Weak => "weak",
        }
    }
}

/// Score `candidate` against `required`, keeping the required declaration order in both
/// partitions. An empty requirement list scores zero.
pub fn score(candidate: &SkillSet, required: &SkillSet) -> MatchResult {
    let (matched_skills, missing_skills): (Vec<String>, Vec<String>) = required
        .iter()
        .map(str::to_string)
        .partition(|skill| candidate.contains(skill));

    MatchResult {
        score: percentage(matched_skills.len(), required.len()),
        matched_skills,
        missing_skills,
    }
}

/// Round-half-up integer percentage of `part / whole`.
fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let rounded = (200 * part + whole) / (2 * whole);
    rounded.min(100) as u8
}
