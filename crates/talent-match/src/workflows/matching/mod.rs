//! Skill normalization, overlap scoring, catalog ranking, and the apply gate.
//!
//! Everything here is a pure function of its inputs so it can be shared freely across request
//! handlers without locking.

pub mod eligibility;
pub mod ranking;
pub mod scorer;
pub mod skills;

pub use eligibility::{can_apply, ensure_can_apply, Ineligible};
pub use ranking::{rank, RankedPosting, UnknownZeroScorePolicy, ZeroScorePolicy};
pub use scorer::{score, MatchBand, MatchResult};
pub use skills::{normalize, SkillInput, SkillSet, DEFAULT_SKILL_DELIMITER};
