use super::skills::SkillSet;

/// Raised when a candidate without any recognized skill tries to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("candidate has no recognized skills and cannot apply yet")]
pub struct Ineligible;

/// A candidate may apply to any posting once at least one skill is recognized.
pub fn can_apply(candidate: &SkillSet) -> bool {
    !candidate.is_empty()
}

pub fn ensure_can_apply(candidate: &SkillSet) -> Result<(), Ineligible> {
    if can_apply(candidate) {
        Ok(())
    } else {
        Err(Ineligible)
    }
}
