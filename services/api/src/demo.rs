use crate::infra::{
    demo_catalog, load_catalog, InMemoryApplicationRepository, InMemoryCatalogRepository,
    InMemoryProfileRepository,
};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use talent_match::config::{AppConfig, MatchingConfig};
use talent_match::error::AppError;
use talent_match::workflows::applications::{ApplicationService, Decision};
use talent_match::workflows::candidates::CandidateId;
use talent_match::workflows::catalog::{CatalogImporter, JobPosting};
use talent_match::workflows::matching::{
    can_apply, rank, RankedPosting, SkillInput, SkillSet, ZeroScorePolicy,
};
use talent_match::workflows::opportunities::{OpportunityService, RankedOpportunities};

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Candidate skills, split on the configured delimiter (e.g. "React, CSS")
    #[arg(long, default_value = "")]
    pub(crate) skills: String,
    /// CSV catalog to rank instead of the configured or built-in catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Zero-score visibility: include, exclude or hide-once-skilled
    #[arg(long)]
    pub(crate) zero_score: Option<ZeroScorePolicy>,
    /// Print the ranking as JSON instead of a listing
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Skills the demo candidate uploads
    #[arg(long, default_value = "React, CSS")]
    pub(crate) skills: String,
    /// Outcome the recruiter records for the demo application
    #[arg(long, default_value = "shortlisted", value_parser = parse_decision)]
    pub(crate) decision: Decision,
}

fn parse_decision(raw: &str) -> Result<Decision, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "shortlisted" | "shortlist" => Ok(Decision::Shortlisted),
        "rejected" | "reject" => Ok(Decision::Rejected),
        other => Err(format!(
            "unknown decision '{other}' (expected shortlisted or rejected)"
        )),
    }
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        skills,
        catalog,
        zero_score,
        json,
    } = args;

    let config = AppConfig::load()?;
    let delimiter = config.matching.skill_delimiter;
    let policy = zero_score.unwrap_or(config.matching.zero_score_policy);
    let postings = match catalog {
        Some(path) => CatalogImporter::from_path(path, delimiter)?,
        None => load_catalog(&config)?,
    };

    let candidate = SkillSet::parse(&skills, delimiter);
    let ranked = rank(&candidate, &postings, policy);

    if json {
        let rendered = serde_json::to_string_pretty(&ranked)
            .map_err(|err| AppError::Io(err.into()))?;
        println!("{rendered}");
    } else {
        render_ranking(&candidate, &ranked, policy);
    }

    Ok(())
}

pub(crate) fn render_ranking(
    candidate: &SkillSet,
    ranked: &[RankedPosting<'_>],
    policy: ZeroScorePolicy,
) {
    if candidate.is_empty() {
        println!("Candidate skills: none uploaded");
    } else {
        println!(
            "Candidate skills: {}",
            candidate.iter().collect::<Vec<_>>().join(", ")
        );
    }
    println!("Zero-score postings: {policy}");

    if ranked.is_empty() {
        println!("\nNo postings to show");
    } else {
        println!("\nRanked postings");
        for entry in ranked {
            render_entry(entry.posting, entry);
        }
    }

    if !can_apply(candidate) {
        println!("\nUpload at least one skill to apply.");
    }
}

fn render_entry(posting: &JobPosting, entry: &RankedPosting<'_>) {
    println!(
        "- {:>3}% [{}] {} @ {}",
        entry.result.score,
        entry.band().label(),
        posting.title,
        posting.organization
    );
    if !entry.result.matched_skills.is_empty() {
        println!("    matched: {}", entry.result.matched_skills.join(", "));
    }
    if !entry.result.missing_skills.is_empty() {
        println!("    missing: {}", entry.result.missing_skills.join(", "));
    }
}

fn render_opportunities(ranked: &RankedOpportunities) {
    for entry in &ranked.postings {
        println!(
            "  - {:>3}% [{}] {} @ {}",
            entry.result.score,
            entry.band.label(),
            entry.posting.title,
            entry.posting.organization
        );
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { skills, decision } = args;

    let catalog = Arc::new(InMemoryCatalogRepository::seeded(demo_catalog())?);
    let profiles = Arc::new(InMemoryProfileRepository::default());
    let applications = Arc::new(InMemoryApplicationRepository::default());
    let opportunities =
        OpportunityService::new(catalog.clone(), profiles.clone(), MatchingConfig::default());
    let review = ApplicationService::new(applications, catalog, profiles);

    let candidate = CandidateId("demo-candidate".to_string());

    println!("Talent match demo");
    println!("\nBefore uploading skills");
    let before = opportunities.ranked_for(Some(&candidate), None)?;
    render_opportunities(&before);
    println!("  can apply: {}", before.can_apply);

    let profile = opportunities.upload_skills(candidate.clone(), &SkillInput::Text(skills))?;
    println!(
        "\nUploaded skills: {}",
        profile.skills.iter().collect::<Vec<_>>().join(", ")
    );

    let ranked = opportunities.ranked_for(Some(&candidate), None)?;
    render_opportunities(&ranked);
    println!("  can apply: {}", ranked.can_apply);

    let Some(best) = ranked.postings.first() else {
        println!("\nCatalog is empty; nothing to apply for");
        return Ok(());
    };
    let target = best.posting.id.clone();
    let recruiter = best.posting.recruiter_id.clone();

    println!("\nApplying to {}", best.posting.title);
    match review.submit(candidate.clone(), target.clone()) {
        Ok(application) => {
            println!("- submitted {} ({})", application.id.0, application.status);
            match review.submit(candidate.clone(), target) {
                Ok(_) => println!("- second submission unexpectedly accepted"),
                Err(err) => println!("- second submission refused: {err}"),
            }

            match review.decide(&application.id, decision, &recruiter) {
                Ok(decided) => println!("- recruiter recorded {}", decided.status),
                Err(err) => println!("- decision failed: {err}"),
            }

            let reversal = match decision {
                Decision::Shortlisted => Decision::Rejected,
                Decision::Rejected => Decision::Shortlisted,
            };
            if let Err(err) = review.decide(&application.id, reversal, &recruiter) {
                println!("- reversal refused: {err}");
            }
        }
        Err(err) => println!("- application refused: {err}"),
    }

    let dashboard = review.for_candidate(&candidate)?;
    println!("\nCandidate dashboard");
    for view in &dashboard {
        println!(
            "- {} @ {}: {}",
            view.posting_title, view.organization, view.application.status
        );
    }

    Ok(())
}
