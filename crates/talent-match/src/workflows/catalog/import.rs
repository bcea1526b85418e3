use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{CatalogError, JobPosting, PostingDraft, PostingId, RecruiterId};
use crate::workflows::matching::SkillInput;

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { row: usize, source: CatalogError },
    DuplicateId { row: usize, id: PostingId },
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read posting catalog: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid posting catalog CSV: {}", err),
            CatalogImportError::InvalidRow { row, source } => {
                write!(f, "posting on row {} is invalid: {}", row, source)
            }
            CatalogImportError::DuplicateId { row, id } => {
                write!(f, "posting id '{}' on row {} is already in the catalog", id.0, row)
            }
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::InvalidRow { source, .. } => Some(source),
            CatalogImportError::DuplicateId { .. } => None,
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads a posting catalog from a CSV export.
///
/// Expected headers: `id,title,organization,description,recruiter_id,required_skills`. The
/// skills column is split with the configured skill delimiter, so comma-separated skills must
/// be quoted.
pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        delimiter: char,
    ) -> Result<Vec<JobPosting>, CatalogImportError> {
        let file = File::open(path)?;
        Self::from_reader(file, delimiter)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        delimiter: char,
    ) -> Result<Vec<JobPosting>, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut seen = HashSet::new();
        let mut postings = Vec::new();

        for (index, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            let row_number = index + 1;
            let row = record?;
            let id = PostingId(row.id.clone());

            if !seen.insert(id.clone()) {
                return Err(CatalogImportError::DuplicateId {
                    row: row_number,
                    id,
                });
            }

            let posting = JobPosting::from_draft(id, row.into_draft(), delimiter).map_err(
                |source| CatalogImportError::InvalidRow {
                    row: row_number,
                    source,
                },
            )?;
            postings.push(posting);
        }

        Ok(postings)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    title: String,
    #[serde(default)]
    organization: String,
    #[serde(default)]
    description: String,
    recruiter_id: String,
    #[serde(default)]
    required_skills: String,
}

impl CatalogRow {
    fn into_draft(self) -> PostingDraft {
        PostingDraft {
            title: self.title,
            organization: self.organization,
            description: self.description,
            recruiter_id: RecruiterId(self.recruiter_id),
            required_skills: SkillInput::Text(self.required_skills),
        }
    }
}
