// src/models/report.rs

//! Per-product outcomes and the batch report.

use serde::Serialize;

use super::RelationKind;

/// Terminal state of one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProductOutcome {
    /// A game with this title already existed.
    Skipped { title: String },
    /// The game was created; image failures do not affect the record.
    Created {
        title: String,
        enriched: bool,
        images_uploaded: usize,
        images_failed: usize,
    },
    /// The product could not be created.
    Failed { title: String, reason: String },
}

/// A relation name that could not be resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationFailure {
    pub kind: String,
    pub name: String,
    pub reason: String,
}

/// Outcome of relation precomputation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelationSummary {
    pub created: usize,
    pub existing: usize,
    pub failed: Vec<RelationFailure>,
}

impl RelationSummary {
    pub fn record_failure(&mut self, kind: RelationKind, name: &str, reason: impl ToString) {
        self.failed.push(RelationFailure {
            kind: kind.to_string(),
            name: name.to_string(),
            reason: reason.to_string(),
        });
    }
}

/// A product that ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedProduct {
    pub title: String,
    pub reason: String,
}

/// Aggregated result of one population run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PopulateReport {
    pub listed: usize,
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<FailedProduct>,
    pub images_uploaded: usize,
    pub images_failed: usize,
    pub unenriched: usize,
    pub relations: RelationSummary,
}

impl PopulateReport {
    /// Build a report from settled product outcomes.
    pub fn from_outcomes(relations: RelationSummary, outcomes: Vec<ProductOutcome>) -> Self {
        let mut report = Self {
            listed: outcomes.len(),
            relations,
            ..Self::default()
        };

        for outcome in outcomes {
            match outcome {
                ProductOutcome::Skipped { title } => report.skipped.push(title),
                ProductOutcome::Created {
                    title,
                    enriched,
                    images_uploaded,
                    images_failed,
                } => {
                    report.created.push(title);
                    report.images_uploaded += images_uploaded;
                    report.images_failed += images_failed;
                    if !enriched {
                        report.unenriched += 1;
                    }
                }
                ProductOutcome::Failed { title, reason } => {
                    report.failed.push(FailedProduct { title, reason })
                }
            }
        }

        report
    }

    /// Summary lines in `(label, value)` form for log output.
    pub fn summary_items(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Listed", self.listed.to_string()),
            ("Created", self.created.len().to_string()),
            ("Skipped", self.skipped.len().to_string()),
            ("Failed", self.failed.len().to_string()),
            ("Without enrichment", self.unenriched.to_string()),
            ("Images uploaded", self.images_uploaded.to_string()),
            ("Images failed", self.images_failed.to_string()),
            ("Relations created", self.relations.created.to_string()),
            ("Relations existing", self.relations.existing.to_string()),
            ("Relations failed", self.relations.failed.len().to_string()),
        ]
    }
}
