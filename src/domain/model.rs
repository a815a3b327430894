use serde::Serialize;
use std::fmt;

/// Fields of one source line, exactly as the CSV parser produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub line: u64,
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRecord {
    pub name: String,
    pub surname: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IngestionOutcome {
    Inserted(PersonRecord),
    SkippedDryRun(PersonRecord),
    InvalidFormat { field_count: usize },
    /// `raw` is the email column before normalization.
    InvalidEmail { raw: String },
    InsertFailed { record: PersonRecord, detail: String },
}

impl fmt::Display for IngestionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestionOutcome::Inserted(record) => write!(
                f,
                "Record inserted successfully: {} {} <{}>",
                record.name, record.surname, record.email
            ),
            IngestionOutcome::SkippedDryRun(record) => write!(
                f,
                "Dry run: Record not inserted into the database: {} {} <{}>",
                record.name, record.surname, record.email
            ),
            IngestionOutcome::InvalidFormat { field_count } => {
                write!(f, "Invalid CSV format: expected 3 fields, found {}", field_count)
            }
            IngestionOutcome::InvalidEmail { raw } => write!(f, "Invalid email format: {}", raw),
            IngestionOutcome::InsertFailed { detail, .. } => {
                write!(f, "Error inserting record: {}", detail)
            }
        }
    }
}

/// Per-outcome counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestionSummary {
    pub inserted: u64,
    pub skipped_dry_run: u64,
    pub invalid_format: u64,
    pub invalid_email: u64,
    pub insert_failed: u64,
}

impl IngestionSummary {
    pub fn record(&mut self, outcome: &IngestionOutcome) {
        match outcome {
            IngestionOutcome::Inserted(_) => self.inserted += 1,
            IngestionOutcome::SkippedDryRun(_) => self.skipped_dry_run += 1,
            IngestionOutcome::InvalidFormat { .. } => self.invalid_format += 1,
            IngestionOutcome::InvalidEmail { .. } => self.invalid_email += 1,
            IngestionOutcome::InsertFailed { .. } => self.insert_failed += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.inserted + self.skipped_dry_run + self.invalid_format + self.invalid_email + self.insert_failed
    }

    pub fn rejected(&self) -> u64 {
        self.invalid_format + self.invalid_email + self.insert_failed
    }
}

impl<'a> FromIterator<&'a IngestionOutcome> for IngestionSummary {
    fn from_iter<I: IntoIterator<Item = &'a IngestionOutcome>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |mut summary, outcome| {
            summary.record(outcome);
            summary
        })
    }
}

impl fmt::Display for IngestionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows: {} inserted, {} skipped (dry run), {} invalid format, {} invalid email, {} insert failed",
            self.total(),
            self.inserted,
            self.skipped_dry_run,
            self.invalid_format,
            self.invalid_email,
            self.insert_failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> PersonRecord {
        PersonRecord {
            name: "John".to_string(),
            surname: "Smith".to_string(),
            email: "john@example.com".to_string(),
        }
    }

    #[test]
    fn test_summary_folds_outcomes() {
        let outcomes = vec![
            IngestionOutcome::Inserted(person()),
            IngestionOutcome::InvalidFormat { field_count: 2 },
            IngestionOutcome::InvalidEmail {
                raw: "nope".to_string(),
            },
            IngestionOutcome::InsertFailed {
                record: person(),
                detail: "duplicate".to_string(),
            },
            IngestionOutcome::SkippedDryRun(person()),
        ];

        let summary: IngestionSummary = outcomes.iter().collect();
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.skipped_dry_run, 1);
        assert_eq!(summary.invalid_format, 1);
        assert_eq!(summary.invalid_email, 1);
        assert_eq!(summary.insert_failed, 1);
        assert_eq!(summary.total(), 5);
        assert_eq!(summary.rejected(), 3);
    }

    #[test]
    fn test_invalid_email_display_uses_raw_value() {
        let outcome = IngestionOutcome::InvalidEmail {
            raw: "Not-An-Email".to_string(),
        };
        assert_eq!(outcome.to_string(), "Invalid email format: Not-An-Email");
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let json = serde_json::to_value(IngestionOutcome::InvalidFormat { field_count: 4 }).unwrap();
        assert_eq!(json["outcome"], "invalid_format");
        assert_eq!(json["field_count"], 4);
    }
}
