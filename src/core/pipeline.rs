use crate::core::reader::RecordReader;
use crate::domain::email::is_valid_email;
use crate::domain::model::{IngestionOutcome, IngestionSummary, PersonRecord, RawRow};
use crate::domain::normalize::{capitalize_word, normalize_email};
use crate::domain::ports::UserSink;
use crate::utils::error::{Result, UploadError};
use std::io::Read;
use std::path::Path;

const EXPECTED_FIELDS: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Process and report every row but never call [`UserSink::insert`].
    pub dry_run: bool,
}

/// Drives one run: reader -> normalize -> validate -> sink.
///
/// Only two failures abort a run: the table cannot be created, or the
/// source cannot be read. Everything that goes wrong with a single row
/// becomes an [`IngestionOutcome`] and the run moves on.
pub struct IngestionPipeline<S: UserSink> {
    sink: S,
    options: PipelineOptions,
}

impl<S: UserSink> IngestionPipeline<S> {
    pub fn new(sink: S, options: PipelineOptions) -> Self {
        Self { sink, options }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Makes sure the target table exists.
    pub async fn prepare(&mut self) -> Result<()> {
        tracing::debug!("Ensuring users table exists");
        self.sink
            .ensure_table()
            .await
            .map_err(|e| UploadError::TableCreationError {
                message: e.to_string(),
            })?;
        tracing::info!("Table 'users' is ready");
        Ok(())
    }

    /// Full run over the file at `path`.
    pub async fn run<P: AsRef<Path>>(&mut self, path: P) -> Result<IngestionSummary> {
        self.run_with(path, |_, _| {}).await
    }

    /// Like [`run`](Self::run), also handing every outcome to `on_outcome`.
    pub async fn run_with<P, F>(&mut self, path: P, on_outcome: F) -> Result<IngestionSummary>
    where
        P: AsRef<Path>,
        F: FnMut(u64, &IngestionOutcome),
    {
        self.prepare().await?;
        let reader = RecordReader::open(path)?;
        self.ingest(reader, on_outcome).await
    }

    /// Processes every row of `reader` in order. The table is assumed to exist.
    pub async fn ingest<R, F>(
        &mut self,
        reader: RecordReader<R>,
        mut on_outcome: F,
    ) -> Result<IngestionSummary>
    where
        R: Read,
        F: FnMut(u64, &IngestionOutcome),
    {
        if self.options.dry_run {
            tracing::info!("Dry run: the database will not be altered");
        }

        let mut summary = IngestionSummary::default();

        for row in reader {
            let row = row?;
            let line = row.line;
            let outcome = self.process_row(row).await;

            report(line, &outcome);
            summary.record(&outcome);
            on_outcome(line, &outcome);
        }

        tracing::debug!("Ingestion finished after {} rows", summary.total());
        Ok(summary)
    }

    /// Decides the outcome of a single row.
    pub async fn process_row(&mut self, row: RawRow) -> IngestionOutcome {
        let field_count = row.len();
        if field_count != EXPECTED_FIELDS {
            return IngestionOutcome::InvalidFormat { field_count };
        }

        let mut fields = row.fields.into_iter();
        let (Some(name), Some(surname), Some(raw_email)) = (fields.next(), fields.next(), fields.next())
        else {
            return IngestionOutcome::InvalidFormat { field_count };
        };

        let email = normalize_email(&raw_email);
        if !is_valid_email(&email) {
            return IngestionOutcome::InvalidEmail { raw: raw_email };
        }

        let record = PersonRecord {
            name: capitalize_word(name.trim()),
            surname: capitalize_word(surname.trim()),
            email,
        };

        if self.options.dry_run {
            return IngestionOutcome::SkippedDryRun(record);
        }

        match self.sink.insert(&record).await {
            Ok(()) => IngestionOutcome::Inserted(record),
            Err(e) => IngestionOutcome::InsertFailed {
                record,
                detail: e.to_string(),
            },
        }
    }
}

fn report(line: u64, outcome: &IngestionOutcome) {
    match outcome {
        IngestionOutcome::Inserted(_) | IngestionOutcome::SkippedDryRun(_) => {
            tracing::info!("Line {}: {}", line, outcome)
        }
        IngestionOutcome::InvalidFormat { .. } | IngestionOutcome::InvalidEmail { .. } => {
            tracing::warn!("Line {}: {}", line, outcome)
        }
        IngestionOutcome::InsertFailed { .. } => tracing::error!("Line {}: {}", line, outcome),
    }
}
