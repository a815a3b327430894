use async_trait::async_trait;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::{NamedTempFile, TempDir};
use user_upload::{
    IngestionOutcome, IngestionPipeline, PersonRecord, PipelineOptions, Result, UploadError,
    UserSink,
};

#[derive(Debug, Default)]
struct SinkLog {
    ensure_calls: usize,
    insert_calls: usize,
    close_calls: usize,
    rows: Vec<PersonRecord>,
}

#[derive(Clone, Default)]
struct MockSink {
    log: Arc<Mutex<SinkLog>>,
    fail_ensure: bool,
}

impl MockSink {
    fn failing_ensure() -> Self {
        Self {
            fail_ensure: true,
            ..Default::default()
        }
    }

    fn insert_calls(&self) -> usize {
        self.log.lock().unwrap().insert_calls
    }

    fn rows(&self) -> Vec<PersonRecord> {
        self.log.lock().unwrap().rows.clone()
    }
}

#[async_trait]
impl UserSink for MockSink {
    async fn ensure_table(&mut self) -> Result<()> {
        self.log.lock().unwrap().ensure_calls += 1;
        if self.fail_ensure {
            return Err(UploadError::SinkError {
                message: "CREATE command denied to user".to_string(),
            });
        }
        Ok(())
    }

    async fn insert(&mut self, record: &PersonRecord) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        log.insert_calls += 1;
        log.rows.push(record.clone());
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.log.lock().unwrap().close_calls += 1;
        Ok(())
    }
}

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn person(name: &str, surname: &str, email: &str) -> PersonRecord {
    PersonRecord {
        name: name.to_string(),
        surname: surname.to_string(),
        email: email.to_string(),
    }
}

const SAMPLE: &str = "john,smith,JOHN@EXAMPLE.COM\njane,doe,not-an-email\nal,jones,al@x\n";

#[tokio::test]
async fn test_end_to_end_insert() {
    let file = csv_file(SAMPLE);
    let sink = MockSink::default();
    let mut pipeline = IngestionPipeline::new(sink.clone(), PipelineOptions::default());

    let mut outcomes = Vec::new();
    let summary = pipeline
        .run_with(file.path(), |_, outcome| outcomes.push(outcome.clone()))
        .await
        .unwrap();

    assert_eq!(
        outcomes,
        vec![
            IngestionOutcome::Inserted(person("John", "Smith", "john@example.com")),
            IngestionOutcome::InvalidEmail {
                raw: "not-an-email".to_string()
            },
            IngestionOutcome::InvalidEmail {
                raw: "al@x".to_string()
            },
        ]
    );
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.invalid_email, 2);
    assert_eq!(sink.log.lock().unwrap().ensure_calls, 1);
    assert_eq!(sink.rows(), vec![person("John", "Smith", "john@example.com")]);
}

#[tokio::test]
async fn test_end_to_end_dry_run() {
    let file = csv_file(SAMPLE);
    let sink = MockSink::default();
    let mut pipeline = IngestionPipeline::new(sink.clone(), PipelineOptions { dry_run: true });

    let mut outcomes = Vec::new();
    let summary = pipeline
        .run_with(file.path(), |_, outcome| outcomes.push(outcome.clone()))
        .await
        .unwrap();

    assert_eq!(
        outcomes,
        vec![
            IngestionOutcome::SkippedDryRun(person("John", "Smith", "john@example.com")),
            IngestionOutcome::InvalidEmail {
                raw: "not-an-email".to_string()
            },
            IngestionOutcome::InvalidEmail {
                raw: "al@x".to_string()
            },
        ]
    );
    assert_eq!(summary.skipped_dry_run, 1);
    assert_eq!(sink.insert_calls(), 0);
}

#[tokio::test]
async fn test_dry_run_never_inserts_on_large_input() {
    let contents: String = (0..200)
        .map(|i| format!("user{},person{},user{}@example.com\n", i, i, i))
        .collect();
    let file = csv_file(&contents);
    let sink = MockSink::default();
    let mut pipeline = IngestionPipeline::new(sink.clone(), PipelineOptions { dry_run: true });

    let summary = pipeline.run(file.path()).await.unwrap();

    assert_eq!(summary.skipped_dry_run, 200);
    assert_eq!(summary.total(), 200);
    assert_eq!(sink.insert_calls(), 0);
}

#[tokio::test]
async fn test_header_row_is_treated_as_data() {
    let file = csv_file("name,surname,email\nmary,o'brien,Mary@Example.ie\n");
    let sink = MockSink::default();
    let mut pipeline = IngestionPipeline::new(sink.clone(), PipelineOptions::default());

    let summary = pipeline.run(file.path()).await.unwrap();

    assert_eq!(summary.invalid_email, 1);
    assert_eq!(summary.inserted, 1);
    assert_eq!(sink.rows(), vec![person("Mary", "O'brien", "mary@example.ie")]);
}

#[tokio::test]
async fn test_quoted_and_short_rows() {
    let file = csv_file(
        "\"van der berg\",\"SMITH, JR\",vdb@example.com\nonly,two\n\"multi\nline\",x,y@example.com\n",
    );
    let sink = MockSink::default();
    let mut pipeline = IngestionPipeline::new(sink.clone(), PipelineOptions::default());

    let mut outcomes = Vec::new();
    pipeline
        .run_with(file.path(), |_, outcome| outcomes.push(outcome.clone()))
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes[0],
        IngestionOutcome::Inserted(person("Van Der Berg", "Smith, Jr", "vdb@example.com"))
    );
    assert_eq!(outcomes[1], IngestionOutcome::InvalidFormat { field_count: 2 });
    assert_eq!(
        outcomes[2],
        IngestionOutcome::Inserted(person("Multi\nLine", "X", "y@example.com"))
    );
}

#[tokio::test]
async fn test_unreadable_source_aborts_before_any_row() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("users.csv");
    let sink = MockSink::default();
    let mut pipeline = IngestionPipeline::new(sink.clone(), PipelineOptions::default());

    let err = pipeline.run(&missing).await.unwrap_err();

    assert!(matches!(err, UploadError::SourceUnreadable { .. }));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(sink.insert_calls(), 0);
}

#[tokio::test]
async fn test_table_creation_failure_aborts_before_any_row() {
    let file = csv_file(SAMPLE);
    let sink = MockSink::failing_ensure();
    let mut pipeline = IngestionPipeline::new(sink.clone(), PipelineOptions::default());

    let mut seen = 0;
    let err = pipeline
        .run_with(file.path(), |_, _| seen += 1)
        .await
        .unwrap_err();

    match err {
        UploadError::TableCreationError { message } => {
            assert!(message.contains("CREATE command denied"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(seen, 0);
    assert_eq!(sink.insert_calls(), 0);
}

#[tokio::test]
async fn test_create_table_only_processes_no_rows() {
    let sink = MockSink::default();
    let mut pipeline = IngestionPipeline::new(sink.clone(), PipelineOptions::default());

    pipeline.prepare().await.unwrap();
    pipeline.into_sink().close().await.unwrap();

    let log = sink.log.lock().unwrap();
    assert_eq!(log.ensure_calls, 1);
    assert_eq!(log.insert_calls, 0);
    assert_eq!(log.close_calls, 1);
}
