pub mod adapters;
#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{ArgsError, CliConfig, LogFormat};

pub use adapters::mysql::{ConnectionSettings, MySqlSink};
pub use crate::core::{
    pipeline::{IngestionPipeline, PipelineOptions},
    reader::RecordReader,
};
pub use domain::model::{IngestionOutcome, IngestionSummary, PersonRecord, RawRow};
pub use domain::ports::UserSink;
pub use utils::error::{Result, UploadError};
