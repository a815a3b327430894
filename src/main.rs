use user_upload::utils::{logger, validation::Validate};
use user_upload::{
    ArgsError, CliConfig, IngestionPipeline, IngestionSummary, LogFormat, MySqlSink, UploadError, UserSink,
};

enum Run {
    TableCreated,
    Ingested(IngestionSummary),
}

fn fail(e: &UploadError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(e.exit_code());
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match CliConfig::try_parse_args(std::env::args_os()) {
        Ok(config) => config,
        Err(ArgsError::Help(help)) => help.exit(),
        Err(ArgsError::Invalid(e)) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    logger::init_logger(config.verbose, config.log_format == LogFormat::Json);

    tracing::info!("Starting user-upload");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let sink = match MySqlSink::connect(&config.connection_settings()).await {
        Ok(sink) => sink,
        Err(e) => fail(&e),
    };

    let mut pipeline = IngestionPipeline::new(sink, config.pipeline_options());

    let result = if config.create_table {
        pipeline.prepare().await.map(|_| Run::TableCreated)
    } else {
        match config.file.as_deref() {
            Some(file) => pipeline.run(file).await.map(Run::Ingested),
            None => Err(UploadError::MissingConfigError {
                field: "file".to_string(),
            }),
        }
    };

    // the connection is released on every path, including fatal ones
    if let Err(e) = pipeline.into_sink().close().await {
        tracing::warn!("Failed to close MySQL connection: {}", e);
    }

    match result {
        Ok(Run::TableCreated) => {
            println!("Table 'users' created successfully");
        }
        Ok(Run::Ingested(summary)) => {
            if summary.rejected() > 0 {
                tracing::warn!("{} of {} rows were rejected", summary.rejected(), summary.total());
            }
            print_summary(&summary, config.log_format);
        }
        Err(e) => fail(&e),
    }
}

fn print_summary(summary: &IngestionSummary, format: LogFormat) {
    match format {
        LogFormat::Text => {
            println!("✅ Upload finished: {}", summary);
        }
        LogFormat::Json => match serde_json::to_string(summary) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::warn!("Failed to serialize summary: {}", e),
        },
    }
}
