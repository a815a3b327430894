use crate::adapters::mysql::ConnectionSettings;
use crate::core::pipeline::PipelineOptions;
use crate::utils::error::{Result, UploadError};
use crate::utils::validation::{
    validate_identifier, validate_non_empty_string, validate_path, validate_required_field, Validate,
};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ArgAction, Parser, ValueEnum};
use std::ffi::OsString;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

// `-h` is the MySQL host, so clap's own help flag is replaced by a long-only `--help`.
#[derive(Clone, Parser)]
#[command(name = "user-upload")]
#[command(about = "Load users from a CSV file into the MySQL users table")]
#[command(disable_help_flag = true)]
pub struct CliConfig {
    /// Name of the CSV file to be parsed
    #[arg(long, value_name = "csv file name")]
    pub file: Option<String>,

    /// Build the MySQL users table and exit; no rows are processed
    #[arg(long = "create_table")]
    pub create_table: bool,

    /// Run the whole import but do not insert into the database
    #[arg(long = "dry_run")]
    pub dry_run: bool,

    /// MySQL username
    #[arg(short = 'u', value_name = "MySQL username", default_value = "username")]
    pub username: String,

    /// MySQL password
    #[arg(short = 'p', value_name = "MySQL password", default_value = "password")]
    pub password: String,

    /// MySQL host
    #[arg(short = 'h', value_name = "MySQL host", default_value = "localhost")]
    pub host: String,

    /// MySQL port
    #[arg(long, default_value_t = 3306)]
    pub port: u16,

    /// Database holding the users table; created if missing
    #[arg(long, default_value = "task")]
    pub database: String,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Log output format
    #[arg(long = "log_format", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Print this list of directives
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

/// Why the command line did not produce a config.
#[derive(Debug)]
pub enum ArgsError {
    /// `--help` was given; print it and exit 0.
    Help(clap::Error),
    Invalid(UploadError),
}

impl CliConfig {
    /// Parses the command line. `--help` wins over every other argument, and
    /// usage errors become [`UploadError`]s so they exit with status 1.
    pub fn try_parse_args<I, T>(args: I) -> std::result::Result<Self, ArgsError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        if args.iter().skip(1).any(|arg| arg == "--help") {
            let bin = args
                .first()
                .cloned()
                .unwrap_or_else(|| OsString::from("user-upload"));
            return Self::try_parse_from([bin, OsString::from("--help")]).map_err(ArgsError::Help);
        }

        Self::try_parse_from(args).map_err(|err| match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ArgsError::Help(err),
            _ if names_file_option(&err) => ArgsError::Invalid(UploadError::MissingConfigError {
                field: "file".to_string(),
            }),
            _ => ArgsError::Invalid(UploadError::UsageError {
                message: err.render().to_string().trim_end().to_string(),
            }),
        })
    }

    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            dry_run: self.dry_run,
        }
    }
}

fn names_file_option(err: &clap::Error) -> bool {
    matches!(
        err.get(ContextKind::InvalidArg),
        Some(ContextValue::String(arg)) if arg.split_whitespace().next() == Some("--file")
    )
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("file", &self.file)
            .field("create_table", &self.create_table)
            .field("dry_run", &self.dry_run)
            .field("username", &self.username)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("verbose", &self.verbose)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let file = validate_required_field("file", &self.file)?;
        validate_path("file", file)?;
        validate_non_empty_string("host", &self.host)?;
        validate_non_empty_string("username", &self.username)?;
        validate_identifier("database", &self.database)?;
        Ok(())
    }
}
