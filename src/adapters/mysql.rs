use crate::domain::model::PersonRecord;
use crate::domain::ports::UserSink;
use crate::utils::error::{Result, UploadError};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;

pub const USERS_TABLE: &str = "users";

const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (
    id INT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    surname VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL
)";

const INSERT_USER: &str = "INSERT INTO users (name, surname, email) VALUES (?, ?, ?)";

#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Created on connect if missing. Must be a plain identifier.
    pub database: String,
}

impl ConnectionSettings {
    fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
    }
}

/// [`UserSink`] over a single MySQL connection held for the whole run.
pub struct MySqlSink {
    conn: Option<MySqlConnection>,
}

impl MySqlSink {
    /// Connects to the server, then creates and selects `settings.database`.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self> {
        tracing::debug!(
            "Connecting to MySQL at {}:{} as {}",
            settings.host,
            settings.port,
            settings.username
        );

        let mut conn = MySqlConnection::connect_with(&settings.connect_options())
            .await
            .map_err(UploadError::ConnectionError)?;

        let create_database = format!("CREATE DATABASE IF NOT EXISTS `{}`", settings.database);
        sqlx::raw_sql(&create_database)
            .execute(&mut conn)
            .await
            .map_err(UploadError::ConnectionError)?;

        let use_database = format!("USE `{}`", settings.database);
        sqlx::raw_sql(&use_database)
            .execute(&mut conn)
            .await
            .map_err(UploadError::ConnectionError)?;

        tracing::info!("Connected to MySQL database '{}'", settings.database);
        Ok(Self { conn: Some(conn) })
    }

    fn connection(&mut self) -> Result<&mut MySqlConnection> {
        self.conn.as_mut().ok_or_else(|| UploadError::SinkError {
            message: "connection already closed".to_string(),
        })
    }
}

#[async_trait]
impl UserSink for MySqlSink {
    async fn ensure_table(&mut self) -> Result<()> {
        let conn = self.connection()?;
        sqlx::query(CREATE_USERS_TABLE).execute(&mut *conn).await?;
        Ok(())
    }

    async fn insert(&mut self, record: &PersonRecord) -> Result<()> {
        let conn = self.connection()?;
        sqlx::query(INSERT_USER)
            .bind(record.name.as_str())
            .bind(record.surname.as_str())
            .bind(record.email.as_str())
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().await?;
            tracing::debug!("MySQL connection closed");
        }
        Ok(())
    }
}
