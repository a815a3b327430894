use crate::domain::model::PersonRecord;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where accepted records are persisted.
///
/// Calls are strictly sequential; implementations need not be safe for
/// concurrent use.
#[async_trait]
pub trait UserSink: Send {
    /// Creates the `users` table if it does not exist yet.
    async fn ensure_table(&mut self) -> Result<()>;

    async fn insert(&mut self, record: &PersonRecord) -> Result<()>;

    /// Releases the underlying connection. Calling it again is a no-op.
    async fn close(&mut self) -> Result<()>;
}
