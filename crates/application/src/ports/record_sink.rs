use async_trait::async_trait;
use spicy_dns_domain::{DomainError, ResolvedRecord};

/// Durable destination for resolved records.
///
/// Called concurrently from every worker, once per record.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Submit one record.
    ///
    /// # Errors
    ///
    /// * `DomainError::SinkClosed` - If `close` has already been called
    /// * `DomainError::DatabaseError` - If the store rejected the write synchronously
    async fn write(&self, record: ResolvedRecord) -> Result<(), DomainError>;

    /// Stop accepting writes and wait until everything submitted is stored.
    async fn close(&self) -> Result<(), DomainError> {
        Ok(())
    }

    /// Writes accepted by `write` that later failed to persist.
    fn failed_writes(&self) -> u64 {
        0
    }
}
