use async_trait::async_trait;
use spicy_dns_application::ports::RecordSink;
use spicy_dns_domain::config::DatabaseConfig;
use spicy_dns_domain::{DomainError, ResolvedRecord};
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const INSERT_PREFIX: &str = "INSERT INTO records (domain, record_type, record, ttl, is_expired) VALUES ";
const ROW_PLACEHOLDERS: &str = "(?, ?, ?, ?, ?)";

/// Flattened row for the channel (owned data, Send-safe).
struct RecordEntry {
    domain: String,
    record_type: i64,
    value: String,
    ttl: i64,
    expired: bool,
}

impl From<ResolvedRecord> for RecordEntry {
    fn from(record: ResolvedRecord) -> Self {
        Self {
            domain: record.domain.as_str().to_string(),
            record_type: i64::from(record.record_type),
            value: record.value,
            ttl: i64::from(record.ttl),
            expired: record.expired,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BatchSettings {
    max_batch_size: usize,
    flush_interval: Duration,
}

#[derive(Debug, Default)]
struct WriteCounters {
    inserted: AtomicU64,
    failed: AtomicU64,
}

/// SQLite-backed `RecordSink`.
///
/// `write` only enqueues; a single flush task drains the channel into
/// multi-row INSERTs. A batch that fails is replayed row by row so one bad
/// row costs one record, not the whole batch.
pub struct SqliteRecordRepository {
    pool: SqlitePool,
    sender: mpsc::Sender<RecordEntry>,
    shutdown: CancellationToken,
    closed: AtomicBool,
    flush_task: Mutex<Option<JoinHandle<()>>>,
    counters: Arc<WriteCounters>,
}

impl SqliteRecordRepository {
    pub fn new(pool: SqlitePool, config: &DatabaseConfig) -> Self {
        let capacity = config.channel_capacity.max(1);
        let settings = BatchSettings {
            max_batch_size: config.max_batch_size.max(1),
            flush_interval: Duration::from_millis(config.flush_interval_ms.max(1)),
        };

        let (sender, receiver) = mpsc::channel(capacity);
        let shutdown = CancellationToken::new();
        let counters = Arc::new(WriteCounters::default());

        let flush_task = tokio::spawn(Self::flush_loop(
            pool.clone(),
            receiver,
            settings,
            shutdown.clone(),
            Arc::clone(&counters),
        ));

        info!(
            channel_capacity = capacity,
            batch_size = settings.max_batch_size,
            flush_interval_ms = settings.flush_interval.as_millis() as u64,
            "Record batching enabled"
        );

        Self {
            pool,
            sender,
            shutdown,
            closed: AtomicBool::new(false),
            flush_task: Mutex::new(Some(flush_task)),
            counters,
        }
    }

    /// Mark every current row as expired. Returns the number of rows touched.
    pub async fn expire_previous(&self) -> Result<u64, DomainError> {
        let result = sqlx::query("UPDATE records SET is_expired = 1 WHERE is_expired = 0")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let expired = result.rows_affected();
        info!(expired, "Previous records marked expired");
        Ok(expired)
    }

    pub async fn count_records(&self, include_expired: bool) -> Result<i64, DomainError> {
        let sql = if include_expired {
            "SELECT COUNT(*) FROM records"
        } else {
            "SELECT COUNT(*) FROM records WHERE is_expired = 0"
        };

        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))
    }

    /// Rows committed so far by the flush task.
    pub fn inserted(&self) -> u64 {
        self.counters.inserted.load(Ordering::Relaxed)
    }

    async fn flush_loop(
        pool: SqlitePool,
        mut receiver: mpsc::Receiver<RecordEntry>,
        settings: BatchSettings,
        shutdown: CancellationToken,
        counters: Arc<WriteCounters>,
    ) {
        let mut batch: Vec<RecordEntry> = Vec::with_capacity(settings.max_batch_size);
        let mut flush_interval = tokio::time::interval(settings.flush_interval);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    // Refuse new sends, keep what is already queued
                    receiver.close();
                    while let Some(entry) = receiver.recv().await {
                        batch.push(entry);
                        if batch.len() >= settings.max_batch_size {
                            Self::flush_batch(&pool, &mut batch, &counters).await;
                        }
                    }
                    Self::flush_batch(&pool, &mut batch, &counters).await;
                    info!("Record flush task shutting down");
                    return;
                }
                maybe_entry = receiver.recv() => {
                    match maybe_entry {
                        Some(entry) => {
                            batch.push(entry);
                            while batch.len() < settings.max_batch_size {
                                match receiver.try_recv() {
                                    Ok(e) => batch.push(e),
                                    Err(_) => break,
                                }
                            }
                            if batch.len() >= settings.max_batch_size {
                                Self::flush_batch(&pool, &mut batch, &counters).await;
                            }
                        }
                        None => {
                            Self::flush_batch(&pool, &mut batch, &counters).await;
                            info!("Record flush task shutting down");
                            return;
                        }
                    }
                }
                _ = flush_interval.tick() => {
                    Self::flush_batch(&pool, &mut batch, &counters).await;
                }
            }
        }
    }

    async fn flush_batch(pool: &SqlitePool, batch: &mut Vec<RecordEntry>, counters: &WriteCounters) {
        let count = batch.len();
        if count == 0 {
            return;
        }

        let mut sql = String::from(INSERT_PREFIX);
        for i in 0..count {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(ROW_PLACEHOLDERS);
        }

        let mut query = sqlx::query(&sql);
        for entry in batch.iter() {
            query = query
                .bind(&entry.domain)
                .bind(entry.record_type)
                .bind(&entry.value)
                .bind(entry.ttl)
                .bind(if entry.expired { 1i64 } else { 0 });
        }

        match query.execute(pool).await {
            Ok(_) => {
                counters.inserted.fetch_add(count as u64, Ordering::Relaxed);
                debug!(count, "Record batch flushed");
            }
            Err(e) => {
                warn!(error = %e, count, "Batch insert failed, retrying rows individually");
                for entry in batch.iter() {
                    Self::insert_one(pool, entry, counters).await;
                }
            }
        }

        batch.clear();
    }

    async fn insert_one(pool: &SqlitePool, entry: &RecordEntry, counters: &WriteCounters) {
        let sql = format!("{}{}", INSERT_PREFIX, ROW_PLACEHOLDERS);
        let result = sqlx::query(&sql)
            .bind(&entry.domain)
            .bind(entry.record_type)
            .bind(&entry.value)
            .bind(entry.ttl)
            .bind(if entry.expired { 1i64 } else { 0 })
            .execute(pool)
            .await;

        match result {
            Ok(_) => {
                counters.inserted.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                error!(
                    domain = %entry.domain,
                    record_type = entry.record_type,
                    error = %e,
                    "Failed to insert record"
                );
            }
        }
    }
}

#[async_trait]
impl RecordSink for SqliteRecordRepository {
    async fn write(&self, record: ResolvedRecord) -> Result<(), DomainError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(DomainError::SinkClosed);
        }

        // Waits for room rather than dropping: every answer must reach the table
        self.sender
            .send(RecordEntry::from(record))
            .await
            .map_err(|_| DomainError::SinkClosed)
    }

    async fn close(&self) -> Result<(), DomainError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        self.shutdown.cancel();

        let handle = self
            .flush_task
            .lock()
            .map_err(|_| DomainError::DatabaseError("flush task lock poisoned".to_string()))?
            .take();

        if let Some(handle) = handle {
            handle
                .await
                .map_err(|e| DomainError::DatabaseError(format!("flush task failed: {}", e)))?;
        }

        info!(
            inserted = self.inserted(),
            failed = self.failed_writes(),
            "Record sink closed"
        );
        Ok(())
    }

    fn failed_writes(&self) -> u64 {
        self.counters.failed.load(Ordering::Relaxed)
    }
}
