use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::config::StoreConfig;
use crate::context::{ExecutionContext, Job};
use crate::error::{StoreError, StoreResult};
use crate::traits::{Connection, ReadTransaction, WriteTransaction};
use crate::transaction::{Collections, MemoryReadTransaction, MemoryWriteTransaction};

/// State shared by a database and all of its connections.
struct Shared {
    collections: RwLock<Collections>,
    /// Single-writer lock: at most one write transaction runs at a time
    /// across every connection of the database.
    writer: Mutex<()>,
    config: StoreConfig,
    next_connection: AtomicU64,
}

impl Shared {
    fn run_read<R, E, F>(&self, block: F) -> Result<R, E>
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<R, E>,
        E: From<StoreError>,
    {
        let collections = self
            .collections
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let tx = MemoryReadTransaction::new(&collections);
        block(&tx)
    }

    fn run_write<R, E, F>(&self, block: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<R, E>,
        E: From<StoreError>,
    {
        // The lock guards no data; changes of a panicking block are dropped
        // with its transaction.
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut tx = MemoryWriteTransaction::new(&self.collections, &self.config);
        let value = block(&mut tx)?;
        tx.commit()?;
        Ok(value)
    }
}

/// In-memory, `HashMap`-based transactional store.
///
/// Intended for tests and embedding. Collections keep their keys ordered, so
/// key enumeration is stable between calls. Data is lost when the last
/// handle is dropped.
#[derive(Clone)]
pub struct InMemoryDatabase {
    shared: Arc<Shared>,
}

impl InMemoryDatabase {
    /// Create an empty database with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(StoreConfig::default())
    }

    /// Create an empty database, validating `config` first.
    pub fn with_config(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: StoreConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                collections: RwLock::new(Collections::new()),
                writer: Mutex::new(()),
                config,
                next_connection: AtomicU64::new(1),
            }),
        }
    }

    /// Open a new connection with its own background writer thread.
    pub fn connection(&self) -> StoreResult<MemoryConnection> {
        MemoryConnection::open(Arc::clone(&self.shared))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.shared.config
    }

    /// Number of items stored across all collections.
    pub fn len(&self) -> usize {
        self.shared
            .collections
            .read()
            .map(|c| c.values().map(|keys| keys.len()).sum())
            .unwrap_or(0)
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InMemoryDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryDatabase")
            .field("item_count", &self.len())
            .finish()
    }
}

/// A connection to an [`InMemoryDatabase`].
///
/// Synchronous calls run on the caller's thread. Asynchronous calls are
/// queued to a dedicated writer thread owned by the connection and run in
/// submission order. The thread exits once the connection is dropped and its
/// queue has drained.
pub struct MemoryConnection {
    id: u64,
    shared: Arc<Shared>,
    queue: mpsc::UnboundedSender<Job>,
}

impl MemoryConnection {
    fn open(shared: Arc<Shared>) -> StoreResult<Self> {
        let id = shared.next_connection.fetch_add(1, Ordering::Relaxed);
        let (queue, mut jobs) = mpsc::unbounded_channel::<Job>();
        let name = format!("{}-{id}", shared.config.writer_thread_name);

        thread::Builder::new().name(name.clone()).spawn(move || {
            debug!(thread = %name, "connection writer started");
            while let Some(job) = jobs.blocking_recv() {
                if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                    error!(thread = %name, "queued transaction panicked");
                }
            }
            debug!(thread = %name, "connection writer stopped");
        })?;

        Ok(Self { id, shared, queue })
    }

    /// Identifier of this connection within its database.
    pub fn id(&self) -> u64 {
        self.id
    }

    fn enqueue(&self, job: Job) -> StoreResult<()> {
        self.queue.send(job).map_err(|_| StoreError::WriterClosed)
    }
}

impl fmt::Debug for MemoryConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryConnection")
            .field("id", &self.id)
            .finish()
    }
}

impl Connection for MemoryConnection {
    fn read<R, E, F>(&self, block: F) -> Result<R, E>
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<R, E>,
        E: From<StoreError>,
    {
        self.shared.run_read(block)
    }

    fn write<R, E, F>(&self, block: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<R, E>,
        E: From<StoreError>,
    {
        self.shared.run_write(block)
    }

    fn async_write<R, E, F, X, C>(&self, block: F, context: X, completion: Option<C>)
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: From<StoreError> + fmt::Display + Send + 'static,
        X: ExecutionContext,
        C: FnOnce(Result<R, E>) + Send + 'static,
    {
        let connection = self.id;
        if self.queue.is_closed() {
            warn!(connection, "async write rejected: connection writer has shut down");
            if let Some(completion) = completion {
                context.execute(Box::new(move || completion(Err(StoreError::WriterClosed.into()))));
            }
            return;
        }

        let shared = Arc::clone(&self.shared);
        let job: Job = Box::new(move || {
            let outcome = shared.run_write(block);
            match completion {
                Some(completion) => context.execute(Box::new(move || completion(outcome))),
                None => {
                    if let Err(e) = outcome {
                        error!(connection, error = %e, "async write failed");
                    }
                }
            }
        });

        if self.enqueue(job).is_err() {
            warn!(connection, "async write dropped: connection writer shut down while queueing");
        }
    }

    fn async_read<R, E, F, X, C>(&self, block: F, context: X, completion: C)
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: From<StoreError> + Send + 'static,
        X: ExecutionContext,
        C: FnOnce(Result<R, E>) + Send + 'static,
    {
        if self.queue.is_closed() {
            warn!(connection = self.id, "async read rejected: connection writer has shut down");
            context.execute(Box::new(move || completion(Err(StoreError::WriterClosed.into()))));
            return;
        }

        let shared = Arc::clone(&self.shared);
        let job: Job = Box::new(move || {
            let outcome = shared.run_read(block);
            context.execute(Box::new(move || completion(outcome)));
        });

        if self.enqueue(job).is_err() {
            warn!(
                connection = self.id,
                "async read dropped: connection writer shut down while queueing"
            );
        }
    }
}
