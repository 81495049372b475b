//! Execution contexts for asynchronous completions.
//!
//! An asynchronous connection call finishes on the connection's writer
//! thread; its completion is then handed to the [`ExecutionContext`] the
//! caller chose. There is no implicit default context.

/// A unit of work handed to an [`ExecutionContext`].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Somewhere a completion can run.
pub trait ExecutionContext: Send + 'static {
    /// Run `job` exactly once on this context.
    fn execute(&self, job: Job);
}

/// Runs the job immediately on the thread that finished the transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl ExecutionContext for Inline {
    fn execute(&self, job: Job) {
        job();
    }
}

/// Spawns the job as a task on a tokio runtime.
impl ExecutionContext for tokio::runtime::Handle {
    fn execute(&self, job: Job) {
        self.spawn(async move { job() });
    }
}
