//! The execution context every stage runs in.
//!
//! A `Session` owns a dedicated Rayon thread pool. It is created once per
//! run and handed to stages explicitly; nothing in the pipeline reaches for
//! a global pool.

use crate::error::Result;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Handle to the compute pool for one batch run
///
/// Share it with `Arc<Session>` when stages run on other threads (e.g.
/// inside `spawn_blocking`).
pub struct Session {
    app_name: String,
    pool: ThreadPool,
}

impl Session {
    /// Start configuring a session
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// A session with one worker per available core
    pub fn local() -> Result<Self> {
        Self::builder().build()
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Number of worker threads in the pool
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `op` inside the session's pool
    ///
    /// Any Rayon parallel iterator used inside `op` executes on this pool.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("app_name", &self.app_name)
            .field("num_threads", &self.num_threads())
            .finish()
    }
}

/// Builder for [`Session`]
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    app_name: String,
    num_threads: Option<usize>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            app_name: "movielens-als".to_string(),
            num_threads: None,
        }
    }
}

impl SessionBuilder {
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Fix the worker count (default: number of cores)
    ///
    /// `0` means "use the default".
    pub fn num_threads(mut self, n: usize) -> Self {
        self.num_threads = (n > 0).then_some(n);
        self
    }

    pub fn build(self) -> Result<Session> {
        let prefix = self.app_name.clone();
        let mut builder =
            ThreadPoolBuilder::new().thread_name(move |i| format!("{}-worker-{}", prefix, i));
        if let Some(n) = self.num_threads {
            builder = builder.num_threads(n);
        }

        Ok(Session {
            app_name: self.app_name,
            pool: builder.build()?,
        })
    }
}
