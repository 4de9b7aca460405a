//! Primary/replica routing.
//!
//! Decides, per operation, which connection serves it. Writes always go to
//! the primary. Reads are spread over the replicas by a [`ReadPolicy`], or go
//! to the primary when no replica is configured. Membership is fixed at
//! construction; there is no health tracking and no fallback on failure.

use std::sync::Arc;

use rand::Rng;

/// Kind of work a query performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

/// Connection chosen for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Primary,
    /// Index into the configured replica list.
    Replica(usize),
}

/// Selection policy for read traffic.
pub trait ReadPolicy: Send + Sync + 'static {
    /// Index of the replica to read from. `replicas` is at least 1.
    fn choose(&self, replicas: usize) -> usize;
}

/// Uniformly random replica selection using the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPolicy;

impl ReadPolicy for RandomPolicy {
    fn choose(&self, replicas: usize) -> usize {
        pick_index(replicas, &mut rand::rng()).unwrap_or(0)
    }
}

/// Uniformly random index in `0..len`, or `None` for an empty list.
pub fn pick_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    (len > 0).then(|| rng.random_range(0..len))
}

/// Holds the primary connection, the replica connections and the read policy.
///
/// Generic over the connection type so the same routing serves every
/// backend (and plain values in tests).
pub struct ReplicaRouter<P> {
    primary: P,
    replicas: Vec<P>,
    policy: Arc<dyn ReadPolicy>,
}

impl<P> ReplicaRouter<P> {
    /// Creates a router with no replicas and the random read policy.
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            replicas: Vec::new(),
            policy: Arc::new(RandomPolicy),
        }
    }

    /// Adds read-only replica connections.
    pub fn with_replicas(mut self, replicas: impl IntoIterator<Item = P>) -> Self {
        self.replicas.extend(replicas);
        self
    }

    /// Replaces the read policy.
    pub fn with_policy(mut self, policy: impl ReadPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Returns the primary connection.
    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn replica_count(&self) -> usize {
        self.replicas.len()
    }

    /// Decides where `op` runs.
    pub fn route(&self, op: Operation) -> Route {
        match op {
            Operation::Write => Route::Primary,
            Operation::Read if self.replicas.is_empty() => Route::Primary,
            Operation::Read => {
                // Out-of-range answers from a custom policy wrap around.
                let n = self.replicas.len();
                Route::Replica(self.policy.choose(n) % n)
            }
        }
    }

    /// Returns the connection that serves `op`.
    pub fn connection(&self, op: Operation) -> &P {
        let route = self.route(op);
        tracing::debug!(?op, ?route, "routing query");

        match route {
            Route::Primary => &self.primary,
            Route::Replica(i) => &self.replicas[i],
        }
    }

    /// Connection for writes (always the primary).
    pub fn writer(&self) -> &P {
        self.connection(Operation::Write)
    }

    /// Connection for reads.
    pub fn reader(&self) -> &P {
        self.connection(Operation::Read)
    }
}
