//! Connection manager: owns the one logical database session and keeps it
//! alive across transient failures.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use std::time::Duration;

use serde_json::Value;
use tender_model::QueryResult;
use tokio::sync::{Mutex, Notify};
use tracing::{error, info, warn};

use crate::db::session::{
    DbSession, SessionError, SessionFactory, SessionResult,
};

/// Establishment retries after the initial attempt of a `connect()` call.
pub const MAX_RETRIES: u32 = 5;

/// Fixed delay between establishment retries. Intentionally not
/// exponential: the server keeps one session for its whole lifetime and
/// tolerates a slow cadence, unlike client requests which must fail fast.
pub const RETRY_DELAY: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            2 => ConnectionState::Connected,
            1 => ConnectionState::Connecting,
            _ => ConnectionState::Disconnected,
        }
    }
}

/// Owns the session and the reconnect state machine.
///
/// Constructed once at startup and injected into the gateway; all state
/// lives here rather than in process-wide globals so the machine is
/// testable against a stub [`SessionFactory`].
pub struct ConnectionManager {
    factory: Box<dyn SessionFactory>,
    session: Mutex<Option<Box<dyn DbSession>>>,
    state: AtomicU8,
    retries: AtomicU32,
    in_flight: AtomicBool,
    settled: Notify,
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("state", &self.state())
            .field("retries", &self.retries.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl ConnectionManager {
    pub fn new(factory: Box<dyn SessionFactory>) -> Self {
        Self {
            factory,
            session: Mutex::new(None),
            state: AtomicU8::new(ConnectionState::Disconnected as u8),
            retries: AtomicU32::new(0),
            in_flight: AtomicBool::new(false),
            settled: Notify::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Flip to `Disconnected` without touching the session handle; the next
    /// `connect()` disposes it.
    pub fn mark_disconnected(&self) {
        self.set_state(ConnectionState::Disconnected);
    }

    /// Establish the session, retrying with a fixed delay up to
    /// [`MAX_RETRIES`] times. Returns whether the manager ended up
    /// `Connected`.
    ///
    /// No-op when already connected. Concurrent callers converge on the
    /// in-flight attempt: exactly one drives establishment, the rest wait
    /// for it to settle.
    pub async fn connect(&self) -> bool {
        loop {
            if self.is_connected() {
                return true;
            }

            if self
                .in_flight
                .compare_exchange(
                    false,
                    true,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                let connected = self.drive_connect().await;
                self.in_flight.store(false, Ordering::Release);
                self.settled.notify_waiters();
                return connected;
            }

            // Another caller is driving the attempt; wait for it to settle.
            // Register interest before re-checking the flag so a wakeup
            // between the check and the await cannot be missed.
            let mut settled = std::pin::pin!(self.settled.notified());
            settled.as_mut().enable();
            if !self.in_flight.load(Ordering::Acquire) {
                continue;
            }
            settled.await;
            return self.is_connected();
        }
    }

    async fn drive_connect(&self) -> bool {
        loop {
            self.set_state(ConnectionState::Connecting);

            // Dispose any stale handle; disposal errors are swallowed.
            if let Some(mut stale) = self.session.lock().await.take() {
                if let Err(err) = stale.close().await {
                    warn!(error = %err, "failed to dispose stale session");
                }
            }

            match self.factory.open().await {
                Ok(session) => {
                    *self.session.lock().await = Some(session);
                    self.set_state(ConnectionState::Connected);
                    self.retries.store(0, Ordering::Release);
                    info!("connected to database");
                    return true;
                }
                Err(err) => {
                    self.set_state(ConnectionState::Disconnected);
                    error!(error = %err, "database connection error");

                    let used = self.retries.load(Ordering::Acquire);
                    if used >= MAX_RETRIES {
                        warn!(
                            "max connection retries reached, continuing \
                             without database"
                        );
                        return false;
                    }

                    let attempt = used + 1;
                    self.retries.store(attempt, Ordering::Release);
                    info!(
                        attempt,
                        max = MAX_RETRIES,
                        delay_ms = RETRY_DELAY.as_millis() as u64,
                        "retrying connection"
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }

    /// Kick off `connect()` on a spawned task without blocking the caller.
    pub fn spawn_reconnect(self: Arc<Self>) {
        tokio::spawn(async move {
            self.connect().await;
        });
    }

    /// Execute against the owned session. The caller (gateway) classifies
    /// the error and decides whether to trigger reconnection.
    pub async fn execute(
        &self,
        text: &str,
        params: &[Value],
    ) -> SessionResult<QueryResult> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(SessionError::NoSession)?;
        session.execute(text, params).await
    }

    /// Lightweight liveness check. A failure flips the manager to
    /// `Disconnected` and starts reconnection in the background before the
    /// error returns.
    pub async fn probe(self: Arc<Self>) -> SessionResult<()> {
        let result = {
            let mut guard = self.session.lock().await;
            let session = guard.as_mut().ok_or(SessionError::NoSession)?;
            session.probe().await
        };

        if let Err(err) = result {
            error!(error = %err, "database health check failed");
            self.mark_disconnected();
            self.spawn_reconnect();
            return Err(err);
        }

        Ok(())
    }

    /// Release the session on shutdown. Release failures are logged, never
    /// escalated.
    pub async fn shutdown(&self) {
        if let Some(mut session) = self.session.lock().await.take() {
            match session.close().await {
                Ok(()) => info!("database connection closed"),
                Err(err) => {
                    error!(error = %err, "error closing database connection")
                }
            }
        }
        self.set_state(ConnectionState::Disconnected);
    }
}
