#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tender_model::QueryResult;
use tender_server::db::{
    ConnectionManager, DbSession, SessionError, SessionFactory, SessionResult,
};

/// Session factory with a scripted sequence of `open()` outcomes.
///
/// `false` entries fail, `true` entries succeed; once the script runs dry
/// every open succeeds (unless built with [`StubFactory::always_failing`]).
/// Attempt and close counts are observable through shared atomics.
pub struct StubFactory {
    script: Mutex<VecDeque<bool>>,
    always_fail: bool,
    delay: Option<Duration>,
    pub attempts: Arc<AtomicU32>,
    pub fail_probe: Arc<AtomicBool>,
    pub closed: Arc<AtomicU32>,
}

impl StubFactory {
    /// Fail the first `failures` opens, then succeed.
    pub fn new(failures: usize) -> Self {
        Self::from_script(vec![false; failures])
    }

    pub fn from_script(outcomes: impl IntoIterator<Item = bool>) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            always_fail: false,
            delay: None,
            attempts: Arc::new(AtomicU32::new(0)),
            fail_probe: Arc::new(AtomicBool::new(false)),
            closed: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn always_failing() -> Self {
        let mut factory = Self::new(0);
        factory.always_fail = true;
        factory
    }

    /// Make every `open()` take `delay` before resolving, so tests can
    /// overlap concurrent connect attempts under a paused clock.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl SessionFactory for StubFactory {
    async fn open(&self) -> SessionResult<Box<dyn DbSession>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.attempts.fetch_add(1, Ordering::SeqCst);
        let succeeds = !self.always_fail
            && self
                .script
                .lock()
                .expect("script poisoned")
                .pop_front()
                .unwrap_or(true);
        if !succeeds {
            return Err(SessionError::Connect("connection refused".into()));
        }

        Ok(Box::new(StubSession {
            fail_probe: Arc::clone(&self.fail_probe),
            closed: Arc::clone(&self.closed),
        }))
    }
}

/// Session whose behavior is scripted through the query text:
/// `FAIL <msg>` fails plainly, `RESET <msg>` fails reset-class, anything
/// else returns a single `{"ok": true}` row.
pub struct StubSession {
    fail_probe: Arc<AtomicBool>,
    closed: Arc<AtomicU32>,
}

#[async_trait]
impl DbSession for StubSession {
    async fn execute(
        &mut self,
        text: &str,
        _params: &[Value],
    ) -> SessionResult<QueryResult> {
        if let Some(message) = text.strip_prefix("FAIL ") {
            return Err(SessionError::Query {
                message: message.to_string(),
                reset: false,
            });
        }
        if let Some(message) = text.strip_prefix("RESET ") {
            return Err(SessionError::Query {
                message: message.to_string(),
                reset: true,
            });
        }

        let mut row = Map::new();
        row.insert("ok".to_string(), json!(true));
        Ok(QueryResult {
            rows: vec![row],
            row_count: 1,
            fields: None,
        })
    }

    async fn probe(&mut self) -> SessionResult<()> {
        if self.fail_probe.load(Ordering::SeqCst) {
            return Err(SessionError::Query {
                message: "terminating connection due to administrator \
                          command"
                    .to_string(),
                reset: true,
            });
        }
        Ok(())
    }

    async fn close(&mut self) -> SessionResult<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Factory handing out pre-built sessions in order; opens fail once the
/// queue runs dry.
pub struct QueueFactory {
    sessions: Mutex<VecDeque<Box<dyn DbSession>>>,
}

impl QueueFactory {
    pub fn new(sessions: Vec<Box<dyn DbSession>>) -> Self {
        Self {
            sessions: Mutex::new(sessions.into()),
        }
    }
}

#[async_trait]
impl SessionFactory for QueueFactory {
    async fn open(&self) -> SessionResult<Box<dyn DbSession>> {
        self.sessions
            .lock()
            .expect("session queue poisoned")
            .pop_front()
            .ok_or_else(|| SessionError::Connect("no session left".into()))
    }
}

/// A manager already holding a healthy stub session.
pub async fn connected_manager() -> (Arc<ConnectionManager>, Arc<AtomicBool>)
{
    let factory = StubFactory::new(0);
    let fail_probe = Arc::clone(&factory.fail_probe);
    let manager = Arc::new(ConnectionManager::new(Box::new(factory)));
    assert!(manager.connect().await);
    (manager, fail_probe)
}
