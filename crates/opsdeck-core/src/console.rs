// ── Console session ──
//
// Full lifecycle management for one console connection. Handles
// authentication, the initial collection loads, periodic refresh, and
// access to the per-resource sync coordinators.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use opsdeck_api::{AdminClient, TlsMode, TransportConfig};

use crate::config::{AuthMethod, ConsoleConfig, TlsVerification};
use crate::error::CoreError;
use crate::flags::FlagStore;
use crate::model::{Comparison, EntityId};
use crate::resources::{ComparisonApi, ContractApi, NotificationApi, SecurityRuleApi};
use crate::store::ConsoleStore;
use crate::sync::ResourceSync;

// ── ConnectionState ──────────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
    Failed,
}

/// Console build and health info from the status probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleStatus {
    pub version: String,
    pub healthy: bool,
}

/// The per-resource coordinators for one connected session.
pub struct ResourceSyncs {
    pub notifications: ResourceSync<NotificationApi>,
    pub contracts: ResourceSync<ContractApi>,
    pub security_rules: ResourceSync<SecurityRuleApi>,
    pub comparisons: ResourceSync<ComparisonApi>,
}

// ── Console ──────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ConsoleInner>`. Owns the store, the flag
/// store, the four resource coordinators, and the background refresh
/// task.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    store: Arc<ConsoleStore>,
    flags: FlagStore,
    connection_state: watch::Sender<ConnectionState>,
    syncs: Mutex<Option<Arc<ResourceSyncs>>>,
    client: Mutex<Option<Arc<AdminClient>>>,
    // Replaced on every connect so a reconnected console gets a live
    // refresh task again.
    cancel: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Console {
    /// Create a new Console from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to authenticate and load data.
    pub fn new(config: ConsoleConfig) -> Self {
        let store = Arc::new(ConsoleStore::new());
        let flags = FlagStore::new(config.flags);
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);

        Self {
            inner: Arc::new(ConsoleInner {
                config,
                store,
                flags,
                connection_state,
                syncs: Mutex::new(None),
                client: Mutex::new(None),
                cancel: Mutex::new(CancellationToken::new()),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Access the console configuration.
    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    /// Access the underlying store.
    pub fn store(&self) -> &Arc<ConsoleStore> {
        &self.inner.store
    }

    /// Access the section-visibility flags.
    pub fn flags(&self) -> &FlagStore {
        &self.inner.flags
    }

    // ── Connection lifecycle ─────────────────────────────────────────

    /// Connect to the console.
    ///
    /// Authenticates, probes the status endpoint, performs the initial
    /// load of every collection, and spawns the periodic refresh task.
    /// Any initial load failure aborts the connect and leaves the state
    /// [`Failed`](ConnectionState::Failed): views must render an error,
    /// never an empty collection that was not actually loaded.
    pub async fn connect(&self) -> Result<(), CoreError> {
        // `send_replace` stores the state even with zero receivers;
        // plain `send` would silently drop it.
        self.inner
            .connection_state
            .send_replace(ConnectionState::Connecting);

        match self.try_connect().await {
            Ok(()) => {
                self.inner
                    .connection_state
                    .send_replace(ConnectionState::Connected);
                info!("connected to console");
                Ok(())
            }
            Err(e) => {
                // Drop anything a partially successful load left behind;
                // connect is all-or-nothing.
                self.inner.store.clear();
                self.inner
                    .connection_state
                    .send_replace(ConnectionState::Failed);
                Err(e)
            }
        }
    }

    async fn try_connect(&self) -> Result<(), CoreError> {
        let config = &self.inner.config;
        let transport = build_transport(config);

        let client = match &config.auth {
            AuthMethod::Token(token) => {
                let client = AdminClient::from_token(config.url.as_str(), token, &transport)?;
                debug!("using bearer token auth");
                Arc::new(client)
            }
            AuthMethod::Session { username, password } => {
                let client = AdminClient::for_session(config.url.as_str(), &transport)?;
                let session = client.login(username, password).await?;
                debug!(username = %session.username, "session authentication successful");
                Arc::new(client)
            }
        };

        let status = client.status().await?;
        debug!(version = %status.version, "console reachable");

        let syncs = Arc::new(ResourceSyncs {
            notifications: ResourceSync::new(
                NotificationApi::new(Arc::clone(&client)),
                Arc::clone(self.inner.store.notifications()),
            ),
            contracts: ResourceSync::new(
                ContractApi::new(Arc::clone(&client)),
                Arc::clone(self.inner.store.contracts()),
            ),
            security_rules: ResourceSync::new(
                SecurityRuleApi::new(Arc::clone(&client)),
                Arc::clone(self.inner.store.security_rules()),
            ),
            comparisons: ResourceSync::new(
                ComparisonApi::new(Arc::clone(&client)),
                Arc::clone(self.inner.store.comparisons()),
            ),
        });

        // Initial loads, in parallel. All four must succeed.
        let (n, c, s, r) = tokio::join!(
            syncs.notifications.load(),
            syncs.contracts.load(),
            syncs.security_rules.load(),
            syncs.comparisons.load(),
        );
        n?;
        c?;
        s?;
        r?;
        self.inner.store.mark_refreshed();

        *lock(&self.inner.client) = Some(client);
        *lock(&self.inner.syncs) = Some(syncs);

        let interval_secs = config.refresh_interval_secs;
        if interval_secs > 0 {
            let cancel = CancellationToken::new();
            *lock(&self.inner.cancel) = cancel.clone();
            let console = self.clone();
            lock(&self.inner.task_handles).push(tokio::spawn(refresh_task(
                console,
                interval_secs,
                cancel,
            )));
        }

        debug!(
            notifications = self.inner.store.notification_count(),
            contracts = self.inner.store.contract_count(),
            security_rules = self.inner.store.security_rule_count(),
            comparisons = self.inner.store.comparison_count(),
            "initial load complete"
        );

        Ok(())
    }

    /// Disconnect from the console.
    ///
    /// Cancels the refresh task, logs out if session-based, drops the
    /// coordinators, and empties the store.
    pub async fn disconnect(&self) {
        lock(&self.inner.cancel).cancel();

        let handles: Vec<JoinHandle<()>> = lock(&self.inner.task_handles).drain(..).collect();
        for handle in handles {
            let _ = handle.await;
        }

        if matches!(self.inner.config.auth, AuthMethod::Session { .. }) {
            let client = lock(&self.inner.client).clone();
            if let Some(client) = client {
                if let Err(e) = client.logout().await {
                    warn!(error = %e, "logout failed (non-fatal)");
                }
            }
        }

        *lock(&self.inner.client) = None;
        *lock(&self.inner.syncs) = None;
        self.inner.store.clear();
        self.inner
            .connection_state
            .send_replace(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    /// Re-pull every collection from the console.
    ///
    /// Collections that already loaded once keep their stale contents
    /// on failure; the first error is reported after all four loads
    /// have settled.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let syncs = self.syncs()?;

        let (n, c, s, r) = tokio::join!(
            syncs.notifications.load(),
            syncs.contracts.load(),
            syncs.security_rules.load(),
            syncs.comparisons.load(),
        );
        n?;
        c?;
        s?;
        r?;

        self.inner.store.mark_refreshed();
        debug!("refresh complete");
        Ok(())
    }

    // ── Coordinator access ───────────────────────────────────────────

    /// The per-resource coordinators, available while connected.
    pub fn syncs(&self) -> Result<Arc<ResourceSyncs>, CoreError> {
        lock(&self.inner.syncs).clone().ok_or(CoreError::Disconnected)
    }

    // ── Detail fetches ───────────────────────────────────────────────

    /// Re-probe the status endpoint of the connected console.
    pub async fn status(&self) -> Result<ConsoleStatus, CoreError> {
        let client = lock(&self.inner.client)
            .clone()
            .ok_or(CoreError::Disconnected)?;
        let status = client.status().await?;
        Ok(ConsoleStatus {
            version: status.version,
            healthy: status.healthy,
        })
    }

    /// Fetch one comparison run's current state and fold it into the
    /// store (detail views poll this while a run is in progress).
    pub async fn comparison_detail(&self, id: &EntityId) -> Result<Arc<Comparison>, CoreError> {
        let syncs = self.syncs()?;
        let run = syncs.comparisons.client().fetch(id).await?;
        Ok(self.inner.store.comparisons().upsert(run))
    }

    // ── One-shot convenience ─────────────────────────────────────────

    /// One-shot: connect, run closure, disconnect.
    ///
    /// Suits scripted callers that need a single request-response
    /// cycle; the periodic refresh is disabled.
    pub async fn oneshot<F, Fut, T>(config: ConsoleConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Console) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.refresh_interval_secs = 0;

        let console = Console::new(cfg);
        console.connect().await?;
        let result = f(console.clone()).await;
        console.disconnect().await;
        result
    }

    // ── State observation ────────────────────────────────────────────

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.inner.connection_state.borrow().clone()
    }

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Periodically refresh collections from the console.
///
/// Consecutive failures surface as `Reconnecting { attempt }`; the
/// first success afterwards restores `Connected`.
async fn refresh_task(console: Console, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // consume the immediate first tick

    let mut failures: u32 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                match console.refresh().await {
                    Ok(()) => {
                        if failures > 0 {
                            failures = 0;
                            console
                                .inner
                                .connection_state
                                .send_replace(ConnectionState::Connected);
                            info!("periodic refresh recovered");
                        }
                    }
                    Err(e) => {
                        failures += 1;
                        warn!(error = %e, attempt = failures, "periodic refresh failed");
                        console
                            .inner
                            .connection_state
                            .send_replace(ConnectionState::Reconnecting { attempt: failures });
                    }
                }
            }
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build a [`TransportConfig`] from the console configuration.
fn build_transport(config: &ConsoleConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
        cookie_jar: None, // AdminClient::for_session adds one when needed
    }
}
