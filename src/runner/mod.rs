//! Runner module - service registration and lifecycle orchestration.
//!
//! The [`Runner`] holds an ordered registry of services and drives the
//! init → launch → await-signal → shutdown sequence:
//!
//! 1. Every registered service exposing the init capability is initialized
//!    sequentially, in registration order, before anything starts.
//! 2. Every service's `start` is spawned on its own task, fire-and-forget,
//!    in registration order.
//! 3. The runner blocks until SIGINT or SIGTERM arrives.
//! 4. Every service's `stop` is awaited sequentially, then control returns to
//!    the caller (the binary maps a clean return to exit status 0).
//!
//! Shutdown runs in registration order by default, matching startup order;
//! [`ShutdownOrder::Reverse`] is available via configuration.

pub mod signal;

use crate::config::{RunnerConfig, ShutdownOrder};
use crate::error::Result;
use crate::service::{short_type_name, Runnable};
use signal::SignalListener;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};

pub use signal::ShutdownSignal;

/// A registered service and its launch state.
struct ServiceEntry {
    /// Display name, resolved at registration.
    name: String,
    /// The service itself.
    service: Arc<dyn Runnable>,
    /// Handle of the launched run task. Present only after launch; used as
    /// the forced-termination backstop once the service has been stopped.
    handle: Option<JoinHandle<()>>,
    /// Guards the stop hook against repeated shutdown traversals.
    stopped: bool,
}

/// Process-lifecycle coordinator for long-running services.
///
/// Services are appended with [`register`](Runner::register) and the whole
/// lifecycle is driven by [`run`](Runner::run), which consumes the runner so
/// no registration can happen after it starts. [`run_until`](Runner::run_until)
/// is the embeddable variant taking a caller-supplied shutdown trigger in
/// place of the signal listener.
pub struct Runner {
    /// Ordered service registry. Insertion order is the iteration order for
    /// init, launch, and (by default) shutdown.
    services: Vec<ServiceEntry>,
    /// Traversal order for the shutdown cascade.
    shutdown_order: ShutdownOrder,
    /// Per-service deadline on the stop hook. `None` waits indefinitely.
    stop_timeout: Option<Duration>,
}

impl Runner {
    /// Creates an empty runner with default settings.
    pub fn new() -> Self {
        Self::from_config(&RunnerConfig::default())
    }

    /// Creates an empty runner from configuration.
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self {
            services: Vec::new(),
            shutdown_order: config.shutdown_order,
            stop_timeout: config.stop_timeout.map(Duration::from_secs),
        }
    }

    /// Registers a service.
    ///
    /// The display name comes from the naming capability when present,
    /// otherwise from the service's type name. Always succeeds.
    pub fn register<S>(&mut self, service: S)
    where
        S: Runnable + 'static,
    {
        let name = match service.as_nameable() {
            Some(nameable) => nameable.name(),
            None => short_type_name::<S>().to_string(),
        };

        info!(service = %name, "registered service");

        self.services.push(ServiceEntry {
            name,
            service: Arc::new(service),
            handle: None,
            stopped: false,
        });
    }

    /// Returns the number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns true if no services are registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Returns the resolved display names, in registration order.
    pub fn service_names(&self) -> Vec<&str> {
        self.services.iter().map(|e| e.name.as_str()).collect()
    }

    /// Initializes all services sequentially, in registration order.
    ///
    /// Services without the init capability are skipped. An error returned by
    /// an init hook is logged and does not stop the sequence. This is the
    /// first phase of [`run`](Runner::run); it is public mainly so embedders
    /// and tests can drive the phases separately.
    pub async fn init_all(&self) {
        for entry in &self.services {
            match entry.service.as_initializable() {
                Some(initializable) => {
                    if let Err(error) = initializable.init().await {
                        error!(service = %entry.name, %error, "service init failed");
                    }
                    info!(service = %entry.name, "service initialized");
                }
                None => {
                    info!(service = %entry.name, "service has no init hook, skipping");
                }
            }
        }
    }

    /// Spawns every service's run task, in registration order.
    ///
    /// Launch issuance is sequential but the launched work is concurrent; a
    /// "launched" log line only means the start was issued, not that the
    /// service is ready. A panic inside a service is contained by its task.
    fn launch_all(&mut self) {
        info!("starting registered services");

        for entry in &mut self.services {
            info!(service = %entry.name, "launching service");

            let service = Arc::clone(&entry.service);
            let name = entry.name.clone();
            entry.handle = Some(tokio::spawn(async move {
                if let Err(error) = service.start().await {
                    error!(service = %name, %error, "service run failed");
                }
            }));

            info!(service = %entry.name, "service launched");
        }
    }

    /// Drives the full lifecycle: init, launch, await SIGINT/SIGTERM, then
    /// the shutdown cascade.
    ///
    /// Returns after shutdown completes; the decision to exit the process is
    /// left to the caller. Intended to be called exactly once per process
    /// lifetime, which consuming `self` enforces.
    pub async fn run(mut self) -> Result<()> {
        self.init_all().await;
        self.launch_all();

        let mut signals = SignalListener::install()?;
        let received = signals.recv().await;
        info!(signal = %received, "termination signal received, shutting down");

        self.shutdown().await;
        info!("shutdown complete");
        Ok(())
    }

    /// Drives the full lifecycle with a caller-supplied shutdown trigger in
    /// place of the signal listener.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.init_all().await;
        self.launch_all();

        shutdown.await;

        self.shutdown().await;
        info!("shutdown complete");
        Ok(())
    }

    /// Runs the shutdown cascade: stops every not-yet-stopped service
    /// sequentially, in the configured order.
    ///
    /// The stop hook is invoked at most once per service, even across
    /// repeated calls. A stop error is logged and the cascade continues; a
    /// stop exceeding the configured deadline is abandoned with a warning.
    /// After a service's stop resolves (or is abandoned) its run task is
    /// aborted.
    pub async fn shutdown(&mut self) {
        let indices: Vec<usize> = match self.shutdown_order {
            ShutdownOrder::Forward => (0..self.services.len()).collect(),
            ShutdownOrder::Reverse => (0..self.services.len()).rev().collect(),
        };
        let stop_timeout = self.stop_timeout;

        for index in indices {
            let entry = &mut self.services[index];
            if entry.stopped {
                continue;
            }
            entry.stopped = true;

            info!(service = %entry.name, "stopping service");

            let result = match stop_timeout {
                Some(limit) => match timeout(limit, entry.service.stop()).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(
                            service = %entry.name,
                            timeout_secs = limit.as_secs(),
                            "stop deadline exceeded, abandoning service"
                        );
                        if let Some(handle) = entry.handle.take() {
                            handle.abort();
                        }
                        continue;
                    }
                },
                None => entry.service.stop().await,
            };

            if let Err(error) = result {
                error!(service = %entry.name, %error, "service stop failed");
            }
            if let Some(handle) = entry.handle.take() {
                handle.abort();
            }

            info!(service = %entry.name, "service stopped");
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::service::{Initializable, Nameable, Runnable};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio_test::assert_ok;

    type EventLog = Arc<Mutex<Vec<String>>>;

    fn events(log: &EventLog) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    async fn wait_for(log: &EventLog, needle: &str) {
        for _ in 0..500 {
            if log.lock().unwrap().iter().any(|e| e == needle) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("event '{}' was never recorded", needle);
    }

    struct MockService {
        label: &'static str,
        named: bool,
        has_init: bool,
        hang_on_stop: bool,
        log: EventLog,
    }

    impl MockService {
        fn new(label: &'static str, log: EventLog) -> Self {
            Self {
                label,
                named: true,
                has_init: true,
                hang_on_stop: false,
                log,
            }
        }

        fn bare(label: &'static str, log: EventLog) -> Self {
            Self {
                named: false,
                has_init: false,
                ..Self::new(label, log)
            }
        }

        fn hanging(label: &'static str, log: EventLog) -> Self {
            Self {
                hang_on_stop: true,
                ..Self::new(label, log)
            }
        }

        fn record(&self, action: &str) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", action, self.label));
        }
    }

    impl Nameable for MockService {
        fn name(&self) -> String {
            self.label.to_string()
        }
    }

    #[async_trait]
    impl Initializable for MockService {
        async fn init(&self) -> Result<()> {
            self.record("init");
            Ok(())
        }
    }

    #[async_trait]
    impl Runnable for MockService {
        async fn start(&self) -> Result<()> {
            self.record("start");
            std::future::pending::<()>().await;
            Ok(())
        }

        async fn stop(&self) -> Result<()> {
            self.record("stop");
            if self.hang_on_stop {
                std::future::pending::<()>().await;
            }
            Ok(())
        }

        fn as_nameable(&self) -> Option<&dyn Nameable> {
            self.named.then_some(self as &dyn Nameable)
        }

        fn as_initializable(&self) -> Option<&dyn Initializable> {
            self.has_init.then_some(self as &dyn Initializable)
        }
    }

    #[tokio::test]
    async fn test_init_covers_initializable_subset_in_order() {
        let log = EventLog::default();
        let mut runner = Runner::new();
        runner.register(MockService::new("a", log.clone()));
        runner.register(MockService::bare("b", log.clone()));
        runner.register(MockService::new("c", log.clone()));

        runner.init_all().await;

        assert_eq!(events(&log), ["init:a", "init:c"]);
    }

    #[tokio::test]
    async fn test_starts_are_issued_once_and_only_after_init() {
        let log = EventLog::default();
        let mut runner = Runner::new();
        runner.register(MockService::new("a", log.clone()));
        runner.register(MockService::new("b", log.clone()));

        let trigger = {
            let log = log.clone();
            async move {
                wait_for(&log, "start:a").await;
                wait_for(&log, "start:b").await;
            }
        };

        tokio_test::assert_ok!(runner.run_until(trigger).await);

        let recorded = events(&log);
        let last_init = recorded
            .iter()
            .rposition(|e| e.starts_with("init:"))
            .unwrap();
        let first_start = recorded
            .iter()
            .position(|e| e.starts_with("start:"))
            .unwrap();
        assert!(last_init < first_start, "init phase must complete before any start");

        for label in ["a", "b"] {
            let starts = recorded
                .iter()
                .filter(|e| **e == format!("start:{}", label))
                .count();
            assert_eq!(starts, 1, "service {} must be started exactly once", label);
        }
    }

    #[tokio::test]
    async fn test_signal_scenario_stops_both_services_before_return() {
        let log = EventLog::default();
        let mut runner = Runner::new();
        runner.register(MockService::new("a", log.clone()));
        runner.register(MockService::bare("b", log.clone()));

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let started = {
            let log = log.clone();
            async move {
                wait_for(&log, "start:a").await;
                wait_for(&log, "start:b").await;
                let _ = tx.send(());
            }
        };
        tokio::spawn(started);

        tokio_test::assert_ok!(
            runner
                .run_until(async {
                    let _ = rx.await;
                })
                .await
        );

        let recorded = events(&log);
        assert!(recorded.contains(&"stop:a".to_string()));
        assert!(recorded.contains(&"stop:b".to_string()));

        let start_count = recorded.iter().filter(|e| e.starts_with("start:")).count();
        assert_eq!(start_count, 2, "no further starts after the shutdown trigger");
    }

    #[tokio::test]
    async fn test_shutdown_runs_in_registration_order_by_default() {
        let log = EventLog::default();
        let mut runner = Runner::new();
        runner.register(MockService::new("a", log.clone()));
        runner.register(MockService::new("b", log.clone()));

        runner.shutdown().await;

        assert_eq!(events(&log), ["stop:a", "stop:b"]);
    }

    #[tokio::test]
    async fn test_shutdown_reverse_order_from_config() {
        let log = EventLog::default();
        let config = RunnerConfig {
            shutdown_order: ShutdownOrder::Reverse,
            ..Default::default()
        };
        let mut runner = Runner::from_config(&config);
        runner.register(MockService::new("a", log.clone()));
        runner.register(MockService::new("b", log.clone()));

        runner.shutdown().await;

        assert_eq!(events(&log), ["stop:b", "stop:a"]);
    }

    #[tokio::test]
    async fn test_repeated_shutdown_does_not_double_stop() {
        let log = EventLog::default();
        let mut runner = Runner::new();
        runner.register(MockService::new("a", log.clone()));

        runner.shutdown().await;
        runner.shutdown().await;

        assert_eq!(events(&log), ["stop:a"]);
    }

    #[tokio::test]
    async fn test_stop_is_called_even_when_never_launched() {
        let log = EventLog::default();
        let mut runner = Runner::new();
        runner.register(MockService::new("a", log.clone()));

        // No run/launch phase at all
        runner.shutdown().await;

        assert_eq!(events(&log), ["stop:a"]);
    }

    #[tokio::test]
    async fn test_fallback_name_derives_from_type() {
        let log = EventLog::default();
        let mut runner = Runner::new();
        runner.register(MockService::bare("ignored", log));

        assert_eq!(runner.service_names(), ["MockService"]);
        assert!(!runner.service_names()[0].is_empty());
    }

    #[tokio::test]
    async fn test_nameable_name_wins() {
        let log = EventLog::default();
        let mut runner = Runner::new();
        runner.register(MockService::new("database", log));

        assert_eq!(runner.service_names(), ["database"]);
    }

    #[tokio::test]
    async fn test_empty_registry_runs_cleanly() {
        let runner = Runner::new();
        assert!(runner.is_empty());

        tokio_test::assert_ok!(runner.run_until(async {}).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_stop_is_abandoned_after_deadline() {
        let log = EventLog::default();
        let config = RunnerConfig {
            stop_timeout: Some(1),
            ..Default::default()
        };
        let mut runner = Runner::from_config(&config);
        runner.register(MockService::hanging("slow", log.clone()));
        runner.register(MockService::new("fast", log.clone()));

        runner.shutdown().await;

        assert_eq!(events(&log), ["stop:slow", "stop:fast"]);
    }

    #[tokio::test]
    async fn test_lifecycle_scenario_with_mixed_capabilities() {
        // Service A: Nameable + Initializable + Runnable. Service B: Runnable
        // only. Expected order: init A (B skipped), both launched, on trigger
        // stop A then stop B, clean return.
        let log = EventLog::default();
        let mut runner = Runner::new();
        runner.register(MockService::new("a", log.clone()));
        runner.register(MockService::bare("b", log.clone()));

        assert_eq!(runner.service_names(), ["a", "MockService"]);

        let trigger = {
            let log = log.clone();
            async move {
                wait_for(&log, "start:a").await;
                wait_for(&log, "start:b").await;
            }
        };

        tokio_test::assert_ok!(runner.run_until(trigger).await);

        let recorded = events(&log);
        assert_eq!(recorded[0], "init:a");
        assert_eq!(
            recorded[recorded.len() - 2..],
            ["stop:a".to_string(), "stop:b".to_string()]
        );
    }
}
