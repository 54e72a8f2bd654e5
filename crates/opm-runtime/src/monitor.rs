//! ---
//! opm_section: "01-core-functionality"
//! opm_subsection: "module"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Monitor lifecycle and tick loop."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use opm_common::config::AppConfig;
use opm_common::metrics::TickTimingReporter;
use opm_common::time::jitter_us;
use opm_telemetry::{seed_alerts, Alert, CurrentReadings, Field, FieldTable, HistorySample, TelemetrySimulator};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::rate::RateLimiter;
use crate::snapshot::{DashboardSnapshot, SnapshotStore};
use crate::subscribers::{SubscriberRegistry, SubscriptionId, TickCallback};

/// Everything needed to start a monitor: walk parameters, window size, tick
/// period, seed, and optional run limits.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub table: FieldTable,
    pub history_capacity: usize,
    pub tick_interval: Duration,
    pub random_seed: u64,
    pub max_ticks: Option<u64>,
    pub jitter_report: Option<PathBuf>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            table: FieldTable::default(),
            history_capacity: 21,
            tick_interval: Duration::from_millis(3000),
            random_seed: 0x0113_F1E1D,
            max_ticks: None,
            jitter_report: None,
        }
    }
}

impl MonitorSettings {
    /// Derive settings from loaded configuration, overlaying any per-field
    /// tuning onto the built-in table.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut table = FieldTable::default();
        for (name, tuning) in &config.simulation.fields {
            let field = Field::from_name(name)
                .ok_or_else(|| anyhow!("unknown telemetry field {} in configuration", name))?;
            table.apply_tuning(field, tuning);
        }
        table
            .validate()
            .context("field tuning produced an invalid walk table")?;
        Ok(Self {
            table,
            history_capacity: config.simulation.history_capacity,
            tick_interval: config.simulation.tick_interval,
            random_seed: config.simulation.random_seed,
            max_ticks: None,
            jitter_report: None,
        })
    }

    pub fn with_max_ticks(mut self, limit: u64) -> Self {
        self.max_ticks = Some(limit);
        self
    }

    pub fn with_jitter_report(mut self, path: PathBuf) -> Self {
        self.jitter_report = Some(path);
        self
    }
}

/// Monitor entrypoint. `spawn` starts the tick task and hands back the
/// lifecycle handle.
#[derive(Debug)]
pub struct Monitor;

impl Monitor {
    pub fn spawn(settings: MonitorSettings) -> Result<MonitorHandle> {
        settings
            .table
            .validate()
            .context("refusing to start monitor with invalid field table")?;

        let now = Local::now();
        let simulator = TelemetrySimulator::new(
            settings.table.clone(),
            settings.history_capacity,
            settings.random_seed,
            now,
        );
        let alerts = seed_alerts();
        let store = Arc::new(SnapshotStore::new(DashboardSnapshot {
            tick: 0,
            committed_at: now,
            readings: simulator.current_readings().clone(),
            history: simulator.history().to_vec(),
            alerts: alerts.clone(),
        }));
        let subscribers = Arc::new(SubscriberRegistry::new());

        let (shutdown_tx, shutdown_rx) = broadcast::channel(4);
        let task = tokio::spawn(run_monitor(
            simulator,
            alerts,
            store.clone(),
            subscribers.clone(),
            settings.clone(),
            shutdown_rx,
        ));

        info!(
            period_ms = settings.tick_interval.as_millis() as u64,
            history_capacity = settings.history_capacity,
            seed = settings.random_seed,
            "monitor started"
        );

        Ok(MonitorHandle {
            shutdown: shutdown_tx,
            task,
            store,
            subscribers,
        })
    }
}

/// Lifecycle handle for a running monitor.
///
/// Dropping the handle closes the shutdown channel and the tick task winds
/// down on its own, but only [`MonitorHandle::shutdown`] joins the task and
/// therefore guarantees that no callback fires after it returns.
#[derive(Debug)]
pub struct MonitorHandle {
    shutdown: broadcast::Sender<()>,
    task: JoinHandle<Result<()>>,
    store: Arc<SnapshotStore>,
    subscribers: Arc<SubscriberRegistry>,
}

impl MonitorHandle {
    pub fn current_readings(&self) -> CurrentReadings {
        self.store.current_readings()
    }

    pub fn history(&self) -> Vec<HistorySample> {
        self.store.history()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.store.alerts()
    }

    pub fn latest(&self) -> DashboardSnapshot {
        self.store.latest()
    }

    pub fn ticks(&self) -> u64 {
        self.store.tick()
    }

    pub fn subscribe(&self, callback: TickCallback) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Stop the tick task and wait for it to finish. No subscriber callback
    /// runs after this returns.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown.send(());
        self.task
            .await
            .map_err(|err| anyhow!("monitor task join failure: {}", err))??;
        info!("monitor shutdown complete");
        Ok(())
    }

    /// Wait for the tick task to finish on its own. Only meaningful when the
    /// monitor was started with a tick limit.
    pub async fn join(self) -> Result<()> {
        self.task
            .await
            .map_err(|err| anyhow!("monitor task join failure: {}", err))??;
        Ok(())
    }
}

async fn run_monitor(
    mut simulator: TelemetrySimulator,
    alerts: Vec<Alert>,
    store: Arc<SnapshotStore>,
    subscribers: Arc<SubscriberRegistry>,
    settings: MonitorSettings,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let mut limiter = RateLimiter::new(settings.tick_interval);
    let reporter = TickTimingReporter::new(settings.tick_interval);
    let mut previous_instant: Option<Instant> = None;
    let mut tick: u64 = 0;

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                debug!(tick, "monitor shutdown signal received");
                break;
            }
            instant = limiter.tick() => {
                tick += 1;
                reporter.record_tick();

                let scheduled = instant.into_std();
                let tick_jitter = previous_instant
                    .map(|previous| jitter_us(scheduled.duration_since(previous), settings.tick_interval))
                    .unwrap_or(0);
                previous_instant = Some(scheduled);

                let now = Local::now();
                let readings = simulator.tick(now);
                let snapshot = DashboardSnapshot {
                    tick,
                    committed_at: now,
                    readings,
                    history: simulator.history().to_vec(),
                    alerts: alerts.clone(),
                };
                store.commit(snapshot.clone());
                subscribers.notify(&snapshot);

                info!(
                    tick,
                    jitter_us = tick_jitter,
                    agzu_pressure = snapshot.readings.agzu_pressure,
                    agzu_temperature = snapshot.readings.agzu_temperature,
                    separator_pressure = snapshot.readings.separator_pressure,
                    separator_temperature = snapshot.readings.separator_temperature,
                    flow_rate = snapshot.readings.flow_rate,
                    oil_level = snapshot.readings.oil_level,
                    "monitor tick committed"
                );

                if let Some(limit) = settings.max_ticks {
                    if tick >= limit {
                        info!(tick, limit, "monitor reached tick limit");
                        break;
                    }
                }
            }
        }
    }

    if let Some(path) = &settings.jitter_report {
        if let Err(err) = reporter.histogram().write_json(path) {
            warn!(path = %path.display(), error = %err, "failed to write jitter report");
        }
    }
    if let Some(summary) = reporter.histogram().summary() {
        debug!(
            samples = summary.samples,
            mean_ns = summary.mean_ns,
            std_dev_ns = summary.std_dev_ns,
            "monitor tick jitter summary"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opm_common::config::FieldTuning;

    fn fast_settings() -> MonitorSettings {
        MonitorSettings {
            tick_interval: Duration::from_millis(10),
            random_seed: 9,
            ..MonitorSettings::default()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn monitor_ticks_and_shuts_down() {
        let handle = Monitor::spawn(fast_settings()).unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(handle.ticks() >= 1);
        assert_eq!(handle.history().len(), 21);
        assert_eq!(handle.alerts().len(), 2);
        handle.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn tick_limit_ends_the_run() {
        let handle = Monitor::spawn(fast_settings().with_max_ticks(5)).unwrap();
        handle.join().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn jitter_report_is_written_at_teardown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jitter.json");
        let handle =
            Monitor::spawn(fast_settings().with_max_ticks(10).with_jitter_report(path.clone()))
                .unwrap();
        handle.join().await.unwrap();
        assert!(path.exists());
    }

    #[test]
    fn from_config_rejects_unknown_fields() {
        let mut config = AppConfig::default();
        config
            .simulation
            .fields
            .insert("casing_pressure".into(), FieldTuning::default());
        assert!(MonitorSettings::from_config(&config).is_err());
    }

    #[test]
    fn from_config_applies_tuning() {
        let mut config = AppConfig::default();
        config.simulation.fields.insert(
            "flow_rate".into(),
            FieldTuning {
                max: Some(180.0),
                ..FieldTuning::default()
            },
        );
        let settings = MonitorSettings::from_config(&config).unwrap();
        assert_eq!(settings.table.spec(Field::FlowRate).max, 180.0);
        assert_eq!(settings.history_capacity, 21);
    }
}
