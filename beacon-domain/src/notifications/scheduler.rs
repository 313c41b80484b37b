//! Drives [`Reconciler::run_cycle`] from a timer or from host lifecycle events.
//!
//! The scheduler owns one background task. Triggers reach it over an unbounded
//! channel; after every cycle the task drains whatever arrived meanwhile, so a
//! burst of triggers during a cycle never produces more than that one cycle.

use beacon_core::{NotificationSyncConfig, SyncMode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info};

use super::errors::NotificationError;
use super::reconciler::{CycleOutcome, Reconciler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerMode {
    /// Long-lived context: cycle every `Duration`.
    Interval(Duration),
    /// No long-lived context: cycle on [`HostEvent`]s.
    OnDemand,
}

impl SchedulerMode {
    pub fn from_config(config: &NotificationSyncConfig) -> Self {
        match config.mode {
            SyncMode::Interval => SchedulerMode::Interval(config.poll_interval()),
            SyncMode::OnDemand => SchedulerMode::OnDemand,
        }
    }
}

/// Host lifecycle moments after which the notification list may be stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    ViewActivated,
    ListingRefreshed,
}

#[derive(Debug)]
enum SchedulerCommand {
    Host(HostEvent),
    TriggerNow,
    Shutdown,
}

pub struct Scheduler;

impl Scheduler {
    /// Starts the scheduling task. One cycle runs immediately in either mode.
    pub fn spawn(reconciler: Arc<Reconciler>, mode: SchedulerMode) -> SchedulerHandle {
        let (commands, receiver) = mpsc::unbounded_channel();
        info!("Starting notification scheduler in {:?} mode", mode);
        let task = tokio::spawn(run_scheduler(reconciler, mode, receiver));
        SchedulerHandle { commands, task }
    }
}

pub struct SchedulerHandle {
    commands: mpsc::UnboundedSender<SchedulerCommand>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Reports a host lifecycle event. Ignored in interval mode.
    pub fn notify(&self, event: HostEvent) -> Result<(), NotificationError> {
        self.send(SchedulerCommand::Host(event))
    }

    /// Requests a cycle regardless of mode.
    pub fn trigger_now(&self) -> Result<(), NotificationError> {
        self.send(SchedulerCommand::TriggerNow)
    }

    /// Stops the task once any in-flight cycle has finished.
    pub async fn shutdown(self) {
        // A send error means the task already ended.
        let _ = self.commands.send(SchedulerCommand::Shutdown);
        if let Err(e) = self.task.await {
            error!("Notification scheduler task ended abnormally: {}", e);
        }
    }

    fn send(&self, command: SchedulerCommand) -> Result<(), NotificationError> {
        self.commands
            .send(command)
            .map_err(|_| NotificationError::SchedulerStopped)
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn run_once(reconciler: &Reconciler, reason: &str) {
    debug!("Running reconciliation cycle ({})", reason);
    match reconciler.run_cycle().await {
        Ok(CycleOutcome::Completed(_)) => {}
        Ok(CycleOutcome::Coalesced) => {
            debug!("Cycle ({}) coalesced with one already running", reason)
        }
        // Already logged by the reconciler; the next trigger retries.
        Err(_) => {}
    }
}

/// Drops every trigger queued while a cycle was running.
///
/// Returns `false` when the scheduler should stop.
fn discard_pending_triggers(commands: &mut mpsc::UnboundedReceiver<SchedulerCommand>) -> bool {
    loop {
        match commands.try_recv() {
            Ok(SchedulerCommand::Shutdown) => return false,
            Ok(command) => debug!("Coalesced {:?} that arrived during a cycle", command),
            Err(mpsc::error::TryRecvError::Empty) => return true,
            Err(mpsc::error::TryRecvError::Disconnected) => return false,
        }
    }
}

async fn run_scheduler(
    reconciler: Arc<Reconciler>,
    mode: SchedulerMode,
    mut commands: mpsc::UnboundedReceiver<SchedulerCommand>,
) {
    run_once(&reconciler, "startup").await;

    let mut ticker = match mode {
        SchedulerMode::Interval(period) => {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            Some(interval)
        }
        SchedulerMode::OnDemand => None,
    };

    if !discard_pending_triggers(&mut commands) {
        info!("Notification scheduler stopped");
        return;
    }

    loop {
        tokio::select! {
            _ = next_tick(&mut ticker) => run_once(&reconciler, "interval").await,
            command = commands.recv() => match command {
                Some(SchedulerCommand::Host(event)) if ticker.is_some() => {
                    debug!("Ignoring {:?} in interval mode", event);
                    continue;
                }
                Some(SchedulerCommand::Host(event)) => {
                    run_once(&reconciler, host_event_reason(event)).await
                }
                Some(SchedulerCommand::TriggerNow) => run_once(&reconciler, "manual trigger").await,
                Some(SchedulerCommand::Shutdown) | None => break,
            },
        }

        // A tick that fell due during the cycle is coalesced too; the next one
        // is a full period after this cycle ended.
        if let Some(interval) = ticker.as_mut() {
            interval.reset();
        }
        if !discard_pending_triggers(&mut commands) {
            break;
        }
    }
    info!("Notification scheduler stopped");
}

fn host_event_reason(event: HostEvent) -> &'static str {
    match event {
        HostEvent::ViewActivated => "view activated",
        HostEvent::ListingRefreshed => "listing refreshed",
    }
}
