//! Weather backend: periodic polling on a dedicated task.
//! All network work runs off the UI thread; results are handed back over a
//! single-slot channel that the UI drains with `try_recv`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use skyview_weather::{WeatherClient, WeatherError, WeatherReport};
use tokio::runtime::Handle;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Commands queued by the UI beyond this are dropped
const COMMAND_CAPACITY: usize = 8;

/// Anything that can produce a report for a city
pub trait WeatherSource: Send + Sync + 'static {
    fn fetch(
        &self,
        city: &str,
    ) -> impl Future<Output = Result<WeatherReport, WeatherError>> + Send;
}

impl WeatherSource for WeatherClient {
    fn fetch(
        &self,
        city: &str,
    ) -> impl Future<Output = Result<WeatherReport, WeatherError>> + Send {
        self.fetch_city(city)
    }
}

/// Messages sent from the polling task back to the UI thread
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Outcome of one fetch for `city`
    FetchDone {
        city: String,
        result: Result<WeatherReport, WeatherError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollCommand {
    /// Fetch now for the current city
    Refresh,
    /// Switch city and fetch now
    Search(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Fetching,
    Waiting,
}

/// UI-side handle to a running poller. Dropping it cancels the task.
pub struct PollerHandle {
    commands: mpsc::Sender<PollCommand>,
    results: mpsc::Receiver<WeatherServiceMessage>,
    state: watch::Receiver<PollState>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

/// Start polling `city` every `interval`, fetching once immediately.
pub fn spawn<S: WeatherSource>(
    source: Arc<S>,
    city: impl Into<String>,
    interval: Duration,
    runtime: &Handle,
) -> PollerHandle {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
    let (result_tx, result_rx) = mpsc::channel(1);
    let (state_tx, state_rx) = watch::channel(PollState::Idle);
    let cancel = CancellationToken::new();

    let poller = Poller {
        source,
        city: city.into(),
        interval,
        commands: command_rx,
        results: result_tx,
        state: state_tx,
        cancel: cancel.clone(),
    };
    let task = runtime.spawn(poller.run());

    PollerHandle {
        commands: command_tx,
        results: result_rx,
        state: state_rx,
        cancel,
        task: Some(task),
    }
}

impl PollerHandle {
    /// Ask for an immediate fetch. Returns false if the poller is gone.
    pub fn request_fetch(&self) -> bool {
        match self.commands.try_send(PollCommand::Refresh) {
            Ok(()) => true,
            // A queued command already triggers a fetch
            Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Closed(_)) => false,
        }
    }

    /// Replace the polled city and fetch it immediately.
    pub fn search(&self, city: &str) -> bool {
        let command = PollCommand::Search(city.to_string());
        match self.commands.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Weather command queue full, dropping search for {}", city);
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    /// Non-blocking poll for a finished fetch.
    pub fn try_recv(&mut self) -> Option<WeatherServiceMessage> {
        self.results.try_recv().ok()
    }

    pub async fn recv(&mut self) -> Option<WeatherServiceMessage> {
        self.results.recv().await
    }

    pub fn state(&self) -> PollState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<PollState> {
        self.state.clone()
    }

    /// Cancel the task and wait for it to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Weather poller task ended abnormally: {}", e);
            }
        }
        tracing::info!("Weather poller stopped");
    }

    /// `shutdown` for callers outside the runtime, such as the UI thread.
    pub fn shutdown_blocking(self, runtime: &Handle) {
        runtime.block_on(self.shutdown());
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Poller<S> {
    source: Arc<S>,
    city: String,
    interval: Duration,
    commands: mpsc::Receiver<PollCommand>,
    results: mpsc::Sender<WeatherServiceMessage>,
    state: watch::Sender<PollState>,
    cancel: CancellationToken,
}

impl<S: WeatherSource> Poller<S> {
    async fn run(mut self) {
        tracing::info!(
            "Weather poller started for {} every {:?}",
            self.city,
            self.interval
        );

        loop {
            self.state.send_replace(PollState::Fetching);
            let city = self.city.clone();

            let result = tokio::select! {
                _ = self.cancel.cancelled() => break,
                result = self.source.fetch(&city) => result,
            };
            match &result {
                Ok(report) => tracing::info!(
                    "Fetched weather for {}: {}°C {}",
                    city,
                    report.current.temperature,
                    report.current.description
                ),
                Err(e) => tracing::error!("Failed to fetch weather for {}: {}", city, e),
            }

            let message = WeatherServiceMessage::FetchDone { city, result };
            let sent = tokio::select! {
                _ = self.cancel.cancelled() => break,
                sent = self.results.send(message) => sent,
            };
            if sent.is_err() {
                tracing::debug!("Weather result receiver dropped");
                break;
            }

            self.state.send_replace(PollState::Waiting);

            // Requests made during the fetch collapse into one follow-up
            match self.drain_commands() {
                Some(true) => continue,
                Some(false) => {}
                None => break,
            }

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {
                    tracing::debug!("Refresh interval elapsed");
                }
                command = self.commands.recv() => match command {
                    Some(command) => {
                        self.apply(command);
                        if self.drain_commands().is_none() {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }

        self.state.send_replace(PollState::Idle);
    }

    fn apply(&mut self, command: PollCommand) {
        match command {
            PollCommand::Refresh => tracing::debug!("Refresh requested"),
            PollCommand::Search(city) => {
                tracing::info!("Switching weather city to {}", city);
                self.city = city;
            }
        }
    }

    /// Apply every queued command. `Some(true)` if any were queued, `None`
    /// once the handle is gone.
    fn drain_commands(&mut self) -> Option<bool> {
        let mut any = false;
        loop {
            match self.commands.try_recv() {
                Ok(command) => {
                    self.apply(command);
                    any = true;
                }
                Err(TryRecvError::Empty) => return Some(any),
                Err(TryRecvError::Disconnected) => return None,
            }
        }
    }
}
