//! Window controller. Lives on the UI thread and owns the panel, the scene
//! and the poller handle.

use skyview_scene::{Frame, SceneAnimator};
use tokio::runtime::Handle;

use crate::models::weather_model::WeatherPanel;
use crate::services::PollerHandle;

/// Receives one frame per animation tick
pub trait FrameSink {
    fn present(&mut self, frame: &Frame);
}

/// Traces a one-line frame summary at `trace` level
#[derive(Debug, Default)]
pub struct LogFrameSink {
    frames: u64,
}

impl LogFrameSink {
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl FrameSink for LogFrameSink {
    fn present(&mut self, frame: &Frame) {
        self.frames += 1;
        tracing::trace!(
            frame = self.frames,
            commands = frame.commands.len(),
            spheres = frame.count_spheres(),
            lines = frame.count_lines(),
            hexagons = frame.count_hexagons(),
            "frame"
        );
    }
}

pub struct WeatherWindow {
    panel: WeatherPanel,
    scene: SceneAnimator,
    poller: PollerHandle,
}

impl WeatherWindow {
    pub fn new(panel: WeatherPanel, scene: SceneAnimator, poller: PollerHandle) -> Self {
        Self {
            panel,
            scene,
            poller,
        }
    }

    pub fn panel(&self) -> &WeatherPanel {
        &self.panel
    }

    pub fn scene(&self) -> &SceneAnimator {
        &self.scene
    }

    /// Drain finished fetches into the panel and scene. Returns true if
    /// anything changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Some(message) = self.poller.try_recv() {
            if let Some(category) = self.panel.apply(message) {
                self.scene.set_condition(category);
            }
            changed = true;
        }
        changed
    }

    /// One animation tick at `hour` (fractional, local time).
    pub fn animate(&mut self, hour: f32, sink: &mut dyn FrameSink) {
        self.scene.tick(hour);
        sink.present(&self.scene.frame());
    }

    /// Search box submitted. Blank input is ignored.
    pub fn search(&mut self, input: &str) -> bool {
        match self.panel.submit_search(input) {
            Some(city) => self.poller.search(&city),
            None => false,
        }
    }

    pub fn refresh(&self) -> bool {
        self.poller.request_fetch()
    }

    /// Stop the poller and wait for it. Call from outside the runtime.
    pub fn close(self, runtime: &Handle) {
        self.poller.shutdown_blocking(runtime);
    }

    /// Stop the poller from async context.
    pub async fn close_async(self) {
        self.poller.shutdown().await;
    }
}
