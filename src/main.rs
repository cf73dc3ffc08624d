use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, Timelike};
use skyview_scene::SceneAnimator;
use skyview_ui::{bridge, error_mapping, services, LogFrameSink, WeatherPanel, WeatherWindow};
use skyview_weather::{IpLocator, WeatherClient};
use tokio_util::sync::CancellationToken;

fn main() -> Result<()> {
    // Initialize core
    skyview_core::init()?;

    let (config, _validation) = skyview_core::Config::load_validated()?;
    tracing::info!("Config directory: {}", config.config_dir.display());

    let runtime = bridge::build_runtime()
        .context("Failed to create tokio runtime")?;
    let handle = runtime.handle().clone();

    let mut panel = WeatherPanel::new();
    panel.locating();

    let locator = IpLocator::new(bridge::locator_config(&config))
        .map_err(error_mapping::location_error)
        .context("Failed to build IP locator")?;
    let located = handle.block_on(locator.resolve());
    panel.located(&located.name, located.detected);
    let city = located.name;

    let client = WeatherClient::new(bridge::client_config(&config.weather))
        .map_err(error_mapping::weather_error)
        .context("Failed to build weather client")?;
    let poller = services::spawn_weather_poller(
        Arc::new(client),
        city.as_str(),
        bridge::refresh_interval(&config.weather),
        &handle,
    );

    // Ctrl-C ends the UI loop
    let stop = CancellationToken::new();
    let signal_stop = stop.clone();
    handle.spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
        signal_stop.cancel();
    });

    println!("SkyView - {}", city);
    println!("{}", panel.render());

    let mut window = WeatherWindow::new(panel, SceneAnimator::new(), poller);
    let mut sink = LogFrameSink::default();
    let tick = bridge::tick_interval(&config.scene);

    tracing::info!("SkyView started");
    while !stop.is_cancelled() {
        if window.pump() {
            println!("{}", window.panel().render());
        }

        let now = Local::now();
        let hour = now.hour() as f32 + now.minute() as f32 / 60.0;
        window.animate(hour, &mut sink);

        std::thread::sleep(tick);
    }

    tracing::info!("Shutting down after {} frames", sink.frames());
    window.close(&handle);
    runtime.shutdown_timeout(std::time::Duration::from_secs(1));

    Ok(())
}
