//! Application state managed via Dioxus context.
//!
//! `AppState` bundles all reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with
//! `use_context::<AppState>()`. Mutations that touch more than one signal
//! (creating or deleting a region, refreshing samples) live here so every
//! component applies them the same way.

use crate::js_bridge;
use chrono::Utc;
use dioxus::prelude::*;
use log::{info, warn};
use wxmap_core::cache::SampleCache;
use wxmap_core::classify::DataSeries;
use wxmap_core::config::DashboardConfig;
use wxmap_core::drawing::DrawingTool;
use wxmap_core::geom::CanvasSize;
use wxmap_core::export::{export_file_name, ExportSnapshot};
use wxmap_core::notify::{NotificationCenter, NotificationKind};
use wxmap_core::region::{Region, RegionId, RegionSet};
use wxmap_core::render::Theme;
use wxmap_core::series::TimeRange;
use wxmap_core::timeline::Playback;
use wxmap_core::viewport::Viewport;
use wxmap_core::DashboardError;
use wxmap_weather::{apply_results, fetch_all, fetch_targets, SyntheticWeather};

/// Shared application state for the dashboard.
#[derive(Clone, Copy)]
pub struct AppState {
    pub config: Signal<DashboardConfig>,
    /// Drawn regions in creation order
    pub regions: Signal<RegionSet>,
    /// Data source catalog, rules editable
    pub sources: Signal<Vec<DataSeries>>,
    /// Data source assigned to newly drawn regions
    pub selected_source: Signal<String>,
    /// Cached hourly samples per region
    pub samples: Signal<SampleCache>,
    /// Time range, simulated clock and play state
    pub playback: Signal<Playback>,
    pub viewport: Signal<Viewport>,
    /// Pixel size of the map canvas, updated on resize
    pub canvas_size: Signal<CanvasSize>,
    pub drawing: Signal<DrawingTool>,
    pub hovered: Signal<Option<RegionId>>,
    pub notifications: Signal<NotificationCenter>,
    /// Whether a sample refresh is in flight
    pub loading: Signal<bool>,
    pub theme: Signal<Theme>,
    pub sidebar_collapsed: Signal<bool>,
    pub fullscreen: Signal<bool>,
}

impl AppState {
    /// Create a new AppState from the default configuration.
    pub fn new() -> Self {
        Self::with_config(DashboardConfig::default())
    }

    pub fn with_config(config: DashboardConfig) -> Self {
        let range = config.initial_range(Utc::now());
        Self {
            regions: Signal::new(RegionSet::new()),
            sources: Signal::new(config.data_sources.clone()),
            selected_source: Signal::new(config.default_data_source.clone()),
            samples: Signal::new(SampleCache::new()),
            playback: Signal::new(config.playback(range)),
            viewport: Signal::new(Viewport::default()),
            canvas_size: Signal::new(CanvasSize::default()),
            drawing: Signal::new(DrawingTool::new()),
            hovered: Signal::new(None),
            notifications: Signal::new(config.notification_center()),
            loading: Signal::new(false),
            theme: Signal::new(Theme::Light),
            sidebar_collapsed: Signal::new(false),
            fullscreen: Signal::new(false),
            config: Signal::new(config),
        }
    }

    /// Show a notification and schedule its removal.
    pub fn notify(mut self, kind: NotificationKind, title: &str, message: &str) {
        self.notifications
            .write()
            .push(kind, title, message, Utc::now());
        self.schedule_expiry();
    }

    fn schedule_expiry(self) {
        let mut notifications = self.notifications;
        let ttl_ms = notifications.read().ttl().num_milliseconds().max(0) as u64;
        spawn(async move {
            js_bridge::sleep_ms(ttl_ms).await;
            notifications.write().expire(Utc::now());
        });
    }

    /// Report a refused drawing action.
    pub fn drawing_refused(mut self, err: &DashboardError) {
        warn!("drawing action refused: {}", err);
        self.notifications.write().drawing_refused(err, Utc::now());
        self.schedule_expiry();
    }

    /// Add a region produced by a finished drawing session.
    pub fn add_region(mut self, region: Region) {
        let count = region.vertices().len();
        info!("adding {}", region.id());
        self.regions.write().insert(region);
        self.notifications.write().region_created(count, Utc::now());
        self.schedule_expiry();
    }

    /// Close the polygon being drawn, if it has enough points.
    pub fn complete_drawing(mut self) {
        if !self.drawing.read().is_drawing() {
            return;
        }
        let viewport = *self.viewport.read();
        let size = *self.canvas_size.read();
        let source = self.selected_source.read().clone();
        let result = self.drawing.write().complete(&viewport, size, &source);
        match result {
            Ok(region) => self.add_region(region),
            Err(e) => self.drawing_refused(&e),
        }
    }

    /// Remove a region and its cached samples.
    pub fn delete_region(mut self, id: &RegionId) {
        if self.regions.write().remove(id).is_none() {
            return;
        }
        self.samples.write().evict(id);
        if self.hovered.read().as_ref() == Some(id) {
            self.hovered.set(None);
        }
        self.notifications.write().region_deleted(Utc::now());
        self.schedule_expiry();
    }

    /// Ask before deleting a region.
    pub fn confirm_delete(self, id: &RegionId) {
        let label = match self.regions.read().get(id) {
            Some(region) => region.label(),
            None => return,
        };
        if js_bridge::confirm(&format!("Delete {}?", label)) {
            self.delete_region(id);
        }
    }

    pub fn reassign_region(mut self, id: &RegionId, source_id: &str) {
        if let Err(e) = self.regions.write().reassign(id, source_id) {
            warn!("{}", e);
        }
    }

    pub fn set_time_range(mut self, range: TimeRange) {
        self.playback.write().set_range(range);
    }

    /// Fetch samples for every region under a new refresh generation.
    ///
    /// Results from a refresh that was superseded while in flight are
    /// dropped; failures keep whatever was cached before. Reads are
    /// untracked so calling this from an effect does not subscribe to the
    /// playback clock.
    pub fn refresh_samples(mut self) {
        let targets = fetch_targets(&self.regions.peek());
        if targets.is_empty() {
            return;
        }
        let range = self.playback.peek().range();
        let (seed, latency) = {
            let config = self.config.peek();
            (config.weather_seed, config.weather_latency_ms)
        };
        let generation = self.samples.write().begin_refresh();
        self.loading.set(true);

        spawn(async move {
            js_bridge::sleep_ms(latency).await;
            let source = SyntheticWeather::new(seed);
            let results = fetch_all(&source, targets, range).await;
            let report = apply_results(&mut self.samples.write(), generation, results);
            if generation != self.samples.read().generation() {
                return;
            }
            let ids = self.regions.read().ids();
            self.samples.write().retain_regions(&ids);
            self.loading.set(false);

            if report.ok() {
                self.notifications
                    .write()
                    .data_refreshed(report.stored, Utc::now());
            } else {
                self.notifications.write().data_error(Utc::now());
            }
            self.schedule_expiry();
        });
    }

    /// Download the current dashboard as JSON.
    pub fn export(mut self) {
        let json = {
            let regions = self.regions.read();
            let sources = self.sources.read();
            let samples = self.samples.read();
            let playback = self.playback.read();
            let snapshot = ExportSnapshot::new(
                regions.as_slice(),
                &sources,
                playback.range(),
                playback.current(),
                &samples,
            );
            let json = snapshot.to_json_pretty();
            json
        };
        match json {
            Ok(json) => {
                js_bridge::download_json(&export_file_name(Utc::now()), &json);
                self.notifications.write().exported(Utc::now());
                self.schedule_expiry();
            }
            Err(e) => self.notify(NotificationKind::Error, "Export Failed", &e.to_string()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
