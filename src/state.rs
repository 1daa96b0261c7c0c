use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::data::cache::DatasetCache;
use crate::data::model::DatasetBundle;
use crate::pages::{plan_charts, Chart, Page};

/// How often the source files are checked for changes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub cache: DatasetCache,

    /// The bundle currently on screen. Kept when a later reload fails.
    pub bundle: Arc<DatasetBundle>,

    /// Page selected in the sidebar.
    pub page: Page,

    /// Charts planned for `page` from `bundle`.
    pub charts: Vec<Chart>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    last_check: Instant,
}

impl AppState {
    /// Start from a cache whose initial load already succeeded.
    pub fn new(cache: DatasetCache, bundle: Arc<DatasetBundle>) -> Self {
        let page = Page::default();
        Self {
            cache,
            charts: plan_charts(page, &bundle),
            bundle,
            page,
            status_message: None,
            last_check: Instant::now(),
        }
    }

    pub fn set_page(&mut self, page: Page) {
        if self.page != page {
            self.page = page;
            self.charts = plan_charts(page, &self.bundle);
        }
    }

    fn set_bundle(&mut self, bundle: Arc<DatasetBundle>) {
        if !Arc::ptr_eq(&self.bundle, &bundle) {
            self.charts = plan_charts(self.page, &bundle);
            self.bundle = bundle;
        }
    }

    /// Pick up changed source files, at most once per [`REFRESH_INTERVAL`].
    pub fn refresh(&mut self) {
        if self.last_check.elapsed() < REFRESH_INTERVAL {
            return;
        }
        self.last_check = Instant::now();
        if self.cache.needs_refresh() {
            self.load();
        }
    }

    /// Drop the cache and load again.
    pub fn reload(&mut self) {
        self.cache.invalidate();
        self.load();
    }

    /// Switch to another data directory, keeping the configured file names.
    ///
    /// The current cache and bundle stay in place if the new directory
    /// cannot be loaded.
    pub fn set_data_dir(&mut self, dir: PathBuf) {
        let mut config = self.cache.config().clone();
        config.data_dir = dir;
        let mut cache = DatasetCache::new(config);

        match cache.get_or_load() {
            Ok(bundle) => {
                log::info!("switched data directory to {}", cache.config().data_dir.display());
                self.cache = cache;
                self.set_bundle(bundle);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load data directory: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn load(&mut self) {
        match self.cache.get_or_load() {
            Ok(bundle) => {
                self.set_bundle(bundle);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to reload datasets: {e}");
                self.status_message = Some(format!("Error: {e} (showing previous data)"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_sources(dir: &Path) {
        fs::write(dir.join("ad.csv"), "Category,Revenue,City\nRetail,10,Pune\n").unwrap();
        fs::write(dir.join("city.csv"), "City,ReadinessScore\nPune,7\n").unwrap();
        fs::write(dir.join("pilot.csv"), "City,Engagement,Users\nPune,0.5,10\n").unwrap();
        fs::write(dir.join("print.csv"), "Sales\n1\n").unwrap();
    }

    fn config(dir: &Path) -> DashboardConfig {
        DashboardConfig {
            data_dir: dir.to_path_buf(),
            ad_revenue: "ad.csv".into(),
            city_readiness: "city.csv".into(),
            digital_pilot: "pilot.csv".into(),
            print_sales: "print.csv".into(),
            ..DashboardConfig::default()
        }
    }

    fn state(dir: &Path) -> AppState {
        let mut cache = DatasetCache::new(config(dir));
        let bundle = cache.get_or_load().unwrap();
        AppState::new(cache, bundle)
    }

    #[test]
    fn page_switch_replans_charts() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        let mut state = state(dir.path());

        assert!(state.charts.is_empty());
        state.set_page(Page::AdRevenue);
        assert_eq!(state.charts.len(), 2);
        // print table has no month column
        state.set_page(Page::PrintSales);
        assert!(state.charts.is_empty());
    }

    #[test]
    fn failed_reload_keeps_previous_bundle() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        let mut state = state(dir.path());
        let before = Arc::clone(&state.bundle);

        fs::remove_file(dir.path().join("ad.csv")).unwrap();
        state.reload();

        assert!(Arc::ptr_eq(&before, &state.bundle));
        assert!(state.status_message.is_some());
    }

    #[test]
    fn failed_reload_is_not_polled_again() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        let mut state = state(dir.path());

        fs::remove_file(dir.path().join("ad.csv")).unwrap();
        state.reload();
        assert!(state.status_message.is_some());
        assert!(!state.cache.needs_refresh());

        write_sources(dir.path());
        assert!(state.cache.needs_refresh());
        state.reload();
        assert!(state.status_message.is_none());
    }

    #[test]
    fn bad_data_dir_is_rejected() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        let mut state = state(dir.path());

        state.set_data_dir(dir.path().join("missing"));
        assert_eq!(state.cache.config().data_dir, dir.path());
        assert!(state.status_message.is_some());

        let other = tempdir().unwrap();
        write_sources(other.path());
        state.set_data_dir(other.path().to_path_buf());
        assert_eq!(state.cache.config().data_dir, other.path());
        assert!(state.status_message.is_none());
    }
}
