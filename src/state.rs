use std::path::{Path, PathBuf};

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::clean::clean;
use crate::data::loader;
use crate::data::model::Dataset;
use crate::data::stats::{self, FrequencyTable, StatisticsRow};
use crate::data::store::SnapshotStore;
use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Session: the one active dataset
// ---------------------------------------------------------------------------

/// The loaded dataset and the file it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub dataset: Dataset,
    /// Path of the most recently loaded file, `None` before the first load.
    pub source: Option<PathBuf>,
}

impl Session {
    fn source_ends_with(&self, file_name: &str) -> bool {
        self.source
            .as_ref()
            .and_then(|p| p.to_str())
            .is_some_and(|p| p.ends_with(file_name))
    }
}

// ---------------------------------------------------------------------------
// View: what the central panel shows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub enum View {
    #[default]
    Empty,
    Violations {
        counts: FrequencyTable,
        colors: ColorMap,
    },
    Inspections {
        grouped: Vec<StatisticsRow>,
        overall: StatisticsRow,
    },
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,
    store: SnapshotStore,
    pub session: Session,
    pub view: View,
    /// Status / error message shown in the UI; `None` means OK.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state, restoring the previous session if one was saved.
    pub fn new(config: AppConfig) -> Self {
        let store = SnapshotStore::new(config.snapshot_dir.clone());
        let (dataset, source) = store.restore();
        Self {
            config,
            store,
            session: Session { dataset, source },
            view: View::Empty,
            status_message: None,
        }
    }

    pub fn status_text(&self) -> &str {
        self.status_message.as_deref().unwrap_or("OK")
    }

    pub fn load_csv(&mut self, path: &Path) {
        self.ingest(path, loader::load_csv(path));
    }

    pub fn load_json(&mut self, path: &Path) {
        self.ingest(path, loader::load_json(path));
    }

    /// Replace the session with a freshly loaded dataset and snapshot it.
    /// On failure the current session is left as it was.
    fn ingest(&mut self, path: &Path, loaded: Result<Dataset>) {
        let dataset = match loaded {
            Ok(ds) => ds,
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
                return;
            }
        };
        log::info!(
            "Loaded {} records with columns {:?} from {}",
            dataset.len(),
            dataset.columns,
            path.display()
        );

        self.session = Session {
            dataset,
            source: Some(path.to_path_buf()),
        };
        self.view = View::Empty;
        self.status_message = None;

        if let Err(e) = self.store.snapshot(&self.session.dataset, path) {
            log::error!("Failed to write session snapshot: {e}");
            self.status_message = Some(format!("Loaded, but snapshot failed: {e}"));
        }
    }

    pub fn save_as_json(&mut self, path: &Path) {
        match loader::save_json(&self.session.dataset, path) {
            Ok(written) => {
                log::info!("Saved dataset to {}", written.display());
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to save: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Clean the session dataset and redraw whatever is shown.
    pub fn clean_data(&mut self) {
        let rules = self.config.cleaning_rules();
        let report = clean(&mut self.session.dataset, &rules);
        self.status_message = Some(format!("Cleaned: {} records remain", report.remaining));
        self.refresh_view();
    }

    pub fn show_violations(&mut self) {
        self.view = View::Empty;
        let prompt = format!("Please load '{}'", self.config.violations_file);

        if !self.session.source_ends_with(&self.config.violations_file) {
            self.status_message = Some(prompt);
            return;
        }
        match stats::frequency_counts(&self.session.dataset, &self.config.violation_column) {
            Ok(counts) => {
                let colors = ColorMap::new(counts.iter().map(|(v, _)| v));
                self.view = View::Violations { counts, colors };
                self.status_message = None;
            }
            Err(e) => self.report_stats_error(e, prompt),
        }
    }

    pub fn show_inspections(&mut self) {
        self.view = View::Empty;
        let prompt = format!("Please load '{}'", self.config.inspections_file);

        let dataset = &self.session.dataset;
        let score = &self.config.score_column;
        let computed = stats::grouped_stats(dataset, score, &self.config.group_column)
            .and_then(|grouped| Ok((grouped, stats::overall_stats(dataset, score)?)));

        match computed {
            Ok((grouped, overall)) => {
                self.view = View::Inspections { grouped, overall };
                self.status_message = None;
            }
            Err(e) => self.report_stats_error(e, prompt),
        }
    }

    fn report_stats_error(&mut self, err: DataError, prompt: String) {
        match err {
            DataError::ColumnNotFound(col) => {
                log::warn!("{prompt} (column '{col}' missing)");
                self.status_message = Some(prompt);
            }
            other => {
                log::error!("Statistics failed: {other}");
                self.status_message = Some(format!("Error: {other}"));
            }
        }
    }

    fn refresh_view(&mut self) {
        let message = self.status_message.take();
        match self.view {
            View::Empty => {}
            View::Violations { .. } => self.show_violations(),
            View::Inspections { .. } => self.show_inspections(),
        }
        if self.status_message.is_none() {
            self.status_message = message;
        }
    }
}
