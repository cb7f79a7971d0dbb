use std::sync::Arc;

use bizbalance_core::{
    storage::{load_or_default, StateBackupInfo, StateStorage, STATE_KEY},
    AggregationEngine, CalculationResult, CoreError, InsightError, InsightProvider,
    InsightRequest, InsightSession, InsightWorker,
};
use bizbalance_domain::{BusinessData, FormulaMode};
use chrono::{DateTime, Local};
use tracing::info;

use crate::errors::AppError;

/// Facade that owns the dashboard state, its persistence, and the insight session.
///
/// State is replaced wholesale on every edit and saved immediately afterwards.
pub struct DashboardManager {
    data: BusinessData,
    mode: FormulaMode,
    storage: Box<dyn StateStorage>,
    session: InsightSession,
    worker: InsightWorker,
    insight_updated: Option<DateTime<Local>>,
}

impl DashboardManager {
    /// Loads the stored state (or defaults) and prepares the insight worker.
    pub fn open(
        storage: Box<dyn StateStorage>,
        mode: FormulaMode,
        provider: Arc<dyn InsightProvider>,
    ) -> Self {
        let data = load_or_default(storage.as_ref(), STATE_KEY);
        Self {
            data,
            mode,
            storage,
            session: InsightSession::new(),
            worker: InsightWorker::new(provider),
            insight_updated: None,
        }
    }

    pub fn data(&self) -> &BusinessData {
        &self.data
    }

    pub fn mode(&self) -> FormulaMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: FormulaMode) {
        if self.mode != mode {
            info!(from = %self.mode, to = %mode, "formula mode changed");
        }
        self.mode = mode;
    }

    pub fn summary(&self) -> CalculationResult {
        AggregationEngine::calculate(&self.data, self.mode)
    }

    /// Replaces the state with `next` and persists it.
    pub fn commit(&mut self, next: BusinessData) -> Result<(), CoreError> {
        self.storage.save_state(STATE_KEY, &next)?;
        self.data = next;
        Ok(())
    }

    /// Writes the default state over whatever is stored.
    pub fn reset(&mut self) -> Result<(), CoreError> {
        info!("resetting dashboard to default state");
        self.commit(BusinessData::default_state())
    }

    pub fn backups(&self) -> Result<Vec<StateBackupInfo>, CoreError> {
        self.storage.list_backups(STATE_KEY)
    }

    /// Restores the backup at 1-based `position` in [`Self::backups`] order.
    pub fn restore_backup(&mut self, position: usize) -> Result<StateBackupInfo, AppError> {
        let backups = self.backups()?;
        let backup = position
            .checked_sub(1)
            .and_then(|index| backups.get(index))
            .cloned()
            .ok_or(AppError::BackupNotFound(position))?;
        self.data = self.storage.restore_backup(STATE_KEY, &backup)?;
        Ok(backup)
    }

    pub fn insight(&self) -> &InsightSession {
        &self.session
    }

    pub fn insight_updated(&self) -> Option<DateTime<Local>> {
        self.insight_updated
    }

    /// Sends the current figures to the insight provider in the background.
    pub fn request_insight(&mut self) -> Result<(), InsightError> {
        let request = InsightRequest::from_result(&self.summary());
        self.worker.request(&mut self.session, request)
    }

    /// Collects a finished insight without blocking. True when one arrived.
    pub fn poll_insight(&mut self) -> bool {
        let landed = self.worker.poll(&mut self.session);
        if landed {
            self.insight_updated = Some(Local::now());
        }
        landed
    }

    /// Blocks until the outstanding insight request completes.
    pub fn wait_insight(&mut self) -> bool {
        let landed = self.worker.wait(&mut self.session);
        if landed {
            self.insight_updated = Some(Local::now());
        }
        landed
    }
}
