use std::fmt::Debug;

use error_stack::{Report, ResultExt};
use google_sheets4::api::ValueRange;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::executor::{execute_with_quota_retry, RetryPolicy};
use crate::adapters::sheets::value_range_factory::ValueRangeFactory;
use crate::domain::config_table::{ColumnIndexMap, ConfigTable};
use crate::domain::task::{RangePair, Task};
use crate::ports::routine::{Routine, RoutineError};
use crate::ports::spreadsheet::{SpreadsheetService, ValueRender};

#[derive(Error, Debug)]
pub enum ReplicationError {
    #[error("Failed to fetch configuration data")]
    ConfigFetch,
    #[error("Failed to write the error report")]
    ErrorFlush,
}

#[derive(Clone, Debug)]
pub struct ReplicationSettings {
    /// Document holding the Configuration and Errors sheets.
    pub config_spreadsheet_id: String,
    pub configuration_range: String,
    pub errors_sheet: String,
    pub retry: RetryPolicy,
}

/// Copies cell ranges between spreadsheets as described by the task rows of
/// the configuration table. Task failures are collected, not fatal; the
/// accumulated records are flushed to the Errors sheet once at the end.
pub struct ReplicationRoutine<S> {
    service: S,
    settings: ReplicationSettings,
}

impl<S> Debug for ReplicationRoutine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReplicationRoutine {{ settings: {:?} }}", self.settings)
    }
}

impl<S: SpreadsheetService> ReplicationRoutine<S> {
    pub fn new(service: S, settings: ReplicationSettings) -> Self {
        ReplicationRoutine { service, settings }
    }

    /// Init -> ConfigLoaded -> TasksProcessed -> Done, strictly sequential.
    #[instrument]
    pub async fn execute(&self) -> error_stack::Result<(), ReplicationError> {
        let table = self.fetch_config_table().await?;
        let errors = self.process_tasks(&table).await;
        self.flush_errors(&errors).await
    }

    #[instrument]
    async fn fetch_config_table(&self) -> error_stack::Result<ConfigTable, ReplicationError> {
        let settings = &self.settings;
        let response = execute_with_quota_retry(settings.retry, || {
            self.service.get_values(
                &settings.config_spreadsheet_id,
                &settings.configuration_range,
                ValueRender::Formatted,
            )
        })
        .await
        .change_context(ReplicationError::ConfigFetch)?;

        let table = ConfigTable::from_values(response.values.unwrap_or_default())
            .map_err(|err| Report::new(err).change_context(ReplicationError::ConfigFetch))?;

        debug!(tasks = table.tasks.len(), "Configuration table loaded");
        Ok(table)
    }

    /// Runs every enabled task in row order and returns the error records in
    /// occurrence order. Never fails: each failure skips the smallest unit
    /// of work (one pair, or one malformed task) and processing moves on.
    #[instrument(skip(table))]
    async fn process_tasks(&self, table: &ConfigTable) -> Vec<String> {
        let columns = &table.columns;
        let mut errors = Vec::new();

        for task in &table.tasks {
            if !task.is_enabled(columns) {
                continue;
            }
            if !task.has_paired_ranges() {
                errors.push(format!(
                    "Task {} is not configured properly. Check source and destination pair.",
                    task.id(columns)
                ));
                continue;
            }

            for pair in task.range_pairs() {
                self.copy_pair(task, columns, &pair, &mut errors).await;
            }
        }

        errors
    }

    /// One remote read and one remote write; either failure is recorded and
    /// skips only this pair.
    #[instrument(skip(task, columns, errors), fields(task_id = task.id(columns)))]
    async fn copy_pair(
        &self,
        task: &Task,
        columns: &ColumnIndexMap,
        pair: &RangePair,
        errors: &mut Vec<String>,
    ) {
        let task_id = task.id(columns);

        let response = match execute_with_quota_retry(self.settings.retry, || {
            self.service.get_values(
                task.source_sheet_id(columns),
                &pair.source_range,
                ValueRender::Unformatted,
            )
        })
        .await
        {
            Ok(response) => response,
            Err(report) => {
                errors.push(format!(
                    "Failed to fetch data for task {}: {:?}",
                    task_id, report
                ));
                return;
            }
        };

        // The fetched block is re-targeted at the destination and sent
        // otherwise unchanged.
        let body = ValueRange {
            range: Some(pair.destination_range.clone()),
            ..response
        };

        if let Err(report) = execute_with_quota_retry(self.settings.retry, || {
            self.service.update_values(
                task.destination_sheet_id(columns),
                &pair.destination_range,
                body.clone(),
            )
        })
        .await
        {
            errors.push(format!(
                "Failed to write data for task {}: {:?}",
                task_id, report
            ));
        }
    }

    /// Writes the error records as a single column starting at row 1 of the
    /// Errors sheet. A failure here is fatal to the run.
    #[instrument(skip(errors), fields(count = errors.len()))]
    async fn flush_errors(&self, errors: &[String]) -> error_stack::Result<(), ReplicationError> {
        if errors.is_empty() {
            return Ok(());
        }
        warn!(count = errors.len(), "Run finished with task errors");

        let error_range = format!("{}!A1:A{}", self.settings.errors_sheet, errors.len());
        let body = ValueRange::from_single_column(errors, &error_range);

        execute_with_quota_retry(self.settings.retry, || {
            self.service.update_values(
                &self.settings.config_spreadsheet_id,
                &error_range,
                body.clone(),
            )
        })
        .await
        .change_context(ReplicationError::ErrorFlush)
    }
}

#[async_trait::async_trait]
impl<S: SpreadsheetService> Routine for ReplicationRoutine<S> {
    fn name(&self) -> &'static str {
        "SheetReplication"
    }

    #[instrument]
    async fn run(&self) -> error_stack::Result<(), RoutineError> {
        info!(
            spreadsheet = %self.settings.config_spreadsheet_id,
            "Starting spreadsheet range replication"
        );
        self.execute()
            .await
            .change_context(RoutineError::Failed(self.name()))
    }
}
