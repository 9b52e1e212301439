// ==========================================
// 仓库波次拣货优化系统 - 运行报告
// ==========================================
// 职责: 单次运行的 JSON 报告 + 批量运行的 CSV 汇总
// ==========================================

use crate::config::SolverConfig;
use crate::domain::{IterationRecord, TerminationReason, WaveSelection};
use crate::engine::DinkelbachOutcome;
use crate::exporter::error::{ExportError, ExportResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

// ==========================================
// RunReport - 单次运行报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub app_version: String,
    pub instance: String,
    pub generated_at: DateTime<Utc>,
    pub solver_backend: String,
    pub config: SolverConfig,

    // ===== 结果 =====
    pub reason: TerminationReason,
    pub optimality_proven: bool,
    pub order_count: usize,
    pub aisle_count: usize,
    pub total_units: u64,
    pub density: f64,

    // ===== 迭代过程 =====
    pub warm_start_ratio: f64,
    pub ratio_history: Vec<f64>,
    pub iterations: Vec<IterationRecord>,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn new(
        instance: impl Into<String>,
        solver_backend: impl Into<String>,
        config: &SolverConfig,
        outcome: &DinkelbachOutcome,
        selection: &WaveSelection,
    ) -> Self {
        Self {
            run_id: outcome.run_id,
            app_version: crate::VERSION.to_string(),
            instance: instance.into(),
            generated_at: Utc::now(),
            solver_backend: solver_backend.into(),
            config: config.clone(),
            reason: selection.reason,
            optimality_proven: selection.optimality_proven,
            order_count: selection.orders.len(),
            aisle_count: selection.aisles.len(),
            total_units: selection.total_units,
            density: selection.density,
            warm_start_ratio: outcome.warm_start_ratio,
            ratio_history: outcome.ratio_history.clone(),
            iterations: outcome.records.clone(),
            elapsed_ms: outcome.elapsed_ms,
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> ExportResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ExportError::FileWriteError {
            path: path.display().to_string(),
            source,
        })
    }
}

// ==========================================
// BatchSummaryRow - 批量运行汇总行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummaryRow {
    pub instance: String,
    pub status: String, // OK | ERROR
    pub reason: Option<TerminationReason>,
    pub orders: usize,
    pub aisles: usize,
    pub total_units: u64,
    pub density: f64,
    pub iterations: usize,
    pub elapsed_ms: u64,
    pub error: Option<String>,
}

impl BatchSummaryRow {
    pub fn success(instance: impl Into<String>, selection: &WaveSelection, elapsed_ms: u64) -> Self {
        Self {
            instance: instance.into(),
            status: "OK".to_string(),
            reason: Some(selection.reason),
            orders: selection.orders.len(),
            aisles: selection.aisles.len(),
            total_units: selection.total_units,
            density: selection.density,
            iterations: selection.iterations,
            elapsed_ms,
            error: None,
        }
    }

    pub fn failure(instance: impl Into<String>, error: impl ToString, elapsed_ms: u64) -> Self {
        Self {
            instance: instance.into(),
            status: "ERROR".to_string(),
            reason: None,
            orders: 0,
            aisles: 0,
            total_units: 0,
            density: 0.0,
            iterations: 0,
            elapsed_ms,
            error: Some(error.to_string()),
        }
    }
}

/// 写出批量汇总 CSV
pub fn write_batch_summary(path: impl AsRef<Path>, rows: &[BatchSummaryRow]) -> ExportResult<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| ExportError::FileWriteError {
        path: path.as_ref().display().to_string(),
        source,
    })?;
    Ok(())
}
