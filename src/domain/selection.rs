// ==========================================
// 仓库波次拣货优化系统 - 波次结果（对外）
// ==========================================
// 职责: 提取器输出,供文件写出器/报告消费
// ==========================================

use crate::domain::types::{AisleId, OrderId, TerminationReason};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSelection {
    pub run_id: Uuid,
    pub orders: Vec<OrderId>, // 升序
    pub aisles: Vec<AisleId>, // 升序
    pub total_units: u64,
    pub density: f64,
    pub reason: TerminationReason,
    pub optimality_proven: bool,
    pub iterations: usize,
}
