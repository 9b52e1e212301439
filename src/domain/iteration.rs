// ==========================================
// 仓库波次拣货优化系统 - 迭代记录
// ==========================================
// 职责: Dinkelbach 每轮迭代的诊断日志（只追加）
// ==========================================

use crate::solver::SolverStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    pub iteration: usize,              // 迭代序号（从 0 开始）
    pub ratio: f64,                    // 本轮使用的 R_k
    pub time_limit_ms: u64,            // 分配给本轮的求解时间片
    pub status: SolverStatus,          // 求解器返回状态
    pub objective: Option<f64>,        // F_k
    pub realized_density: Option<f64>, // 本轮候选的实际密度
    pub elapsed_ms: u64,               // 本轮实际耗时
    pub momentum: bool,                // 本轮时间片是否带动量奖励
    pub started_at: DateTime<Utc>,
}
