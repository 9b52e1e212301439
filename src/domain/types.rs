// ==========================================
// 仓库波次拣货优化系统 - 领域类型定义
// ==========================================
// 职责: 标识类型、波次规模口径、终止原因
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 订单标识（实例文件中的行序号，从 0 开始）
pub type OrderId = usize;

/// 巷道标识（实例文件中的行序号，从 0 开始）
pub type AisleId = usize;

/// 物料标识（取值范围 0..num_items）
pub type ItemId = usize;

// ==========================================
// 波次规模口径 (Wave Size Measure)
// ==========================================
// 实例文件格式默认按件数计量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaveSizeMeasure {
    #[default]
    TotalUnits, // 按波次内总件数
    OrderCount, // 按波次内订单数
}

impl fmt::Display for WaveSizeMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveSizeMeasure::TotalUnits => write!(f, "TOTAL_UNITS"),
            WaveSizeMeasure::OrderCount => write!(f, "ORDER_COUNT"),
        }
    }
}

// ==========================================
// 终止原因 (Termination Reason)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与报告文件一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminationReason {
    Converged,      // |F(R)| <= ε
    TimeExhausted,  // 全局时间预算耗尽（含子问题无解超时）
    Infeasible,     // 首轮子问题不可行
    Stalled,        // 密度不再提升
    IterationLimit, // 达到最大迭代次数
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::Converged => "CONVERGED",
            TerminationReason::TimeExhausted => "TIME_EXHAUSTED",
            TerminationReason::Infeasible => "INFEASIBLE",
            TerminationReason::Stalled => "STALLED",
            TerminationReason::IterationLimit => "ITERATION_LIMIT",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
