use crate::domain::{IterationRecord, TerminationReason, WaveCandidate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// DinkelbachOutcome - 迭代结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DinkelbachOutcome {
    pub run_id: Uuid,
    pub best: Option<WaveCandidate>,
    pub reason: TerminationReason,
    pub optimality_proven: bool, // 仅在以 OPTIMAL 状态收敛时为 true
    pub records: Vec<IterationRecord>,
    pub ratio_history: Vec<f64>, // R0, R1, ... （单调不降）
    pub warm_start_ratio: f64,
    pub elapsed_ms: u64,
}

impl DinkelbachOutcome {
    /// 已派发的迭代轮数
    pub fn iterations(&self) -> usize {
        self.records.len()
    }

    pub fn final_ratio(&self) -> f64 {
        self.ratio_history.last().copied().unwrap_or(0.0)
    }

    /// 已分配给求解器的时间片总和（毫秒）
    pub fn allocated_ms(&self) -> u64 {
        self.records.iter().map(|r| r.time_limit_ms).sum()
    }
}
