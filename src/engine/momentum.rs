// ==========================================
// 仓库波次拣货优化系统 - 动量时间预算策略
// ==========================================
// 职责: 为每轮子问题分配求解时间片
// 规则: 上一轮比值相对提升超过阈值 -> 下一轮时间片乘以奖励系数
// 红线: 已分配时间片之和不超过全局预算；奖励只作用一轮,不累乘
// 说明: 策略无内部可变状态,MomentumState 显式传入传出
// ==========================================

use crate::config::{BaseAllocation, MomentumConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

// ==========================================
// MomentumState - 策略状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MomentumState {
    pub allocated: Duration, // 已分配时间片总和
    pub momentum: bool,      // 下一轮是否享受奖励
    pub dispatched: usize,   // 已分配轮数
}

/// 时间片决策
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetDecision {
    Dispatch { slice: Duration, bonus: bool },
    Exhausted,
}

// ==========================================
// MomentumPolicy - 动量策略
// ==========================================
#[derive(Debug, Clone)]
pub struct MomentumPolicy {
    config: MomentumConfig,
    total_budget: Duration,
}

impl MomentumPolicy {
    pub fn new(config: MomentumConfig, total_budget: Duration) -> Self {
        Self {
            config,
            total_budget,
        }
    }

    pub fn total_budget(&self) -> Duration {
        self.total_budget
    }

    /// 计算下一轮时间片
    ///
    /// # 参数
    /// - remaining_wall: 墙钟意义下的剩余时间
    /// - state: 当前策略状态
    ///
    /// # 返回
    /// - (决策, 新状态)；Exhausted 时状态不变
    pub fn next_budget(
        &self,
        remaining_wall: Duration,
        state: MomentumState,
    ) -> (BudgetDecision, MomentumState) {
        let unallocated = self.total_budget.saturating_sub(state.allocated);
        let remaining = remaining_wall.min(unallocated);
        let min_slice = Duration::from_secs_f64(self.config.min_slice_secs);

        if remaining.is_zero() || remaining < min_slice {
            debug!(
                remaining_ms = remaining.as_millis() as u64,
                "剩余时间不足最小时间片"
            );
            return (BudgetDecision::Exhausted, state);
        }

        let base = match self.config.base_allocation {
            BaseAllocation::Proportional => {
                remaining.div_f64(f64::from(self.config.expected_iterations.max(1)))
            }
            BaseAllocation::Fixed => Duration::from_secs_f64(self.config.fixed_slice_secs),
        }
        .max(min_slice)
        .min(remaining);

        let bonus = state.momentum;
        let slice = if bonus {
            // 乘积超出 Duration 范围时按剩余时间截断
            Duration::try_from_secs_f64(base.as_secs_f64() * self.config.bonus_factor)
                .map_or(remaining, |boosted| boosted.min(remaining))
        } else {
            base
        };

        let next = MomentumState {
            allocated: state.allocated + slice,
            momentum: false,
            dispatched: state.dispatched + 1,
        };

        (BudgetDecision::Dispatch { slice, bonus }, next)
    }

    /// 根据比值提升更新动量标志
    ///
    /// # 说明
    /// - prev_ratio <= 0 时,任何正的新比值都视为显著提升
    pub fn record_improvement(
        &self,
        state: MomentumState,
        prev_ratio: f64,
        new_ratio: f64,
    ) -> MomentumState {
        let momentum = if prev_ratio <= 0.0 {
            new_ratio > 0.0
        } else {
            (new_ratio - prev_ratio) / prev_ratio > self.config.improvement_threshold
        };

        MomentumState { momentum, ..state }
    }
}
