// ==========================================
// 仓库波次拣货优化系统 - 求解配置
// ==========================================
// 职责: Dinkelbach 控制器与动量策略的全部阈值
// 说明: 由 ConfigManager 从 key-value 配置解析得到,也可直接构造
// ==========================================

use crate::config::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// 基础时间片分配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseAllocation {
    /// 剩余时间 / 预期迭代轮数（每轮重新计算）
    #[default]
    Proportional,
    /// 固定时间片
    Fixed,
}

impl fmt::Display for BaseAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseAllocation::Proportional => write!(f, "proportional"),
            BaseAllocation::Fixed => write!(f, "fixed"),
        }
    }
}

impl FromStr for BaseAllocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proportional" => Ok(BaseAllocation::Proportional),
            "fixed" => Ok(BaseAllocation::Fixed),
            other => Err(format!("未知的时间片分配方式: {}", other)),
        }
    }
}

// ==========================================
// MomentumConfig - 动量策略参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumConfig {
    pub improvement_threshold: f64, // 触发奖励的相对提升阈值
    pub bonus_factor: f64,          // 奖励倍数
    pub base_allocation: BaseAllocation,
    pub expected_iterations: u32,
    pub fixed_slice_secs: f64,
    pub min_slice_secs: f64, // 低于该值视为预算耗尽
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            improvement_threshold: 0.10,
            bonus_factor: 2.0,
            base_allocation: BaseAllocation::Proportional,
            expected_iterations: 10,
            fixed_slice_secs: 15.0,
            min_slice_secs: 1.0,
        }
    }
}

// ==========================================
// SolverConfig - 求解总配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub total_time_budget_secs: f64,
    pub convergence_tolerance: f64, // ε
    pub max_iterations: usize,
    pub grace_period_secs: f64, // 求解器超出时间片的容忍
    pub momentum: MomentumConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            total_time_budget_secs: 600.0,
            convergence_tolerance: 1e-4,
            max_iterations: 30,
            grace_period_secs: 2.0,
            momentum: MomentumConfig::default(),
        }
    }
}

impl SolverConfig {
    pub fn total_time_budget(&self) -> Duration {
        Duration::from_secs_f64(self.total_time_budget_secs)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs_f64(self.grace_period_secs)
    }

    /// 覆写全局时间预算（命令行参数优先于配置文件）
    pub fn with_time_budget(mut self, secs: f64) -> Self {
        self.total_time_budget_secs = secs;
        self
    }

    /// 校验参数取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::ValidationError(msg));

        if !(self.total_time_budget_secs.is_finite() && self.total_time_budget_secs > 0.0) {
            return invalid(format!(
                "全局时间预算必须为正数: {}",
                self.total_time_budget_secs
            ));
        }
        if !(self.convergence_tolerance.is_finite() && self.convergence_tolerance > 0.0) {
            return invalid(format!(
                "收敛容差必须为正数: {}",
                self.convergence_tolerance
            ));
        }
        if self.max_iterations == 0 {
            return invalid("最大迭代次数必须 >= 1".to_string());
        }
        if !(self.grace_period_secs.is_finite() && self.grace_period_secs >= 0.0) {
            return invalid(format!("宽限期不能为负: {}", self.grace_period_secs));
        }

        let m = &self.momentum;

        // 秒数字段必须可表示为 Duration,否则运行中换算会 panic
        for (name, secs) in [
            ("全局时间预算", self.total_time_budget_secs),
            ("宽限期", self.grace_period_secs),
            ("固定时间片", m.fixed_slice_secs),
            ("最小时间片", m.min_slice_secs),
        ] {
            if Duration::try_from_secs_f64(secs).is_err() {
                return invalid(format!("{}超出可表示范围: {}", name, secs));
            }
        }

        if !(m.improvement_threshold.is_finite() && m.improvement_threshold >= 0.0) {
            return invalid(format!("动量阈值不能为负: {}", m.improvement_threshold));
        }
        if m.expected_iterations == 0 {
            return invalid("预期迭代轮数必须 >= 1".to_string());
        }
        if !(m.bonus_factor.is_finite() && m.bonus_factor >= 1.5) {
            return invalid(format!("奖励倍数必须 >= 1.5: {}", m.bonus_factor));
        }
        if m.base_allocation == BaseAllocation::Proportional
            && m.bonus_factor >= f64::from(m.expected_iterations)
        {
            return invalid(format!(
                "奖励倍数 {} 必须小于预期迭代轮数 {}",
                m.bonus_factor, m.expected_iterations
            ));
        }
        if !(m.fixed_slice_secs.is_finite() && m.fixed_slice_secs > 0.0) {
            return invalid(format!("固定时间片必须为正数: {}", m.fixed_slice_secs));
        }
        if !(m.min_slice_secs.is_finite() && m.min_slice_secs >= 0.0) {
            return invalid(format!("最小时间片不能为负: {}", m.min_slice_secs));
        }

        Ok(())
    }
}
