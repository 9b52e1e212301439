// ==========================================
// 仓库波次拣货优化系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: 扁平 key-value（JSON 对象文件）,未配置的键取默认值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::solver_config::{BaseAllocation, MomentumConfig, SolverConfig};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::RwLock;
use tracing::{debug, info};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Default)]
pub struct ConfigManager {
    values: RwLock<BTreeMap<String, String>>,
}

impl ConfigManager {
    /// 创建空配置（全部取默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 配置文件加载
    ///
    /// # 格式
    /// 顶层为对象: {"solver.total_time_budget_secs": 300, "momentum.base_allocation": "fixed"}
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadError {
            path: path.display().to_string(),
            source,
        })?;
        let manager = Self::from_json_str(&raw)?;
        info!(path = %path.display(), "配置文件加载完成");
        Ok(manager)
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let manager = Self::new();
        manager.restore_config_from_snapshot(raw)?;
        Ok(manager)
    }

    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    /// 读取配置值（公开方法,供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 写入配置值（覆盖已有值）
    pub fn set_config_value(&self, key: &str, value: impl Into<String>) -> ConfigResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        values.insert(key.to_string(), value.into());
        Ok(())
    }

    /// 读取并解析配置值；未配置时返回默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: ToString,
    {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::ConfigValueError {
                    key: key.to_string(),
                    value: raw.clone(),
                    message: e.to_string(),
                }),
        }
    }

    /// 获取所有已配置项的快照（JSON格式）
    ///
    /// # 用途
    /// - 写入运行报告,保证结果可复现
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let values = self
            .values
            .read()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        Ok(serde_json::to_string(&*values)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 非字符串值按 JSON 文本保存（数字 300 保存为 "300"）
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let parsed: Value = serde_json::from_str(snapshot_json)?;
        let object = parsed.as_object().ok_or(ConfigError::NotAnObject)?;

        let mut values = self
            .values
            .write()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let mut count = 0;
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            values.insert(key.clone(), text);
            count += 1;
        }

        debug!(count, "配置项已恢复");
        Ok(count)
    }

    // ===== 求解配置 =====

    /// 解析完整求解配置并校验
    pub fn resolve_solver_config(&self) -> ConfigResult<SolverConfig> {
        let defaults = SolverConfig::default();
        let m = MomentumConfig::default();

        let config = SolverConfig {
            total_time_budget_secs: self.get_parsed_or_default(
                config_keys::TOTAL_TIME_BUDGET_SECS,
                defaults.total_time_budget_secs,
            )?,
            convergence_tolerance: self.get_parsed_or_default(
                config_keys::CONVERGENCE_TOLERANCE,
                defaults.convergence_tolerance,
            )?,
            max_iterations: self
                .get_parsed_or_default(config_keys::MAX_ITERATIONS, defaults.max_iterations)?,
            grace_period_secs: self
                .get_parsed_or_default(config_keys::GRACE_PERIOD_SECS, defaults.grace_period_secs)?,
            momentum: MomentumConfig {
                improvement_threshold: self.get_parsed_or_default(
                    config_keys::IMPROVEMENT_THRESHOLD,
                    m.improvement_threshold,
                )?,
                bonus_factor: self
                    .get_parsed_or_default(config_keys::BONUS_FACTOR, m.bonus_factor)?,
                base_allocation: self.get_parsed_or_default::<BaseAllocation>(
                    config_keys::BASE_ALLOCATION,
                    m.base_allocation,
                )?,
                expected_iterations: self.get_parsed_or_default(
                    config_keys::EXPECTED_ITERATIONS,
                    m.expected_iterations,
                )?,
                fixed_slice_secs: self
                    .get_parsed_or_default(config_keys::FIXED_SLICE_SECS, m.fixed_slice_secs)?,
                min_slice_secs: self
                    .get_parsed_or_default(config_keys::MIN_SLICE_SECS, m.min_slice_secs)?,
            },
        };

        config.validate()?;
        Ok(config)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 控制器
    pub const TOTAL_TIME_BUDGET_SECS: &str = "solver.total_time_budget_secs";
    pub const CONVERGENCE_TOLERANCE: &str = "solver.convergence_tolerance";
    pub const MAX_ITERATIONS: &str = "solver.max_iterations";
    pub const GRACE_PERIOD_SECS: &str = "solver.grace_period_secs";

    // 动量策略
    pub const IMPROVEMENT_THRESHOLD: &str = "momentum.improvement_threshold";
    pub const BONUS_FACTOR: &str = "momentum.bonus_factor";
    pub const BASE_ALLOCATION: &str = "momentum.base_allocation"; // proportional | fixed
    pub const EXPECTED_ITERATIONS: &str = "momentum.expected_iterations";
    pub const FIXED_SLICE_SECS: &str = "momentum.fixed_slice_secs";
    pub const MIN_SLICE_SECS: &str = "momentum.min_slice_secs";
}
