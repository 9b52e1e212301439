// ==========================================
// 仓库波次拣货优化系统 - 配置层
// ==========================================
// 职责: 求解阈值的加载、覆写与校验
// 存储: 扁平 key-value（JSON 文件）
// ==========================================

pub mod config_manager;
pub mod error;
pub mod solver_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use solver_config::{BaseAllocation, MomentumConfig, SolverConfig};
