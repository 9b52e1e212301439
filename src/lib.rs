// ==========================================
// 仓库波次拣货优化系统 - 核心库
// ==========================================
// 问题: 选择订单子集（波次）与访问巷道子集,最大化 件数/巷道数
// 方法: Dinkelbach 分式规划 + 动量时间预算 + 贪心热启动
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实例与结果类型
pub mod domain;

// 求解适配层 - 整数规划模型与后端
pub mod solver;

// 引擎层 - 迭代与启发式
pub mod engine;

// 导入层 - 实例文件
pub mod importer;

// 导出层 - 解文件与报告
pub mod exporter;

// 配置层 - 求解阈值
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{TerminationReason, WaveSizeMeasure};

// 领域实体
pub use domain::{Aisle, Instance, Order, WaveBounds, WaveCandidate, WaveSelection};

// 引擎
pub use engine::{
    DinkelbachController, DinkelbachOutcome, MomentumPolicy, SolutionExtractor,
    SubproblemBuilder, WarmStartHeuristic, WaveError, WaveOrchestrator,
};

// 求解器
pub use solver::{GoodLpSolver, MilpSolver, SolverStatus};

// 配置
pub use config::{ConfigManager, SolverConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "仓库波次拣货优化系统";
