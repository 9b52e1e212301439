// ==========================================
// 仓库波次拣货优化系统 - 运行编排器
// ==========================================
// 职责: 串联 控制器 -> 提取器,产出对外结果与运行报告素材
// 输入: 实例 + 求解配置 + 求解器
// 输出: WaveRunResult（对外波次 + 完整迭代结果）
// ==========================================

use crate::config::{ConfigError, ConfigManager, SolverConfig};
use crate::domain::{Instance, WaveSelection};
use crate::engine::dinkelbach::{DinkelbachController, DinkelbachOutcome};
use crate::engine::error::WaveResult;
use crate::engine::extractor::SolutionExtractor;
use crate::perf::PerfGuard;
use crate::solver::{GoodLpSolver, MilpSolver};
use std::sync::Arc;
use tracing::info;

/// 一次完整运行的结果
#[derive(Debug, Clone)]
pub struct WaveRunResult {
    pub selection: WaveSelection,
    pub outcome: DinkelbachOutcome,
}

// ==========================================
// WaveOrchestrator - 运行编排器
// ==========================================
pub struct WaveOrchestrator {
    solver: Arc<dyn MilpSolver>,
    controller: DinkelbachController,
    extractor: SolutionExtractor,
}

impl WaveOrchestrator {
    /// 创建编排器
    pub fn new(solver: Arc<dyn MilpSolver>, config: SolverConfig) -> Self {
        Self {
            controller: DinkelbachController::new(Arc::clone(&solver), config),
            solver,
            extractor: SolutionExtractor::new(),
        }
    }

    /// 使用默认后端（good_lp/microlp）,宽限期取自配置
    pub fn with_default_solver(config: SolverConfig) -> Self {
        let solver = Arc::new(GoodLpSolver::new(config.grace_period()));
        Self::new(solver, config)
    }

    /// 从配置管理器解析配置并创建编排器
    pub fn from_config_manager(
        solver: Arc<dyn MilpSolver>,
        manager: &ConfigManager,
    ) -> Result<Self, ConfigError> {
        let config = manager.resolve_solver_config()?;
        Ok(Self::new(solver, config))
    }

    pub fn config(&self) -> &SolverConfig {
        self.controller.config()
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// 执行一次完整优化
    pub async fn run(&self, instance: &Instance) -> WaveResult<WaveRunResult> {
        let _perf = PerfGuard::new("wave_optimize");

        let outcome = self.controller.run(instance).await?;
        let selection = self.extractor.extract(instance, &outcome)?;

        info!(
            run_id = %selection.run_id,
            density = selection.density,
            reason = %selection.reason,
            iterations = selection.iterations,
            "波次优化完成"
        );

        Ok(WaveRunResult { selection, outcome })
    }
}
