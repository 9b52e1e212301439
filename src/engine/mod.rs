// ==========================================
// 仓库波次拣货优化系统 - 引擎层
// ==========================================
// 职责: 热启动、子问题构建、Dinkelbach 迭代、时间预算、结果提取
// 红线: 引擎不读写文件,求解器只通过 MilpSolver trait 访问
// ==========================================

pub mod dinkelbach;
pub mod error;
pub mod extractor;
pub mod momentum;
pub mod orchestrator;
pub mod subproblem;
pub mod warm_start;

// 重导出核心引擎
pub use dinkelbach::{DinkelbachController, DinkelbachOutcome};
pub use error::{ModelBuildError, WaveError, WaveResult};
pub use extractor::SolutionExtractor;
pub use momentum::{BudgetDecision, MomentumPolicy, MomentumState};
pub use orchestrator::{WaveOrchestrator, WaveRunResult};
pub use subproblem::{SubproblemBuilder, WaveSubproblem};
pub use warm_start::{WarmStart, WarmStartHeuristic};
