// ==========================================
// 仓库波次拣货优化系统 - 求解适配层
// ==========================================
// 职责: 后端无关的整数规划模型 + 求解器接口 + 默认后端
// 红线: 控制器只看到 MilpSolver trait,不感知后端内部搜索
// ==========================================

pub mod adapter;
pub mod error;
pub mod good_lp_backend;
pub mod model;

pub use adapter::{MilpSolver, SolverOutcome, SolverStatus};
pub use error::{SolverError, SolverResult};
pub use good_lp_backend::GoodLpSolver;
pub use model::{Assignment, Comparison, Constraint, LinearExpr, LinearProgram, VarId, VarKind, Variable};
