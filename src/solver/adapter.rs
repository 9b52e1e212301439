// ==========================================
// 仓库波次拣货优化系统 - MILP 求解适配接口
// ==========================================
// 职责: 定义求解器接口,Dinkelbach 控制器只依赖此 trait
// 说明: 任何满足契约的整数规划后端都可替换,无需改动迭代逻辑
// 红线: 调用方给出硬时间上限,实现方须在上限 + 宽限期内返回
// ==========================================

use crate::solver::error::SolverResult;
use crate::solver::model::{Assignment, LinearProgram};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// ==========================================
// 求解状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolverStatus {
    Optimal,             // 证明最优
    FeasibleTimeLimited, // 时间片内找到可行解,未证明最优
    Infeasible,          // 模型不可行
    NoSolution,          // 时间片内无任何可行解
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverStatus::Optimal => write!(f, "OPTIMAL"),
            SolverStatus::FeasibleTimeLimited => write!(f, "FEASIBLE_TIME_LIMITED"),
            SolverStatus::Infeasible => write!(f, "INFEASIBLE"),
            SolverStatus::NoSolution => write!(f, "NO_SOLUTION"),
        }
    }
}

// ==========================================
// 求解结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    pub status: SolverStatus,
    pub objective_value: Option<f64>,
    pub assignment: Option<Assignment>,
}

impl SolverOutcome {
    pub fn optimal(objective_value: f64, assignment: Assignment) -> Self {
        Self {
            status: SolverStatus::Optimal,
            objective_value: Some(objective_value),
            assignment: Some(assignment),
        }
    }

    pub fn feasible(objective_value: f64, assignment: Assignment) -> Self {
        Self {
            status: SolverStatus::FeasibleTimeLimited,
            objective_value: Some(objective_value),
            assignment: Some(assignment),
        }
    }

    pub fn infeasible() -> Self {
        Self {
            status: SolverStatus::Infeasible,
            objective_value: None,
            assignment: None,
        }
    }

    pub fn no_solution() -> Self {
        Self {
            status: SolverStatus::NoSolution,
            objective_value: None,
            assignment: None,
        }
    }
}

// ==========================================
// MilpSolver Trait
// ==========================================
/// MILP 求解器接口
///
/// # 契约
/// - `time_limit` 为硬墙钟上限,返回不得晚于上限 + 小宽限期
/// - `FeasibleTimeLimited` 与 `Optimal` 都必须附带赋值与目标值
/// - 不可行、超时无解通过状态返回,不作为错误
/// - 内部是否多线程对调用方不可见
#[async_trait]
pub trait MilpSolver: Send + Sync {
    /// 后端名称（日志用）
    fn name(&self) -> &str;

    /// 在时间上限内求解模型
    async fn solve(
        &self,
        program: Arc<LinearProgram>,
        time_limit: Duration,
    ) -> SolverResult<SolverOutcome>;
}
