// ==========================================
// 仓库波次拣货优化系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分层: ModelBuildError（建模失败） / WaveError（运行失败）
// ==========================================

use crate::domain::types::{ItemId, OrderId, TerminationReason};
use crate::solver::SolverError;
use thiserror::Error;

/// 子问题建模错误（致命,立即上报）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelBuildError {
    #[error("比值参数非法: {0}")]
    InvalidRatio(f64),

    #[error("实例为空: {0}")]
    EmptyInstance(String),

    #[error("波次规模上下限颠倒: min={min}, max={max}")]
    InvertedBounds { min: u64, max: u64 },

    #[error("订单 {order} 需求的物料 {item} 在任何巷道都无库存")]
    UnstockedItem { order: OrderId, item: ItemId },

    #[error("订单 {order} 的物料 {item} 需求数量为 0")]
    ZeroQuantity { order: OrderId, item: ItemId },

    #[error("物料 {item} 超出物料目录范围 (num_items={num_items})")]
    ItemOutOfCatalog { item: ItemId, num_items: usize },

    #[error("{kind} 标识不连续: 位置 {position} 上的标识为 {id}")]
    NonContiguousIds {
        kind: &'static str,
        position: usize,
        id: usize,
    },
}

/// 波次优化运行错误
#[derive(Error, Debug)]
pub enum WaveError {
    #[error("建模失败: {0}")]
    ModelBuild(#[from] ModelBuildError),

    #[error("首轮子问题不可行: 当前实例不存在满足约束的波次")]
    SolverInfeasible,

    #[error("求解超时且没有任何可行解")]
    SolverTimeoutNoSolution,

    #[error("未找到可行波次 (终止原因: {reason})")]
    NoSolutionFound { reason: TerminationReason },

    #[error("结果校验失败: {0}")]
    InternalInvariantViolation(String),

    #[error("求解器错误: {0}")]
    Solver(#[from] SolverError),
}

pub type WaveResult<T> = Result<T, WaveError>;
