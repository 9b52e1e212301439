// ==========================================
// 仓库波次拣货优化系统 - 求解适配层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 求解适配层错误类型
///
/// 仅表示后端本身出错；不可行与超时无解通过 `SolverStatus` 返回
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("求解后端错误 ({backend}): {message}")]
    Backend { backend: String, message: String },

    #[error("求解模型无界: {0}")]
    Unbounded(String),

    #[error("求解工作线程异常退出: {0}")]
    WorkerLost(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SolverResult<T> = Result<T, SolverError>;
