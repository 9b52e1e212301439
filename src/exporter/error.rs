// ==========================================
// 仓库波次拣货优化系统 - 导出模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("文件写入失败 ({path}): {source}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON 序列化失败: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV 写入失败: {0}")]
    CsvError(#[from] csv::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;
