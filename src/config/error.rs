// ==========================================
// 仓库波次拣货优化系统 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 文件相关错误 =====
    #[error("配置文件读取失败 ({path}): {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误: {0}")]
    FormatError(#[from] serde_json::Error),

    #[error("配置文件顶层必须是 JSON 对象")]
    NotAnObject,

    // ===== 配置值错误 =====
    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    #[error("配置校验失败: {0}")]
    ValidationError(String),

    #[error("配置锁获取失败: {0}")]
    LockError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
