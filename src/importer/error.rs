// ==========================================
// 仓库波次拣货优化系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 行号从 1 开始,与文本编辑器一致
// ==========================================

use thiserror::Error;

/// 实例文件解析错误
#[derive(Error, Debug)]
pub enum ParseError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败 ({path}): {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ===== 格式错误 =====
    #[error("缺少表头行 (订单数 物料数 巷道数)")]
    MissingHeader,

    #[error("表头格式错误 (行 {line}): 期望 3 个整数,实际 {found} 个")]
    MalformedHeader { line: usize, found: usize },

    #[error("整数解析失败 (行 {line}): {token}")]
    InvalidInteger { line: usize, token: String },

    #[error("条目数量不符 (行 {line}): 声明 {declared} 对,实际 {found} 个数值")]
    PairCountMismatch {
        line: usize,
        declared: usize,
        found: usize,
    },

    #[error("文件提前结束: 缺少{0}")]
    UnexpectedEof(String),

    #[error("波次上下限行格式错误 (行 {line}): 期望 2 个整数,实际 {found} 个")]
    MalformedBounds { line: usize, found: usize },

    #[error("文件末尾存在多余数据 (行 {0})")]
    TrailingData(usize),

    // ===== 数据质量错误 =====
    #[error("物料超出目录范围 (行 {line}): 物料 {item}, 物料数 {num_items}")]
    ItemOutOfCatalog {
        line: usize,
        item: usize,
        num_items: usize,
    },

    #[error("订单需求数量为 0 (行 {line}): 物料 {item}")]
    ZeroQuantity { line: usize, item: usize },
}

pub type ParseResult<T> = Result<T, ParseError>;
