// ==========================================
// 仓库波次拣货优化系统 - 导入层
// ==========================================
// 职责: 读取实例文本文件,生成只读 Instance
// ==========================================

pub mod error;
pub mod instance_parser;

pub use error::{ParseError, ParseResult};
pub use instance_parser::InstanceParser;
