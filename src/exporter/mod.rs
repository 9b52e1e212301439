// ==========================================
// 仓库波次拣货优化系统 - 导出层
// ==========================================
// 职责: 解文件、运行报告、批量汇总的写出
// ==========================================

pub mod error;
pub mod report;
pub mod solution_writer;

pub use error::{ExportError, ExportResult};
pub use report::{write_batch_summary, BatchSummaryRow, RunReport};
pub use solution_writer::SolutionWriter;
