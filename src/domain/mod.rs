// ==========================================
// 仓库波次拣货优化系统 - 领域模型层
// ==========================================
// 职责: 定义实例、候选波次、迭代记录、对外结果
// 红线: 不含求解逻辑,不含文件读写
// ==========================================

pub mod candidate;
pub mod instance;
pub mod iteration;
pub mod selection;
pub mod types;

// 重导出核心类型
pub use candidate::{realized_density, CandidateSource, ItemDraw, WaveCandidate};
pub use instance::{Aisle, Instance, Order, WaveBounds};
pub use iteration::IterationRecord;
pub use selection::WaveSelection;
pub use types::{AisleId, ItemId, OrderId, TerminationReason, WaveSizeMeasure};
