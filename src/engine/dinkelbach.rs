// ==========================================
// 仓库波次拣货优化系统 - Dinkelbach 控制器
// ==========================================
// 职责: 分式目标 max units/aisles 的参数化迭代
// 流程: 热启动 -> R0 -> { 建模 -> 限时求解 -> 收敛判定 -> 动量更新 }
// 红线: R 只在两轮之间按 Dinkelbach 规则更新,且不下降
// 红线: 当前最优解显式持有,只在实际密度严格提高时替换
// ==========================================

mod core;
mod types;

#[cfg(test)]
mod tests;

pub use self::core::DinkelbachController;
pub use self::types::DinkelbachOutcome;
