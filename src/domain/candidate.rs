// ==========================================
// 仓库波次拣货优化系统 - 候选波次（决策状态）
// ==========================================
// 职责: 一次迭代（或启发式）产生的订单/巷道选择及取货分配
// ==========================================

use crate::domain::instance::Instance;
use crate::domain::types::{AisleId, ItemId, OrderId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 从某巷道提取某物料的数量
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemDraw {
    pub item: ItemId,
    pub aisle: AisleId,
    pub quantity: f64,
}

/// 候选来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateSource {
    WarmStart,
    Iteration(usize),
}

// ==========================================
// WaveCandidate - 候选波次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveCandidate {
    pub orders: BTreeSet<OrderId>,
    pub aisles: BTreeSet<AisleId>,
    pub draws: Vec<ItemDraw>,
    pub total_units: u64,
    pub density: f64, // 总件数 / 巷道数（无巷道时为 0）
    pub source: CandidateSource,
}

impl WaveCandidate {
    /// 构造候选并按实例计算件数与实际密度
    pub fn new(
        instance: &Instance,
        orders: BTreeSet<OrderId>,
        aisles: BTreeSet<AisleId>,
        draws: Vec<ItemDraw>,
        source: CandidateSource,
    ) -> Self {
        let total_units = instance.units_of(&orders);
        let density = realized_density(total_units, aisles.len());
        Self {
            orders,
            aisles,
            draws,
            total_units,
            density,
            source,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// 实际密度 = 件数 / 巷道数
pub fn realized_density(total_units: u64, aisle_count: usize) -> f64 {
    if aisle_count == 0 {
        return 0.0;
    }
    total_units as f64 / aisle_count as f64
}
