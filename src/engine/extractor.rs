// ==========================================
// 仓库波次拣货优化系统 - 结果提取器
// ==========================================
// 职责: 把控制器的最优候选转换为对外结果
// 红线: 输出前重新校验全部不变量,任何不一致都是致命错误
// ==========================================

use crate::domain::{
    realized_density, Instance, ItemId, TerminationReason, WaveCandidate, WaveSelection,
};
use crate::engine::dinkelbach::DinkelbachOutcome;
use crate::engine::error::{WaveError, WaveResult};
use std::collections::BTreeMap;
use tracing::{error, info};

/// 连续取货量的数值容差
const QUANTITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, Default)]
pub struct SolutionExtractor;

impl SolutionExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 提取最终波次
    ///
    /// # 返回
    /// - Err(SolverInfeasible): 首轮子问题不可行（不论热启动结果）
    /// - Err(SolverTimeoutNoSolution): 超时且没有任何候选
    /// - Err(NoSolutionFound): 其他原因终止且没有候选
    /// - Err(InternalInvariantViolation): 候选违反约束
    pub fn extract(
        &self,
        instance: &Instance,
        outcome: &DinkelbachOutcome,
    ) -> WaveResult<WaveSelection> {
        if outcome.reason == TerminationReason::Infeasible {
            return Err(WaveError::SolverInfeasible);
        }

        let best = match &outcome.best {
            Some(best) => best,
            None if outcome.reason == TerminationReason::TimeExhausted => {
                return Err(WaveError::SolverTimeoutNoSolution)
            }
            None => {
                return Err(WaveError::NoSolutionFound {
                    reason: outcome.reason,
                })
            }
        };

        if let Err(violation) = self.verify(instance, best) {
            error!(run_id = %outcome.run_id, %violation, "最优候选未通过校验");
            return Err(WaveError::InternalInvariantViolation(violation));
        }

        let selection = WaveSelection {
            run_id: outcome.run_id,
            orders: best.orders.iter().copied().collect(),
            aisles: best.aisles.iter().copied().collect(),
            total_units: best.total_units,
            density: best.density,
            reason: outcome.reason,
            optimality_proven: outcome.optimality_proven,
            iterations: outcome.iterations(),
        };

        info!(
            run_id = %selection.run_id,
            orders = selection.orders.len(),
            aisles = selection.aisles.len(),
            units = selection.total_units,
            density = selection.density,
            reason = %selection.reason,
            "波次结果提取完成"
        );

        Ok(selection)
    }

    /// 校验候选的全部不变量,返回第一条违规描述
    pub fn verify(&self, instance: &Instance, candidate: &WaveCandidate) -> Result<(), String> {
        // 1. 标识有效
        if let Some(o) = candidate.orders.iter().find(|&&o| instance.order(o).is_none()) {
            return Err(format!("订单 {} 不存在", o));
        }
        if let Some(a) = candidate.aisles.iter().find(|&&a| instance.aisle(a).is_none()) {
            return Err(format!("巷道 {} 不存在", a));
        }

        // 2. 波次规模
        let bounds = instance.bounds();
        let size = instance.wave_size(&candidate.orders);
        if !bounds.contains(size) {
            return Err(format!(
                "波次规模 {} 超出 [{}, {}] ({})",
                size, bounds.min, bounds.max, bounds.measure
            ));
        }

        if !candidate.orders.is_empty() && candidate.aisles.is_empty() {
            return Err("非空波次没有访问任何巷道".to_string());
        }

        // 3. 需求与所选巷道供给
        let mut demand: BTreeMap<ItemId, u64> = BTreeMap::new();
        for order in candidate.orders.iter().filter_map(|&o| instance.order(o)) {
            for (&item, &qty) in &order.items {
                *demand.entry(item).or_insert(0) += u64::from(qty);
            }
        }
        for (&item, &need) in &demand {
            let supply: u64 = candidate
                .aisles
                .iter()
                .filter_map(|&a| instance.aisle(a))
                .map(|a| u64::from(a.stock_of(item)))
                .sum();
            if need > supply {
                return Err(format!(
                    "物料 {} 需求 {} 超过所选巷道供给 {}",
                    item, need, supply
                ));
            }
        }

        // 4. 取货分配
        let mut drawn_per_slot: BTreeMap<(ItemId, usize), f64> = BTreeMap::new();
        let mut drawn_per_item: BTreeMap<ItemId, f64> = BTreeMap::new();
        for draw in &candidate.draws {
            if !candidate.aisles.contains(&draw.aisle) {
                return Err(format!(
                    "物料 {} 从未访问的巷道 {} 取货",
                    draw.item, draw.aisle
                ));
            }
            if draw.quantity < -QUANTITY_TOLERANCE {
                return Err(format!("物料 {} 取货量为负: {}", draw.item, draw.quantity));
            }
            *drawn_per_slot.entry((draw.item, draw.aisle)).or_insert(0.0) += draw.quantity;
            *drawn_per_item.entry(draw.item).or_insert(0.0) += draw.quantity;
        }
        for (&(item, aisle), &qty) in &drawn_per_slot {
            let stock = instance
                .aisle(aisle)
                .map(|a| f64::from(a.stock_of(item)))
                .unwrap_or(0.0);
            if qty > stock + QUANTITY_TOLERANCE {
                return Err(format!(
                    "巷道 {} 物料 {} 取货 {} 超过库存 {}",
                    aisle, item, qty, stock
                ));
            }
        }
        for (&item, &need) in &demand {
            let drawn = drawn_per_item.get(&item).copied().unwrap_or(0.0);
            if drawn + QUANTITY_TOLERANCE < need as f64 {
                return Err(format!("物料 {} 取货 {} 不足需求 {}", item, drawn, need));
            }
        }

        // 5. 密度复核
        let units = instance.units_of(&candidate.orders);
        if units != candidate.total_units {
            return Err(format!(
                "件数不一致: 记录 {} / 复核 {}",
                candidate.total_units, units
            ));
        }
        let density = realized_density(units, candidate.aisles.len());
        if (density - candidate.density).abs() > 1e-9 {
            return Err(format!(
                "密度不一致: 记录 {} / 复核 {}",
                candidate.density, density
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Aisle, CandidateSource, ItemDraw, Order, WaveBounds};
    use std::collections::BTreeSet;

    fn instance() -> Instance {
        Instance::new(
            vec![Order::from_pairs(0, &[(0, 4)])],
            vec![
                Aisle::from_pairs(0, &[(0, 3)]),
                Aisle::from_pairs(1, &[(0, 3)]),
            ],
            1,
            WaveBounds::units(1, 10),
        )
    }

    fn candidate(aisles: &[usize], draws: Vec<ItemDraw>) -> WaveCandidate {
        WaveCandidate::new(
            &instance(),
            [0].into_iter().collect(),
            aisles.iter().copied().collect::<BTreeSet<_>>(),
            draws,
            CandidateSource::Iteration(0),
        )
    }

    fn draw(aisle: usize, quantity: f64) -> ItemDraw {
        ItemDraw {
            item: 0,
            aisle,
            quantity,
        }
    }

    #[test]
    fn test_valid_candidate_passes() {
        let c = candidate(&[0, 1], vec![draw(0, 3.0), draw(1, 1.0)]);
        assert!(SolutionExtractor::new().verify(&instance(), &c).is_ok());
    }

    #[test]
    fn test_insufficient_supply_detected() {
        let c = candidate(&[0], vec![draw(0, 3.0)]);
        let err = SolutionExtractor::new().verify(&instance(), &c).unwrap_err();
        assert!(err.contains("超过所选巷道供给"));
    }

    #[test]
    fn test_draw_from_unvisited_aisle_detected() {
        let c = candidate(&[0, 1], vec![draw(0, 3.0), draw(2, 1.0)]);
        assert!(SolutionExtractor::new().verify(&instance(), &c).is_err());
    }

    #[test]
    fn test_tampered_density_detected() {
        let mut c = candidate(&[0, 1], vec![draw(0, 3.0), draw(1, 1.0)]);
        c.density = 4.0;
        let err = SolutionExtractor::new().verify(&instance(), &c).unwrap_err();
        assert!(err.contains("密度不一致"));
    }
}
