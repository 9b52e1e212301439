// ==========================================
// 仓库波次拣货优化系统 - 贪心热启动
// ==========================================
// 职责: 构造一个可行波次,给出初始比值 R0
// 评分: 新增件数 / 需要新开的巷道数（无需新开巷道者优先）
// 红线: 返回的候选必须可行,否则不返回候选且 R0 = 0
// ==========================================

use crate::domain::{
    AisleId, CandidateSource, Instance, ItemDraw, ItemId, OrderId, WaveCandidate,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};
use tracing::{debug, info};

// ==========================================
// WarmStart - 热启动结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct WarmStart {
    pub candidate: Option<WaveCandidate>,
    pub ratio: f64, // R0
}

impl WarmStart {
    fn empty() -> Self {
        Self {
            candidate: None,
            ratio: 0.0,
        }
    }
}

// ==========================================
// 订单评分（堆元素）
// ==========================================
#[derive(Debug, Clone, Copy)]
struct ScoredOrder {
    free: bool,     // 不需要新开巷道
    score: f64,     // free 时为件数,否则为 件数/新开巷道数
    order: OrderId,
    version: usize, // 评分时已接纳的订单数
}

impl PartialEq for ScoredOrder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredOrder {}

impl PartialOrd for ScoredOrder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredOrder {
    fn cmp(&self, other: &Self) -> Ordering {
        self.free
            .cmp(&other.free)
            .then_with(|| self.score.total_cmp(&other.score))
            // 同分时订单号小者优先
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// 单个订单的取货计划
#[derive(Debug, Default)]
struct OrderPlan {
    new_aisles: BTreeSet<AisleId>,
    draws: Vec<(ItemId, AisleId, u32)>,
}

// ==========================================
// 构造状态
// ==========================================
struct GreedyState<'a> {
    instance: &'a Instance,
    residual: Vec<BTreeMap<ItemId, u32>>, // 巷道剩余库存
    opened: BTreeSet<AisleId>,
    selected: BTreeSet<OrderId>,
    drawn: BTreeMap<(ItemId, AisleId), u64>,
    wave_size: u64,
}

impl<'a> GreedyState<'a> {
    fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            residual: instance.aisles().iter().map(|a| a.stock.clone()).collect(),
            opened: BTreeSet::new(),
            selected: BTreeSet::new(),
            drawn: BTreeMap::new(),
            wave_size: 0,
        }
    }

    fn residual_of(&self, aisle: AisleId, item: ItemId) -> u32 {
        self.residual
            .get(aisle)
            .and_then(|s| s.get(&item).copied())
            .unwrap_or(0)
    }

    /// 计算订单的取货计划；剩余库存无法覆盖时返回 None
    fn plan(&self, order_id: OrderId) -> Option<OrderPlan> {
        let order = self.instance.order(order_id)?;
        let mut plan = OrderPlan::default();

        for (&item, &qty) in &order.items {
            let mut need = qty;
            let stocking = self.instance.aisles_stocking(item);

            // 先从已开巷道取
            for &aisle in stocking {
                if need == 0 {
                    break;
                }
                if !self.opened.contains(&aisle) && !plan.new_aisles.contains(&aisle) {
                    continue;
                }
                let take = need.min(self.residual_of(aisle, item));
                if take > 0 {
                    plan.draws.push((item, aisle, take));
                    need -= take;
                }
            }

            if need == 0 {
                continue;
            }

            // 再按剩余库存从大到小新开巷道
            let mut fresh: Vec<(u32, AisleId)> = stocking
                .iter()
                .filter(|&a| !self.opened.contains(a) && !plan.new_aisles.contains(a))
                .map(|&a| (self.residual_of(a, item), a))
                .filter(|&(r, _)| r > 0)
                .collect();
            fresh.sort_by(|x, y| y.0.cmp(&x.0).then(x.1.cmp(&y.1)));

            for (available, aisle) in fresh {
                if need == 0 {
                    break;
                }
                let take = need.min(available);
                plan.new_aisles.insert(aisle);
                plan.draws.push((item, aisle, take));
                need -= take;
            }

            if need > 0 {
                return None;
            }
        }

        Some(plan)
    }

    fn score(&self, order_id: OrderId, plan: &OrderPlan) -> ScoredOrder {
        let units = self
            .instance
            .order(order_id)
            .map(|o| o.total_units())
            .unwrap_or(0) as f64;
        let free = plan.new_aisles.is_empty();
        let score = if free {
            units
        } else {
            units / plan.new_aisles.len() as f64
        };
        ScoredOrder {
            free,
            score,
            order: order_id,
            version: self.selected.len(),
        }
    }

    fn accept(&mut self, order_id: OrderId, plan: OrderPlan) {
        for (item, aisle, take) in plan.draws {
            if let Some(slot) = self.residual.get_mut(aisle).and_then(|s| s.get_mut(&item)) {
                *slot -= take;
            }
            *self.drawn.entry((item, aisle)).or_insert(0) += u64::from(take);
        }
        self.opened.extend(plan.new_aisles);
        self.selected.insert(order_id);
        self.wave_size += self
            .instance
            .order(order_id)
            .map(|o| o.wave_weight(self.instance.bounds().measure))
            .unwrap_or(0);
    }
}

// ==========================================
// WarmStartHeuristic - 贪心热启动
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct WarmStartHeuristic;

impl WarmStartHeuristic {
    pub fn new() -> Self {
        Self
    }

    /// 运行贪心构造
    ///
    /// # 说明
    /// - 评分保存在最大堆中,仅在订单到达堆顶时惰性重算
    /// - 超出波次上限或剩余库存无法覆盖的订单永久剔除（两者都只会更糟）
    pub fn run(&self, instance: &Instance) -> WarmStart {
        let bounds = instance.bounds();
        let mut state = GreedyState::new(instance);
        let mut heap = BinaryHeap::new();

        for order in instance.orders() {
            if order.wave_weight(bounds.measure) > bounds.max {
                continue;
            }
            if let Some(plan) = state.plan(order.id) {
                heap.push(state.score(order.id, &plan));
            }
        }

        let mut discarded = 0usize;
        while let Some(top) = heap.pop() {
            let weight = instance
                .order(top.order)
                .map(|o| o.wave_weight(bounds.measure))
                .unwrap_or(0);
            if state.wave_size + weight > bounds.max {
                discarded += 1;
                continue;
            }

            let plan = match state.plan(top.order) {
                Some(plan) => plan,
                None => {
                    discarded += 1;
                    continue;
                }
            };

            if top.version == state.selected.len() {
                state.accept(top.order, plan);
                continue;
            }

            // 评分过期: 重算后放回,若仍不低于新堆顶则直接接纳
            let fresh = state.score(top.order, &plan);
            match heap.peek() {
                Some(next) if fresh < *next => heap.push(fresh),
                _ => state.accept(top.order, plan),
            }
        }

        debug!(
            selected = state.selected.len(),
            opened = state.opened.len(),
            discarded,
            wave_size = state.wave_size,
            "贪心构造结束"
        );

        if state.selected.is_empty() || !bounds.contains(state.wave_size) {
            info!(
                wave_size = state.wave_size,
                wave_min = bounds.min,
                "热启动未得到满足下限的波次,从 R0 = 0 开始"
            );
            return WarmStart::empty();
        }

        let draws = state
            .drawn
            .iter()
            .map(|(&(item, aisle), &qty)| ItemDraw {
                item,
                aisle,
                quantity: qty as f64,
            })
            .collect();
        let candidate = WaveCandidate::new(
            instance,
            state.selected,
            state.opened,
            draws,
            CandidateSource::WarmStart,
        );
        let ratio = candidate.density;

        info!(
            orders = candidate.orders.len(),
            aisles = candidate.aisles.len(),
            units = candidate.total_units,
            ratio,
            "热启动得到可行波次"
        );

        WarmStart {
            candidate: Some(candidate),
            ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Aisle, Order, WaveBounds};

    #[test]
    fn test_free_orders_rank_first() {
        // 订单 0 需要巷道 0；订单 1 与订单 0 共用巷道 0
        let instance = Instance::new(
            vec![
                Order::from_pairs(0, &[(0, 4)]),
                Order::from_pairs(1, &[(1, 1)]),
                Order::from_pairs(2, &[(2, 3)]),
            ],
            vec![
                Aisle::from_pairs(0, &[(0, 5), (1, 5)]),
                Aisle::from_pairs(1, &[(2, 3)]),
            ],
            3,
            WaveBounds::units(1, 5),
        );

        let result = WarmStartHeuristic::new().run(&instance);
        let candidate = result.candidate.unwrap();
        assert_eq!(candidate.orders, [0, 1].into_iter().collect());
        assert_eq!(candidate.aisles, [0].into_iter().collect());
        assert_eq!(result.ratio, 5.0);
    }

    #[test]
    fn test_below_minimum_yields_no_candidate() {
        let instance = Instance::new(
            vec![Order::from_pairs(0, &[(0, 2)])],
            vec![Aisle::from_pairs(0, &[(0, 5)])],
            1,
            WaveBounds::units(3, 10),
        );
        let result = WarmStartHeuristic::new().run(&instance);
        assert!(result.candidate.is_none());
        assert_eq!(result.ratio, 0.0);
    }

    #[test]
    fn test_orders_compete_for_stock() {
        // 两个订单都要物料 0,库存只够一个
        let instance = Instance::new(
            vec![
                Order::from_pairs(0, &[(0, 3)]),
                Order::from_pairs(1, &[(0, 3)]),
            ],
            vec![Aisle::from_pairs(0, &[(0, 4)])],
            1,
            WaveBounds::units(1, 10),
        );
        let candidate = WarmStartHeuristic::new().run(&instance).candidate.unwrap();
        assert_eq!(candidate.orders, [0].into_iter().collect());
        let drawn: f64 = candidate.draws.iter().map(|d| d.quantity).sum();
        assert_eq!(drawn, 3.0);
    }
}
