// ==========================================
// 仓库波次拣货优化系统 - 实例领域模型
// ==========================================
// 职责: 订单、巷道、波次规模约束（解析完成后只读）
// 红线: 构造后不可变,派生索引与原始数据一致
// ==========================================

use crate::domain::types::{AisleId, ItemId, OrderId, WaveSizeMeasure};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// Order - 订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub items: BTreeMap<ItemId, u32>, // 物料 -> 需求数量
    total_units: u64,
}

impl Order {
    pub fn new(id: OrderId, items: BTreeMap<ItemId, u32>) -> Self {
        let total_units = items.values().map(|&q| u64::from(q)).sum();
        Self {
            id,
            items,
            total_units,
        }
    }

    /// 从 (物料, 数量) 列表构造，重复物料累加
    pub fn from_pairs(id: OrderId, pairs: &[(ItemId, u32)]) -> Self {
        let mut items = BTreeMap::new();
        for &(item, qty) in pairs {
            *items.entry(item).or_insert(0) += qty;
        }
        Self::new(id, items)
    }

    pub fn total_units(&self) -> u64 {
        self.total_units
    }

    /// 订单在波次规模约束中的权重
    pub fn wave_weight(&self, measure: WaveSizeMeasure) -> u64 {
        match measure {
            WaveSizeMeasure::TotalUnits => self.total_units,
            WaveSizeMeasure::OrderCount => 1,
        }
    }
}

// ==========================================
// Aisle - 巷道
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aisle {
    pub id: AisleId,
    pub stock: BTreeMap<ItemId, u32>, // 物料 -> 库存数量
}

impl Aisle {
    pub fn new(id: AisleId, stock: BTreeMap<ItemId, u32>) -> Self {
        Self { id, stock }
    }

    pub fn from_pairs(id: AisleId, pairs: &[(ItemId, u32)]) -> Self {
        let mut stock = BTreeMap::new();
        for &(item, qty) in pairs {
            *stock.entry(item).or_insert(0) += qty;
        }
        Self::new(id, stock)
    }

    pub fn stock_of(&self, item: ItemId) -> u32 {
        self.stock.get(&item).copied().unwrap_or(0)
    }
}

// ==========================================
// WaveBounds - 波次规模上下限（闭区间）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveBounds {
    pub min: u64,
    pub max: u64,
    #[serde(default)]
    pub measure: WaveSizeMeasure,
}

impl WaveBounds {
    pub fn units(min: u64, max: u64) -> Self {
        Self {
            min,
            max,
            measure: WaveSizeMeasure::TotalUnits,
        }
    }

    pub fn order_count(min: u64, max: u64) -> Self {
        Self {
            min,
            max,
            measure: WaveSizeMeasure::OrderCount,
        }
    }

    pub fn contains(&self, size: u64) -> bool {
        size >= self.min && size <= self.max
    }
}

// ==========================================
// Instance - 问题实例
// ==========================================
#[derive(Debug, Clone)]
pub struct Instance {
    orders: Vec<Order>,
    aisles: Vec<Aisle>,
    num_items: usize,
    bounds: WaveBounds,

    // ===== 派生索引 =====
    item_locations: BTreeMap<ItemId, Vec<AisleId>>, // 物料 -> 存放巷道
    orders_by_item: BTreeMap<ItemId, Vec<OrderId>>, // 物料 -> 需求订单
}

impl Instance {
    pub fn new(orders: Vec<Order>, aisles: Vec<Aisle>, num_items: usize, bounds: WaveBounds) -> Self {
        let mut item_locations: BTreeMap<ItemId, Vec<AisleId>> = BTreeMap::new();
        for aisle in &aisles {
            for (&item, &qty) in &aisle.stock {
                if qty > 0 {
                    item_locations.entry(item).or_default().push(aisle.id);
                }
            }
        }

        let mut orders_by_item: BTreeMap<ItemId, Vec<OrderId>> = BTreeMap::new();
        for order in &orders {
            for &item in order.items.keys() {
                orders_by_item.entry(item).or_default().push(order.id);
            }
        }

        Self {
            orders,
            aisles,
            num_items,
            bounds,
            item_locations,
            orders_by_item,
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn aisles(&self) -> &[Aisle] {
        &self.aisles
    }

    pub fn num_items(&self) -> usize {
        self.num_items
    }

    pub fn bounds(&self) -> WaveBounds {
        self.bounds
    }

    /// 按标识查找订单（标识须与位置一致）
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(id).filter(|o| o.id == id)
    }

    pub fn aisle(&self, id: AisleId) -> Option<&Aisle> {
        self.aisles.get(id).filter(|a| a.id == id)
    }

    /// 存放该物料的巷道（库存 > 0）
    pub fn aisles_stocking(&self, item: ItemId) -> &[AisleId] {
        self.item_locations
            .get(&item)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// 需求物料 -> 订单列表
    pub fn orders_by_item(&self) -> &BTreeMap<ItemId, Vec<OrderId>> {
        &self.orders_by_item
    }

    /// 全部巷道中该物料的总库存
    pub fn total_stock(&self, item: ItemId) -> u64 {
        self.aisles_stocking(item)
            .iter()
            .filter_map(|&a| self.aisle(a))
            .map(|a| u64::from(a.stock_of(item)))
            .sum()
    }

    /// 一组订单的波次规模（按实例口径）
    pub fn wave_size<'a, I>(&self, orders: I) -> u64
    where
        I: IntoIterator<Item = &'a OrderId>,
    {
        orders
            .into_iter()
            .filter_map(|&o| self.order(o))
            .map(|o| o.wave_weight(self.bounds.measure))
            .sum()
    }

    /// 一组订单的总件数（密度分子）
    pub fn units_of<'a, I>(&self, orders: I) -> u64
    where
        I: IntoIterator<Item = &'a OrderId>,
    {
        orders
            .into_iter()
            .filter_map(|&o| self.order(o))
            .map(|o| o.total_units())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Instance {
        Instance::new(
            vec![
                Order::from_pairs(0, &[(0, 3), (1, 1)]),
                Order::from_pairs(1, &[(1, 2)]),
            ],
            vec![
                Aisle::from_pairs(0, &[(0, 5)]),
                Aisle::from_pairs(1, &[(1, 2), (0, 0)]),
                Aisle::from_pairs(2, &[(1, 4)]),
            ],
            2,
            WaveBounds::units(1, 10),
        )
    }

    #[test]
    fn test_derived_indexes() {
        let instance = sample();
        assert_eq!(instance.aisles_stocking(0), &[0]);
        assert_eq!(instance.aisles_stocking(1), &[1, 2]);
        assert_eq!(instance.orders_by_item()[&1], vec![0, 1]);
        assert_eq!(instance.total_stock(1), 6);
        assert!(instance.aisles_stocking(7).is_empty());
    }

    #[test]
    fn test_wave_size_by_measure() {
        let instance = sample();
        assert_eq!(instance.wave_size(&[0, 1]), 6);
        assert_eq!(instance.units_of(&[1]), 2);

        let by_count = Instance::new(
            instance.orders().to_vec(),
            instance.aisles().to_vec(),
            2,
            WaveBounds::order_count(1, 2),
        );
        assert_eq!(by_count.wave_size(&[0, 1]), 2);
        assert!(by_count.bounds().contains(2));
        assert!(!by_count.bounds().contains(3));
    }

    #[test]
    fn test_lookup_requires_matching_id() {
        let instance = Instance::new(
            vec![Order::from_pairs(3, &[(0, 1)])],
            vec![],
            1,
            WaveBounds::units(0, 1),
        );
        assert!(instance.order(0).is_none());
        assert!(instance.order(3).is_none());
    }
}
