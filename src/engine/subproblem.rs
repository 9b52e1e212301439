// ==========================================
// 仓库波次拣货优化系统 - 子问题构建器
// ==========================================
// 职责: 给定比值 R,构建参数化整数规划
//       max Σ units_o·x_o − R·Σ y_a
// 约束: 波次规模上下限 / 物料覆盖 / 取货-巷道联动
// 红线: (R, Instance) 的纯函数,不修改实例
// ==========================================

use crate::domain::{
    AisleId, CandidateSource, Instance, ItemDraw, ItemId, OrderId, WaveCandidate,
};
use crate::engine::error::ModelBuildError;
use crate::solver::{Assignment, Comparison, LinearExpr, LinearProgram, VarId};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// 二元变量取值判定阈值
const SELECTION_THRESHOLD: f64 = 0.5;

/// 取货量低于该值视为未取货
const DRAW_EPSILON: f64 = 1e-9;

// ==========================================
// 变量布局
// ==========================================
#[derive(Debug, Clone, Default)]
struct SubproblemLayout {
    order_vars: Vec<VarId>,                // 下标 = OrderId
    aisle_vars: Vec<VarId>,                // 下标 = AisleId
    draw_vars: Vec<(ItemId, AisleId, VarId)>,
}

// ==========================================
// WaveSubproblem - 某一 R 下的子问题
// ==========================================
#[derive(Debug, Clone)]
pub struct WaveSubproblem {
    pub ratio: f64,
    pub program: Arc<LinearProgram>,
    layout: SubproblemLayout,
}

impl WaveSubproblem {
    pub fn order_var(&self, order: OrderId) -> Option<VarId> {
        self.layout.order_vars.get(order).copied()
    }

    pub fn aisle_var(&self, aisle: AisleId) -> Option<VarId> {
        self.layout.aisle_vars.get(aisle).copied()
    }

    /// 把求解器赋值解码为候选波次
    pub fn decode(
        &self,
        assignment: &Assignment,
        instance: &Instance,
        source: CandidateSource,
    ) -> WaveCandidate {
        let orders: BTreeSet<OrderId> = self
            .layout
            .order_vars
            .iter()
            .enumerate()
            .filter(|(_, &var)| assignment.value(var) > SELECTION_THRESHOLD)
            .map(|(o, _)| o)
            .collect();

        let aisles: BTreeSet<AisleId> = self
            .layout
            .aisle_vars
            .iter()
            .enumerate()
            .filter(|(_, &var)| assignment.value(var) > SELECTION_THRESHOLD)
            .map(|(a, _)| a)
            .collect();

        let draws = self
            .layout
            .draw_vars
            .iter()
            .filter_map(|&(item, aisle, var)| {
                let quantity = assignment.value(var);
                (quantity > DRAW_EPSILON && aisles.contains(&aisle)).then_some(ItemDraw {
                    item,
                    aisle,
                    quantity,
                })
            })
            .collect();

        WaveCandidate::new(instance, orders, aisles, draws, source)
    }
}

// ==========================================
// SubproblemBuilder - 子问题构建器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct SubproblemBuilder;

impl SubproblemBuilder {
    pub fn new() -> Self {
        Self
    }

    /// 校验实例能否建模（与 R 无关,迭代前执行一次）
    ///
    /// # 返回
    /// - Err(UnstockedItem): 订单需求的物料无任何库存,不静默丢弃
    pub fn validate(&self, instance: &Instance) -> Result<(), ModelBuildError> {
        if instance.orders().is_empty() {
            return Err(ModelBuildError::EmptyInstance("没有订单".to_string()));
        }
        if instance.aisles().is_empty() {
            return Err(ModelBuildError::EmptyInstance("没有巷道".to_string()));
        }

        let bounds = instance.bounds();
        if bounds.min > bounds.max {
            return Err(ModelBuildError::InvertedBounds {
                min: bounds.min,
                max: bounds.max,
            });
        }

        for (position, order) in instance.orders().iter().enumerate() {
            if order.id != position {
                return Err(ModelBuildError::NonContiguousIds {
                    kind: "订单",
                    position,
                    id: order.id,
                });
            }
        }
        for (position, aisle) in instance.aisles().iter().enumerate() {
            if aisle.id != position {
                return Err(ModelBuildError::NonContiguousIds {
                    kind: "巷道",
                    position,
                    id: aisle.id,
                });
            }
            if let Some(&item) = aisle.stock.keys().find(|&&i| i >= instance.num_items()) {
                return Err(ModelBuildError::ItemOutOfCatalog {
                    item,
                    num_items: instance.num_items(),
                });
            }
        }

        for order in instance.orders() {
            for (&item, &qty) in &order.items {
                if item >= instance.num_items() {
                    return Err(ModelBuildError::ItemOutOfCatalog {
                        item,
                        num_items: instance.num_items(),
                    });
                }
                if qty == 0 {
                    return Err(ModelBuildError::ZeroQuantity {
                        order: order.id,
                        item,
                    });
                }
                if instance.aisles_stocking(item).is_empty() {
                    return Err(ModelBuildError::UnstockedItem {
                        order: order.id,
                        item,
                    });
                }
            }
        }

        Ok(())
    }

    /// 构建 R 下的子问题
    pub fn build(&self, ratio: f64, instance: &Instance) -> Result<WaveSubproblem, ModelBuildError> {
        self.build_with_hint(ratio, instance, None)
    }

    /// 构建子问题,并以当前最优候选作为 MIP 初始解提示
    pub fn build_with_hint(
        &self,
        ratio: f64,
        instance: &Instance,
        hint: Option<&WaveCandidate>,
    ) -> Result<WaveSubproblem, ModelBuildError> {
        self.validate(instance)?;
        self.build_validated(ratio, instance, hint)
    }

    /// 构建子问题,跳过实例校验
    ///
    /// 调用方须已对同一实例执行过 validate；迭代循环内每轮调用,不重复扫描实例
    pub(crate) fn build_validated(
        &self,
        ratio: f64,
        instance: &Instance,
        hint: Option<&WaveCandidate>,
    ) -> Result<WaveSubproblem, ModelBuildError> {
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(ModelBuildError::InvalidRatio(ratio));
        }

        let bounds = instance.bounds();
        let mut program = LinearProgram::new(format!("wave_subproblem_r{:.6}", ratio));
        let mut layout = SubproblemLayout::default();
        let mut draws_by_item: BTreeMap<ItemId, Vec<VarId>> = BTreeMap::new();

        // ===== 变量 =====
        for order in instance.orders() {
            layout.order_vars.push(program.add_binary(format!("x_{}", order.id)));
        }
        for aisle in instance.aisles() {
            layout.aisle_vars.push(program.add_binary(format!("y_{}", aisle.id)));
        }
        for &item in instance.orders_by_item().keys() {
            for &aisle_id in instance.aisles_stocking(item) {
                let stock = instance
                    .aisle(aisle_id)
                    .map(|a| f64::from(a.stock_of(item)))
                    .unwrap_or(0.0);
                let var = program.add_continuous(format!("d_{}_{}", item, aisle_id), 0.0, stock);
                layout.draw_vars.push((item, aisle_id, var));
                draws_by_item.entry(item).or_default().push(var);
            }
        }

        // ===== 目标 =====
        let mut objective = LinearExpr::new();
        for order in instance.orders() {
            objective.add_term(layout.order_vars[order.id], order.total_units() as f64);
        }
        for &var in &layout.aisle_vars {
            objective.add_term(var, -ratio);
        }
        program.set_objective(objective);

        // ===== 波次规模 =====
        let mut wave = LinearExpr::new();
        for order in instance.orders() {
            wave.add_term(
                layout.order_vars[order.id],
                order.wave_weight(bounds.measure) as f64,
            );
        }
        program.add_constraint("wave_min", wave.clone(), Comparison::GreaterEq, bounds.min as f64);
        program.add_constraint("wave_max", wave, Comparison::LessEq, bounds.max as f64);

        // ===== 覆盖: Σ_a d_{i,a} − Σ_o q_{o,i}·x_o ≥ 0 =====
        for (&item, order_ids) in instance.orders_by_item() {
            let mut cover = LinearExpr::new();
            for &var in draws_by_item.get(&item).into_iter().flatten() {
                cover.add_term(var, 1.0);
            }
            for &order_id in order_ids {
                let qty = instance
                    .order(order_id)
                    .and_then(|o| o.items.get(&item).copied())
                    .unwrap_or(0);
                cover.add_term(layout.order_vars[order_id], -f64::from(qty));
            }
            program.add_constraint(format!("cover_{}", item), cover, Comparison::GreaterEq, 0.0);
        }

        // ===== 联动: d_{i,a} − stock·y_a ≤ 0 =====
        for &(item, aisle_id, var) in &layout.draw_vars {
            let stock = instance
                .aisle(aisle_id)
                .map(|a| f64::from(a.stock_of(item)))
                .unwrap_or(0.0);
            let link = LinearExpr::new()
                .with_term(var, 1.0)
                .with_term(layout.aisle_vars[aisle_id], -stock);
            program.add_constraint(
                format!("link_{}_{}", item, aisle_id),
                link,
                Comparison::LessEq,
                0.0,
            );
        }

        if let Some(best) = hint {
            for (order_id, &var) in layout.order_vars.iter().enumerate() {
                let v = if best.orders.contains(&order_id) { 1.0 } else { 0.0 };
                program.set_start_value(var, v);
            }
            for (aisle_id, &var) in layout.aisle_vars.iter().enumerate() {
                let v = if best.aisles.contains(&aisle_id) { 1.0 } else { 0.0 };
                program.set_start_value(var, v);
            }
        }

        debug!(
            ratio,
            variables = program.variables().len(),
            constraints = program.constraints().len(),
            hinted = hint.is_some(),
            "子问题构建完成"
        );

        Ok(WaveSubproblem {
            ratio,
            program: Arc::new(program),
            layout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Aisle, Order, WaveBounds};

    fn two_order_instance() -> Instance {
        Instance::new(
            vec![
                Order::from_pairs(0, &[(0, 2)]),
                Order::from_pairs(1, &[(0, 3)]),
            ],
            vec![Aisle::from_pairs(0, &[(0, 5)])],
            1,
            WaveBounds::order_count(1, 2),
        )
    }

    #[test]
    fn test_model_shape() {
        let instance = two_order_instance();
        let sub = SubproblemBuilder::new().build(2.5, &instance).unwrap();

        // 2 x + 1 y + 1 d
        assert_eq!(sub.program.variables().len(), 4);
        // wave_min + wave_max + cover_0 + link_0_0
        assert_eq!(sub.program.constraints().len(), 4);
        assert!(sub.program.variable_by_name("d_0_0").is_some());
        assert!(sub.program.start_values().is_empty());
    }

    #[test]
    fn test_full_selection_is_feasible_and_decodes() {
        let instance = two_order_instance();
        let sub = SubproblemBuilder::new().build(5.0, &instance).unwrap();
        let lp = &sub.program;

        let mut a = Assignment::zeros(lp);
        a.set(lp.variable_by_name("x_0").unwrap(), 1.0);
        a.set(lp.variable_by_name("x_1").unwrap(), 1.0);
        a.set(lp.variable_by_name("y_0").unwrap(), 1.0);
        a.set(lp.variable_by_name("d_0_0").unwrap(), 5.0);

        assert!(lp.is_feasible(&a, 1e-9));
        assert!(lp.objective_value(&a).abs() < 1e-9);

        let candidate = sub.decode(&a, &instance, CandidateSource::Iteration(0));
        assert_eq!(candidate.orders.len(), 2);
        assert_eq!(candidate.total_units, 5);
        assert_eq!(candidate.density, 5.0);
        assert_eq!(candidate.draws.len(), 1);
    }

    #[test]
    fn test_hint_sets_start_values() {
        let instance = two_order_instance();
        let hint = WaveCandidate::new(
            &instance,
            [1].into_iter().collect(),
            [0].into_iter().collect(),
            vec![],
            CandidateSource::WarmStart,
        );
        let sub = SubproblemBuilder::new()
            .build_with_hint(1.0, &instance, Some(&hint))
            .unwrap();
        let starts = sub.program.start_values();
        assert_eq!(starts.len(), 3);
        let x0 = sub.order_var(0).unwrap();
        let x1 = sub.order_var(1).unwrap();
        assert!(starts.contains(&(x0, 0.0)));
        assert!(starts.contains(&(x1, 1.0)));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let instance = two_order_instance();
        let builder = SubproblemBuilder::new();
        assert_eq!(
            builder.build(-1.0, &instance).unwrap_err(),
            ModelBuildError::InvalidRatio(-1.0)
        );
        assert!(matches!(
            builder.build(f64::NAN, &instance),
            Err(ModelBuildError::InvalidRatio(_))
        ));

        let inverted = Instance::new(
            instance.orders().to_vec(),
            instance.aisles().to_vec(),
            1,
            WaveBounds::units(5, 2),
        );
        assert_eq!(
            builder.validate(&inverted).unwrap_err(),
            ModelBuildError::InvertedBounds { min: 5, max: 2 }
        );
    }

    #[test]
    fn test_cover_rows_scale_with_many_items() {
        // 20000 种物料,每种 1 个订单、2 个巷道
        let n = 20_000;
        let orders: Vec<Order> = (0..n).map(|i| Order::from_pairs(i, &[(i, 1)])).collect();
        let evens: Vec<(ItemId, u32)> = (0..n).map(|i| (i, 2)).collect();
        let odds: Vec<(ItemId, u32)> = (0..n).map(|i| (i, 3)).collect();
        let instance = Instance::new(
            orders,
            vec![Aisle::from_pairs(0, &evens), Aisle::from_pairs(1, &odds)],
            n,
            WaveBounds::order_count(1, n as u64),
        );

        let builder = SubproblemBuilder::new();
        builder.validate(&instance).unwrap();
        let started = std::time::Instant::now();
        let sub = builder.build_validated(1.0, &instance, None).unwrap();
        let elapsed = started.elapsed();

        let covers: Vec<_> = sub
            .program
            .constraints()
            .iter()
            .filter(|c| c.name.starts_with("cover_"))
            .collect();
        assert_eq!(covers.len(), n);
        // 2 个取货变量 + 1 个订单变量
        assert!(covers.iter().all(|c| c.expr.terms.len() == 3));
        assert!(elapsed < std::time::Duration::from_secs(5), "{:?}", elapsed);
    }

    #[test]
    fn test_validated_build_matches_checked_build() {
        let instance = two_order_instance();
        let builder = SubproblemBuilder::new();
        let checked = builder.build(2.0, &instance).unwrap();
        let direct = builder.build_validated(2.0, &instance, None).unwrap();
        assert_eq!(checked.program.constraints().len(), direct.program.constraints().len());
        assert_eq!(
            builder.build_validated(-0.5, &instance, None).unwrap_err(),
            ModelBuildError::InvalidRatio(-0.5)
        );
    }
}
