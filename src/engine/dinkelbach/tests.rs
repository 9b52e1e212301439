use super::*;
use crate::config::SolverConfig;
use crate::domain::{Aisle, Instance, Order, TerminationReason, WaveBounds};
use crate::solver::{GoodLpSolver, LinearProgram, MilpSolver, SolverOutcome, SolverResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ==========================================
// 测试辅助
// ==========================================

/// 首次正常求解,之后一律报告不可行（违反求解器契约）
struct InfeasibleAfterFirst {
    inner: GoodLpSolver,
    calls: AtomicUsize,
}

#[async_trait]
impl MilpSolver for InfeasibleAfterFirst {
    fn name(&self) -> &str {
        "infeasible-after-first"
    }

    async fn solve(
        &self,
        program: Arc<LinearProgram>,
        time_limit: Duration,
    ) -> SolverResult<SolverOutcome> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.inner.solve(program, time_limit).await
        } else {
            Ok(SolverOutcome::infeasible())
        }
    }
}

/// 2 个订单 / 1 个巷道 / 按订单数 [1, 2]；热启动即最优
fn two_orders_one_aisle() -> Instance {
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

/// 热启动失败（R0 = 0）,首轮之后仍需继续迭代
fn warm_start_blocked() -> Instance {
    Instance::new(
        vec![
            Order::from_pairs(0, &[(0, 3)]),
            Order::from_pairs(1, &[(1, 2)]),
            Order::from_pairs(2, &[(2, 4)]),
        ],
        vec![
            Aisle::from_pairs(0, &[(2, 4)]),
            Aisle::from_pairs(1, &[(0, 3), (1, 2)]),
        ],
        3,
        WaveBounds::units(5, 5),
    )
}

// ==========================================
// 测试用例
// ==========================================

#[tokio::test]
async fn test_budget_below_min_slice_dispatches_nothing() {
    let config = SolverConfig {
        total_time_budget_secs: 0.5,
        ..SolverConfig::default()
    };
    // 预算小于最小时间片: 不派发任何子问题
    let controller = DinkelbachController::new(Arc::new(GoodLpSolver::default()), config);
    let outcome = controller.run(&two_orders_one_aisle()).await.unwrap();

    assert_eq!(outcome.reason, TerminationReason::TimeExhausted);
    assert_eq!(outcome.iterations(), 0);
    assert_eq!(outcome.best.unwrap().density, 5.0);
}

#[tokio::test]
async fn test_later_infeasible_stops_with_best_kept() {
    let solver = Arc::new(InfeasibleAfterFirst {
        inner: GoodLpSolver::default(),
        calls: AtomicUsize::new(0),
    });
    let config = SolverConfig {
        total_time_budget_secs: 30.0,
        ..SolverConfig::default()
    };
    let controller = DinkelbachController::new(solver, config);
    let outcome = controller.run(&warm_start_blocked()).await.unwrap();

    assert_eq!(outcome.reason, TerminationReason::Stalled);
    assert_eq!(outcome.iterations(), 2);
    assert!(outcome.best.is_some());
    assert!(!outcome.optimality_proven);
}
