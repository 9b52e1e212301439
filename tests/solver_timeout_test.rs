// ==========================================
// GoodLpSolver 超时集成测试
// ==========================================
// 测试目标: 验证时间片上限、单工作线程占用与整体运行时长
// 覆盖范围: 超时返回 NoSolution、占用期间拒绝派发、预算 + 宽限期
// 说明: 求解线程在进程退出前可能一直占用一个 CPU,故单独成文件
// ==========================================


use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use test_helpers::two_orders_one_aisle;
use wave_density_optimizer::config::SolverConfig;
use wave_density_optimizer::domain::TerminationReason;
use wave_density_optimizer::engine::DinkelbachController;
use wave_density_optimizer::solver::{
    Comparison, GoodLpSolver, LinearExpr, LinearProgram, MilpSolver, SolverOutcome,
    SolverResult, SolverStatus,
};

/// 奇偶不可行: Σ 2·x_i = n + 1（n 取偶数）
///
/// 线性松弛始终可行,分支定界需要枚举指数级节点才能证明不可行
fn parity_program(n: usize) -> LinearProgram {
    let mut lp = LinearProgram::new("parity");
    let vars: Vec<_> = (0..n).map(|i| lp.add_binary(format!("x_{}", i))).collect();

    let mut objective = LinearExpr::new();
    let mut row = LinearExpr::new();
    for (i, &v) in vars.iter().enumerate() {
        objective.add_term(v, (i % 7 + 1) as f64);
        row.add_term(v, 2.0);
    }
    lp.set_objective(objective);
    lp.add_constraint("parity", row, Comparison::Equal, (n + 1) as f64);
    lp
}

fn small_program() -> LinearProgram {
    let mut lp = LinearProgram::new("small");
    let x = lp.add_binary("x");
    lp.set_objective(LinearExpr::new().with_term(x, 1.0));
    lp
}

#[tokio::test]
async fn test_time_limit_and_single_worker() {
    println!("\n=== 测试：超时返回 NoSolution 且不并发派发 ===");

    let grace = Duration::from_millis(100);
    let limit = Duration::from_millis(200);
    let solver = GoodLpSolver::new(grace);

    let started = Instant::now();
    let outcome = solver
        .solve(Arc::new(parity_program(40)), limit)
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(outcome.status, SolverStatus::NoSolution);
    assert!(outcome.assignment.is_none());
    // 调度误差留 200ms
    assert!(elapsed <= limit + grace + Duration::from_millis(200), "{:?}", elapsed);
    println!("✓ {:?} 后放弃等待", elapsed);

    // 被放弃的求解仍占用工作线程: 新任务等到截止时刻后被拒绝
    assert!(!solver.is_free());
    let started = Instant::now();
    let outcome = solver
        .solve(Arc::new(small_program()), limit)
        .await
        .unwrap();
    assert_eq!(outcome.status, SolverStatus::NoSolution);
    assert!(started.elapsed() <= limit + grace + Duration::from_millis(200));
    println!("✓ 工作线程占用期间拒绝派发");
}

/// 无论控制器给出什么子问题,都交给后端一个求解不完的模型
struct StuckBackend {
    inner: GoodLpSolver,
}

#[async_trait]
impl MilpSolver for StuckBackend {
    fn name(&self) -> &str {
        "stuck"
    }

    async fn solve(
        &self,
        _program: Arc<LinearProgram>,
        time_limit: Duration,
    ) -> SolverResult<SolverOutcome> {
        self.inner
            .solve(Arc::new(parity_program(40)), time_limit)
            .await
    }
}

#[tokio::test]
async fn test_run_finishes_within_budget_plus_grace() {
    println!("\n=== 测试：整体运行时长不超过 预算 + 宽限期 ===");

    let grace = Duration::from_millis(500);
    let config = SolverConfig {
        total_time_budget_secs: 3.0,
        ..SolverConfig::default()
    };
    let controller = DinkelbachController::new(
        Arc::new(StuckBackend {
            inner: GoodLpSolver::new(grace),
        }),
        config,
    );

    let started = Instant::now();
    let outcome = controller.run(&two_orders_one_aisle()).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(outcome.reason, TerminationReason::TimeExhausted);
    // 热启动解保留
    assert!(outcome.best.is_some());
    assert!(
        elapsed <= Duration::from_secs(3) + grace + Duration::from_millis(200),
        "{:?}",
        elapsed
    );
    println!("✓ {:?} 内结束", elapsed);
}
