// ==========================================
// 仓库波次拣货优化系统 - Dinkelbach 控制器
// ==========================================
// 状态: Initializing -> Iterating -> Converged | TimeExhausted | Infeasible
//       另有 Stalled（密度不再提升）与 IterationLimit（达到最大轮数）
// 输入: 实例 + 求解配置 + 求解器
// 输出: 最优候选 + 终止原因 + 迭代记录
// ==========================================

use crate::config::SolverConfig;
use crate::domain::{
    CandidateSource, Instance, IterationRecord, TerminationReason, WaveCandidate,
};
use crate::engine::error::{WaveError, WaveResult};
use crate::engine::momentum::{BudgetDecision, MomentumPolicy, MomentumState};
use crate::engine::subproblem::SubproblemBuilder;
use crate::engine::warm_start::WarmStartHeuristic;
use crate::solver::{MilpSolver, SolverStatus};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn, Span};
use uuid::Uuid;

use super::types::DinkelbachOutcome;

// ==========================================
// DinkelbachController - 分式规划控制器
// ==========================================
pub struct DinkelbachController {
    solver: Arc<dyn MilpSolver>,
    config: SolverConfig,
    builder: SubproblemBuilder,
    warm_start: WarmStartHeuristic,
}

impl DinkelbachController {
    /// 创建控制器
    ///
    /// # 参数
    /// - solver: MILP 求解器（任何满足 MilpSolver 契约的后端）
    /// - config: 已校验的求解配置
    pub fn new(solver: Arc<dyn MilpSolver>, config: SolverConfig) -> Self {
        Self {
            solver,
            config,
            builder: SubproblemBuilder::new(),
            warm_start: WarmStartHeuristic::new(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// 执行 Dinkelbach 迭代
    ///
    /// # 返回
    /// - Ok(DinkelbachOutcome): 正常终止（可能没有任何可行候选,由提取器处理）；
    ///   首轮子问题不可行时终止原因为 Infeasible,不重试
    /// - Err(ModelBuild): 实例无法建模
    /// - Err(Solver): 求解后端故障
    #[instrument(skip(self, instance), fields(
        run_id = tracing::field::Empty,
        orders = instance.orders().len(),
        aisles = instance.aisles().len(),
        solver = %self.solver.name()
    ))]
    pub async fn run(&self, instance: &Instance) -> WaveResult<DinkelbachOutcome> {
        let run_id = Uuid::new_v4();
        Span::current().record("run_id", tracing::field::display(run_id));
        let started = Instant::now();

        // ===== Initializing =====
        self.builder.validate(instance)?;

        let warm = self.warm_start.run(instance);
        let warm_start_ratio = warm.ratio;
        let mut best: Option<WaveCandidate> = warm.candidate;
        let mut ratio = warm.ratio;
        let mut ratio_history = vec![ratio];
        let mut records: Vec<IterationRecord> = Vec::new();

        let total_budget = self.config.total_time_budget();
        let epsilon = self.config.convergence_tolerance;
        let policy = MomentumPolicy::new(self.config.momentum.clone(), total_budget);
        let mut momentum = MomentumState::default();
        let mut optimality_proven = false;
        let mut iteration = 0usize;

        info!(
            ratio,
            budget_secs = policy.total_budget().as_secs_f64(),
            "开始 Dinkelbach 迭代"
        );

        // ===== Iterating =====
        let reason = loop {
            if iteration >= self.config.max_iterations {
                break TerminationReason::IterationLimit;
            }

            let remaining_wall = total_budget.saturating_sub(started.elapsed());
            let (decision, next_state) = policy.next_budget(remaining_wall, momentum);
            let (slice, bonus) = match decision {
                BudgetDecision::Dispatch { slice, bonus } => (slice, bonus),
                BudgetDecision::Exhausted => break TerminationReason::TimeExhausted,
            };
            momentum = next_state;

            let subproblem = self
                .builder
                .build_validated(ratio, instance, best.as_ref())?;

            let started_at = Utc::now();
            let iteration_start = Instant::now();
            let outcome = self
                .solver
                .solve(Arc::clone(&subproblem.program), slice)
                .await?;

            let mut record = IterationRecord {
                iteration,
                ratio,
                time_limit_ms: slice.as_millis() as u64,
                status: outcome.status,
                objective: outcome.objective_value,
                realized_density: None,
                elapsed_ms: iteration_start.elapsed().as_millis() as u64,
                momentum: bonus,
                started_at,
            };

            match outcome.status {
                SolverStatus::Infeasible => {
                    records.push(record);
                    if iteration == 0 {
                        warn!(ratio, "首轮子问题不可行,实例不存在可行波次");
                        break TerminationReason::Infeasible;
                    }
                    // 后续轮次只改变 R,约束集合不变: 不可行说明求解器违约
                    warn!(iteration, ratio, "后续轮次报告不可行,保留当前最优解停止迭代");
                    break TerminationReason::Stalled;
                }
                SolverStatus::NoSolution => {
                    records.push(record);
                    warn!(
                        iteration,
                        time_limit_ms = slice.as_millis() as u64,
                        "时间片内无可行解,回退到当前最优解"
                    );
                    break TerminationReason::TimeExhausted;
                }
                SolverStatus::Optimal | SolverStatus::FeasibleTimeLimited => {}
            }

            let assignment = outcome.assignment.ok_or_else(|| {
                WaveError::InternalInvariantViolation(format!(
                    "第 {} 轮求解器报告 {} 但未返回赋值",
                    iteration, outcome.status
                ))
            })?;
            let objective = outcome
                .objective_value
                .unwrap_or_else(|| subproblem.program.objective_value(&assignment));
            let candidate =
                subproblem.decode(&assignment, instance, CandidateSource::Iteration(iteration));
            let new_ratio = candidate.density;

            record.objective = Some(objective);
            record.realized_density = Some(new_ratio);
            records.push(record);

            debug!(
                iteration,
                ratio,
                objective,
                new_ratio,
                status = %outcome.status,
                orders = candidate.orders.len(),
                aisles = candidate.aisles.len(),
                "迭代完成"
            );

            let improves = best
                .as_ref()
                .map_or(true, |b| candidate.density > b.density);
            if improves {
                best = Some(candidate);
            }
            iteration += 1;

            if objective.abs() <= epsilon {
                optimality_proven = outcome.status == SolverStatus::Optimal;
                break TerminationReason::Converged;
            }

            if started.elapsed() >= total_budget {
                break TerminationReason::TimeExhausted;
            }

            if new_ratio <= ratio + epsilon {
                warn!(iteration, ratio, new_ratio, "密度未提升,停止迭代");
                break TerminationReason::Stalled;
            }

            momentum = policy.record_improvement(momentum, ratio, new_ratio);
            ratio = new_ratio;
            ratio_history.push(ratio);
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            reason = %reason,
            iterations = records.len(),
            final_ratio = ratio,
            best_density = ?best.as_ref().map(|b| b.density),
            optimality_proven,
            elapsed_ms,
            "Dinkelbach 迭代结束"
        );

        Ok(DinkelbachOutcome {
            run_id,
            best,
            reason,
            optimality_proven,
            records,
            ratio_history,
            warm_start_ratio,
            elapsed_ms,
        })
    }
}
