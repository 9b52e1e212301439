// ==========================================
// 仓库波次拣货优化系统 - good_lp 求解后端
// ==========================================
// 职责: 把 LinearProgram 翻译为 good_lp 模型并求解
// 后端: microlp（纯 Rust 分支定界,无外部依赖,无内置时间上限）
// 线程: 每个适配器只有一个常驻工作线程,同一时刻最多一个求解在跑
// 红线: 超过 上限 + 宽限期 即放弃等待并返回 NoSolution；
//       被放弃的求解仍占用工作线程,完成前拒绝新的派发
// ==========================================

use crate::solver::adapter::{MilpSolver, SolverOutcome};
use crate::solver::error::{SolverError, SolverResult};
use crate::solver::model::{Assignment, Comparison, LinearExpr, LinearProgram, VarKind};
use async_trait::async_trait;
use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, warn};

const BACKEND_NAME: &str = "good_lp/microlp";

/// 等待工作线程空闲时的轮询间隔
const BUSY_POLL_INTERVAL: Duration = Duration::from_millis(10);

// ==========================================
// 常驻工作线程
// ==========================================

struct SolveJob {
    program: Arc<LinearProgram>,
    reply: oneshot::Sender<SolverResult<SolverOutcome>>,
}

/// 单槽工作线程: busy 由派发方置位,由工作线程在求解结束后清除
#[derive(Debug, Default)]
struct WorkerSlot {
    sender: Mutex<Option<Sender<SolveJob>>>,
    busy: Arc<AtomicBool>,
}

impl WorkerSlot {
    fn try_acquire(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    fn release(&self) {
        self.busy.store(false, Ordering::Release);
    }

    /// 投递任务；线程不存在或已退出时重新创建
    fn dispatch(&self, job: SolveJob) -> SolverResult<()> {
        let mut sender = self
            .sender
            .lock()
            .map_err(|e| SolverError::WorkerLost(e.to_string()))?;

        let job = match sender.as_ref() {
            Some(tx) => match tx.send(job) {
                Ok(()) => return Ok(()),
                Err(returned) => {
                    warn!("求解工作线程已退出,重新创建");
                    returned.0
                }
            },
            None => job,
        };

        let tx = spawn_worker(Arc::clone(&self.busy))?;
        tx.send(job)
            .map_err(|_| SolverError::WorkerLost("新建工作线程拒收任务".to_string()))?;
        *sender = Some(tx);
        Ok(())
    }
}

fn spawn_worker(busy: Arc<AtomicBool>) -> SolverResult<Sender<SolveJob>> {
    let (tx, rx): (Sender<SolveJob>, Receiver<SolveJob>) = channel();
    std::thread::Builder::new()
        .name("milp-worker".into())
        .spawn(move || worker_loop(rx, busy))
        .map_err(|e| SolverError::WorkerLost(e.to_string()))?;
    Ok(tx)
}

/// 适配器被释放（发送端全部关闭）时退出
fn worker_loop(rx: Receiver<SolveJob>, busy: Arc<AtomicBool>) {
    while let Ok(job) = rx.recv() {
        let result = catch_unwind(AssertUnwindSafe(|| solve_blocking(&job.program)))
            .unwrap_or_else(|_| Err(SolverError::WorkerLost("求解线程 panic".to_string())));
        busy.store(false, Ordering::Release);
        // 接收端可能已超时放弃
        let _ = job.reply.send(result);
    }
}

/// 截止时刻；超出 Instant 表示范围时取一个足够远的时刻
fn deadline_after(wait: Duration) -> tokio::time::Instant {
    let now = tokio::time::Instant::now();
    now.checked_add(wait)
        .unwrap_or_else(|| now + Duration::from_secs(86_400 * 365))
}

// ==========================================
// GoodLpSolver - good_lp 适配器
// ==========================================
#[derive(Debug, Clone)]
pub struct GoodLpSolver {
    grace_period: Duration,
    slot: Arc<WorkerSlot>,
}

impl GoodLpSolver {
    /// 创建适配器（工作线程在首次求解时创建）
    ///
    /// # 参数
    /// - grace_period: 时间片之外允许的额外等待
    pub fn new(grace_period: Duration) -> Self {
        Self {
            grace_period,
            slot: Arc::new(WorkerSlot::default()),
        }
    }

    /// 工作线程当前是否空闲（被放弃的求解完成前为 false）
    pub fn is_free(&self) -> bool {
        !self.slot.busy.load(Ordering::Relaxed)
    }
}

impl Default for GoodLpSolver {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl MilpSolver for GoodLpSolver {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    async fn solve(
        &self,
        program: Arc<LinearProgram>,
        time_limit: Duration,
    ) -> SolverResult<SolverOutcome> {
        let deadline = deadline_after(time_limit.saturating_add(self.grace_period));

        // 1. 等待上一个（可能已被放弃的）求解让出工作线程
        let mut waited = false;
        while !self.slot.try_acquire() {
            if tokio::time::Instant::now() >= deadline {
                warn!(
                    model = %program.name,
                    time_limit_ms = time_limit.as_millis() as u64,
                    "工作线程仍被上一个求解占用,拒绝派发"
                );
                return Ok(SolverOutcome::no_solution());
            }
            waited = true;
            tokio::time::sleep(BUSY_POLL_INTERVAL).await;
        }
        if waited {
            debug!(model = %program.name, "工作线程空闲,开始派发");
        }

        // 2. 派发
        let (reply, rx) = oneshot::channel();
        let job = SolveJob {
            program: Arc::clone(&program),
            reply,
        };
        if let Err(e) = self.slot.dispatch(job) {
            self.slot.release();
            return Err(e);
        }

        // 3. 等待结果,超时即放弃（工作线程保持占用直到求解结束）
        match tokio::time::timeout_at(deadline, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => {
                self.slot.release();
                Err(SolverError::WorkerLost(
                    "求解线程未返回结果即退出".to_string(),
                ))
            }
            Err(_) => {
                warn!(
                    model = %program.name,
                    time_limit_ms = time_limit.as_millis() as u64,
                    "子问题超出时间片仍无结果,放弃等待"
                );
                Ok(SolverOutcome::no_solution())
            }
        }
    }
}

// ==========================================
// 模型翻译与同步求解
// ==========================================

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant);
    for &(var, coef) in &expr.terms {
        out += coef * handles[var.0];
    }
    out
}

fn solve_blocking(program: &LinearProgram) -> SolverResult<SolverOutcome> {
    let start = Instant::now();

    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = program
        .variables()
        .iter()
        .map(|v| {
            let def = match v.kind {
                VarKind::Binary => variable().binary(),
                VarKind::Continuous { lower, upper } => variable().min(lower).max(upper),
            };
            vars.add(def.name(v.name.clone()))
        })
        .collect();

    if !program.start_values().is_empty() {
        debug!(
            hints = program.start_values().len(),
            "microlp 不支持初始解,忽略 MIP 启动提示"
        );
    }

    let objective = to_expression(program.objective(), &handles);
    let mut model = vars.maximise(objective).using(default_solver);
    for c in program.constraints() {
        let lhs = to_expression(&c.expr, &handles);
        let row = match c.cmp {
            Comparison::LessEq => constraint::leq(lhs, c.rhs),
            Comparison::GreaterEq => constraint::geq(lhs, c.rhs),
            Comparison::Equal => constraint::eq(lhs, c.rhs),
        };
        model = model.with(row);
    }

    let outcome = match model.solve() {
        Ok(solution) => {
            let values = handles.iter().map(|&h| solution.value(h)).collect();
            let assignment = Assignment::new(values);
            let objective_value = program.objective_value(&assignment);
            Ok(SolverOutcome::optimal(objective_value, assignment))
        }
        Err(ResolutionError::Infeasible) => Ok(SolverOutcome::infeasible()),
        Err(ResolutionError::Unbounded) => Err(SolverError::Unbounded(program.name.clone())),
        Err(other) => Err(SolverError::Backend {
            backend: BACKEND_NAME.to_string(),
            message: other.to_string(),
        }),
    };

    debug!(
        model = %program.name,
        variables = program.variables().len(),
        constraints = program.constraints().len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "microlp 求解结束"
    );

    outcome
}
