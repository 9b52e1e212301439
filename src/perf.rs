use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use std::time::Instant;

static PERF_ENABLED: AtomicBool = AtomicBool::new(true);
static PERF_INIT: Once = Once::new();

thread_local! {
    static PERF_DEPTH: Cell<u32> = Cell::new(0);
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 读取性能日志开关（进程内只读取一次）
///
/// 开关：
/// - Debug 默认开启；Release 默认关闭（可通过环境变量开启）
/// - `WAVE_OPT_PERF=1` 强制开启
fn perf_enabled() -> bool {
    PERF_INIT.call_once(|| {
        let enabled = match std::env::var("WAVE_OPT_PERF") {
            Ok(v) => is_true(&v),
            Err(_) => cfg!(debug_assertions),
        };
        PERF_ENABLED.store(enabled, Ordering::Relaxed);
    });
    PERF_ENABLED.load(Ordering::Relaxed)
}

/// 性能统计 Guard：记录 elapsed_ms + 嵌套深度
///
/// 使用方式：
/// ```ignore
/// let _perf = wave_density_optimizer::perf::PerfGuard::new("parse_instance");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    depth: u32,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        let depth = PERF_DEPTH.with(|d| {
            let next = d.get().saturating_add(1);
            d.set(next);
            next
        });
        Self {
            op,
            start: Instant::now(),
            depth,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        if perf_enabled() {
            tracing::info!(
                target: "perf",
                op = self.op,
                elapsed_ms = self.elapsed_ms(),
                depth = self.depth,
                "done"
            );
        }

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
