// ==========================================
// MomentumPolicy 集成测试
// ==========================================
// 测试目标: 验证动量时间预算策略
// 覆盖范围: 奖励触发阈值、比例分配、预算守恒、最小时间片
// ==========================================

use std::time::Duration;
use wave_density_optimizer::config::{BaseAllocation, MomentumConfig};
use wave_density_optimizer::engine::{BudgetDecision, MomentumPolicy, MomentumState};

fn proportional_policy(total_secs: u64) -> MomentumPolicy {
    MomentumPolicy::new(MomentumConfig::default(), Duration::from_secs(total_secs))
}

fn slice_of(decision: BudgetDecision) -> (Duration, bool) {
    match decision {
        BudgetDecision::Dispatch { slice, bonus } => (slice, bonus),
        BudgetDecision::Exhausted => panic!("unexpected exhaustion"),
    }
}

#[test]
fn test_fifteen_percent_improvement_doubles_next_slice() {
    println!("\n=== 测试：比值提升 15% 触发动量奖励 ===");

    let policy = proportional_policy(100);
    let wall = Duration::from_secs(100);

    // 首轮: 100 / 10 = 10s
    let (first, state) = policy.next_budget(wall, MomentumState::default());
    let (first_slice, first_bonus) = slice_of(first);
    assert_eq!(first_slice, Duration::from_secs(10));
    assert!(!first_bonus);

    // 10.0 -> 11.5 (15% > 10%)
    let state = policy.record_improvement(state, 10.0, 11.5);
    let (second, state) = policy.next_budget(Duration::from_secs(90), state);
    let (second_slice, second_bonus) = slice_of(second);
    assert!(second_bonus);
    // 剩余 90s -> 基础 9s,奖励 x2
    assert_eq!(second_slice, Duration::from_secs(18));

    // 奖励只作用一轮
    let (third, _) = policy.next_budget(Duration::from_secs(72), state);
    let (third_slice, third_bonus) = slice_of(third);
    assert!(!third_bonus);
    assert_eq!(third_slice, Duration::from_millis(7200));

    println!("✓ 奖励 {:?} -> {:?}", first_slice, second_slice);
}

#[test]
fn test_small_improvement_does_not_trigger() {
    let policy = proportional_policy(100);
    // 5% < 10%
    let state = policy.record_improvement(MomentumState::default(), 10.0, 10.5);
    assert!(!state.momentum);

    // 恰好等于阈值也不触发
    let state = policy.record_improvement(MomentumState::default(), 10.0, 11.0);
    assert!(!state.momentum);
}

#[test]
fn test_budget_is_conserved_under_permanent_momentum() {
    println!("\n=== 测试：持续奖励下时间片总和不超过全局预算 ===");

    let policy = proportional_policy(60);
    let mut state = MomentumState::default();
    let mut total = Duration::ZERO;
    let mut rounds = 0;

    loop {
        state.momentum = true;
        // 墙钟剩余比预算宽松,只受已分配量约束
        match policy.next_budget(Duration::from_secs(3600), state) {
            (BudgetDecision::Dispatch { slice, .. }, next) => {
                total += slice;
                state = next;
                rounds += 1;
            }
            (BudgetDecision::Exhausted, unchanged) => {
                assert_eq!(unchanged, state);
                break;
            }
        }
        assert!(rounds < 1000, "策略未终止");
    }

    assert!(total <= Duration::from_secs(60));
    assert_eq!(state.allocated, total);
    assert_eq!(state.dispatched, rounds);
    println!("✓ {} 轮共分配 {:?}", rounds, total);
}

#[test]
fn test_wall_clock_caps_the_slice() {
    let config = MomentumConfig {
        base_allocation: BaseAllocation::Fixed,
        fixed_slice_secs: 15.0,
        ..MomentumConfig::default()
    };
    let policy = MomentumPolicy::new(config, Duration::from_secs(600));

    let (decision, _) = policy.next_budget(Duration::from_secs(4), MomentumState::default());
    assert_eq!(slice_of(decision).0, Duration::from_secs(4));

    // 不足最小时间片
    let (decision, _) =
        policy.next_budget(Duration::from_millis(500), MomentumState::default());
    assert_eq!(decision, BudgetDecision::Exhausted);
}
