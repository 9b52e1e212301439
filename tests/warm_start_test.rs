// ==========================================
// WarmStartHeuristic 集成测试
// ==========================================
// 测试目标: 验证贪心热启动结果的可行性与 R0
// 覆盖范围: 随机实例、下限不可达、上限裁剪、库存竞争
// ==========================================


use wave_density_optimizer::domain::{realized_density, WaveBounds};
use wave_density_optimizer::engine::{SolutionExtractor, WarmStartHeuristic};
use test_helpers::{build_instance, generated_instance, greedy_blocking_instance};

#[test]
fn test_warm_start_candidates_are_feasible() {
    println!("\n=== 测试：热启动候选在随机实例上均可行 ===");

    let heuristic = WarmStartHeuristic::new();
    let extractor = SolutionExtractor::new();

    for seed in 0..20 {
        let instance = generated_instance(seed, 12, 8, 5);
        let result = heuristic.run(&instance);

        let candidate = result
            .candidate
            .unwrap_or_else(|| panic!("seed {} 未得到候选", seed));
        assert!(
            extractor.verify(&instance, &candidate).is_ok(),
            "seed {}: {:?}",
            seed,
            extractor.verify(&instance, &candidate)
        );
        // R0 必须可实现
        assert_eq!(
            result.ratio,
            realized_density(candidate.total_units, candidate.aisles.len())
        );
        assert!(instance.bounds().contains(instance.wave_size(&candidate.orders)));
    }

    println!("✓ 20 个随机实例全部通过");
}

#[test]
fn test_warm_start_below_minimum_starts_from_zero() {
    println!("\n=== 测试：贪心无法达到下限时 R0 = 0 ===");

    let result = WarmStartHeuristic::new().run(&greedy_blocking_instance());
    assert!(result.candidate.is_none());
    assert_eq!(result.ratio, 0.0);
}

#[test]
fn test_warm_start_skips_orders_over_maximum() {
    // 订单 0 单独就超过上限
    let instance = build_instance(
        &[&[(0, 9)], &[(0, 2)], &[(1, 1)]],
        &[&[(0, 20)], &[(1, 1)]],
        2,
        WaveBounds::units(1, 4),
    );

    let candidate = WarmStartHeuristic::new().run(&instance).candidate.unwrap();
    assert!(!candidate.orders.contains(&0));
    assert!(candidate.total_units <= 4);
}

#[test]
fn test_warm_start_prefers_orders_served_by_opened_aisles() {
    // 订单 0 打开巷道 0 后,订单 1 无需新开巷道；订单 2 需要新巷道
    let instance = build_instance(
        &[&[(0, 4)], &[(1, 1)], &[(2, 2)]],
        &[&[(0, 4), (1, 1)], &[(2, 2)]],
        3,
        WaveBounds::units(1, 5),
    );

    let result = WarmStartHeuristic::new().run(&instance);
    let candidate = result.candidate.unwrap();
    assert_eq!(candidate.orders.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(candidate.aisles.len(), 1);
    assert_eq!(result.ratio, 5.0);
}
