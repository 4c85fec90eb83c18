//! Property tests over generated scenarios

use coverage_engine::{
    evaluate_point, CoverageEngine, EngineConfig, ExponentPolicy, SimulationParameters,
};
use fuzz_harness::prelude::*;

proptest! {
    #![proptest_config(fuzz_config())]

    #[test]
    fn fuzz_chunking_does_not_change_result(
        (area, towers) in scenario(5),
        resolution in grid_resolution(),
        chunk_size in 1usize..40,
        env in environment(),
    ) {
        let params = SimulationParameters::for_environment(env);

        let reference = CoverageEngine::new(EngineConfig::sequential())
            .run(&area, &towers, &params, resolution, None)
            .unwrap();
        let chunked = CoverageEngine::new(EngineConfig::default().with_chunk_size(chunk_size))
            .run(&area, &towers, &params, resolution, None)
            .unwrap();

        prop_assert_eq!(reference, chunked);
    }

    #[test]
    fn fuzz_statistics_stay_in_range(
        (area, towers) in scenario(4),
        resolution in grid_resolution(),
        sensitivity in receiver_sensitivity_dbm(),
    ) {
        let params = SimulationParameters::default().with_receiver_sensitivity(sensitivity);
        let result = CoverageEngine::default()
            .run(&area, &towers, &params, resolution, None)
            .unwrap();
        let stats = &result.statistics;
        let side = resolution as usize + 1;

        prop_assert_eq!(result.points.len(), side * side);
        for pct in [stats.overall_coverage, stats.strong_coverage, stats.weak_coverage, stats.no_coverage] {
            prop_assert!((0.0..=100.0).contains(&pct));
        }
        prop_assert!((stats.overall_coverage + stats.no_coverage - 100.0).abs() < 1e-9);
        prop_assert!(stats.strong_coverage + stats.weak_coverage <= stats.overall_coverage + 1e-9);
        prop_assert!(stats.coverage_area <= area.rectangle_area_km2() + 1e-9);
        prop_assert_eq!(stats.average_signal_strength.is_none(), towers.is_empty());
    }

    #[test]
    fn fuzz_points_match_single_point_evaluation(
        (area, towers) in scenario(4),
        resolution in 1u32..=4,
    ) {
        let params = SimulationParameters::default();
        let result = CoverageEngine::default()
            .run(&area, &towers, &params, resolution, None)
            .unwrap();

        for point in &result.points {
            let single = evaluate_point(
                coverage_engine::GeoPoint::new(point.latitude, point.longitude),
                &towers,
                ExponentPolicy::SimulationWide(params.path_loss_exponent),
                params.receiver_sensitivity,
            )
            .unwrap();
            prop_assert_eq!(point, &single);
        }
    }

    #[test]
    fn fuzz_served_points_name_a_supplied_tower(
        (area, towers) in scenario(5),
        resolution in grid_resolution(),
    ) {
        let result = CoverageEngine::default()
            .run(&area, &towers, &SimulationParameters::default(), resolution, None)
            .unwrap();

        for point in &result.points {
            match &point.serving_tower {
                Some(id) => {
                    let tower = towers.iter().find(|t| &t.id == id);
                    prop_assert!(tower.is_some());
                    prop_assert_eq!(point.network.as_ref(), tower.map(|t| &t.network));
                    prop_assert!(point.signal_strength.is_finite());
                }
                None => {
                    prop_assert!(towers.is_empty());
                    prop_assert_eq!(point.signal_bars, 0);
                }
            }
        }
    }
}
