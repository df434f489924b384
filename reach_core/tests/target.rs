use rand::SeedableRng;
use rand::rngs::StdRng;
use reach_core::TaskError;
use reach_core::target::{TargetCfg, TargetGenerator, TargetStyle, dof_channel_map};
use rstest::rstest;

fn generator(cfg: TargetCfg, seed: u64) -> TargetGenerator<StdRng> {
    TargetGenerator::new(cfg, StdRng::seed_from_u64(seed)).expect("generator")
}

#[rstest]
#[case(1, vec![0, 0, 0, 0, 0])]
#[case(2, vec![0, 1, 1, 1, 1])]
#[case(3, vec![0, 1, 2, 2, 2])]
fn channel_map_matches_dof(#[case] dof: u8, #[case] expected: Vec<usize>) {
    assert_eq!(dof_channel_map(dof, 5).unwrap(), expected);
}

#[rstest]
#[case(0)]
#[case(4)]
fn channel_map_rejects_unsupported_dof(#[case] dof: u8) {
    assert!(matches!(
        dof_channel_map(dof, 5),
        Err(TaskError::Config(_))
    ));
}

#[test]
fn random_targets_stay_in_range_after_floors() {
    let mut g = generator(TargetCfg::hand(3, TargetStyle::Random, 5, 0.05), 7);
    for _ in 0..200 {
        let t = g.next_target();
        assert_eq!(t.len(), 5);
        // Floors only ever raise values, so the upper edge still binds.
        assert!(t[0] >= 0.3 && t[0] <= 0.95, "channel 0 out of range: {t:?}");
        assert!(t[4] >= 0.1 && t[4] <= 0.95, "channel 4 out of range: {t:?}");
        for (i, v) in t.iter().enumerate() {
            assert!(
                (0.05..=0.95).contains(v) || i == 0 || i == 4,
                "channel {i} out of range: {t:?}"
            );
        }
    }
}

#[test]
fn one_dof_drives_every_channel_identically() {
    // No floors, so the shared DOF value shows through unmodified.
    let cfg = TargetCfg {
        dof: 1,
        style: TargetStyle::Random,
        range: (0.05, 0.95),
        channels: 5,
        floors: vec![],
    };
    let mut g = generator(cfg, 13);
    for _ in 0..50 {
        let t = g.next_target();
        assert!(t.iter().all(|v| *v == t[0]), "channels diverged: {t:?}");
    }
}

#[test]
fn two_dof_splits_first_channel_from_the_rest() {
    let cfg = TargetCfg {
        dof: 2,
        style: TargetStyle::Random,
        range: (0.05, 0.95),
        channels: 5,
        floors: vec![],
    };
    let mut g = generator(cfg, 13);
    for _ in 0..50 {
        let t = g.next_target();
        assert!(t[1..].iter().all(|v| *v == t[1]), "grouped channels diverged: {t:?}");
    }
}

#[test]
fn center_out_starts_at_the_midpoint_and_alternates() {
    let mut g = generator(TargetCfg::hand(1, TargetStyle::CenterOut, 5, 0.05), 3);
    // First call is always the centering pose: midpoint of [0.05, 0.95].
    assert_eq!(g.next_target(), vec![0.5; 5]);
    for _ in 0..20 {
        let outward = g.next_target();
        // Peripheral poses come from the discrete grid, which excludes 0.5.
        assert_ne!(outward[1], 0.5, "outward pose landed on center: {outward:?}");
        assert_eq!(g.next_target(), vec![0.5; 5], "expected a centering pose");
    }
}

#[test]
fn center_out_peripheral_poses_use_the_discrete_grid() {
    let cfg = TargetCfg {
        dof: 1,
        style: TargetStyle::CenterOut,
        range: (0.05, 0.95),
        channels: 5,
        floors: vec![],
    };
    let mut g = generator(cfg, 29);
    // 10 evenly spaced points over [0.05, 0.95], rounded to two decimals.
    let grid: [f32; 10] = [0.05, 0.15, 0.25, 0.35, 0.45, 0.55, 0.65, 0.75, 0.85, 0.95];
    g.next_target(); // centering pose
    for _ in 0..40 {
        let outward = g.next_target();
        assert!(
            grid.iter().any(|p| (p - outward[0]).abs() < 1e-6),
            "not a grid point: {outward:?}"
        );
        g.next_target(); // centering pose
    }
}

#[test]
fn targets_are_rounded_to_two_decimals() {
    let mut g = generator(TargetCfg::hand(3, TargetStyle::Random, 5, 0.05), 41);
    for _ in 0..100 {
        for v in g.next_target() {
            let scaled = v * 100.0;
            assert!(
                (scaled - scaled.round()).abs() < 1e-4,
                "value not rounded to 2dp: {v}"
            );
        }
    }
}

#[test]
fn dof_exceeding_channels_is_rejected() {
    let cfg = TargetCfg {
        dof: 3,
        style: TargetStyle::Random,
        range: (0.05, 0.95),
        channels: 2,
        floors: vec![],
    };
    assert!(TargetGenerator::new(cfg, StdRng::seed_from_u64(0)).is_err());
}

#[test]
fn inverted_range_is_rejected() {
    let cfg = TargetCfg {
        dof: 1,
        style: TargetStyle::Random,
        range: (0.9, 0.1),
        channels: 5,
        floors: vec![],
    };
    assert!(TargetGenerator::new(cfg, StdRng::seed_from_u64(0)).is_err());
}

#[test]
fn seeded_generators_replay_the_same_sequence() {
    let mut a = generator(TargetCfg::hand(3, TargetStyle::Random, 5, 0.05), 99);
    let mut b = generator(TargetCfg::hand(3, TargetStyle::Random, 5, 0.05), 99);
    for _ in 0..20 {
        assert_eq!(a.next_target(), b.next_target());
    }
}
