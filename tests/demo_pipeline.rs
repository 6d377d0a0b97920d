//! End-to-end runs of both demo pipelines without rendering.

use rand::rngs::StdRng;
use rand::SeedableRng;

use u_statlab::config::{CorrelationDemoConfig, DistributionDemoConfig};
use u_statlab::correlation::{correlate, pearson, CorrelationMethod};
use u_statlab::distribution::{histogram_bins, manufacturing_catalog, MANUFACTURING_CATALOG};
use u_statlab::lagged::{cross_correlation, strongest_shift};
use u_statlab::plot::histogram_panel;
use u_statlab::report::{CorrelationReport, DistributionReport};
use u_statlab::signal::noisy_lagged_sine;

#[test]
fn correlation_check_default_scenario() {
    let config = CorrelationDemoConfig {
        seed: Some(2024),
        ..CorrelationDemoConfig::default()
    };
    config.validate().expect("valid defaults");

    let frame = noisy_lagged_sine(&config.signal, &mut config.rng()).expect("should generate");
    assert_eq!(frame.len(), 100);

    for method in CorrelationMethod::ALL {
        let table = frame.corr(method).expect("should compute");
        assert_eq!(table.names(), ["x", "y"]);
        for i in 0..2 {
            assert!((table.at(i, i) - 1.0).abs() < 1e-12);
            for j in 0..2 {
                assert!((table.at(i, j) - table.at(j, i)).abs() < 1e-12);
                assert!((-1.0..=1.0).contains(&table.at(i, j)));
            }
        }
    }

    let sweep = cross_correlation(&frame, CorrelationMethod::Kendall).expect("x and y exist");
    assert_eq!(sweep.len(), 50);
    let shifts: Vec<i64> = sweep.iter().map(|rec| rec.shift).collect();
    assert_eq!(shifts, (-25..25).collect::<Vec<_>>());
    for rec in &sweep {
        if let Some(r) = rec.r {
            assert!((-1.0..=1.0).contains(&r), "shift {} gave {r}", rec.shift);
        }
    }

    let zero = sweep.iter().find(|rec| rec.shift == 0).expect("zero shift");
    let direct = correlate(
        frame.column("x").expect("x"),
        frame.column("y").expect("y"),
        CorrelationMethod::Kendall,
    )
    .expect("should compute");
    assert!((zero.r.expect("defined") - direct.r).abs() < 1e-12);

    let strongest = strongest_shift(&sweep).expect("some shift is defined");
    assert!((-25..25).contains(&strongest.shift));
    let best = strongest.r.expect("defined");
    assert!(sweep.iter().filter_map(|rec| rec.r).all(|r| r <= best));
}

#[test]
fn phase_lag_hides_zero_lag_pearson_and_kendall_sweep_recovers_it() {
    for seed in 0..8 {
        let config = CorrelationDemoConfig {
            seed: Some(seed),
            ..CorrelationDemoConfig::default()
        };
        let frame = noisy_lagged_sine(&config.signal, &mut config.rng()).expect("should generate");
        let x = frame.column("x").expect("x");
        let y = frame.column("y").expect("y");

        let zero_lag = pearson(x, y).expect("should compute");
        assert!(zero_lag.r.abs() < 0.2, "seed {seed}: zero-lag pearson {}", zero_lag.r);

        let sweep = cross_correlation(&frame, CorrelationMethod::Kendall).expect("x and y exist");
        let strongest = strongest_shift(&sweep).expect("some shift is defined");
        assert!(
            (5..=20).contains(&strongest.shift),
            "seed {seed}: strongest shift {}",
            strongest.shift
        );
        assert!(strongest.r.expect("defined") > 0.0, "seed {seed}: {strongest}");
    }
}

#[test]
fn correlation_check_is_reproducible_with_seed() {
    let config = CorrelationDemoConfig {
        seed: Some(77),
        pacf_lags: Some(10),
        ..CorrelationDemoConfig::default()
    };
    let run = || {
        let frame = noisy_lagged_sine(&config.signal, &mut config.rng()).expect("should generate");
        CorrelationReport::compute(&frame, config.sweep_method, config.pacf_lags)
            .expect("should compute")
            .to_string()
    };
    assert_eq!(run(), run());
}

#[test]
fn manufacturing_distributions_default_scenario() {
    let config = DistributionDemoConfig {
        seed: Some(99),
        ..DistributionDemoConfig::default()
    };
    config.validate().expect("valid defaults");

    let mut rng: StdRng = config.rng();
    let descriptors = manufacturing_catalog(config.sample_size, &mut rng).expect("valid catalog");
    assert_eq!(descriptors.len(), MANUFACTURING_CATALOG.len());

    for (descriptor, entry) in descriptors.iter().zip(&MANUFACTURING_CATALOG) {
        assert_eq!(descriptor.name, entry.name);
        assert_eq!(descriptor.data.len(), config.sample_size);

        let bins = histogram_bins(&descriptor.data, config.bins).expect("should bin");
        assert_eq!(bins.total(), config.sample_size);
        let area: f64 = bins.density().iter().map(|d| d * bins.bin_width).sum();
        assert!((area - 1.0).abs() < 1e-9, "{}: area {area}", descriptor.name);

        let panel = histogram_panel(descriptor, config.bins).expect("should lay out");
        assert_eq!(panel.bars.len(), config.bins);
        assert_eq!(panel.title[0], entry.name);
    }

    let report = DistributionReport::compute(&descriptors).to_string();
    for entry in &MANUFACTURING_CATALOG {
        assert!(report.contains(entry.name));
    }
}

#[test]
fn catalog_differs_between_seeds() {
    let a = manufacturing_catalog(200, &mut StdRng::seed_from_u64(1)).expect("valid catalog");
    let b = manufacturing_catalog(200, &mut StdRng::seed_from_u64(2)).expect("valid catalog");
    assert!(a.iter().zip(&b).any(|(x, y)| x.data != y.data));
}
