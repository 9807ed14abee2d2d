//! Integration tests for the site-response pipeline.
//!
//! Exercises the facade end to end: solving reference profiles, derived
//! summaries, cache invalidation, and surface-motion convolution.

use shake_rs::{
    DampingSpec, FrequencyGrid, ModelError, ProfileError, RockHalfspace, SiteModel, SoilLayer,
    SoilProfile, TimeHistory,
};

/// Single 18 m soft layer over stiff rock; fundamental mode near
/// vs/(4H) = 200/72 ≈ 2.78 Hz.
fn uniform_site() -> SiteModel {
    let damping = DampingSpec::rayleigh(0.03, 2.76, 13.84).unwrap();
    let profile = SoilProfile::single(SoilLayer::new(18.0, 200.0, 1969.4, damping).unwrap());
    let rock = RockHalfspace::new(8000.0, 2000.0, 0.0).unwrap();
    SiteModel::new(profile, rock).with_grid(FrequencyGrid::new(22.0, 2000).unwrap())
}

/// Three layers totalling 18 m with distinct stiffness, shared Rayleigh
/// damping.
fn three_layer_site() -> SiteModel {
    let damping = DampingSpec::rayleigh(0.03, 2.76, 13.84).unwrap();
    let profile = SoilProfile::new(vec![
        SoilLayer::new(2.0, 150.0, 1900.0, damping).unwrap(),
        SoilLayer::new(6.0, 250.0, 1950.0, damping).unwrap(),
        SoilLayer::new(10.0, 400.0, 2000.0, damping).unwrap(),
    ])
    .unwrap();
    let rock = RockHalfspace::new(8000.0, 2000.0, 0.0).unwrap();
    SiteModel::new(profile, rock).with_grid(FrequencyGrid::new(50.0, 2000).unwrap())
}

#[test]
fn test_uniform_layer_fundamental_mode() {
    let mut model = uniform_site();
    let transfer = model.compute().unwrap();

    assert_eq!(transfer.len(), 2000);
    assert_eq!(transfer.frequencies().len(), transfer.uu().len());

    // Quarter-wavelength estimate, within 10% (damping shifts the peak a
    // little off the elastic value).
    let expected_f0 = 200.0 / (4.0 * 18.0);
    let f0 = model.fundamental_frequency().unwrap();
    assert!(
        (f0 - expected_f0).abs() < 0.1 * expected_f0,
        "fundamental frequency {:.3} Hz, expected near {:.3} Hz",
        f0,
        expected_f0
    );

    // A soft layer over much stiffer rock amplifies strongly at resonance.
    let amp = model.amplification_factor().unwrap();
    assert!(amp > 5.0, "amplification factor {:.2} too small", amp);
}

#[test]
fn test_grid_stays_within_bounds() {
    let mut model = uniform_site();
    let transfer = model.compute().unwrap();
    for &f in transfer.frequencies() {
        assert!(f > 0.0, "non-positive grid frequency {}", f);
        assert!(f <= 22.0 + 1e-12, "grid frequency {} above f_max", f);
    }
}

#[test]
fn test_three_layer_site_amplifies() {
    let mut model = three_layer_site();
    assert!((model.profile().total_depth() - 18.0).abs() < 1e-12);

    model.compute().unwrap();
    assert!(
        model.amplification_factor().unwrap() > 1.0,
        "layered column over stiff rock must amplify"
    );
}

#[test]
fn test_mutation_invalidates_computed_state() {
    let mut model = three_layer_site();
    model.compute().unwrap();
    assert!(model.is_computed());

    model.update_rock(RockHalfspace::new(2500.0, 2200.0, 0.01).unwrap());
    assert!(!model.is_computed());
    assert!(matches!(
        model.fundamental_frequency().unwrap_err(),
        ModelError::NotComputed
    ));

    model.compute().unwrap();
    let damping = DampingSpec::constant(0.05).unwrap();
    model
        .add_layer(SoilLayer::new(4.0, 300.0, 2000.0, damping).unwrap(), None)
        .unwrap();
    let zero = TimeHistory::from_acceleration(vec![0.0; 64], 0.01).unwrap();
    assert!(matches!(
        model.compute_surface_motion(&zero).unwrap_err(),
        ModelError::NotComputed
    ));
}

#[test]
fn test_add_remove_round_trip() {
    let mut model = three_layer_site();
    let count = model.profile().len();
    let depth = model.profile().total_depth();

    let damping = DampingSpec::constant(0.02).unwrap();
    let layer = SoilLayer::new(3.5, 320.0, 2050.0, damping).unwrap();
    model.add_layer(layer, Some(1)).unwrap();
    assert_eq!(model.profile().len(), count + 1);

    model.remove_layer(1).unwrap();
    assert_eq!(model.profile().len(), count);
    assert!(
        (model.profile().total_depth() - depth).abs() < 1e-12,
        "total depth changed across add/remove round trip"
    );
}

#[test]
fn test_layer_validation_names_the_field() {
    let damping = DampingSpec::constant(0.05).unwrap();
    let err = SoilLayer::new(5.0, 200.0, 1900.0, DampingSpec::Constant { ratio: 2.0 })
        .unwrap_err();
    assert_eq!(err, ProfileError::DampingOutOfRange { value: 2.0 });

    let err = SoilLayer::new(-1.0, 200.0, 1900.0, damping).unwrap_err();
    assert!(
        err.to_string().contains("thickness"),
        "message should name the field: {}",
        err
    );
}

#[test]
fn test_remove_only_layer_rejected() {
    let damping = DampingSpec::constant(0.05).unwrap();
    let profile = SoilProfile::single(SoilLayer::new(10.0, 250.0, 1900.0, damping).unwrap());
    let rock = RockHalfspace::new(3000.0, 2200.0, 0.0).unwrap();
    let mut model = SiteModel::new(profile, rock);

    assert!(matches!(
        model.remove_layer(0).unwrap_err(),
        ModelError::Profile(ProfileError::LastLayer)
    ));
    assert_eq!(model.profile().len(), 1);
}

#[test]
fn test_zero_bedrock_motion_stays_zero() {
    let mut model = uniform_site();
    model.compute().unwrap();

    let zero = TimeHistory::from_acceleration(vec![0.0; 512], 0.01).unwrap();
    let surface = model.compute_surface_motion(&zero).unwrap();

    assert_eq!(surface.len(), 512);
    assert!(
        surface.acceleration().iter().all(|&a| a == 0.0),
        "zero input must convolve to zero output"
    );
}

#[test]
fn test_surface_motion_amplifies_resonant_bedrock_record() {
    let mut model = uniform_site();
    model.compute().unwrap();
    let f0 = model.fundamental_frequency().unwrap();

    // Resonant tone at the fundamental frequency, snapped to an FFT bin.
    let n = 1024;
    let dt = 0.01;
    let bin = (f0 * n as f64 * dt).round();
    let f_tone = bin / (n as f64 * dt);
    let samples: Vec<f64> = (0..n)
        .map(|i| (2.0 * std::f64::consts::PI * f_tone * i as f64 * dt).sin())
        .collect();
    let bedrock = TimeHistory::from_acceleration(samples, dt).unwrap();

    let surface = model.compute_surface_motion(&bedrock).unwrap();
    assert!(
        surface.peak() > 3.0 * bedrock.peak(),
        "resonant tone should amplify, peak ratio {:.2}",
        surface.peak() / bedrock.peak()
    );
}

#[test]
fn test_recompute_after_softening_lowers_fundamental() {
    let mut model = uniform_site();
    model.compute().unwrap();
    let f0_stiff = model.fundamental_frequency().unwrap();

    // Halving vs halves the quarter-wavelength frequency.
    model
        .modify_layer(0, shake_rs::LayerUpdate::new().with_vs(100.0))
        .unwrap();
    model.compute().unwrap();
    let f0_soft = model.fundamental_frequency().unwrap();

    assert!(
        (f0_soft - 0.5 * f0_stiff).abs() < 0.15 * f0_stiff,
        "softened column: {:.3} Hz vs stiff {:.3} Hz",
        f0_soft,
        f0_stiff
    );
}
