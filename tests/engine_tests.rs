//! End-to-end tests for batch scoring over fixture files.

use sbom_score::config::{generate_default_config, generate_profile_config, read_config_str};
use sbom_score::{CancelToken, Config, Engine, Grade, ScoreError};
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .display()
        .to_string()
}

fn engine() -> Engine {
    Engine::standard().expect("standard engine")
}

#[test]
fn ntia_complete_document_scores_full_marks() {
    let config = Config::builder().profiles(["NTIA"]).build();
    let results = engine()
        .score_paths(&config, &[fixture("ntia-complete.cdx.json")], &CancelToken::new())
        .expect("scored");

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.interlynk_score, 10.0);
    assert_eq!(result.grade, Grade::A);
    assert_eq!(result.grade.to_string(), "A");
    assert_eq!(result.spec, "cyclonedx");
    assert_eq!(result.spec_version, "1.5");
    assert_eq!(result.num_components, 4);
    assert_eq!(result.creation_time.as_deref(), Some("2024-03-18T09:12:44Z"));

    let profiles = result.profiles().expect("profile breakdown");
    assert_eq!(profiles.len(), 1);
    let ntia = &profiles[0];
    assert_eq!(ntia.key, "ntia");
    assert_eq!(ntia.required_total, 7);
    assert_eq!(ntia.required_compliant, ntia.required_total);
    assert_eq!(ntia.grade, Grade::A);
}

#[test]
fn complete_document_scores_well_in_comprehensive_mode() {
    let results = engine()
        .score_paths(
            &Config::default(),
            &[fixture("ntia-complete.cdx.json")],
            &CancelToken::new(),
        )
        .expect("scored");
    let result = &results[0];
    let categories = result.categories().expect("category breakdown");
    assert_eq!(categories.len(), 7);
    for category in categories {
        assert!((0.0..=10.0).contains(&category.score), "{}", category.key);
    }
    let identification = categories
        .iter()
        .find(|c| c.key == "identification")
        .expect("identification scored");
    assert_eq!(identification.score, 10.0);
    assert!(result.interlynk_score >= 8.0, "{}", result.interlynk_score);
}

#[test]
fn multi_profile_overall_is_mean_of_profiles() {
    let config = Config::builder().profiles(["ntia", "fsct"]).build();
    let results = engine()
        .score_paths(&config, &[fixture("ntia-complete.cdx.json")], &CancelToken::new())
        .expect("scored");
    let profiles = results[0].profiles().expect("profiles");
    assert_eq!(profiles.len(), 2);
    let mean = (profiles[0].score + profiles[1].score) / 2.0;
    assert!((results[0].interlynk_score - mean).abs() < 1e-9);
}

#[test]
fn every_path_failing_is_a_batch_error() {
    let result = engine().score_paths(
        &Config::default(),
        &[
            fixture("not-an-sbom.json"),
            "/nonexistent/sbom.json".to_string(),
        ],
        &CancelToken::new(),
    );
    assert!(matches!(
        result,
        Err(ScoreError::NoDocumentsScored { attempted: 2 })
    ));
}

#[test]
fn one_good_path_among_bad_ones() {
    let results = engine()
        .score_paths(
            &Config::default(),
            &[
                "/nonexistent/sbom.json".to_string(),
                fixture("minimal.spdx.json"),
                fixture("not-an-sbom.json"),
            ],
            &CancelToken::new(),
        )
        .expect("one document scored");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].spec, "spdx");
    assert_eq!(results[0].num_components, 2);
}

#[test]
fn config_errors_halt_before_documents() {
    let config = Config::builder().categories(["no-such-category"]).build();
    let result = engine().score_paths(
        &config,
        &[fixture("ntia-complete.cdx.json")],
        &CancelToken::new(),
    );
    assert!(matches!(result, Err(ScoreError::Config(_))));

    let config = Config::builder()
        .config_file(Some(PathBuf::from("/nonexistent/config.yaml")))
        .build();
    let result = engine().score_paths(
        &config,
        &[fixture("ntia-complete.cdx.json")],
        &CancelToken::new(),
    );
    assert!(matches!(result, Err(ScoreError::ConfigFile(_))));
}

#[test]
fn directory_batch_scores_every_document() {
    let tmp = TempDir::new().unwrap();
    for name in ["ntia-complete.cdx.json", "minimal.spdx.json"] {
        std::fs::copy(fixture(name), tmp.path().join(name)).unwrap();
    }

    let results = engine()
        .score_paths(
            &Config::default(),
            &[tmp.path().display().to_string()],
            &CancelToken::new(),
        )
        .expect("scored");
    let names: Vec<_> = results
        .iter()
        .map(|r| PathBuf::from(&r.filename).file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, ["minimal.spdx.json", "ntia-complete.cdx.json"]);
}

#[test]
fn cancelled_batch_returns_cancelled() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let result = engine().score_paths(
        &Config::default(),
        &[fixture("ntia-complete.cdx.json")],
        &cancel,
    );
    assert!(matches!(result, Err(ScoreError::Cancelled)));
}

#[test]
fn config_file_round_trip_drives_scoring() {
    let engine = engine();
    let mut file = generate_default_config(engine.catalog());
    for category in &mut file.categories {
        category.ignore = category.key != "licensing";
    }

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("score.yaml");
    std::fs::write(&path, file.to_yaml().unwrap()).unwrap();

    let config = Config::builder().config_file(Some(path)).build();
    let results = engine
        .score_paths(&config, &[fixture("ntia-complete.cdx.json")], &CancelToken::new())
        .expect("scored");
    let categories = results[0].categories().expect("categories");
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].key, "licensing");
    assert_eq!(results[0].interlynk_score, categories[0].score);
}

#[test]
fn generated_config_reads_back_unchanged() {
    let engine = engine();
    let generated = generate_default_config(engine.catalog());
    let read = read_config_str(&generated.to_yaml().unwrap()).unwrap();

    for (original, parsed) in generated.categories.iter().zip(&read.categories) {
        assert_eq!(original.key, parsed.key);
        assert_eq!(original.weight, parsed.weight);
        let keys: Vec<_> = original.features.iter().map(|f| (&f.key, f.weight)).collect();
        let parsed_keys: Vec<_> = parsed.features.iter().map(|f| (&f.key, f.weight)).collect();
        assert_eq!(keys, parsed_keys);
    }

    let profiles = generate_profile_config(engine.catalog());
    let read = read_config_str(&profiles.to_yaml().unwrap()).unwrap();
    for (original, parsed) in profiles.profiles.iter().zip(&read.profiles) {
        let flags: Vec<_> = original.features.iter().map(|f| (&f.key, f.required)).collect();
        let parsed_flags: Vec<_> = parsed.features.iter().map(|f| (&f.key, f.required)).collect();
        assert_eq!(flags, parsed_flags);
    }
}

#[test]
fn signature_bundle_is_attached() {
    let tmp = TempDir::new().unwrap();
    let sig = tmp.path().join("sbom.sig");
    let key = tmp.path().join("key.pub");
    std::fs::write(&sig, "c2lnbmF0dXJl").unwrap();
    std::fs::write(&key, "-----BEGIN PUBLIC KEY-----").unwrap();

    let config = Config::builder()
        .features(["sbom_signature"])
        .signature_bundle(sig, key)
        .build();

    let unverified = engine()
        .score_paths(&config, &[fixture("ntia-complete.cdx.json")], &CancelToken::new())
        .expect("scored");
    let feature = &unverified[0].categories().unwrap()[0].features[0];
    assert_eq!(feature.key, "sbom_signature");
    assert_eq!(feature.score, 5.0);

    let verifying = engine().with_verifier(std::sync::Arc::new(
        |_: &[u8], _: &[u8], _: &[u8]| true,
    ));
    let verified = verifying
        .score_paths(&config, &[fixture("ntia-complete.cdx.json")], &CancelToken::new())
        .expect("scored");
    assert_eq!(verified[0].categories().unwrap()[0].features[0].score, 10.0);
}
