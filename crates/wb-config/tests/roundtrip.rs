use wb_config::{WellbeingConfig, load_or_default, load_yaml, save_yaml};
use wb_core::Dimension;

#[test]
fn roundtrip_yaml_default_config() {
    let config = WellbeingConfig::default();

    let path = std::env::temp_dir().join("wb_config_roundtrip_default.yaml");
    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(config, loaded);
}

#[test]
fn minimal_yaml_fills_defaults() {
    let yaml = r#"
version: 1
name: Two measures
measures:
  - measure: Homicides
    dimension: safety
    invert: true
  - measure: Employment rate
    dimension: jobs
"#;
    let path = std::env::temp_dir().join("wb_config_minimal.yaml");
    std::fs::write(&path, yaml).unwrap();

    let config = load_yaml(&path).unwrap();
    assert_eq!(config.measures.len(), 2);
    assert!(config.is_inverted(Dimension::Safety));
    assert!(!config.is_inverted(Dimension::Jobs));
    assert_eq!(config.transform.max_missing_fraction, 0.5);
    assert_eq!(config.transform.sample_size, 15);
    assert_eq!(config.simulation.correlation_scale, 0.3);
    assert_eq!(config.dashboard.benchmark_countries, vec!["Finland", "Denmark"]);
}

#[test]
fn unknown_dimension_is_a_yaml_error() {
    let yaml = r#"
version: 1
name: Broken
measures:
  - measure: Happiness
    dimension: happiness
"#;
    let path = std::env::temp_dir().join("wb_config_unknown_dim.yaml");
    std::fs::write(&path, yaml).unwrap();

    let err = load_yaml(&path).unwrap_err();
    assert!(format!("{err}").contains("YAML"));
}

#[test]
fn no_path_uses_builtin_defaults() {
    let config = load_or_default(None).unwrap();
    assert_eq!(config, WellbeingConfig::default());
}
