use super::Config;

#[test]
fn test_defaults() {
    let cfg = Config::defaults();

    assert!((cfg.threshold - 0.3).abs() < f64::EPSILON);
    assert_eq!(cfg.section_level, 2);
    assert_eq!(cfg.wrap_width, 100);
    assert_eq!(cfg.file_extensions, vec!["md".to_string()]);
    assert_eq!(cfg.palette.len(), 5);
    assert_eq!(cfg.log_level, "warn");
    assert!(cfg.log_file.is_empty());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let cfg = Config::from_toml("threshold = 0.5\nsection_level = 3\n").unwrap();

    assert!((cfg.threshold - 0.5).abs() < f64::EPSILON);
    assert_eq!(cfg.section_level, 3);
    assert_eq!(cfg.wrap_width, 100);
    assert_eq!(cfg.tick_ms, 16);
}
