#[cfg(test)]
mod tests {
    use crop_config::{ConfigError, CropConfig, ReconcileDelivery};
    use crop_types::Vec2;

    #[test]
    fn test_save_then_load_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crop.json");

        let config = CropConfig {
            class_name: "Cropper".to_string(),
            speed: 0.5,
            viewport_offset: Vec2::new(12.0, -4.0),
            drag_bars: false,
            reconcile_delivery: ReconcileDelivery::Immediate,
            ..CropConfig::default()
        };

        config.save(&path).unwrap();
        let loaded = CropConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CropConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ speed: ").unwrap();

        let err = CropConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
