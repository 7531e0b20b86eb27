//! Runtime validation of loaded configuration.

use crate::schema::Config;
use fingraph_common::{FinGraphError, Result};

/// Accepted DPI range.
pub const DPI_RANGE: std::ops::RangeInclusive<u32> = 10..=600;

/// Accepted look-back range in months.
pub const DEFAULT_MONTHS_RANGE: std::ops::RangeInclusive<u32> = 1..=120;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        let render = &config.render;
        if !DPI_RANGE.contains(&render.dpi) {
            return Err(FinGraphError::validation_field(
                format!(
                    "dpi must be between {} and {}, got {}",
                    DPI_RANGE.start(),
                    DPI_RANGE.end(),
                    render.dpi
                ),
                "render.dpi",
            ));
        }

        if render.palette.is_empty() {
            return Err(FinGraphError::validation_field(
                "palette must contain at least one color",
                "render.palette",
            ));
        }

        if let Some(bad) = render.palette.iter().find(|c| !is_hex_color(c)) {
            return Err(FinGraphError::validation_field(
                format!("invalid palette color '{bad}', expected #rrggbb"),
                "render.palette",
            ));
        }

        if !is_hex_color(&render.background) {
            return Err(FinGraphError::validation_field(
                format!(
                    "invalid background color '{}', expected #rrggbb",
                    render.background
                ),
                "render.background",
            ));
        }

        if render.title_font_size == 0 {
            return Err(FinGraphError::validation_field(
                "title font size must be positive",
                "render.title_font_size",
            ));
        }

        if !DEFAULT_MONTHS_RANGE.contains(&config.data.default_months) {
            return Err(FinGraphError::validation_field(
                format!(
                    "default_months must be between {} and {}, got {}",
                    DEFAULT_MONTHS_RANGE.start(),
                    DEFAULT_MONTHS_RANGE.end(),
                    config.data.default_months
                ),
                "data.default_months",
            ));
        }

        if config.data.currency_symbol.trim().is_empty() {
            return Err(FinGraphError::validation_field(
                "currency symbol cannot be empty",
                "data.currency_symbol",
            ));
        }

        Ok(())
    }
}

/// Whether `value` is a `#rrggbb` hex color.
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field_of(err: FinGraphError) -> Option<String> {
        match err {
            FinGraphError::Validation { field, .. } => field,
            _ => None,
        }
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#FFFFFF"));
        assert!(is_hex_color("#1f77b4"));
        assert!(!is_hex_color("1f77b4"));
        assert!(!is_hex_color("#1f77b"));
        assert!(!is_hex_color("#gggggg"));
        assert!(!is_hex_color("#1f77b4ff"));
    }

    #[test]
    fn test_dpi_bounds() {
        let mut config = Config::default();
        config.render.dpi = 5;
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(err).as_deref(), Some("render.dpi"));

        config.render.dpi = 600;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_palette_rules() {
        let mut config = Config::default();
        config.render.palette.clear();
        assert!(ConfigValidator::validate(&config).is_err());

        config.render.palette = vec!["#000000".to_string(), "red".to_string()];
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("'red'"));
    }

    #[test]
    fn test_data_rules() {
        let mut config = Config::default();
        config.data.default_months = 0;
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(err).as_deref(), Some("data.default_months"));

        let mut config = Config::default();
        config.data.currency_symbol = "  ".to_string();
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(err).as_deref(), Some("data.currency_symbol"));
    }

    proptest! {
        #[test]
        fn test_dpi_accepted_exactly_within_range(dpi in 0u32..2000) {
            let mut config = Config::default();
            config.render.dpi = dpi;
            prop_assert_eq!(ConfigValidator::validate(&config).is_ok(), DPI_RANGE.contains(&dpi));
        }

        #[test]
        fn test_default_months_accepted_exactly_within_range(months in 0u32..500) {
            let mut config = Config::default();
            config.data.default_months = months;
            prop_assert_eq!(
                ConfigValidator::validate(&config).is_ok(),
                DEFAULT_MONTHS_RANGE.contains(&months)
            );
        }

        #[test]
        fn test_generated_hex_colors_pass(rgb in any::<u32>()) {
            let color = format!("#{:06x}", rgb & 0x00ff_ffff);
            prop_assert!(is_hex_color(&color));
        }
    }
}
