//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::RelayConfig;

use crate::cli::ValidateArgs;
use crate::commands::build_config;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    topic: String,
    nsqd_addr: String,
    regex: Option<String>,
    contains: Option<String>,
    stderr_mirror: bool,
    debug_echo: bool,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!("Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let source = match &args.config {
        Some(path) => path.display().to_string(),
        None => "flags and environment".to_string(),
    };

    match build_config(&args.config, &args.overrides) {
        Ok(cfg) => {
            let warnings = collect_warnings(&cfg);
            ValidationResult {
                valid: true,
                source,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    topic: cfg.topic.clone(),
                    nsqd_addr: cfg.nsqd_addr.clone(),
                    regex: cfg.regex.clone(),
                    contains: cfg.contains.clone(),
                    stderr_mirror: cfg.stderr_mirror,
                    debug_echo: cfg.debug_echo,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            source,
            error: Some(format!("{e:#}")),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(cfg: &RelayConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if cfg.regex.is_none() && cfg.contains.is_none() {
        warnings.push("No filters configured - every line will be published".to_string());
    }

    if let Some(contains) = &cfg.contains {
        if contains == "!" {
            warnings.push(
                "Contains filter is a bare '!' - it matches nothing and always passes".to_string(),
            );
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.source);

        if let Some(ref summary) = result.summary {
            println!("\n  Topic: {}", summary.topic);
            println!("  nsqd: {}", summary.nsqd_addr);
            println!(
                "  Regex: {}",
                summary.regex.as_deref().unwrap_or("<none>")
            );
            println!(
                "  Contains: {}",
                summary.contains.as_deref().unwrap_or("<none>")
            );
            println!("  Mirror to stderr: {}", summary.stderr_mirror);
            println!("  Echo to stdout: {}", summary.debug_echo);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.source);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfigOverrides;

    fn args_with(overrides: ConfigOverrides) -> ValidateArgs {
        ValidateArgs {
            config: None,
            overrides,
            json: false,
        }
    }

    #[test]
    fn test_valid_flags_produce_summary() {
        let result = validate_config(&args_with(ConfigOverrides {
            topic: Some("logs".to_string()),
            nsqd_tcp_address: Some("localhost:4150".to_string()),
            contains_filter: Some("!api".to_string()),
            ..Default::default()
        }));

        assert!(result.valid);
        let summary = result.summary.unwrap();
        assert_eq!(summary.topic, "logs");
        assert_eq!(summary.contains.as_deref(), Some("!api"));
    }

    #[test]
    fn test_no_filters_warns() {
        let result = validate_config(&args_with(ConfigOverrides {
            topic: Some("logs".to_string()),
            nsqd_tcp_address: Some("localhost:4150".to_string()),
            ..Default::default()
        }));

        assert!(result.valid);
        assert!(result.warnings.unwrap()[0].contains("every line"));
    }

    #[test]
    fn test_missing_address_invalid() {
        let result = validate_config(&args_with(ConfigOverrides {
            topic: Some("logs".to_string()),
            ..Default::default()
        }));

        assert!(!result.valid);
        assert!(result.error.is_some());
    }
}
