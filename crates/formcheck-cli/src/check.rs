//! The `check` command: validate one payload against a named form

use anyhow::{Context, Result};
use formcheck_core::{flatten_issues, validate_async, ConfigOverrides, FieldErrors, Issue, Locale};
use formcheck_forms::{check_form, FormKind};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub form: String,
    /// Payload file; `None` or `-` reads standard input.
    pub input: Option<PathBuf>,
    pub locale: Option<PathBuf>,
    pub lang: Option<String>,
    pub abort_early: bool,
    /// Report every issue instead of the first per field.
    pub all_issues: bool,
}

/// Outcome of one check, printable as text or JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub form: FormKind,
    pub valid: bool,
    pub errors: FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Issue>>,
}

/// Reads and parses a JSON payload from a file or standard input.
pub fn read_payload(path: Option<&Path>) -> Result<Value> {
    let (source, content) = match path {
        Some(path) if path != Path::new("-") => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read payload from {}", path.display()))?;
            (path.display().to_string(), content)
        }
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read payload from stdin")?;
            ("stdin".to_string(), content)
        }
    };
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON payload from {}", source))
}

fn overrides(options: &CheckOptions) -> Result<ConfigOverrides> {
    let mut overrides = ConfigOverrides::new();
    if let Some(path) = &options.locale {
        let locale = Locale::from_file(path)
            .with_context(|| format!("Failed to load locale from {}", path.display()))?;
        debug!("Loaded locale from {}", path.display());
        overrides = overrides.locale(locale);
    }
    if let Some(lang) = &options.lang {
        overrides = overrides.lang(lang.clone());
    }
    if options.abort_early {
        overrides = overrides.abort_early(true);
    }
    Ok(overrides)
}

/// Validates `payload` against the form named in `options`.
pub async fn run_check(options: &CheckOptions, payload: Value) -> Result<CheckReport> {
    let form: FormKind = options.form.parse()?;
    let overrides = overrides(options)?;
    info!("Checking payload against form '{}'", form);

    let report = if options.all_issues {
        let schema = form.schema()?;
        let output = validate_async(&schema, payload, overrides).await;
        let errors = output.issues.as_deref().map(flatten_issues).unwrap_or_default();
        CheckReport {
            form,
            valid: output.success,
            errors,
            issues: output.issues,
        }
    } else {
        let errors = check_form(form, payload, overrides)?;
        CheckReport {
            form,
            valid: errors.is_empty(),
            errors,
            issues: None,
        }
    };

    debug!(valid = report.valid, fields = report.errors.len(), "check finished");
    Ok(report)
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            return writeln!(f, "✓ {}: valid", self.form);
        }

        writeln!(f, "✗ {}: {} field(s) failed", self.form, self.errors.len())?;
        for (field, message) in &self.errors {
            let field = if field.is_empty() { "(root)" } else { field };
            writeln!(f, "  {}: {}", field, message)?;
        }
        if let Some(issues) = &self.issues {
            writeln!(f, "\nAll issues:")?;
            for issue in issues {
                writeln!(f, "  - {}", issue)?;
            }
        }
        Ok(())
    }
}

/// Renders a report for a terminal.
pub fn render_text(report: &CheckReport) -> String {
    report.to_string()
}

/// Lists the available forms and their fields.
pub fn render_forms() -> String {
    FormKind::ALL
        .iter()
        .map(|kind| format!("{:<16} {}\n", kind.as_str(), kind.fields().join(", ")))
        .collect()
}
