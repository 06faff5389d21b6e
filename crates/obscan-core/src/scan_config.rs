//! Scan file loading and validation.
//!
//! The scan file is YAML and carries the domain inputs of a run: endpoint,
//! target product, seeds and the captured request template.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::types::{LocationFields, LocationSeed, TieBreak};
use crate::ConfigError;

const DEFAULT_PER_SEED_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScanFile {
    endpoint_url: String,
    product_key: String,
    #[serde(default)]
    condition: Option<String>,
    seeds: Vec<String>,
    #[serde(default)]
    template: Option<serde_json::Value>,
    #[serde(default)]
    template_file: Option<PathBuf>,
    #[serde(default = "default_per_seed_timeout_secs")]
    per_seed_timeout_secs: u64,
    #[serde(default)]
    location_fields: Option<Vec<String>>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default)]
    tie_break: TieBreak,
}

fn default_per_seed_timeout_secs() -> u64 {
    DEFAULT_PER_SEED_TIMEOUT_SECS
}

/// Validated inputs for one scan run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub endpoint_url: String,
    pub product_key: String,
    /// Optional condition filter, matched case-insensitively.
    pub condition: Option<String>,
    pub seeds: Vec<LocationSeed>,
    pub template: serde_json::Value,
    pub per_seed_timeout: Duration,
    pub location_fields: LocationFields,
    pub headers: BTreeMap<String, String>,
    pub tie_break: TieBreak,
}

/// Load and validate a scan file.
///
/// A relative `template_file` is resolved against the scan file's directory.
///
/// # Errors
///
/// Returns `ConfigError` if the file (or its template file) cannot be read,
/// parsed, or fails validation.
pub fn load_scan_config(path: &Path) -> Result<ScanConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ScanFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_scan_config(&content, base_dir)
}

/// Parse and validate scan-file YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed, the template cannot be
/// resolved, or validation fails.
pub fn parse_scan_config(content: &str, base_dir: &Path) -> Result<ScanConfig, ConfigError> {
    let file: ScanFile = serde_yaml::from_str(content)?;

    let template = resolve_template(file.template, file.template_file, base_dir)?;
    let seeds = validate_seeds(&file.seeds)?;

    let product_key = file.product_key.trim().to_string();
    if product_key.is_empty() {
        return Err(ConfigError::Validation(
            "product_key must be non-empty".to_string(),
        ));
    }

    let endpoint_url = file.endpoint_url.trim().to_string();
    if !(endpoint_url.starts_with("http://") || endpoint_url.starts_with("https://")) {
        return Err(ConfigError::Validation(format!(
            "endpoint_url must be an http(s) URL, got '{endpoint_url}'"
        )));
    }

    if file.per_seed_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "per_seed_timeout_secs must be greater than zero".to_string(),
        ));
    }

    let location_fields = match file.location_fields {
        Some(names) => {
            let fields = LocationFields::new(names);
            if fields.is_empty() {
                return Err(ConfigError::Validation(
                    "location_fields must name at least one key".to_string(),
                ));
            }
            fields
        }
        None => LocationFields::default(),
    };

    let condition = file
        .condition
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    Ok(ScanConfig {
        endpoint_url,
        product_key,
        condition,
        seeds,
        template,
        per_seed_timeout: Duration::from_secs(file.per_seed_timeout_secs),
        location_fields,
        headers: file.headers,
        tie_break: file.tie_break,
    })
}

fn resolve_template(
    inline: Option<serde_json::Value>,
    template_file: Option<PathBuf>,
    base_dir: &Path,
) -> Result<serde_json::Value, ConfigError> {
    let template = match (inline, template_file) {
        (Some(_), Some(_)) => {
            return Err(ConfigError::Validation(
                "set either template or template_file, not both".to_string(),
            ))
        }
        (None, None) => {
            return Err(ConfigError::Validation(
                "one of template or template_file is required".to_string(),
            ))
        }
        (Some(inline), None) => inline,
        (None, Some(rel)) => {
            let path = if rel.is_absolute() {
                rel
            } else {
                base_dir.join(rel)
            };
            let raw =
                std::fs::read_to_string(&path).map_err(|e| ConfigError::TemplateFileIo {
                    path: path.display().to_string(),
                    source: e,
                })?;
            serde_json::from_str(&raw).map_err(|e| ConfigError::TemplateFileParse {
                path: path.display().to_string(),
                source: e,
            })?
        }
    };

    if !(template.is_object() || template.is_array()) {
        return Err(ConfigError::Validation(
            "request template must be a mapping or a sequence".to_string(),
        ));
    }
    Ok(template)
}

fn validate_seeds(raw: &[String]) -> Result<Vec<LocationSeed>, ConfigError> {
    if raw.is_empty() {
        return Err(ConfigError::Validation(
            "seeds must list at least one location".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut seeds = Vec::with_capacity(raw.len());
    for token in raw {
        let token = token.trim();
        if token.is_empty() {
            return Err(ConfigError::Validation(
                "seed tokens must be non-empty".to_string(),
            ));
        }
        if !seen.insert(token.to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate seed: '{token}'"
            )));
        }
        seeds.push(LocationSeed::new(token));
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
endpoint_url: "https://retailer.test/productfulfillment/c/api/2.0/storeAvailability"
product_key: "6602747"
seeds: ["30303", "60601"]
template:
  locationId: "1234"
  zipCode: "55423"
  items:
    - sku: "6602747"
      condition: "2"
"#;

    fn parse(content: &str) -> Result<ScanConfig, ConfigError> {
        parse_scan_config(content, Path::new("."))
    }

    #[test]
    fn parses_minimal_scan_file_with_defaults() {
        let cfg = parse(MINIMAL).unwrap();
        assert_eq!(cfg.product_key, "6602747");
        assert_eq!(
            cfg.seeds,
            vec![LocationSeed::new("30303"), LocationSeed::new("60601")]
        );
        assert_eq!(cfg.per_seed_timeout, Duration::from_secs(20));
        assert_eq!(cfg.location_fields, LocationFields::default());
        assert_eq!(cfg.tie_break, TieBreak::LowestSeed);
        assert!(cfg.condition.is_none());
        assert!(cfg.headers.is_empty());
        assert_eq!(cfg.template["zipCode"], "55423");
    }

    #[test]
    fn parses_optional_fields() {
        let content = r#"
endpoint_url: "https://retailer.test/avail"
product_key: " 6602747 "
condition: "fair"
seeds: ["30303"]
template: {postalCode: "00000"}
per_seed_timeout_secs: 5
location_fields: ["PostalCode", "shipToZip"]
headers:
  cookie: "session=abc"
tie_break: first_seen
"#;
        let cfg = parse(content).unwrap();
        assert_eq!(cfg.product_key, "6602747");
        assert_eq!(cfg.condition.as_deref(), Some("fair"));
        assert_eq!(cfg.per_seed_timeout, Duration::from_secs(5));
        assert!(cfg.location_fields.contains("shiptozip"));
        assert!(!cfg.location_fields.contains("zipcode"));
        assert_eq!(cfg.headers.get("cookie").map(String::as_str), Some("session=abc"));
        assert_eq!(cfg.tie_break, TieBreak::FirstSeen);
    }

    #[test]
    fn rejects_empty_seed_list() {
        let content = MINIMAL.replace(r#"seeds: ["30303", "60601"]"#, "seeds: []");
        let err = parse(&content).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref m) if m.contains("seeds")),
            "got: {err:?}"
        );
    }

    #[test]
    fn rejects_blank_product_key() {
        let content = MINIMAL.replace(r#"product_key: "6602747""#, r#"product_key: "  ""#);
        let err = parse(&content).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref m) if m.contains("product_key")),
            "got: {err:?}"
        );
    }

    #[test]
    fn rejects_missing_product_key() {
        let content = MINIMAL.replace(r#"product_key: "6602747""#, "");
        let err = parse(&content).unwrap_err();
        assert!(matches!(err, ConfigError::ScanFileParse(_)), "got: {err:?}");
    }

    #[test]
    fn rejects_duplicate_seeds() {
        let content = MINIMAL.replace(r#"["30303", "60601"]"#, r#"["30303", " 30303"]"#);
        let err = parse(&content).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate seed")),
            "got: {err:?}"
        );
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let content = MINIMAL.replace("https://retailer.test", "ftp://retailer.test");
        let err = parse(&content).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref m) if m.contains("endpoint_url")),
            "got: {err:?}"
        );
    }

    #[test]
    fn rejects_zero_timeout() {
        let content = format!("{MINIMAL}per_seed_timeout_secs: 0\n");
        let err = parse(&content).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref m) if m.contains("per_seed_timeout_secs")),
            "got: {err:?}"
        );
    }

    #[test]
    fn rejects_scalar_template() {
        let content = r#"
endpoint_url: "https://retailer.test/avail"
product_key: "1"
seeds: ["1"]
template: "just a string"
"#;
        let err = parse(content).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref m) if m.contains("mapping")),
            "got: {err:?}"
        );
    }

    #[test]
    fn requires_exactly_one_template_source() {
        let none = r#"
endpoint_url: "https://retailer.test/avail"
product_key: "1"
seeds: ["1"]
"#;
        assert!(matches!(
            parse(none).unwrap_err(),
            ConfigError::Validation(_)
        ));

        let both = format!("{MINIMAL}template_file: payload.json\n");
        assert!(matches!(
            parse(&both).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn rejects_unknown_keys() {
        let content = format!("{MINIMAL}seed_list: [\"1\"]\n");
        assert!(matches!(
            parse(&content).unwrap_err(),
            ConfigError::ScanFileParse(_)
        ));
    }

    #[test]
    fn loads_template_file_relative_to_scan_file() {
        let dir = std::env::temp_dir().join(format!("obscan-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("payload.json"),
            r#"{"locationId": "1", "destinationZip": "55423"}"#,
        )
        .unwrap();
        let scan_path = dir.join("scan.yaml");
        std::fs::write(
            &scan_path,
            r#"
endpoint_url: "https://retailer.test/avail"
product_key: "6602747"
seeds: ["30303"]
template_file: payload.json
"#,
        )
        .unwrap();

        let cfg = load_scan_config(&scan_path).unwrap();
        assert_eq!(cfg.template["destinationZip"], "55423");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_template_file_is_io_error() {
        let content = r#"
endpoint_url: "https://retailer.test/avail"
product_key: "1"
seeds: ["1"]
template_file: /definitely/not/here.json
"#;
        assert!(matches!(
            parse(content).unwrap_err(),
            ConfigError::TemplateFileIo { .. }
        ));
    }

    #[test]
    fn missing_scan_file_is_io_error() {
        let err = load_scan_config(Path::new("/definitely/not/scan.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ScanFileIo { .. }));
    }
}
