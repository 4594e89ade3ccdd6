//! Framework detection
//!
//! Guesses which web framework(s) a project uses from the dependencies in its
//! `package.json`. Rules are independent, so a manifest that pulls in both
//! Astro and SvelteKit yields two detections; the CLI turns that into a
//! conflict unless the user forces a choice.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::manifest::PackageJson;

/// Frameworks the migration knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framework {
    /// Astro, static output
    AstroSsg,
    /// Astro with the Cloudflare SSR adapter
    AstroSsr,
    /// Remix
    Remix,
    /// SvelteKit, static adapter
    SvelteSsg,
    /// SvelteKit with the Cloudflare adapter
    SvelteSsr,
}

impl Framework {
    pub const ALL: [Framework; 5] = [
        Self::AstroSsg,
        Self::AstroSsr,
        Self::Remix,
        Self::SvelteSsg,
        Self::SvelteSsr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AstroSsg => "astro-ssg",
            Self::AstroSsr => "astro-ssr",
            Self::Remix => "remix",
            Self::SvelteSsg => "svelte-ssg",
            Self::SvelteSsr => "svelte-ssr",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    /// Comma-separated list of every accepted value
    pub fn variants() -> String {
        Self::ALL
            .iter()
            .map(Framework::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("Invalid framework: {}. Must be one of: {}", s, Self::variants())
        })
    }
}

/// How sure a detection is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Reserved for heuristics weaker than a dependency match
    Low,
    /// Framework present, deployment mode ambiguous
    Medium,
    /// Framework and deployment adapter both present
    High,
}

/// One framework found in a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkDetection {
    pub framework: Framework,
    pub confidence: Confidence,
    /// Evidence, in the order it was checked
    pub indicators: Vec<String>,
}

impl FrameworkDetection {
    fn new(framework: Framework, confidence: Confidence, indicators: &[&str]) -> Self {
        Self {
            framework,
            confidence,
            indicators: indicators.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Outcome of checking a requested framework against the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkValidation {
    pub valid: bool,
    pub warnings: Vec<String>,
}

type Rule = fn(&BTreeMap<&str, &str>) -> Option<FrameworkDetection>;

/// Detection rules, applied in order
const RULES: [Rule; 3] = [detect_astro, detect_remix, detect_svelte];

fn detect_astro(deps: &BTreeMap<&str, &str>) -> Option<FrameworkDetection> {
    if !deps.contains_key("astro") {
        return None;
    }

    Some(if deps.contains_key("@astrojs/cloudflare") {
        FrameworkDetection::new(
            Framework::AstroSsr,
            Confidence::High,
            &["astro dependency", "@astrojs/cloudflare adapter"],
        )
    } else {
        FrameworkDetection::new(
            Framework::AstroSsg,
            Confidence::High,
            &["astro dependency", "no SSR adapter"],
        )
    })
}

fn detect_remix(deps: &BTreeMap<&str, &str>) -> Option<FrameworkDetection> {
    deps.keys()
        .any(|name| name.starts_with("@remix-run/"))
        .then(|| {
            FrameworkDetection::new(
                Framework::Remix,
                Confidence::High,
                &["@remix-run/ dependencies"],
            )
        })
}

fn detect_svelte(deps: &BTreeMap<&str, &str>) -> Option<FrameworkDetection> {
    if !deps.contains_key("@sveltejs/kit") {
        return None;
    }

    Some(if deps.contains_key("@sveltejs/adapter-static") {
        FrameworkDetection::new(
            Framework::SvelteSsg,
            Confidence::High,
            &["@sveltejs/kit dependency", "@sveltejs/adapter-static"],
        )
    } else if deps.contains_key("@sveltejs/adapter-cloudflare") {
        FrameworkDetection::new(
            Framework::SvelteSsr,
            Confidence::High,
            &["@sveltejs/kit dependency", "@sveltejs/adapter-cloudflare"],
        )
    } else {
        FrameworkDetection::new(
            Framework::SvelteSsg,
            Confidence::Medium,
            &["@sveltejs/kit dependency", "no specific adapter"],
        )
    })
}

/// Apply every rule to an already-parsed manifest
pub fn detect_in_manifest(manifest: &PackageJson) -> Vec<FrameworkDetection> {
    let deps = manifest.all_dependencies();
    RULES.iter().filter_map(|rule| rule(&deps)).collect()
}

/// Detects frameworks from a project's manifest
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectDetector;

impl ProjectDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect all frameworks in the project.
    ///
    /// Fails only when `package.json` cannot be read or parsed.
    #[instrument(skip_all, fields(path = %project_path.display()))]
    pub async fn detect_frameworks(&self, project_path: &Path) -> Result<Vec<FrameworkDetection>> {
        let manifest = PackageJson::load(project_path).await?;
        let detections = detect_in_manifest(&manifest);

        debug!(
            frameworks = ?detections.iter().map(|d| d.framework.as_str()).collect::<Vec<_>>(),
            "framework detection finished"
        );
        Ok(detections)
    }

    /// Check that `framework` is among the detected frameworks.
    ///
    /// Never fails; read errors come back as an invalid result.
    #[instrument(skip_all, fields(path = %project_path.display(), %framework))]
    pub async fn validate_framework(
        &self,
        project_path: &Path,
        framework: Framework,
    ) -> FrameworkValidation {
        let detections = match self.detect_frameworks(project_path).await {
            Ok(detections) => detections,
            Err(e) => {
                warn!(error = %e, "framework validation could not run detection");
                return FrameworkValidation {
                    valid: false,
                    warnings: vec![format!("Error validating framework: {}", e)],
                };
            }
        };

        match detections.iter().find(|d| d.framework == framework) {
            None => {
                let detected = detections
                    .iter()
                    .map(|d| d.framework.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                FrameworkValidation {
                    valid: false,
                    warnings: vec![
                        format!("{} dependencies not found in package.json", framework),
                        format!("Detected frameworks: {}", detected),
                    ],
                }
            }
            Some(detection) => FrameworkValidation {
                valid: true,
                warnings: if detection.confidence == Confidence::Low {
                    vec![format!("{} detected with low confidence", framework)]
                } else {
                    Vec::new()
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manifest(deps: &[&str]) -> PackageJson {
        PackageJson {
            dependencies: deps.iter().map(|d| (d.to_string(), "*".to_string())).collect(),
            ..Default::default()
        }
    }

    fn frameworks(deps: &[&str]) -> Vec<Framework> {
        detect_in_manifest(&manifest(deps))
            .into_iter()
            .map(|d| d.framework)
            .collect()
    }

    fn project(package_json: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("package.json"), package_json).unwrap();
        temp
    }

    #[test]
    fn test_framework_roundtrip() {
        for framework in Framework::ALL {
            assert_eq!(framework.as_str().parse::<Framework>(), Ok(framework));
        }
        let err = "next".parse::<Framework>().unwrap_err();
        assert!(err.contains("astro-ssg, astro-ssr, remix, svelte-ssg, svelte-ssr"));
    }

    #[test]
    fn test_framework_serializes_kebab_case() {
        let json = serde_json::to_string(&Framework::SvelteSsr).unwrap();
        assert_eq!(json, "\"svelte-ssr\"");
    }

    #[test]
    fn test_astro_without_adapter_is_ssg() {
        let detections = detect_in_manifest(&manifest(&["astro"]));
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].framework, Framework::AstroSsg);
        assert_eq!(detections[0].confidence, Confidence::High);
        assert_eq!(detections[0].indicators, vec!["astro dependency", "no SSR adapter"]);
    }

    #[test]
    fn test_astro_with_cloudflare_adapter_is_ssr() {
        assert_eq!(frameworks(&["astro", "@astrojs/cloudflare"]), vec![Framework::AstroSsr]);
    }

    #[test]
    fn test_remix_prefix() {
        assert_eq!(frameworks(&["@remix-run/node"]), vec![Framework::Remix]);
        assert!(frameworks(&["remix-utils"]).is_empty());
    }

    #[test]
    fn test_svelte_adapters() {
        let static_site = detect_in_manifest(&manifest(&["@sveltejs/kit", "@sveltejs/adapter-static"]));
        assert_eq!(static_site[0].framework, Framework::SvelteSsg);
        assert_eq!(static_site[0].confidence, Confidence::High);

        assert_eq!(
            frameworks(&["@sveltejs/kit", "@sveltejs/adapter-cloudflare"]),
            vec![Framework::SvelteSsr]
        );

        let ambiguous = detect_in_manifest(&manifest(&["@sveltejs/kit"]));
        assert_eq!(ambiguous[0].framework, Framework::SvelteSsg);
        assert_eq!(ambiguous[0].confidence, Confidence::Medium);
        assert_eq!(ambiguous[0].indicators[1], "no specific adapter");
    }

    #[test]
    fn test_multiple_frameworks_detected_in_rule_order() {
        assert_eq!(
            frameworks(&["@sveltejs/kit", "astro", "@remix-run/react"]),
            vec![Framework::AstroSsg, Framework::Remix, Framework::SvelteSsg]
        );
    }

    #[test]
    fn test_unrelated_dependency_does_not_change_detection() {
        let before = detect_in_manifest(&manifest(&["astro", "@sveltejs/kit"]));
        let after = detect_in_manifest(&manifest(&["astro", "@sveltejs/kit", "lodash", "react"]));
        assert_eq!(before, after);
    }

    #[test]
    fn test_dev_dependencies_count() {
        let pkg = PackageJson::parse(r#"{ "devDependencies": { "astro": "^4.0.0" } }"#).unwrap();
        assert_eq!(detect_in_manifest(&pkg)[0].framework, Framework::AstroSsg);
    }

    #[tokio::test]
    async fn test_detect_frameworks_requires_manifest() {
        let temp = TempDir::new().unwrap();
        assert!(ProjectDetector::new().detect_frameworks(temp.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_null_dev_dependencies_still_detect() {
        let temp = project(
            r#"{ "name": 7, "dependencies": { "astro": "^4.0.0" }, "devDependencies": null }"#,
        );
        let detections = ProjectDetector::new()
            .detect_frameworks(temp.path())
            .await
            .unwrap();

        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].framework, Framework::AstroSsg);
    }

    #[tokio::test]
    async fn test_validate_matches_detection() {
        let temp = project(r#"{ "dependencies": { "astro": "^4.0.0" } }"#);
        let detector = ProjectDetector::new();
        let detected: Vec<_> = detector
            .detect_frameworks(temp.path())
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.framework)
            .collect();

        for framework in Framework::ALL {
            let validation = detector.validate_framework(temp.path(), framework).await;
            assert_eq!(validation.valid, detected.contains(&framework), "{}", framework);
        }
    }

    #[tokio::test]
    async fn test_validate_mismatch_lists_detected() {
        let temp = project(r#"{ "dependencies": { "@sveltejs/kit": "^2.0.0" } }"#);
        let validation = ProjectDetector::new()
            .validate_framework(temp.path(), Framework::AstroSsg)
            .await;

        assert!(!validation.valid);
        assert_eq!(
            validation.warnings,
            vec![
                "astro-ssg dependencies not found in package.json".to_string(),
                "Detected frameworks: svelte-ssg".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_validate_captures_read_errors() {
        let temp = TempDir::new().unwrap();
        let validation = ProjectDetector::new()
            .validate_framework(temp.path(), Framework::AstroSsg)
            .await;

        assert!(!validation.valid);
        assert_eq!(validation.warnings.len(), 1);
        assert!(validation.warnings[0].starts_with("Error validating framework:"));
    }
}
