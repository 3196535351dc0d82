//! Version resolution engine
//!
//! Turns a tool request plus the backend's installed and released version
//! lists into one concrete version. The engine is backend-agnostic: it only
//! ever sees the two string lists.
//!
//! Resolution order:
//! 1. Reinterpret bare `""`/`"latest"`/`"installed"` requests that arrived
//!    without a `:suffix` into absolute-latest requests.
//! 2. Absolute latest: first entry of the version-aware-sorted list.
//! 3. Exact match against installed versions short-circuits any strategy.
//! 4. Strict requires an exact released match.
//! 5. LatestInstalled / LatestReleased scan sorted lists for the first
//!    textual prefix match.
//!
//! Prefix matching is purely textual; "2" matches "2.0.1" and "20.1.0"
//! alike, it is the sort order that makes the newest win.

use semver::Version;

use crate::error::NoMatchingVersion;
use crate::request::{ResolutionStrategy, ToolRequest};

/// A concrete version picked for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionResolution {
    /// The resolved version string, always taken verbatim from the
    /// installed or released list
    pub version: String,
    /// Whether the version parses as (loose) semver
    pub is_semver: bool,
    /// Parsed semver value when `is_semver` is true
    pub semver: Option<Version>,
    /// Whether the version is already installed
    pub installed: bool,
}

impl VersionResolution {
    fn new(version: &str, installed: bool) -> Self {
        let parsed = parse_loose(version);
        Self {
            version: version.to_string(),
            is_semver: parsed.is_some(),
            semver: parsed,
            installed,
        }
    }
}

/// Resolve a request against the backend's version lists
pub fn resolve(
    request: &ToolRequest,
    installed: &[String],
    released: &[String],
) -> Result<VersionResolution, NoMatchingVersion> {
    let requested = request.version.trim();

    // Bare "", "latest" and "installed" only mean absolute-latest when they
    // arrived without a :suffix (the suffix already fixed the strategy)
    if request.strategy == ResolutionStrategy::Strict {
        match requested {
            "installed" => {
                return sort_versions_desc(installed)
                    .first()
                    .map(|v| VersionResolution::new(v, true))
                    .ok_or_else(|| no_match(&request.tool, requested, installed));
            }
            "" | "latest" => {
                return sort_versions_desc(released)
                    .first()
                    .map(|v| VersionResolution::new(v, installed.iter().any(|i| i == v)))
                    .ok_or_else(|| no_match(&request.tool, requested, released));
            }
            _ => {}
        }
    }

    // An exact installed match wins for every strategy, before released
    // versions are even considered
    if installed.iter().any(|v| v == requested) {
        return Ok(VersionResolution::new(requested, true));
    }

    match request.strategy {
        ResolutionStrategy::Strict => {
            if released.iter().any(|v| v == requested) {
                return Ok(VersionResolution::new(requested, false));
            }
            Err(no_match(&request.tool, requested, released))
        }
        ResolutionStrategy::LatestInstalled => {
            if let Some(version) = first_prefix_match(installed, requested) {
                return Ok(VersionResolution::new(&version, true));
            }
            // Fall back to the released list; membership stays a literal
            // string check, which the exact-match above already ruled out
            if let Some(version) = first_prefix_match(released, requested) {
                return Ok(VersionResolution::new(&version, false));
            }
            Err(no_match(&request.tool, requested, released))
        }
        ResolutionStrategy::LatestReleased => {
            if let Some(version) = first_prefix_match(released, requested) {
                let is_installed = installed.iter().any(|v| *v == version);
                return Ok(VersionResolution::new(&version, is_installed));
            }
            Err(no_match(&request.tool, requested, released))
        }
    }
}

/// First entry of the version-aware-sorted list with a literal prefix match
fn first_prefix_match(versions: &[String], requested: &str) -> Option<String> {
    sort_versions_desc(versions)
        .into_iter()
        .find(|v| v.starts_with(requested))
}

fn no_match(tool: &str, requested: &str, available: &[String]) -> NoMatchingVersion {
    NoMatchingVersion {
        tool: tool.to_string(),
        requested: requested.to_string(),
        available: available.to_vec(),
    }
}

/// Sort versions descending, semver-parseable entries first
///
/// The semver subset is ordered by semantic-versioning precedence
/// (pre-releases rank below their final release); the non-parseable subset
/// is ordered lexicographically. A semver entry always ranks above a
/// non-semver entry regardless of text.
pub fn sort_versions_desc(versions: &[String]) -> Vec<String> {
    let mut parseable: Vec<(Version, String)> = Vec::new();
    let mut plain: Vec<String> = Vec::new();

    for version in versions {
        match parse_loose(version) {
            Some(parsed) => parseable.push((parsed, version.clone())),
            None => plain.push(version.clone()),
        }
    }

    parseable.sort_by(|a, b| b.0.cmp(&a.0));
    plain.sort_by(|a, b| b.cmp(a));

    parseable
        .into_iter()
        .map(|(_, version)| version)
        .chain(plain)
        .collect()
}

/// Parse a version leniently as semver
///
/// One- and two-component numeric versions are padded with zeros so that
/// "1.19" compares as 1.19.0. Strings whose leading components are not
/// plain numbers (e.g. "temurin-21.0.0+35.0.LTS") do not parse and land in
/// the lexicographic partition.
pub fn parse_loose(version: &str) -> Option<Version> {
    let version = version.trim();
    if version.is_empty() {
        return None;
    }

    // Pre-release / build metadata starts at the first '-' or '+'
    let core_end = version.find(['-', '+']).unwrap_or(version.len());
    let (core, rest) = version.split_at(core_end);

    let components: Vec<&str> = core.split('.').collect();
    if components.is_empty() || components.len() > 3 {
        return None;
    }
    if !components
        .iter()
        .all(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let mut padded: Vec<&str> = components;
    while padded.len() < 3 {
        padded.push("0");
    }

    Version::parse(&format!("{}{}", padded.join("."), rest)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ToolRequest;

    fn versions(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn request(tool: &str, version: &str, strategy: ResolutionStrategy) -> ToolRequest {
        ToolRequest {
            tool: tool.to_string(),
            version: version.to_string(),
            strategy,
            plugin_override: None,
        }
    }

    // parse_loose

    #[test]
    fn test_parse_loose_two_component() {
        let parsed = parse_loose("1.19").unwrap();
        assert_eq!(parsed, Version::parse("1.19.0").unwrap());
    }

    #[test]
    fn test_parse_loose_bare_integer() {
        let parsed = parse_loose("1").unwrap();
        assert_eq!(parsed, Version::parse("1.0.0").unwrap());
    }

    #[test]
    fn test_parse_loose_full_semver() {
        assert!(parse_loose("20.11.0").is_some());
        assert!(parse_loose("1.0.0-rc1").is_some());
    }

    #[test]
    fn test_parse_loose_rejects_qualifier_strings() {
        assert!(parse_loose("temurin-21.0.0+35.0.LTS").is_none());
        assert!(parse_loose("system").is_none());
        assert!(parse_loose("abc").is_none());
        assert!(parse_loose("").is_none());
        assert!(parse_loose("1.2.3.4").is_none());
    }

    #[test]
    fn test_parse_loose_prerelease_ranks_below_release() {
        let rc = parse_loose("1.0.0-rc1").unwrap();
        let release = parse_loose("1.0.0").unwrap();
        assert!(rc < release);
    }

    // sort_versions_desc

    #[test]
    fn test_sort_semver_before_non_semver() {
        let sorted = sort_versions_desc(&versions(&["abc", "2.0.0", "1.0.0"]));
        assert_eq!(sorted, versions(&["2.0.0", "1.0.0", "abc"]));
    }

    #[test]
    fn test_sort_is_idempotent() {
        let input = versions(&["abc", "2.0.0", "1.0.0", "zzz", "1.19"]);
        let once = sort_versions_desc(&input);
        let twice = sort_versions_desc(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_semver_precedence_not_lexicographic() {
        // 10.0.0 > 9.0.0 despite "1" < "9" textually
        let sorted = sort_versions_desc(&versions(&["9.0.0", "10.0.0"]));
        assert_eq!(sorted, versions(&["10.0.0", "9.0.0"]));
    }

    #[test]
    fn test_sort_non_semver_lexicographic_desc() {
        let sorted = sort_versions_desc(&versions(&["alpha", "zulu", "mike"]));
        assert_eq!(sorted, versions(&["zulu", "mike", "alpha"]));
    }

    // resolve: strict

    #[test]
    fn test_strict_exact_installed() {
        let req = request("nodejs", "20.10.0", ResolutionStrategy::Strict);
        let resolution = resolve(
            &req,
            &versions(&["18.20.8", "20.10.0"]),
            &versions(&["20.11.0"]),
        )
        .unwrap();
        assert_eq!(resolution.version, "20.10.0");
        assert!(resolution.installed);
    }

    #[test]
    fn test_strict_exact_released_only() {
        let req = request("nodejs", "20.11.0", ResolutionStrategy::Strict);
        let resolution = resolve(
            &req,
            &versions(&["18.20.8"]),
            &versions(&["18.20.8", "20.11.0"]),
        )
        .unwrap();
        assert_eq!(resolution.version, "20.11.0");
        assert!(!resolution.installed);
    }

    #[test]
    fn test_strict_no_match_carries_released_list() {
        let req = request("nodejs", "21.0.0", ResolutionStrategy::Strict);
        let released = versions(&["18.20.8", "20.11.0"]);
        let err = resolve(&req, &versions(&["18.20.8"]), &released).unwrap_err();
        assert_eq!(err.requested, "21.0.0");
        assert_eq!(err.available, released);
    }

    #[test]
    fn test_strict_no_partial_match() {
        // "20" must not strict-match "20.11.0"
        let req = request("nodejs", "20", ResolutionStrategy::Strict);
        let result = resolve(&req, &versions(&[]), &versions(&["20.11.0"]));
        assert!(result.is_err());
    }

    // resolve: bare special literals

    #[test]
    fn test_bare_latest_picks_newest_released() {
        let req = request("nodejs", "latest", ResolutionStrategy::Strict);
        let resolution = resolve(
            &req,
            &versions(&["18.20.8"]),
            &versions(&["18.20.8", "20.11.0", "20.10.0"]),
        )
        .unwrap();
        assert_eq!(resolution.version, "20.11.0");
    }

    #[test]
    fn test_empty_version_picks_newest_released() {
        let req = request("nodejs", "", ResolutionStrategy::Strict);
        let resolution = resolve(&req, &versions(&[]), &versions(&["1.0.0", "2.0.0"])).unwrap();
        assert_eq!(resolution.version, "2.0.0");
    }

    #[test]
    fn test_bare_installed_picks_newest_installed() {
        let req = request("nodejs", "installed", ResolutionStrategy::Strict);
        let resolution = resolve(
            &req,
            &versions(&["18.20.8", "20.10.0"]),
            &versions(&["20.11.0"]),
        )
        .unwrap();
        assert_eq!(resolution.version, "20.10.0");
        assert!(resolution.installed);
    }

    #[test]
    fn test_bare_installed_fails_on_empty_installed_list() {
        let req = request("nodejs", "installed", ResolutionStrategy::Strict);
        let err = resolve(&req, &versions(&[]), &versions(&["20.11.0"])).unwrap_err();
        assert_eq!(err.requested, "installed");
        assert!(err.available.is_empty());
    }

    #[test]
    fn test_suffix_set_strategy_skips_reinterpretation() {
        // "latest:installed" parses to ("latest", LatestInstalled); the
        // literal is then a plain prefix request, not an absolute-latest one
        let req = request("nodejs", "latest", ResolutionStrategy::LatestInstalled);
        let result = resolve(&req, &versions(&["18.20.8"]), &versions(&["20.11.0"]));
        assert!(result.is_err());
    }

    // resolve: latest-installed

    #[test]
    fn test_latest_installed_prefers_installed_match() {
        let req = request("nodejs", "20", ResolutionStrategy::LatestInstalled);
        let resolution = resolve(
            &req,
            &versions(&["18.20.8", "20.10.0"]),
            &versions(&["18.20.8", "20.10.0", "20.11.0"]),
        )
        .unwrap();
        assert_eq!(resolution.version, "20.10.0");
        assert!(resolution.installed);
    }

    #[test]
    fn test_latest_installed_golang_scenario() {
        let req = request("golang", "1.22", ResolutionStrategy::LatestInstalled);
        let resolution = resolve(
            &req,
            &versions(&["1.22.12"]),
            &versions(&["1.22.12", "1.23.0"]),
        )
        .unwrap();
        assert_eq!(resolution.version, "1.22.12");
        assert!(resolution.installed);
    }

    #[test]
    fn test_latest_installed_falls_back_to_released() {
        let req = request("nodejs", "22", ResolutionStrategy::LatestInstalled);
        let resolution = resolve(
            &req,
            &versions(&["18.20.8"]),
            &versions(&["18.20.8", "22.1.0", "22.2.0"]),
        )
        .unwrap();
        assert_eq!(resolution.version, "22.2.0");
        assert!(!resolution.installed);
    }

    #[test]
    fn test_latest_installed_no_match_anywhere() {
        let req = request("nodejs", "99", ResolutionStrategy::LatestInstalled);
        let err = resolve(&req, &versions(&["18.20.8"]), &versions(&["20.11.0"])).unwrap_err();
        assert_eq!(err.requested, "99");
    }

    // resolve: latest-released

    #[test]
    fn test_latest_released_picks_newest_matching() {
        let req = request("nodejs", "20", ResolutionStrategy::LatestReleased);
        let resolution = resolve(
            &req,
            &versions(&["18.20.8", "20.10.0"]),
            &versions(&["18.20.8", "20.10.0", "20.11.0"]),
        )
        .unwrap();
        assert_eq!(resolution.version, "20.11.0");
        assert!(!resolution.installed);
    }

    #[test]
    fn test_latest_released_marks_installed_membership() {
        let req = request("nodejs", "18", ResolutionStrategy::LatestReleased);
        let resolution = resolve(
            &req,
            &versions(&["18.20.8"]),
            &versions(&["18.20.8", "20.11.0"]),
        )
        .unwrap();
        assert_eq!(resolution.version, "18.20.8");
        assert!(resolution.installed);
    }

    // prefix matching semantics

    #[test]
    fn test_prefix_match_is_textual_not_numeric() {
        // "2" textually prefixes "20.1.0"; the sorted order makes 20.1.0
        // win over 2.0.1 even though numerically "2.x" might be intended
        let req = request("mytool", "2", ResolutionStrategy::LatestReleased);
        let resolution = resolve(&req, &versions(&[]), &versions(&["2.0.1", "20.1.0"])).unwrap();
        assert_eq!(resolution.version, "20.1.0");
    }

    #[test]
    fn test_exact_installed_match_short_circuits_all_strategies() {
        for strategy in [
            ResolutionStrategy::Strict,
            ResolutionStrategy::LatestInstalled,
            ResolutionStrategy::LatestReleased,
        ] {
            let req = request("mytool", "1.2.3", strategy);
            let resolution = resolve(&req, &versions(&["1.2.3"]), &versions(&[])).unwrap();
            assert_eq!(resolution.version, "1.2.3");
            assert!(resolution.installed);
        }
    }

    #[test]
    fn test_resolution_semver_fields() {
        let req = request("java", "temurin", ResolutionStrategy::LatestReleased);
        let resolution = resolve(
            &req,
            &versions(&[]),
            &versions(&["temurin-21.0.0+35.0.LTS"]),
        )
        .unwrap();
        assert_eq!(resolution.version, "temurin-21.0.0+35.0.LTS");
        assert!(!resolution.is_semver);
        assert!(resolution.semver.is_none());

        let req = request("nodejs", "20", ResolutionStrategy::LatestReleased);
        let resolution = resolve(&req, &versions(&[]), &versions(&["20.11.0"])).unwrap();
        assert!(resolution.is_semver);
        assert!(resolution.semver.is_some());
    }
}
