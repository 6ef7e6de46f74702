//! Fixed, ordered test-case catalogue.
//!
//! Order is part of the contract: a case's position becomes its `id` in the
//! vector file and validators cross-reference by that id. Duplicated inputs
//! are kept as separate cases.

use crate::selector::{PartSelector, Theme, CHARACTER_NAMES, PART_CODES};
use crate::serializer::VectorRecord;
use crate::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One scenario to replay through the algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Human-readable name, used only for progress output.
    pub label: String,
    /// Seed text fed to the algorithm.
    pub identity: String,
    /// Omit the background layer.
    pub suppress_background: bool,
    /// Absent means hash-derived selection.
    pub forced_variant: Option<PartSelector>,
}

impl TestCase {
    pub fn plain(label: &str, identity: &str) -> Self {
        TestCase {
            label: label.to_string(),
            identity: identity.to_string(),
            suppress_background: false,
            forced_variant: None,
        }
    }

    pub fn sans_background(label: &str, identity: &str) -> Self {
        TestCase {
            suppress_background: true,
            ..TestCase::plain(label, identity)
        }
    }

    pub fn forced(label: &str, identity: &str, part: &str, theme: Theme) -> Self {
        TestCase {
            forced_variant: Some(PartSelector::new(part, theme)),
            ..TestCase::plain(label, identity)
        }
    }
}

/// How much of the variant space to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageMode {
    /// Hand-curated cases only.
    Sampled,
    /// Hand-curated cases followed by the part x theme x background product.
    #[default]
    Full,
}

impl CoverageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageMode::Sampled => "sampled",
            CoverageMode::Full => "full",
        }
    }
}

impl fmt::Display for CoverageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverageMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sampled" => Ok(CoverageMode::Sampled),
            "full" => Ok(CoverageMode::Full),
            other => Err(format!(
                "unknown coverage mode '{}', expected 'sampled' or 'full'",
                other
            )),
        }
    }
}

/// Ordered list of cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
    cases: Vec<TestCase>,
}

impl Catalogue {
    /// Build the built-in catalogue for a coverage mode.
    pub fn new(mode: CoverageMode) -> Self {
        let mut cases = sampled_cases();
        if mode == CoverageMode::Full {
            cases.extend(cross_product_cases());
        }
        Catalogue { cases }
    }

    /// Wrap an explicit case list. An empty list cannot produce a vector file.
    pub fn from_cases(cases: Vec<TestCase>) -> Result<Self> {
        if cases.is_empty() {
            return Err(HarnessError::EmptyCatalogue);
        }
        Ok(Catalogue { cases })
    }

    /// Rebuild the cases echoed in a vector file, in file order.
    pub fn from_records(records: &[VectorRecord]) -> Result<Self> {
        let cases = records
            .iter()
            .map(|r| TestCase {
                label: format!("vector {}", r.id),
                identity: r.input.clone(),
                suppress_background: r.sans_env,
                forced_variant: r.version.clone(),
            })
            .collect();
        Catalogue::from_cases(cases)
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

fn sampled_cases() -> Vec<TestCase> {
    let mut cases = vec![
        // Basic names
        TestCase::plain("basic: two words", "Binx Bond"),
        TestCase::plain("basic: test user", "Test User"),
        TestCase::plain("basic: Alice", "Alice"),
        TestCase::plain("basic: Bob", "Bob"),
        // Background suppressed
        TestCase::sans_background("sans background: Example", "Example"),
        TestCase::sans_background("sans background: No Background", "No Background"),
        // Degenerate and case variants
        TestCase::plain("empty identity", ""),
        TestCase::plain("lowercase", "test"),
        TestCase::plain("uppercase", "TEST"),
        // Special characters
        TestCase::plain("email", "user@example.com"),
        TestCase::plain("punctuation and digits", "User Name 123!"),
        TestCase::plain("multi-byte script", "测试用户"),
        TestCase::plain("dashes", "user-with-dashes"),
    ];

    for code in PART_CODES {
        cases.push(TestCase::forced(
            &format!("forced part {} theme A", code),
            "Test",
            code,
            Theme::A,
        ));
    }

    for theme in Theme::ALL {
        cases.push(TestCase::forced(
            &format!("forced part 01 theme {}", theme),
            "Theme",
            "01",
            theme,
        ));
    }

    cases.extend([
        TestCase::plain(
            "long phrase",
            "This is a longer test string with multiple words",
        ),
        TestCase::plain("dotted email", "john.doe@example.com"),
        TestCase::plain("digits only", "12345"),
        TestCase::plain("alphanumeric", "User123"),
    ]);

    cases
}

fn cross_product_cases() -> Vec<TestCase> {
    let mut cases = Vec::with_capacity(PART_CODES.len() * Theme::ALL.len() * 2);
    for (code, name) in PART_CODES.iter().zip(CHARACTER_NAMES) {
        for theme in Theme::ALL {
            let with_env = format!("{} - Theme {}", name, theme);
            cases.push(TestCase::forced(&with_env, &with_env, code, theme));

            let sans_env = format!("{} - Theme {} (no background)", name, theme);
            cases.push(TestCase {
                suppress_background: true,
                ..TestCase::forced(&sans_env, &sans_env, code, theme)
            });
        }
    }
    cases
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_sampled_size() {
        assert_eq!(Catalogue::new(CoverageMode::Sampled).len(), 36);
    }

    #[test]
    fn test_full_is_sampled_plus_cross_product() {
        let sampled = Catalogue::new(CoverageMode::Sampled);
        let full = Catalogue::new(CoverageMode::Full);
        assert_eq!(full.len(), 36 + 96);
        assert_eq!(&full.cases()[..36], sampled.cases());
    }

    #[test]
    fn test_every_part_and_theme_covered_in_sampled() {
        let cat = Catalogue::new(CoverageMode::Sampled);
        let parts: BTreeSet<&str> = cat
            .cases()
            .iter()
            .filter_map(|c| c.forced_variant.as_ref())
            .map(|v| v.part.as_str())
            .collect();
        let themes: BTreeSet<Theme> = cat
            .cases()
            .iter()
            .filter_map(|c| c.forced_variant.as_ref())
            .map(|v| v.theme)
            .collect();
        assert_eq!(parts.len(), 16);
        assert!(PART_CODES.iter().all(|p| parts.contains(p)));
        assert_eq!(themes.len(), 3);
    }

    #[test]
    fn test_required_equivalence_classes_present() {
        let cat = Catalogue::new(CoverageMode::Sampled);
        let cases = cat.cases();
        assert!(cases.iter().any(|c| c.identity.is_empty()));
        assert!(
            cases
                .iter()
                .filter(|c| c.suppress_background && c.forced_variant.is_none())
                .count()
                >= 2
        );
        assert!(cases.iter().any(|c| !c.identity.is_ascii()));
        assert!(cases
            .iter()
            .any(|c| c.identity.chars().any(|ch| ch.is_ascii_punctuation())));
        assert!(cases.iter().any(|c| c.identity.split_whitespace().count() > 3));
    }

    #[test]
    fn test_cross_product_order_and_shape() {
        let full = Catalogue::new(CoverageMode::Full);
        let product = &full.cases()[36..];
        assert_eq!(product[0].identity, "Robo - Theme A");
        assert!(!product[0].suppress_background);
        assert_eq!(product[1].identity, "Robo - Theme A (no background)");
        assert!(product[1].suppress_background);
        assert_eq!(
            product[1].forced_variant,
            Some(PartSelector::new("00", Theme::A))
        );
        let last = product.last().expect("non-empty product");
        assert_eq!(last.identity, "Street - Theme C (no background)");
        assert_eq!(last.forced_variant, Some(PartSelector::new("15", Theme::C)));

        let distinct: BTreeSet<(String, bool, Theme)> = product
            .iter()
            .map(|c| {
                let v = c.forced_variant.as_ref().expect("forced");
                (v.part.clone(), c.suppress_background, v.theme)
            })
            .collect();
        assert_eq!(distinct.len(), 96);
    }

    #[test]
    fn test_catalogue_is_stable_across_builds() {
        assert_eq!(
            Catalogue::new(CoverageMode::Full),
            Catalogue::new(CoverageMode::Full)
        );
    }

    #[test]
    fn test_duplicates_are_not_collapsed() {
        let case = TestCase::plain("dup", "same");
        let cat = Catalogue::from_cases(vec![case.clone(), case]).expect("catalogue");
        assert_eq!(cat.len(), 2);
    }

    #[test]
    fn test_empty_catalogue_rejected() {
        assert!(matches!(
            Catalogue::from_cases(Vec::new()),
            Err(HarnessError::EmptyCatalogue)
        ));
    }

    #[test]
    fn test_coverage_mode_parse() {
        assert_eq!("full".parse::<CoverageMode>(), Ok(CoverageMode::Full));
        assert_eq!(" Sampled ".parse::<CoverageMode>(), Ok(CoverageMode::Sampled));
        assert!("exhaustive".parse::<CoverageMode>().is_err());
        assert_eq!(CoverageMode::default(), CoverageMode::Full);
    }
}
