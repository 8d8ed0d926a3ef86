//! Import classification
//!
//! Matching is done on dot-delimited segments, so `org.openqa.seleniumx.Foo`
//! is not an automation import even though it shares a character prefix.

/// Packages providing browser control, element interaction and waits
pub const AUTOMATION_PREFIXES: &[&str] = &[
    "org.openqa.selenium",
    "org.openqa.selenium.chrome",
    "org.openqa.selenium.firefox",
    "org.openqa.selenium.support",
    "org.openqa.selenium.support.ui",
    "org.openqa.selenium.interactions",
];

/// Package of the annotation-driven test runner
pub const TEST_FRAMEWORK_MARKER: &str = "org.testng";

/// Annotations the test runner gives meaning to
pub const TEST_FRAMEWORK_ANNOTATIONS: &[&str] = &[
    "Test",
    "BeforeMethod",
    "AfterMethod",
    "BeforeClass",
    "AfterClass",
    "BeforeSuite",
    "AfterSuite",
    "BeforeTest",
    "AfterTest",
    "DataProvider",
];

/// True if `path` starts with `prefix` on a segment boundary
pub fn has_segment_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// True if the segments of `needle` appear contiguously anywhere in `path`
pub fn contains_segments(path: &str, needle: &str) -> bool {
    let haystack: Vec<&str> = path.split('.').collect();
    let needle: Vec<&str> = needle.split('.').collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle.as_slice())
}

pub fn is_automation_import(path: &str) -> bool {
    AUTOMATION_PREFIXES
        .iter()
        .any(|prefix| has_segment_prefix(path, prefix))
}

pub fn is_test_framework_import(path: &str) -> bool {
    contains_segments(path, TEST_FRAMEWORK_MARKER)
}

pub fn is_test_framework_annotation(name: &str) -> bool {
    let simple = name.rsplit('.').next().unwrap_or(name);
    TEST_FRAMEWORK_ANNOTATIONS.contains(&simple)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_automation_imports() {
        assert!(is_automation_import("org.openqa.selenium.By"));
        assert!(is_automation_import("org.openqa.selenium.WebDriver"));
        assert!(is_automation_import("org.openqa.selenium.support.ui.WebDriverWait"));
        assert!(is_automation_import("org.openqa.selenium"));
        assert!(!is_automation_import("java.util.List"));
        assert!(!is_automation_import("org.testng.annotations.Test"));
    }

    #[test]
    fn test_prefix_is_segment_aware() {
        assert!(!is_automation_import("org.openqa.seleniumx.Foo"));
        assert!(!has_segment_prefix("org.openqa.seleniumhq", "org.openqa.selenium"));
        assert!(has_segment_prefix("org.openqa.selenium.By", "org.openqa.selenium"));
    }

    #[test]
    fn test_framework_marker_anywhere() {
        assert!(is_test_framework_import("org.testng.annotations.Test"));
        assert!(is_test_framework_import("org.testng.Assert.assertEquals"));
        assert!(is_test_framework_import("shaded.org.testng.Assert"));
        assert!(!is_test_framework_import("org.testngx.Assert"));
        assert!(!is_test_framework_import("org.junit.Test"));
    }

    #[test]
    fn test_framework_annotations() {
        assert!(is_test_framework_annotation("Test"));
        assert!(is_test_framework_annotation("org.testng.annotations.BeforeMethod"));
        assert!(!is_test_framework_annotation("Override"));
    }
}
