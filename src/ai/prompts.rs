//! Prompt templates for Selenium to Playwright conversion

use crate::ai::TargetLanguage;
use crate::models::SourceMetadata;

/// Fixed system prompt
pub struct PromptTemplate;

impl PromptTemplate {
    pub fn system_prompt() -> &'static str {
        "You are an expert in test automation migration.\n\
         Convert Selenium Java code to Playwright TypeScript/JavaScript.\n\
         \n\
         Rules:\n\
         1. Convert Selenium API calls to Playwright equivalents\n\
         2. Use proper async/await syntax\n\
         3. Replace TestNG assertions with Playwright expect\n\
         4. Use Playwright's locator API\n\
         5. Return ONLY the converted code, no explanations\n\
         6. Ensure the output is valid, runnable TypeScript/JavaScript\n\
         \n\
         Selenium to Playwright mappings:\n\
         - driver.findElement(By.id(\"x\")) -> page.locator('#x')\n\
         - sendKeys(\"text\") -> fill('text')\n\
         - click() -> click()\n\
         - getText() -> textContent()\n\
         - driver.get(\"url\") -> page.goto('url')\n\
         - Thread.sleep(ms) -> page.waitForTimeout(ms)\n\
         - @Test -> test('name', async () => {...})\n\
         - Assert.assertEquals(a,b) -> expect(a).toBe(b)\n"
    }
}

/// Builder for the per-file conversion prompt
pub struct ConversionPromptBuilder<'a> {
    source: &'a str,
    metadata: Option<&'a SourceMetadata>,
    language: TargetLanguage,
}

impl<'a> ConversionPromptBuilder<'a> {
    pub fn new(source: &'a str, language: TargetLanguage) -> Self {
        Self {
            source,
            metadata: None,
            language,
        }
    }

    /// Add a structural summary of the file to the prompt
    pub fn metadata(mut self, metadata: &'a SourceMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn build(self) -> String {
        let lang = self.language.display_name();
        let structure = self
            .metadata
            .map(structure_section)
            .unwrap_or_default();

        format!(
            r#"Convert this Selenium Java code to Playwright {lang}.

Original Java code:
```java
{source}
```
{structure}
Provide ONLY the converted Playwright {lang} code. No explanations.

Requirements:
- Use @playwright/test
- Include proper imports
- Use async/await
- Convert all Selenium calls to Playwright equivalents
- Replace TestNG annotations with Playwright test structure
"#,
            lang = lang,
            source = self.source.trim_end(),
            structure = structure,
        )
    }
}

/// Compact outline: class, methods with annotations and their call order
fn structure_section(metadata: &SourceMetadata) -> String {
    if metadata.class_name.is_empty() && metadata.methods.is_empty() {
        return String::new();
    }

    let mut lines = Vec::new();
    if !metadata.class_name.is_empty() {
        lines.push(format!("Class: {}", metadata.class_name));
    }
    if !metadata.uses_test_framework {
        lines.push("No TestNG imports found; keep the test structure as written.".to_string());
    }
    for method in &metadata.methods {
        let annotations = if method.annotations.is_empty() {
            String::new()
        } else {
            let names: Vec<String> = method.annotations.iter().map(|a| format!("@{}", a)).collect();
            format!(" [{}]", names.join(" "))
        };
        lines.push(format!("- {}{}", method.name, annotations));
        for call in &method.calls {
            lines.push(format!("    {}", call.display()));
        }
    }

    format!("\nStructure of the file (calls in execution order):\n{}\n", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CallInfo, MethodDescriptor};

    #[test]
    fn test_system_prompt_has_mappings() {
        let prompt = PromptTemplate::system_prompt();
        assert!(prompt.contains("page.locator('#x')"));
        assert!(prompt.contains("Thread.sleep(ms) -> page.waitForTimeout(ms)"));
    }

    #[test]
    fn test_prompt_embeds_source_and_language() {
        let prompt = ConversionPromptBuilder::new("class A {}\n", TargetLanguage::JavaScript).build();
        assert!(prompt.contains("Playwright JavaScript"));
        assert!(prompt.contains("```java\nclass A {}\n```"));
        assert!(!prompt.contains("Structure of the file"));
    }

    #[test]
    fn test_prompt_includes_call_outline() {
        let metadata = SourceMetadata {
            class_name: "LoginTest".to_string(),
            uses_test_framework: true,
            methods: vec![MethodDescriptor {
                name: "testLogin".to_string(),
                annotations: vec!["Test".to_string()],
                calls: vec![
                    CallInfo::new("get", Some("driver".to_string()), vec!["\"/login\"".to_string()]),
                    CallInfo::new("click", None, vec![]),
                ],
            }],
            ..Default::default()
        };
        let prompt = ConversionPromptBuilder::new("", TargetLanguage::TypeScript)
            .metadata(&metadata)
            .build();

        assert!(prompt.contains("Class: LoginTest"));
        assert!(prompt.contains("- testLogin [@Test]"));
        assert!(prompt.contains("    driver.get(\"/login\")\n    .click()"));
        assert!(!prompt.contains("No TestNG imports"));
    }
}
