//! Prompt construction for the reply generator

use retail_agent_core::{CatalogSnapshot, ExtractedConstraints, ScoredProduct};

/// Sectioned prompt builder
pub struct PromptBuilder {
    sections: Vec<String>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Shop assistant instructions
    pub fn system_prompt(mut self) -> Self {
        self.sections.push(
            r#"You are a sales assistant in a computer hardware shop.

## Rules
- Recommend only products listed in the catalog section, with their exact names
- Quote prices exactly as listed, followed by "$"
- Never invent products, prices or discounts
- If nothing fits, say so and suggest adjusting the budget or category
- Answer in the language of the customer's message, briefly"#
                .to_string(),
        );
        self
    }

    /// What the customer is looking for
    pub fn with_constraints(mut self, constraints: &ExtractedConstraints) -> Self {
        if !constraints.is_empty() {
            self.sections
                .push(format!("## Customer Requirements\n{}", constraints));
        }
        self
    }

    /// Filtered textual catalog
    pub fn with_catalog(mut self, label: &str, catalog: &CatalogSnapshot) -> Self {
        if !catalog.is_empty() {
            self.sections.push(format!(
                "## Catalog ({})\n{}\n\nThis is the complete list of products you may mention.",
                label,
                catalog.to_text()
            ));
        }
        self
    }

    /// Ranked typed search hits, used when no textual catalog exists
    pub fn with_ranked_products(mut self, results: &[ScoredProduct]) -> Self {
        if !results.is_empty() {
            let lines: Vec<String> = results
                .iter()
                .map(|r| {
                    let mut line = format!("{}, {:.2}$", r.product.name, r.product.price);
                    if !r.product.category.is_empty() {
                        line.push_str(&format!(" [{}]", r.product.category));
                    }
                    if !r.product.is_available() {
                        line.push_str(" (out of stock)");
                    }
                    line
                })
                .collect();
            self.sections.push(format!(
                "## Matching Products\n{}\n\nThis is the complete list of products you may mention.",
                lines.join("\n")
            ));
        }
        self
    }

    pub fn user_message(mut self, message: &str) -> Self {
        self.sections.push(format!("## Customer Message\n{}", message));
        self
    }

    pub fn build(self) -> String {
        self.sections.join("\n\n")
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retail_agent_core::{Category, Product};

    #[test]
    fn test_prompt_sections() {
        let constraints = ExtractedConstraints {
            budget: Some(200),
            category: Some(Category::Cpu),
            ..Default::default()
        };
        let catalog = CatalogSnapshot::from_lines(["CPU", "Intel i5 13400F,154.00"]);
        let prompt = PromptBuilder::new()
            .system_prompt()
            .with_constraints(&constraints)
            .with_catalog("main", &catalog)
            .user_message("protsessor kerak")
            .build();

        assert!(prompt.starts_with("You are a sales assistant"));
        assert!(prompt.contains("budget<=200$, category=CPU"));
        assert!(prompt.contains("## Catalog (main)\nCPU\nIntel i5 13400F,154.00"));
        assert!(prompt.ends_with("## Customer Message\nprotsessor kerak"));
    }

    #[test]
    fn test_empty_sections_skipped() {
        let prompt = PromptBuilder::new()
            .with_constraints(&ExtractedConstraints::default())
            .with_catalog("main", &CatalogSnapshot::default())
            .with_ranked_products(&[])
            .user_message("salom")
            .build();
        assert_eq!(prompt, "## Customer Message\nsalom");
    }

    #[test]
    fn test_ranked_products_section() {
        let results = vec![ScoredProduct {
            product: Product::new("1", "RTX 4060", 300.0).with_category("GPU").with_stock(3),
            score: 10.0,
        }];
        let prompt = PromptBuilder::new().with_ranked_products(&results).build();
        assert!(prompt.contains("RTX 4060, 300.00$ [GPU]"));
        assert!(!prompt.contains("out of stock"));
    }
}
