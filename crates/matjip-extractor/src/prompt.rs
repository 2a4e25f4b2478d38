//! LLM prompt for caption extraction

use matjip_domain::Category;

/// Builds the extraction prompt for one caption
///
/// The caption is always the last segment of the prompt, verbatim.
pub struct PromptBuilder<'a> {
    caption: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(caption: &'a str) -> Self {
        Self { caption }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(EXTRACTION_INSTRUCTIONS.len() + self.caption.len() + 256);

        // 1. Task
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Permitted categories
        prompt.push_str("Allowed category values (use exactly one): ");
        prompt.push_str(&Category::labels());
        prompt.push_str("\n\n");

        // 3. Output format
        prompt.push_str(OUTPUT_FORMAT);
        prompt.push_str("\n\n");

        // 4. The caption, last
        prompt.push_str("Caption:\n");
        prompt.push_str(self.caption);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract the restaurant name and full street address from the following Instagram reel caption.
The caption may be written in Korean or English and may contain hashtags, emoji and menu descriptions.
Copy the name and address as they appear in the caption; do not translate them.
Pick the category that best describes the restaurant."#;

const OUTPUT_FORMAT: &str = r#"Respond with a single JSON object and nothing else. No markdown code blocks, no explanations.
Format:
{
  "name": "restaurant name",
  "address": "full address",
  "category": "one allowed category value"
}"#;
