//! The fixed extraction instruction sent with every review.

/// Builds the extraction prompt for one review body.
///
/// The instruction pins the output to a bare JSON array of
/// `{dish, sentiment, quote}` objects so [`crate::parse`] can recover it
/// even when the model wraps it in markdown fences.
pub(crate) fn extraction_prompt(review_text: &str) -> String {
    format!(
        r#"Analyze this restaurant review and extract every named food or drink item it mentions.

Return ONLY a JSON array, nothing else. No explanations, no markdown.
Each element must be an object with exactly these keys:
- "dish": the item name, complete and concise (e.g. "BBQ Pulled Pork Poutine", not "the amazing BBQ Pulled Pork Poutine")
- "sentiment": how the reviewer feels about that item, from 0.0 (hated it) to 1.0 (loved it)
- "quote": the shortest span of the review text that supports the mention

Rules:
- Extract complete dish names (e.g. "Classic Poutine", not just "Poutine")
- Normalize spelling and capitalization (e.g. "tonkatsu" -> "Tonkatsu")
- Skip vague terms like "food", "meal", "dish", "order"
- Skip standalone adjectives without an item name
- Include only actual menu items, not ingredients alone
- If the review mentions no identifiable items, return []

Review:
{review_text}

Output format (ONLY this, nothing else):
[{{"dish": "Dish Name", "sentiment": 0.9, "quote": "supporting text"}}]"#
    )
}
