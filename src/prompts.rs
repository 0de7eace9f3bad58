// Prompt templates for the summary chain and query expansion

use crate::error::{Result, WebWaddleError};

/// Summarize search context into a cited answer. Variables: `context`, `question`.
pub const SUMMARY_PROMPT: &str = r#"{context}

Using the above search results, answer the following question or topic: "{question}".

Write an objective, well-structured answer of a few paragraphs. Only use facts that appear in the search results; if they do not answer the question, say so plainly.
After each claim, cite the source URL it came from in parentheses. Finish with a "Sources" list of every URL you cited."#;

/// Turn a question into search queries. Variable: `question`.
pub const QUERY_PROMPT: &str = r#"Given the question: '{question}', write 3 unique web search queries that will help in forming an objective opinion or understanding.
Ensure that your queries are diverse and cover different aspects or perspectives related to the question.
Format your response as a JSON list of strings in the following format: ["query 1", "query 2", "query 3"].
Respond with the JSON list only."#;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A prompt with `{name}` placeholders
///
/// `{{` and `}}` produce literal braces. A brace that does not open a valid
/// placeholder is kept as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn new(template: &str) -> Self {
        Self {
            segments: parse_segments(template),
        }
    }

    pub fn summary() -> Self {
        Self::new(SUMMARY_PROMPT)
    }

    pub fn query_expansion() -> Self {
        Self::new(QUERY_PROMPT)
    }

    /// Placeholder names in order of first appearance
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Variable(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitute every placeholder
    ///
    /// # Errors
    /// - `TemplateError` naming the first placeholder without a value
    pub fn format(&self, values: &[(&str, &str)]) -> Result<String> {
        let mut out = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value = values
                        .iter()
                        .find(|(k, _)| k == name)
                        .map(|(_, v)| *v)
                        .ok_or_else(|| {
                            WebWaddleError::TemplateError(format!(
                                "missing value for '{{{}}}'",
                                name
                            ))
                        })?;
                    out.push_str(value);
                }
            }
        }

        Ok(out)
    }
}

fn parse_segments(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        if rest.starts_with("{{") {
            literal.push('{');
            rest = &rest[2..];
            continue;
        }
        if rest.starts_with("}}") {
            literal.push('}');
            rest = &rest[2..];
            continue;
        }
        if c == '{' {
            if let Some(end) = rest.find('}') {
                let name = &rest[1..end];
                if is_identifier(name) {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Variable(name.to_string()));
                    rest = &rest[end + 1..];
                    continue;
                }
            }
        }

        literal.push(c);
        rest = &rest[c.len_utf8()..];
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    segments
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Decode the model's list of search queries
///
/// Reads the outermost `[ ... ]` span as a JSON array of strings, so prose or
/// code fences around the list are tolerated. Blank and repeated queries are
/// dropped.
///
/// # Errors
/// - `ParseError` if there is no array or it holds no usable query
pub fn parse_query_list(text: &str) -> Result<Vec<String>> {
    let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) else {
        return Err(WebWaddleError::ParseError(format!(
            "no JSON list in model output: {}",
            text.trim()
        )));
    };
    if end < start {
        return Err(WebWaddleError::ParseError(
            "malformed JSON list in model output".to_string(),
        ));
    }

    let raw: Vec<String> = serde_json::from_str(&text[start..=end])
        .map_err(|e| WebWaddleError::ParseError(format!("query list is not valid JSON: {}", e)))?;

    let mut queries: Vec<String> = Vec::new();
    for query in raw {
        let query = query.trim().to_string();
        if !query.is_empty() && !queries.contains(&query) {
            queries.push(query);
        }
    }

    if queries.is_empty() {
        return Err(WebWaddleError::ParseError(
            "model returned an empty query list".to_string(),
        ));
    }

    Ok(queries)
}
