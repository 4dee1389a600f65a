//! Instruction templates sent to the generation provider.

/// What the user asked notes for.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    Topic { topic: String, subject: String },
    Document { extracted_text: String, topic: Option<String> },
}

impl GenerationRequest {
    pub fn prompt(&self) -> String {
        match self {
            Self::Topic { topic, subject } => topic_prompt(topic, subject),
            Self::Document { extracted_text, topic } => {
                document_prompt(extracted_text, topic.as_deref())
            }
        }
    }
}

pub fn topic_prompt(topic: &str, subject: &str) -> String {
    format!(
        "Create comprehensive notes for {subject} covering the topic: {topic}.
Include:
- Introduction and basic concepts
- Syntax and structure
- Key features and functionality
- Code examples
- Best practices
- Common pitfalls and solutions
- Advanced topics
- Summary and next steps

Format the notes in markdown with proper headings and structure."
    )
}

pub fn document_prompt(extracted_text: &str, topic: Option<&str>) -> String {
    let focus = match topic.map(str::trim).filter(|t| !t.is_empty()) {
        Some(topic) => format!("Focus the notes on the topic: {topic}."),
        None => "No specific topic was given, so create general notes covering the main concepts."
            .to_string(),
    };

    format!(
        "Create comprehensive notes from the following PDF content:
{extracted_text}

{focus}
Include:
- Main concepts and theories
- Key definitions
- Important examples
- Summary of each section
- Key takeaways

Format the notes in markdown with proper headings and structure."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_prompt_mentions_inputs_and_sections() {
        let prompt = GenerationRequest::Topic {
            topic: "Functions".into(),
            subject: "Python".into(),
        }
        .prompt();

        assert!(prompt.contains("Python"));
        assert!(prompt.contains("Functions"));
        for section in ["Syntax and structure", "Best practices", "Common pitfalls", "markdown"] {
            assert!(prompt.contains(section), "missing {section}");
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(topic_prompt("Loops", "Rust"), topic_prompt("Loops", "Rust"));
    }

    #[test]
    fn test_document_prompt_with_and_without_topic() {
        let general = document_prompt("PAGE TEXT", None);
        assert!(general.contains("PAGE TEXT"));
        assert!(general.contains("general notes"));
        assert!(general.contains("Key takeaways"));

        let focused = document_prompt("PAGE TEXT", Some("Thermodynamics"));
        assert!(focused.contains("Focus the notes on the topic: Thermodynamics."));

        let blank = document_prompt("PAGE TEXT", Some("   "));
        assert_eq!(blank, general);
    }
}
