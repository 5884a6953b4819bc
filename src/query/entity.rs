/// A labelled span of the question text, in spaCy's vocabulary
/// (`ORG`, `CARDINAL`, `GPE`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub label: String,
    pub text: String,
}

impl Entity {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Anything that can tag spans of free text with entity labels.
///
/// Implementations are called once per question and must not assume any
/// state carried over from earlier questions.
pub trait EntityExtractor {
    fn extract(&self, text: &str) -> Vec<Entity>;
}

impl<F> EntityExtractor for F
where
    F: Fn(&str) -> Vec<Entity>,
{
    fn extract(&self, text: &str) -> Vec<Entity> {
        self(text)
    }
}
