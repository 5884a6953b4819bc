use std::path::{Path, PathBuf};
use std::sync::Arc;

use allotment_assistant::answer::{ask, Answer};
use allotment_assistant::config::AppConfig;
use allotment_assistant::data::loader::load_file;
use allotment_assistant::data::model::Table;
use allotment_assistant::query::rules::RuleExtractor;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded table (None until a file is loaded). Shared read-only.
    pub table: Option<Arc<Table>>,

    /// Where `table` came from.
    pub table_path: Option<PathBuf>,

    /// Extractor seeded with the current table's courses and categories.
    pub extractor: RuleExtractor,

    /// Text in the question box.
    pub query: String,

    /// Result of the last submitted question.
    pub answer: Option<Answer>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            extractor: config.extractor(None),
            config,
            table: None,
            table_path: None,
            query: String::new(),
            answer: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded table and rebuild the extractor around it.
    pub fn set_table(&mut self, table: Table, path: PathBuf) {
        self.extractor = self.config.extractor(Some(&table));
        self.table = Some(Arc::new(table));
        self.table_path = Some(path);
        self.answer = None;
        self.status_message = None;
    }

    /// Load `path`, reporting failure in the status bar.
    pub fn load_table(&mut self, path: &Path) {
        match load_file(path, &self.config.columns) {
            Ok(table) => self.set_table(table, path.to_path_buf()),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Answer the text in the question box. A blank box clears the answer.
    pub fn submit(&mut self) {
        let query = self.query.trim();
        self.answer = match &self.table {
            Some(table) if !query.is_empty() => Some(ask(
                table,
                &self.extractor,
                &self.config.labels,
                query,
            )),
            _ => None,
        };
    }

    /// Fill the question box with `question` and answer it.
    pub fn ask_example(&mut self, question: &str) {
        self.query = question.to_string();
        self.submit();
    }
}

#[cfg(test)]
mod tests {
    use allotment_assistant::data::model::{Columns, Record};

    use super::*;

    fn loaded() -> AppState {
        let mut state = AppState::new(AppConfig::default());
        let table = Table::from_records(
            vec![
                Record::new("Alpha Medical College", "MBBS", "General", 500),
                Record::new("Beta Medical College", "BDS", "SC", 9000),
            ],
            Columns::default(),
            Vec::new(),
        );
        state.set_table(table, PathBuf::from("allotments.csv"));
        state
    }

    #[test]
    fn blank_question_is_not_answered() {
        let mut state = loaded();
        state.query = "   ".into();
        state.submit();
        assert!(state.answer.is_none());
    }

    #[test]
    fn example_question_is_answered() {
        let mut state = loaded();
        state.ask_example("My rank is 1000, what colleges can I expect?");
        let answer = state.answer.as_ref().unwrap();
        assert_eq!(answer.request.rank, Some(1000));
        assert_eq!(answer.matches, vec![0]);
    }

    #[test]
    fn missing_file_sets_status() {
        let mut state = AppState::new(AppConfig::default());
        state.load_table(Path::new("definitely/not/here.csv"));
        assert!(state.table.is_none());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error:"));
    }
}
