use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a column the assistant does not interpret
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Columns – where the four interpreted fields live in the source file
// ---------------------------------------------------------------------------

/// Header names of the interpreted columns. Defaults follow the MCC
/// all-India allotment spreadsheet (including its "Alloted" spelling).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Columns {
    pub institute: String,
    pub course: String,
    pub category: String,
    pub rank: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            institute: "Allotted Institute".to_string(),
            course: "Course Alloted".to_string(),
            category: "Candidate Category".to_string(),
            rank: "Rank".to_string(),
        }
    }
}

impl Columns {
    /// The interpreted column names in display order.
    pub fn names(&self) -> [&str; 4] {
        [
            self.institute.as_str(),
            self.course.as_str(),
            self.category.as_str(),
            self.rank.as_str(),
        ]
    }

    /// Whether `header` is one of the four interpreted columns.
    pub fn is_interpreted(&self, header: &str) -> bool {
        self.names().contains(&header)
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the allotment table
// ---------------------------------------------------------------------------

/// A single allotment (one row of the source spreadsheet).
///
/// Missing cells are `None` and never satisfy a filter predicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub institute: Option<String>,
    pub course: Option<String>,
    pub category: Option<String>,
    pub rank: Option<i64>,
    /// Remaining columns, aligned with [`Table::extra_columns`].
    pub extra: Vec<CellValue>,
}

impl Record {
    pub fn new(institute: &str, course: &str, category: &str, rank: i64) -> Self {
        Self {
            institute: Some(institute.to_string()),
            course: Some(course.to_string()),
            category: Some(category.to_string()),
            rank: Some(rank),
            extra: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed allotment table. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// All records in source order.
    pub records: Vec<Record>,
    /// Header names of the interpreted columns.
    pub columns: Columns,
    /// Ordered names of the columns kept in [`Record::extra`].
    pub extra_columns: Vec<String>,
    /// Distinct non-empty course values.
    pub courses: BTreeSet<String>,
    /// Distinct non-empty category values.
    pub categories: BTreeSet<String>,
}

impl Table {
    /// Build the distinct-value indices from loaded records.
    pub fn from_records(records: Vec<Record>, columns: Columns, extra_columns: Vec<String>) -> Self {
        let mut courses = BTreeSet::new();
        let mut categories = BTreeSet::new();

        for rec in &records {
            if let Some(course) = &rec.course {
                courses.insert(course.clone());
            }
            if let Some(category) = &rec.category {
                categories.insert(category.clone());
            }
        }

        Table {
            records,
            columns,
            extra_columns,
            courses,
            categories,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All column headers in display order: interpreted columns first, then extras.
    pub fn headers(&self) -> Vec<String> {
        self.columns
            .names()
            .iter()
            .map(|s| s.to_string())
            .chain(self.extra_columns.iter().cloned())
            .collect()
    }

    /// Render one record as display strings aligned with [`Table::headers`].
    pub fn row_cells(&self, rec: &Record) -> Vec<String> {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let mut cells = vec![
            text(&rec.institute),
            text(&rec.course),
            text(&rec.category),
            rec.rank.map(|r| r.to_string()).unwrap_or_default(),
        ];
        cells.extend(rec.extra.iter().map(|c| c.to_string()));
        cells
    }
}
