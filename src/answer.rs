use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::data::filter::{filtered_indices, FilterRequest};
use crate::data::model::{CellValue, Record, Table};
use crate::query::entity::EntityExtractor;
use crate::query::interpreter::interpret;
use crate::query::labels::LabelMap;

pub const NO_RESULTS: &str = "No results found with the given criteria.";
pub const EMPTY_QUERY: &str = "Enter a query to get the answer.";

/// The outcome of one question: what was understood and which rows matched.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub query: String,
    pub request: FilterRequest,
    /// Indices into the table the question was asked against, in table order.
    pub matches: Vec<usize>,
}

/// Run one question against the table.
pub fn ask(
    table: &Table,
    extractor: &dyn EntityExtractor,
    labels: &LabelMap,
    query: &str,
) -> Answer {
    let request = interpret(query, extractor, labels);
    let matches = filtered_indices(table, &request);
    log::info!("{} of {} allotments match {:?}", matches.len(), table.len(), query);
    Answer {
        query: query.to_string(),
        request,
        matches,
    }
}

impl Answer {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// One-line framing shown above the results.
    pub fn headline(&self) -> String {
        if self.is_empty() {
            return NO_RESULTS.to_string();
        }
        if let Some(rank) = self.request.rank {
            return format!(
                "With a rank of {rank}, you can expect the following colleges and courses:"
            );
        }

        let mut line = format!(
            "To get into {}",
            self.request.institute.as_deref().unwrap_or("these colleges")
        );
        if let Some(course) = &self.request.course {
            line.push_str(&format!(" for the {course} course"));
        }
        if let Some(category) = &self.request.category {
            line.push_str(&format!(" under {category} category"));
        }
        line.push_str(", you should aim for a rank within the following range:");
        line
    }

    /// The matching records of `table`.
    pub fn records<'a, 't: 'a>(&'a self, table: &'t Table) -> impl Iterator<Item = &'t Record> + 'a {
        self.matches.iter().map(move |&i| &table.records[i])
    }

    /// Render the matching rows as a boxed text table.
    pub fn to_text_table(&self, table: &Table) -> Result<String> {
        let rows: Vec<&Record> = self.records(table).collect();
        let text = |get: fn(&Record) -> Option<&str>| -> ArrayRef {
            Arc::new(rows.iter().map(|r| get(r)).collect::<StringArray>())
        };

        let mut arrays: Vec<ArrayRef> = vec![
            text(|r| r.institute.as_deref()),
            text(|r| r.course.as_deref()),
            text(|r| r.category.as_deref()),
            Arc::new(rows.iter().map(|r| r.rank).collect::<Int64Array>()),
        ];
        for col in 0..table.extra_columns.len() {
            let cells: StringArray = rows
                .iter()
                .map(|r| match r.extra.get(col) {
                    None | Some(CellValue::Null) => None,
                    Some(cell) => Some(cell.to_string()),
                })
                .collect();
            arrays.push(Arc::new(cells));
        }

        let fields: Vec<Field> = table
            .headers()
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let dtype = if i == 3 { DataType::Int64 } else { DataType::Utf8 };
                Field::new(name, dtype, true)
            })
            .collect();

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
            .context("building result batch")?;
        let rendered = pretty_format_batches(&[batch]).context("formatting result table")?;
        Ok(rendered.to_string())
    }
}
