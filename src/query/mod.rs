/// Query layer: from a free-text question to a [`FilterRequest`](crate::data::filter::FilterRequest).
///
/// Architecture:
/// ```text
///   "cutoff for SC at Maulana Azad Medical College?"
///        │
///        ▼
///   ┌────────────────┐
///   │ EntityExtractor │  text → [(label, span)]   (rules, or a stub in tests)
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ LabelMap  │  label → field   (ORG → institute, CARDINAL → rank, ...)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ interpreter  │  last match per field wins → FilterRequest
///   └─────────────┘
/// ```

pub mod entity;
pub mod interpreter;
pub mod labels;
pub mod rules;
