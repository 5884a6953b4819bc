//! Answer natural-language questions about a medical college seat allotment table.
//!
//! A question goes through the [`query`] layer, which extracts entities and
//! maps them onto a [`FilterRequest`](data::filter::FilterRequest). The
//! [`data`] layer filters the loaded [`Table`](data::model::Table) with it.
//! [`answer`] ties the two together for the front ends.

pub mod answer;
pub mod config;
pub mod data;
pub mod error;
pub mod query;
