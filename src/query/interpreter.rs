use super::entity::EntityExtractor;
use super::labels::{Field, LabelMap};
use crate::data::filter::FilterRequest;

/// Turn a free-text question into a [`FilterRequest`].
///
/// Each extracted entity is routed through `labels`; when several entities
/// land on the same field the last one wins. Rank text that is not an integer
/// leaves the rank untouched.
pub fn interpret(query: &str, extractor: &dyn EntityExtractor, labels: &LabelMap) -> FilterRequest {
    let entities = extractor.extract(query);
    log::debug!("Extracted entities from {query:?}: {entities:?}");

    let mut request = FilterRequest::default();
    for ent in entities {
        let text = ent.text.trim();
        if text.is_empty() {
            continue;
        }
        match labels.field_for(&ent.label) {
            Some(Field::Institute) => request.institute = Some(text.to_string()),
            Some(Field::Course) => request.course = Some(text.to_string()),
            Some(Field::Category) => request.category = Some(text.to_string()),
            Some(Field::Rank) => match parse_rank(text) {
                Some(rank) => request.rank = Some(rank),
                None => log::debug!("Ignoring non-integer rank {text:?}"),
            },
            None => {}
        }
    }

    log::debug!("Interpreted {query:?} as {request:?}");
    request
}

/// Integers with optional digit-group commas (`10,000`).
fn parse_rank(text: &str) -> Option<i64> {
    text.replace(',', "").parse().ok()
}
