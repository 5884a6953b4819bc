use std::collections::BTreeMap;

use serde::Deserialize;

/// The request field an entity label feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Institute,
    Course,
    Category,
    Rank,
}

/// Lookup table from entity label to request field.
///
/// Labels are stored upper-cased and matched case-insensitively. The default
/// routes `GPE` and `NORP` to the course field, as the first version of the
/// assistant did; override it from the config file to change that.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, Field>")]
pub struct LabelMap {
    routes: BTreeMap<String, Field>,
}

impl Default for LabelMap {
    fn default() -> Self {
        [
            ("ORG", Field::Institute),
            ("COURSE", Field::Course),
            ("GPE", Field::Course),
            ("NORP", Field::Course),
            ("CATEGORY", Field::Category),
            ("CARDINAL", Field::Rank),
        ]
        .into_iter()
        .map(|(label, field)| (label.to_string(), field))
        .collect::<BTreeMap<_, _>>()
        .into()
    }
}

impl From<BTreeMap<String, Field>> for LabelMap {
    fn from(routes: BTreeMap<String, Field>) -> Self {
        Self {
            routes: routes
                .into_iter()
                .map(|(label, field)| (label.trim().to_ascii_uppercase(), field))
                .collect(),
        }
    }
}

impl LabelMap {
    /// Field for `label`, or `None` when the label is ignored.
    pub fn field_for(&self, label: &str) -> Option<Field> {
        self.routes.get(&label.trim().to_ascii_uppercase()).copied()
    }
}
