use super::model::{Record, Table};

// ---------------------------------------------------------------------------
// FilterRequest: the structured form of one question
// ---------------------------------------------------------------------------

/// Partially-populated query derived from free text.
///
/// A field that is `None` (or an empty string) places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRequest {
    pub institute: Option<String>,
    pub course: Option<String>,
    pub category: Option<String>,
    pub rank: Option<i64>,
}

impl FilterRequest {
    /// Whether no predicate is active.
    pub fn is_empty(&self) -> bool {
        active(&self.institute).is_none()
            && active(&self.course).is_none()
            && active(&self.category).is_none()
            && self.rank.is_none()
    }

    /// Whether `rec` satisfies every active predicate.
    pub fn matches(&self, rec: &Record) -> bool {
        contains_ci(&rec.institute, active(&self.institute))
            && contains_ci(&rec.course, active(&self.course))
            && contains_ci(&rec.category, active(&self.category))
            && rank_within(rec.rank, self.rank)
    }
}

/// Set text fields only count when non-empty.
fn active(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Case-insensitive substring predicate. A missing cell never matches an
/// active needle.
fn contains_ci(cell: &Option<String>, needle: Option<&str>) -> bool {
    match (needle, cell) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(needle), Some(value)) => value.to_lowercase().contains(&needle.to_lowercase()),
    }
}

/// Inclusive upper bound on rank. A missing rank never matches an active bound.
fn rank_within(rank: Option<i64>, bound: Option<i64>) -> bool {
    match (bound, rank) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(bound), Some(rank)) => rank <= bound,
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of records that pass all active predicates, in table order.
pub fn filtered_indices(table: &Table, request: &FilterRequest) -> Vec<usize> {
    if request.is_empty() {
        return (0..table.len()).collect();
    }
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| request.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Return the records that pass all active predicates, in table order.
pub fn filter<'t>(table: &'t Table, request: &FilterRequest) -> Vec<&'t Record> {
    filtered_indices(table, request)
        .into_iter()
        .map(|i| &table.records[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::model::Columns;

    fn two_colleges() -> Table {
        Table::from_records(
            vec![
                Record::new("Alpha Medical College", "MBBS", "General", 500),
                Record::new("Beta Medical College", "MBBS", "SC", 9000),
            ],
            Columns::default(),
            Vec::new(),
        )
    }

    #[test]
    fn rank_bound_keeps_only_better_ranks() {
        let table = two_colleges();
        let request = FilterRequest {
            rank: Some(5000),
            ..Default::default()
        };
        assert_eq!(filter(&table, &request), vec![&table.records[0]]);
    }

    #[test]
    fn institute_match_ignores_case() {
        let table = two_colleges();
        for needle in ["beta", "BETA", "Beta"] {
            let request = FilterRequest {
                institute: Some(needle.to_string()),
                ..Default::default()
            };
            assert_eq!(filter(&table, &request), vec![&table.records[1]]);
        }
    }

    #[test]
    fn empty_request_returns_whole_table_in_order() {
        let table = two_colleges();
        assert_eq!(filtered_indices(&table, &FilterRequest::default()), vec![0, 1]);
    }

    #[test]
    fn empty_strings_are_not_constraints() {
        let table = two_colleges();
        let request = FilterRequest {
            institute: Some(String::new()),
            category: Some(String::new()),
            ..Default::default()
        };
        assert!(request.is_empty());
        assert_eq!(filtered_indices(&table, &request), vec![0, 1]);
    }

    #[test]
    fn rank_bound_is_inclusive() {
        let table = two_colleges();
        let request = FilterRequest {
            rank: Some(9000),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &request), vec![0, 1]);
    }

    #[test]
    fn predicates_combine_with_and() {
        let table = two_colleges();
        let request = FilterRequest {
            course: Some("mbbs".into()),
            category: Some("sc".into()),
            rank: Some(10_000),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &request), vec![1]);
    }

    #[test]
    fn missing_cells_never_match() {
        let mut no_rank = Record::new("Gamma Medical College", "MBBS", "General", 0);
        no_rank.rank = None;
        let mut no_category = Record::new("Gamma Medical College", "MBBS", "General", 100);
        no_category.category = None;
        let table = Table::from_records(vec![no_rank, no_category], Columns::default(), Vec::new());

        let by_rank = FilterRequest {
            rank: Some(1_000_000),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &by_rank), vec![1]);

        let by_category = FilterRequest {
            category: Some("gen".into()),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &by_category), vec![0]);
    }

    // -- Laws over arbitrary tables and requests --

    fn record_strategy() -> impl Strategy<Value = Record> {
        (
            prop::option::of(prop::sample::select(vec![
                "Alpha Medical College",
                "BETA medical college",
                "Gamma Institute of Medical Sciences",
            ])),
            prop::option::of(prop::sample::select(vec!["MBBS", "BDS", "mbbs"])),
            prop::option::of(prop::sample::select(vec!["General", "SC", "OBC", "EWS"])),
            prop::option::of(0i64..20_000),
        )
            .prop_map(|(institute, course, category, rank)| Record {
                institute: institute.map(str::to_string),
                course: course.map(str::to_string),
                category: category.map(str::to_string),
                rank,
                extra: Vec::new(),
            })
    }

    fn request_strategy() -> impl Strategy<Value = FilterRequest> {
        (
            prop::option::of(prop::sample::select(vec!["alpha", "Medical", "GAMMA", "college"])),
            prop::option::of(prop::sample::select(vec!["mbbs", "BDS", "b"])),
            prop::option::of(prop::sample::select(vec!["general", "sc", "E"])),
            prop::option::of(0i64..20_000),
        )
            .prop_map(|(institute, course, category, rank)| FilterRequest {
                institute: institute.map(str::to_string),
                course: course.map(str::to_string),
                category: category.map(str::to_string),
                rank,
            })
    }

    fn holds(request: &FilterRequest, rec: &Record) -> bool {
        let text_ok = |needle: &Option<String>, cell: &Option<String>| match needle {
            None => true,
            Some(n) => cell
                .as_ref()
                .is_some_and(|c| c.to_lowercase().contains(&n.to_lowercase())),
        };
        text_ok(&request.institute, &rec.institute)
            && text_ok(&request.course, &rec.course)
            && text_ok(&request.category, &rec.category)
            && request.rank.is_none_or(|bound| rec.rank.is_some_and(|r| r <= bound))
    }

    proptest! {
        #[test]
        fn prop_unset_request_is_identity(records in prop::collection::vec(record_strategy(), 0..40)) {
            let table = Table::from_records(records, Columns::default(), Vec::new());
            let out: Vec<Record> = filter(&table, &FilterRequest::default()).into_iter().cloned().collect();
            prop_assert_eq!(out, table.records.clone());
        }

        #[test]
        fn prop_filter_is_sound_and_complete(
            records in prop::collection::vec(record_strategy(), 0..40),
            request in request_strategy(),
        ) {
            let table = Table::from_records(records, Columns::default(), Vec::new());
            let got = filtered_indices(&table, &request);
            let expected: Vec<usize> = table
                .records
                .iter()
                .enumerate()
                .filter(|(_, rec)| holds(&request, rec))
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn prop_institute_case_does_not_matter(
            records in prop::collection::vec(record_strategy(), 0..40),
            needle in prop::sample::select(vec!["alpha", "medical", "gamma institute"]),
        ) {
            let table = Table::from_records(records, Columns::default(), Vec::new());
            let lower = FilterRequest { institute: Some(needle.to_string()), ..Default::default() };
            let upper = FilterRequest { institute: Some(needle.to_uppercase()), ..Default::default() };
            prop_assert_eq!(filtered_indices(&table, &lower), filtered_indices(&table, &upper));
        }
    }
}
