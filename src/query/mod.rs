pub mod filter;
pub mod sort;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::QueryDefaults;
use crate::types::Loan;

pub use sort::{sort_loans, SortField, SortOrder};

use filter::{lenient, LoanFilter};

/// loan search criteria. every field is optional and the set is
/// AND-combined; values that fail to decode are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanQuery {
    #[serde(
        deserialize_with = "lenient",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub count: Option<Decimal>,
    #[serde(deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub property_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(
        deserialize_with = "lenient",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub min_loan_amount: Option<Decimal>,
    #[serde(
        deserialize_with = "lenient",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub max_loan_amount: Option<Decimal>,
    #[serde(
        deserialize_with = "lenient",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub min_ltv: Option<Decimal>,
    #[serde(
        deserialize_with = "lenient",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub max_ltv: Option<Decimal>,
    #[serde(
        deserialize_with = "lenient",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub min_interest_rate: Option<Decimal>,
    #[serde(
        deserialize_with = "lenient",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub max_interest_rate: Option<Decimal>,
    #[serde(deserialize_with = "lenient")]
    pub from_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient")]
    pub to_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient")]
    pub borrower_name: Option<String>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortField>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// query output: one page of loans plus totals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub results: Vec<Loan>,
    pub total_matching: usize,
    pub total_in_collection: usize,
    pub was_filtered: bool,
    pub filters: LoanQuery,
}

impl LoanQuery {
    /// page size after applying defaults. fractional counts truncate toward
    /// zero; zero or negative counts yield an empty page.
    pub fn effective_count(&self, defaults: &QueryDefaults) -> usize {
        match self.count.map(|n| n.trunc()) {
            None => defaults.count,
            Some(n) if n <= Decimal::ZERO => 0,
            Some(n) => n.to_usize().unwrap_or(usize::MAX),
        }
    }
}

/// filter, sort and truncate with the stock defaults (10 / loanDate / desc)
pub fn query(loans: &[Loan], criteria: &LoanQuery) -> QueryResult {
    query_with_defaults(loans, criteria, &QueryDefaults::default())
}

pub fn query_with_defaults(
    loans: &[Loan],
    criteria: &LoanQuery,
    defaults: &QueryDefaults,
) -> QueryResult {
    let filter = LoanFilter::new(criteria);
    let mut matching: Vec<Loan> = loans.iter().filter(|l| filter.matches(l)).cloned().collect();

    let field = criteria.sort_by.unwrap_or(defaults.sort_by);
    let order = criteria.sort_order.unwrap_or(defaults.sort_order);
    sort_loans(&mut matching, field, order);

    let total_matching = matching.len();
    matching.truncate(criteria.effective_count(defaults));

    QueryResult {
        results: matching,
        total_matching,
        total_in_collection: loans.len(),
        was_filtered: total_matching < loans.len(),
        filters: criteria.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Rate};
    use crate::types::LoanStatus;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book() -> Vec<Loan> {
        vec![
            Loan::builder("L001")
                .borrower("John Smith")
                .property_type("Residential")
                .location("California")
                .amount(Money::from_major(250_000))
                .ltv(dec!(75))
                .rate(Rate::from_percent(dec!(6.5)))
                .status(LoanStatus::Funded)
                .loan_date(date(2024, 1, 15))
                .build(),
            Loan::builder("L002")
                .borrower("Sarah Johnson")
                .property_type("Commercial")
                .location("Texas")
                .amount(Money::from_major(1_200_000))
                .ltv(dec!(65))
                .rate(Rate::from_percent(dec!(7.25)))
                .status(LoanStatus::Approved)
                .loan_date(date(2024, 2, 20))
                .build(),
            Loan::builder("L003")
                .borrower("Michael Brown")
                .property_type("Industrial")
                .location("Florida")
                .amount(Money::from_major(850_000))
                .ltv(dec!(80))
                .rate(Rate::from_percent(dec!(8)))
                .status(LoanStatus::Pending)
                .loan_date(date(2023, 11, 5))
                .build(),
            Loan::builder("L004")
                .borrower("Emily Davis")
                .property_type("Residential")
                .location("North Carolina")
                .amount(Money::from_major(250_000))
                .ltv(dec!(55))
                .rate(Rate::from_percent(dec!(5.75)))
                .status(LoanStatus::Funded)
                .loan_date(date(2024, 3, 1))
                .build(),
            Loan::builder("L005")
                .borrower("smith & sons")
                .property_type("Retail")
                .location("Carolina Beach")
                .amount(Money::from_major(400_000))
                .ltv(dec!(70))
                .rate(Rate::from_percent(dec!(6.9)))
                .status(LoanStatus::AllPaid)
                .loan_date(date(2022, 6, 30))
                .build(),
        ]
    }

    fn ids(result: &QueryResult) -> Vec<&str> {
        result.results.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_empty_criteria_returns_everything_newest_first() {
        let loans = book();
        let result = query(&loans, &LoanQuery::default());
        assert_eq!(ids(&result), vec!["L004", "L002", "L001", "L003", "L005"]);
        assert_eq!(result.total_matching, 5);
        assert_eq!(result.total_in_collection, 5);
        assert!(!result.was_filtered);
    }

    #[test]
    fn test_status_substring_matches_funded() {
        let loans = book();
        let criteria = LoanQuery {
            status: Some("fund".to_string()),
            ..LoanQuery::default()
        };
        let result = query(&loans, &criteria);
        assert_eq!(ids(&result), vec!["L004", "L001"]);
        assert_eq!(result.total_matching, 2);
        assert!(result.was_filtered);
    }

    #[test]
    fn test_location_and_borrower_substrings() {
        let loans = book();
        let criteria = LoanQuery {
            location: Some("carolina".to_string()),
            ..LoanQuery::default()
        };
        assert_eq!(ids(&query(&loans, &criteria)), vec!["L004", "L005"]);

        let criteria = LoanQuery {
            borrower_name: Some("SMITH".to_string()),
            sort_by: Some(SortField::Borrower),
            sort_order: Some(SortOrder::Asc),
            ..LoanQuery::default()
        };
        assert_eq!(ids(&query(&loans, &criteria)), vec!["L001", "L005"]);
    }

    #[test]
    fn test_combined_filters_and_count() {
        let loans = book();
        let criteria = LoanQuery {
            min_loan_amount: Some(dec!(250000)),
            max_loan_amount: Some(dec!(900000)),
            min_ltv: Some(dec!(55)),
            max_interest_rate: Some(dec!(7)),
            from_date: Some(date(2023, 1, 1)),
            sort_by: Some(SortField::LoanAmount),
            sort_order: Some(SortOrder::Asc),
            count: Some(Decimal::ONE),
            ..LoanQuery::default()
        };
        let result = query(&loans, &criteria);
        // L001 and L004 tie on amount; original order decides
        assert_eq!(ids(&result), vec!["L001"]);
        assert_eq!(result.total_matching, 2);
        assert!(result.was_filtered);
    }

    #[test]
    fn test_non_positive_count_returns_no_rows() {
        let loans = book();
        for count in [dec!(0), dec!(-3), dec!(0.5)] {
            let criteria = LoanQuery {
                count: Some(count),
                ..LoanQuery::default()
            };
            let result = query(&loans, &criteria);
            assert!(result.results.is_empty());
            assert_eq!(result.total_matching, 5);
            assert!(!result.was_filtered);
        }
    }

    #[test]
    fn test_default_count_truncates_to_ten() {
        let loans: Vec<Loan> = (0..15)
            .map(|i| {
                Loan::builder(format!("L00{}", i + 1))
                    .borrower("B")
                    .amount(Money::from_major(1_000 + i))
                    .rate(Rate::from_percentage(5))
                    .loan_date(date(2024, 1, 1))
                    .build()
            })
            .collect();
        let result = query(&loans, &LoanQuery::default());
        assert_eq!(result.results.len(), 10);
        assert_eq!(result.total_matching, 15);
        assert!(!result.was_filtered);

        let defaults = QueryDefaults {
            count: 3,
            ..QueryDefaults::default()
        };
        let result = query_with_defaults(&loans, &LoanQuery::default(), &defaults);
        assert_eq!(result.results.len(), 3);
    }

    #[test]
    fn test_float_count_truncates() {
        let loans = book();

        let whole: LoanQuery = serde_json::from_str(r#"{"count": 3.0}"#).unwrap();
        assert_eq!(whole.effective_count(&QueryDefaults::default()), 3);
        assert_eq!(query(&loans, &whole).results.len(), 3);

        let fractional: LoanQuery = serde_json::from_str(r#"{"count": 2.5}"#).unwrap();
        assert_eq!(fractional.effective_count(&QueryDefaults::default()), 2);
        assert_eq!(query(&loans, &fractional).results.len(), 2);

        let negative: LoanQuery = serde_json::from_str(r#"{"count": -1.5}"#).unwrap();
        assert!(query(&loans, &negative).results.is_empty());
    }

    #[test]
    fn test_lenient_decoding_treats_bad_values_as_absent() {
        let criteria: LoanQuery = serde_json::from_str(
            r#"{
                "status": "funded",
                "minLtv": "abc",
                "maxLtv": 70,
                "fromDate": "not a date",
                "sortBy": "color",
                "sortOrder": "asc",
                "count": "many"
            }"#,
        )
        .unwrap();
        assert_eq!(criteria.status.as_deref(), Some("funded"));
        assert_eq!(criteria.min_ltv, None);
        assert_eq!(criteria.max_ltv, Some(dec!(70)));
        assert_eq!(criteria.from_date, None);
        assert_eq!(criteria.sort_by, None);
        assert_eq!(criteria.sort_order, Some(SortOrder::Asc));
        assert_eq!(criteria.count, None);

        let result = query(&book(), &criteria);
        assert_eq!(ids(&result), vec!["L004"]);
    }

    #[test]
    fn test_result_json_field_names() {
        let result = query(&book(), &LoanQuery::default());
        let value = serde_json::to_value(&result).unwrap();
        assert!(value["results"].is_array());
        assert_eq!(value["totalMatching"], 5);
        assert_eq!(value["totalInCollection"], 5);
        assert_eq!(value["wasFiltered"], false);
        assert!(value["filters"].is_object());
    }

    fn arb_book() -> impl Strategy<Value = Vec<Loan>> {
        prop::collection::vec((1i64..8, 0u32..100, 0usize..6, 0i64..400), 0..40).prop_map(
            |rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, (amount, ltv, status, days))| {
                        Loan::builder(format!("L00{}", i + 1))
                            .borrower(format!("Borrower {}", i % 7))
                            .amount(Money::from_major(amount * 50_000))
                            .ltv(Decimal::from(ltv))
                            .rate(Rate::from_percentage(5))
                            .status(LoanStatus::ALL[status])
                            .loan_date(date(2023, 1, 1) + chrono::Duration::days(days))
                            .build()
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_totals_are_consistent(
            loans in arb_book(),
            min in 0i64..8,
            max in 0i64..8,
            count in -2i64..50,
        ) {
            let criteria = LoanQuery {
                min_loan_amount: Some(Decimal::from(min * 50_000)),
                max_loan_amount: Some(Decimal::from(max * 50_000)),
                count: Some(Decimal::from(count)),
                ..LoanQuery::default()
            };
            let result = query(&loans, &criteria);
            prop_assert!(result.total_matching <= result.total_in_collection);
            prop_assert_eq!(result.total_in_collection, loans.len());
            prop_assert_eq!(result.was_filtered, result.total_matching < result.total_in_collection);
            prop_assert!(result.results.len() <= result.total_matching);
        }

        #[test]
        fn prop_amount_sort_is_stable_and_reversible(loans in arb_book()) {
            let asc = query(&loans, &LoanQuery {
                sort_by: Some(SortField::LoanAmount),
                sort_order: Some(SortOrder::Asc),
                count: Some(Decimal::from(1_000)),
                ..LoanQuery::default()
            });
            let desc = query(&loans, &LoanQuery {
                sort_by: Some(SortField::LoanAmount),
                sort_order: Some(SortOrder::Desc),
                count: Some(Decimal::from(1_000)),
                ..LoanQuery::default()
            });

            let position = |id: &crate::types::LoanId| {
                loans.iter().position(|l| &l.id == id).unwrap()
            };
            let position_in = |set: &QueryResult, id: &crate::types::LoanId| {
                set.results.iter().position(|l| &l.id == id).unwrap()
            };

            for pair in asc.results.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.loan_amount <= b.loan_amount);
                if a.loan_amount == b.loan_amount {
                    // stable: original order kept
                    prop_assert!(position(&a.id) < position(&b.id));
                    prop_assert!(position_in(&desc, &a.id) < position_in(&desc, &b.id));
                } else {
                    prop_assert!(position_in(&desc, &a.id) > position_in(&desc, &b.id));
                }
            }
        }
    }
}
