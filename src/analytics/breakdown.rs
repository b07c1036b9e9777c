use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::RiskBands;
use crate::decimal::Money;
use crate::errors::Result;
use crate::types::Loan;

/// count and volume of one group
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketTotals {
    pub count: usize,
    pub total_amount: Money,
}

/// loans grouped by a key, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakdown {
    buckets: Vec<(String, BucketTotals)>,
}

impl Breakdown {
    pub fn from_loans<F>(loans: &[Loan], key: F) -> Result<Self>
    where
        F: Fn(&Loan) -> String,
    {
        let mut buckets: Vec<(String, BucketTotals)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for loan in loans {
            let k = key(loan);
            let slot = match index.get(&k) {
                Some(&i) => i,
                None => {
                    index.insert(k.clone(), buckets.len());
                    buckets.push((k, BucketTotals::default()));
                    buckets.len() - 1
                }
            };
            let totals = &mut buckets[slot].1;
            totals.count += 1;
            totals.total_amount = totals.total_amount.checked_add(loan.loan_amount)?;
        }

        Ok(Self { buckets })
    }

    pub fn get(&self, key: &str) -> Option<&BucketTotals> {
        self.buckets.iter().find(|(k, _)| k == key).map(|(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BucketTotals)> {
        self.buckets.iter().map(|(k, t)| (k.as_str(), t))
    }

    /// key with the most loans; the earliest group wins a tie
    pub fn most_common(&self) -> Option<&str> {
        self.leader_by(|t| t.count)
    }

    /// key with the largest total amount; the earliest group wins a tie
    pub fn largest_by_amount(&self) -> Option<&str> {
        self.leader_by(|t| t.total_amount)
    }

    fn leader_by<K, F>(&self, metric: F) -> Option<&str>
    where
        K: PartialOrd,
        F: Fn(&BucketTotals) -> K,
    {
        let mut buckets = self.buckets.iter();
        let first = buckets.next()?;
        let leader = buckets.fold(first, |best, candidate| {
            if metric(&candidate.1) > metric(&best.1) {
                candidate
            } else {
                best
            }
        });
        Some(leader.0.as_str())
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (key, totals) in &self.buckets {
            map.serialize_entry(key, totals)?;
        }
        map.end()
    }
}

/// loan counts per ltv risk band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LtvRanges {
    pub low_risk: usize,
    pub medium_risk: usize,
    pub high_risk: usize,
    bands: RiskBands,
}

impl LtvRanges {
    pub fn from_loans(loans: &[Loan], bands: &RiskBands) -> Self {
        let mut ranges = Self {
            low_risk: 0,
            medium_risk: 0,
            high_risk: 0,
            bands: *bands,
        };
        for loan in loans {
            if loan.ltv <= bands.low_max_ltv {
                ranges.low_risk += 1;
            } else if loan.ltv <= bands.medium_max_ltv {
                ranges.medium_risk += 1;
            } else {
                ranges.high_risk += 1;
            }
        }
        ranges
    }

    /// true when high-ltv loans exceed the configured share of the book
    pub fn is_high_risk(&self, total_loans: usize) -> bool {
        Decimal::from(total_loans)
            .checked_mul(self.bands.high_risk_share)
            .map_or(false, |limit| Decimal::from(self.high_risk) > limit)
    }

    pub fn labels(&self) -> [String; 3] {
        let low = self.bands.low_max_ltv.normalize();
        let medium = self.bands.medium_max_ltv.normalize();
        [
            format!("Low Risk (≤{}%)", low),
            format!("Medium Risk ({}-{}%)", low.checked_add(Decimal::ONE).unwrap_or(low), medium),
            format!("High Risk (>{}%)", medium),
        ]
    }
}

impl Serialize for LtvRanges {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let [low, medium, high] = self.labels();
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(&low, &self.low_risk)?;
        map.serialize_entry(&medium, &self.medium_risk)?;
        map.serialize_entry(&high, &self.high_risk)?;
        map.end()
    }
}
