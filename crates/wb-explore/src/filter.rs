//! Predicate filters over the table.
//!
//! A predicate is written `column:op:value`, e.g. `safety:ge:60`,
//! `country:in:Finland,Denmark` or `country_code:eq:FIN`. Columns are
//! `country`, `country_code`, `composite_index`, a dimension key or a
//! `<dimension>_gap` column.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use wb_core::{Dimension, Real, Tolerances, WellbeingRecord, WellbeingTable, nearly_equal};

use crate::{ExploreError, ExploreResult};

/// Equality tolerance for numeric predicates; stored values have one decimal.
const NUMERIC_EQ: Tolerances = Tolerances {
    abs: 1e-9,
    rel: 0.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterColumn {
    Country,
    CountryCode,
    CompositeIndex,
    Score(Dimension),
    Gap(Dimension),
}

impl FilterColumn {
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Country | Self::CountryCode)
    }

    pub fn dimension(self) -> Option<Dimension> {
        match self {
            Self::Score(d) | Self::Gap(d) => Some(d),
            _ => None,
        }
    }

    fn text<'a>(self, record: &'a WellbeingRecord) -> Option<&'a str> {
        match self {
            Self::Country => Some(record.country.as_str()),
            Self::CountryCode => Some(record.country_code.as_str()),
            _ => None,
        }
    }

    fn number(self, record: &WellbeingRecord) -> Option<Real> {
        match self {
            Self::CompositeIndex => Some(record.composite_index),
            Self::Score(d) => record.score(d),
            Self::Gap(d) => record.gap(d),
            _ => None,
        }
    }
}

impl fmt::Display for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Country => f.write_str("country"),
            Self::CountryCode => f.write_str("country_code"),
            Self::CompositeIndex => f.write_str("composite_index"),
            Self::Score(d) => f.write_str(d.key()),
            Self::Gap(d) => f.write_str(&d.gap_column()),
        }
    }
}

impl FromStr for FilterColumn {
    type Err = ExploreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "country" => Ok(Self::Country),
            "country_code" => Ok(Self::CountryCode),
            "composite_index" => Ok(Self::CompositeIndex),
            _ => Dimension::from_key(s)
                .map(Self::Score)
                .or_else(|| Dimension::from_gap_column(s).map(Self::Gap))
                .ok_or_else(|| invalid(s, "unknown column")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Case-insensitive substring match on a text column.
    Contains,
    /// Membership in a comma-separated list.
    In,
}

impl FromStr for FilterOp {
    type Err = ExploreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "eq" | "=" | "==" => Ok(Self::Eq),
            "ne" | "!=" => Ok(Self::Ne),
            "lt" | "<" => Ok(Self::Lt),
            "le" | "<=" => Ok(Self::Le),
            "gt" | ">" => Ok(Self::Gt),
            "ge" | ">=" => Ok(Self::Ge),
            "contains" => Ok(Self::Contains),
            "in" => Ok(Self::In),
            other => Err(invalid(other, "unknown operator")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(Real),
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub column: FilterColumn,
    pub op: FilterOp,
    pub value: FilterValue,
}

impl FilterPredicate {
    pub fn new(column: FilterColumn, op: FilterOp, value: FilterValue) -> ExploreResult<Self> {
        let predicate = Self { column, op, value };
        predicate.check()?;
        Ok(predicate)
    }

    /// Reject combinations that can never be evaluated.
    pub fn check(&self) -> ExploreResult<()> {
        let fail = |reason: &str| -> ExploreResult<()> {
            Err(invalid(&self.to_string(), reason))
        };
        match (&self.value, self.op) {
            (FilterValue::List(_), FilterOp::In) => Ok(()),
            (_, FilterOp::In) => fail("`in` needs a list value"),
            (FilterValue::List(_), _) => fail("list values are only valid with `in`"),
            (_, FilterOp::Contains) if self.column.is_numeric() => {
                fail("`contains` applies to text columns")
            }
            (FilterValue::Number(v), _) if !self.column.is_numeric() || !v.is_finite() => {
                fail("number compared against a text column")
            }
            (FilterValue::Text(_), _) if self.column.is_numeric() => {
                fail("text compared against a numeric column")
            }
            _ => Ok(()),
        }
    }

    /// True when the record satisfies the predicate. A record lacking the
    /// column's dimension never matches.
    pub fn matches(&self, record: &WellbeingRecord) -> bool {
        match &self.value {
            FilterValue::Number(target) => match self.column.number(record) {
                Some(v) => compare_numbers(v, self.op, *target),
                None => false,
            },
            FilterValue::Text(target) => match self.column.text(record) {
                Some(v) => compare_text(v, self.op, target),
                None => false,
            },
            FilterValue::List(items) => {
                if let Some(v) = self.column.text(record) {
                    items.iter().any(|item| item == v)
                } else if let Some(v) = self.column.number(record) {
                    items
                        .iter()
                        .filter_map(|item| item.trim().parse::<Real>().ok())
                        .any(|item| nearly_equal(item, v, NUMERIC_EQ))
                } else {
                    false
                }
            }
        }
    }
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            FilterOp::Eq => "eq",
            FilterOp::Ne => "ne",
            FilterOp::Lt => "lt",
            FilterOp::Le => "le",
            FilterOp::Gt => "gt",
            FilterOp::Ge => "ge",
            FilterOp::Contains => "contains",
            FilterOp::In => "in",
        };
        match &self.value {
            FilterValue::Number(v) => write!(f, "{}:{op}:{v}", self.column),
            FilterValue::Text(v) => write!(f, "{}:{op}:{v}", self.column),
            FilterValue::List(items) => write!(f, "{}:{op}:{}", self.column, items.join(",")),
        }
    }
}

impl FromStr for FilterPredicate {
    type Err = ExploreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(column), Some(op), Some(raw)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid(s, "expected column:op:value"));
        };
        let column: FilterColumn = column.parse()?;
        let op: FilterOp = op.parse()?;
        let raw = raw.trim();

        let value = if op == FilterOp::In {
            FilterValue::List(raw.split(',').map(|v| v.trim().to_string()).collect())
        } else if column.is_numeric() {
            let v = raw
                .parse::<Real>()
                .map_err(|_| invalid(s, "value is not a number"))?;
            FilterValue::Number(v)
        } else {
            FilterValue::Text(raw.to_string())
        };
        FilterPredicate::new(column, op, value)
    }
}

fn compare_numbers(v: Real, op: FilterOp, target: Real) -> bool {
    match op {
        FilterOp::Eq => nearly_equal(v, target, NUMERIC_EQ),
        FilterOp::Ne => !nearly_equal(v, target, NUMERIC_EQ),
        FilterOp::Lt => v < target,
        FilterOp::Le => v <= target,
        FilterOp::Gt => v > target,
        FilterOp::Ge => v >= target,
        FilterOp::Contains | FilterOp::In => false,
    }
}

fn compare_text(v: &str, op: FilterOp, target: &str) -> bool {
    match op {
        FilterOp::Eq => v == target,
        FilterOp::Ne => v != target,
        FilterOp::Lt => v < target,
        FilterOp::Le => v <= target,
        FilterOp::Gt => v > target,
        FilterOp::Ge => v >= target,
        FilterOp::Contains => v.to_lowercase().contains(&target.to_lowercase()),
        FilterOp::In => false,
    }
}

fn invalid(input: &str, reason: &str) -> ExploreError {
    ExploreError::InvalidFilter {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

/// Records satisfying every predicate, in table order. An empty result is a
/// normal outcome; only malformed predicates are errors.
pub fn apply_filters(
    table: &WellbeingTable,
    predicates: &[FilterPredicate],
) -> ExploreResult<WellbeingTable> {
    for p in predicates {
        p.check()?;
    }
    let view = table.retain_view(|r| predicates.iter().all(|p| p.matches(r)));
    tracing::debug!(
        predicates = predicates.len(),
        before = table.len(),
        after = view.len(),
        "applied filters"
    );
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wb_core::DimensionScores;

    fn record(country: &str, code: &str, safety: Real) -> WellbeingRecord {
        WellbeingRecord {
            country: country.to_string(),
            country_code: code.to_string(),
            scores: [(Dimension::Safety, safety)].into_iter().collect(),
            composite_index: safety,
            gaps: DimensionScores::from_iter([(Dimension::Safety, safety - 50.0)]),
        }
    }

    fn table() -> WellbeingTable {
        WellbeingTable::new(
            vec![Dimension::Safety],
            vec![
                record("Norway", "NOR", 90.0),
                record("Finland", "FIN", 70.0),
                record("Mexico", "MEX", 10.0),
            ],
        )
        .unwrap()
    }

    fn names(t: &WellbeingTable) -> Vec<&str> {
        t.records().iter().map(|r| r.country.as_str()).collect()
    }

    #[test]
    fn parses_predicates() {
        let p: FilterPredicate = "safety_gap:>=:10".parse().unwrap();
        assert_eq!(p.column, FilterColumn::Gap(Dimension::Safety));
        assert_eq!(p.op, FilterOp::Ge);
        assert_eq!(p.value, FilterValue::Number(10.0));

        let p: FilterPredicate = "country:in:Finland, Norway".parse().unwrap();
        assert_eq!(
            p.value,
            FilterValue::List(vec!["Finland".to_string(), "Norway".to_string()])
        );
        assert_eq!(p.to_string(), "country:in:Finland,Norway");
    }

    #[test]
    fn rejects_malformed_predicates() {
        assert!("safety:ge".parse::<FilterPredicate>().is_err());
        assert!("happiness:ge:3".parse::<FilterPredicate>().is_err());
        assert!("safety:ge:high".parse::<FilterPredicate>().is_err());
        assert!("safety:contains:1".parse::<FilterPredicate>().is_err());
        assert!(FilterPredicate::new(
            FilterColumn::Country,
            FilterOp::Eq,
            FilterValue::Number(1.0)
        )
        .is_err());
    }

    #[test]
    fn predicates_combine_with_and_and_keep_order() {
        let t = table();
        let preds = vec![
            "safety:gt:20".parse().unwrap(),
            "country:ne:Norway".parse().unwrap(),
        ];
        assert_eq!(names(&apply_filters(&t, &preds).unwrap()), vec!["Finland"]);

        let preds = vec!["country_code:in:MEX,NOR".parse().unwrap()];
        assert_eq!(
            names(&apply_filters(&t, &preds).unwrap()),
            vec!["Norway", "Mexico"]
        );
    }

    #[test]
    fn text_contains_is_case_insensitive() {
        let preds = vec!["country:contains:LAND".parse().unwrap()];
        assert_eq!(names(&apply_filters(&table(), &preds).unwrap()), vec!["Finland"]);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let preds = vec!["composite_index:gt:99".parse().unwrap()];
        let view = apply_filters(&table(), &preds).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.dimensions(), &[Dimension::Safety]);
    }

    #[test]
    fn absent_dimension_never_matches() {
        let preds = vec!["jobs:ge:0".parse().unwrap()];
        assert!(apply_filters(&table(), &preds).unwrap().is_empty());
    }

    #[test]
    fn numeric_equality_absorbs_float_noise() {
        let table = WellbeingTable::new(
            vec![Dimension::Safety],
            vec![record("Iceland", "ISL", 0.1 + 0.2), record("Norway", "NOR", 90.0)],
        )
        .unwrap();
        let eq = vec!["safety:eq:0.3".parse().unwrap()];
        assert_eq!(names(&apply_filters(&table, &eq).unwrap()), vec!["Iceland"]);
        let ne = vec!["safety:ne:0.3".parse().unwrap()];
        assert_eq!(names(&apply_filters(&table, &ne).unwrap()), vec!["Norway"]);
        let within = vec!["safety:in:0.3,90".parse().unwrap()];
        assert_eq!(apply_filters(&table, &within).unwrap().len(), 2);
    }
}
