//! The closed set of wellbeing dimensions.
//!
//! Every per-dimension value in the system is addressed through [`Dimension`]
//! rather than a column string, so a misspelled dimension is a compile error
//! and a parse error is raised once, at the boundary.

use core::fmt;
use core::str::FromStr;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::{CoreError, Real};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    LifeSatisfaction,
    Health,
    Income,
    Education,
    Jobs,
    WorkLifeBalance,
    Safety,
    Environment,
    SocialConnections,
    Housing,
}

impl Dimension {
    pub const COUNT: usize = 10;

    /// Canonical column order of the persisted table.
    pub const ALL: [Dimension; Dimension::COUNT] = [
        Dimension::LifeSatisfaction,
        Dimension::Health,
        Dimension::Income,
        Dimension::Education,
        Dimension::Jobs,
        Dimension::WorkLifeBalance,
        Dimension::Safety,
        Dimension::Environment,
        Dimension::SocialConnections,
        Dimension::Housing,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Short snake_case column key, e.g. `work_life_balance`.
    pub fn key(self) -> &'static str {
        match self {
            Self::LifeSatisfaction => "life_satisfaction",
            Self::Health => "health",
            Self::Income => "income",
            Self::Education => "education",
            Self::Jobs => "jobs",
            Self::WorkLifeBalance => "work_life_balance",
            Self::Safety => "safety",
            Self::Environment => "environment",
            Self::SocialConnections => "social_connections",
            Self::Housing => "housing",
        }
    }

    /// Human-readable label, e.g. `Work-Life Balance`.
    pub fn label(self) -> &'static str {
        match self {
            Self::LifeSatisfaction => "Life Satisfaction",
            Self::Health => "Health",
            Self::Income => "Income",
            Self::Education => "Education",
            Self::Jobs => "Jobs",
            Self::WorkLifeBalance => "Work-Life Balance",
            Self::Safety => "Safety",
            Self::Environment => "Environment",
            Self::SocialConnections => "Social Connections",
            Self::Housing => "Housing",
        }
    }

    /// Axis title form of the key (`work_life_balance` -> `Work Life Balance`).
    pub fn axis_title(self) -> String {
        self.key()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn gap_column(self) -> String {
        format!("{}_gap", self.key())
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.key() == key)
    }

    /// Parse a `<key>_gap` column name.
    pub fn from_gap_column(column: &str) -> Option<Self> {
        column.strip_suffix("_gap").and_then(Self::from_key)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Dimension {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s.trim()).ok_or_else(|| CoreError::UnknownDimension { key: s.to_string() })
    }
}

/// One optional value per dimension, indexed by [`Dimension`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DimensionScores([Option<Real>; Dimension::COUNT]);

impl DimensionScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dim: Dimension) -> Option<Real> {
        self.0[dim.index()]
    }

    pub fn set(&mut self, dim: Dimension, value: Real) {
        self.0[dim.index()] = Some(value);
    }

    pub fn contains(&self, dim: Dimension) -> bool {
        self.0[dim.index()].is_some()
    }

    /// Present values in canonical dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, Real)> + '_ {
        Dimension::ALL
            .into_iter()
            .filter_map(|d| self.get(d).map(|v| (d, v)))
    }

    pub fn len(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<(Dimension, Real)> for DimensionScores {
    fn from_iter<I: IntoIterator<Item = (Dimension, Real)>>(iter: I) -> Self {
        let mut scores = Self::new();
        for (d, v) in iter {
            scores.set(d, v);
        }
        scores
    }
}

/// Serialized as a map of the present values keyed by dimension.
impl Serialize for DimensionScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (d, v) in self.iter() {
            map.serialize_entry(&d, &v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for d in Dimension::ALL {
            assert_eq!(Dimension::from_key(d.key()), Some(d));
            assert_eq!(Dimension::from_gap_column(&d.gap_column()), Some(d));
            assert_eq!(d.key().parse::<Dimension>().unwrap(), d);
        }
        assert!("happiness".parse::<Dimension>().is_err());
        assert!(Dimension::from_gap_column("health").is_none());
    }

    #[test]
    fn canonical_order_matches_index() {
        for (i, d) in Dimension::ALL.iter().enumerate() {
            assert_eq!(d.index(), i);
        }
    }

    #[test]
    fn axis_title_capitalizes_words() {
        assert_eq!(Dimension::WorkLifeBalance.axis_title(), "Work Life Balance");
        assert_eq!(Dimension::Jobs.axis_title(), "Jobs");
    }

    #[test]
    fn scores_iterate_in_canonical_order() {
        let scores: DimensionScores = [(Dimension::Housing, 1.0), (Dimension::Health, 2.0)]
            .into_iter()
            .collect();
        let order: Vec<_> = scores.iter().map(|(d, _)| d).collect();
        assert_eq!(order, vec![Dimension::Health, Dimension::Housing]);
        assert_eq!(scores.len(), 2);
    }
}
