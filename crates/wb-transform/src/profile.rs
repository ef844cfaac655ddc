//! Raw extract profiling, run before choosing measures and years.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::raw::{RawObservation, TOTAL};

/// Number of sample countries listed in a profile.
pub const SAMPLE_COUNTRIES: usize = 15;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RawProfile {
    pub rows: usize,
    pub countries: usize,
    pub years: Vec<i32>,
    /// Rows per domain, most frequent first.
    pub domain_rows: Vec<(String, usize)>,
    pub domains: Vec<DomainProfile>,
    /// Completeness per year, latest first.
    pub completeness: Vec<YearCompleteness>,
    /// Year maximizing measures x countries; ties go to the earlier year.
    pub best_year: Option<i32>,
    /// Rows per `Sex` value, most frequent first.
    pub sex_rows: Vec<(String, usize)>,
    /// Measures reported with a non-Total sex split.
    pub sex_breakdown_measures: Vec<String>,
    /// First countries alphabetically, with their codes.
    pub sample_countries: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainProfile {
    pub domain: String,
    pub measures: Vec<MeasureProfile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeasureProfile {
    pub measure: String,
    pub countries: usize,
    pub years: Vec<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearCompleteness {
    pub year: i32,
    pub countries: usize,
    pub measures: usize,
    pub domains: usize,
}

#[derive(Default)]
struct YearSets<'a> {
    countries: BTreeSet<&'a str>,
    measures: BTreeSet<&'a str>,
    domains: BTreeSet<&'a str>,
}

#[derive(Default)]
struct MeasureSets<'a> {
    countries: BTreeSet<&'a str>,
    years: BTreeSet<i32>,
}

pub fn profile_raw(observations: &[RawObservation]) -> RawProfile {
    let mut countries: BTreeMap<&str, &str> = BTreeMap::new();
    let mut years = BTreeSet::new();
    let mut domain_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut sex_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut breakdown = BTreeSet::new();
    let mut by_year: BTreeMap<i32, YearSets> = BTreeMap::new();
    // Domains in first-seen order, measures likewise within each domain.
    let mut domain_order: Vec<&str> = Vec::new();
    let mut measures: BTreeMap<&str, Vec<(&str, MeasureSets)>> = BTreeMap::new();

    for obs in observations {
        countries
            .entry(obs.country.as_str())
            .or_insert(obs.ref_area.as_str());
        years.insert(obs.year);
        *domain_counts.entry(obs.domain.as_str()).or_default() += 1;
        *sex_counts.entry(obs.sex.as_str()).or_default() += 1;
        if obs.sex != TOTAL {
            breakdown.insert(obs.measure.clone());
        }

        let year = by_year.entry(obs.year).or_default();
        year.countries.insert(&obs.country);
        year.measures.insert(&obs.measure);
        year.domains.insert(&obs.domain);

        if !measures.contains_key(obs.domain.as_str()) {
            domain_order.push(obs.domain.as_str());
        }
        let list = measures.entry(obs.domain.as_str()).or_default();
        let idx = match list.iter().position(|(m, _)| *m == obs.measure) {
            Some(i) => i,
            None => {
                list.push((obs.measure.as_str(), MeasureSets::default()));
                list.len() - 1
            }
        };
        let sets = &mut list[idx].1;
        sets.countries.insert(&obs.country);
        sets.years.insert(obs.year);
    }

    let domains = domain_order
        .into_iter()
        .map(|domain| DomainProfile {
            domain: domain.to_string(),
            measures: measures
                .remove(domain)
                .unwrap_or_default()
                .into_iter()
                .map(|(measure, sets)| MeasureProfile {
                    measure: measure.to_string(),
                    countries: sets.countries.len(),
                    years: sets.years.into_iter().collect(),
                })
                .collect(),
        })
        .collect();

    let completeness: Vec<YearCompleteness> = by_year
        .iter()
        .rev()
        .map(|(&year, sets)| YearCompleteness {
            year,
            countries: sets.countries.len(),
            measures: sets.measures.len(),
            domains: sets.domains.len(),
        })
        .collect();

    let best_year = completeness
        .iter()
        .max_by(|a, b| {
            (a.measures * a.countries)
                .cmp(&(b.measures * b.countries))
                .then(b.year.cmp(&a.year))
        })
        .map(|c| c.year);

    RawProfile {
        rows: observations.len(),
        countries: countries.len(),
        years: years.into_iter().collect(),
        domain_rows: by_frequency(domain_counts),
        domains,
        completeness,
        best_year,
        sex_rows: by_frequency(sex_counts),
        sex_breakdown_measures: breakdown.into_iter().collect(),
        sample_countries: countries
            .into_iter()
            .take(SAMPLE_COUNTRIES)
            .map(|(c, code)| (c.to_string(), code.to_string()))
            .collect(),
    }
}

fn by_frequency(counts: BTreeMap<&str, usize>) -> Vec<(String, usize)> {
    let mut v: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, n)| (k.to_string(), n))
        .collect();
    v.sort_by(|a, b| b.1.cmp(&a.1));
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(
        country: &str,
        code: &str,
        domain: &str,
        measure: &str,
        sex: &str,
        year: i32,
    ) -> RawObservation {
        RawObservation {
            country: country.to_string(),
            ref_area: code.to_string(),
            domain: domain.to_string(),
            measure: measure.to_string(),
            sex: sex.to_string(),
            age: TOTAL.to_string(),
            education: TOTAL.to_string(),
            year,
            obs_value: Some(1.0),
        }
    }

    #[test]
    fn profiles_small_extract() {
        let rows = vec![
            obs("Finland", "FIN", "Safety", "Homicides", "Total", 2021),
            obs("Finland", "FIN", "Safety", "Homicides", "Female", 2021),
            obs("Chile", "CHL", "Safety", "Homicides", "Total", 2022),
            obs("Chile", "CHL", "Health", "Life expectancy at birth", "Total", 2022),
            obs("Austria", "AUT", "Health", "Life expectancy at birth", "Total", 2020),
        ];
        let p = profile_raw(&rows);

        assert_eq!(p.rows, 5);
        assert_eq!(p.countries, 3);
        assert_eq!(p.years, vec![2020, 2021, 2022]);
        assert_eq!(p.domain_rows[0], ("Safety".to_string(), 3));
        assert_eq!(p.domains[0].domain, "Safety");
        assert_eq!(p.domains[0].measures[0].countries, 2);
        assert_eq!(p.domains[0].measures[0].years, vec![2021, 2022]);
        assert_eq!(p.completeness[0].year, 2022);
        assert_eq!(p.completeness[0].measures, 2);
        assert_eq!(p.best_year, Some(2022));
        assert_eq!(p.sex_breakdown_measures, vec!["Homicides".to_string()]);
        assert_eq!(p.sample_countries[0], ("Austria".to_string(), "AUT".to_string()));
    }

    #[test]
    fn best_year_tie_goes_to_earlier_year() {
        let rows = vec![
            obs("A", "AAA", "D", "M", "Total", 2021),
            obs("A", "AAA", "D", "M", "Total", 2019),
            obs("B", "BBB", "D", "M", "Total", 2021),
            obs("B", "BBB", "D", "M", "Total", 2019),
            obs("B", "BBB", "D", "M", "Total", 2020),
        ];
        assert_eq!(profile_raw(&rows).best_year, Some(2019));
    }

    #[test]
    fn empty_extract_profiles_to_nothing() {
        let p = profile_raw(&[]);
        assert_eq!(p.rows, 0);
        assert!(p.best_year.is_none());
        assert!(p.sample_countries.is_empty());
    }
}
