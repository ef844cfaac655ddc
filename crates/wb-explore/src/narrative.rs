//! Template narratives. Output depends only on the arguments, so identical
//! inputs always render byte-identical text.

use serde::Serialize;
use wb_core::{Dimension, Real};

use crate::simulate::ImprovementProjection;

/// How many strengths and weaknesses a diagnostic lists.
const HIGHLIGHTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapAnalysis {
    /// (dimension, gap) sorted by gap, highest first; ties keep input order.
    pub sorted: Vec<(Dimension, Real)>,
    /// Up to two highest positive gaps, highest first.
    pub strengths: Vec<(Dimension, Real)>,
    /// Up to two most negative gaps, in sorted order (least negative first).
    pub weaknesses: Vec<(Dimension, Real)>,
    /// Last entry of `sorted`, regardless of sign.
    pub weakest: Option<Dimension>,
}

pub fn analyze_gaps(gaps: &[(Dimension, Real)]) -> GapAnalysis {
    let mut sorted = gaps.to_vec();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));

    let strengths: Vec<_> = sorted
        .iter()
        .copied()
        .filter(|(_, g)| *g > 0.0)
        .take(HIGHLIGHTS)
        .collect();
    let negatives: Vec<_> = sorted.iter().copied().filter(|(_, g)| *g < 0.0).collect();
    let weaknesses = negatives[negatives.len().saturating_sub(HIGHLIGHTS)..].to_vec();
    let weakest = sorted.last().map(|(d, _)| *d);

    GapAnalysis {
        sorted,
        strengths,
        weaknesses,
        weakest,
    }
}

/// Diagnostic text for one country's gap vector. `top_performer` is the
/// country with the highest composite index in the current view.
pub fn diagnostic_narrative(
    country: &str,
    gaps: &[(Dimension, Real)],
    top_performer: &str,
) -> String {
    let analysis = analyze_gaps(gaps);
    let mut parts: Vec<String> = vec![
        format!("## 🏛️ OECD Wellbeing Diagnostic: {country}"),
        "---".to_string(),
        "### 💪 **Key Strengths**".to_string(),
    ];

    if let Some(&(first, _)) = analysis.strengths.first() {
        for (dim, gap) in &analysis.strengths {
            parts.push(format!(
                "• **{}**: {gap:+.1} points above OECD average",
                dim.label()
            ));
        }
        parts.push(String::new());
        let mut text = format!(
            "{country} demonstrates notable excellence in {}",
            first.label().to_lowercase()
        );
        if let Some(&(second, _)) = analysis.strengths.get(1) {
            text.push_str(&format!(" and {}", second.label().to_lowercase()));
        }
        text.push_str(&format!(
            ". These positive performance gaps indicate that {country}'s citizens experience \
             significantly better outcomes in these dimensions compared to the typical OECD country."
        ));
        parts.push(text);
    } else {
        parts.push(format!(
            "• {country} is performing at or below OECD average across most dimensions"
        ));
        parts.push(String::new());
        parts.push(format!(
            "While {country} faces challenges across multiple wellbeing dimensions, this presents \
             clear opportunities for targeted policy interventions to improve citizen outcomes."
        ));
    }
    parts.push(String::new());

    if let Some(&(most_negative, _)) = analysis.weaknesses.last() {
        parts.push("### ⚠️ **Critical Areas for Improvement**".to_string());
        for (dim, gap) in &analysis.weaknesses {
            parts.push(format!(
                "• **{}**: {gap:+.1} points below OECD average",
                dim.label()
            ));
        }
        parts.push(String::new());
        let mut text = format!(
            "The data reveals significant challenges in {}",
            most_negative.label().to_lowercase()
        );
        if analysis.weaknesses.len() > 1 {
            let (next, _) = analysis.weaknesses[analysis.weaknesses.len() - 2];
            text.push_str(&format!(" and {}", next.label().to_lowercase()));
        }
        text.push_str(&format!(
            ". These negative gaps suggest that {country}'s performance in these areas falls \
             notably short of what citizens in other OECD countries typically experience."
        ));
        parts.push(text);
    } else {
        parts.push("### ⚠️ **Areas for Attention**".to_string());
        parts.push(format!(
            "• {country} shows relatively balanced performance across dimensions"
        ));
        parts.push(String::new());
        parts.push(format!(
            "{country} maintains consistent performance across wellbeing dimensions, though there \
             may still be opportunities for enhancement in specific areas."
        ));
    }
    parts.push(String::new());

    parts.push("### 🎯 **Policy Insight**".to_string());
    if analysis.weaknesses.is_empty() {
        parts.push(format!(
            "**Recommendation**: {country} should focus on maintaining its current performance \
             levels while identifying emerging opportunities to further enhance citizen \
             wellbeing outcomes."
        ));
    } else {
        let weakest = analysis
            .weakest
            .map(|d| d.label().to_lowercase())
            .unwrap_or_else(|| "overall wellbeing".to_string());
        parts.push(format!(
            "**Recommendation**: Prioritizing improvements in {weakest} could significantly \
             enhance {country}'s overall wellbeing performance and bring outcomes closer to \
             leading countries like {top_performer}."
        ));
    }

    parts.join("\n")
}

/// A benchmark country's position on the insight chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkPoint {
    pub country: String,
    pub value: Real,
    pub life_satisfaction: Real,
}

/// Insight text for a flat-point projection. `benchmarks` holds the
/// configured benchmark countries found in the view; when any configured
/// benchmark is missing a generic comparison is used instead.
pub fn insight_narrative(
    projection: &ImprovementProjection,
    benchmark_names: &[String],
    benchmarks: &[BenchmarkPoint],
) -> String {
    let p = projection;
    let dim = p.dimension.axis_title();
    let dim_lower = dim.to_lowercase();
    let country = &p.country;

    let first = format!(
        "📈 Increasing {country}'s {dim} score by {} points (from {:.1} to {:.1}) could \
         potentially raise life satisfaction by approximately {:.1} points (from {:.1} to \
         {:.1}). This improvement would represent a meaningful enhancement in national \
         wellbeing, demonstrating how targeted policy interventions in {dim_lower} can create \
         measurable gains in citizen satisfaction and quality of life.",
        p.improvement,
        p.current_value,
        p.simulated_value,
        p.life_satisfaction_increase,
        p.current_life_satisfaction,
        p.simulated_life_satisfaction,
    );

    let complete = !benchmarks.is_empty() && benchmarks.len() == benchmark_names.len();
    let comparison = if complete {
        benchmark_sentence(&dim, benchmarks)
    } else if benchmark_names.is_empty() {
        format!(
            "Leading countries consistently demonstrate that excellence in {dim_lower} \
             correlates with higher life satisfaction scores."
        )
    } else {
        format!(
            "Leading countries like {} consistently demonstrate that excellence in {dim_lower} \
             correlates with higher life satisfaction scores.",
            join_names(benchmark_names)
        )
    };

    let second = format!(
        "🌍 Comparing {country}'s simulated position to top-performing nations reveals important \
         lessons. {comparison} Their success shows that sustained investment in {dim_lower} \
         infrastructure, policies, and programs can yield substantial returns in citizen \
         wellbeing. This shows how targeted progress in key wellbeing areas can meaningfully \
         enhance national life satisfaction."
    );

    ["### 🤖 Simulation Insight".to_string(), first, second].join("\n\n")
}

fn benchmark_sentence(dim: &str, benchmarks: &[BenchmarkPoint]) -> String {
    let mut text = String::new();
    for (i, b) in benchmarks.iter().enumerate() {
        if i == 0 {
            text.push_str(&format!(
                "{} scores {:.1} in {dim} with {:.1} life satisfaction",
                b.country, b.value, b.life_satisfaction
            ));
        } else {
            text.push_str(&format!(
                ", while {} achieves {:.1} and {:.1} respectively",
                b.country, b.value, b.life_satisfaction
            ));
        }
    }
    text.push('.');
    text
}

/// `A`, `A and B`, `A, B and C`.
fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}
