use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AnalysisResults, Rubric};
use crate::render::{score_badge, BadgeVariant, ExpandedRows, ScoreTier};

/// Overall judge score with its presentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JudgeSummaryArtifact {
    pub overall_score: f64,
    pub tier: ScoreTier,
    pub color: String,
    pub feedback: String,
}

impl JudgeSummaryArtifact {
    fn new(score: f64, feedback: &str) -> Self {
        let tier = ScoreTier::from_score(score);
        Self {
            overall_score: score,
            tier,
            color: tier.color().to_string(),
            feedback: feedback.to_string(),
        }
    }
}

/// One rubric row of the prompt-quality breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RubricScoreArtifact {
    pub rubric_id: String,
    pub rubric_name: String,
    /// Weight configured in phase 1, if the judge scored a selected rubric.
    pub weight: Option<u32>,
    pub score: f64,
    pub badge: BadgeVariant,
    pub feedback: String,
}

/// One test-case row of the output-quality breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestCaseScoreArtifact {
    pub test_case_index: u32,
    pub overall_score: f64,
    pub badge: BadgeVariant,
    pub correctness: f64,
    pub relevance: f64,
    pub completeness: f64,
    pub feedback: String,
    /// `None` when the backend sent no generation outcome for this index.
    pub generation_success: Option<bool>,
    pub input: Option<String>,
    pub generated_output: Option<String>,
    pub expected_output: Option<String>,
    pub error: Option<String>,
}

/// Everything the results view shows, in one serializable artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub evaluation_id: Option<String>,
    pub prompt_quality: JudgeSummaryArtifact,
    pub output_quality: JudgeSummaryArtifact,
    pub rubric_scores: Vec<RubricScoreArtifact>,
    pub test_cases: Vec<TestCaseScoreArtifact>,
}

impl AnalysisReport {
    pub fn build(
        results: &AnalysisResults,
        rubrics: &[Rubric],
        evaluation_id: Option<&str>,
    ) -> Self {
        let rubric_scores = results
            .prompt_judge
            .rubric_scores
            .iter()
            .map(|rs| RubricScoreArtifact {
                rubric_id: rs.rubric_id.clone(),
                rubric_name: rs.rubric_name.clone(),
                weight: rubrics
                    .iter()
                    .find(|r| r.id == rs.rubric_id)
                    .map(|r| r.weight),
                score: rs.score,
                badge: BadgeVariant::from_score(rs.score),
                feedback: rs.feedback.clone(),
            })
            .collect();

        let test_cases = results
            .output_judge
            .test_case_scores
            .iter()
            .map(|tcs| {
                let generation = results.test_case(tcs.test_case_index);
                TestCaseScoreArtifact {
                    test_case_index: tcs.test_case_index,
                    overall_score: tcs.overall_score,
                    badge: BadgeVariant::from_score(tcs.overall_score),
                    correctness: tcs.correctness,
                    relevance: tcs.relevance,
                    completeness: tcs.completeness,
                    feedback: tcs.feedback.clone(),
                    generation_success: generation.map(|g| g.generation_success),
                    input: generation.map(|g| g.input.clone()),
                    generated_output: generation.and_then(|g| g.generated_output.clone()),
                    expected_output: generation.and_then(|g| g.expected_output.clone()),
                    error: generation.and_then(|g| g.error.clone()),
                }
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            evaluation_id: evaluation_id.map(str::to_string),
            prompt_quality: JudgeSummaryArtifact::new(
                results.prompt_judge.overall_score,
                &results.prompt_judge.overall_feedback,
            ),
            output_quality: JudgeSummaryArtifact::new(
                results.output_judge.overall_score,
                &results.output_judge.overall_feedback,
            ),
            rubric_scores,
            test_cases,
        }
    }
}

/// Render the report as terminal text. Only rows in `expanded` show their
/// score breakdown and input/output details.
pub fn render_report_text(report: &AnalysisReport, expanded: &ExpandedRows) -> String {
    let mut out = String::new();
    if let Some(id) = &report.evaluation_id {
        out.push_str(&format!("Evaluation: {}\n\n", id));
    }

    push_summary(&mut out, "Prompt Quality", &report.prompt_quality);
    push_summary(&mut out, "Output Quality", &report.output_quality);

    out.push_str("\n## Prompt Quality Analysis\n");
    if !report.prompt_quality.feedback.is_empty() {
        out.push_str(&format!("{}\n", report.prompt_quality.feedback));
    }
    for rs in &report.rubric_scores {
        let weight = rs
            .weight
            .map(|w| format!(" (weight {}%)", w))
            .unwrap_or_default();
        out.push_str(&format!(
            "- {}{}: {} [{}]\n",
            rs.rubric_name,
            weight,
            score_badge(rs.score),
            rs.badge.as_str()
        ));
        if !rs.feedback.is_empty() {
            out.push_str(&format!("    {}\n", rs.feedback));
        }
    }

    out.push_str("\n## LLM Output Quality Analysis\n");
    if !report.output_quality.feedback.is_empty() {
        out.push_str(&format!("{}\n", report.output_quality.feedback));
    }
    for tc in &report.test_cases {
        let failed = if tc.generation_success == Some(false) {
            " FAILED"
        } else {
            ""
        };
        let marker = if expanded.is_expanded(tc.test_case_index) {
            "v"
        } else {
            ">"
        };
        out.push_str(&format!(
            "{} Test Case {}{}: {} [{}]\n",
            marker,
            tc.test_case_index,
            failed,
            score_badge(tc.overall_score),
            tc.badge.as_str()
        ));
        if expanded.is_expanded(tc.test_case_index) {
            push_case_details(&mut out, tc);
        }
    }
    out
}

fn push_summary(out: &mut String, title: &str, summary: &JudgeSummaryArtifact) {
    out.push_str(&format!(
        "{}: {} ({})\n",
        title,
        summary.overall_score.round() as i64,
        summary.tier.label()
    ));
}

fn push_case_details(out: &mut String, tc: &TestCaseScoreArtifact) {
    out.push_str(&format!(
        "    Correctness {} | Relevance {} | Completeness {}\n",
        tc.correctness.round() as i64,
        tc.relevance.round() as i64,
        tc.completeness.round() as i64
    ));
    if !tc.feedback.is_empty() {
        out.push_str(&format!("    Judge: {}\n", tc.feedback));
    }
    let sections = [
        ("Input", &tc.input),
        ("LLM Output", &tc.generated_output),
        ("Expected Output", &tc.expected_output),
        ("Error", &tc.error),
    ];
    for (label, value) in sections {
        if let Some(text) = value.as_deref().filter(|t| !t.is_empty()) {
            out.push_str(&format!("    {}:\n", label));
            for line in text.lines() {
                out.push_str(&format!("      {}\n", line));
            }
        }
    }
}
