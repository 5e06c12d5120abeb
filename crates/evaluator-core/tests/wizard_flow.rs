//! End-to-end wizard flow against the in-memory backend.
//!
//! Walks phase 1 → 2 → 3, launches the analysis, re-analyzes and starts
//! over, asserting on the exact backend call sequence.

use evaluator_client::fakes::{BackendCall, MemoryBackend, Scripted};
use evaluator_client::EvaluationResultsPayload;
use evaluator_core::{
    AnalysisReport, GateIssue, Orchestrator, Phase, Provider, Wizard, WizardError,
};
use serde_json::json;

fn judged_payload() -> EvaluationResultsPayload {
    serde_json::from_value(json!({
        "test_case_results": [
            {"test_case_index": 1, "input": "fizzbuzz 15", "generated_output": "FizzBuzz",
             "expected_output": "FizzBuzz", "generation_success": true},
            {"test_case_index": 2, "input": "fizzbuzz 3", "generated_output": "Fizz",
             "success": true}
        ],
        "output_judge_result": {
            "test_case_scores": [
                {"test_case_index": 1, "correctness": 100, "relevance": 95,
                 "completeness": 90, "overall_score": 95, "feedback": "Exact"},
                {"test_case_index": 2, "correctness": 80, "relevance": 80,
                 "completeness": 60, "overall_score": 73, "feedback": "Terse"}
            ],
            "overall_score": 84,
            "overall_feedback": "Outputs are mostly correct"
        },
        "prompt_judge_result": {
            "rubric_scores": [
                {"rubric_id": "coding", "rubric_name": "Coding", "score": 82, "feedback": "ok"},
                {"rubric_id": "clarity", "rubric_name": "Clarity", "score": 39, "feedback": "vague"}
            ],
            "overall_score": 66,
            "overall_feedback": "Specify output format"
        }
    }))
    .unwrap()
}

/// Domain "coding", rubrics coding 60 + clarity 40, prompt, mistral key and
/// two test cases; left in phase 3.
fn wizard_in_phase3() -> Wizard {
    let mut wizard = Wizard::new();
    wizard.select_domain("coding").unwrap();
    wizard.add_rubric("coding").unwrap();
    wizard.add_rubric("clarity").unwrap();
    wizard.set_rubric_weight("coding", 60).unwrap();
    wizard.set_rubric_weight("clarity", 40).unwrap();
    assert!(wizard.is_phase1_complete());
    assert_eq!(wizard.next().unwrap(), Phase::PromptAndTestCases);

    wizard.set_prompt("Solve FizzBuzz for the given number.");
    wizard.select_model("mistral").unwrap();
    wizard.set_api_key(Provider::Mistral, "m-key");
    wizard.set_test_case_input("1", "fizzbuzz 15").unwrap();
    wizard
        .set_test_case_expected("1", Some("FizzBuzz".to_string()))
        .unwrap();
    let second = wizard.add_test_case();
    wizard.set_test_case_input(&second, "fizzbuzz 3").unwrap();
    assert_eq!(wizard.next().unwrap(), Phase::Results);
    wizard
}

#[test]
fn phase1_example_weights() {
    let mut wizard = Wizard::new();
    wizard.select_domain("coding").unwrap();
    wizard.add_rubric("coding").unwrap();
    wizard.add_rubric("clarity").unwrap();
    wizard.set_rubric_weight("coding", 60).unwrap();
    wizard.set_rubric_weight("clarity", 40).unwrap();
    assert!(wizard.is_phase1_complete());

    wizard.set_rubric_weight("clarity", 30).unwrap();
    assert!(!wizard.is_phase1_complete());
    match wizard.next().unwrap_err() {
        WizardError::PhaseIncomplete { issues, .. } => {
            assert_eq!(issues, vec![GateIssue::WeightTotal { total: 90 }]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn analysis_submits_runs_and_fetches_in_order() {
    let backend = MemoryBackend::new().with_results(Scripted::Ok(judged_payload()));
    let mut wizard = wizard_in_phase3();

    Orchestrator::new(&backend)
        .analyze(&mut wizard)
        .await
        .expect("analysis failed");

    let calls = backend.calls();
    assert_eq!(calls.len(), 3);
    match &calls[0] {
        BackendCall::Submit(request) => {
            assert_eq!(request.domain_id, "coding");
            assert_eq!(request.llm_model, "mistral");
            assert_eq!(request.rubrics.len(), 2);
            assert_eq!(request.test_cases.len(), 2);
            assert_eq!(request.test_cases[1].expected_output, None);
        }
        other => panic!("expected submit first, got {other:?}"),
    }
    assert_eq!(calls[1], BackendCall::Run("eval-1".to_string()));
    assert_eq!(calls[2], BackendCall::FetchResults("eval-1".to_string()));

    let results = wizard.results().expect("results stored");
    assert_eq!(results.output_judge.overall_score, 84.0);
    assert!(results.test_case(2).unwrap().generation_success);
    assert_eq!(wizard.evaluation_id(), Some("eval-1"));
    assert!(wizard.analysis_error().is_none());
    assert!(!wizard.is_analyzing());
}

#[tokio::test]
async fn reanalyze_reuses_cached_evaluation_id() {
    let backend = MemoryBackend::new().with_results(Scripted::Ok(judged_payload()));
    let mut wizard = wizard_in_phase3();
    let orchestrator = Orchestrator::new(&backend);

    orchestrator.analyze(&mut wizard).await.unwrap();
    orchestrator.reanalyze(&mut wizard).await.unwrap();
    orchestrator.analyze(&mut wizard).await.unwrap();

    assert_eq!(backend.submit_count(), 1);
    assert_eq!(backend.calls().len(), 7);
    assert!(wizard.results().is_some());
}

#[tokio::test]
async fn failed_run_then_retry_does_not_resubmit() {
    let backend = MemoryBackend::new().with_run(Scripted::Unreachable);
    let mut wizard = wizard_in_phase3();
    let orchestrator = Orchestrator::new(&backend);

    orchestrator.analyze(&mut wizard).await.unwrap_err();
    assert!(wizard.results().is_none());
    assert!(wizard.analysis_error().is_some());

    backend.set_run(Scripted::Ok(()));
    backend.set_results(Scripted::Ok(judged_payload()));
    orchestrator.reanalyze(&mut wizard).await.unwrap();

    assert_eq!(backend.submit_count(), 1);
    assert!(wizard.analysis_error().is_none());
    assert!(wizard.results().is_some());
}

#[tokio::test]
async fn start_over_forgets_evaluation_id() {
    let backend = MemoryBackend::new();
    let mut wizard = wizard_in_phase3();
    let orchestrator = Orchestrator::new(&backend);

    orchestrator.analyze(&mut wizard).await.unwrap();
    wizard.reset();
    assert!(wizard.evaluation_id().is_none());
    assert_eq!(wizard.phase(), Phase::DomainAndRubrics);

    let mut wizard = wizard_in_phase3();
    orchestrator.analyze(&mut wizard).await.unwrap();
    assert_eq!(backend.submit_count(), 2);
}

#[tokio::test]
async fn busy_wizard_rejects_second_analysis() {
    let backend = MemoryBackend::new();
    let mut wizard = wizard_in_phase3();
    wizard.begin_analysis().unwrap();

    let err = Orchestrator::new(&backend)
        .analyze(&mut wizard)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("already running"));
    assert!(backend.calls().is_empty());
    assert!(wizard.is_analyzing());
}

#[tokio::test]
async fn analysis_outside_phase3_is_rejected() {
    let backend = MemoryBackend::new();
    let mut wizard = wizard_in_phase3();
    wizard.previous();

    let err = Orchestrator::new(&backend)
        .analyze(&mut wizard)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        evaluator_core::AnalysisError::Wizard(WizardError::WrongPhase { .. })
    ));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn report_from_wizard_results() {
    let backend = MemoryBackend::new().with_results(Scripted::Ok(judged_payload()));
    let mut wizard = wizard_in_phase3();
    Orchestrator::new(&backend)
        .analyze(&mut wizard)
        .await
        .unwrap();

    wizard.expand_all();
    assert!(wizard.expanded_rows().is_expanded(1));
    assert!(wizard.expanded_rows().is_expanded(2));
    assert!(!wizard.toggle_test_case(1));

    let report = AnalysisReport::build(
        wizard.results().unwrap(),
        wizard.rubrics(),
        wizard.evaluation_id(),
    );
    let weights: Vec<Option<u32>> = report.rubric_scores.iter().map(|r| r.weight).collect();
    assert_eq!(weights, vec![Some(60), Some(40)]);

    let text = evaluator_core::render_report_text(&report, wizard.expanded_rows());
    assert!(text.contains("Clarity (weight 40%): 39/100 [destructive]"));
    assert!(text.contains("> Test Case 1: 95/100 [default]"));
    assert!(text.contains("v Test Case 2: 73/100 [default]"));
}
