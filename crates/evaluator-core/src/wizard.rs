//! Three-phase prompt-management wizard.
//!
//! Phase 1 collects the domain and weighted rubrics, phase 2 the prompt,
//! model, API key and test cases, phase 3 launches the evaluation and holds
//! its results. Movement is one phase at a time; moving forward is gated on
//! the current phase being complete, moving back never discards input.
//!
//! The wizard only holds state. Network round trips live in
//! [`crate::key_validation`] and [`crate::orchestration`], which drive the
//! `start_*` guards below so a busy flag and stale results are handled in
//! one place. A guard dropped mid-flight releases its busy flag.

use evaluator_client::{SubmitEvaluationRequest, ValidateKeyRequest};
use serde::{Deserialize, Serialize};

use crate::catalog::{self, ModelDescriptor, Provider};
use crate::domain::{
    total_weight, AnalysisError, AnalysisResults, ApiKeySet, Result, Rubric, TestCase,
    WizardError, REQUIRED_TOTAL_WEIGHT,
};
use crate::key_validation::{KeyValidation, KeyValidationTicket};
use crate::render::ExpandedRows;

/// Wizard phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    DomainAndRubrics,
    PromptAndTestCases,
    Results,
}

impl Phase {
    /// 1-based phase number.
    pub fn number(self) -> u8 {
        match self {
            Phase::DomainAndRubrics => 1,
            Phase::PromptAndTestCases => 2,
            Phase::Results => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Phase::DomainAndRubrics => "Domain & Rubrics",
            Phase::PromptAndTestCases => "Prompt & Test Cases",
            Phase::Results => "LLM Judge Results",
        }
    }

    fn next(self) -> Option<Phase> {
        match self {
            Phase::DomainAndRubrics => Some(Phase::PromptAndTestCases),
            Phase::PromptAndTestCases => Some(Phase::Results),
            Phase::Results => None,
        }
    }

    fn previous(self) -> Option<Phase> {
        match self {
            Phase::DomainAndRubrics => None,
            Phase::PromptAndTestCases => Some(Phase::DomainAndRubrics),
            Phase::Results => Some(Phase::PromptAndTestCases),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "phase {} ({})", self.number(), self.title())
    }
}

/// A condition blocking a forward transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum GateIssue {
    NoDomain,
    NoRubrics,
    WeightTotal { total: u32 },
    EmptyPrompt,
    NoModel,
    MissingApiKey { provider: Provider },
    /// 1-based position of the test case in the list.
    EmptyTestCaseInput { position: usize },
}

impl std::fmt::Display for GateIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateIssue::NoDomain => f.write_str("Select a domain"),
            GateIssue::NoRubrics => f.write_str("Add at least one rubric"),
            GateIssue::WeightTotal { total } => write!(
                f,
                "Total weight must equal {REQUIRED_TOTAL_WEIGHT}%. Current: {total}%"
            ),
            GateIssue::EmptyPrompt => f.write_str("Enter a prompt"),
            GateIssue::NoModel => f.write_str("Select an LLM"),
            GateIssue::MissingApiKey { provider } => {
                write!(f, "Enter an API key for provider {provider}")
            }
            GateIssue::EmptyTestCaseInput { position } => {
                write!(f, "Test Case {position} needs an input")
            }
        }
    }
}

/// All state of one wizard session.
#[derive(Debug, Clone)]
pub struct Wizard {
    phase: Phase,
    domain: Option<String>,
    rubrics: Vec<Rubric>,
    prompt: String,
    model: Option<String>,
    api_keys: ApiKeySet,
    test_cases: Vec<TestCase>,
    next_test_case_id: u64,
    // Bumped on every model or key edit; in-flight validations carry the
    // value they started with.
    credentials_revision: u64,
    validating_key: bool,
    key_validation: Option<KeyValidation>,
    analyzing: bool,
    evaluation_id: Option<String>,
    results: Option<AnalysisResults>,
    analysis_error: Option<String>,
    expanded: ExpandedRows,
}

impl Default for Wizard {
    fn default() -> Self {
        Self {
            phase: Phase::DomainAndRubrics,
            domain: None,
            rubrics: Vec::new(),
            prompt: String::new(),
            model: None,
            api_keys: ApiKeySet::new(),
            test_cases: vec![TestCase::blank("1")],
            next_test_case_id: 2,
            credentials_revision: 0,
            validating_key: false,
            key_validation: None,
            analyzing: false,
            evaluation_id: None,
            results: None,
            analysis_error: None,
            expanded: ExpandedRows::default(),
        }
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advance one phase if the current one is complete. At the last phase
    /// this is a no-op.
    pub fn next(&mut self) -> Result<Phase> {
        let Some(target) = self.phase.next() else {
            return Ok(self.phase);
        };
        let issues = self.issues_for(self.phase);
        if !issues.is_empty() {
            return Err(WizardError::PhaseIncomplete {
                phase: self.phase,
                issues,
            });
        }
        tracing::debug!(from = %self.phase, to = %target, "wizard advanced");
        self.phase = target;
        Ok(self.phase)
    }

    /// Step back one phase, keeping all entered data.
    pub fn previous(&mut self) -> Phase {
        if let Some(target) = self.phase.previous() {
            self.phase = target;
        }
        self.phase
    }

    /// Start over: every field back to its initial value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn issues_for(&self, phase: Phase) -> Vec<GateIssue> {
        match phase {
            Phase::DomainAndRubrics => self.phase1_issues(),
            Phase::PromptAndTestCases => self.phase2_issues(),
            Phase::Results => Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Phase 1: domain & rubrics
    // ------------------------------------------------------------------

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn select_domain(&mut self, domain_id: &str) -> Result<()> {
        let domain = catalog::find_domain(domain_id)
            .ok_or_else(|| WizardError::UnknownDomain(domain_id.to_string()))?;
        self.domain = Some(domain.id.to_string());
        Ok(())
    }

    pub fn rubrics(&self) -> &[Rubric] {
        &self.rubrics
    }

    /// Add a catalog rubric at weight 0. Returns `false` if it was already
    /// selected.
    pub fn add_rubric(&mut self, rubric_id: &str) -> Result<bool> {
        if self.rubrics.iter().any(|r| r.id == rubric_id) {
            return Ok(false);
        }
        let descriptor = catalog::find_rubric(rubric_id)
            .ok_or_else(|| WizardError::UnknownRubric(rubric_id.to_string()))?;
        self.rubrics.push(Rubric::from_descriptor(descriptor));
        Ok(true)
    }

    /// Returns `false` if the rubric was not selected.
    pub fn remove_rubric(&mut self, rubric_id: &str) -> bool {
        let before = self.rubrics.len();
        self.rubrics.retain(|r| r.id != rubric_id);
        self.rubrics.len() != before
    }

    /// Set a selected rubric's weight; values above 100 are clamped.
    pub fn set_rubric_weight(&mut self, rubric_id: &str, weight: u32) -> Result<()> {
        let rubric = self
            .rubrics
            .iter_mut()
            .find(|r| r.id == rubric_id)
            .ok_or_else(|| WizardError::RubricNotSelected(rubric_id.to_string()))?;
        rubric.set_weight(weight);
        Ok(())
    }

    pub fn total_weight(&self) -> u32 {
        total_weight(&self.rubrics)
    }

    pub fn phase1_issues(&self) -> Vec<GateIssue> {
        let mut issues = Vec::new();
        if self.domain.is_none() {
            issues.push(GateIssue::NoDomain);
        }
        if self.rubrics.is_empty() {
            issues.push(GateIssue::NoRubrics);
        }
        let total = self.total_weight();
        if total != REQUIRED_TOTAL_WEIGHT {
            issues.push(GateIssue::WeightTotal { total });
        }
        issues
    }

    pub fn is_phase1_complete(&self) -> bool {
        self.phase1_issues().is_empty()
    }

    // ------------------------------------------------------------------
    // Phase 2: prompt, model, key, test cases
    // ------------------------------------------------------------------

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn selected_model(&self) -> Option<&'static ModelDescriptor> {
        self.model.as_deref().and_then(catalog::find_model)
    }

    /// Select a model. Clears any previous key validation result.
    pub fn select_model(&mut self, model_id: &str) -> Result<()> {
        let model = catalog::find_model(model_id)
            .ok_or_else(|| WizardError::UnknownModel(model_id.to_string()))?;
        self.model = Some(model.id.to_string());
        self.invalidate_key_validation();
        Ok(())
    }

    pub fn selected_provider(&self) -> Option<Provider> {
        self.selected_model().map(|m| m.provider)
    }

    /// Raw key for the selected model's provider, `""` without a model.
    pub fn selected_api_key(&self) -> &str {
        self.selected_provider()
            .map(|p| self.api_keys.get(p))
            .unwrap_or("")
    }

    pub fn api_keys(&self) -> &ApiKeySet {
        &self.api_keys
    }

    /// Store a provider key. Clears any previous key validation result.
    pub fn set_api_key(&mut self, provider: Provider, key: impl Into<String>) {
        self.api_keys.set(provider, key);
        self.invalidate_key_validation();
    }

    /// Model id and trimmed key, when both are present.
    pub fn credentials(&self) -> Option<(&'static str, String)> {
        let model = self.selected_model()?;
        let key = self.selected_api_key().trim();
        if key.is_empty() {
            return None;
        }
        Some((model.id, key.to_string()))
    }

    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    /// Append a blank test case and return its id.
    pub fn add_test_case(&mut self) -> String {
        let id = self.next_test_case_id.to_string();
        self.next_test_case_id += 1;
        self.test_cases.push(TestCase::blank(id.clone()));
        id
    }

    /// Remove a test case. The last one is never removed (returns `false`).
    pub fn remove_test_case(&mut self, id: &str) -> Result<bool> {
        if !self.test_cases.iter().any(|tc| tc.id == id) {
            return Err(WizardError::UnknownTestCase(id.to_string()));
        }
        if self.test_cases.len() <= 1 {
            return Ok(false);
        }
        self.test_cases.retain(|tc| tc.id != id);
        Ok(true)
    }

    pub fn set_test_case_input(&mut self, id: &str, input: impl Into<String>) -> Result<()> {
        self.test_case_mut(id)?.input = input.into();
        Ok(())
    }

    pub fn set_test_case_expected(&mut self, id: &str, expected: Option<String>) -> Result<()> {
        self.test_case_mut(id)?.expected_output = expected;
        Ok(())
    }

    fn test_case_mut(&mut self, id: &str) -> Result<&mut TestCase> {
        self.test_cases
            .iter_mut()
            .find(|tc| tc.id == id)
            .ok_or_else(|| WizardError::UnknownTestCase(id.to_string()))
    }

    pub fn phase2_issues(&self) -> Vec<GateIssue> {
        let mut issues = Vec::new();
        if self.prompt.trim().is_empty() {
            issues.push(GateIssue::EmptyPrompt);
        }
        match self.selected_provider() {
            None => issues.push(GateIssue::NoModel),
            Some(provider) if self.api_keys.get(provider).trim().is_empty() => {
                issues.push(GateIssue::MissingApiKey { provider });
            }
            Some(_) => {}
        }
        for (i, tc) in self.test_cases.iter().enumerate() {
            if !tc.is_filled() {
                issues.push(GateIssue::EmptyTestCaseInput { position: i + 1 });
            }
        }
        issues
    }

    pub fn is_phase2_complete(&self) -> bool {
        self.phase2_issues().is_empty()
    }

    // ------------------------------------------------------------------
    // Key validation hooks
    // ------------------------------------------------------------------

    pub fn key_validation(&self) -> Option<&KeyValidation> {
        self.key_validation.as_ref()
    }

    pub fn is_validating_key(&self) -> bool {
        self.validating_key
    }

    fn invalidate_key_validation(&mut self) {
        self.credentials_revision += 1;
        self.key_validation = None;
    }

    /// Start a validation round trip. `Ok(None)` when there is nothing to
    /// validate (no model or blank key).
    pub fn begin_key_validation(&mut self) -> Result<Option<KeyValidationTicket>> {
        if self.validating_key {
            return Err(WizardError::ValidationInProgress);
        }
        let Some((model, key)) = self.credentials() else {
            return Ok(None);
        };
        self.validating_key = true;
        self.key_validation = None;
        Ok(Some(KeyValidationTicket::new(
            model,
            key,
            self.credentials_revision,
        )))
    }

    /// Record a validation outcome. Dropped (returns `false`) when the model
    /// or key changed since the ticket was issued.
    pub fn finish_key_validation(
        &mut self,
        ticket: KeyValidationTicket,
        outcome: KeyValidation,
    ) -> bool {
        self.record_key_validation(ticket.revision(), outcome)
    }

    fn record_key_validation(&mut self, revision: u64, outcome: KeyValidation) -> bool {
        self.validating_key = false;
        if revision != self.credentials_revision {
            return false;
        }
        self.key_validation = Some(outcome);
        true
    }

    /// Like [`Wizard::begin_key_validation`], but the busy flag is tied to
    /// the returned guard and released if it is dropped unfinished.
    pub fn start_key_validation(&mut self) -> Result<Option<KeyValidationGuard<'_>>> {
        let Some(ticket) = self.begin_key_validation()? else {
            return Ok(None);
        };
        Ok(Some(KeyValidationGuard {
            wizard: self,
            ticket,
        }))
    }

    // ------------------------------------------------------------------
    // Phase 3: analysis hooks
    // ------------------------------------------------------------------

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn evaluation_id(&self) -> Option<&str> {
        self.evaluation_id.as_deref()
    }

    pub fn results(&self) -> Option<&AnalysisResults> {
        self.results.as_ref()
    }

    pub fn analysis_error(&self) -> Option<&str> {
        self.analysis_error.as_deref()
    }

    /// Submission body built from the current inputs; `None` without a
    /// model. Prompt, key and test-case texts are trimmed.
    pub fn submission_request(&self) -> Option<SubmitEvaluationRequest> {
        let model = self.selected_model()?;
        Some(SubmitEvaluationRequest {
            domain_id: self.domain.clone().unwrap_or_default(),
            rubrics: self.rubrics.iter().map(Rubric::to_payload).collect(),
            prompt: self.prompt.trim().to_string(),
            llm_model: model.id.to_string(),
            api_key: self.selected_api_key().trim().to_string(),
            test_cases: self.test_cases.iter().map(TestCase::to_payload).collect(),
        })
    }

    /// Mark an analysis as running. Only valid in phase 3 with nothing
    /// else in flight. Clears previous results and error.
    pub fn begin_analysis(&mut self) -> Result<()> {
        self.check_can_analyze()?;
        self.analyzing = true;
        self.analysis_error = None;
        self.results = None;
        Ok(())
    }

    /// Phase 3 with no analysis in flight. Changes nothing.
    pub fn check_can_analyze(&self) -> Result<()> {
        if self.phase != Phase::Results {
            return Err(WizardError::WrongPhase {
                expected: Phase::Results,
                actual: self.phase,
            });
        }
        if self.analyzing {
            return Err(WizardError::AnalysisInProgress);
        }
        Ok(())
    }

    /// Like [`Wizard::begin_analysis`], but the busy flag is tied to the
    /// returned guard and released if it is dropped unfinished.
    pub fn start_analysis(&mut self) -> Result<AnalysisGuard<'_>> {
        self.begin_analysis()?;
        Ok(AnalysisGuard { wizard: self })
    }

    /// Show a failure without touching results or the busy flag.
    pub fn record_analysis_error(&mut self, message: impl Into<String>) {
        self.analysis_error = Some(message.into());
    }

    /// Cache the id returned by a successful submission.
    pub fn set_evaluation_id(&mut self, evaluation_id: impl Into<String>) {
        self.evaluation_id = Some(evaluation_id.into());
    }

    /// Drop cached results ahead of a re-analysis. The evaluation id stays.
    pub fn clear_results(&mut self) {
        self.results = None;
    }

    /// Release the busy flag and store the outcome; a failure is kept as
    /// the user-visible message and handed back.
    pub fn finish_analysis(
        &mut self,
        outcome: std::result::Result<AnalysisResults, AnalysisError>,
    ) -> std::result::Result<(), AnalysisError> {
        self.analyzing = false;
        match outcome {
            Ok(results) => {
                self.results = Some(results);
                Ok(())
            }
            Err(err) => {
                self.analysis_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Result rows
    // ------------------------------------------------------------------

    pub fn expanded_rows(&self) -> &ExpandedRows {
        &self.expanded
    }

    /// Expand or collapse one test-case row.
    pub fn toggle_test_case(&mut self, index: u32) -> bool {
        self.expanded.toggle(index)
    }

    /// Expand every judged test-case row.
    pub fn expand_all(&mut self) {
        if let Some(results) = &self.results {
            let indices: Vec<u32> = results
                .output_judge
                .test_case_scores
                .iter()
                .map(|s| s.test_case_index)
                .collect();
            self.expanded.expand_all(indices);
        }
    }
}

/// Busy flag of an in-flight key validation.
#[derive(Debug)]
pub struct KeyValidationGuard<'w> {
    wizard: &'w mut Wizard,
    ticket: KeyValidationTicket,
}

impl KeyValidationGuard<'_> {
    pub fn request(&self) -> &ValidateKeyRequest {
        self.ticket.request()
    }

    /// Record the outcome; `None` when the credentials changed meanwhile.
    pub fn finish(self, outcome: KeyValidation) -> Option<KeyValidation> {
        let revision = self.ticket.revision();
        if self.wizard.record_key_validation(revision, outcome) {
            self.wizard.key_validation.clone()
        } else {
            None
        }
    }
}

impl Drop for KeyValidationGuard<'_> {
    fn drop(&mut self) {
        self.wizard.validating_key = false;
    }
}

/// Busy flag of an in-flight analysis.
#[derive(Debug)]
pub struct AnalysisGuard<'w> {
    wizard: &'w mut Wizard,
}

impl AnalysisGuard<'_> {
    pub fn wizard(&mut self) -> &mut Wizard {
        &mut *self.wizard
    }

    pub fn finish(
        self,
        outcome: std::result::Result<AnalysisResults, AnalysisError>,
    ) -> std::result::Result<(), AnalysisError> {
        self.wizard.finish_analysis(outcome)
    }
}

impl Drop for AnalysisGuard<'_> {
    fn drop(&mut self) {
        if self.wizard.analyzing {
            tracing::debug!("analysis dropped before completion");
            self.wizard.analyzing = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_rubrics(weights: &[(&str, u32)]) -> Wizard {
        let mut wizard = Wizard::new();
        wizard.select_domain("coding").unwrap();
        for (id, weight) in weights {
            wizard.add_rubric(id).unwrap();
            wizard.set_rubric_weight(id, *weight).unwrap();
        }
        wizard
    }

    fn ready_for_phase2() -> Wizard {
        let mut wizard = with_rubrics(&[("coding", 60), ("clarity", 40)]);
        wizard.next().unwrap();
        wizard
    }

    #[test]
    fn test_phase1_complete_when_weights_total_100() {
        let wizard = with_rubrics(&[("coding", 60), ("clarity", 40)]);
        assert!(wizard.is_phase1_complete());
    }

    #[test]
    fn test_phase1_incomplete_when_weights_total_90() {
        let wizard = with_rubrics(&[("coding", 60), ("clarity", 30)]);
        assert!(!wizard.is_phase1_complete());
        assert_eq!(
            wizard.phase1_issues(),
            vec![GateIssue::WeightTotal { total: 90 }]
        );
    }

    #[test]
    fn test_phase1_weight_must_be_exact() {
        assert!(!with_rubrics(&[("coding", 99)]).is_phase1_complete());
        assert!(!with_rubrics(&[("coding", 60), ("clarity", 41)]).is_phase1_complete());
        assert!(with_rubrics(&[("coding", 100)]).is_phase1_complete());
    }

    #[test]
    fn test_phase1_requires_domain_and_rubric() {
        let wizard = Wizard::new();
        let issues = wizard.phase1_issues();
        assert!(issues.contains(&GateIssue::NoDomain));
        assert!(issues.contains(&GateIssue::NoRubrics));
        assert!(issues.contains(&GateIssue::WeightTotal { total: 0 }));
    }

    #[test]
    fn test_next_blocked_until_phase1_complete() {
        let mut wizard = with_rubrics(&[("coding", 50)]);
        let err = wizard.next().unwrap_err();
        assert!(matches!(
            err,
            WizardError::PhaseIncomplete {
                phase: Phase::DomainAndRubrics,
                ..
            }
        ));
        assert_eq!(wizard.phase(), Phase::DomainAndRubrics);
    }

    #[test]
    fn test_add_rubric_rejects_duplicates_and_unknown() {
        let mut wizard = Wizard::new();
        assert!(wizard.add_rubric("accuracy").unwrap());
        assert!(!wizard.add_rubric("accuracy").unwrap());
        assert_eq!(wizard.rubrics().len(), 1);
        assert!(matches!(
            wizard.add_rubric("vibes"),
            Err(WizardError::UnknownRubric(_))
        ));
    }

    #[test]
    fn test_remove_rubric_updates_total() {
        let mut wizard = with_rubrics(&[("coding", 60), ("clarity", 40)]);
        assert!(wizard.remove_rubric("clarity"));
        assert!(!wizard.remove_rubric("clarity"));
        assert_eq!(wizard.total_weight(), 60);
    }

    #[test]
    fn test_unknown_domain_rejected() {
        let mut wizard = Wizard::new();
        assert!(matches!(
            wizard.select_domain("astrology"),
            Err(WizardError::UnknownDomain(_))
        ));
        assert!(wizard.domain().is_none());
    }

    #[test]
    fn test_phase2_gate() {
        let mut wizard = ready_for_phase2();
        assert_eq!(
            wizard.phase2_issues(),
            vec![
                GateIssue::EmptyPrompt,
                GateIssue::NoModel,
                GateIssue::EmptyTestCaseInput { position: 1 }
            ]
        );

        wizard.set_prompt("  Solve the task  ");
        wizard.select_model("gemini_2_5_flash").unwrap();
        assert!(wizard
            .phase2_issues()
            .contains(&GateIssue::MissingApiKey {
                provider: Provider::Google
            }));

        wizard.set_api_key(Provider::Google, "g-key");
        wizard.set_test_case_input("1", "2 + 2").unwrap();
        assert!(wizard.is_phase2_complete());

        let second = wizard.add_test_case();
        wizard.set_test_case_input(&second, "   ").unwrap();
        assert_eq!(
            wizard.phase2_issues(),
            vec![GateIssue::EmptyTestCaseInput { position: 2 }]
        );
    }

    #[test]
    fn test_key_for_other_provider_does_not_count() {
        let mut wizard = ready_for_phase2();
        wizard.set_prompt("p");
        wizard.set_test_case_input("1", "x").unwrap();
        wizard.select_model("mistral").unwrap();
        wizard.set_api_key(Provider::OpenAi, "sk-openai");
        assert!(!wizard.is_phase2_complete());
        assert_eq!(wizard.selected_api_key(), "");
    }

    #[test]
    fn test_previous_preserves_data() {
        let mut wizard = ready_for_phase2();
        wizard.set_prompt("keep me");
        assert_eq!(wizard.previous(), Phase::DomainAndRubrics);
        assert_eq!(wizard.previous(), Phase::DomainAndRubrics);
        assert_eq!(wizard.total_weight(), 100);
        assert_eq!(wizard.next().unwrap(), Phase::PromptAndTestCases);
        assert_eq!(wizard.prompt(), "keep me");
    }

    #[test]
    fn test_last_test_case_cannot_be_removed() {
        let mut wizard = Wizard::new();
        assert!(!wizard.remove_test_case("1").unwrap());
        let id = wizard.add_test_case();
        assert_ne!(id, "1");
        assert!(wizard.remove_test_case("1").unwrap());
        assert_eq!(wizard.test_cases().len(), 1);
        assert!(matches!(
            wizard.remove_test_case("nope"),
            Err(WizardError::UnknownTestCase(_))
        ));
    }

    #[test]
    fn test_test_case_ids_are_fresh_after_removal() {
        let mut wizard = Wizard::new();
        let a = wizard.add_test_case();
        wizard.remove_test_case(&a).unwrap();
        let b = wizard.add_test_case();
        assert_ne!(a, b);
    }

    #[test]
    fn test_model_and_key_edits_clear_validation() {
        let mut wizard = Wizard::new();
        wizard.select_model("deepseek").unwrap();
        wizard.set_api_key(Provider::DeepSeek, "ds-key");

        let ticket = wizard.begin_key_validation().unwrap().unwrap();
        assert!(wizard.finish_key_validation(ticket, KeyValidation::valid("ok")));
        assert!(wizard.key_validation().is_some());

        wizard.set_api_key(Provider::DeepSeek, "ds-key-2");
        assert!(wizard.key_validation().is_none());

        let ticket = wizard.begin_key_validation().unwrap().unwrap();
        wizard.finish_key_validation(ticket, KeyValidation::valid("ok"));
        wizard.select_model("deepseek").unwrap();
        assert!(wizard.key_validation().is_none());
    }

    #[test]
    fn test_stale_validation_is_discarded() {
        let mut wizard = Wizard::new();
        wizard.select_model("mistral").unwrap();
        wizard.set_api_key(Provider::Mistral, "old");

        let ticket = wizard.begin_key_validation().unwrap().unwrap();
        assert!(wizard.is_validating_key());
        wizard.set_api_key(Provider::Mistral, "new");

        assert!(!wizard.finish_key_validation(ticket, KeyValidation::valid("ok")));
        assert!(wizard.key_validation().is_none());
        assert!(!wizard.is_validating_key());
    }

    #[test]
    fn test_validation_skipped_without_key() {
        let mut wizard = Wizard::new();
        assert!(wizard.begin_key_validation().unwrap().is_none());
        wizard.select_model("mistral").unwrap();
        wizard.set_api_key(Provider::Mistral, "   ");
        assert!(wizard.begin_key_validation().unwrap().is_none());
    }

    #[test]
    fn test_begin_analysis_requires_phase3_and_not_busy() {
        let mut wizard = Wizard::new();
        assert!(matches!(
            wizard.begin_analysis(),
            Err(WizardError::WrongPhase { .. })
        ));

        wizard.phase = Phase::Results;
        wizard.begin_analysis().unwrap();
        assert!(matches!(
            wizard.begin_analysis(),
            Err(WizardError::AnalysisInProgress)
        ));
        wizard
            .finish_analysis(Err(AnalysisError::ResultsUnavailable))
            .unwrap_err();
        assert!(!wizard.is_analyzing());
        assert_eq!(
            wizard.analysis_error(),
            Some("Failed to load evaluation results.")
        );
    }

    #[test]
    fn test_submission_request_trims_inputs() {
        let mut wizard = ready_for_phase2();
        wizard.set_prompt("  Do it \n");
        wizard.select_model("openai_gpt5_mini").unwrap();
        wizard.set_api_key(Provider::OpenAi, " sk-1 ");
        wizard.set_test_case_input("1", " in ").unwrap();
        wizard
            .set_test_case_expected("1", Some(" out ".to_string()))
            .unwrap();

        let request = wizard.submission_request().unwrap();
        assert_eq!(request.domain_id, "coding");
        assert_eq!(request.prompt, "Do it");
        assert_eq!(request.api_key, "sk-1");
        assert_eq!(request.llm_model, "openai_gpt5_mini");
        assert_eq!(request.rubrics.len(), 2);
        assert_eq!(request.test_cases[0].input, "in");
        assert_eq!(request.test_cases[0].expected_output.as_deref(), Some("out"));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut wizard = ready_for_phase2();
        wizard.set_prompt("x");
        wizard.select_model("mistral").unwrap();
        wizard.set_api_key(Provider::Mistral, "k");
        wizard.add_test_case();
        wizard.set_evaluation_id("ev-1");
        wizard.toggle_test_case(2);

        wizard.reset();

        assert_eq!(wizard.phase(), Phase::DomainAndRubrics);
        assert!(wizard.domain().is_none());
        assert!(wizard.rubrics().is_empty());
        assert_eq!(wizard.prompt(), "");
        assert!(wizard.selected_model().is_none());
        assert!(wizard.api_keys().is_empty());
        assert_eq!(wizard.test_cases(), &[TestCase::blank("1")]);
        assert!(wizard.evaluation_id().is_none());
        assert!(wizard.results().is_none());
        assert!(wizard.analysis_error().is_none());
        assert!(wizard.expanded_rows().is_empty());
    }

    #[test]
    fn test_next_at_last_phase_is_noop() {
        let mut wizard = Wizard::new();
        wizard.phase = Phase::Results;
        assert_eq!(wizard.next().unwrap(), Phase::Results);
    }
}
