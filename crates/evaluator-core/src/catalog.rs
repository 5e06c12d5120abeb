//! Static reference data: evaluation domains, rubrics and supported models.

use serde::{Deserialize, Serialize};

/// An evaluation domain the prompt is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Domain {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// A rubric the prompt judge can score against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RubricDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// API key owner. One key per provider is kept by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Mistral,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openai")]
    OpenAi,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Google,
        Provider::Mistral,
        Provider::DeepSeek,
        Provider::OpenAi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Mistral => "mistral",
            Provider::DeepSeek => "deepseek",
            Provider::OpenAi => "openai",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An LLM the backend can run the prompt through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: Provider,
    pub api_key_label: &'static str,
}

pub const DOMAINS: &[Domain] = &[
    Domain {
        id: "coding",
        name: "Coding",
        description: "Programming and software development",
    },
    Domain {
        id: "reasoning",
        name: "Reasoning",
        description: "Logical reasoning and problem solving",
    },
    Domain {
        id: "mathematics",
        name: "Mathematics",
        description: "Mathematical problem solving",
    },
    Domain {
        id: "writing",
        name: "Writing",
        description: "Creative and technical writing",
    },
    Domain {
        id: "analysis",
        name: "Analysis",
        description: "Data analysis and interpretation",
    },
    Domain {
        id: "communication",
        name: "Communication",
        description: "Verbal and written communication",
    },
];

pub const RUBRICS: &[RubricDescriptor] = &[
    RubricDescriptor {
        id: "coding",
        name: "Coding",
        description: "Code quality, correctness, and best practices",
    },
    RubricDescriptor {
        id: "reasoning",
        name: "Reasoning",
        description: "Logical reasoning and problem-solving approach",
    },
    RubricDescriptor {
        id: "problem-solving",
        name: "Problem Solving",
        description: "Ability to break down and solve complex problems",
    },
    RubricDescriptor {
        id: "clarity",
        name: "Clarity",
        description: "Clear and understandable explanations",
    },
    RubricDescriptor {
        id: "completeness",
        name: "Completeness",
        description: "Thoroughness and attention to detail",
    },
    RubricDescriptor {
        id: "creativity",
        name: "Creativity",
        description: "Innovative and creative solutions",
    },
    RubricDescriptor {
        id: "accuracy",
        name: "Accuracy",
        description: "Correctness of information and results",
    },
    RubricDescriptor {
        id: "efficiency",
        name: "Efficiency",
        description: "Optimal use of resources and time",
    },
];

const GOOGLE_KEY: &str = "Google (Gemini) API Key";
const OPENAI_KEY: &str = "OpenAI API Key";

pub const MODELS: &[ModelDescriptor] = &[
    ModelDescriptor {
        id: "gemini_1_5_flash",
        name: "Gemini 1.5 Flash",
        provider: Provider::Google,
        api_key_label: GOOGLE_KEY,
    },
    ModelDescriptor {
        id: "gemini_2_5_flash",
        name: "Gemini 2.5 Flash",
        provider: Provider::Google,
        api_key_label: GOOGLE_KEY,
    },
    ModelDescriptor {
        id: "gemini_2_5_flash_lite",
        name: "Gemini 2.5 Flash Lite",
        provider: Provider::Google,
        api_key_label: GOOGLE_KEY,
    },
    ModelDescriptor {
        id: "mistral",
        name: "Mistral Small",
        provider: Provider::Mistral,
        api_key_label: "Mistral API Key",
    },
    ModelDescriptor {
        id: "deepseek",
        name: "DeepSeek Chat",
        provider: Provider::DeepSeek,
        api_key_label: "DeepSeek API Key",
    },
    ModelDescriptor {
        id: "openai_gpt4_mini",
        name: "OpenAI GPT 4.1 Mini",
        provider: Provider::OpenAi,
        api_key_label: OPENAI_KEY,
    },
    ModelDescriptor {
        id: "openai_gpt5_mini",
        name: "OpenAI GPT 5 Mini",
        provider: Provider::OpenAi,
        api_key_label: OPENAI_KEY,
    },
];

pub fn find_domain(id: &str) -> Option<&'static Domain> {
    DOMAINS.iter().find(|d| d.id == id)
}

pub fn find_rubric(id: &str) -> Option<&'static RubricDescriptor> {
    RUBRICS.iter().find(|r| r.id == id)
}

pub fn find_model(id: &str) -> Option<&'static ModelDescriptor> {
    MODELS.iter().find(|m| m.id == id)
}
