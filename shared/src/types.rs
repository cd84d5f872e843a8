//! Common types used across the inspection service

use serde::{Deserialize, Serialize};

/// Supported report languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Spanish,
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::English => "en",
        }
    }

    /// Parse a language code, falling back to Spanish for anything unknown
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Language::English,
            _ => Language::Spanish,
        }
    }
}

/// Screen of the inspection form flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Welcome screen with a single "continue" action
    #[default]
    Landing,
    /// Field record and sampling inputs, results and exports
    Analysis,
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Page::Landing => write!(f, "landing"),
            Page::Analysis => write!(f, "analysis"),
        }
    }
}
