//! Core domain model for the site chatbot.
//!
//! This crate defines the fundamental types shared by every other crate:
//! - `Intent`: The closed set of recognized user needs
//! - `ResponseEntry`: A canned answer with an optional call to action
//! - `QuickReplyOption`: A pre-classified menu button
//! - `Message`: One entry of a widget transcript

use std::fmt;

use serde::{Deserialize, Serialize};

/// A recognized user need.
///
/// Tags come in two tiers: general tags and topic-qualified refinements
/// for the research, solution and education topics. `Education` doubles as
/// the education topic's catch-all, `SolutionFeatures` as the solution
/// topic's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Pricing,
    Public,
    Service,
    Education,
    Contact,
    /// Nothing matched
    Default,

    ResearchGeneral,
    ResearchPricing,
    ResearchPublic,
    ResearchProcess,
    ResearchSample,
    ResearchOutput,
    ResearchStandalone,

    SolutionFeatures,
    SolutionPublic,
    SolutionPricing,
    SolutionData,
    SolutionReport,
    SolutionOnboarding,
    SolutionBundle,

    EducationCard,
    EducationPricing,
    EducationBeginner,
    EducationFormat,
    EducationDuration,
    EducationCertificate,
}

impl Intent {
    /// Every intent tag, general tier first.
    pub const ALL: [Intent; 26] = [
        Self::Pricing,
        Self::Public,
        Self::Service,
        Self::Education,
        Self::Contact,
        Self::Default,
        Self::ResearchGeneral,
        Self::ResearchPricing,
        Self::ResearchPublic,
        Self::ResearchProcess,
        Self::ResearchSample,
        Self::ResearchOutput,
        Self::ResearchStandalone,
        Self::SolutionFeatures,
        Self::SolutionPublic,
        Self::SolutionPricing,
        Self::SolutionData,
        Self::SolutionReport,
        Self::SolutionOnboarding,
        Self::SolutionBundle,
        Self::EducationCard,
        Self::EducationPricing,
        Self::EducationBeginner,
        Self::EducationFormat,
        Self::EducationDuration,
        Self::EducationCertificate,
    ];

    /// The snake_case tag, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pricing => "pricing",
            Self::Public => "public",
            Self::Service => "service",
            Self::Education => "education",
            Self::Contact => "contact",
            Self::Default => "default",
            Self::ResearchGeneral => "research_general",
            Self::ResearchPricing => "research_pricing",
            Self::ResearchPublic => "research_public",
            Self::ResearchProcess => "research_process",
            Self::ResearchSample => "research_sample",
            Self::ResearchOutput => "research_output",
            Self::ResearchStandalone => "research_standalone",
            Self::SolutionFeatures => "solution_features",
            Self::SolutionPublic => "solution_public",
            Self::SolutionPricing => "solution_pricing",
            Self::SolutionData => "solution_data",
            Self::SolutionReport => "solution_report",
            Self::SolutionOnboarding => "solution_onboarding",
            Self::SolutionBundle => "solution_bundle",
            Self::EducationCard => "education_card",
            Self::EducationPricing => "education_pricing",
            Self::EducationBeginner => "education_beginner",
            Self::EducationFormat => "education_format",
            Self::EducationDuration => "education_duration",
            Self::EducationCertificate => "education_certificate",
        }
    }
}

impl Default for Intent {
    fn default() -> Self {
        Self::Default
    }
}

/// Permissive tag lookup: unknown tags degrade to `Intent::Default`.
impl From<&str> for Intent {
    fn from(s: &str) -> Self {
        let tag = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == tag)
            .unwrap_or_default()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call to action rendered as a link to an in-app route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cta {
    /// Button text
    pub label: String,
    /// In-app navigation path (not validated against the host router)
    pub target: String,
}

impl Cta {
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
        }
    }
}

/// The canned answer bound to one intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEntry {
    pub intent: Intent,

    /// Pre-written answer text, may span several lines
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<Cta>,
}

impl ResponseEntry {
    pub fn new(intent: Intent, message: impl Into<String>) -> Self {
        Self {
            intent,
            message: message.into(),
            cta: None,
        }
    }

    pub fn with_cta(mut self, cta: Cta) -> Self {
        self.cta = Some(cta);
        self
    }
}

/// A menu button shown before the user has typed anything.
///
/// Selecting it uses `response` directly; the label is never classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReplyOption {
    pub id: String,
    pub label: String,
    pub response: ResponseEntry,
}

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub speaker: Speaker,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<Cta>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            cta: None,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: text.into(),
            cta: None,
        }
    }

    /// Build the bot turn carrying a response's message and CTA.
    pub fn from_response(response: &ResponseEntry) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: response.message.clone(),
            cta: response.cta.clone(),
        }
    }

    pub fn is_bot(&self) -> bool {
        self.speaker == Speaker::Bot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_intent_from_str() {
        assert_eq!(Intent::from("research_pricing"), Intent::ResearchPricing);
        assert_eq!(Intent::from("  Solution_Public "), Intent::SolutionPublic);
        assert_eq!(Intent::from("education"), Intent::Education);
        assert_eq!(Intent::from("no_such_tag"), Intent::Default);
        assert_eq!(Intent::from(""), Intent::Default);
    }

    #[test]
    fn test_tags_match_serde() {
        for intent in Intent::ALL {
            let json = serde_json::to_string(&intent).unwrap();
            assert_eq!(json, format!("\"{}\"", intent.as_str()));
        }
    }

    #[test]
    fn test_all_tags_unique() {
        let mut tags: Vec<_> = Intent::ALL.iter().map(|i| i.as_str()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), Intent::ALL.len());
    }

    #[test]
    fn test_message_from_response() {
        let entry = ResponseEntry::new(Intent::Contact, "연락처 안내")
            .with_cta(Cta::new("문의하기", "/contact"));
        let message = Message::from_response(&entry);
        assert!(message.is_bot());
        assert_eq!(message.text, "연락처 안내");
        assert_eq!(message.cta, Some(Cta::new("문의하기", "/contact")));
    }

    #[test]
    fn test_message_serialization_skips_missing_cta() {
        let json = serde_json::to_string(&Message::user("안녕하세요")).unwrap();
        assert_eq!(json, r#"{"speaker":"user","text":"안녕하세요"}"#);
    }
}
