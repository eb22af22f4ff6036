//! Quick-action prompt templates
//!
//! Quick actions prefill the chat input with the start of a common clinical
//! question. The user completes the sentence before sending.

use std::fmt;

/// A canned opening for a common consultation question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    /// Ask for interpretation of a genetic variant
    VariantInterpretation,
    /// Ask for a risk assessment
    RiskAssessment,
    /// Ask for treatment guidelines
    TreatmentGuidelines,
}

impl QuickAction {
    /// All quick actions in menu order
    pub const ALL: [QuickAction; 3] = [
        Self::VariantInterpretation,
        Self::RiskAssessment,
        Self::TreatmentGuidelines,
    ];

    /// Text placed in the input line
    ///
    /// # Examples
    ///
    /// ```
    /// use clinchat::prompts::QuickAction;
    ///
    /// let text = QuickAction::RiskAssessment.template();
    /// assert_eq!(text, "Provide a risk assessment for: ");
    /// ```
    pub fn template(&self) -> &'static str {
        match self {
            Self::VariantInterpretation => "Interpret the following genetic variant: ",
            Self::RiskAssessment => "Provide a risk assessment for: ",
            Self::TreatmentGuidelines => "What are the treatment guidelines for: ",
        }
    }

    /// Chat command that triggers this action
    pub fn command(&self) -> &'static str {
        match self {
            Self::VariantInterpretation => "/variant",
            Self::RiskAssessment => "/risk",
            Self::TreatmentGuidelines => "/guidelines",
        }
    }
}

impl fmt::Display for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VariantInterpretation => write!(f, "Variant interpretation"),
            Self::RiskAssessment => write!(f, "Risk assessment"),
            Self::TreatmentGuidelines => write!(f, "Treatment guidelines"),
        }
    }
}
