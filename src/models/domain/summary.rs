use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::domain::contract::ContractViolation;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SummaryResult {
    /// A concise, engaging title for the summary, capturing the main topic of the text.
    pub title: String,
    /// A well-structured summary of the key points, concepts, and conclusions from the provided text. It should be broken into paragraphs for readability.
    pub summary: String,
}

impl SummaryResult {
    pub fn validate(&self) -> Result<(), ContractViolation> {
        if self.title.trim().is_empty() {
            return Err(ContractViolation::EmptySummaryField("title"));
        }
        if self.summary.trim().is_empty() {
            return Err(ContractViolation::EmptySummaryField("summary"));
        }
        Ok(())
    }
}
