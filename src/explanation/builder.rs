use crate::evaluators::CriterionResult;

/// Sole reason emitted when no criterion could be evaluated
pub const INSUFFICIENT_DATA: &str = "insufficient data";

/// Stateless reason builder: output depends only on the results passed in
pub struct ExplanationBuilder;

impl ExplanationBuilder {
    /// Reason string for one result
    pub fn reason(result: &CriterionResult<'_>) -> String {
        format!("{}:{}", result.reason_key(), result.label.reason_text())
    }

    /// Reasons in the order given, which callers keep as registry order.
    ///
    /// An empty result set yields the `INSUFFICIENT_DATA` sentinel.
    pub fn build(results: &[CriterionResult<'_>]) -> Vec<String> {
        if results.is_empty() {
            return vec![INSUFFICIENT_DATA.to_string()];
        }
        results.iter().map(Self::reason).collect()
    }
}
