//! Message classification heuristics.
//!
//! Pure functions over free-text customer messages. They drive the
//! ticket-from-chat derivation: category, priority, tags, and the SLA
//! target all come from substring checks against the message content.
//! All functions are total over arbitrary strings, including empty ones.

use crate::models::TicketPriority;

/// Category for login/password/account issues.
pub const CATEGORY_ACCOUNT: &str = "Account & Access";
/// Category for billing/payment issues.
pub const CATEGORY_BILLING: &str = "Billing & Payments";
/// Category for bugs and errors.
pub const CATEGORY_TECHNICAL: &str = "Technical Issues";
/// Fallback category.
pub const CATEGORY_GENERAL: &str = "General Inquiry";

/// Categorize a message by case-insensitive substring match.
///
/// Checks are evaluated in order and the first match wins: account
/// keywords, then billing, then technical, else general.
pub fn categorize(text: &str) -> &'static str {
    let lower = text.to_lowercase();

    if lower.contains("login") || lower.contains("password") || lower.contains("account") {
        CATEGORY_ACCOUNT
    } else if lower.contains("billing") || lower.contains("payment") || lower.contains("charge") {
        CATEGORY_BILLING
    } else if lower.contains("bug") || lower.contains("error") || lower.contains("not working") {
        CATEGORY_TECHNICAL
    } else {
        CATEGORY_GENERAL
    }
}

/// Derive a priority from message content, most severe keywords first.
pub fn determine_priority(text: &str) -> TicketPriority {
    let lower = text.to_lowercase();

    if lower.contains("urgent") || lower.contains("emergency") || lower.contains("critical") {
        TicketPriority::Urgent
    } else if lower.contains("broken") || lower.contains("cannot") || lower.contains("stuck") {
        TicketPriority::High
    } else if lower.contains("help") || lower.contains("issue") || lower.contains("problem") {
        TicketPriority::Medium
    } else {
        TicketPriority::Low
    }
}

/// Extract tags with independent, non-exclusive substring checks.
pub fn extract_tags(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut tags = Vec::new();

    if lower.contains("login") {
        tags.push("login".to_string());
    }
    if lower.contains("password") {
        tags.push("password".to_string());
    }
    if lower.contains("billing") {
        tags.push("billing".to_string());
    }
    if lower.contains("bug") {
        tags.push("bug".to_string());
    }
    if lower.contains("feature") {
        tags.push("feature-request".to_string());
    }

    tags
}

/// SLA target resolution time in hours for a category.
pub fn sla_hours(category: &str) -> u32 {
    match category {
        CATEGORY_ACCOUNT => 4,
        CATEGORY_BILLING => 8,
        CATEGORY_TECHNICAL => 2,
        _ => 24,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_account() {
        assert_eq!(
            categorize("I can't login, password reset failed"),
            CATEGORY_ACCOUNT
        );
        assert_eq!(categorize("My ACCOUNT is locked"), CATEGORY_ACCOUNT);
    }

    #[test]
    fn test_categorize_billing() {
        assert_eq!(categorize("double charge on my card"), CATEGORY_BILLING);
        assert_eq!(categorize("Payment failed twice"), CATEGORY_BILLING);
    }

    #[test]
    fn test_categorize_technical() {
        assert_eq!(categorize("the export is not working"), CATEGORY_TECHNICAL);
        assert_eq!(categorize("I found a bug"), CATEGORY_TECHNICAL);
    }

    #[test]
    fn test_categorize_order_account_wins_over_billing() {
        // "account" is checked before "billing"
        assert_eq!(
            categorize("billing question about my account"),
            CATEGORY_ACCOUNT
        );
    }

    #[test]
    fn test_categorize_fallback() {
        assert_eq!(categorize("how do I export my data?"), CATEGORY_GENERAL);
        assert_eq!(categorize(""), CATEGORY_GENERAL);
    }

    #[test]
    fn test_priority_urgent_checked_before_high() {
        assert_eq!(
            determine_priority("this is urgent and broken"),
            TicketPriority::Urgent
        );
    }

    #[test]
    fn test_priority_ladder() {
        assert_eq!(determine_priority("EMERGENCY!"), TicketPriority::Urgent);
        assert_eq!(determine_priority("I'm stuck"), TicketPriority::High);
        assert_eq!(determine_priority("small issue"), TicketPriority::Medium);
        assert_eq!(determine_priority("just saying hi"), TicketPriority::Low);
        assert_eq!(determine_priority(""), TicketPriority::Low);
    }

    #[test]
    fn test_extract_tags_non_exclusive() {
        let tags = extract_tags("login broken, password reset shows a bug");
        assert_eq!(tags, vec!["login", "password", "bug"]);
    }

    #[test]
    fn test_extract_tags_feature_request() {
        assert_eq!(extract_tags("feature idea for you"), vec!["feature-request"]);
        assert!(extract_tags("all good").is_empty());
    }

    #[test]
    fn test_sla_table() {
        assert_eq!(sla_hours(CATEGORY_ACCOUNT), 4);
        assert_eq!(sla_hours(CATEGORY_BILLING), 8);
        assert_eq!(sla_hours(CATEGORY_TECHNICAL), 2);
        assert_eq!(sla_hours(CATEGORY_GENERAL), 24);
        assert_eq!(sla_hours("Some Custom Category"), 24);
    }
}
