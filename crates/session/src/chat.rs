//! Canned-response support chat.
//!
//! A pure keyword matcher: the widget feeds shopper messages in and
//! renders whatever comes back. No history, no context, no network.

/// One canned response with its trigger keywords.
#[derive(Debug, Clone)]
struct CannedResponse {
    keywords: &'static [&'static str],
    reply: &'static str,
}

/// Reply used when no rule matches.
const FALLBACK_REPLY: &str =
    "Thanks for reaching out! A member of our team will get back to you soon. \
     You can also email us through the contact form.";

/// Rules in evaluation order; the first rule with any keyword found in
/// the lowercased message wins.
const CANNED_RESPONSES: &[CannedResponse] = &[
    CannedResponse {
        keywords: &["hello", "hi ", "hey"],
        reply: "Hi there! How can I help you today?",
    },
    CannedResponse {
        keywords: &["refund", "money back", "cancel"],
        reply: "Refunds are available within 30 days of purchase. \
                Reply with your order number and we'll take care of it.",
    },
    CannedResponse {
        keywords: &["price", "cost", "how much", "discount"],
        reply: "Course prices are listed on each course page. \
                Keep an eye on the homepage for seasonal discounts!",
    },
    CannedResponse {
        keywords: &["access", "login", "sign in", "account"],
        reply: "You can access your courses anytime from your account page \
                after signing in.",
    },
    CannedResponse {
        keywords: &["certificate", "completion"],
        reply: "Every course comes with a certificate of completion once \
                you finish all lessons.",
    },
];

/// Stateless keyword-matching autoresponder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Autoresponder;

impl Autoresponder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Reply to a shopper message. Pure: the same input always produces
    /// the same reply.
    #[must_use]
    pub fn reply(&self, message: &str) -> &'static str {
        let lowered = message.to_lowercase();
        CANNED_RESPONSES
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k)))
            .map_or(FALLBACK_REPLY, |rule| rule.reply)
    }
}
