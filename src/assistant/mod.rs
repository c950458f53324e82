//! Canned support assistant.
//!
//! Replies come from an ordered table of keyword groups checked against the
//! lower-cased input. The first group with a matching substring wins, so the
//! order of [`RESPONSES`] is part of the behaviour: "reschedule" contains
//! "schedule" and lands on the scheduling reply.

pub mod reply;

pub struct CannedResponse {
    pub topic: &'static str,
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
}

pub const RESPONSES: &[CannedResponse] = &[
    CannedResponse {
        topic: "schedule",
        keywords: &["next pickup", "schedule"],
        reply: "Your next pickup is scheduled for December 18th, 2024. Your assigned driver is Marcus Johnson, and you can expect the pickup around 8:00 AM based on the route schedule. Would you like to make any changes to your schedule?",
    },
    CannedResponse {
        topic: "reschedule",
        keywords: &["reschedule", "change"],
        reply: "I can help you reschedule your pickup. Our available time slots are:\n\n• Morning (6 AM - 10 AM)\n• Midday (10 AM - 2 PM)\n• Afternoon (2 PM - 6 PM)\n\nWhich would you prefer?",
    },
    CannedResponse {
        topic: "driver",
        keywords: &["driver", "late"],
        reply: "I can check on your driver's status. Currently, Marcus Johnson is en route and should arrive within the next 15 minutes. You'll receive a notification when he's approaching your location.",
    },
    CannedResponse {
        topic: "hold",
        keywords: &["hold", "pause", "vacation"],
        reply: "I can help you place a hold on your service. How long would you like to pause pickups? You can choose:\n\n• 1 week\n• 2 weeks\n• Custom dates\n\nYour service will automatically resume after the hold period.",
    },
    CannedResponse {
        topic: "billing",
        keywords: &["price", "cost", "billing"],
        reply: "Your current plan is the Standard Residential service at $25/month, which includes twice-weekly pickups. Would you like to see other plan options or review your billing history?",
    },
    CannedResponse {
        topic: "recycling",
        keywords: &["recycling", "recycle"],
        reply: "We accept most recyclables including:\n\n• Paper & cardboard\n• Plastic containers (#1-7)\n• Glass bottles & jars\n• Metal cans\n\nPlease ensure items are clean and dry. Would you like to add recycling service to your account?",
    },
    CannedResponse {
        topic: "thanks",
        keywords: &["thank", "thanks"],
        reply: "You're welcome! Is there anything else I can help you with today?",
    },
    CannedResponse {
        topic: "greeting",
        keywords: &["hello", "hi", "hey"],
        reply: "Hello! I'm your Poobel AI assistant. I can help you with:\n\n• Checking your schedule\n• Rescheduling pickups\n• Placing service holds\n• Tracking your driver\n• Answering questions\n\nHow can I assist you today?",
    },
];

const ECHO_CHARS: usize = 30;

/// The canned entry matching `message`, if any.
pub fn classify(message: &str) -> Option<&'static CannedResponse> {
    let lower = message.to_lowercase();
    RESPONSES
        .iter()
        .find(|entry| entry.keywords.iter().any(|keyword| lower.contains(keyword)))
}

pub fn respond(message: &str) -> String {
    match classify(message) {
        Some(entry) => entry.reply.to_string(),
        None => {
            let mut echoed: String = message.chars().take(ECHO_CHARS).collect();
            if message.chars().count() > ECHO_CHARS {
                echoed.push_str("...");
            }
            format!(
                "I understand you're asking about \"{echoed}\". Let me help you with that. Could you please provide more details about what you'd like to know? I can assist with scheduling, driver tracking, service changes, and more."
            )
        }
    }
}
