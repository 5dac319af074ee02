// Built-in rule table
// Ordered (pattern, reply) pairs, first match wins

/// Definition of a single rule before compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDef {
    pub pattern: &'static str,
    pub reply: &'static str,
}

impl RuleDef {
    pub const fn new(pattern: &'static str, reply: &'static str) -> Self {
        Self { pattern, reply }
    }
}

/// Reply used when no rule matches
pub const FALLBACK_REPLY: &str = "I'm sorry, I didn't understand that. Can you please rephrase?";

/// Default support-desk rules. Patterns are written against lowercase input.
pub const DEFAULT_RULES: &[RuleDef] = &[
    RuleDef::new(r"(hello|hi|hey)", "Hello! How can I assist you today?"),
    RuleDef::new(
        r"(track.*order|order.*status|where.*order)",
        "You can track your order using the Order ID in the Track Order section.",
    ),
    RuleDef::new(
        r"(services|repair|support)",
        "We offer router repair, firmware updates, setup assistance, and warranty support.",
    ),
    RuleDef::new(
        r"(contact|email|phone)",
        "You can reach us at support@netservesolutions.com or call +91-9876543210.",
    ),
    RuleDef::new(
        r"(location|address|where.*located)",
        "We are located at 123 Service Lane, New Delhi, India.",
    ),
    RuleDef::new(
        r"(balance|data.*usage|remaining.*data|how.*much.*left)",
        "You can check your current balance and data usage in the NetServe App or by logging into your account.",
    ),
    RuleDef::new(
        r"(new plans|latest plans|recharge options|available plans|plan details)",
        "We have exciting new plans! Basic ₹499/month, Premium ₹799/month with 1Gbps speed and OTT bundle. Check our website for full details.",
    ),
    RuleDef::new(
        r"(reset.*password|forgot.*password)",
        "You can reset your password via the login page. Click on 'Forgot Password' and follow the instructions.",
    ),
    RuleDef::new(
        r"(slow internet|speed issue|network problem|connection.*slow)",
        "We're sorry to hear that. Please try restarting your router. If the issue persists, contact support.",
    ),
    RuleDef::new(
        r"(how to pay|payment methods|bill payment|pay.*bill)",
        "You can pay your bill online using UPI, credit/debit cards, or net banking via our website or app.",
    ),
    RuleDef::new(
        r"(outage|down|no internet|disconnected)",
        "We\u{2019}re not showing any outages currently. Please check your router or contact support if it continues.",
    ),
    RuleDef::new(
        r"(cancel.*connection|terminate.*account|stop.*service)",
        "To cancel your connection, please contact our customer care or visit the NetServe portal.",
    ),
    RuleDef::new(
        r"(installation|how.*setup|technician visit|router install)",
        "We provide technician-assisted installation. You can book a visit through our app or helpline.",
    ),
    RuleDef::new(
        r"(working hours|business hours|timings|open.*time)",
        "Our support team is available 9 AM to 9 PM, Monday to Saturday.",
    ),
];
