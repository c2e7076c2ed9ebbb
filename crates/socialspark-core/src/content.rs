//! Static product copy shared by every front end.

pub const BRAND: &str = "SocialSpark";

/// Prompts offered in the chat sidebar; selecting one fills the draft.
pub const SUGGESTIONS: [&str; 5] = [
    "Analyze my recent posts",
    "What's my best performing content?",
    "When should I post for maximum engagement?",
    "Suggest hashtags for my niche",
    "How can I improve my social media strategy?",
];

pub const CHAT_TIPS: &str = "Ask specific questions about your content strategy, audience, \
or engagement across different social media platforms to get the most helpful insights.";

pub const EMPTY_CHAT_TITLE: &str = "Start a conversation";
pub const EMPTY_CHAT_BODY: &str = "Ask me anything about your Instagram content and strategy!";
pub const INPUT_PLACEHOLDER: &str = "Ask anything about social media content...";
pub const INPUT_HINT: &str = "Press Enter to send • AI responses may take a moment";

pub const ONBOARDING_TITLE: &str = "Connect Your Social Media";
pub const ONBOARDING_BODY: &str = "Connect your social media accounts to get personalized AI \
insights about your content and audience across platforms";
pub const HANDLE_PLACEHOLDER: &str = "@yourusername or profile URL";
pub const ONBOARDING_BENEFITS: [&str; 4] = [
    "Personalized content recommendations",
    "Audience engagement insights",
    "Optimal posting time suggestions",
    "Cross-platform hashtag optimization",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub number: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

/// Everything the landing view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub badge: &'static str,
    pub headline: [&'static str; 2],
    pub pitch: &'static str,
    pub primary_action: &'static str,
    pub checks: [&'static str; 2],
    pub stats: [Stat; 4],
    pub features_title: &'static str,
    pub features_subtitle: &'static str,
    pub features: [Feature; 6],
    pub cta_headline: [&'static str; 2],
    pub cta_body: &'static str,
    pub cta_action: &'static str,
    pub footer_links: [&'static str; 3],
    pub copyright: &'static str,
}

pub fn landing() -> Landing {
    Landing {
        badge: "AI-Powered Social Media Analytics",
        headline: ["Spark Your", "Social Success"],
        pitch: "Get AI-powered insights, content recommendations, and audience analytics \
to ignite your social media growth across all platforms.",
        primary_action: "Start Free Analysis",
        checks: ["No credit card required", "Free forever plan"],
        stats: [
            Stat { number: "75K+", label: "Active Creators" },
            Stat { number: "5M+", label: "Posts Analyzed" },
            Stat { number: "98%", label: "Growth Rate" },
            Stat { number: "24/7", label: "AI Support" },
        ],
        features_title: "Powerful Features",
        features_subtitle: "Everything you need to understand and grow your social media presence",
        features: [
            Feature {
                title: "AI Chat Assistant",
                description: "Ask questions about your content strategy and get instant, \
personalized recommendations from our AI.",
            },
            Feature {
                title: "Advanced Analytics",
                description: "Deep insights into your engagement rates, best posting times, \
and audience demographics across platforms.",
            },
            Feature {
                title: "Growth Tracking",
                description: "Monitor your follower growth, engagement trends, and content \
performance over time.",
            },
            Feature {
                title: "Audience Insights",
                description: "Understand your audience better with detailed demographic and \
behavioral analysis.",
            },
            Feature {
                title: "Content Optimization",
                description: "Get AI-powered suggestions for hashtags, captions, and posting \
strategies to maximize reach.",
            },
            Feature {
                title: "Real-time Monitoring",
                description: "Track your posts' performance in real-time and get alerts for \
significant changes.",
            },
        ],
        cta_headline: ["Ready to Spark Your", "Social Media Growth?"],
        cta_body: "Join thousands of creators and businesses who are already using \
SocialSpark to ignite their social media success.",
        cta_action: "Get Started for Free",
        footer_links: ["Privacy", "Terms", "Support"],
        copyright: "© 2024 SocialSpark. All rights reserved.",
    }
}
