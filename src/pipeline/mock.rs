//! Deterministic stand-in article used when the live pipeline cannot run.
//!
//! The output depends on the topic only, so persistence and the UI can be
//! exercised without model or search access.

pub const DRAFT_BODY_PARAGRAPH: &str = "Editors and journalists are experimenting with AI to speed reporting, summarize data, \
and handle routine copy. However, the core editorial decisions — source selection, \
context, and ethical judgment — remain human responsibilities. ";

pub const DRAFT_BODY_REPETITIONS: usize = 8;

pub const SECONDARY_KEYWORDS: [&str; 5] = [
    "ai journalism",
    "newsroom automation",
    "fact checking ai",
    "editorial ai",
    "ai for reporters",
];

const FINAL_ARTICLE_STUB: &str = "## Final Article\n\n\
This is a mocked final article for validation. Replace with live LLM output when available.\n";

pub fn mock_article(topic: &str) -> String {
    let mut article = String::new();
    article.push_str(&mock_research(topic));
    article.push_str(&mock_draft(topic));
    article.push_str(&mock_seo(topic));
    article.push_str(FINAL_ARTICLE_STUB);
    article
}

fn mock_research(topic: &str) -> String {
    let bullets = [
        format!("{}: core trend identified and corroborated by multiple sources.", topic),
        "Adoption rate: 42% year-over-year growth (mock).".to_string(),
        "Regulatory note: emerging standards are shaping industry practices (mock).".to_string(),
        "Use case highlight: newsrooms automating workflows (mock).".to_string(),
        "Concern: fact-checking and hallucination risks (mock).".to_string(),
        "Quote: \"Automation scales reach, not judgment.\" — Mock Source".to_string(),
        "Quote: \"Editors remain crucial to trust.\" — Mock Source".to_string(),
        "Methodology: primary sources, reputable outlets, and official statements (mock).".to_string(),
    ];
    let sources = [
        "https://example.com/report-2025",
        "https://example.com/newsroom-case-study",
        "https://example.com/regulatory-summary",
    ];

    format!(
        "## Research Brief\n\n{}\n\nSources:\n{}\n\n",
        bullet_list(bullets.iter().map(String::as_str)),
        bullet_list(sources.iter().copied())
    )
}

fn mock_draft(topic: &str) -> String {
    let intro = format!(
        "## Draft Article\n\n# {}\n\n\
         The landscape of journalism is changing as automation and AI tools enter the newsroom. ",
        topic
    );
    let body = vec![DRAFT_BODY_PARAGRAPH; DRAFT_BODY_REPETITIONS].join("\n\n");
    let conclusion = "\n\nIn short, AI augments scale but editorial oversight determines trust.";

    format!("{}{}{}\n\n", intro, body, conclusion)
}

fn mock_seo(topic: &str) -> String {
    format!(
        "## SEO Optimization Report\n\n\
         - Primary keyword: {}\n\
         - Secondary keywords: {}\n\
         - Meta description: A concise overview of how AI is shaping modern journalism.\n\n\
         - Suggested H1: {}\n\
         - Suggested H2s: Background, Use Cases, Risks, Best Practices\n\n",
        topic.to_lowercase(),
        SECONDARY_KEYWORDS.join(", "),
        topic
    )
}

fn bullet_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.map(|item| format!("- {}", item)).collect::<Vec<_>>().join("\n")
}
