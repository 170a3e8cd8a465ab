// Prompt templates for the three content types, plus the composer that fills them.
// Composition is pure string work and cannot fail; blank input is rejected upstream.

use crate::generation::models::VideoItem;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Canonical learning-plan shape shown to the model. Satisfies every count the
/// validator enforces, so it doubles as a known-good fixture.
pub const LEARNING_PLAN_EXAMPLE: &str = r#"{
    "title": "<title>",
    "terminology": [
        {"term": "<term_1>", "description": "<description_1>"},
        {"term": "<term_2>", "description": "<description_2>"},
        {"term": "<term_3>", "description": "<description_3>"},
        {"term": "<term_4>", "description": "<description_4>"},
        {"term": "<term_5>", "description": "<description_5>"}
    ],
    "milestones": [
        {
            "main_goal": "<main_goal_1>",
            "sub_goals": ["<sub_goal_1>", "<sub_goal_2>", "<sub_goal_3>", "<sub_goal_4>", "<sub_goal_5>"]
        },
        {
            "main_goal": "<main_goal_2>",
            "sub_goals": ["<sub_goal_1>", "<sub_goal_2>", "<sub_goal_3>", "<sub_goal_4>", "<sub_goal_5>"]
        },
        {
            "main_goal": "<main_goal_3>",
            "sub_goals": ["<sub_goal_1>", "<sub_goal_2>", "<sub_goal_3>", "<sub_goal_4>", "<sub_goal_5>"]
        },
        {
            "main_goal": "<main_goal_4>",
            "sub_goals": ["<sub_goal_1>", "<sub_goal_2>", "<sub_goal_3>", "<sub_goal_4>", "<sub_goal_5>"]
        },
        {
            "main_goal": "<main_goal_5>",
            "sub_goals": ["<sub_goal_1>", "<sub_goal_2>", "<sub_goal_3>", "<sub_goal_4>", "<sub_goal_5>"]
        }
    ]
}"#;

/// Learning-plan template. Replace: {example}, {json_only}, {user_text}
pub const LEARNING_PLAN_TEMPLATE: &str = r#"Create a structured learning plan using EXACTLY this JSON shape:

{example}

HARD RULES:
1. Generate exactly 5 terminology terms, each with a description.
2. Generate exactly 5 milestones. Each milestone has exactly 5 sub_goals.
3. Main goals are the main steps to learn the skill; sub-goals are the smaller tasks that lead to each main goal.
4. Use the keys exactly as shown. Do not add or rename keys.

{json_only}

Give me contents for the given prompt:
{user_text}"#;

/// Video-feed template. Replace: {query}, {videos_json}, {json_only}
pub const VIDEO_FEED_TEMPLATE: &str = r#"You are helping a user learn a new skill: "{query}".
Below are the YouTube videos selected for this skill.

Generate a JSON object with the following format:
{
  "title": "...",
  "description": "...",
  "materials": [ <the videos below, as-is> ]
}

Use this exact list for "materials". Copy every entry verbatim, in the same order.
Do not add, remove, reorder or edit any entry, title or link:

{videos_json}

Only "title" and "description" are yours to write.

{json_only}"#;

/// Article-feed template. Replace: {json_only}, {topic}
pub const ARTICLE_FEED_TEMPLATE: &str = r#"Find articles on the internet about the given topic and give the article links with titles as a JSON array in EXACTLY this format:

[
    {"title": "<title_1>", "link": "<link_1>"},
    {"title": "<title_2>", "link": "<link_2>"},
    {"title": "<title_3>", "link": "<link_3>"},
    {"title": "<title_4>", "link": "<link_4>"},
    {"title": "<title_5>", "link": "<link_5>"}
]

HARD RULES:
1. Exactly 5 entries.
2. No YouTube links or any other video links. Only website articles.
3. Every link must be a full http(s) URL.

{json_only}

Topic:
{topic}"#;

pub fn compose_learning_plan(user_text: &str) -> String {
    render(
        LEARNING_PLAN_TEMPLATE,
        &[
            ("{example}", LEARNING_PLAN_EXAMPLE),
            ("{json_only}", JSON_ONLY_INSTRUCTION),
            ("{user_text}", user_text),
        ],
    )
}

/// Embeds `videos` as literal pretty-printed JSON.
pub fn compose_video_feed(query: &str, videos: &[VideoItem]) -> String {
    let videos_json = format!("{:#}", serde_json::json!(videos));
    render(
        VIDEO_FEED_TEMPLATE,
        &[
            ("{query}", query),
            ("{videos_json}", &videos_json),
            ("{json_only}", JSON_ONLY_INSTRUCTION),
        ],
    )
}

pub fn compose_article_feed(topic: &str) -> String {
    render(
        ARTICLE_FEED_TEMPLATE,
        &[("{json_only}", JSON_ONLY_INSTRUCTION), ("{topic}", topic)],
    )
}

/// Single-pass placeholder substitution. Inserted values are never rescanned, so
/// user text or video titles containing `{...}` reach the model untouched.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    'scan: while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        for (placeholder, value) in vars {
            if let Some(after) = tail.strip_prefix(placeholder) {
                out.push_str(value);
                rest = after;
                continue 'scan;
            }
        }
        out.push('{');
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}
