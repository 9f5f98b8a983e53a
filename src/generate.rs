//! Content generation: three stateless calls per feed entry.
//!
//! Each entry gets a title/meta-description call, an article-body call, and a
//! category-classification call. The model's output is unverified free text,
//! so each response goes through a lenient parser that substitutes a default
//! instead of aborting. The parsers are plain functions independent of the
//! network layer so they can be exercised with literal strings.

use crate::api::{ask_with_backoff, ChatClient};
use crate::categories::Category;
use crate::models::{FeedItem, GeneratedArticle};
use crate::utils::truncate_for_log;
use std::error::Error;
use tracing::{debug, instrument, warn};

/// Substituted when no title line can be found in the model's output.
pub const TITLE_FALLBACK: &str = "タイトル取得失敗";

const SEO_WRITER: &str = "あなたは日本語のSEOライターです。";
const TECH_WRITER: &str = "あなたは日本語のテック記事ライターです。";
const WEB_EDITOR: &str = "あなたはAI分野に詳しいWeb編集者です。";

fn title_meta_prompt(service_name: &str, link: &str) -> String {
    format!(
        "以下のAIサービスについて、SEOに強い日本語タイトル（32文字以内）とmeta description（100〜120文字）を作ってください。\n\
         ※コードブロック（```など）やMarkdownは禁止。プレーンテキストで出力。\n\n\
         【出力形式】\n\
         タイトル：◯◯\n\
         meta description：△△\n\n\
         サービス名: {service_name}\n\
         URL: {link}\n"
    )
}

fn body_prompt(title: &str, link: &str) -> String {
    format!(
        "以下のAIサービスについて、HTML構造で800〜1000字程度の日本語記事を作成してください。\n\
         構成：<h3>、<p>、<ul><li>のみ使用。Markdownやコードブロックは禁止。\n\n\
         <h2>{title}</h2>\n\
         <h3>✅ 概要</h3>\n\
         <p>...</p>\n\
         <h3>🔍 主な機能と特徴</h3>\n\
         <ul><li>...</li></ul>\n\
         <h3>👀 こんな人におすすめ</h3>\n\
         <p>...</p>\n\
         <h3>💬 GPTコメント</h3>\n\
         <p>...</p>\n\
         <p>🔗 <a href=\"{link}\" target=\"_blank\" rel=\"noopener\">公式ページを見る</a></p>\n"
    )
}

fn category_prompt(service_name: &str, description: &str) -> String {
    let labels = Category::ALL
        .iter()
        .map(|c| format!("- {}", c.label()))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "以下のAIサービスについて、次のカテゴリの中から最も近いものを1つだけ選んでください。\
         日本語でカテゴリ名のみを返してください：\n\n\
         {labels}\n\n\
         サービス名: {service_name}\n\
         説明: {description}\n"
    )
}

/// Extract the title and meta description from labeled output lines.
///
/// The prompt asks for two lines, `タイトル：…` and `meta description：…`.
/// Matching is by substring, other lines are discarded, and a missing title
/// yields [`TITLE_FALLBACK`] so the pipeline never aborts on a malformed
/// response. A missing description yields an empty string.
pub fn parse_title_meta(text: &str) -> (String, String) {
    let title = text
        .lines()
        .find(|line| line.contains("タイトル"))
        .map(|line| strip_label(line, "タイトル"))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| TITLE_FALLBACK.to_string());

    let description = text
        .lines()
        .find(|line| line.contains("meta description"))
        .map(|line| strip_label(line, "meta description"))
        .unwrap_or_default();

    (title, description)
}

fn strip_label(line: &str, label: &str) -> String {
    let rest = match line.find(label) {
        Some(i) => &line[i + label.len()..],
        None => line,
    };
    rest.trim_start_matches(['：', ':', ' ']).trim().to_string()
}

/// Remove code-fence and backtick markers from the article body.
///
/// The body prompt forbids Markdown, but the model sometimes wraps its HTML
/// in a fenced block anyway.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```html", "")
        .replace("```", "")
        .replace('`', "")
        .trim()
        .to_string()
}

/// Run all three generation calls for one feed entry.
///
/// The calls are independent: the body call reuses the generated title and
/// the category call reuses the generated description, but no conversation
/// state is carried between them.
#[instrument(level = "info", skip(chat), fields(service = %item.title))]
pub async fn generate_article(
    chat: &ChatClient,
    item: &FeedItem,
) -> Result<GeneratedArticle, Box<dyn Error>> {
    let title_meta = ask_with_backoff(chat, SEO_WRITER, &title_meta_prompt(&item.title, &item.link)).await?;
    let (title, description) = parse_title_meta(&title_meta);
    if title == TITLE_FALLBACK {
        warn!(
            response_preview = %truncate_for_log(&title_meta, 200),
            "No title line in model output; using placeholder"
        );
    }

    let body_raw = ask_with_backoff(chat, TECH_WRITER, &body_prompt(&title, &item.link)).await?;
    let body_html = strip_code_fences(&body_raw);

    let category_raw =
        ask_with_backoff(chat, WEB_EDITOR, &category_prompt(&item.title, &description)).await?;
    let category = Category::classify(&category_raw);
    debug!(raw = %truncate_for_log(&category_raw, 80), %category, "Classified entry");

    Ok(GeneratedArticle {
        title,
        description,
        body_html,
        category,
    })
}
