//! HTML page variants served by the gateway.
//!
//! Every interpolated string goes through [`escape_html`].

use groundfact_core::{Citation, PromptConfig};

/// Escape text for use in HTML element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Only http(s) links become clickable; anything else points nowhere.
fn safe_href(uri: &str) -> String {
    let lower = uri.trim_start().to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        escape_html(uri)
    } else {
        "#".to_string()
    }
}

fn notice_page(color: &str, heading: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{heading}</title>
</head>
<body>
    <div style="padding: 40px; text-align: center; font-family: sans-serif;">
        <h1 style="color: {color};">{heading}</h1>
        {body}
    </div>
</body>
</html>
"#,
        heading = escape_html(heading),
    )
}

/// Shown when no credential is configured. No call is attempted.
pub fn render_missing_credential(var_name: &str) -> String {
    let var = escape_html(var_name);
    notice_page(
        "#EF4444",
        "API Key Missing",
        &format!(
            r#"<p>The <code>{var}</code> environment variable is not set.</p>
        <p>Please ensure you set the environment variable or, if deploying, that the platform is injecting it.</p>
        <p style="color: #6B7280; font-size: 14px;">(The key is never stored in configuration files; it is injected by the environment.)</p>"#
        ),
    )
}

/// Shown when the client handle could not be built. The error text reaches
/// the user as is (escaped).
pub fn render_client_error(message: &str) -> String {
    notice_page(
        "#EF4444",
        "Client Initialization Error",
        &format!("<p>{}</p>", escape_html(message)),
    )
}

/// Shown when the query produced no answer.
pub fn render_call_failed(reason: &str) -> String {
    notice_page(
        "#F59E0B",
        "API Call Failed",
        &format!(
            "<p>{}</p>\n        <p>Please check your network connection and API key validity.</p>",
            escape_html(reason)
        ),
    )
}

fn render_sources(citations: &[Citation]) -> String {
    if citations.is_empty() {
        return String::new();
    }
    let items: String = citations
        .iter()
        .map(|c| {
            format!(
                "<li class=\"text-sm text-gray-500\"><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"hover:underline text-blue-500\">{}</a></li>",
                safe_href(&c.uri),
                escape_html(&c.title)
            )
        })
        .collect();
    format!(
        r#"
            <div class="mt-8 pt-4 border-t border-gray-200">
                <p class="text-xs font-semibold uppercase text-gray-400 mb-2">Sources (Grounded by Google Search):</p>
                <ul class="list-disc list-inside space-y-1">{items}</ul>
            </div>"#
    )
}

/// The answer page: greeting, answer text, optional sources.
pub fn render_answer(page: &PromptConfig, answer_text: &str, citations: &[Citation]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;600;700&display=swap" rel="stylesheet">
    <style>
        body {{ font-family: 'Inter', sans-serif; background-color: #f7fafc; }}
    </style>
</head>
<body class="p-8">
    <div class="max-w-3xl mx-auto bg-white shadow-xl rounded-xl p-8 md:p-12 mt-10">
        <h1 class="text-3xl font-bold text-gray-800 mb-6 flex items-center">{heading}</h1>
        <div class="bg-blue-50 border-l-4 border-blue-400 text-blue-800 p-4 rounded-lg">
            <p class="font-medium text-lg">Response from Gemini:</p>
            <p class="mt-2 whitespace-pre-wrap">{answer}</p>
        </div>{sources}
        <div class="mt-10 text-center text-gray-400 text-sm">
            <p>{footer}</p>
        </div>
    </div>
</body>
</html>
"#,
        title = escape_html(&page.title),
        heading = escape_html(&page.heading),
        answer = escape_html(answer_text),
        sources = render_sources(citations),
        footer = escape_html(&page.footer),
    )
}
