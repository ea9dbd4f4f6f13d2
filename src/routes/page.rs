// ABOUTME: Server-rendered HTML for the idea generator page
// ABOUTME: Renders inputs, feedback, model markdown, and the rating controls from session state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write;
use std::str::FromStr;

use html_escape::{encode_double_quoted_attribute, encode_text};
use idea_core::constants::limits;
use idea_core::errors::{AppError, AppResult};
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use serde::Deserialize;

use crate::actions::{average_feedback, Feedback};
use crate::session::SessionState;

const PAGE_TITLE: &str = "AI Startup Idea Generator";
const NO_IDEAS_PROMPT: &str = "👆 Generate ideas above to see and rate them!";
const BRAINSTORMING: &str = "Brainstorming 2026 winners... 🤔";

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:760px;margin:2rem auto;padding:0 1rem;color:#262730}\
label{display:block;margin-top:1rem;font-weight:600}\
input[type=text]{width:100%;padding:.4rem;font-size:1rem}\
input[type=range]{width:100%}\
button{margin-top:1rem;padding:.5rem 1rem;font-size:1rem;cursor:pointer}\
.feedback{padding:.75rem 1rem;border-radius:.4rem;margin:.75rem 0}\
.success{background:#e8f7ee}.info{background:#e8f0fb}.warning{background:#fff7e0}.error{background:#fdecea}\
.caption{color:#6b6f76;font-size:.9rem}";

/// Values of the generate form, echoed back into the inputs
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateForm {
    /// Industry or field as typed
    pub field: String,
    /// Requested idea count
    pub idea_count: u8,
    /// Requested creativity
    pub temperature: f32,
}

impl Default for GenerateForm {
    fn default() -> Self {
        Self {
            field: String::new(),
            idea_count: limits::DEFAULT_IDEAS,
            temperature: limits::DEFAULT_TEMPERATURE,
        }
    }
}

/// Generate form body as submitted
///
/// Numbers stay text until [`GenerateInput::parse`] so a malformed value is
/// reported on the page instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateInput {
    /// Industry or field
    #[serde(default)]
    pub field: String,
    /// Number of ideas
    #[serde(default)]
    pub idea_count: String,
    /// Creativity
    #[serde(default)]
    pub temperature: String,
}

impl GenerateInput {
    /// Parse the numeric inputs
    ///
    /// # Errors
    ///
    /// Returns an invalid input error naming the first value that is not a number.
    pub fn parse(&self) -> AppResult<GenerateForm> {
        Ok(GenerateForm {
            field: self.field.clone(),
            idea_count: parse_number("Number of ideas", &self.idea_count)?,
            temperature: parse_number("Creativity", &self.temperature)?,
        })
    }

    /// Form to echo back after [`GenerateInput::parse`] failed
    #[must_use]
    pub fn fallback(&self) -> GenerateForm {
        GenerateForm {
            field: self.field.clone(),
            ..GenerateForm::default()
        }
    }
}

/// Parse a numeric form value
///
/// # Errors
///
/// Returns an invalid input error when `raw` is blank or not a `T`.
pub fn parse_number<T: FromStr>(label: &str, raw: &str) -> AppResult<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::invalid_input(format!("{label} is missing")));
    }
    raw.parse()
        .map_err(|_| AppError::invalid_input(format!("{label} must be a number, got '{raw}'")))
}

/// Everything one page render needs
#[derive(Debug)]
pub struct PageView<'a> {
    /// Session to show
    pub state: &'a SessionState,
    /// Generate form values
    pub form: &'a GenerateForm,
    /// Messages from the action that produced this render
    pub feedback: &'a [Feedback],
}

/// Link schemes allowed in model output
const SAFE_LINK_PREFIXES: &[&str] = &["http://", "https://", "mailto:", "#"];

/// Render model markdown to HTML
///
/// Raw HTML in the markdown is shown as text rather than passed through, and
/// link or image targets other than web, mail, or fragment links are replaced by `#`.
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_link(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_link(dest_url),
            title,
            id,
        }),
        other => other,
    });
    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

fn safe_link(dest_url: CowStr<'_>) -> CowStr<'_> {
    let target = dest_url.trim_start().to_ascii_lowercase();
    if SAFE_LINK_PREFIXES
        .iter()
        .any(|prefix| target.starts_with(prefix))
    {
        dest_url
    } else {
        CowStr::Borrowed("#")
    }
}

/// Render the full page
#[must_use]
pub fn render_page(view: &PageView<'_>) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        "<h1>🚀 {PAGE_TITLE}</h1>\n\
         <p>Realistic Bay Area startup ideas with Gemini on Google Cloud</p>\n"
    );
    render_generate_form(&mut body, view.form);
    render_feedback(&mut body, view.feedback);
    body.push_str("<hr>\n");

    if let Some(ideas) = &view.state.ideas {
        body.push_str("<section id=\"ideas\">\n<h3>Your Latest Startup Ideas</h3>\n");
        body.push_str(&markdown_to_html(&ideas.text));
        body.push_str("</section>\n");
        render_rating(&mut body, view.state, view.feedback);
    } else {
        let _ = writeln!(body, "<div class=\"feedback info\">{NO_IDEAS_PROMPT}</div>");
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{PAGE_TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<main>\n\
         {body}</main>\n</body>\n</html>\n"
    )
}

fn render_generate_form(body: &mut String, form: &GenerateForm) {
    let _ = write!(
        body,
        "<form method=\"post\" action=\"/generate\" \
         onsubmit=\"this.querySelector('button').textContent='{BRAINSTORMING}'\">\n\
         <label for=\"field\">Industry/field</label>\n\
         <input id=\"field\" name=\"field\" type=\"text\" value=\"{field}\">\n\
         <label for=\"idea_count\">Number of ideas</label>\n\
         <input id=\"idea_count\" name=\"idea_count\" type=\"range\" min=\"{min_ideas}\" max=\"{max_ideas}\" step=\"1\" value=\"{idea_count}\">\n\
         <label for=\"temperature\">Creativity (Higher values mean higher creativity!)</label>\n\
         <input id=\"temperature\" name=\"temperature\" type=\"range\" min=\"{min_temp}\" max=\"{max_temp}\" step=\"{step}\" value=\"{temperature:.1}\">\n\
         <button type=\"submit\">Generate Ideas</button>\n\
         </form>\n",
        field = encode_double_quoted_attribute(&form.field),
        min_ideas = limits::MIN_IDEAS,
        max_ideas = limits::MAX_IDEAS,
        idea_count = form.idea_count,
        min_temp = limits::MIN_TEMPERATURE,
        max_temp = limits::MAX_TEMPERATURE,
        step = limits::TEMPERATURE_STEP,
        temperature = form.temperature,
    );
}

fn render_feedback(body: &mut String, feedback: &[Feedback]) {
    for item in feedback {
        let _ = writeln!(
            body,
            "<div class=\"feedback {}\">{}</div>",
            item.level.as_str(),
            encode_text(&item.message)
        );
    }
}

fn render_rating(body: &mut String, state: &SessionState, feedback: &[Feedback]) {
    let current = state
        .last_rating
        .map_or(limits::DEFAULT_STARS, |stars| stars.get());

    let _ = write!(
        body,
        "<hr>\n<p class=\"caption\">How useful were these ideas?</p>\n\
         <form method=\"post\" action=\"/rate\">\n\
         <label for=\"stars\">Rate 1–5 stars</label>\n\
         <input id=\"stars\" name=\"stars\" type=\"range\" min=\"{}\" max=\"{}\" step=\"1\" value=\"{current}\">\n\
         <button type=\"submit\">Rate</button>\n\
         </form>\n",
        limits::MIN_STARS,
        limits::MAX_STARS,
    );

    // Already shown when the rate action reported it
    if let Some(average) = average_feedback(state).filter(|a| !feedback.contains(a)) {
        render_feedback(body, &[average]);
    }

    body.push_str(
        "<form method=\"post\" action=\"/clear\">\n\
         <button type=\"submit\">Clear Ideas &amp; Ratings</button>\n\
         </form>\n\
         <p class=\"caption\">High quality startup ideas based on practicality and real world use</p>\n",
    );
}
