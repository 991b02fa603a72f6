//! HTML pages for the polls routes.

use crate::{
    types::{choice::Choice, question::Question},
    urls,
};

pub const NO_POLLS: &str = "No polls available.";
pub const NO_CHOICE_SELECTED: &str = "You didn't select a choice.";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

pub fn index(questions: &[Question]) -> String {
    let mut body = String::new();
    if questions.is_empty() {
        body.push_str(&format!("<p>{}</p>\n", NO_POLLS));
    } else {
        body.push_str("<ul>\n");
        for question in questions {
            body.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                urls::detail(question.id),
                escape(&question.text)
            ));
        }
        body.push_str("</ul>\n");
    }
    page("Polls", &body)
}

fn back_to_index() -> String {
    format!("<p><a href=\"{}\">Back to polls</a></p>\n", urls::index())
}

pub fn detail(question: &Question, choices: &[Choice], error_message: Option<&str>) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape(&question.text));
    if let Some(message) = error_message {
        body.push_str(&format!("<p><strong>{}</strong></p>\n", escape(message)));
    }
    body.push_str(&format!(
        "<form action=\"{}\" method=\"post\">\n",
        urls::vote(question.id)
    ));
    for choice in choices {
        body.push_str(&format!(
            "<input type=\"radio\" name=\"choice\" id=\"choice{id}\" value=\"{id}\">\n<label for=\"choice{id}\">{text}</label><br>\n",
            id = choice.id.0,
            text = escape(&choice.text)
        ));
    }
    body.push_str("<input type=\"submit\" value=\"Vote\">\n</form>\n");
    body.push_str(&back_to_index());
    page(&question.text, &body)
}

pub fn results(question: &Question, choices: &[Choice]) -> String {
    let mut body = format!("<h1>{}</h1>\n<ul>\n", escape(&question.text));
    for choice in choices {
        body.push_str(&format!(
            "<li>{} -- {} vote{}</li>\n",
            escape(&choice.text),
            choice.votes,
            if choice.votes == 1 { "" } else { "s" }
        ));
    }
    body.push_str(&format!(
        "</ul>\n<a href=\"{}\">Vote again?</a>\n",
        urls::detail(question.id)
    ));
    body.push_str(&back_to_index());
    page(&question.text, &body)
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
