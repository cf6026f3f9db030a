//! HTML rendering of flow state.
//!
//! Every function here is a pure function of its arguments. Error details
//! never reach the markup; `Errored` always renders the same message.

use std::fmt::Write as _;

use crate::fetch::FetchState;
use crate::form::FaxForm;
use crate::types::{DraftField, FaxRecord};

pub const LOADING_MESSAGE: &str = "[[[[[[[[[[[[[[[[[modem noises]]]]]]]]]]]]]]]]]";
pub const ERROR_MESSAGE: &str = "a bad thing happened, be sad!";
pub const EMPTY_LIST_MESSAGE: &str = "no faxes yet...try sending one?";

/// Text of the blocking prompt shown when the form fails validation.
pub const VALIDATION_PROMPT: &str = "no fax for you! fill out the fields, ya goof!";

const PAGE_TEMPLATE: &str = include_str!("templates/page.html");

fn status(message: &str) -> String {
    format!("<p class=\"status\">{}</p>", escape(message))
}

pub fn render_fax_list(state: &FetchState<Vec<FaxRecord>>) -> String {
    let faxes = match state {
        FetchState::Loading => return status(LOADING_MESSAGE),
        FetchState::Errored(_) => return status(ERROR_MESSAGE),
        FetchState::Loaded(faxes) => faxes,
    };

    let mut html = String::from(
        "<div class=\"fax-list\">\n<h2>recent faxes:</h2>\n\
         <div class=\"fax-list--actions\"><button name=\"reload\">reload</button></div>\n<ul>\n",
    );
    if faxes.is_empty() {
        let _ = writeln!(html, "<li>{}</li>", escape(EMPTY_LIST_MESSAGE));
    }
    for fax in faxes {
        let _ = writeln!(
            html,
            "<li data-sid=\"{sid}\">from: {from} to: {to} \
             <a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">(view)</a></li>",
            sid = escape(&fax.sid),
            from = escape(&fax.from),
            to = escape(&fax.to),
            url = escape(&fax.media_url),
        );
    }
    html.push_str("</ul>\n</div>");
    html
}

/// The form, gated on the Submit Flow's state. `None` means nothing has been
/// submitted yet.
pub fn render_fax_form<T>(state: Option<&FetchState<T>>, form: &FaxForm) -> String {
    match state {
        Some(FetchState::Loading) => return status(LOADING_MESSAGE),
        Some(FetchState::Errored(_)) => return status(ERROR_MESSAGE),
        Some(FetchState::Loaded(_)) | None => {}
    }

    let mut html = String::from(
        "<div class=\"fax-form\">\n<h2>send a fax</h2>\n\
         <p>this form will send <strong>real faxes</strong>, no kidding.</p>\n\
         <div class=\"innards\">\n",
    );
    for field in DraftField::ALL {
        let name = field.name();
        let _ = writeln!(
            html,
            "<div class=\"input-group\"><label for=\"{name}\">{label}: </label>\
             <input type=\"text\" name=\"{name}\" id=\"{name}\" placeholder=\"{label}\" value=\"{value}\"></div>",
            label = field.label(),
            value = escape(form.draft().get(field)),
        );
    }
    html.push_str(
        "</div>\n<div class=\"actions\"><button name=\"commence\">commence!</button></div>\n</div>",
    );
    html
}

/// The full page shell around a rendered list and form.
pub fn render_page(list: &str, form: &str) -> String {
    fill(PAGE_TEMPLATE, &[("{list}", list), ("{form}", form)])
}

/// Substitute placeholders in a single left-to-right pass. Inserted values
/// are never scanned again.
fn fill(template: &str, slots: &[(&str, &str)]) -> String {
    let extra: usize = slots.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;
    loop {
        let next = slots
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|at| (at, *key, *value)))
            .min_by_key(|(at, _, _)| *at);
        let Some((at, key, value)) = next else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + key.len()..];
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
