/**
 * Built-in HTML Renderer
 *
 * Produces complete pages from a fixed layout without a template directory.
 * All user-supplied text goes through [`escape`] before it reaches the body.
 */

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::backend::error::RenderError;
use crate::backend::render::{FormData, Page, Renderer, TemplateData};
use crate::shared::{Expiry, Failures, LoginForm, NewSnippetForm, SignupForm, Snippet};

/// Default renderer
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, page: Page, data: &TemplateData) -> Result<String, RenderError> {
        let (title, body) = match page {
            Page::Home => ("Home", home(data)),
            Page::ShowSnippet => {
                let snippet = data.snippet.as_ref().ok_or(RenderError::MissingData {
                    page: page.name(),
                    field: "snippet",
                })?;
                ("Snippet", show(snippet))
            }
            Page::NewSnippet => ("Create a New Snippet", new_snippet(data)),
            Page::Signup => ("Signup", signup(data)),
            Page::Login => ("Login", login(data)),
        };
        Ok(layout(title, data, &body))
    }
}

/// Escape text for use in element content and quoted attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// `02 Jan 2006 at 15:04`
pub fn human_date(t: DateTime<Utc>) -> String {
    t.format("%d %b %Y at %H:%M").to_string()
}

fn layout(title: &str, data: &TemplateData, body: &str) -> String {
    let mut nav = String::from(r#"<a href="/">Home</a>"#);
    if data.is_authenticated {
        nav.push_str(r#" <a href="/snippet/new">Create snippet</a>"#);
    }
    nav.push_str("<div>");
    if data.is_authenticated {
        let _ = write!(
            nav,
            r#"<form action="/user/logout" method="POST">{}<button>Logout</button></form>"#,
            csrf_field(data)
        );
    } else {
        nav.push_str(r#"<a href="/user/signup">Signup</a> <a href="/user/login">Login</a>"#);
    }
    nav.push_str("</div>");

    let flash = data
        .flash
        .as_deref()
        .map(|f| format!(r#"<div class="flash">{}</div>"#, escape(f)))
        .unwrap_or_default();

    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} - Snippetbox</title>\n\
         <link rel=\"stylesheet\" href=\"/static/css/main.css\">\n</head>\n<body>\n\
         <header><h1><a href=\"/\">Snippetbox</a></h1></header>\n\
         <nav>{nav}</nav>\n<main>\n{flash}{body}\n</main>\n\
         <footer>Powered by Rust in {year}</footer>\n</body>\n</html>\n",
        title = escape(title),
        year = data.current_year,
    )
}

fn csrf_field(data: &TemplateData) -> String {
    format!(
        r#"<input type="hidden" name="csrf_token" value="{}">"#,
        escape(&data.csrf_token)
    )
}

fn field_error(failures: &Failures, field: &str) -> String {
    failures
        .get(field)
        .map(|msg| format!(r#"<label class="error">{}</label>"#, escape(msg)))
        .unwrap_or_default()
}

fn home(data: &TemplateData) -> String {
    let snippets = data.snippets.as_deref().unwrap_or_default();
    if snippets.is_empty() {
        return "<h2>Latest Snippets</h2>\n<p>There's nothing to see here yet!</p>".to_string();
    }

    let mut rows = String::new();
    for s in snippets {
        let _ = write!(
            rows,
            "<tr><td><a href=\"/snippet/{id}\">{title}</a></td><td>{created}</td><td>#{id}</td></tr>\n",
            id = s.id,
            title = escape(&s.title),
            created = human_date(s.created),
        );
    }
    format!(
        "<h2>Latest Snippets</h2>\n<table>\n<tr><th>Title</th><th>Created</th><th>ID</th></tr>\n{rows}</table>"
    )
}

fn show(s: &Snippet) -> String {
    format!(
        "<div class=\"snippet\">\n<div class=\"metadata\"><strong>{title}</strong><span>#{id}</span></div>\n\
         <pre><code>{content}</code></pre>\n\
         <div class=\"metadata\"><time>Created: {created}</time><time>Expires: {expires}</time></div>\n</div>",
        id = s.id,
        title = escape(&s.title),
        content = escape(&s.content),
        created = human_date(s.created),
        expires = human_date(s.expires),
    )
}

fn new_snippet(data: &TemplateData) -> String {
    let empty = NewSnippetForm::default();
    let form = match &data.form {
        Some(FormData::NewSnippet(form)) => form,
        _ => &empty,
    };
    let selected = if form.expires.is_empty() {
        Expiry::OneYear.form_value()
    } else {
        form.expires.as_str()
    };

    let mut options = String::new();
    for expiry in Expiry::ALL {
        let checked = if expiry.form_value() == selected { " checked" } else { "" };
        let _ = write!(
            options,
            r#"<input type="radio" name="expires" value="{value}"{checked}> {label} "#,
            value = expiry.form_value(),
            label = expiry.label(),
        );
    }

    format!(
        "<form action=\"/snippet/new\" method=\"POST\">\n{csrf}\n\
         <div><label>Title:</label>{title_err}<input type=\"text\" name=\"title\" value=\"{title}\"></div>\n\
         <div><label>Content:</label>{content_err}<textarea name=\"content\">{content}</textarea></div>\n\
         <div><label>Delete in:</label>{expires_err}{options}</div>\n\
         <div><input type=\"submit\" value=\"Publish snippet\"></div>\n</form>",
        csrf = csrf_field(data),
        title_err = field_error(&form.failures, "Title"),
        title = escape(&form.title),
        content_err = field_error(&form.failures, "Content"),
        content = escape(&form.content),
        expires_err = field_error(&form.failures, "Expires"),
    )
}

fn signup(data: &TemplateData) -> String {
    let empty = SignupForm::default();
    let form = match &data.form {
        Some(FormData::Signup(form)) => form,
        _ => &empty,
    };
    // the password is never echoed back
    format!(
        "<form action=\"/user/signup\" method=\"POST\" novalidate>\n{csrf}\n\
         <div><label>Name:</label>{name_err}<input type=\"text\" name=\"name\" value=\"{name}\"></div>\n\
         <div><label>Email:</label>{email_err}<input type=\"email\" name=\"email\" value=\"{email}\"></div>\n\
         <div><label>Password:</label>{password_err}<input type=\"password\" name=\"password\"></div>\n\
         <div><input type=\"submit\" value=\"Signup\"></div>\n</form>",
        csrf = csrf_field(data),
        name_err = field_error(&form.failures, "Name"),
        name = escape(&form.name),
        email_err = field_error(&form.failures, "Email"),
        email = escape(&form.email),
        password_err = field_error(&form.failures, "Password"),
    )
}

fn login(data: &TemplateData) -> String {
    let empty = LoginForm::default();
    let form = match &data.form {
        Some(FormData::Login(form)) => form,
        _ => &empty,
    };
    let generic = form
        .failures
        .get("Generic")
        .map(|msg| format!(r#"<div class="error">{}</div>"#, escape(msg)))
        .unwrap_or_default();
    format!(
        "<form action=\"/user/login\" method=\"POST\" novalidate>\n{csrf}\n{generic}\n\
         <div><label>Email:</label>{email_err}<input type=\"email\" name=\"email\" value=\"{email}\"></div>\n\
         <div><label>Password:</label>{password_err}<input type=\"password\" name=\"password\"></div>\n\
         <div><input type=\"submit\" value=\"Login\"></div>\n</form>",
        csrf = csrf_field(data),
        email_err = field_error(&form.failures, "Email"),
        email = escape(&form.email),
        password_err = field_error(&form.failures, "Password"),
    )
}
