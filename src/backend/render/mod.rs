//! Page Rendering
//!
//! Handlers never build HTML themselves. They fill in a [`TemplateData`] and
//! hand it, together with a [`Page`] identifier, to the [`Renderer`] held in
//! application state.
//!
//! # Module Structure
//!
//! ```text
//! render/
//! ├── mod.rs      - Renderer trait, Page, TemplateData
//! ├── context.rs  - PageContext extractor (flash, auth flag, CSRF token)
//! └── html.rs     - HtmlRenderer, the built-in escaped-HTML renderer
//! ```
//!
//! # Per-request data
//!
//! Every page carries the request path, the CSRF token, whether the session
//! is authenticated, and the flash message. The flash is popped while the
//! page is being rendered, so it is shown exactly once.

pub mod context;
pub mod html;

use crate::backend::error::RenderError;
use crate::shared::{LoginForm, NewSnippetForm, SignupForm, Snippet};

pub use context::PageContext;
pub use html::HtmlRenderer;

/// Pages the service can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    ShowSnippet,
    NewSnippet,
    Signup,
    Login,
}

impl Page {
    /// Stable name used in logs and render errors
    pub fn name(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::ShowSnippet => "show",
            Page::NewSnippet => "create",
            Page::Signup => "signup",
            Page::Login => "login",
        }
    }
}

/// A submitted form, with its failures, for re-rendering
#[derive(Debug, Clone)]
pub enum FormData {
    NewSnippet(NewSnippetForm),
    Signup(SignupForm),
    Login(LoginForm),
}

/// Everything a page may display
#[derive(Debug, Clone, Default)]
pub struct TemplateData {
    pub path: String,
    pub current_year: i32,
    pub csrf_token: String,
    pub is_authenticated: bool,
    pub flash: Option<String>,
    pub snippet: Option<Snippet>,
    pub snippets: Option<Vec<Snippet>>,
    pub form: Option<FormData>,
}

impl TemplateData {
    pub fn with_snippet(mut self, snippet: Snippet) -> Self {
        self.snippet = Some(snippet);
        self
    }

    pub fn with_snippets(mut self, snippets: Vec<Snippet>) -> Self {
        self.snippets = Some(snippets);
        self
    }

    pub fn with_form(mut self, form: FormData) -> Self {
        self.form = Some(form);
        self
    }
}

/// Turns a page and its data into a response body.
pub trait Renderer: Send + Sync {
    fn render(&self, page: Page, data: &TemplateData) -> Result<String, RenderError>;
}
