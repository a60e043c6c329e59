/**
 * Middleware Pipeline
 *
 * The request pipeline is a list of [`Stage`]s, outermost first. Composition
 * order is data: it can be inspected with [`Pipeline::stages`], checked with
 * [`Pipeline::validate`], and only then folded onto a router.
 *
 * # Ordering Rules
 *
 * - `RequireLogin` reads the session, so `SessionAttach` must come earlier.
 * - A stage may appear at most once in a realised pipeline.
 * - Every realised pipeline carries `Csrf`, so no route is reachable without
 *   the token check on unsafe methods.
 *
 * The global pipeline wraps every route; gated routes add their own
 * pipeline inside it. [`Pipeline::then`] gives the realised order of the two
 * together, and that is what gets validated.
 *
 * # Example
 *
 * ```rust
 * use snippetbox::backend::middleware::{Pipeline, Stage};
 *
 * let global = Pipeline::standard();
 * let gated = Pipeline::login_required();
 * let realised = global.then(&gated);
 * assert!(realised.validate().is_ok());
 * assert_eq!(realised.stages().last(), Some(&Stage::RequireLogin));
 * ```
 */

use std::fmt;

use axum::{middleware, Router};
use thiserror::Error;

use crate::backend::middleware::{auth, csrf, headers, logging, session};
use crate::backend::server::state::AppState;

/// One request-processing step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    RequestLog,
    SecurityHeaders,
    SessionAttach,
    Csrf,
    RequireLogin,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::RequestLog => "request-log",
            Stage::SecurityHeaders => "security-headers",
            Stage::SessionAttach => "session-attach",
            Stage::Csrf => "csrf",
            Stage::RequireLogin => "require-login",
        };
        f.write_str(name)
    }
}

impl Stage {
    fn layer_onto(self, router: Router<AppState>, state: &AppState, routes_only: bool) -> Router<AppState> {
        macro_rules! wrap {
            ($layer:expr) => {
                if routes_only {
                    router.route_layer($layer)
                } else {
                    router.layer($layer)
                }
            };
        }

        match self {
            Stage::RequestLog => wrap!(middleware::from_fn(logging::log_request)),
            Stage::SecurityHeaders => wrap!(middleware::from_fn(headers::secure_headers)),
            Stage::SessionAttach => wrap!(middleware::from_fn_with_state(
                state.clone(),
                session::attach_session
            )),
            Stage::Csrf => wrap!(middleware::from_fn_with_state(state.clone(), csrf::csrf_protect)),
            Stage::RequireLogin => wrap!(middleware::from_fn(auth::require_login)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("stage `{0}` needs an earlier `session-attach` stage")]
    SessionRequired(Stage),

    #[error("stage `{0}` appears more than once")]
    Duplicate(Stage),

    #[error("pipeline has no `csrf` stage in front of the routes")]
    CsrfRequired,
}

/// An ordered list of stages, outermost first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: impl IntoIterator<Item = Stage>) -> Self {
        Self {
            stages: stages.into_iter().collect(),
        }
    }

    /// The stages that wrap every route
    pub fn standard() -> Self {
        Self::new([
            Stage::RequestLog,
            Stage::SecurityHeaders,
            Stage::SessionAttach,
            Stage::Csrf,
        ])
    }

    /// The extra stage for routes that need a logged-in user
    pub fn login_required() -> Self {
        Self::new([Stage::RequireLogin])
    }

    /// Stages in the order a request meets them
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// `self` wrapped around `inner`
    pub fn then(&self, inner: &Pipeline) -> Pipeline {
        Self::new(self.stages.iter().chain(inner.stages.iter()).copied())
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        let mut seen = Vec::with_capacity(self.stages.len());
        for &stage in &self.stages {
            if seen.contains(&stage) {
                return Err(PipelineError::Duplicate(stage));
            }
            if stage == Stage::RequireLogin && !seen.contains(&Stage::SessionAttach) {
                return Err(PipelineError::SessionRequired(stage));
            }
            seen.push(stage);
        }
        if !seen.contains(&Stage::Csrf) {
            return Err(PipelineError::CsrfRequired);
        }
        Ok(())
    }

    /// Wrap every route and the fallback of `router`.
    ///
    /// Layers are applied innermost first so that the first stage in the
    /// list sees the request first.
    pub fn apply(&self, router: Router<AppState>, state: &AppState) -> Router<AppState> {
        self.fold(router, state, false)
    }

    /// Wrap only the routes already registered on `router`.
    pub fn apply_to_routes(&self, router: Router<AppState>, state: &AppState) -> Router<AppState> {
        self.fold(router, state, true)
    }

    fn fold(&self, router: Router<AppState>, state: &AppState, routes_only: bool) -> Router<AppState> {
        self.stages
            .iter()
            .rev()
            .fold(router, |router, stage| stage.layer_onto(router, state, routes_only))
    }
}
