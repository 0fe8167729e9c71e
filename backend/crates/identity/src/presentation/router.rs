//! Identity Router

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::application::IdentityServices;
use crate::domain::repository::UserStore;
use crate::presentation::handlers::{self, IdentityAppState};
use crate::presentation::middleware::require_bearer;

/// Identity routes over any user store. Mount under e.g. `/api/auth`.
pub fn identity_router<S>(store: S, services: Arc<IdentityServices>) -> Router
where
    S: UserStore + Clone + Send + Sync + 'static,
{
    let state = IdentityAppState {
        store: Arc::new(store),
        services: services.clone(),
    };

    let protected = Router::new()
        .route("/me", get(handlers::me::<S>))
        .route("/password", post(handlers::change_password::<S>))
        .route_layer(middleware::from_fn_with_state(services, require_bearer));

    Router::new()
        .route("/signup", post(handlers::sign_up::<S>))
        .route("/signin", post(handlers::sign_in::<S>))
        .route("/signout", post(handlers::sign_out::<S>))
        .route(
            "/social/{provider}/authorize",
            get(handlers::social_authorize::<S>),
        )
        .route(
            "/social/{provider}/callback",
            get(handlers::social_callback::<S>),
        )
        .merge(protected)
        .with_state(state)
}
