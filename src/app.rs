use crate::access::{Access, Viewer, evaluate};
use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tracing::debug;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/register", get(handlers::register_page).post(handlers::register))
        .route("/logout", post(handlers::logout))
        .route("/", get(handlers::employee_day))
        .route("/tracking/toggle", post(handlers::toggle_tracking))
        .route(
            "/manual-entry",
            get(handlers::manual_entry_page).post(handlers::submit_manual_entry),
        )
        .route("/admin", get(handlers::admin_dashboard))
        .route("/admin/weekly-report/:id", get(handlers::weekly_report))
        .route("/admin/add-client", get(handlers::new_client_page))
        .route("/clients", get(handlers::clients_page).post(handlers::create_client))
        .route("/clients/new", get(handlers::new_client_page))
        .route("/clients/:id", post(handlers::update_client))
        .route("/clients/:id/edit", get(handlers::edit_client_page))
        .route("/clients/:id/delete", post(handlers::delete_client))
        .route("/api/summary", get(handlers::own_summary))
        .route("/api/admin/users/:id/summary", get(handlers::user_summary))
        .layer(middleware::from_fn_with_state(state.clone(), enforce_access))
        .with_state(state)
}

async fn enforce_access(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let user = state.session.current_user().await;
    let viewer = Viewer::from_user(user.as_ref());
    match evaluate(viewer, request.uri().path()) {
        Access::Allow => next.run(request).await,
        Access::Redirect(target) => {
            debug!(?viewer, path = %request.uri().path(), to = target, "access redirect");
            Redirect::to(target).into_response()
        }
    }
}
