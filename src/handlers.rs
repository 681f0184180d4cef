use crate::errors::{ApiError, AppError};
use crate::freshness::Settled;
use crate::models::{
    Client, ClientInput, Credentials, DailySummary, ManualEntry, Registration, User,
    UserDaySummary,
};
use crate::session::{Role, UserInfo};
use crate::state::{AppState, DayReport, UserDay};
use crate::summary::{mean_productivity_score, summarize};
use crate::ui::{
    Notice, render_admin, render_client_form, render_clients, render_employee_day, render_login,
    render_manual_entry, render_register, render_weekly,
};
use crate::weekly::build_weekly_charts;
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn login_page(State(state): State<AppState>) -> Response {
    match state.session.current_user().await {
        Some(user) => Redirect::to(home_for(user.role())).into_response(),
        None => Html(render_login(None)).into_response(),
    }
}

pub async fn login(
    State(state): State<AppState>,
    Form(credentials): Form<Credentials>,
) -> Result<Response, AppError> {
    if credentials.username.trim().is_empty() || credentials.password.is_empty() {
        let page = render_login(Some(Notice::Error("Email and password are required")));
        return Ok(Html(page).into_response());
    }

    let token = match state.api.login(&credentials).await {
        Ok(token) => token,
        Err(err) => {
            let message = match err {
                ApiError::Unauthorized => "Invalid email or password".to_string(),
                other => other.user_message(),
            };
            warn!("login failed: {message}");
            return Ok(Html(render_login(Some(Notice::Error(&message)))).into_response());
        }
    };

    let user = UserInfo {
        role: token.role,
        is_admin: token.is_admin.unwrap_or(false),
    };
    let home = home_for(user.role());
    state.session.login(token.access_token, user).await?;
    Ok(Redirect::to(home).into_response())
}

pub async fn register_page() -> Html<String> {
    Html(render_register(None))
}

pub async fn register(
    State(state): State<AppState>,
    Form(registration): Form<Registration>,
) -> Html<String> {
    match state.api.register(&registration).await {
        Ok(()) => {
            info!(email = %registration.email, "registered new employee");
            Html(render_register(Some(Notice::Ok(
                "Registration successful! Please log in.",
            ))))
        }
        Err(err) => {
            let message = err.user_message();
            Html(render_register(Some(Notice::Error(&message))))
        }
    }
}

pub async fn logout(State(state): State<AppState>) -> Result<Redirect, AppError> {
    state.api.logout().await;
    state.session.logout().await?;
    Ok(Redirect::to("/login"))
}

pub async fn employee_day(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Response, AppError> {
    let date = parse_date(query.date.as_deref())?;
    let views = &state.views;
    views.own_day.select(date).await;

    let (activities, tracking) =
        tokio::try_join!(state.api.activities(date), state.api.tracking_status())?;
    let report = DayReport::new(activities, Vec::new());

    let (date, report) = match views.own_day.settle(date, report).await {
        Settled::Fresh(report) => (date, report),
        Settled::Newer(newest, report) => (newest, report),
        Settled::Pending(newest) => {
            return Ok(Redirect::to(&format!("/?date={newest}")).into_response());
        }
    };

    Ok(Html(render_employee_day(date, &report, tracking.is_tracking)).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct ToggleForm {
    #[serde(default)]
    pub date: Option<String>,
}

pub async fn toggle_tracking(
    State(state): State<AppState>,
    Form(form): Form<ToggleForm>,
) -> Result<Redirect, AppError> {
    let date = parse_date(form.date.as_deref())?;
    let status = state.api.tracking_status().await?;
    let enable = !status.is_tracking;
    state.api.set_tracking(enable).await?;
    info!(tracking = enable, "tracking toggled");
    Ok(Redirect::to(&format!("/?date={date}")))
}

pub async fn manual_entry_page(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Html<String>, AppError> {
    let date = parse_date(query.date.as_deref())?;
    let clients = state.api.clients().await?;
    let entry = ManualEntry::for_date(&date.to_string());
    Ok(Html(render_manual_entry(&entry, &clients, None)))
}

pub async fn submit_manual_entry(
    State(state): State<AppState>,
    Form(entry): Form<ManualEntry>,
) -> Result<Html<String>, AppError> {
    let clients = state.api.clients().await?;

    if let Err(message) = entry.validate() {
        return Ok(Html(render_manual_entry(
            &entry,
            &clients,
            Some(Notice::Error(&message)),
        )));
    }

    match state.api.submit_manual_entry(&entry).await {
        Ok(receipt) => {
            info!(id = ?receipt.id, date = %entry.date, "manual entry created");
            let fresh = ManualEntry::for_date(&entry.date);
            Ok(Html(render_manual_entry(
                &fresh,
                &clients,
                Some(Notice::Ok("Entry created successfully!")),
            )))
        }
        Err(err) => {
            let message = form_error(err)?;
            Ok(Html(render_manual_entry(
                &entry,
                &clients,
                Some(Notice::Error(&message)),
            )))
        }
    }
}

pub async fn admin_dashboard(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Response, AppError> {
    let date = parse_date(query.date.as_deref())?;
    let users = state.api.users().await?;
    let asset_base = state.config.api_base_url.as_str();

    let Some(user_id) = parse_user(query.user.as_deref())? else {
        return Ok(Html(render_admin(&users, date, None, asset_base)).into_response());
    };
    find_user(&users, user_id)?;

    let key = UserDay { user_id, date };
    let (shown, report) = match fetch_user_day(&state, key).await? {
        Settled::Fresh(report) => (key, report),
        Settled::Newer(newest, report) => (newest, report),
        Settled::Pending(newest) => {
            let target = format!("/admin?user={}&date={}", newest.user_id, newest.date);
            return Ok(Redirect::to(&target).into_response());
        }
    };
    let user = find_user(&users, shown.user_id)?;

    Ok(Html(render_admin(&users, shown.date, Some((user, &report)), asset_base)).into_response())
}

pub async fn weekly_report(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let report = state.api.weekly_report(user_id).await?;
    let charts = build_weekly_charts(&report);
    Ok(Html(render_weekly(&report, &charts)))
}

pub async fn clients_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let role = current_role(&state).await;
    let clients = state.api.clients().await?;
    Ok(Html(render_clients(&clients, role, None)))
}

pub async fn new_client_page(State(state): State<AppState>) -> Html<String> {
    let role = current_role(&state).await;
    Html(render_client_form(None, &ClientInput::default(), role, None))
}

pub async fn create_client(
    State(state): State<AppState>,
    Form(input): Form<ClientInput>,
) -> Result<Response, AppError> {
    save_client(&state, None, input).await
}

pub async fn edit_client_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let role = current_role(&state).await;
    let clients = state.api.clients().await?;
    let client = find_client(&clients, id)?;
    Ok(Html(render_client_form(
        Some(id),
        &ClientInput::from(client),
        role,
        None,
    )))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(input): Form<ClientInput>,
) -> Result<Response, AppError> {
    save_client(&state, Some(id), input).await
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    state.api.delete_client(id).await?;
    info!(id, "client deleted");
    Ok(Redirect::to("/clients"))
}

pub async fn own_summary(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailySummary>, AppError> {
    let date = parse_date(query.date.as_deref())?;
    let activities = state.api.activities(date).await?;
    Ok(Json(summarize(&activities)))
}

pub async fn user_summary(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<DateQuery>,
) -> Result<Json<UserDaySummary>, AppError> {
    let date = parse_date(query.date.as_deref())?;
    let activities = state.api.user_activities(user_id, date).await?;
    Ok(Json(UserDaySummary {
        user_id,
        date: date.to_string(),
        summary: summarize(&activities),
        mean_productivity_score: mean_productivity_score(&activities),
        activity_count: activities.len(),
    }))
}

/// Loads one user's day for the admin view, settled against whatever the
/// operator picked while it was in flight.
async fn fetch_user_day(
    state: &AppState,
    key: UserDay,
) -> Result<Settled<UserDay, DayReport>, AppError> {
    let views = &state.views;
    views.user_day.select(key).await;

    let (activities, screenshots) = tokio::try_join!(
        state.api.user_activities(key.user_id, key.date),
        state.api.user_screenshots(key.user_id, key.date),
    )?;
    let report = DayReport::new(activities, screenshots);
    Ok(views.user_day.settle(key, report).await)
}

async fn save_client(
    state: &AppState,
    id: Option<i64>,
    input: ClientInput,
) -> Result<Response, AppError> {
    let role = current_role(state).await;
    let input = match input.clone().normalized() {
        Ok(input) => input,
        Err(message) => {
            let page = render_client_form(id, &input, role, Some(Notice::Error(&message)));
            return Ok(Html(page).into_response());
        }
    };

    let saved = match id {
        Some(id) => state.api.update_client(id, &input).await,
        None => state.api.create_client(&input).await.map(|_| ()),
    };

    match saved {
        Ok(()) => {
            info!(name = %input.name, updated = id.is_some(), "client saved");
            Ok(Redirect::to("/clients").into_response())
        }
        Err(err) => {
            let message = form_error(err)?;
            let page = render_client_form(id, &input, role, Some(Notice::Error(&message)));
            Ok(Html(page).into_response())
        }
    }
}

/// Turns an upstream failure into text for a form, except an expired
/// session, which still ends at the login page.
fn form_error(err: ApiError) -> Result<String, AppError> {
    match err {
        ApiError::Unauthorized => Err(AppError::unauthorized()),
        other => {
            warn!("form submission failed: {other}");
            Ok(other.user_message())
        }
    }
}

async fn current_role(state: &AppState) -> Role {
    state
        .session
        .current_user()
        .await
        .map(|user| user.role())
        .unwrap_or(Role::Employee)
}

fn home_for(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin",
        Role::Employee => "/",
    }
}

fn parse_date(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(Local::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| AppError::bad_request("date must be YYYY-MM-DD")),
    }
}

fn parse_user(raw: Option<&str>) -> Result<Option<i64>, AppError> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| AppError::bad_request("user must be a numeric id")),
    }
}

fn find_user(users: &[User], id: i64) -> Result<&User, AppError> {
    users
        .iter()
        .find(|user| user.id == id)
        .ok_or_else(|| AppError::not_found(format!("no user with id {id}")))
}

fn find_client(clients: &[Client], id: i64) -> Result<&Client, AppError> {
    clients
        .iter()
        .find(|client| client.id == id)
        .ok_or_else(|| AppError::not_found(format!("no client with id {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_date_means_today() {
        assert_eq!(parse_date(None).unwrap(), Local::now().date_naive());
        assert_eq!(parse_date(Some("  ")).unwrap(), Local::now().date_naive());
        assert_eq!(
            parse_date(Some("2026-01-05")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
        );
    }

    #[test]
    fn malformed_date_is_bad_request() {
        let err = parse_date(Some("05/01/2026")).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn user_selection_parsing() {
        assert_eq!(parse_user(None).unwrap(), None);
        assert_eq!(parse_user(Some("")).unwrap(), None);
        assert_eq!(parse_user(Some("12")).unwrap(), Some(12));
        assert!(parse_user(Some("abc")).is_err());
    }

    #[test]
    fn home_depends_on_role() {
        assert_eq!(home_for(Role::Admin), "/admin");
        assert_eq!(home_for(Role::Employee), "/");
    }

    #[test]
    fn expired_session_is_not_a_form_message() {
        assert!(form_error(ApiError::Unauthorized).is_err());
        let message = form_error(ApiError::Rejected {
            status: 400,
            detail: "Client already exists".into(),
        })
        .unwrap();
        assert_eq!(message, "Client already exists");
    }
}
