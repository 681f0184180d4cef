use crate::format::{
    entry_type_tone, format_clock, format_duration, format_hours, format_score, score_tone,
    status_tone, summary_tone,
};
use crate::models::{ActivityRecord, Client, ClientInput, DailySummary, ManualEntry, User, WeeklyReport};
use crate::session::Role;
use crate::state::DayReport;
use crate::weekly::{Bar, WeeklyCharts};
use chrono::NaiveDate;
use std::fmt::Write as _;

/// Message shown above a form after it was submitted.
#[derive(Debug, Clone, Copy)]
pub enum Notice<'a> {
    Ok(&'a str),
    Error(&'a str),
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn render_login(notice: Option<Notice>) -> String {
    let body = format!(
        r#"<section class="card narrow">
      <h2>Login</h2>
      {notice}
      <form method="post" action="/login" class="stack">
        <input name="username" placeholder="Email" required />
        <input name="password" type="password" placeholder="Password" required />
        <button class="btn-primary" type="submit">Login</button>
      </form>
      <p class="hint">Create an account? <a href="/register">Register</a></p>
    </section>"#,
        notice = notice_html(notice),
    );
    page("Login", None, &body)
}

pub fn render_register(notice: Option<Notice>) -> String {
    let body = format!(
        r#"<section class="card narrow">
      <h2>Register</h2>
      {notice}
      <form method="post" action="/register" class="stack">
        <input name="name" placeholder="Name" required />
        <input name="email" type="email" placeholder="Email" required />
        <input name="password" type="password" placeholder="Password" required />
        <button class="btn-primary" type="submit">Register</button>
      </form>
      <p class="hint">Already registered? <a href="/login">Login</a></p>
    </section>"#,
        notice = notice_html(notice),
    );
    page("Register", None, &body)
}

pub fn render_employee_day(date: NaiveDate, report: &DayReport, tracking: bool) -> String {
    let (toggle_class, toggle_label) = if tracking {
        ("btn-stop", "Stop Tracking")
    } else {
        ("btn-primary", "Start Tracking")
    };
    let body = format!(
        r#"<section class="toolbar">
      <form method="get" action="/" class="inline">
        <input type="date" name="date" value="{date}" />
        <button class="btn-ghost" type="submit">Show</button>
      </form>
      <form method="post" action="/tracking/toggle" class="inline">
        <input type="hidden" name="date" value="{date}" />
        <button class="{toggle_class}" type="submit">{toggle_label}</button>
      </form>
      <a class="btn-accent" href="/manual-entry?date={date}">Manual Entry</a>
    </section>
    {cards}
    <section class="card">
      <h2>Activities for {date}</h2>
      {activities}
    </section>"#,
        cards = summary_cards(&report.summary),
        activities = activity_list(&report.activities),
    );
    page("AI Time Tracker", Some(Role::Employee), &body)
}

pub fn render_manual_entry(entry: &ManualEntry, clients: &[Client], notice: Option<Notice>) -> String {
    let mut client_options = String::from(r#"<option value="">Select Client</option>"#);
    for client in clients {
        let selected = if client.name == entry.client_name { " selected" } else { "" };
        let _ = write!(
            client_options,
            r#"<option value="{name}"{selected}>{name}</option>"#,
            name = escape_html(&client.name),
        );
    }

    let mut status_options = String::new();
    for status in ["In Progress", "Completed", "Billed"] {
        let selected = if status == entry.status { " selected" } else { "" };
        let _ = write!(status_options, r#"<option{selected}>{status}</option>"#);
    }

    let body = format!(
        r#"<section class="card narrow">
      <h2>Manual Entry</h2>
      {notice}
      <form method="post" action="/manual-entry" class="stack">
        <select name="clientName">{client_options}</select>
        <input name="description" placeholder="Description" value="{description}" required />
        <input name="application" placeholder="Application" value="{application}" required />
        <input name="project_task" placeholder="Project / Task" value="{project_task}" required />
        <input name="duration" placeholder="Duration (hours)" value="{duration}" required />
        <input type="date" name="date" value="{date}" required />
        <input type="time" name="startTime" value="{start_time}" required />
        <select name="status">{status_options}</select>
        <button class="btn-accent" type="submit">Save Entry</button>
      </form>
    </section>"#,
        notice = notice_html(notice),
        description = escape_html(&entry.description),
        application = escape_html(&entry.application),
        project_task = escape_html(&entry.project_task),
        duration = escape_html(&entry.duration),
        date = escape_html(&entry.date),
        start_time = escape_html(&entry.start_time),
    );
    page("Manual Entry", Some(Role::Employee), &body)
}

/// Admin dashboard. `selected` carries the chosen user and the report for
/// `date`, when a user has been picked.
pub fn render_admin(
    users: &[User],
    date: NaiveDate,
    selected: Option<(&User, &DayReport)>,
    asset_base: &str,
) -> String {
    let selected_id = selected.map(|(user, _)| user.id);
    let mut user_items = String::new();
    for user in users {
        let class = if Some(user.id) == selected_id { "active" } else { "" };
        let _ = write!(
            user_items,
            r#"<li><a class="{class}" href="/admin?user={id}&date={date}">{name}</a></li>"#,
            id = user.id,
            name = escape_html(&user.display_name()),
        );
    }
    if users.is_empty() {
        user_items.push_str(r#"<li class="hint">No users found.</li>"#);
    }

    let main = match selected {
        None => r#"<p class="hint">Select a user and date to view reports</p>"#.to_string(),
        Some((user, report)) => format!(
            r#"<section class="toolbar">
        <h2>Reports for {name}</h2>
        <form method="get" action="/admin" class="inline">
          <input type="hidden" name="user" value="{id}" />
          <input type="date" name="date" value="{date}" />
          <button class="btn-ghost" type="submit">Show</button>
        </form>
        <a class="btn-primary" href="/admin/weekly-report/{id}">Weekly Report</a>
      </section>
      {cards}
      <p class="hint">Mean score across {count} activities: {mean}</p>
      <section class="card">
        <h2>Activities for {date}</h2>
        {activities}
      </section>
      <section class="card">
        <h2>Screenshots for {date}</h2>
        {screenshots}
      </section>"#,
            name = escape_html(&user.display_name()),
            id = user.id,
            cards = summary_cards(&report.summary),
            count = report.activities.len(),
            mean = format_score(Some(report.mean_productivity_score)),
            activities = activity_list(&report.activities),
            screenshots = screenshot_grid(report, asset_base),
        ),
    };

    let body = format!(
        r#"<div class="split">
      <aside class="card sidebar">
        <h2>User Activities</h2>
        <ul class="user-list">{user_items}</ul>
      </aside>
      <div class="main">{main}</div>
    </div>"#
    );
    page("Admin Dashboard", Some(Role::Admin), &body)
}

pub fn render_weekly(report: &WeeklyReport, charts: &WeeklyCharts) -> String {
    let name = report
        .username
        .as_deref()
        .map(capitalize)
        .unwrap_or_else(|| "User".to_string());
    let summary = &report.summary;
    let top_clients = if summary.top_clients.is_empty() {
        "None".to_string()
    } else {
        summary
            .top_clients
            .iter()
            .map(|(client, _)| escape_html(client))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let average = summary.avg_productivity.unwrap_or(0.0);

    let body = format!(
        r#"<header class="subhead">
      <h2>Weekly Report: {name}</h2>
      <p class="subtitle">{week} ({start} &rarr; {end})</p>
    </header>
    <section class="panel">
      <div class="stat"><span class="label">Total Time</span><span class="value">{total}</span></div>
      <div class="stat"><span class="label">Productive Time</span><span class="value tone-high">{productive}</span></div>
      <div class="stat"><span class="label">Top Clients</span><span class="value small">{top_clients}</span></div>
      <div class="stat"><span class="label">Avg Productivity</span><span class="value {tone}">{average}/10</span></div>
    </section>
    <section class="charts">
      {categories}
      {days}
      {client_activities}
      {client_hours}
    </section>"#,
        name = escape_html(&name),
        week = charts.week_label,
        start = escape_html(report.week_start.as_deref().unwrap_or(charts.start_date.as_str())),
        end = escape_html(report.week_end.as_deref().unwrap_or(charts.end_date.as_str())),
        total = format_hours(summary.total_hours.unwrap_or(0.0)),
        productive = format_hours(summary.productive_hours.unwrap_or(0.0)),
        tone = summary_tone(average).css_class(),
        categories = bar_chart("Time by Category", &charts.categories, "h"),
        days = bar_chart("Daily Hours", &charts.days, "h"),
        client_activities = bar_chart("Top Clients by Activities", &charts.client_activities, " activities"),
        client_hours = bar_chart("Hours per Client", &charts.client_hours, "h"),
    );
    page("Weekly Report", Some(Role::Admin), &body)
}

pub fn render_clients(clients: &[Client], role: Role, notice: Option<Notice>) -> String {
    let mut rows = String::new();
    for client in clients {
        let _ = write!(
            rows,
            r#"<tr>
          <td>{name}</td>
          <td>{email}</td>
          <td class="row-actions">
            <a class="btn-ghost" href="/clients/{id}/edit">Edit</a>
            <form method="post" action="/clients/{id}/delete" class="inline"
                  onsubmit="return confirm('Are you sure you want to delete this client?');">
              <button class="btn-stop" type="submit">Delete</button>
            </form>
          </td>
        </tr>"#,
            id = client.id,
            name = escape_html(&client.name),
            email = escape_html(client.contact_email.as_deref().unwrap_or("")),
        );
    }
    if clients.is_empty() {
        rows.push_str(r#"<tr><td colspan="3" class="hint">No clients found.</td></tr>"#);
    }

    let body = format!(
        r#"<section class="card">
      <div class="toolbar">
        <h2>Clients</h2>
        <a class="btn-accent" href="/clients/new">+ Add Client</a>
      </div>
      {notice}
      <table>
        <thead><tr><th>Name</th><th>Contact Email</th><th></th></tr></thead>
        <tbody>{rows}</tbody>
      </table>
    </section>"#,
        notice = notice_html(notice),
    );
    page("Clients", Some(role), &body)
}

/// Add form when `editing` is `None`, edit form otherwise.
pub fn render_client_form(
    editing: Option<i64>,
    input: &ClientInput,
    role: Role,
    notice: Option<Notice>,
) -> String {
    let (title, action) = match editing {
        Some(id) => ("Edit Client", format!("/clients/{id}")),
        None => ("Add Client", "/clients".to_string()),
    };
    let body = format!(
        r#"<section class="card narrow">
      <h2>{title}</h2>
      {notice}
      <form method="post" action="{action}" class="stack">
        <input name="name" placeholder="Client Name" value="{name}" required />
        <input name="contact_email" type="email" placeholder="Contact Email" value="{email}" />
        <div class="toolbar">
          <button class="btn-accent" type="submit">Save</button>
          <a class="btn-ghost" href="/clients">Cancel</a>
        </div>
      </form>
    </section>"#,
        notice = notice_html(notice),
        name = escape_html(&input.name),
        email = escape_html(input.contact_email.as_deref().unwrap_or("")),
    );
    page(title, Some(role), &body)
}

fn summary_cards(summary: &DailySummary) -> String {
    format!(
        r#"<section class="panel">
      <div class="stat"><span class="label">Total Time</span><span class="value">{total}</span></div>
      <div class="stat"><span class="label">Productive Time</span><span class="value tone-high">{productive}</span></div>
      <div class="stat"><span class="label">Clients</span><span class="value tone-accent">{clients}</span></div>
      <div class="stat"><span class="label">Avg Productivity</span><span class="value {tone}">{average}/10</span></div>
    </section>"#,
        total = format_hours(summary.total_time),
        productive = format_hours(summary.productive_time),
        clients = summary.clients_worked_with,
        tone = summary_tone(summary.average_productivity).css_class(),
        average = summary.average_productivity,
    )
}

fn activity_list(activities: &[ActivityRecord]) -> String {
    if activities.is_empty() {
        return r#"<p class="hint">No activities recorded for this date</p>"#.to_string();
    }

    let mut list = String::from(r#"<ul class="activities">"#);
    for activity in activities {
        let mut badges = format!(
            r#"<span class="badge {}">Productivity: {}</span>"#,
            score_tone(activity.productivity_score).css_class(),
            format_score(activity.productivity_score),
        );
        if let Some(entry_type) = activity.entry_type.as_deref().filter(|t| !t.is_empty()) {
            let _ = write!(
                badges,
                r#"<span class="badge {}">{}</span>"#,
                entry_type_tone(entry_type).css_class(),
                escape_html(entry_type),
            );
        }
        if !activity.is_automated() {
            if let Some(status) = activity.status.as_deref().filter(|s| !s.is_empty()) {
                let _ = write!(
                    badges,
                    r#"<span class="badge {}">{}</span>"#,
                    status_tone(status).css_class(),
                    escape_html(status),
                );
            }
        }
        if let Some(client) = activity.client() {
            let _ = write!(
                badges,
                r#"<span class="badge tone-accent">Client: {}</span>"#,
                escape_html(client)
            );
        }

        let description = activity
            .description()
            .map(|text| format!(r#"<p class="description">{}</p>"#, escape_html(&text)))
            .unwrap_or_default();
        let analysis = serde_json::to_string_pretty(&activity.analysis()).unwrap_or_default();

        let _ = write!(
            list,
            r#"<li>
        <details>
          <summary>
            <div class="activity-main">
              <div class="activity-title"><strong>{application}</strong> <span class="category">{category}</span> {badges}</div>
              <p class="window">{window}</p>
              {description}
            </div>
            <div class="activity-time">
              <span>{start} - {end}</span>
              <strong>{duration}</strong>
            </div>
          </summary>
          <pre>{analysis}</pre>
        </details>
      </li>"#,
            application = escape_html(activity.application.as_deref().unwrap_or("Unknown")),
            category = escape_html(activity.category.as_deref().unwrap_or("")),
            window = escape_html(activity.window_title.as_deref().unwrap_or("")),
            start = escape_html(&format_clock(activity.start_time.as_deref())),
            end = escape_html(&format_clock(activity.end_time.as_deref())),
            duration = format_duration(activity.minutes()),
            analysis = escape_html(&analysis),
        );
    }
    list.push_str("</ul>");
    list
}

fn screenshot_grid(report: &DayReport, asset_base: &str) -> String {
    if report.screenshots.is_empty() {
        return r#"<p class="hint">No screenshots available</p>"#.to_string();
    }

    let mut grid = String::from(r#"<div class="shots">"#);
    for shot in &report.screenshots {
        let src = format!("{}{}", asset_base.trim_end_matches('/'), shot.path);
        let _ = write!(
            grid,
            r#"<figure><a href="{src}" target="_blank"><img src="{src}" alt="Screenshot" loading="lazy" /></a><figcaption>{taken}</figcaption></figure>"#,
            src = escape_html(&src),
            taken = escape_html(shot.taken_at.as_deref().unwrap_or("")),
        );
    }
    grid.push_str("</div>");
    grid
}

fn bar_chart(title: &str, bars: &[Bar], unit: &str) -> String {
    if bars.is_empty() {
        return format!(r#"<div class="card"><h3>{title}</h3><p class="hint">No data</p></div>"#);
    }

    let mut rows = String::new();
    for bar in bars {
        let _ = write!(
            rows,
            r#"<div class="bar-row"><span class="bar-label">{label}</span><span class="bar-track"><span class="bar-fill" style="width: {width:.1}%"></span></span><span class="bar-value">{value}{unit}</span></div>"#,
            label = escape_html(&bar.label),
            width = bar.share * 100.0,
            value = bar.value,
        );
    }
    format!(r#"<div class="card"><h3>{title}</h3>{rows}</div>"#)
}

fn notice_html(notice: Option<Notice>) -> String {
    match notice {
        None => String::new(),
        Some(Notice::Ok(message)) => {
            format!(r#"<p class="status" data-type="ok">{}</p>"#, escape_html(message))
        }
        Some(Notice::Error(message)) => {
            format!(r#"<p class="status" data-type="error">{}</p>"#, escape_html(message))
        }
    }
}

fn nav_html(role: Option<Role>) -> &'static str {
    match role {
        None => "",
        Some(Role::Employee) => {
            r#"<nav><a href="/">Dashboard</a><a href="/manual-entry">Manual Entry</a><a href="/clients">Clients</a><form method="post" action="/logout" class="inline"><button class="btn-stop" type="submit">Logout</button></form></nav>"#
        }
        Some(Role::Admin) => {
            r#"<nav><a href="/admin">Users</a><a href="/clients">Manage Clients</a><form method="post" action="/logout" class="inline"><button class="btn-stop" type="submit">Logout</button></form></nav>"#
        }
    }
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn page(title: &str, role: Option<Role>, body: &str) -> String {
    LAYOUT_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{NAV}}", nav_html(role))
        .replace("{{BODY}}", body)
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} &middot; AI Time Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f3f5f8;
      --ink: #22262b;
      --muted: #6b717a;
      --accent: #6d4bd8;
      --accent-2: #2f4858;
      --card: white;
      --shadow: 0 18px 40px rgba(47, 72, 88, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg-1);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 24px 18px 48px;
    }

    .app {
      width: min(1200px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    .topbar {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 16px;
      background: var(--card);
      border-radius: 18px;
      box-shadow: var(--shadow);
      padding: 20px 24px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
      margin: 0;
    }

    h2, h3 {
      margin: 0 0 12px;
    }

    nav {
      display: flex;
      align-items: center;
      gap: 14px;
    }

    nav a {
      color: var(--accent-2);
      text-decoration: none;
      font-weight: 600;
    }

    .subtitle, .hint {
      margin: 0;
      color: var(--muted);
    }

    .card {
      background: var(--card);
      border-radius: 18px;
      box-shadow: var(--shadow);
      padding: 20px 24px;
    }

    .narrow {
      width: min(420px, 100%);
      margin: 0 auto;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .stat .value.small {
      font-size: 1rem;
    }

    .toolbar {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    .inline {
      display: inline-flex;
      gap: 8px;
      align-items: center;
      margin: 0;
    }

    .stack {
      display: grid;
      gap: 12px;
    }

    input, select {
      padding: 10px 12px;
      border: 1px solid #ccd2da;
      border-radius: 10px;
      font: inherit;
    }

    button, .btn-primary, .btn-accent, .btn-ghost, .btn-stop {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      text-decoration: none;
      display: inline-flex;
      align-items: center;
      justify-content: center;
    }

    .btn-primary { background: #2563eb; color: white; }
    .btn-accent { background: var(--accent); color: white; }
    .btn-ghost { background: rgba(47, 72, 88, 0.08); color: var(--accent-2); }
    .btn-stop { background: #dc2626; color: white; }

    .split {
      display: grid;
      grid-template-columns: 260px 1fr;
      gap: 24px;
    }

    .main {
      display: grid;
      gap: 20px;
      align-content: start;
    }

    .user-list {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 6px;
    }

    .user-list a {
      display: block;
      padding: 8px 12px;
      border-radius: 10px;
      color: var(--ink);
      text-decoration: none;
    }

    .user-list a.active {
      background: #2563eb;
      color: white;
    }

    .activities {
      list-style: none;
      margin: 0;
      padding: 0;
    }

    .activities li {
      border-top: 1px solid #e5e7eb;
    }

    .activities summary {
      display: flex;
      justify-content: space-between;
      gap: 16px;
      padding: 16px 4px;
      cursor: pointer;
      list-style: none;
    }

    .activity-title {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
      align-items: center;
    }

    .category, .window {
      color: var(--muted);
      font-size: 0.9rem;
    }

    .activity-time {
      text-align: right;
      display: grid;
      gap: 4px;
      color: var(--muted);
      font-size: 0.9rem;
    }

    .activity-time strong {
      color: var(--ink);
    }

    pre {
      background: #f3f4f6;
      border-radius: 10px;
      padding: 12px;
      white-space: pre-wrap;
      word-break: break-word;
      font-size: 0.8rem;
    }

    .badge {
      border-radius: 999px;
      padding: 2px 10px;
      font-size: 0.75rem;
      border: 1px solid currentColor;
    }

    .tone-high { color: #15803d; }
    .tone-medium { color: #a16207; }
    .tone-low { color: #c2410c; }
    .tone-poor { color: #b91c1c; }
    .tone-accent { color: #7e22ce; }
    .tone-neutral { color: #4b5563; }

    .shots {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(180px, 1fr));
      gap: 12px;
    }

    .shots figure {
      margin: 0;
      border: 1px solid #e5e7eb;
      border-radius: 10px;
      overflow: hidden;
    }

    .shots img {
      width: 100%;
      height: 140px;
      object-fit: cover;
      display: block;
    }

    .shots figcaption {
      font-size: 0.75rem;
      color: var(--muted);
      padding: 6px;
      text-align: center;
    }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(420px, 1fr));
      gap: 20px;
    }

    .bar-row {
      display: grid;
      grid-template-columns: 140px 1fr 110px;
      gap: 10px;
      align-items: center;
      padding: 4px 0;
    }

    .bar-track {
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
      height: 12px;
      overflow: hidden;
    }

    .bar-fill {
      display: block;
      height: 100%;
      background: var(--accent);
    }

    .bar-value {
      text-align: right;
      color: var(--muted);
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      text-align: left;
      padding: 10px 8px;
      border-bottom: 1px solid #e5e7eb;
    }

    .row-actions {
      display: flex;
      gap: 8px;
      justify-content: flex-end;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    @media (max-width: 800px) {
      .split {
        grid-template-columns: 1fr;
      }
      .charts {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header class="topbar">
      <h1>AI Time Tracker</h1>
      {{NAV}}
    </header>
    {{BODY}}
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Screenshot;

    fn record(app: &str, minutes: f64, score: f64, client: Option<&str>) -> ActivityRecord {
        ActivityRecord {
            application: Some(app.to_string()),
            duration_minutes: Some(minutes),
            productivity_score: Some(score),
            client_identified: client.map(str::to_string),
            ..ActivityRecord::default()
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn employee_day_shows_summary_and_rows() {
        let report = DayReport::new(
            vec![
                record("Code <editor>", 120.0, 8.0, Some("Acme")),
                record("Slack", 60.0, 3.0, Some("None")),
            ],
            Vec::new(),
        );
        let html = render_employee_day(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), &report, true);

        assert!(html.contains("3h"));
        assert!(html.contains("2h"));
        assert!(html.contains("6.7/10"));
        assert!(html.contains("Client: Acme"));
        assert!(!html.contains("Client: None"));
        assert!(html.contains("Code &lt;editor&gt;"));
        assert!(html.contains("Stop Tracking"));
        assert!(html.contains("1h 0m"));
    }

    #[test]
    fn empty_day_has_placeholder() {
        let report = DayReport::new(Vec::new(), Vec::new());
        let html = render_employee_day(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), &report, false);
        assert!(html.contains("No activities recorded for this date"));
        assert!(html.contains("Start Tracking"));
    }

    #[test]
    fn admin_page_lists_users_and_screenshots() {
        let users = vec![
            User {
                id: 1,
                name: Some("Ana".into()),
                email: None,
                role: Some("employee".into()),
            },
            User {
                id: 2,
                name: None,
                email: Some("bo@x.io".into()),
                role: None,
            },
        ];
        let report = DayReport::new(
            Vec::new(),
            vec![Screenshot {
                id: Some(5),
                path: "/screenshots/a.png".into(),
                taken_at: Some("2026-01-05T10:00:00".into()),
            }],
        );
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let html = render_admin(&users, date, Some((&users[1], &report)), "http://api.local/");

        assert!(html.contains("Reports for bo@x.io"));
        assert!(html.contains(r#"href="/admin?user=1&date=2026-01-05""#));
        assert!(html.contains("http://api.local/screenshots/a.png"));
        assert!(html.contains("/admin/weekly-report/2"));
    }

    #[test]
    fn bar_chart_widths_follow_share() {
        let bars = vec![
            Bar {
                label: "Work".into(),
                value: 4.0,
                share: 1.0,
            },
            Bar {
                label: "Social".into(),
                value: 1.0,
                share: 0.25,
            },
        ];
        let html = bar_chart("Time by Category", &bars, "h");
        assert!(html.contains("width: 100.0%"));
        assert!(html.contains("width: 25.0%"));
        assert!(bar_chart("Empty", &[], "h").contains("No data"));
    }

    #[test]
    fn notices_are_tagged() {
        assert!(render_login(Some(Notice::Error("Invalid credentials"))).contains(r#"data-type="error""#));
        assert!(render_register(Some(Notice::Ok("Registered"))).contains(r#"data-type="ok""#));
    }
}
