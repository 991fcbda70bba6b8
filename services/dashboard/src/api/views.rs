//! Server-rendered HTML for the browser routes.

use chrono::{DateTime, SecondsFormat, Utc};
use eventdesk_model::{Decision, EnrichedEvent, Event, EventStatus, Profile, Role};

use super::events::CreateEventInput;

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Percent-encode a value for use as one URL path segment.
fn path_segment(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Date as shown in tables and selects; missing dates read "N/A".
pub fn display_date(date: Option<&DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Date as carried in form values.
pub fn form_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Error,
}

/// A one-shot message shown above the page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub tone: Tone,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Error,
            text: text.into(),
        }
    }

    /// Notice for a `?notice=` code set by a post-redirect; unknown codes are ignored.
    pub fn from_flash(code: &str) -> Option<Self> {
        match code {
            "created" => Some(Self::info("Event created.")),
            "updated" => Some(Self::info("Event updated.")),
            "forbidden" => Some(Self::error("You are not allowed to do that.")),
            _ => None,
        }
    }

    fn render(&self) -> String {
        let class = match self.tone {
            Tone::Info => "notice notice-info",
            Tone::Error => "notice notice-error",
        };
        format!(
            r#"<p class="{class}" role="status">{}</p>"#,
            html_escape(&self.text)
        )
    }
}

fn notice_html(notice: Option<&Notice>) -> String {
    notice.map(Notice::render).unwrap_or_default()
}

fn layout(title: &str, nav: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | EventDesk</title>
<style>
body {{ font-family: system-ui, sans-serif; margin: 2rem; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border-bottom: 1px solid #ddd; padding: .5rem; text-align: left; }}
.badge {{ border-radius: .25rem; padding: .1rem .5rem; }}
.badge-pending {{ background: #fef9c3; color: #854d0e; }}
.badge-accept {{ background: #dcfce7; color: #166534; }}
.badge-rejected {{ background: #fee2e2; color: #991b1b; }}
.notice-info {{ color: #166534; }}
.notice-error, .field-error {{ color: #991b1b; }}
</style>
</head>
<body>
{nav}
<main>
{body}
</main>
</body>
</html>
"#,
        title = html_escape(title),
    )
}

fn signed_in_nav() -> String {
    r#"<nav><a href="/dashboard">Dashboard</a>
<form method="post" action="/session/logout" style="display:inline"><button type="submit">Sign out</button></form></nav>"#
        .to_string()
}

fn status_badge(status: &EventStatus) -> String {
    format!(
        r#"<span class="badge badge-{s}">{s}</span>"#,
        s = status.as_str()
    )
}

/// Landing page with the session token form.
pub fn landing(notice: Option<&Notice>) -> String {
    let body = format!(
        r#"<h1>EventDesk</h1>
{notice}
<p>Paste your session token to continue.</p>
<form method="post" action="/session">
<label for="token">Session token</label>
<input id="token" name="token" type="password" autocomplete="off" required>
<button type="submit">Sign in</button>
</form>"#,
        notice = notice_html(notice),
    );
    layout("Sign in", "", &body)
}

/// Dashboard page: greeting, actions, and the events table or the failure message.
///
/// `events` is already filtered by `search`, which is echoed in the search box.
pub fn dashboard(
    profile: &Profile,
    events: Result<&[EnrichedEvent], &str>,
    search: &str,
    notice: Option<&Notice>,
) -> String {
    let add_new = if profile.role == Role::Hr {
        r#"<a class="button" href="/dashboard/user/new">+ Add New</a>"#
    } else {
        ""
    };

    let content = match events {
        Err(message) => format!(r#"<p class="notice-error">{}</p>"#, html_escape(message)),
        Ok([]) if search.trim().is_empty() => "<p>No events available.</p>".to_string(),
        Ok([]) => format!("{}\n<p>No results.</p>", search_box(search)),
        Ok(events) => format!("{}\n{}", search_box(search), events_table(events)),
    };

    let body = format!(
        r#"<header>
<h1>Hello {name}</h1>
<p>Manage events.</p>
{add_new}
</header>
<hr>
{notice}
{content}"#,
        name = html_escape(profile.display_name()),
        notice = notice_html(notice),
    );
    layout("Dashboard", &signed_in_nav(), &body)
}

fn search_box(search: &str) -> String {
    format!(
        r#"<form method="get" action="/dashboard" role="search">
<input name="q" type="search" placeholder="Search by name" value="{}">
<button type="submit">Search</button>
</form>"#,
        html_escape(search)
    )
}

fn events_table(events: &[EnrichedEvent]) -> String {
    let rows: String = events
        .iter()
        .map(|row| {
            let event = &row.event;
            format!(
                r#"<tr>
<td>{name}</td>
<td>{status}</td>
<td>{vendor}</td>
<td>{created}</td>
<td>{confirmed}</td>
<td>{remarks}</td>
<td><a href="/dashboard/events/{id}">Event Detail</a></td>
</tr>
"#,
                name = html_escape(&event.name),
                status = status_badge(&event.status),
                vendor = html_escape(&row.vendor_company_name),
                created = display_date(event.date_created.as_ref()),
                confirmed = display_date(event.confirmed_date.as_ref()),
                remarks = html_escape(&event.remarks),
                id = path_segment(event.id.as_str()),
            )
        })
        .collect();

    format!(
        r#"<table>
<thead><tr><th>Event Name</th><th>Status</th><th>Vendor Name</th><th>Date Created</th><th>Confirmed Date</th><th>Remarks</th><th></th></tr></thead>
<tbody>
{rows}</tbody>
</table>"#
    )
}

fn field_errors_for(errors: &[(String, String)], field: &str) -> String {
    errors
        .iter()
        .filter(|(f, _)| f == field)
        .map(|(_, message)| {
            format!(
                r#"<span class="field-error">{}</span>"#,
                html_escape(message)
            )
        })
        .collect()
}

/// Event creation form; `values` are echoed back so nothing typed is lost.
pub fn create_form(
    values: &CreateEventInput,
    errors: &[(String, String)],
    notice: Option<&Notice>,
) -> String {
    let text_field = |id: &str, label: &str, value: &str, kind: &str| {
        format!(
            r#"<p><label for="{id}">{label}</label>
<input id="{id}" name="{id}" type="{kind}" value="{value}">
{errors}</p>"#,
            value = html_escape(value),
            errors = field_errors_for(errors, id),
        )
    };

    let dates: String = values
        .proposed_dates()
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let n = i + 1;
            format!(
                r#"<input id="proposed_date_{n}" name="proposed_date_{n}" type="date" value="{}" aria-label="Proposed date {n}">
"#,
                html_escape(value)
            )
        })
        .collect();

    let body = format!(
        r#"<h1>Create Event</h1>
{notice}
<form method="post" action="/dashboard/user/new">
{name}
<fieldset><legend>Proposed dates</legend>
{dates}{date_errors}</fieldset>
{postal_code}
{address}
{email_vendor}
<button type="submit">Create</button>
<a href="/dashboard">Cancel</a>
</form>"#,
        notice = notice_html(notice),
        name = text_field("name", "Event name", &values.name, "text"),
        date_errors = field_errors_for(errors, "proposed_dates"),
        postal_code = text_field("postal_code", "Postal code", &values.postal_code, "text"),
        address = text_field("address", "Address", &values.address, "text"),
        email_vendor = text_field("email_vendor", "Vendor email", &values.email_vendor, "email"),
    );
    layout("Create Event", &signed_in_nav(), &body)
}

/// Which part of the detail dialog is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailStep {
    Review,
    /// Second step of a rejection, asking for remarks.
    Reject,
}

/// Event detail dialog; vendors additionally get accept and reject controls.
///
/// `entered` is a decision that failed to go through; its date or remarks are
/// shown again so the vendor can retry.
pub fn event_detail(
    event: &Event,
    can_respond: bool,
    step: DetailStep,
    entered: Option<&Decision>,
    notice: Option<&Notice>,
) -> String {
    let id = path_segment(event.id.as_str());
    let (selected_date, remarks) = match entered {
        Some(Decision::Accept { date }) => (Some(date), ""),
        Some(Decision::Reject { remarks }) => (event.confirmed_date.as_ref(), remarks.as_str()),
        None => (event.confirmed_date.as_ref(), ""),
    };
    let row = |label: &str, value: &str| {
        format!(
            "<tr><th>{label}</th><td>{}</td></tr>\n",
            html_escape(value)
        )
    };

    let fields = [
        row("Name", &event.name),
        row("Status", event.status.as_str()),
        row("HR Email", &event.email_hr),
        row("Vendor Email", &event.email_vendor),
        row("Postal Code", &event.postal_code),
        row("Address", &event.address),
        row("Confirmed Date", &display_date(event.confirmed_date.as_ref())),
        row("Remarks", &event.remarks),
    ]
    .concat();

    let actions = match (can_respond, step) {
        (false, _) => {
            let dates: String = event
                .proposed_dates
                .iter()
                .map(|d| format!("<li>{}</li>", display_date(Some(d))))
                .collect();
            format!("<h2>Proposed Dates</h2>\n<ul>{dates}</ul>")
        }
        (true, DetailStep::Review) => {
            let options: String = event
                .proposed_dates
                .iter()
                .map(|d| {
                    let selected = if selected_date == Some(d) {
                        " selected"
                    } else {
                        ""
                    };
                    format!(
                        r#"<option value="{}"{selected}>{}</option>"#,
                        form_date(d),
                        display_date(Some(d))
                    )
                })
                .collect();
            format!(
                r#"<form method="post" action="/dashboard/events/{id}/accept">
<label for="date">Proposed Date</label>
<select id="date" name="date">{options}</select>
<button type="submit">Accept</button>
</form>
<a href="/dashboard/events/{id}?step=reject">Reject</a>"#
            )
        }
        (true, DetailStep::Reject) => format!(
            r#"<form method="post" action="/dashboard/events/{id}/reject">
<label for="remarks">Remarks</label>
<textarea id="remarks" name="remarks" required>{remarks}</textarea>
<button type="submit">Submit</button>
<a href="/dashboard/events/{id}">Back</a>
</form>"#,
            remarks = html_escape(remarks),
        ),
    };

    let body = format!(
        r#"<h1>Event Detail</h1>
{notice}
<table>
{fields}</table>
{actions}
<p><a href="/dashboard">Close</a></p>"#,
        notice = notice_html(notice),
    );
    layout("Event Detail", &signed_in_nav(), &body)
}

/// Standalone error page for failures with nothing else to show.
pub fn error_page(title: &str, message: &str) -> String {
    let body = format!(
        r#"<h1>{}</h1>
<p class="notice-error">{}</p>
<p><a href="/dashboard">Back to dashboard</a></p>"#,
        html_escape(title),
        html_escape(message)
    );
    layout(title, &signed_in_nav(), &body)
}
