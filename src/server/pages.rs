use crate::models::Ticket;

pub const HEALTH_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Transcripts</title></head>
<body><h1>Transcripts</h1><p>The transcript server is running.</p></body>
</html>
"#;

pub const NOT_FOUND_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Transcript not found</title></head>
<body><h1>Transcript not found</h1><p>No transcript exists at this address.</p></body>
</html>
"#;

pub const ERROR_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Error</title></head>
<body><h1>Something went wrong</h1><p>The request could not be completed.</p></body>
</html>
"#;

const ADMIN_TIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Full HTML escaping for admin pages, which interpolate stored values into
/// attributes as well as text.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

pub fn login_page(error: Option<&str>) -> String {
    let error = error
        .map(|message| format!(r#"<p class="error">{}</p>"#, escape_html(message)))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Admin login</title></head>
<body>
<h1>Admin login</h1>
{error}
<form method="post" action="/admin/login">
<label>Username <input name="username" autocomplete="username"></label>
<label>Password <input name="password" type="password" autocomplete="current-password"></label>
<button type="submit">Log in</button>
</form>
</body>
</html>
"#
    )
}

pub fn listing_page(tickets: &[Ticket], creator_name: Option<&str>) -> String {
    let filter = escape_html(creator_name.unwrap_or_default());
    let rows: String = tickets.iter().map(listing_row).collect();
    let body = if tickets.is_empty() {
        r#"<p>No tickets found.</p>"#.to_string()
    } else {
        format!(
            r#"<table>
<thead><tr><th>Ticket</th><th>Topic</th><th>Creator</th><th>Closed by</th><th>Created</th><th>Closed</th></tr></thead>
<tbody>
{rows}</tbody>
</table>"#
        )
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Tickets</title></head>
<body>
<h1>Tickets</h1>
<form method="get" action="/admin">
<label>Creator <input name="creator_name" value="{filter}"></label>
<button type="submit">Search</button>
</form>
<form method="post" action="/admin/logout"><button type="submit">Log out</button></form>
{body}
</body>
</html>
"#
    )
}

fn listing_row(ticket: &Ticket) -> String {
    format!(
        r#"<tr><td><a href="{path}">#{short_id}</a></td><td>{topic}</td><td>{creator}</td><td>{closer}</td><td>{created}</td><td>{closed}</td></tr>
"#,
        path = escape_html(&ticket.view_path()),
        short_id = escape_html(ticket.short_id()),
        topic = escape_html(ticket.topic()),
        creator = escape_html(ticket.creator_name()),
        closer = escape_html(ticket.closed_by_name()),
        created = ticket.created_at().format(ADMIN_TIME_FORMAT),
        closed = ticket.closed_at().format(ADMIN_TIME_FORMAT),
    )
}
