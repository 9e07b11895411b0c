//! HTML fragments for usernames in the activity lists.

use activity24_core::UserSession;

/// Whether the username links to the member profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameMode {
    Full,
    NoProfile,
}

/// Where profile links point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileLinks {
    /// The user id is appended to this.
    pub base_url: String,
}

impl Default for ProfileLinks {
    fn default() -> Self {
        Self {
            base_url: "./memberlist.php?mode=viewprofile&amp;u=".to_string(),
        }
    }
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Only 3 or 6 hex digits make it into a style attribute.
fn valid_colour(colour: &str) -> Option<&str> {
    let colour = colour.trim_start_matches('#');
    let ok = matches!(colour.len(), 3 | 6) && colour.chars().all(|c| c.is_ascii_hexdigit());
    ok.then_some(colour)
}

/// Render a username. `emphasize` wraps the name in `<em>`, which marks a
/// hidden user revealed to a privileged viewer.
pub fn username_string(mode: UsernameMode, user: &UserSession, emphasize: bool, links: &ProfileLinks) -> String {
    let name = escape_html(&user.username);
    let name = if emphasize { format!("<em>{name}</em>") } else { name };

    let (style, class) = match valid_colour(&user.user_colour) {
        Some(colour) => (format!(" style=\"color: #{colour};\""), "username-coloured"),
        None => (String::new(), "username"),
    };

    match mode {
        UsernameMode::Full => format!(
            "<a href=\"{}{}\"{style} class=\"{class}\">{name}</a>",
            links.base_url, user.user_id
        ),
        UsernameMode::NoProfile => format!("<span{style} class=\"{class}\">{name}</span>"),
    }
}

/// Wrap a rendered username in a span whose tooltip is the last-active time.
pub fn with_hover(title: &str, inner: &str) -> String {
    format!("<span title=\"{}\">{inner}</span>", escape_html(title))
}
