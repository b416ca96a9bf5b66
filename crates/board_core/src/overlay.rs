/// Maximum length of a derived chat room name.
pub const CHAT_ROOM_MAX_LEN: usize = 10;

/// Chat room for a page title: ASCII letters only, lower-cased, truncated.
pub fn chat_room_name(title: &str) -> String {
    title
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .take(CHAT_ROOM_MAX_LEN)
        .collect()
}

/// Expanded view of one entity, requested by a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRequest {
    pub path: String,
    pub title: String,
    pub embed_html: String,
    pub chat_url: Option<String>,
}

impl OverlayRequest {
    /// `chat_base_url` is `Some` when chat is enabled. Titles without any
    /// letters get no chat room.
    pub fn new(
        path: impl Into<String>,
        title: impl Into<String>,
        embed_html: impl Into<String>,
        chat_base_url: Option<&str>,
    ) -> Self {
        let title = title.into();
        let chat_url = chat_base_url.and_then(|base| {
            let room = chat_room_name(&title);
            (!room.is_empty()).then(|| format!("{base}?chatRoom={room}"))
        });
        Self {
            path: path.into(),
            title,
            embed_html: embed_html.into(),
            chat_url,
        }
    }

    /// Markup for the lightbox. The embed markup comes from the enrichment
    /// source and is inserted as is.
    pub fn render_html(&self) -> String {
        let mut html = String::from("<div class='outer_frame'>");
        html.push_str(&self.embed_html);
        if let Some(chat_url) = &self.chat_url {
            html.push_str("<div class='chat_container'><iframe class='chat_frame' scrolling='no' src='");
            html.push_str(chat_url);
            html.push_str("'></iframe></div>");
        }
        html.push_str("</div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_name_strips_non_letters_and_truncates() {
        assert_eq!(chat_room_name("The Future of Work, 2030!"), "thefutureo");
        assert_eq!(chat_room_name("A b"), "ab");
        assert_eq!(chat_room_name("123 ..."), "");
    }

    #[test]
    fn chat_iframe_only_when_enabled() {
        let without = OverlayRequest::new("/a.html", "Big Talk", "<embed/>", None);
        assert_eq!(without.render_html(), "<div class='outer_frame'><embed/></div>");

        let with = OverlayRequest::new(
            "/a.html",
            "Big Talk",
            "<embed/>",
            Some("http://localhost:8001"),
        );
        assert_eq!(
            with.chat_url.as_deref(),
            Some("http://localhost:8001?chatRoom=bigtalk")
        );
        assert!(with
            .render_html()
            .contains("<iframe class='chat_frame' scrolling='no' src='http://localhost:8001?chatRoom=bigtalk'>"));
    }
}
