//! Plain-text render surface.

use pollchat_client::Render;

/// Prints chat lines as `author: text` and system lines as `* text`.
pub struct TerminalRender;

impl Render for TerminalRender {
    fn render_message(&self, author: Option<&str>, text: &str) {
        let text = unescape(text);
        match author {
            Some(author) => println!("{}: {}", unescape(author), text),
            None => println!("* {}", text),
        }
    }
}

/// Undo the markup escaping applied before the render boundary.
fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}
