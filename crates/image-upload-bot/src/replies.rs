//! Reply composer
//!
//! Every text the bot sends lives here. All texts are HTML except the
//! hosted URL, which is sent verbatim.

use image_upload_types::{
    InlineKeyboardButton, InlineKeyboardMarkup, Rejection, Reply, Sender, UploadError,
};

/// Where the bot's source code lives
pub const REPO_URL: &str = "https://github.com/samuelmarc/ImageUploaderBot";

pub fn welcome() -> Reply {
    Reply::text(
        "🤖 <b><i>Thanks for adding me to your group, if you need help check the \
         <code>/help</code> command.</i></b>",
    )
}

pub fn start(sender: Option<&Sender>, bot_username: &str) -> Reply {
    let greeting = match sender {
        Some(sender) => format!(
            "<a href=\"tg://user?id={}\">{}</a>",
            sender.id,
            escape_html(&sender.first_name)
        ),
        None => "there".to_string(),
    };

    let text = format!(
        "👋 Hello {} I'm a bot that can <b>turn your images into links</b>, \
         <b>maximum 10 MB</b> (<i>so that the telegram preview works</i>) \
         I also support groups.\n\n<i>Created By @samuel_ks</i>",
        greeting
    );

    Reply::text(text).with_keyboard(InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::url(
            "➕ Add me to a group",
            format!("https://t.me/{}?startgroup", bot_username),
        ),
    ]]))
}

pub fn help() -> Reply {
    Reply::text(
        "<b>Need Help?</b>\n\n<i>It's simple to use me, in private, just send me a photo or \
         photo file and I'll get back to you with your link.\n\nUsing me in groups is very \
         simple too, reply to a message that contains an image or image file with the command \
         \"<code>/link</code>\" and I will return your link.</i>",
    )
}

pub fn repo() -> Reply {
    Reply::text(REPO_URL)
}

/// `/link` in a group that does not reply to anything
pub fn link_usage() -> Reply {
    Reply::quoted(
        "<b>Reply to a message that contains an image with</b> <code>/link</code> \
         <b>to get its link.</b>",
    )
}

pub fn rejected(reason: Rejection) -> Reply {
    match reason {
        Rejection::UnsupportedType => Reply::quoted("<b>This file type is not supported.</b>"),
        Rejection::TooLarge => Reply::quoted(
            "<b>The file size exceeds 10MB</b> (<i>understand that this is necessary for the \
             Telegram preview to be preserved</i>).",
        ),
    }
}

/// The hosted URL, nothing else
pub fn uploaded(url: &str) -> Reply {
    Reply::verbatim_quoted(url)
}

pub fn upload_failed(error: &UploadError) -> Reply {
    Reply::quoted(format!(
        "<b>An error has occurred and your image cannot be uploaded:</b>\n\n\
         <tg-spoiler><code>{}</code></tg-spoiler>",
        escape_html(&error.message)
    ))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uploaded_is_exactly_the_url() {
        let reply = uploaded("https://iili.io/abc.png?x=1&y=2");
        assert_eq!(reply.text, "https://iili.io/abc.png?x=1&y=2");
        assert!(!reply.html);
        assert!(reply.quote);
        assert!(reply.keyboard.is_none());
    }

    #[test]
    fn test_upload_failed_embeds_message() {
        let reply = upload_failed(&UploadError::new("quota exceeded"));
        assert!(reply.text.contains("<code>quota exceeded</code>"));
        assert!(reply.text.contains("cannot be uploaded"));
        assert!(reply.html);
        assert!(reply.quote);
    }

    #[test]
    fn test_upload_failed_escapes_markup() {
        let reply = upload_failed(&UploadError::new("<b>bad</b> & worse"));
        assert!(reply.text.contains("&lt;b&gt;bad&lt;/b&gt; &amp; worse"));
    }

    #[test]
    fn test_rejection_texts() {
        assert!(rejected(Rejection::UnsupportedType)
            .text
            .contains("This file type is not supported."));
        assert!(rejected(Rejection::TooLarge).text.contains("exceeds 10MB"));
        assert!(rejected(Rejection::TooLarge).quote);
    }

    #[test]
    fn test_start_has_add_to_group_button() {
        let sender = Sender {
            id: 42,
            first_name: "Ana <3".into(),
        };
        let reply = start(Some(&sender), "imgbot");

        assert!(reply.text.contains("<a href=\"tg://user?id=42\">Ana &lt;3</a>"));
        let keyboard = reply.keyboard.unwrap();
        let button = &keyboard.inline_keyboard[0][0];
        assert_eq!(button.text, "➕ Add me to a group");
        assert_eq!(button.url, "https://t.me/imgbot?startgroup");
    }

    #[test]
    fn test_start_without_sender() {
        let reply = start(None, "imgbot");
        assert!(reply.text.starts_with("👋 Hello there"));
        assert!(reply.text.ends_with("<i>Created By @samuel_ks</i>"));
    }

    #[test]
    fn test_static_replies() {
        assert!(welcome().text.contains("/help"));
        assert!(help().text.contains("/link"));
        assert_eq!(repo().text, REPO_URL);
        assert!(link_usage().text.contains("/link"));
    }
}
