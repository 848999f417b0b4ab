// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Every user-facing string the bot sends.

use saucebot_core::ValidationErrorKind;
use saucebot_core::types::Keyboard;
use saucebot_e621::{Post, TagCount};

use crate::markdown;

pub const WELCOME: &str = "Woof, hi there! :3\n\n\
Send me a picture and I'll sniff out where it lives on e621.\n\n\
Want to save what I find straight to your e621 favorites? \
Link your account with /sete621username and /sete621key.";

// Photo pipeline.
pub const DOWNLOAD_FAILED: &str = "Oof :c I had an issue processing that image. Please try again!";
pub const SEARCH_FAILED: &str = "Erf ;-; I broke while looking for that image. Please try again! \
If things really stop working submit an error with /submiterror [description]";
pub const NO_MATCH: &str = "I couldn't find it ;c";
pub const RETRY_USAGE: &str = "Reply to a photo with /retry and I'll look for it again.";

pub fn found(link: &str) -> String {
    format!("Woof woof! I found it :3 {link}")
}

// Favorite button.
pub const FAVORITE_ACTION: &str = "addToFavorites";
pub const FAVORITE_LABEL: &str = "Add to e621 favorites";
pub const PROCESSING_LABEL: &str = "Hot >:3 Adding...";
pub const PROCESSING_DATA: &str = "processingAdd";
pub const DONE_DATA: &str = "favAdded";
pub const ADDED_LABEL: &str = "Added ✅";
pub const ALREADY_LABEL: &str = "Already in your favs ;3";
pub const INCOMPLETE_LABEL: &str = "Can't add :/ Incomplete e621 info";
pub const FAILED_LABEL: &str = "Something went wrong :/ make sure your info is set up correctly";
pub const EXPIRED_LABEL: &str = "Search expired :c send the pic again";

pub fn favorite_keyboard(data: String) -> Keyboard {
    Keyboard::single(FAVORITE_LABEL, data)
}

pub fn processing_keyboard() -> Keyboard {
    Keyboard::single(PROCESSING_LABEL, PROCESSING_DATA)
}

/// Final state of a favorite button. Pressing it again does nothing.
pub fn outcome_keyboard(label: &str) -> Keyboard {
    Keyboard::single(label, DONE_DATA)
}

pub fn incomplete_instructions(missing_username: bool, missing_key: bool) -> String {
    let mut text =
        String::from("Wanna start saving things to your e621 favs? Update the following info:\n");
    if missing_username {
        text.push_str("\nUsername missing ;c add it with /sete621username");
    }
    if missing_key {
        text.push_str("\ne621 API Key missing ;c add it with /sete621key");
    }
    text
}

pub fn validation_error(kind: ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::IncompleteInfo => {
            "Your info is incomplete! Please finish setting it up n try again :3"
        }
        ValidationErrorKind::InvalidInfo => {
            "Your info is bunk ;c please check its accuracy and try again."
        }
        ValidationErrorKind::Unknown => {
            "Something isn't right :o I dunno what's wrong but check all your stuff n try again!"
        }
    }
}

// Credential commands.
pub const USERNAME_USAGE: &str = "Tell me your username too! Usage: /sete621username <username>";
pub const KEY_USAGE: &str = "Tell me your API key too! Usage: /sete621key <api key>";
pub const USERNAME_UNVERIFIED: &str = "Username set, but I'm unable to verify it as there is no \
API Key set :/ Please set it with /sete621key.";
pub const KEY_UNVERIFIED: &str = "API Key set, but I'm unable to verify it as there is no \
username set :o Please set it with /sete621username.";
pub const USERNAME_VALIDATED: &str = "🎉 Username set and validated ✅";
pub const KEY_VALIDATED: &str = "🎉 API Key set and validated ✅";
pub const DELETED: &str = "All done :3";
pub const NO_INFO: &str =
    "No information found! Add your account info with /sete621key and /sete621username";

/// MarkdownV2 summary for `/displaye621information`.
pub fn display_info(username: Option<&str>, key_set: bool, valid: bool) -> String {
    let username = match username {
        Some(name) => markdown::escape(name),
        None => markdown::escape("Not found :c Set it with /sete621username"),
    };
    let key = if valid {
        "Verified ✅".to_string()
    } else if key_set {
        markdown::escape("Broken ❌ Check your username and API Key and try again ^^")
    } else {
        markdown::escape("Not set ;c Set it with /sete621key")
    };
    format!(
        "Bark\\! :3 Here's your currently set info for *e621*:\n\n*Username*: {username}\n*API Key*: {key}"
    )
}

// Favorites analysis.
pub const DEFAULT_TOP_COUNT: usize = 10;
pub const MAX_TOP_COUNT: usize = 100;
pub const ANALYZE_SYNTAX: &str = "Bark\\! Sorry, that's not the correct syntax\\. The correct \
syntax here is the command followed by the result length and tags you'd like filtered from the \
results: /analyzee621favs \\[list length\\] \\[filter tags\\]\n\nThe following example returns \
your top 10 e621 tags, not including the following tags: anthro, dialogue:\n\n\
`/analyzee621favs 10 anthro dialogue`";
pub const ANALYZE_FAILED: &str = "Erf, I couldn't read your favorites ;c Please try again!";
pub const NO_FAVORITES: &str = "You don't have any favorites for me to look at yet ;c";

/// MarkdownV2 message with the ranked tags in a code block.
pub fn analysis(count: usize, tags: &[TagCount]) -> String {
    format!(
        "Here are your ✨ Top {count} ✨ e621 tags:\n\n{}",
        markdown::code_block(&render_table(tags))
    )
}

/// Two centred columns, `Tag` and `Count`, boxed with line-drawing characters.
pub fn render_table(tags: &[TagCount]) -> String {
    let rows: Vec<(String, String)> = tags
        .iter()
        .map(|t| (t.tag.clone(), t.count.to_string()))
        .collect();
    let tag_width = rows
        .iter()
        .map(|(tag, _)| tag.chars().count())
        .chain(std::iter::once(3))
        .max()
        .unwrap_or(3);
    let count_width = rows
        .iter()
        .map(|(_, count)| count.len())
        .chain(std::iter::once(5))
        .max()
        .unwrap_or(5);

    let rule = |left: char, fill: char, mid: char, right: char| {
        format!(
            "{left}{}{mid}{}{right}\n",
            fill.to_string().repeat(tag_width + 2),
            fill.to_string().repeat(count_width + 2)
        )
    };
    let line = |tag: &str, count: &str| {
        format!(
            "║ {} │ {} ║\n",
            center(tag, tag_width),
            center(count, count_width)
        )
    };

    let mut out = rule('╔', '═', '╤', '╗');
    out.push_str(&line("Tag", "Count"));
    out.push_str(&rule('╟', '─', '┼', '╢'));
    for (tag, count) in &rows {
        out.push_str(&line(tag, count));
    }
    out.push_str(&rule('╚', '═', '╧', '╝'));
    out
}

fn center(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.chars().count());
    let left = pad / 2;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(pad - left))
}

// Post lookup.
pub const GET_POST_USAGE: &str = "Usage: /getPost <post id>";
pub const GET_POST_FAILED: &str = "I couldn't fetch that post ;c";

pub fn post_summary(link: &str, post: &Post) -> String {
    let score = post
        .score
        .map(|s| format!("{} (+{} / {})", s.total, s.up, s.down))
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "{link}\nRating: {}\nScore: {score}\nDeleted: {}",
        post.rating_label(),
        if post.is_deleted() { "yes" } else { "no" }
    )
}

// Error reports.
pub const SUBMIT_USAGE: &str =
    "Tell me what went wrong and I'll pass it on: /submiterror [description]";
pub const ERROR_SUBMITTED: &str = "Error submitted. Thank you! :3";

pub fn admin_notice(first_name: &str, username: Option<&str>, description: &str) -> String {
    let handle = username.map(|u| format!(" (@{u})")).unwrap_or_default();
    format!("Bark! New error submitted by {first_name}{handle}\n\n{description}")
}
