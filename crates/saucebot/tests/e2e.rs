// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete bot pipeline.
//!
//! Each test creates an isolated TestHarness with mock chat, wiremock
//! search and image-board servers, and its own storage. Tests are
//! independent and order-insensitive.

use std::time::Duration;

use saucebot_agent::replies;
use saucebot_config::FavoriteCallback;
use saucebot_core::types::{BotCommand, TextFormat, UserId};
use saucebot_test_utils::{TestHarness, e621_match};

const USER: UserId = UserId(4242);

async fn link_account(harness: &TestHarness) {
    harness.mount_valid_credentials().await;
    harness
        .command(USER, BotCommand::SetUsername("fox_fan".into()))
        .await
        .unwrap();
    harness
        .command(USER, BotCommand::SetApiKey("secret-key".into()))
        .await
        .unwrap();
}

// ---- Scenario A: anonymous search ----

#[tokio::test]
async fn photo_without_credentials_gets_link_and_no_button() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .mount_search_results(serde_json::json!([e621_match("123", 3)]))
        .await;

    let photo = harness.send_photo(USER).await.unwrap();

    let reply = harness.chat.last_sent().unwrap();
    assert_eq!(reply.chat_id, TestHarness::chat_of(USER));
    assert_eq!(reply.reply_to, Some(photo.message_id));
    assert!(reply.text.starts_with("Woof woof! I found it :3"));
    assert!(reply.text.ends_with("/posts/123"));
    assert!(reply.keyboard.is_none());
    assert!(!harness.photo_path(&photo).exists());

    let memory = harness.memory.as_ref().unwrap();
    memory.wait_for_searches(1).await;
    assert_eq!(memory.searches()[0].0, Some(USER));
}

#[tokio::test]
async fn photo_with_no_match() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.mount_search_results(serde_json::json!([])).await;

    harness.send_photo(USER).await.unwrap();

    assert_eq!(harness.chat.last_sent().unwrap().text, replies::NO_MATCH);
}

// ---- Scenario B: linked account and favoriting ----

#[tokio::test]
async fn linked_account_can_favorite_a_match() {
    let harness = TestHarness::builder().build().await.unwrap();
    link_account(&harness).await;

    let sent = harness.chat.sent();
    assert_eq!(sent[0].text, replies::USERNAME_UNVERIFIED);
    assert_eq!(sent[1].text, replies::KEY_VALIDATED);

    harness.command(USER, BotCommand::DisplayInfo).await.unwrap();
    let info = harness.chat.last_sent().unwrap();
    assert_eq!(info.format, TextFormat::MarkdownV2);
    assert!(info.text.contains("*Username*: fox\\_fan"));
    assert!(info.text.contains("*API Key*: Verified ✅"));

    harness
        .mount_search_results(serde_json::json!([e621_match("555", 0)]))
        .await;
    harness.mount_add_favorite().await;
    harness.send_photo(USER).await.unwrap();

    let found = harness.chat.last_sent().unwrap();
    assert!(found.text.ends_with("/posts/555"));
    let keyboard = found.keyboard.expect("favorite button");
    assert_eq!(keyboard.rows[0][0].label, replies::FAVORITE_LABEL);
    assert_eq!(keyboard.rows[0][0].data, "addToFavorites:555");

    let target = harness.chat.last_sent_ref().unwrap();
    harness.press_button(USER, target).await.unwrap();

    let (edited, final_keyboard) = harness.chat.edits().pop().unwrap();
    assert_eq!(edited, target);
    assert_eq!(final_keyboard.unwrap().rows[0][0].label, "Added ✅");
    assert_eq!(harness.chat.answered().len(), 1);
}

#[tokio::test]
async fn linked_account_on_sqlite() {
    let harness = TestHarness::builder().with_sqlite().build().await.unwrap();
    link_account(&harness).await;

    harness
        .mount_search_results(serde_json::json!([e621_match("9", 1)]))
        .await;
    harness.send_photo(USER).await.unwrap();

    let found = harness.chat.last_sent().unwrap();
    assert!(found.keyboard.is_some());
}

#[tokio::test]
async fn session_mode_button_uses_last_search() {
    let harness = TestHarness::builder()
        .with_favorite_callback(FavoriteCallback::Session)
        .build()
        .await
        .unwrap();
    link_account(&harness).await;
    harness
        .mount_search_results(serde_json::json!([e621_match("31", 2)]))
        .await;
    harness.mount_add_favorite().await;

    harness.send_photo(USER).await.unwrap();
    let found = harness.chat.last_sent().unwrap();
    assert_eq!(found.keyboard.unwrap().rows[0][0].data, "addToFavorites");

    let target = harness.chat.last_sent_ref().unwrap();
    harness.press_button(USER, target).await.unwrap();
    let (_, final_keyboard) = harness.chat.edits().pop().unwrap();
    assert_eq!(final_keyboard.unwrap().rows[0][0].label, "Added ✅");
}

// ---- Scenario C: search timeout ----

#[tokio::test]
async fn search_timeout_reports_failure_and_cleans_up() {
    let harness = TestHarness::builder()
        .with_search_timeout(1)
        .build()
        .await
        .unwrap();
    harness.mount_slow_search(Duration::from_secs(3)).await;

    let photo = harness.send_photo(USER).await.unwrap();

    let reply = harness.chat.last_sent().unwrap();
    assert_eq!(reply.text, replies::SEARCH_FAILED);
    assert_eq!(reply.reply_to, Some(photo.message_id));
    assert!(!harness.photo_path(&photo).exists());
}

// ---- Scenario D: deleting missing info ----

#[tokio::test]
async fn delete_without_record_then_display() {
    let harness = TestHarness::builder().build().await.unwrap();

    harness.command(USER, BotCommand::DeleteInfo).await.unwrap();
    assert_eq!(harness.chat.last_sent().unwrap().text, "All done :3");

    harness.command(USER, BotCommand::DisplayInfo).await.unwrap();
    assert!(
        harness
            .chat
            .last_sent()
            .unwrap()
            .text
            .starts_with("No information found!")
    );
}

#[tokio::test]
async fn delete_forgets_linked_account() {
    let harness = TestHarness::builder().with_sqlite().build().await.unwrap();
    link_account(&harness).await;

    harness.command(USER, BotCommand::DeleteInfo).await.unwrap();
    harness.command(USER, BotCommand::DisplayInfo).await.unwrap();
    assert_eq!(harness.chat.last_sent().unwrap().text, replies::NO_INFO);
}

// ---- Error reports ----

#[tokio::test]
async fn submitted_error_reaches_admin_and_log() {
    let harness = TestHarness::builder()
        .with_admin_chat(-100)
        .build()
        .await
        .unwrap();

    harness
        .command(USER, BotCommand::SubmitError("no results for my pic".into()))
        .await
        .unwrap();

    let sent = harness.chat.sent();
    assert!(sent.iter().any(|m| m.chat_id.0 == -100));
    assert_eq!(sent.last().unwrap().text, replies::ERROR_SUBMITTED);

    let memory = harness.memory.as_ref().unwrap();
    memory.wait_for_error_reports(1).await;
    assert_eq!(memory.error_reports()[0].description, "no results for my pic");
}
