//! Integration tests for the analysis orchestrator against a mocked
//! chat-completion API.
//!
//! These tests pin the fan-out/fan-in barrier semantics: five concurrent
//! calls, one combined snapshot, individual failures downgraded to default
//! slots, and the empty-diary short-circuit that never touches the network.

use chrono::NaiveDate;
use mockito::{Matcher, Server, ServerGuard};
use riji::ai::parse::Emotion;
use riji::ai::ChatClient;
use riji::constants::{FALLBACK_FEEDBACK, WELCOME_MESSAGE};
use riji::db::entries::DiaryEntry;
use riji::ops::analyze;
use uuid::Uuid;

fn entry(date: &str, text: &str) -> DiaryEntry {
    DiaryEntry {
        id: Uuid::new_v4(),
        date: date.to_string(),
        text: text.to_string(),
        image: None,
    }
}

fn test_client(server: &ServerGuard) -> ChatClient {
    ChatClient::new(server.url(), Some("test-key".to_string()), "gpt-4", 5).unwrap()
}

fn reply_body(content: &str) -> String {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
    .to_string()
}

/// Mocks one sub-analysis endpoint, matched by a token unique to its prompt.
async fn mock_kind(server: &mut ServerGuard, prompt_token: &str, content: &str) -> mockito::Mock {
    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex(prompt_token.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(reply_body(content))
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn test_analyze_joins_all_five_sub_analyses() {
    let mut server = Server::new_async().await;

    let feedback = mock_kind(&mut server, "心理諮商師", "  最近辛苦了，繼續加油。").await;
    let happiness = mock_kind(
        &mut server,
        "快樂指數",
        "日期: 20250309, 快樂指數: 60\n日期: 20250310, 快樂指數: 80",
    )
    .await;
    let emotion = mock_kind(&mut server, "情緒比例", "快樂: 70%\n平靜: 30%").await;
    let top_words = mock_kind(&mut server, "前三個單字", "散步 3次\n公園 2次").await;
    let selection = mock_kind(&mut server, "情緒最正面", "20250310").await;

    let client = test_client(&server);
    let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let entries = vec![
        entry("20250309", "在公園散步"),
        entry("20250310", "又去散步，很放鬆"),
    ];

    let snapshot = analyze(&client, &entries, today).await;

    assert_eq!(snapshot.day, "20250310");
    assert_eq!(snapshot.feedback, "最近辛苦了，繼續加油。");

    assert_eq!(snapshot.happiness.len(), 2);
    assert_eq!(snapshot.happiness[0].date, "20250309");
    assert_eq!(snapshot.happiness[1].happiness, 80.0);

    assert_eq!(snapshot.emotions.len(), 2);
    assert_eq!(snapshot.emotions[0].emotion, Emotion::Happy);

    assert_eq!(snapshot.top_words.len(), 2);
    assert_eq!(snapshot.top_words[0].word, "散步");

    // The selection reply matched the second entry by exact date equality
    assert_eq!(snapshot.selected_entry_id, Some(entries[1].id));
    assert!(snapshot.complete);

    feedback.assert_async().await;
    happiness.assert_async().await;
    emotion.assert_async().await;
    top_words.assert_async().await;
    selection.assert_async().await;
}

#[tokio::test]
async fn test_analyze_partial_failure_still_completes() {
    let mut server = Server::new_async().await;

    // Feedback and selection fail; the other three succeed
    let feedback = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("心理諮商師".to_string()))
        .with_status(500)
        .with_body("internal error")
        .expect(1)
        .create_async()
        .await;
    let selection = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("情緒最正面".to_string()))
        .with_status(500)
        .with_body("internal error")
        .expect(1)
        .create_async()
        .await;

    let happiness = mock_kind(&mut server, "快樂指數", "日期: 20250310, 快樂指數: 42").await;
    let emotion = mock_kind(&mut server, "情緒比例", "悲傷: 100%").await;
    let top_words = mock_kind(&mut server, "前三個單字", "下雨 5次").await;

    let client = test_client(&server);
    let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let entries = vec![entry("20250310", "下雨天")];

    let snapshot = analyze(&client, &entries, today).await;

    // The three successful slots carry their values
    assert_eq!(snapshot.happiness.len(), 1);
    assert_eq!(snapshot.happiness[0].happiness, 42.0);
    assert_eq!(snapshot.emotions[0].emotion, Emotion::Sad);
    assert_eq!(snapshot.top_words[0].word, "下雨");

    // The two failed slots carry defaults, and the barrier still completed
    assert_eq!(snapshot.feedback, FALLBACK_FEEDBACK);
    assert_eq!(snapshot.selected_entry_id, None);
    assert!(!snapshot.complete);

    feedback.assert_async().await;
    selection.assert_async().await;
    happiness.assert_async().await;
    emotion.assert_async().await;
    top_words.assert_async().await;
}

#[tokio::test]
async fn test_analyze_empty_entries_issues_no_requests() {
    let mut server = Server::new_async().await;

    let any_call = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let client = test_client(&server);
    let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

    let snapshot = analyze(&client, &[], today).await;

    assert_eq!(snapshot.feedback, WELCOME_MESSAGE);
    assert!(snapshot.happiness.is_empty());
    assert!(snapshot.complete);

    any_call.assert_async().await;
}

#[tokio::test]
async fn test_analyze_unmatched_selection_date_yields_no_selection() {
    let mut server = Server::new_async().await;

    let _mocks = (
        mock_kind(&mut server, "心理諮商師", "不錯的一週。").await,
        mock_kind(&mut server, "快樂指數", "日期: 20250310, 快樂指數: 50").await,
        mock_kind(&mut server, "情緒比例", "平靜: 100%").await,
        mock_kind(&mut server, "前三個單字", "工作 4次").await,
        // The model picked a date no entry has
        mock_kind(&mut server, "情緒最正面", "19990101").await,
    );

    let client = test_client(&server);
    let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let entries = vec![entry("20250310", "上班")];

    let snapshot = analyze(&client, &entries, today).await;

    // No match is "no selection", not a failure
    assert_eq!(snapshot.selected_entry_id, None);
    assert!(snapshot.complete);
}

#[tokio::test]
async fn test_analyze_unparseable_replies_are_empty_success() {
    let mut server = Server::new_async().await;

    let _mocks = (
        mock_kind(&mut server, "心理諮商師", "加油！").await,
        mock_kind(&mut server, "快樂指數", "抱歉，我無法評分。").await,
        mock_kind(&mut server, "情緒比例", "大致上都很平靜呢").await,
        mock_kind(&mut server, "前三個單字", "這週的日記字數太少了").await,
        mock_kind(&mut server, "情緒最正面", "20250310").await,
    );

    let client = test_client(&server);
    let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let entries = vec![entry("20250310", "上班")];

    let snapshot = analyze(&client, &entries, today).await;

    // Zero parsed rows is still a successful call, distinct from failure
    assert!(snapshot.happiness.is_empty());
    assert!(snapshot.emotions.is_empty());
    assert!(snapshot.top_words.is_empty());
    assert!(snapshot.complete);
}
