//! Dispatcher behaviour end to end: what each chat receives for each kind of message.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use common::{document_message, text_message, video_message, Harness, MockGenerator, MockStorage};
use video_relay_bot::{Disposition, MSG_FAILED, MSG_PROCESSING, MSG_SEND_VIDEO};

/// **Test: A text message gets exactly one prompt and never reaches the pipeline.**
#[tokio::test]
async fn test_text_message_asks_for_video() {
    let harness = Harness::default_mocks();

    let disposition = harness.dispatcher.handle(&text_message(1, "hello")).await;

    assert_eq!(disposition, Disposition::NotAVideo);
    assert_eq!(harness.bot.sent_to(1), vec![MSG_SEND_VIDEO.to_string()]);
    assert_eq!(harness.bot.resolve_calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.storage.calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.generator.total_calls(), 0);
}

/// **Test: A non-video document is treated like text.**
#[tokio::test]
async fn test_image_document_is_not_a_video() {
    let harness = Harness::default_mocks();

    let disposition = harness
        .dispatcher
        .handle(&document_message(2, "doc1", "image/png"))
        .await;

    assert_eq!(disposition, Disposition::NotAVideo);
    assert_eq!(harness.bot.sent_to(2), vec![MSG_SEND_VIDEO.to_string()]);
    assert_eq!(harness.bot.resolve_calls.load(Ordering::SeqCst), 0);
}

/// **Test: A video sent as a document is processed.**
#[tokio::test]
async fn test_video_document_is_processed() {
    let mut server = mockito::Server::new_async().await;
    let harness = Harness::default_mocks();
    harness.serve_file(&mut server, "doc2", b"mov-bytes").await;

    let disposition = harness
        .dispatcher
        .handle(&document_message(3, "doc2", "video/quicktime"))
        .await;

    assert_eq!(disposition, Disposition::Completed);
    let sent = harness.bot.sent_to(3);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], MSG_PROCESSING);
}

/// **Test: Successful run sends the ack, then one result with video link, caption and thumbnail.**
#[tokio::test]
async fn test_video_success_sends_ack_then_result() {
    let mut server = mockito::Server::new_async().await;
    let harness = Harness::default_mocks();
    harness.serve_file(&mut server, "vid1", b"bytes").await;

    let disposition = harness
        .dispatcher
        .handle(&video_message(10, "vid1", "promote my bakery"))
        .await;

    assert_eq!(disposition, Disposition::Completed);
    let sent = harness.bot.sent_to(10);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], MSG_PROCESSING);
    let result = &sent[1];
    assert!(result.contains("https://storage.example.com/video_"));
    assert!(result.contains("All about promote my bakery"));
    assert!(result.contains("#bakery"));
    assert!(result.contains("https://img.example.com/promote-my-bakery.png"));
    assert!(harness
        .generator
        .prompts()
        .iter()
        .all(|p| p == "promote my bakery"));
}

/// **Test: Any pipeline failure yields the ack followed by the generic failure notice.**
#[tokio::test]
async fn test_upload_failure_sends_failure_notice() {
    let mut server = mockito::Server::new_async().await;
    let harness = Harness::new(MockStorage::failing(), MockGenerator::default(), 4);
    harness.serve_file(&mut server, "vid1", b"bytes").await;

    let disposition = harness.dispatcher.handle(&video_message(11, "vid1", "x")).await;

    assert_eq!(disposition, Disposition::Failed);
    assert_eq!(
        harness.bot.sent_to(11),
        vec![MSG_PROCESSING.to_string(), MSG_FAILED.to_string()]
    );
    assert_eq!(harness.generator.total_calls(), 0);
}

/// **Test: Unresolvable file still gets exactly one final reply.**
#[tokio::test]
async fn test_resolution_failure_sends_failure_notice() {
    let harness = Harness::default_mocks();

    let disposition = harness
        .dispatcher
        .handle(&video_message(12, "unknown", "x"))
        .await;

    assert_eq!(disposition, Disposition::Failed);
    assert_eq!(
        harness.bot.sent_to(12),
        vec![MSG_PROCESSING.to_string(), MSG_FAILED.to_string()]
    );
}

/// **Test: A panic inside the run is reported to the user as a failure.**
#[tokio::test]
async fn test_panicking_run_sends_failure_notice() {
    let mut server = mockito::Server::new_async().await;
    let harness = Harness::new(MockStorage::default(), MockGenerator::panicking_on("explode"), 4);
    harness.serve_file(&mut server, "vid1", b"bytes").await;

    let disposition = harness
        .dispatcher
        .handle(&video_message(13, "vid1", "explode"))
        .await;

    assert_eq!(disposition, Disposition::Failed);
    assert_eq!(
        harness.bot.sent_to(13),
        vec![MSG_PROCESSING.to_string(), MSG_FAILED.to_string()]
    );

    // The dispatcher keeps working afterwards.
    harness.serve_file(&mut server, "vid2", b"bytes").await;
    let next = harness
        .dispatcher
        .handle(&video_message(14, "vid2", "calm"))
        .await;
    assert_eq!(next, Disposition::Completed);
}

/// **Test: Two chats processed at the same time each get only their own result.**
#[tokio::test]
async fn test_concurrent_chats_do_not_interfere() {
    let mut server = mockito::Server::new_async().await;
    let harness = Harness::new(
        MockStorage::slow(Duration::from_millis(30)),
        MockGenerator::default(),
        4,
    );
    harness.serve_file(&mut server, "cat_vid", b"cat-bytes").await;
    harness.serve_file(&mut server, "dog_vid", b"dog-bytes").await;

    let cats = video_message(100, "cat_vid", "cats");
    let dogs = video_message(200, "dog_vid", "playful dogs");
    let (a, b) = tokio::join!(
        harness.dispatcher.handle(&cats),
        harness.dispatcher.handle(&dogs),
    );

    assert_eq!(a, Disposition::Completed);
    assert_eq!(b, Disposition::Completed);
    assert_eq!(harness.storage.max_in_flight.load(Ordering::SeqCst), 2);

    let cat_replies = harness.bot.sent_to(100);
    let dog_replies = harness.bot.sent_to(200);
    assert_eq!(cat_replies.len(), 2);
    assert_eq!(dog_replies.len(), 2);

    assert!(cat_replies[1].contains("All about cats"));
    assert!(cat_replies[1].contains("https://img.example.com/cats.png"));
    assert!(!cat_replies[1].contains("dogs"));

    assert!(dog_replies[1].contains("All about playful dogs"));
    assert!(dog_replies[1].contains("https://img.example.com/playful-dogs.png"));
    assert!(!dog_replies[1].contains("cats"));

    let cat_url = cat_replies[1]
        .lines()
        .find(|l| l.starts_with("📺 Video:"))
        .map(str::to_string);
    let dog_url = dog_replies[1]
        .lines()
        .find(|l| l.starts_with("📺 Video:"))
        .map(str::to_string);
    assert!(cat_url.is_some());
    assert_ne!(cat_url, dog_url);

    let mut uploaded: Vec<Vec<u8>> = harness.storage.uploads().into_iter().map(|(_, b)| b).collect();
    uploaded.sort();
    assert_eq!(uploaded, vec![b"cat-bytes".to_vec(), b"dog-bytes".to_vec()]);
}

/// **Test: With one permit, runs never overlap but every chat still gets its reply.**
#[tokio::test]
async fn test_concurrency_limit_is_respected() {
    let mut server = mockito::Server::new_async().await;
    let harness = Harness::new(
        MockStorage::slow(Duration::from_millis(20)),
        MockGenerator::default(),
        1,
    );
    harness.serve_file(&mut server, "a", b"a").await;
    harness.serve_file(&mut server, "b", b"b").await;
    harness.serve_file(&mut server, "c", b"c").await;

    let (ma, mb, mc) = (
        video_message(1, "a", "one"),
        video_message(2, "b", "two"),
        video_message(3, "c", "three"),
    );
    let (a, b, c) = tokio::join!(
        harness.dispatcher.handle(&ma),
        harness.dispatcher.handle(&mb),
        harness.dispatcher.handle(&mc),
    );

    assert_eq!([a, b, c], [Disposition::Completed; 3]);
    assert_eq!(harness.storage.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(harness.storage.calls.load(Ordering::SeqCst), 3);
    for chat in 1..=3 {
        let sent = harness.bot.sent_to(chat);
        assert_eq!(sent.len(), 2, "chat {}", chat);
        assert_eq!(sent[0], MSG_PROCESSING);
    }
}

/// **Test: A completed run whose result cannot be delivered still ends with a failure notice.**
#[tokio::test]
async fn test_undeliverable_result_sends_failure_notice() {
    let mut server = mockito::Server::new_async().await;
    let harness = Harness::default_mocks();
    harness.serve_file(&mut server, "vid1", b"bytes").await;
    harness.bot.fail_sends_containing("✨ Your video has been processed!");

    let disposition = harness
        .dispatcher
        .handle(&video_message(15, "vid1", "cats"))
        .await;

    assert_eq!(disposition, Disposition::Failed);
    assert_eq!(harness.storage.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        harness.bot.sent_to(15),
        vec![MSG_PROCESSING.to_string(), MSG_FAILED.to_string()]
    );
}
