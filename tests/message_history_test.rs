mod common;

use direct_chat_service::services::MessageService;

#[tokio::test]
async fn append_returns_the_stored_record() {
    let pool = common::test_pool().await;

    let message = MessageService::append(&pool, "alice", "bob", "hi").await.unwrap();

    assert_eq!(message.sender, "alice");
    assert_eq!(message.receiver, "bob");
    assert_eq!(message.body, "hi");
    assert!(!message.id.is_empty());
}

#[tokio::test]
async fn history_is_symmetric_in_the_pair() {
    let pool = common::test_pool().await;

    MessageService::append(&pool, "alice", "bob", "from alice").await.unwrap();
    MessageService::append(&pool, "bob", "alice", "from bob").await.unwrap();

    let forward = MessageService::history(&pool, "alice", "bob").await.unwrap();
    let reverse = MessageService::history(&pool, "bob", "alice").await.unwrap();

    assert_eq!(forward.len(), 2);
    assert_eq!(forward.len(), reverse.len());
    for (a, b) in forward.iter().zip(reverse.iter()) {
        assert_eq!(a.id, b.id);
    }
}

#[tokio::test]
async fn history_preserves_append_order() {
    let pool = common::test_pool().await;

    for i in 0..5 {
        let sender = if i % 2 == 0 { "alice" } else { "bob" };
        let receiver = if i % 2 == 0 { "bob" } else { "alice" };
        MessageService::append(&pool, sender, receiver, &format!("m{i}")).await.unwrap();
    }

    let history = MessageService::history(&pool, "alice", "bob").await.unwrap();
    let bodies: Vec<&str> = history.iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, vec!["m0", "m1", "m2", "m3", "m4"]);

    // created_at is non-decreasing in replay order.
    for pair in history.windows(2) {
        assert!(pair[0].created_at <= pair[1].created_at);
    }
}

#[tokio::test]
async fn history_never_leaks_other_pairs() {
    let pool = common::test_pool().await;

    MessageService::append(&pool, "alice", "bob", "for bob").await.unwrap();
    MessageService::append(&pool, "alice", "carol", "for carol").await.unwrap();
    MessageService::append(&pool, "carol", "bob", "between others").await.unwrap();

    let history = MessageService::history(&pool, "alice", "bob").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].body, "for bob");
}

#[tokio::test]
async fn history_of_unknown_pair_is_empty() {
    let pool = common::test_pool().await;

    let history = MessageService::history(&pool, "alice", "nobody").await.unwrap();
    assert!(history.is_empty());
}
