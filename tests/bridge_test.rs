use std::sync::Arc;
use std::time::Duration;

use quizbank::bridge::{store_bridge, Bridge, Request, Response};
use quizbank::database::question::QuestionDraft;
use tempfile::TempDir;

mod common;
use common::open_store;

async fn open_bridge() -> (TempDir, Bridge) {
    let (dir, store) = open_store().await;
    (dir, store_bridge(Arc::new(store)))
}

fn draft(question: &str, options: &[&str], answer: &str) -> QuestionDraft {
    QuestionDraft::new(
        question,
        options.iter().map(|o| o.to_string()).collect(),
        answer,
        None,
        None,
    )
}

#[tokio::test]
async fn category_actions_round_trip_through_the_bridge() {
    let (_dir, bridge) = open_bridge().await;

    let id = match bridge
        .invoke(Request::AddCategory {
            name: "Music".into(),
        })
        .await
        .unwrap()
    {
        Response::CategoryAdded(Some(id)) => id,
        other => panic!("unexpected response: {other:?}"),
    };

    // Same name again, different casing: the expected no-op, not an error.
    assert_eq!(
        bridge
            .invoke(Request::AddCategory {
                name: "MUSIC".into()
            })
            .await
            .unwrap(),
        Response::CategoryAdded(None)
    );

    match bridge.invoke(Request::GetCategories).await.unwrap() {
        Response::Categories(categories) => {
            assert_eq!(categories.len(), 1);
            assert_eq!(categories[0].id, id);
            assert_eq!(categories[0].name, "music");
        }
        other => panic!("unexpected response: {other:?}"),
    }

    assert_eq!(
        bridge.invoke(Request::DeleteCategory { id }).await.unwrap(),
        Response::CategoryDeleted(true)
    );
    assert_eq!(
        bridge.invoke(Request::DeleteCategory { id }).await.unwrap(),
        Response::CategoryDeleted(false)
    );
}

#[tokio::test]
async fn question_lifecycle_through_the_bridge() {
    let (_dir, bridge) = open_bridge().await;

    let id = match bridge
        .invoke(Request::AddQuestion {
            draft: draft("Capital of France?", &["Paris", "Rome", "Berlin"], "Paris"),
        })
        .await
        .unwrap()
    {
        Response::QuestionAdded(id) => id,
        other => panic!("unexpected response: {other:?}"),
    };

    match bridge.invoke(Request::GetQuestions).await.unwrap() {
        Response::Questions(questions) => {
            assert_eq!(questions.len(), 1);
            assert_eq!(questions[0].options, vec!["Paris", "Rome", "Berlin"]);
        }
        other => panic!("unexpected response: {other:?}"),
    }

    assert_eq!(
        bridge
            .invoke(Request::UpdateQuestion {
                id,
                draft: draft("Capital of Italy?", &["Paris", "Rome"], "Rome"),
            })
            .await
            .unwrap(),
        Response::QuestionUpdated(true)
    );

    match bridge.invoke(Request::GetRandomQuestion).await.unwrap() {
        Response::RandomQuestion(Some(question)) => {
            assert_eq!(question.id, id);
            assert_eq!(question.answer, "Rome");
        }
        other => panic!("unexpected response: {other:?}"),
    }

    assert_eq!(
        bridge.invoke(Request::DeleteQuestion { id }).await.unwrap(),
        Response::QuestionDeleted(true)
    );
    assert_eq!(
        bridge.invoke(Request::GetRandomQuestion).await.unwrap(),
        Response::RandomQuestion(None)
    );
}

#[tokio::test]
async fn send_runs_the_handler_without_a_response() {
    let (_dir, bridge) = open_bridge().await;

    bridge.send(Request::AddCategory {
        name: "geography".into(),
    });

    // Fire-and-forget: poll until the spawned handler has landed.
    for _ in 0..100 {
        if let Response::Categories(categories) =
            bridge.invoke(Request::GetCategories).await.unwrap()
        {
            if !categories.is_empty() {
                assert_eq!(categories[0].name, "geography");
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("send never reached the store");
}
