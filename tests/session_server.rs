mod common;

use std::{sync::Arc, time::Duration};

use common::{correct_index, payload};
use futures_channel::mpsc::{unbounded, UnboundedReceiver};
use futures_util::StreamExt;
use quiz_engine_rust::{
    config::ServerConfig,
    handlers::{
        command_handler::{execute_authorized_command, execute_unauthorized_command},
        timeout_handler::handle_session_timeout,
    },
    models::communication::{CommandTokenPair, Response, SessionCommand, UnauthorizedCommand},
    registry::Lists,
    storage::result_store::{InMemoryResultStore, ResultStore},
};
use tungstenite::Message;

fn lists(time_limit_secs: u32) -> (Lists, Arc<InMemoryResultStore>) {
    let store = Arc::new(InMemoryResultStore::new());
    let config = ServerConfig {
        time_limit_secs,
        tick_interval: Duration::from_millis(10),
        idle_timeout: Duration::from_millis(20),
        ..ServerConfig::default()
    };
    (Lists::new(store.clone(), config), store)
}

fn connect(lists: &Lists, connection_id: &str) -> UnboundedReceiver<Message> {
    let (tx, rx) = unbounded();
    lists
        .peers
        .lock()
        .unwrap()
        .insert(connection_id.to_string(), tx);
    rx
}

async fn next_response(rx: &mut UnboundedReceiver<Message>) -> Response {
    let message = tokio::time::timeout(Duration::from_secs(5), rx.next())
        .await
        .expect("response arrives in time")
        .expect("channel open");
    serde_json::from_str(&message.to_string()).expect("valid response json")
}

fn start(lists: &Lists, connection_id: &str) {
    execute_unauthorized_command(
        UnauthorizedCommand::StartQuiz {
            topic: Some("Compass".to_string()),
            questions: payload(),
        },
        lists,
        connection_id,
    );
}

#[tokio::test]
async fn timer_counts_down_and_auto_submits() {
    let (lists, store) = lists(3);
    let mut rx = connect(&lists, "conn-1");
    start(&lists, "conn-1");

    let (token, session_id) = match next_response(&mut rx).await {
        Response::QuizStarted {
            token,
            session_id,
            total_questions,
            time_limit,
        } => {
            assert_eq!(total_questions, 10);
            assert_eq!(time_limit, 3);
            (token, session_id)
        }
        other => panic!("expected quizStarted, got {:?}", other),
    };
    assert!(matches!(
        next_response(&mut rx).await,
        Response::QuestionResponse { index: 0, .. }
    ));

    execute_authorized_command(
        CommandTokenPair {
            command: SessionCommand::SelectAnswer {
                question_index: 0,
                option_index: correct_index(0),
            },
            token: token.clone(),
        },
        &lists,
        "conn-1",
    );

    let mut timer_values = Vec::new();
    let analysis = loop {
        match next_response(&mut rx).await {
            Response::TimerResponse { remaining_seconds } => timer_values.push(remaining_seconds),
            Response::AnswerRecorded { .. } => (),
            Response::AnalysisResponse { analysis } => break analysis,
            other => panic!("unexpected response {:?}", other),
        }
    };

    assert_eq!(timer_values, vec![2, 1, 0]);
    assert_eq!(analysis.correct_count, 1);
    assert_eq!(analysis.topic, "Compass");
    assert_eq!(store.load(&session_id).unwrap(), Some(*analysis));
    assert!(lists.session_entry(&session_id).is_none());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_next().is_err(), "no frames after the analysis");
}

#[tokio::test]
async fn abandoned_session_is_dropped_after_idle_timeout() {
    let (lists, _) = lists(600);
    let mut rx = connect(&lists, "conn-1");
    start(&lists, "conn-1");

    let session_id = match next_response(&mut rx).await {
        Response::QuizStarted { session_id, .. } => session_id,
        other => panic!("expected quizStarted, got {:?}", other),
    };

    lists.peers.lock().unwrap().remove("conn-1");
    handle_session_timeout(lists.clone(), session_id.clone(), "conn-1".to_string()).await;

    assert!(lists.session_entry(&session_id).is_none());
}

#[tokio::test]
async fn resumed_session_survives_idle_timeout() {
    let (lists, _) = lists(600);
    let mut first = connect(&lists, "conn-1");
    start(&lists, "conn-1");

    let (token, session_id) = match next_response(&mut first).await {
        Response::QuizStarted {
            token, session_id, ..
        } => (token, session_id),
        other => panic!("expected quizStarted, got {:?}", other),
    };
    lists.peers.lock().unwrap().remove("conn-1");

    let mut second = connect(&lists, "conn-2");
    execute_authorized_command(
        CommandTokenPair {
            command: SessionCommand::Resume {},
            token,
        },
        &lists,
        "conn-2",
    );
    assert!(matches!(
        next_response(&mut second).await,
        Response::StateResponse { .. }
    ));

    handle_session_timeout(lists.clone(), session_id.clone(), "conn-1".to_string()).await;
    assert_eq!(
        lists.session_entry(&session_id).map(|entry| entry.connection_id),
        Some("conn-2".to_string())
    );
}
