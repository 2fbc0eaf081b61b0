use std::{
    fs,
    path::{Component, Path, PathBuf},
    sync::{Arc, Mutex},
};

use log::{info, warn};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    handlers::session_handler::{finish_session, handle_session_timer},
    helpers::question_set_from_payload,
    jwtoken::{decode_token, generate_token, TokenError},
    models::{
        communication::{CommandTokenPair, Response, SessionCommand, UnauthorizedCommand},
        quiz::{QuestionPack, QuestionSet},
    },
    quiz::{
        error::{SessionError, ValidationError},
        session::{QuizSession, SessionStatus},
    },
    registry::{Lists, SessionEntry},
    server_messages::{send_error, send_message},
    storage::result_store::StoreError,
};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Unknown question pack: {0}")]
    UnknownPack(String),

    #[error("Question pack is not valid JSON: {0}")]
    PackFormat(#[from] serde_json::Error),

    #[error("Session {0} does not exist")]
    SessionNotFound(String),

    #[error("No result stored for session {0}")]
    ResultNotFound(String),

    #[error("Session state is unavailable")]
    Poisoned,
}

pub fn execute_unauthorized_command(command: UnauthorizedCommand, lists: &Lists, connection_id: &str) {
    let outcome = match command {
        UnauthorizedCommand::StartQuiz { topic, questions } => {
            info!("Start quiz request from: {}", connection_id);
            question_set_from_payload(topic, &questions)
                .map_err(CommandError::from)
                .and_then(|question_set| start_quiz(question_set, lists, connection_id))
        }
        UnauthorizedCommand::StartQuizFromPack { pack_name } => {
            info!("Start quiz from pack {} request from: {}", &pack_name, connection_id);
            load_pack(Path::new(&lists.config.pack_dir), &pack_name)
                .and_then(|question_set| start_quiz(question_set, lists, connection_id))
        }
    };

    if let Err(error) = outcome {
        warn!("Could not start quiz for {}: {}", connection_id, error);
        send_error(error.to_string(), &lists.peers, connection_id);
    }
}

pub fn execute_authorized_command(pair: CommandTokenPair, lists: &Lists, connection_id: &str) {
    if let Err(error) = execute_session_command(pair, lists, connection_id) {
        warn!("Command from {} failed: {}", connection_id, error);
        send_error(error.to_string(), &lists.peers, connection_id);
    }
}

fn execute_session_command(
    pair: CommandTokenPair,
    lists: &Lists,
    connection_id: &str,
) -> Result<(), CommandError> {
    let claims = decode_token(&pair.token, &lists.config.token_secret)?.claims;
    let session_id = claims.session_id;

    if let SessionCommand::GetResult {} = pair.command {
        let analysis = lists
            .store
            .load(&session_id)?
            .ok_or_else(|| CommandError::ResultNotFound(session_id.clone()))?;
        let response = Response::AnalysisResponse {
            analysis: Box::new(analysis),
        };
        send_message(&response, &lists.peers, connection_id);
        return Ok(());
    }

    let entry = live_session(&session_id, operation_name(&pair.command), lists)?;
    if let SessionCommand::Resume {} = pair.command {
        rebind_session(&session_id, lists, connection_id)?;
        info!("Session {} resumed on {}", &session_id, connection_id);
    }
    let mut session = entry.session.lock().map_err(|_| CommandError::Poisoned)?;

    match pair.command {
        SessionCommand::SelectAnswer {
            question_index,
            option_index,
        } => {
            session.select_answer(question_index, option_index)?;
            let response = Response::AnswerRecorded {
                question_index,
                option_index,
                answered_count: session.answers().len(),
            };
            send_message(&response, &lists.peers, connection_id);
        }
        SessionCommand::Next {} => {
            session.next()?;
            send_question(&session, lists, connection_id);
        }
        SessionCommand::Previous {} => {
            session.previous()?;
            send_question(&session, lists, connection_id);
        }
        SessionCommand::GoTo { question_index } => {
            session.go_to(question_index)?;
            send_question(&session, lists, connection_id);
        }
        SessionCommand::GetState {} | SessionCommand::Resume {} => {
            send_message(&state_response(&session), &lists.peers, connection_id);
            send_question(&session, lists, connection_id);
        }
        SessionCommand::Submit {} => {
            let analysis = session.submit()?;
            drop(session);
            info!("Session {} submitted by {}", &session_id, connection_id);
            finish_session(lists, &session_id, connection_id, analysis);
        }
        SessionCommand::GetResult {} => (),
    }

    Ok(())
}

fn start_quiz(
    question_set: QuestionSet,
    lists: &Lists,
    connection_id: &str,
) -> Result<(), CommandError> {
    let session_id = Uuid::new_v4().to_string();
    let mut session = QuizSession::with_time_limit(lists.config.time_limit_secs);
    session.start(question_set)?;

    let token = generate_token(
        &session_id,
        &lists.config.token_secret,
        lists.config.token_ttl_hours,
    )?;

    let started = Response::QuizStarted {
        token,
        session_id: session_id.clone(),
        total_questions: session.question_count(),
        time_limit: session.time_limit(),
    };
    let first_question = question_response(&session);

    lists
        .sessions
        .lock()
        .map_err(|_| CommandError::Poisoned)?
        .insert(
            session_id.clone(),
            SessionEntry {
                session: Arc::new(Mutex::new(session)),
                connection_id: connection_id.to_string(),
            },
        );

    send_message(&started, &lists.peers, connection_id);
    if let Some(first_question) = first_question {
        send_message(&first_question, &lists.peers, connection_id);
    }

    tokio::spawn(handle_session_timer(lists.clone(), session_id.clone()));
    info!("Session {} started for {}", &session_id, connection_id);

    Ok(())
}

fn load_pack(pack_dir: &Path, pack_name: &str) -> Result<QuestionSet, CommandError> {
    let unknown = || CommandError::UnknownPack(pack_name.to_string());

    let path = resolve_pack(pack_dir, pack_name).ok_or_else(unknown)?;
    let data = fs::read_to_string(&path).map_err(|error| {
        warn!("Could not read pack {}: {}", path.display(), error);
        unknown()
    })?;
    let pack: QuestionPack = serde_json::from_str(&data)?;
    Ok(question_set_from_payload(pack.topic, &pack.questions)?)
}

/// Maps a bare pack name to a file inside `pack_dir`. Names with directory
/// parts, and links leading out of `pack_dir`, resolve to nothing.
fn resolve_pack(pack_dir: &Path, pack_name: &str) -> Option<PathBuf> {
    let mut components = Path::new(pack_name).components();
    let file_name = match (components.next(), components.next()) {
        (Some(Component::Normal(file_name)), None) => file_name,
        _ => return None,
    };

    let mut path = pack_dir.join(file_name);
    if path.extension().is_none() {
        path.set_extension("json");
    }

    let root = pack_dir.canonicalize().ok()?;
    let path = path.canonicalize().ok()?;
    if path.starts_with(&root) {
        Some(path)
    } else {
        None
    }
}

/// Finds a running session; a finished one reports as completed.
fn live_session(
    session_id: &str,
    operation: &'static str,
    lists: &Lists,
) -> Result<SessionEntry, CommandError> {
    if let Some(entry) = lists.session_entry(session_id) {
        return Ok(entry);
    }

    if lists.store.load(session_id)?.is_some() {
        return Err(SessionError::InvalidState {
            operation,
            status: SessionStatus::Completed,
        }
        .into());
    }
    Err(CommandError::SessionNotFound(session_id.to_string()))
}

fn rebind_session(session_id: &str, lists: &Lists, connection_id: &str) -> Result<(), CommandError> {
    let mut sessions = lists.sessions.lock().map_err(|_| CommandError::Poisoned)?;
    match sessions.get_mut(session_id) {
        Some(entry) => {
            entry.connection_id = connection_id.to_string();
            Ok(())
        }
        None => Err(CommandError::SessionNotFound(session_id.to_string())),
    }
}

fn operation_name(command: &SessionCommand) -> &'static str {
    match command {
        SessionCommand::SelectAnswer { .. } => "select an answer",
        SessionCommand::Next {} | SessionCommand::Previous {} | SessionCommand::GoTo { .. } => {
            "navigate"
        }
        SessionCommand::GetState {} => "read state",
        SessionCommand::Submit {} => "submit",
        SessionCommand::Resume {} => "resume",
        SessionCommand::GetResult {} => "read result",
    }
}

fn question_response(session: &QuizSession) -> Option<Response> {
    session.current_question().map(|question| Response::QuestionResponse {
        index: session.current_index(),
        prompt: question.prompt.clone(),
        options: question.options.clone(),
        selected: session.answers().get(session.current_index()),
    })
}

fn send_question(session: &QuizSession, lists: &Lists, connection_id: &str) {
    if let Some(response) = question_response(session) {
        send_message(&response, &lists.peers, connection_id);
    }
}

fn state_response(session: &QuizSession) -> Response {
    Response::StateResponse {
        status: session.status(),
        current_index: session.current_index(),
        remaining_seconds: session.remaining_seconds(),
        answered_count: session.answers().len(),
        total_questions: session.question_count(),
    }
}
