use futures_timer::Delay;
use log::{error, info, warn};

use crate::{
    models::{analysis::AnalysisResult, communication::Response},
    registry::Lists,
    server_messages::send_message,
};

/// Drives one session's clock: one tick per interval until the session is
/// submitted (by the deadline or by its player) or dropped from the registry.
pub async fn handle_session_timer(lists: Lists, session_id: String) {
    info!("Timer started for session {}", &session_id);

    loop {
        Delay::new(lists.config.tick_interval).await;

        let entry = match lists.session_entry(&session_id) {
            Some(entry) => entry,
            None => {
                info!("Session {} left the registry, stopping timer", &session_id);
                return;
            }
        };

        let outcome = match entry.session.lock() {
            Ok(mut session) => session
                .tick()
                .map(|analysis| (analysis, session.remaining_seconds())),
            Err(_) => {
                warn!("Session {} lock poisoned, stopping timer", &session_id);
                return;
            }
        };

        match outcome {
            Ok((None, remaining_seconds)) => {
                let timer_response = Response::TimerResponse { remaining_seconds };
                send_message(&timer_response, &lists.peers, &entry.connection_id);
            }
            Ok((Some(analysis), _)) => {
                info!("Session {} ran out of time", &session_id);
                let timer_response = Response::TimerResponse {
                    remaining_seconds: 0,
                };
                send_message(&timer_response, &lists.peers, &entry.connection_id);
                finish_session(&lists, &session_id, &entry.connection_id, analysis);
                return;
            }
            Err(reason) => {
                info!("Timer for session {} stopped: {}", &session_id, reason);
                return;
            }
        }
    }
}

/// Persists a finished session's analysis, retires the session and hands the
/// analysis to its connection.
pub fn finish_session(
    lists: &Lists,
    session_id: &str,
    connection_id: &str,
    analysis: AnalysisResult,
) {
    if let Err(reason) = lists.store.save(session_id, &analysis) {
        error!("Could not store result of session {}: {}", session_id, reason);
    }
    lists.remove_session(session_id);

    info!(
        "Session {} completed: {}/{} ({}%, {})",
        session_id,
        analysis.correct_count,
        analysis.total_questions,
        analysis.percentage,
        analysis.pass_status
    );

    let response = Response::AnalysisResponse {
        analysis: Box::new(analysis),
    };
    send_message(&response, &lists.peers, connection_id);
}
