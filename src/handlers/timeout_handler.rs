use futures_timer::Delay;
use log::info;

use crate::registry::Lists;

/// Waits out the idle timeout after `connection_id` went away, then drops the
/// session unless a `resume` rebound it to another connection.
pub async fn handle_session_timeout(lists: Lists, session_id: String, connection_id: String) {
    Delay::new(lists.config.idle_timeout).await;

    let entry = match lists.session_entry(&session_id) {
        Some(entry) => entry,
        None => return,
    };

    if entry.connection_id != connection_id {
        info!("NOT removing session {}: resumed elsewhere", &session_id);
        return;
    }

    info!("Removing abandoned session: {}", &session_id);
    lists.remove_session(&session_id);
}
