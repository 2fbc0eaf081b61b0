use log::{info, warn};
use tungstenite::protocol::Message;

use crate::{models::communication::Response, registry::PeerMap};

/// Queues `response` for connection `id`. Returns whether anyone was there to
/// receive it.
pub fn send_message(response: &Response, peer_map: &PeerMap, id: &str) -> bool {
    let text = match serde_json::to_string(response) {
        Ok(text) => text,
        Err(error) => {
            warn!("Could not serialize response for {}: {}", id, error);
            return false;
        }
    };

    let peers = match peer_map.lock() {
        Ok(peers) => peers,
        Err(_) => {
            warn!("Peer map lock poisoned, dropping message for {}", id);
            return false;
        }
    };

    match peers.get(id) {
        Some(recipient) => match recipient.unbounded_send(Message::Text(text)) {
            Ok(()) => {
                info!("Message sent successfully to: {}", id);
                true
            }
            Err(error) => {
                warn!("Message to {} not delivered: {}", id, error);
                false
            }
        },
        None => {
            info!("No connection {} to send to", id);
            false
        }
    }
}

pub fn send_error(text: impl Into<String>, peer_map: &PeerMap, id: &str) -> bool {
    let response = Response::ErrorResponse {
        error_text: text.into(),
    };
    send_message(&response, peer_map, id)
}
