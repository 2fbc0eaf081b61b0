use crate::{
    handlers::{
        command_handler::{execute_authorized_command, execute_unauthorized_command},
        timeout_handler::handle_session_timeout,
    },
    helpers::parse_command,
    models::communication::Command,
    registry::Lists,
    server_messages::send_error,
};
use futures_channel::mpsc::unbounded;
use futures_util::{future, pin_mut, StreamExt, TryStreamExt};
use log::{info, warn};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use uuid::Uuid;

pub async fn handle_connection(lists: Lists, raw_stream: TcpStream, addr: SocketAddr) {
    info!("Incoming TCP connection from: {}", &addr);

    let ws_stream = match tokio_tungstenite::accept_async(raw_stream).await {
        Ok(stream) => stream,
        Err(error) => {
            warn!("Handshake with {} error: {}", addr, error);
            return;
        }
    };
    info!("WebSocket connection established: {}", &addr);

    let connection_id = Uuid::new_v4().to_string();
    let (tx, rx) = unbounded();
    match lists.peers.lock() {
        Ok(mut peers) => {
            peers.insert(connection_id.clone(), tx);
        }
        Err(_) => {
            warn!("Peer map lock poisoned, dropping {}", &addr);
            return;
        }
    }

    let (outgoing, incoming) = ws_stream.split();

    let handle_incoming = incoming.try_for_each(|msg| {
        if !msg.is_text() {
            return future::ok(());
        }

        match parse_command(&msg) {
            Ok(Command::UnauthorizedCommand(command)) => {
                execute_unauthorized_command(command, &lists, &connection_id)
            }
            Ok(Command::CommandTokenPair(command)) => {
                execute_authorized_command(command, &lists, &connection_id)
            }
            Err(error) => {
                warn!("Error parsing command!: {}", error);
                send_error(error.to_string(), &lists.peers, &connection_id);
            }
        }

        future::ok(())
    });

    let receive_from_others = rx.map(Ok).forward(outgoing);

    pin_mut!(handle_incoming, receive_from_others);
    future::select(handle_incoming, receive_from_others).await;

    info!("{} disconnected", &addr);

    if let Ok(mut peers) = lists.peers.lock() {
        peers.remove(&connection_id);
    }

    for session_id in lists.sessions_of(&connection_id) {
        info!(
            "Session {} lost its connection, waiting {:?} for it to resume",
            &session_id, lists.config.idle_timeout
        );
        tokio::spawn(handle_session_timeout(
            lists.clone(),
            session_id,
            connection_id.clone(),
        ));
    }
}
