use actix_web::http::header::{HeaderValue, SEC_WEBSOCKET_PROTOCOL};
use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::{CloseCode, CloseReason, Message, MessageStream, Session};
use log::{debug, error, info, warn};

use super::NotificationHub;
use super::protocol::{Negotiation, negotiate, offered_protocols};
use super::subscription::Subscription;

/// Why a connection loop stopped.
enum Exit {
    /// Peer went away or both watches shut down.
    Ended,
    ClientClosed(Option<CloseReason>),
    SendFailed(String),
    Transport(String),
}

impl Exit {
    fn close_reason(self) -> Option<CloseReason> {
        match self {
            Self::Ended => None,
            Self::ClientClosed(reason) => reason,
            Self::SendFailed(msg) | Self::Transport(msg) => Some(CloseReason {
                code: CloseCode::Error,
                description: Some(msg),
            }),
        }
    }
}

/// Complete the upgrade handshake and start pushing change events.
pub fn accept(
    hub: &NotificationHub,
    req: &HttpRequest,
    body: web::Payload,
) -> Result<HttpResponse, actix_web::Error> {
    let protocol = match negotiate(offered_protocols(req.headers())) {
        Negotiation::Accept(protocol) => protocol,
        Negotiation::Reject => {
            warn!("HUB - refused upgrade offering a reserved subprotocol");
            return Ok(HttpResponse::BadRequest().body("unsupported websocket subprotocol"));
        }
    };

    let (mut response, session, inbound) = actix_ws::handle(req, body)?;
    let subscription = hub
        .subscribe()
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if let Some(value) = protocol.and_then(|p| HeaderValue::from_str(&p).ok()) {
        response.headers_mut().insert(SEC_WEBSOCKET_PROTOCOL, value);
    }

    let peer = req
        .peer_addr()
        .map_or_else(|| "unknown".to_string(), |addr| addr.to_string());
    info!("HUB - connection opened ({peer})");
    actix_web::rt::spawn(serve(session, inbound, subscription, peer));

    Ok(response)
}

async fn serve(
    mut session: Session,
    mut inbound: MessageStream,
    mut subscription: Subscription,
    peer: String,
) {
    let exit = loop {
        tokio::select! {
            event = subscription.next_event() => {
                let Some(event) = event else { break Exit::Ended };
                let payload = match serde_json::to_string(&event) {
                    Ok(payload) => payload,
                    Err(e) => break Exit::SendFailed(e.to_string()),
                };
                if let Err(e) = session.text(payload).await {
                    error!("HUB - push to {peer} failed: {e}");
                    break Exit::SendFailed(e.to_string());
                }
                debug!("HUB - pushed {:?} change to {peer}", event.kind());
            }
            msg = inbound.recv() => match msg {
                Some(Ok(Message::Text(text))) => debug!("HUB - {peer} sent text: {text}"),
                Some(Ok(Message::Binary(bytes))) => {
                    debug!("HUB - {peer} sent {} binary bytes", bytes.len());
                }
                Some(Ok(Message::Ping(bytes))) => {
                    if let Err(e) = session.pong(&bytes).await {
                        break Exit::SendFailed(e.to_string());
                    }
                }
                Some(Ok(Message::Close(reason))) => break Exit::ClientClosed(reason),
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!("HUB - transport error on {peer}: {e}");
                    break Exit::Transport(e.to_string());
                }
                None => break Exit::Ended,
            }
        }
    };

    // Watches go first, whatever ended the loop.
    subscription.dispose();

    // Fails harmlessly when the session is already closed.
    let _ = session.close(exit.close_reason()).await;
    info!("HUB - connection closed ({peer})");
}
