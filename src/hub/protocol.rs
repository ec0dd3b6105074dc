use actix_web::http::header::{HeaderMap, SEC_WEBSOCKET_PROTOCOL};

/// Subprotocol owned by the frontend dev server's hot-reload socket.
pub const RESERVED_PROTOCOL: &str = "vite-hmr";

/// Outcome of subprotocol negotiation for one upgrade request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiation {
    /// Accept, echoing the selected protocol if the client offered any.
    Accept(Option<String>),
    Reject,
}

/// Refuse any request that offers the reserved protocol, otherwise pick
/// the first protocol the client listed.
pub fn negotiate<I, S>(offered: I) -> Negotiation
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut selected = None;
    for protocol in offered {
        let protocol = protocol.as_ref();
        if protocol == RESERVED_PROTOCOL {
            return Negotiation::Reject;
        }
        if selected.is_none() {
            selected = Some(protocol.to_string());
        }
    }
    Negotiation::Accept(selected)
}

/// Protocols listed in every `Sec-WebSocket-Protocol` header, in order.
pub fn offered_protocols(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(SEC_WEBSOCKET_PROTOCOL)
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
