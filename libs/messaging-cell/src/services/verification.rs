/// Webhook subscription handshake: the provider sends `hub.mode`,
/// `hub.verify_token` and `hub.challenge`; on a "subscribe" request with a
/// matching token the challenge must be echoed back verbatim.
///
/// Stateless and independent of the conversation flow.
pub fn verify_subscription<'a>(
    mode: &str,
    token: &str,
    challenge: &'a str,
    configured_token: &str,
) -> Option<&'a str> {
    if mode == "subscribe" && !configured_token.is_empty() && token == configured_token {
        Some(challenge)
    } else {
        None
    }
}
