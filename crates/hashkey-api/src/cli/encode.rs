//! `hashkey encode` - print a password digest without starting the server.

use crate::state::AppState;

/// Digest `password` with no processing delay and print it.
pub fn encode_password(state: &AppState, password: &str, json: bool) -> anyhow::Result<()> {
    let digest = state.digest_service.encode(password.as_bytes());

    if json {
        let out = serde_json::json!({ "digest": digest });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{digest}");
    }

    Ok(())
}
