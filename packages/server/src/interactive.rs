//! Interactive mode for the server.
//!
//! Prompts the user for bind address, port, and input files before
//! starting the server.

use dialoguer::{Confirm, Input};

use crate::ServerError;

/// Prompts for a value, keeping the current environment value (or
/// `default`) when the user just presses enter.
fn prompt(label: &str, var: &str, default: &str) -> String {
    let current = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Input::new()
        .with_prompt(label)
        .default(current.clone())
        .interact_text()
        .unwrap_or(current)
}

/// Runs the server in interactive mode, prompting for configuration.
///
/// Asks for a bind address, port, and the two input files, sets the
/// corresponding environment variables, and delegates to
/// [`super::run_server`].
///
/// # Errors
///
/// Returns [`ServerError`] if the server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run() -> Result<(), ServerError> {
    println!("Bird Strike Dashboard Server");
    println!();

    let bind_addr = prompt("Bind address", "BIND_ADDR", "127.0.0.1");
    let port = prompt("Port", "PORT", "8080");
    let incidents_path = prompt("Incident CSV", "INCIDENTS_PATH", "data/bird_strikes.csv");
    let state_codes_path = prompt("State code CSV", "STATE_CODES_PATH", "data/state_codes.csv");

    // SAFETY: We are single-threaded at this point (before server starts) and
    // these variables are only read once during server initialisation.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", &port);
        std::env::set_var("INCIDENTS_PATH", &incidents_path);
        std::env::set_var("STATE_CODES_PATH", &state_codes_path);
    }

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server().await
}
