use std::{
    process::{
        Command,
        Stdio,
    },
    thread::sleep,
    time::Duration,
};

use crate::{
    anki::AnkiClient,
    core::AnkiflowError,
};

const STARTUP_ATTEMPTS: u32 = 30;
const STARTUP_WAIT: Duration = Duration::from_secs(1);

/// Polls AnkiConnect until it answers or the attempts run out.
pub fn wait_until_ready(client: &AnkiClient, wait: Duration, max_attempts: u32) -> bool {
    for attempt in 1..=max_attempts {
        if client.ping() {
            return true;
        }
        if attempt < max_attempts {
            println!("Waiting for AnkiConnect (attempt {} of {})...", attempt, max_attempts);
            sleep(wait);
        }
    }
    false
}

/// Makes sure AnkiConnect is reachable, launching the Anki desktop app in
/// the background if it is not. The spawn is best effort; what matters is
/// whether the endpoint comes up within the polling window.
pub fn ensure_running(client: &AnkiClient) -> Result<(), AnkiflowError> {
    if client.ping() {
        return Ok(());
    }

    println!("Anki not responding. Trying to start Anki Desktop...");
    if let Err(e) = launch_desktop() {
        eprintln!("Could not launch Anki: {e}");
    }

    if wait_until_ready(client, STARTUP_WAIT, STARTUP_ATTEMPTS) {
        Ok(())
    } else {
        Err(AnkiflowError::AnkiUnavailable(format!(
            "AnkiConnect did not come up at {}. Is the AnkiConnect add-on installed?",
            client.url()
        )))
    }
}

fn launch_desktop() -> std::io::Result<()> {
    Command::new("anki").stdout(Stdio::null()).stderr(Stdio::null()).spawn()?;
    Ok(())
}
