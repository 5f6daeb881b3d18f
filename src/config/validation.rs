//! Configuration validation functions.

use super::Config;

/// Validate configuration consistency.
///
/// Returns an error for values that would wedge the admission queue; prints
/// a warning to stderr for combinations that are legal but suspicious.
pub fn validate_config(config: &Config) -> anyhow::Result<()> {
    let queue = &config.join_queue;

    if queue.enabled && queue.connection_timeout_ms == 0 {
        anyhow::bail!(
            "join_queue.connection_timeout_ms must be greater than zero; \
             a zero timeout disconnects every client on the first tick"
        );
    }

    if queue.enabled && queue.handshake_grace_ms == 0 {
        anyhow::bail!(
            "join_queue.handshake_grace_ms must be greater than zero; \
             the host needs a window to begin the handshake after dequeue"
        );
    }

    if queue.connection_delay_ms > queue.connection_timeout_ms {
        eprintln!(
            "WARNING: join_queue.connection_delay_ms ({}) exceeds connection_timeout_ms ({}); \
             admissions will be throttled harder than connections are allowed to last",
            queue.connection_delay_ms, queue.connection_timeout_ms
        );
    }

    match config.logging.rotation.to_lowercase().as_str() {
        "daily" | "hourly" | "never" => {}
        other => {
            eprintln!("WARNING: unknown logging.rotation '{other}', falling back to daily");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn zero_timeout_rejected_when_enabled() {
        let mut config = Config::default();
        config.join_queue.connection_timeout_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn zero_timeout_accepted_when_queue_disabled() {
        let mut config = Config::default();
        config.join_queue.enabled = false;
        config.join_queue.connection_timeout_ms = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_handshake_grace_rejected() {
        let mut config = Config::default();
        config.join_queue.handshake_grace_ms = 0;
        assert!(validate_config(&config).is_err());
    }
}
