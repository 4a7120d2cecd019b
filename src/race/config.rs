use std::time::Duration;

/// How the id returned by race creation maps to the id used afterwards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RaceIdPolicy {
    /// The reference server numbers races from 0 internally but reports
    /// them from 1, so start/poll/accelerate use `created_id - 1`
    #[default]
    ServerOffset,
    /// Use the created id unchanged
    Verbatim,
}

impl RaceIdPolicy {
    pub fn wire_id(self, created_id: u32) -> u32 {
        match self {
            RaceIdPolicy::ServerOffset => created_id.saturating_sub(1),
            RaceIdPolicy::Verbatim => created_id,
        }
    }
}

/// Race flow configuration
#[derive(Debug, Clone)]
pub struct RaceConfig {
    /// Value the countdown starts from
    pub countdown_from: u32,
    /// Pause before the countdown starts moving
    pub settle_delay: Duration,
    /// Countdown step
    pub countdown_tick: Duration,
    /// Race poll period
    pub poll_interval: Duration,
    pub race_id_policy: RaceIdPolicy,
    /// Consecutive poll failures tolerated before the race is abandoned,
    /// unlimited when unset
    pub max_poll_failures: Option<u32>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            countdown_from: 3,
            settle_delay: Duration::from_secs(1),
            countdown_tick: Duration::from_secs(1),
            poll_interval: Duration::from_millis(500),
            race_id_policy: RaceIdPolicy::ServerOffset,
            max_poll_failures: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = RaceConfig::default();
        assert_eq!(config.countdown_from, 3);
        assert_eq!(config.settle_delay, Duration::from_secs(1));
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.race_id_policy, RaceIdPolicy::ServerOffset);
        assert_eq!(config.max_poll_failures, None);
    }

    #[test]
    fn test_wire_id() {
        assert_eq!(RaceIdPolicy::ServerOffset.wire_id(5), 4);
        assert_eq!(RaceIdPolicy::ServerOffset.wire_id(0), 0);
        assert_eq!(RaceIdPolicy::Verbatim.wire_id(5), 5);
    }
}
