use super::{EventSink, RaceConfig, RaceEvent};
use crate::view::{Surface, COUNTDOWN};
use tokio::time;

/// Count down on screen, resolving once the counter shows 0.
///
/// After the settling delay the counter drops once straight away and then
/// once per tick, so a start value of 3 shows 2, 1 and 0.
pub(crate) async fn run_countdown<S: Surface>(surface: &S, config: &RaceConfig, events: &EventSink) {
    time::sleep(config.settle_delay).await;

    let mut remaining = config.countdown_from;
    let mut ticker = time::interval(config.countdown_tick);
    while remaining > 0 {
        ticker.tick().await;
        remaining -= 1;
        surface.mount(COUNTDOWN, remaining.to_string());
        events.emit(RaceEvent::Countdown(remaining));
    }
}
