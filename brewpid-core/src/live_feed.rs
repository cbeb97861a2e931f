use crate::app_state::AppState;
use crate::ingest::IngestOutcome;
use crate::sample_buffer::{PowerSample, Sample};
use crate::wire::{ClientRequest, DeviceMessage};

/// A live sample further than this past the newest buffered one leaves a gap
/// that is filled from the device history.
pub const GAP_THRESHOLD_MS: i64 = 1_500;
pub const SEED_BACKFILL_TIMEOUT_MS: i64 = 20_000;
pub const GAP_BACKFILL_TIMEOUT_MS: i64 = 10_000;

/// What the event loop has to do after a message was folded into the state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedOutcome {
    pub requests: Vec<ClientRequest>,
    pub render: bool,
    pub refetch_settings: bool,
}

/// Applies every field present in `message`, in the device's field order.
pub fn handle_device_message(state: &mut AppState, message: &DeviceMessage, now: i64) -> FeedOutcome {
    let mut outcome = FeedOutcome::default();

    if let Some(announcement) = &message.send_binary {
        state.transfer.arm(announcement);
    }
    if let Some(heater) = message.heater {
        state.labels.set_heater(heater, message.power);
    }
    if let Some(temperature) = message.temperature {
        state.labels.current_temperature = Some(temperature);
        ingest_sample(state, message, temperature, now, &mut outcome);
    }
    if let Some(millis) = message.millis {
        state.clock.observe_uptime(now, millis);
    }
    if let Some(standby) = message.standby {
        state.labels.set_standby(standby);
    }
    if let Some(code) = message.fault {
        log::warn!("Device reported fault 0x{code:X}");
        state.labels.set_fault(code);
    }
    if let Some(tuning) = &message.tuning {
        state.labels.set_tuning(tuning);
    }
    if let Some(target) = message.target {
        state.labels.target = Some(target);
    }
    if message.new_config {
        outcome.refetch_settings = true;
    }
    outcome
}

fn ingest_sample(
    state: &mut AppState,
    message: &DeviceMessage,
    temperature: f64,
    now: i64,
    outcome: &mut FeedOutcome,
) {
    let Some(device_time) = message.time else {
        return;
    };
    let Some(time) = state.clock.to_local(device_time) else {
        return;
    };
    if state.chart_updating {
        log::trace!("Backfill pending, dropping sample at {device_time}");
        return;
    }

    let request = match state.buffer.newest() {
        None => {
            let from = (device_time - state.buffer.retention_ms()).max(0);
            state.begin_backfill(now, SEED_BACKFILL_TIMEOUT_MS);
            ClientRequest::history(from, 0)
        }
        Some(newest) if time - newest > GAP_THRESHOLD_MS => {
            let from = state.clock.to_device(newest).unwrap_or(0);
            state.begin_backfill(now, GAP_BACKFILL_TIMEOUT_MS);
            ClientRequest::history(from, 0)
        }
        Some(_) => {
            let sample = Sample { time, temperature };
            let power = PowerSample {
                time,
                power: message.power.unwrap_or(0.0),
                mean_power: message.mean_power.unwrap_or(0.0),
            };
            if state.buffer.append(&state.clock, sample, power) {
                outcome.render |= state.should_render_live();
            }
            return;
        }
    };
    log::info!(
        "Requesting history from {} ms after boot",
        request.range().from
    );
    outcome.requests.push(request);
}

/// Decodes one binary frame against the armed transfer.
pub fn handle_binary_frame(state: &mut AppState, frame: &[u8]) -> (IngestOutcome, FeedOutcome) {
    let mut outcome = FeedOutcome::default();
    let result = state
        .transfer
        .decode_frame(frame, &state.clock, &mut state.buffer);
    match result {
        IngestOutcome::Rejected(reason) => {
            log::debug!("Dropped binary frame of {} bytes: {reason:?}", frame.len());
        }
        IngestOutcome::Partial { records } => {
            log::debug!("Merged {records} backfill records, more to come");
        }
        IngestOutcome::Completed { records } => {
            log::info!("Backfill complete, {} samples buffered", state.buffer.len());
            log::debug!("Last part carried {records} records");
            state.cancel_backfill();
            outcome.render = state.should_render_live();
        }
    }
    (result, outcome)
}

/// The safety timer fired before the transfer completed.
pub fn on_backfill_timeout(state: &mut AppState) {
    if !state.chart_updating {
        return;
    }
    log::warn!("Backfill did not complete in time, giving up");
    state.buffer.sort_by_time();
    state.cancel_backfill();
}
