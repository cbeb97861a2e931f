use brewpid_core::{PlotPoint, PlotRect, PointerButton, Route, TimerKind};
use brewpid_runtime::{Action, Dashboard, DashboardMessage, DashboardSettings};
use connection::LinkEvent;
use dashboard_config::DisplayConfig;

const NOW: i64 = 1_000_000;

const RECT: PlotRect = PlotRect {
    x1: 0.0,
    x2: 1_200.0,
    y1: 400.0,
    y2: 0.0,
};

fn dashboard() -> Dashboard {
    let settings = DashboardSettings {
        plot_width_px: 1_200,
        ..DashboardSettings::default()
    };
    let mut dashboard = Dashboard::new(settings, DisplayConfig::default());
    assert_eq!(dashboard.start(NOW), vec![Action::Connect]);
    dashboard.handle_link_event(LinkEvent::Opened, NOW);
    dashboard
}

fn text(dashboard: &mut Dashboard, json: &str, now: i64) -> Vec<Action> {
    dashboard.handle_link_event(LinkEvent::Text(json.to_string()), now)
}

/// Two records five seconds apart, both at 60.00 °C.
fn backfill(dashboard: &mut Dashboard) -> Vec<Action> {
    text(
        dashboard,
        r#"{"sendBinary":{"length":2,"frontTime":40000,"frontTemperature":6000,"lastPart":true}}"#,
        NOW,
    );
    let frame = vec![0x88, 0x13, 0, 10, 5, 0x88, 0x13, 0, 20, 6];
    dashboard.handle_link_event(LinkEvent::Binary(frame), NOW)
}

#[test]
fn start_shows_home_and_connects() {
    let dashboard = dashboard();
    assert_eq!(dashboard.state().route, Route::Home);
    assert!(dashboard.state().link_open);
    assert!(dashboard.state().timers.is_armed(TimerKind::ElapsedLabel));
    assert!(dashboard.state().timers.is_armed(TimerKind::AliveCheck));
}

#[test]
fn first_sample_sends_history_request() {
    let mut dashboard = dashboard();
    assert!(text(&mut dashboard, r#"{"millis":100000}"#, NOW).is_empty());
    let actions = text(
        &mut dashboard,
        r#"{"temperature":61.2,"power":40,"meanPower":35,"time":50000}"#,
        NOW,
    );
    assert_eq!(
        actions,
        vec![Action::Send(
            r#"{"get":{"history":{"from":0,"to":0}}}"#.to_string()
        )]
    );
    assert!(dashboard.state().chart_updating);
}

#[test]
fn malformed_text_is_ignored() {
    let mut dashboard = dashboard();
    assert!(text(&mut dashboard, "{not json", NOW).is_empty());
    assert!(text(&mut dashboard, r#"{"temperature":"hot"}"#, NOW).is_empty());
}

#[test]
fn backfill_then_chart_navigation_renders() {
    let mut dashboard = dashboard();
    text(&mut dashboard, r#"{"millis":100000}"#, NOW);
    text(&mut dashboard, r#"{"temperature":60.0,"time":50000}"#, NOW);
    assert!(backfill(&mut dashboard).is_empty());
    assert!(!dashboard.state().chart_updating);
    assert_eq!(dashboard.state().buffer.len(), 2);

    let actions = dashboard.handle_message(DashboardMessage::Navigate("#chart".to_string()), NOW);
    let [Action::Render(frame)] = actions.as_slice() else {
        panic!("expected one render, got {actions:?}");
    };
    assert_eq!(frame.temperature.len(), 2);
    assert_eq!(frame.stride, 1);
    assert!(frame.power.is_empty());

    let actions = text(&mut dashboard, r#"{"temperature":60.5,"time":51000}"#, NOW);
    assert!(matches!(actions.as_slice(), [Action::Render(frame)] if frame.temperature.len() == 3));
}

#[test]
fn hidden_page_does_not_render() {
    let mut dashboard = dashboard();
    text(&mut dashboard, r#"{"millis":100000}"#, NOW);
    text(&mut dashboard, r#"{"temperature":60.0,"time":50000}"#, NOW);
    backfill(&mut dashboard);
    dashboard.handle_message(DashboardMessage::Visibility(false), NOW);
    let actions = dashboard.handle_message(DashboardMessage::Navigate("chart".to_string()), NOW);
    assert!(actions.is_empty());
    let actions = dashboard.handle_message(DashboardMessage::Visibility(true), NOW);
    assert!(matches!(actions.as_slice(), [Action::Render(_)]));
}

#[test]
fn silent_link_is_closed_by_liveness_check() {
    let mut dashboard = dashboard();
    text(&mut dashboard, r#"{"temperature":60.0}"#, NOW);
    assert!(dashboard.tick(NOW + 5_000).is_empty());
    let actions = dashboard.tick(NOW + 15_000);
    assert_eq!(actions, vec![Action::CloseLink]);
    assert_eq!(dashboard.state().labels.temperature_text(), "--");
}

#[test]
fn close_schedules_reconnect_once() {
    let mut dashboard = dashboard();
    text(&mut dashboard, r#"{"millis":100000,"standby":true}"#, NOW);
    assert!(dashboard
        .handle_link_event(LinkEvent::Closed, NOW)
        .is_empty());
    assert!(!dashboard.state().link_open);
    assert!(!dashboard.state().clock.is_known());
    assert!(!dashboard.state().labels.standby_visible);

    dashboard.handle_link_event(LinkEvent::Error("again".to_string()), NOW + 500);
    dashboard.handle_link_event(LinkEvent::Closed, NOW + 500);
    assert_eq!(
        dashboard.state().timers.due_at(TimerKind::Reconnect),
        Some(NOW + 2_000)
    );

    assert!(dashboard.tick(NOW + 1_999).is_empty());
    assert_eq!(dashboard.tick(NOW + 2_000), vec![Action::Connect]);
}

#[test]
fn gesture_end_persists_display_config() {
    let mut dashboard = dashboard();
    dashboard.handle_message(DashboardMessage::Navigate("#chart".to_string()), NOW);
    assert!(dashboard
        .handle_message(
            DashboardMessage::PointerDown {
                point: PlotPoint::new(100.0, 100.0),
                button: PointerButton::Primary,
                rect: RECT,
            },
            NOW,
        )
        .is_empty());
    let actions = dashboard.handle_message(DashboardMessage::PointerUp, NOW);
    assert_eq!(
        actions,
        vec![Action::PersistDisplayConfig(DisplayConfig::default())]
    );
}

#[test]
fn display_toggle_persists_and_applies_width() {
    let mut dashboard = dashboard();
    let display = DisplayConfig {
        show_power: true,
        window_minutes: 5.0,
        ..DisplayConfig::default()
    };
    let actions = dashboard.handle_message(DashboardMessage::SetDisplayConfig(display), NOW);
    assert_eq!(actions, vec![Action::PersistDisplayConfig(display)]);
    assert_eq!(dashboard.state().window.width_ms(), 300_000.0);
}

#[test]
fn new_config_asks_for_settings() {
    let mut dashboard = dashboard();
    let actions = text(&mut dashboard, r#"{"new_config":{}}"#, NOW);
    assert_eq!(actions, vec![Action::FetchSettings]);
}

#[test]
fn elapsed_label_ticks_on_home_only() {
    let mut dashboard = dashboard();
    text(&mut dashboard, r#"{"millis":65000}"#, NOW);
    dashboard.tick(NOW + 1_000);
    assert_eq!(dashboard.state().labels.elapsed_text, "1:06");

    dashboard.handle_message(DashboardMessage::Navigate("#settings".to_string()), NOW + 1_000);
    assert!(!dashboard.state().timers.is_armed(TimerKind::ElapsedLabel));
}
