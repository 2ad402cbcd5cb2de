//! Dashboard controller: fetch lifecycle, auto-refresh and view selection.

use chrono::{DateTime, Local};
use std::fmt::Debug;
use std::time::Duration;
use tracing::{error, info};

use crate::{
    WeatherProvider, WeatherSnapshot, codes,
    refresh::{AutoRefresh, DEFAULT_REFRESH_INTERVAL},
    view::{TreeView, ViewMode, grid},
};

pub const TITLE: &str = "Environmental Monitoring Dashboard";
pub const LOCATION_NAME: &str = "Pretoria, South Africa";
pub const LOADING_TEXT: &str = "Loading environmental data...";

pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub view_mode: ViewMode,
    pub auto_refresh: bool,
    pub refresh_interval: Duration,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Grid,
            auto_refresh: true,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub snapshot: Option<WeatherSnapshot>,
    pub loading: bool,
    pub error: Option<String>,
    pub view_mode: ViewMode,
    pub last_update: DateTime<Local>,
    pub auto_refresh: bool,
}

/// User actions understood by [`Dashboard::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    ToggleAutoRefresh,
    View(ViewMode),
    ToggleNode(String),
    Help,
    Quit,
}

impl TryFrom<&str> for Command {
    type Error = anyhow::Error;

    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let mut parts = line.split_whitespace();
        let head = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();

        match (head.as_str(), arg) {
            ("r" | "refresh", None) => Ok(Command::Refresh),
            ("a" | "auto", None) => Ok(Command::ToggleAutoRefresh),
            ("g" | "grid", None) => Ok(Command::View(ViewMode::Grid)),
            ("t" | "tree", None) => Ok(Command::View(ViewMode::Tree)),
            ("x" | "toggle", Some(id)) => Ok(Command::ToggleNode(id.to_string())),
            ("h" | "help" | "?", None) => Ok(Command::Help),
            ("q" | "quit" | "exit", None) => Ok(Command::Quit),
            _ => Err(anyhow::anyhow!(
                "Unknown command '{}'. Type `help` for a list.",
                line.trim()
            )),
        }
    }
}

pub const HELP: &str = "\
Commands:
  r, refresh      fetch the latest conditions now
  a, auto         turn auto-refresh on or off
  g, grid         show the grid view
  t, tree         show the tree view
  x, toggle <id>  expand or collapse a tree branch
  h, help         show this help
  q, quit         exit";

pub struct Dashboard<P> {
    provider: P,
    state: DashboardState,
    tree: TreeView,
    timer: AutoRefresh,
    clock: Box<dyn Clock>,
}

impl<P: WeatherProvider> Dashboard<P> {
    pub fn new(provider: P, options: DashboardOptions) -> Self {
        Self::with_clock(provider, options, Box::new(SystemClock))
    }

    pub fn with_clock(provider: P, options: DashboardOptions, clock: Box<dyn Clock>) -> Self {
        let state = DashboardState {
            snapshot: None,
            loading: true,
            error: None,
            view_mode: options.view_mode,
            last_update: clock.now(),
            auto_refresh: options.auto_refresh,
        };

        Self {
            provider,
            state,
            tree: TreeView::new(),
            timer: AutoRefresh::new(options.refresh_interval),
            clock,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn tree(&self) -> &TreeView {
        &self.tree
    }

    /// Initial load, then start the timer if auto-refresh is on.
    pub async fn mount(&mut self) {
        self.load().await;
        if self.state.auto_refresh {
            self.timer.start();
        }
    }

    /// Fetch and apply a snapshot. The next automatic refresh is due a full
    /// period after this returns, however long the fetch took.
    pub async fn load(&mut self) {
        self.begin_load();
        let result = self.provider.fetch().await;
        self.finish_load(result);
        self.timer.restart_countdown();
    }

    fn begin_load(&mut self) {
        self.state.loading = true;
        self.state.error = None;
    }

    fn finish_load(&mut self, result: Result<WeatherSnapshot, crate::WeatherError>) {
        match result {
            Ok(snapshot) => {
                info!(time = %snapshot.time, code = snapshot.weathercode, "weather data updated");
                self.state.snapshot = Some(snapshot);
                self.state.last_update = self.clock.now();
            }
            Err(err) => {
                error!(error = %err, status = ?err.status(), "failed to load weather data");
                self.state.error = Some(err.user_message().to_string());
            }
        }
        self.state.loading = false;
    }

    pub fn set_auto_refresh(&mut self, enabled: bool) {
        self.state.auto_refresh = enabled;
        if enabled {
            self.timer.start();
        } else {
            self.timer.stop();
        }
    }

    pub fn toggle_auto_refresh(&mut self) {
        self.set_auto_refresh(!self.state.auto_refresh);
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.state.view_mode = mode;
    }

    pub fn toggle_node(&mut self, id: &str) -> bool {
        self.tree.toggle(id)
    }

    /// Resolves when the auto-refresh timer fires; pending while it is off.
    pub async fn next_tick(&mut self) {
        self.timer.tick().await;
    }

    /// Apply a user command. Returns `false` once the user asked to quit.
    pub async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Refresh => self.load().await,
            Command::ToggleAutoRefresh => self.toggle_auto_refresh(),
            Command::View(mode) => self.set_view_mode(mode),
            Command::ToggleNode(id) => {
                self.toggle_node(&id);
            }
            Command::Help => {}
            Command::Quit => return false,
        }
        true
    }

    pub fn description(&self) -> &'static str {
        self.state.snapshot.as_ref().map(|s| codes::describe(s.weathercode)).unwrap_or("")
    }

    pub fn render(&self) -> String {
        let state = &self.state;
        let auto = if state.auto_refresh { "Auto-Refresh ON" } else { "Auto-Refresh OFF" };
        let mut sections = vec![
            format!("{TITLE}\n{LOCATION_NAME}"),
            format!(
                "Last updated: {} | {auto} | View: {}",
                state.last_update.format("%-I:%M:%S %p"),
                state.view_mode
            ),
        ];

        if state.loading && state.snapshot.is_none() {
            sections.push(LOADING_TEXT.to_string());
        }

        if let Some(message) = &state.error {
            sections.push(format!("Error\n{message}"));
        }

        if let (false, Some(snapshot)) = (state.loading, &state.snapshot) {
            let description = self.description();
            sections.push(match state.view_mode {
                ViewMode::Grid => grid::render(Some(snapshot), description),
                ViewMode::Tree => self.tree.render(Some(snapshot), description),
            });
        }

        sections.join("\n\n")
    }
}

impl<P: Debug> Debug for Dashboard<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("provider", &self.provider)
            .field("state", &self.state)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{WeatherError, model::sample_snapshot};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::timeout;

    /// Replays scripted outcomes; after the script runs out it keeps returning the sample.
    #[derive(Debug, Default)]
    struct ScriptedProvider {
        calls: AtomicUsize,
        script: Mutex<VecDeque<Result<WeatherSnapshot, u16>>>,
        delay: Option<Duration>,
    }

    impl ScriptedProvider {
        fn with_script(script: impl IntoIterator<Item = Result<WeatherSnapshot, u16>>) -> Self {
            Self { script: Mutex::new(script.into_iter().collect()), ..Self::default() }
        }

        fn slow(delay: Duration) -> Self {
            Self { delay: Some(delay), ..Self::default() }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherProvider for ScriptedProvider {
        async fn fetch(&self) -> Result<WeatherSnapshot, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Ok(snapshot)) => Ok(snapshot),
                Some(Err(status)) => Err(WeatherError::Request { status }),
                None => Ok(sample_snapshot()),
            }
        }
    }

    #[derive(Debug)]
    struct FixedClock(DateTime<Local>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Local> {
            self.0
        }
    }

    fn dashboard(provider: ScriptedProvider) -> Dashboard<ScriptedProvider> {
        Dashboard::new(provider, DashboardOptions::default())
    }

    #[tokio::test(start_paused = true)]
    async fn mount_fetches_exactly_once() {
        let mut dash = dashboard(ScriptedProvider::default());
        assert_eq!(dash.provider().calls(), 0);

        dash.mount().await;

        assert_eq!(dash.provider().calls(), 1);
        assert!(!dash.state().loading);
        assert_eq!(dash.state().snapshot, Some(sample_snapshot()));
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_fetches_once_more() {
        let mut dash = dashboard(ScriptedProvider::default());
        dash.mount().await;

        assert!(dash.handle(Command::Refresh).await);
        assert_eq!(dash.provider().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_triggers_refresh_every_period() {
        let mut dash = dashboard(ScriptedProvider::default());
        dash.mount().await;

        dash.next_tick().await;
        dash.load().await;
        dash.next_tick().await;
        dash.load().await;

        assert_eq!(dash.provider().calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_auto_refresh_stops_automatic_fetches() {
        let mut dash = dashboard(ScriptedProvider::default());
        dash.mount().await;

        tokio::time::sleep(Duration::from_secs(10)).await;
        dash.handle(Command::ToggleAutoRefresh).await;
        assert!(!dash.state().auto_refresh);

        assert!(timeout(Duration::from_secs(300), dash.next_tick()).await.is_err());
        assert_eq!(dash.provider().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_load_does_not_leave_ticks_queued() {
        let mut dash = dashboard(ScriptedProvider::slow(Duration::from_secs(100)));
        dash.mount().await;

        // Timer tick at 30s, then a fetch that spans more than three periods.
        dash.next_tick().await;
        dash.load().await;
        assert_eq!(dash.provider().calls(), 2);

        assert!(timeout(Duration::from_secs(29), dash.next_tick()).await.is_err());
        assert!(timeout(Duration::from_secs(2), dash.next_tick()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_after_a_due_tick_stops_automatic_fetches() {
        let mut dash = dashboard(ScriptedProvider::default());
        dash.mount().await;

        // The 30s tick comes due while nobody is waiting on it.
        tokio::time::sleep(Duration::from_secs(45)).await;
        dash.set_auto_refresh(false);

        assert!(timeout(Duration::from_secs(300), dash.next_tick()).await.is_err());
        assert_eq!(dash.provider().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn mount_without_auto_refresh_never_ticks() {
        let options = DashboardOptions { auto_refresh: false, ..DashboardOptions::default() };
        let mut dash = Dashboard::new(ScriptedProvider::default(), options);
        dash.mount().await;

        assert!(timeout(Duration::from_secs(300), dash.next_tick()).await.is_err());

        dash.set_auto_refresh(true);
        assert!(timeout(Duration::from_secs(31), dash.next_tick()).await.is_ok());
    }

    #[tokio::test]
    async fn failure_keeps_previous_snapshot_and_shows_banner() {
        let mut dash = dashboard(ScriptedProvider::with_script([Ok(sample_snapshot()), Err(503)]));
        dash.mount().await;
        let before = dash.render();
        assert!(before.contains("22.5°C"));

        dash.load().await;

        let state = dash.state();
        assert_eq!(state.snapshot, Some(sample_snapshot()));
        assert_eq!(state.error.as_deref(), Some("Failed to fetch weather data. Please try again."));
        assert!(!state.loading);

        let out = dash.render();
        assert!(out.contains("Failed to fetch weather data"));
        assert!(out.contains("22.5°C"));
        assert!(out.contains("10.2 km/h"));
    }

    #[tokio::test]
    async fn failure_on_first_load_shows_only_the_banner() {
        let mut dash = dashboard(ScriptedProvider::with_script([Err(500)]));
        dash.mount().await;

        let out = dash.render();
        assert!(out.contains("Failed to fetch weather data"));
        assert!(!out.contains(LOADING_TEXT));
        assert!(!out.contains("No data available"));
        assert!(!out.contains("°C"));
    }

    #[tokio::test]
    async fn success_clears_previous_error() {
        let mut dash = dashboard(ScriptedProvider::with_script([Err(500)]));
        dash.mount().await;
        assert!(dash.state().error.is_some());

        dash.handle(Command::Refresh).await;
        assert!(dash.state().error.is_none());
        assert!(dash.state().snapshot.is_some());
    }

    #[tokio::test]
    async fn last_update_comes_from_the_clock() {
        let at = Local.with_ymd_and_hms(2024, 3, 1, 8, 15, 0).unwrap();
        let mut dash = Dashboard::with_clock(
            ScriptedProvider::default(),
            DashboardOptions { auto_refresh: false, ..DashboardOptions::default() },
            Box::new(FixedClock(at)),
        );
        dash.mount().await;

        assert_eq!(dash.state().last_update, at);
        assert!(dash.render().contains("Last updated: 8:15:00 AM"));
    }

    #[test]
    fn loading_indicator_only_before_first_snapshot() {
        let mut dash = dashboard(ScriptedProvider::default());
        let out = dash.render();
        assert!(out.contains(LOADING_TEXT));
        assert!(!out.contains("°C"));

        dash.finish_load(Ok(sample_snapshot()));
        dash.begin_load();
        let out = dash.render();
        assert!(!out.contains(LOADING_TEXT));
        assert!(!out.contains("Failed"));
    }

    #[tokio::test]
    async fn switching_views_does_not_refetch() {
        let mut dash = dashboard(ScriptedProvider::default());
        dash.set_auto_refresh(false);
        dash.mount().await;

        dash.handle(Command::View(ViewMode::Tree)).await;
        let tree = dash.render();
        assert!(tree.contains("Environmental Data"));
        assert!(tree.contains("View: tree"));

        dash.handle(Command::View(ViewMode::Grid)).await;
        let grid = dash.render();
        assert!(grid.contains("Temperature"));
        assert!(!grid.contains("Environmental Data"));

        assert_eq!(dash.provider().calls(), 1);
    }

    #[tokio::test]
    async fn tree_toggle_survives_refresh() {
        let mut dash = dashboard(ScriptedProvider::default());
        dash.set_auto_refresh(false);
        dash.mount().await;
        dash.set_view_mode(ViewMode::Tree);

        dash.handle(Command::ToggleNode("location".into())).await;
        dash.load().await;

        assert!(!dash.render().contains("Latitude"));
        assert!(!dash.tree().is_expanded("location"));
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let mut dash = dashboard(ScriptedProvider::default());
        assert!(!dash.handle(Command::Quit).await);
        assert!(dash.handle(Command::Help).await);
    }

    #[test]
    fn parse_commands() {
        assert_eq!(Command::try_from("r").unwrap(), Command::Refresh);
        assert_eq!(Command::try_from(" refresh ").unwrap(), Command::Refresh);
        assert_eq!(Command::try_from("AUTO").unwrap(), Command::ToggleAutoRefresh);
        assert_eq!(Command::try_from("t").unwrap(), Command::View(ViewMode::Tree));
        assert_eq!(Command::try_from("grid").unwrap(), Command::View(ViewMode::Grid));
        assert_eq!(
            Command::try_from("x location").unwrap(),
            Command::ToggleNode("location".to_string())
        );
        assert_eq!(Command::try_from("q").unwrap(), Command::Quit);

        assert!(Command::try_from("toggle").is_err());
        assert!(Command::try_from("r now").is_err());
        assert!(Command::try_from("").is_err());
    }
}
