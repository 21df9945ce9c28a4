//! Application glue
//!
//! [`Marquee`] owns every piece of runtime state: the render surface, the
//! radio capability, the shared message, the connectivity machine and the
//! scheduler. The firmware only has to call [`Marquee::run_due`] when a task
//! is due and hand inbound HTTP requests to [`Marquee::handle_request`]
//! in between.

use core::net::Ipv4Addr;

use marquee_hal::{MatrixDisplay, WifiRadio};

use crate::api::{self, parse_request, update_text, Method, Parse, Request, Response, SCROLL_PATH};
use crate::config::MarqueeConfig;
use crate::connectivity::{Connectivity, LinkEvent, LinkState, RetryPolicy};
use crate::message::{Message, MessageText};
use crate::render::{RenderError, RenderSurface};
use crate::scheduler::{Scheduler, SchedulerError, TaskControl};
use crate::scroll::ScrollEngine;

/// Periodic tasks, in registration (and priority) order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskId {
    /// Connectivity state machine tick
    Connect,
    /// Scroll engine tick
    Scroll,
}

/// Startup errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartError {
    /// Panel chain failed to initialize
    Render(RenderError),
    /// Task registration failed (already started)
    Scheduler(SchedulerError),
}

impl From<RenderError> for StartError {
    fn from(e: RenderError) -> Self {
        StartError::Render(e)
    }
}

impl From<SchedulerError> for StartError {
    fn from(e: SchedulerError) -> Self {
        StartError::Scheduler(e)
    }
}

/// The scroller application
pub struct Marquee<D, R> {
    config: MarqueeConfig,
    surface: RenderSurface<D>,
    radio: R,
    message: Message,
    scroll: ScrollEngine,
    link: Connectivity,
    scheduler: Scheduler<TaskId, 2>,
    listening: bool,
    address: Option<Ipv4Addr>,
}

impl<D: MatrixDisplay, R: WifiRadio> Marquee<D, R> {
    /// Assemble the application; nothing touches the hardware until [`start`](Self::start)
    pub fn new(config: MarqueeConfig, display: D, radio: R) -> Self {
        let surface = RenderSurface::new(display);
        let scroll = ScrollEngine::for_surface(&surface);
        let link = Connectivity::new(RetryPolicy::from(&config.connect));

        Self {
            config,
            surface,
            radio,
            message: Message::new(MessageText::default(), 0),
            scroll,
            link,
            scheduler: Scheduler::new(),
            listening: false,
            address: None,
        }
    }

    /// Initialize the panels, measure the default text and register both tasks
    ///
    /// Both tasks are first due at `now_ms`. If the panels fail to
    /// initialize, the error is returned but connectivity still runs; only
    /// the scroll task is left disabled.
    pub fn start(&mut self, now_ms: u64) -> Result<(), StartError> {
        let panels = self.surface.begin();

        let text = MessageText::new(&self.config.display.default_text).unwrap_or_default();
        let width = self.surface.measure(&text);
        self.message.replace(text, width);

        self.scheduler
            .register(TaskId::Connect, self.config.connect.check_interval_ms, now_ms)?;
        self.scheduler
            .register(TaskId::Scroll, self.config.display.scroll_interval_ms, now_ms)?;

        if let Err(e) = panels {
            error!("Display init failed: {}", e);
            self.scheduler.disable(TaskId::Scroll)?;
            return Err(e.into());
        }

        info!("Initialized");
        Ok(())
    }

    /// Run every task due at `now_ms`; returns how many ran
    pub fn run_due(&mut self, now_ms: u64) -> usize {
        let Self {
            config,
            surface,
            radio,
            message,
            scroll,
            link,
            scheduler,
            listening,
            address,
        } = self;

        scheduler.run_pending(now_ms, |id| match id {
            TaskId::Connect => {
                let event = link.tick(radio, &config.wifi);
                match event {
                    LinkEvent::Connected { address: addr } => {
                        info!("WiFi link up: {}", event);
                        *address = addr;
                        *listening = true;
                        info!("HTTP listener started on {}", SCROLL_PATH);
                        TaskControl::Disable
                    }
                    LinkEvent::Failed { .. } => {
                        error!("Giving up on WiFi; scrolling without remote updates");
                        TaskControl::Disable
                    }
                    LinkEvent::Inactive => TaskControl::Disable,
                    LinkEvent::Started | LinkEvent::Pending { .. } | LinkEvent::Retrying { .. } => {
                        trace!("WiFi link: {}", event);
                        TaskControl::Continue
                    }
                }
            }
            TaskId::Scroll => {
                if let Err(e) = scroll.tick(message, surface) {
                    warn!("Render failed: {}", e);
                }
                TaskControl::Continue
            }
        })
    }

    /// Earliest time any task is due
    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    /// Whether the HTTP listener has been activated
    pub fn listener_active(&self) -> bool {
        self.listening
    }

    /// Current connectivity state
    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    /// Address reported when the link came up
    pub fn local_address(&self) -> Option<Ipv4Addr> {
        self.address
    }

    /// Current message
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Task scheduler
    pub fn scheduler(&self) -> &Scheduler<TaskId, 2> {
        &self.scheduler
    }

    /// Get access to the display
    pub fn display(&self) -> &D {
        self.surface.display()
    }

    /// Get access to the radio
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// Handle one raw, fully received HTTP request
    pub fn handle_request(&mut self, raw: &[u8]) -> Response {
        if !self.listening {
            return api::NOT_READY;
        }
        match parse_request(raw) {
            Ok(Parse::Complete(request)) => self.handle_parsed(&request),
            // Caller stopped reading before the declared body arrived
            Ok(Parse::Incomplete) => api::BAD_REQUEST,
            Err(e) => {
                debug!("Unparseable request: {}", e);
                e.into()
            }
        }
    }

    /// Route a parsed request
    pub fn handle_parsed(&mut self, request: &Request<'_>) -> Response {
        if !self.listening {
            return api::NOT_READY;
        }
        if request.path != SCROLL_PATH {
            return api::NOT_FOUND;
        }
        if request.method != Method::Post {
            return api::METHOD_NOT_ALLOWED;
        }

        let surface = &self.surface;
        update_text(request.body, &mut self.message, |text| surface.measure(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, UPDATED};
    use crate::mock::{mock_text_width, DisplayOp, MockDisplay, ScriptedRadio};

    fn config() -> MarqueeConfig {
        let mut config = MarqueeConfig::default();
        let _ = config.wifi.ssid.push_str("workshop");
        let _ = config.wifi.password.push_str("hunter22");
        config
    }

    fn app(radio: ScriptedRadio) -> Marquee<MockDisplay, ScriptedRadio> {
        let mut app = Marquee::new(config(), MockDisplay::new(4, 32), radio);
        app.start(0).unwrap();
        app
    }

    /// Drive the app the way the firmware loop does: wake at each due time
    fn run_until(app: &mut Marquee<MockDisplay, ScriptedRadio>, end_ms: u64) {
        while let Some(due) = app.next_due() {
            if due > end_ms {
                break;
            }
            app.run_due(due);
        }
    }

    fn post(body: &str) -> std::string::String {
        format!(
            "POST /api/scroll HTTP/1.1\r\nHost: marquee\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        )
    }

    #[test]
    fn test_startup_sequence() {
        let app = app(ScriptedRadio::unreachable());

        assert_eq!(app.display().ops, vec![DisplayOp::Begin]);
        assert_eq!(app.message().text(), "Hello, how are you?");
        assert_eq!(
            app.message().pixel_width(),
            mock_text_width("Hello, how are you?")
        );
        assert_eq!(app.link_state(), LinkState::Idle);
        assert!(!app.listener_active());
        assert_eq!(app.next_due(), Some(0));
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut app = app(ScriptedRadio::unreachable());
        assert_eq!(
            app.start(5),
            Err(StartError::Scheduler(SchedulerError::Duplicate))
        );
    }

    #[test]
    fn test_first_step_runs_connect_then_scroll() {
        let mut app = app(ScriptedRadio::unreachable());

        assert_eq!(app.run_due(0), 2);
        assert_eq!(app.link_state(), LinkState::Verifying);
        assert_eq!(app.radio().connect_count(), 1);
        assert_eq!(app.display().draws().len(), 4);
        assert_eq!(app.message().scroll_offset(), 1);
        assert_eq!(app.next_due(), Some(80));
    }

    #[test]
    fn test_scroll_keeps_cadence_while_connecting() {
        let mut app = app(ScriptedRadio::unreachable());

        run_until(&mut app, 999);

        assert_eq!(app.scheduler().runs(TaskId::Connect), Some(1));
        // 0, 80, ..., 960
        assert_eq!(app.scheduler().runs(TaskId::Scroll), Some(13));
        assert_eq!(app.message().scroll_offset(), 13);
    }

    #[test]
    fn test_listener_starts_on_connect() {
        let mut app = app(ScriptedRadio::connects_after(2));

        run_until(&mut app, 2999);
        assert!(!app.listener_active());
        assert_eq!(app.link_state(), LinkState::Verifying);

        run_until(&mut app, 3000);
        assert!(app.listener_active());
        assert_eq!(app.link_state(), LinkState::Connected);
        assert_eq!(
            app.local_address(),
            Some(Ipv4Addr::new(192, 168, 1, 42))
        );
        assert!(!app.scheduler().is_enabled(TaskId::Connect));

        run_until(&mut app, 60_000);
        assert_eq!(app.scheduler().runs(TaskId::Connect), Some(4));
        assert!(app.scheduler().is_enabled(TaskId::Scroll));
    }

    #[test]
    fn test_degraded_mode_after_deadline() {
        let mut app = app(ScriptedRadio::unreachable());

        run_until(&mut app, 60_000);

        assert_eq!(app.link_state(), LinkState::Failed);
        assert!(!app.listener_active());
        // Activation tick plus 30 checks, then disabled
        assert_eq!(app.scheduler().runs(TaskId::Connect), Some(31));
        assert_eq!(app.radio().queries.get(), 30);
        assert!(app.scheduler().is_enabled(TaskId::Scroll));
        assert_eq!(app.scheduler().runs(TaskId::Scroll), Some(751));
    }

    #[test]
    fn test_requests_rejected_until_listening() {
        let mut app = app(ScriptedRadio::unreachable());
        let before = app.message().clone();

        let resp = app.handle_request(post(r#"{"text":"early"}"#).as_bytes());

        assert_eq!(resp, api::NOT_READY);
        assert_eq!(app.message(), &before);
    }

    #[test]
    fn test_update_then_render_from_right_edge() {
        let mut app = app(ScriptedRadio::new(vec![marquee_hal::LinkStatus::Connected]));
        run_until(&mut app, 1000);
        assert!(app.listener_active());
        assert!(app.message().scroll_offset() > 0);

        let resp = app.handle_request(post(r#"{"text":"Sale today"}"#).as_bytes());
        assert_eq!(resp, UPDATED);
        assert_eq!(app.message().text(), "Sale today");
        assert_eq!(app.message().pixel_width(), mock_text_width("Sale today"));
        assert_eq!(app.message().scroll_offset(), 0);

        let drawn = app.display().draws().len();
        run_until(&mut app, 1040);
        let draws = app.display().draws();
        assert_eq!(
            draws[drawn..].to_vec(),
            vec![
                (0, "Sale today".to_string(), 128),
                (1, "Sale today".to_string(), 96),
                (2, "Sale today".to_string(), 64),
                (3, "Sale today".to_string(), 32),
            ]
        );
    }

    #[test]
    fn test_routing() {
        let mut app = app(ScriptedRadio::new(vec![marquee_hal::LinkStatus::Connected]));
        run_until(&mut app, 1000);
        let before = app.message().clone();

        let get = b"GET /api/scroll HTTP/1.1\r\n\r\n";
        assert_eq!(app.handle_request(get), api::METHOD_NOT_ALLOWED);

        let other = b"POST /api/other HTTP/1.1\r\nContent-Length: 2\r\n\r\n{}";
        assert_eq!(app.handle_request(other), api::NOT_FOUND);

        assert_eq!(app.handle_request(b"garbage\r\n\r\n"), api::BAD_REQUEST);

        let huge = b"POST /api/scroll HTTP/1.1\r\nContent-Length: 5000\r\n\r\n";
        assert_eq!(app.handle_request(huge), api::PAYLOAD_TOO_LARGE);

        let truncated = b"POST /api/scroll HTTP/1.1\r\nContent-Length: 20\r\n\r\n{\"te";
        assert_eq!(app.handle_request(truncated), api::BAD_REQUEST);

        assert_eq!(app.message(), &before);
    }

    #[test]
    fn test_endpoint_errors_leave_message() {
        let mut app = app(ScriptedRadio::new(vec![marquee_hal::LinkStatus::Connected]));
        run_until(&mut app, 1000);
        let before = app.message().clone();

        let no_body = b"POST /api/scroll HTTP/1.1\r\n\r\n";
        assert_eq!(app.handle_request(no_body), ApiError::NoBody.response());
        assert_eq!(
            app.handle_request(post(r#"{"text":7}"#).as_bytes()),
            ApiError::NotAString.response()
        );
        assert_eq!(app.message(), &before);
    }

    #[test]
    fn test_display_init_failure_keeps_connectivity() {
        let mut display = MockDisplay::new(4, 32);
        display.fail_begin = true;
        let radio = ScriptedRadio::new(vec![marquee_hal::LinkStatus::Connected]);
        let mut app = Marquee::new(config(), display, radio);

        assert_eq!(
            app.start(0),
            Err(StartError::Render(RenderError::Display(
                marquee_hal::DisplayError::Communication
            )))
        );
        assert!(app.scheduler().is_enabled(TaskId::Connect));
        assert!(!app.scheduler().is_enabled(TaskId::Scroll));

        run_until(&mut app, 5000);

        assert_eq!(app.link_state(), LinkState::Connected);
        assert!(app.listener_active());
        assert_eq!(app.scheduler().runs(TaskId::Scroll), Some(0));
        assert!(app.display().draws().is_empty());

        let resp = app.handle_request(post(r#"{"text":"still reachable"}"#).as_bytes());
        assert_eq!(resp, UPDATED);
        assert_eq!(app.message().text(), "still reachable");
    }

    #[test]
    fn test_render_errors_do_not_stop_scrolling() {
        let mut display = MockDisplay::new(4, 32);
        display.fail_flush = true;
        let mut app = Marquee::new(config(), display, ScriptedRadio::unreachable());
        app.start(0).unwrap();

        run_until(&mut app, 400);

        assert_eq!(app.scheduler().runs(TaskId::Scroll), Some(6));
        assert!(app.scheduler().is_enabled(TaskId::Scroll));
        assert_eq!(app.message().scroll_offset(), 0);
    }
}
