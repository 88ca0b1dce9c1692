// frontend/src/runtime.rs
//
// Single consumer of the event queue. Producers (push listener, console,
// finished dispatch tasks) only ever send events; the dashboard state is
// touched from this loop alone.

use crate::config::DashboardConfig;
use crate::dashboard::{Dashboard, DashboardEvent, DashboardView, Outbound, Renderer};
use crate::dispatch::CommandDispatcher;
use std::time::Instant;
use tokio::sync::mpsc;

pub const EVENT_QUEUE_DEPTH: usize = 256;

pub struct Runtime<D, R> {
    dashboard: Dashboard,
    dispatcher: D,
    renderer: R,
    events_tx: mpsc::Sender<DashboardEvent>,
    events_rx: mpsc::Receiver<DashboardEvent>,
    last_view: Option<DashboardView>,
}

impl<D, R> Runtime<D, R>
where
    D: CommandDispatcher,
    R: Renderer,
{
    pub fn new(config: &DashboardConfig, dispatcher: D, renderer: R) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        Self {
            dashboard: Dashboard::new(config),
            dispatcher,
            renderer,
            events_tx,
            events_rx,
            last_view: None,
        }
    }

    /// Handle for producers. The loop itself holds one too, so it never sees
    /// the queue close; send [`DashboardEvent::Quit`] to stop it.
    pub fn sender(&self) -> mpsc::Sender<DashboardEvent> {
        self.events_tx.clone()
    }

    /// Process events until `Quit`. Returns the final dashboard state.
    pub async fn run(mut self) -> Dashboard {
        self.render_if_changed(Instant::now());

        loop {
            let deadline = self.dashboard.next_deadline(Instant::now());
            let event = tokio::select! {
                received = self.events_rx.recv() => match received {
                    Some(event) => event,
                    None => break,
                },
                _ = sleep_until(deadline) => DashboardEvent::Tick,
            };

            if event == DashboardEvent::Quit {
                log::info!("[UI] quit requested");
                break;
            }

            let now = Instant::now();
            if let Some(outbound) = self.dashboard.handle(event, now) {
                self.launch(outbound);
            }
            self.render_if_changed(now);
        }

        self.dashboard
    }

    fn render_if_changed(&mut self, now: Instant) {
        let view = self.dashboard.view(now);
        if self.last_view.as_ref() != Some(&view) {
            self.renderer.render(&view);
            self.last_view = Some(view);
        }
    }

    /// Commands run as their own tasks; the outcome re-enters the queue.
    fn launch(&self, outbound: Outbound) {
        let dispatcher = self.dispatcher.clone();
        let events = self.events_tx.clone();

        match outbound {
            Outbound::Dispatch { ticket, command } => {
                tokio::spawn(async move {
                    let outcome = dispatcher.send(command).await;
                    if let Err(e) = &outcome {
                        log::debug!("[CMD] {command} {ticket}: {e}");
                    }
                    let _ = events
                        .send(DashboardEvent::Settled { ticket, outcome })
                        .await;
                });
            }
            Outbound::FireAndForget(command) => {
                tokio::spawn(async move {
                    let outcome = dispatcher.send_unacknowledged(command).await;
                    let _ = events
                        .send(DashboardEvent::Delivered { command, outcome })
                        .await;
                });
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => std::future::pending::<()>().await,
    }
}
