//! Async driver for [`AppController`].
//!
//! Effects run on tokio tasks; each task sends exactly one result action back
//! over an mpsc channel (a failure action if the effect panicked), which the
//! driver feeds into the reducer. The controller itself is only touched from
//! the task that owns the `App`.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::{
    controller::{Action, AppController, Effect},
    error::WeatherError,
    location::LocationProvider,
    provider::WeatherProvider,
};

#[derive(Debug)]
pub struct App {
    controller: AppController,
    provider: Arc<dyn WeatherProvider>,
    location: Arc<dyn LocationProvider>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    in_flight: usize,
}

impl App {
    pub fn new(
        controller: AppController,
        provider: Arc<dyn WeatherProvider>,
        location: Arc<dyn LocationProvider>,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self { controller, provider, location, action_tx, action_rx, in_flight: 0 }
    }

    pub fn controller(&self) -> &AppController {
        &self.controller
    }

    /// Number of effects whose result has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn search(&mut self, text: &str) {
        self.dispatch(Action::SearchSubmitted(text.to_string()));
    }

    pub fn press_location(&mut self) {
        let status = self.location.permission();
        self.dispatch(Action::LocationPressed(status));
    }

    pub fn toggle_unit(&mut self) {
        self.dispatch(Action::UnitToggled);
    }

    pub fn dispatch(&mut self, action: Action) {
        if let Some(effect) = self.controller.reduce(action) {
            self.spawn_effect(effect);
        }
    }

    /// Apply the next effect result. Returns `false` once nothing is in flight.
    pub async fn step(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.action_rx.recv().await {
            Some(action) => {
                self.in_flight -= 1;
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    /// Run until every outstanding effect (and any follow-up) has completed.
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    fn spawn_effect(&mut self, effect: Effect) {
        self.in_flight += 1;

        match effect {
            Effect::FetchWeather { generation, query } => {
                let provider = Arc::clone(&self.provider);
                self.spawn_guarded(
                    async move {
                        match provider.current(&query).await {
                            Ok(result) => Action::WeatherLoaded { generation, result },
                            Err(error) => Action::WeatherFailed { generation, error },
                        }
                    },
                    move |error| Action::WeatherFailed { generation, error },
                );
            }
            Effect::RequestPermission { generation } => {
                let location = Arc::clone(&self.location);
                self.spawn_guarded(
                    async move {
                        let status = location.request_permission().await;
                        Action::PermissionResolved { generation, status }
                    },
                    move |error| Action::LocationFailed { generation, error },
                );
            }
            Effect::LocateDevice { generation } => {
                let location = Arc::clone(&self.location);
                self.spawn_guarded(
                    async move {
                        match location.current_location().await {
                            Ok(coordinates) => {
                                Action::LocationResolved { generation, coordinates }
                            }
                            Err(error) => Action::LocationFailed { generation, error },
                        }
                    },
                    move |error| Action::LocationFailed { generation, error },
                );
            }
        }
    }

    /// Run `work` on its own task and always send exactly one action back,
    /// using `on_failure` when the task panics instead of producing one.
    fn spawn_guarded<F, E>(&self, work: F, on_failure: E)
    where
        F: Future<Output = Action> + Send + 'static,
        E: FnOnce(WeatherError) -> Action + Send + 'static,
    {
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let action = match tokio::spawn(work).await {
                Ok(action) => action,
                Err(e) => on_failure(WeatherError::Task(e)),
            };
            // receiver gone means the app shut down
            let _ = tx.send(action);
        });
    }
}
