//! Application state and the reducer that drives it.
//!
//! The reducer is synchronous and side-effect free: it takes an [`Action`],
//! updates [`AppController`] and returns the [`Effect`] (if any) the driver
//! should run. Results of effects come back as actions, so display state is
//! only ever touched here.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    clock::Clock,
    error::WeatherError,
    icon::{Icon, classify},
    location::PermissionStatus,
    model::{Coordinates, WeatherQuery, WeatherResult},
    units::{TemperatureUnit, to_display},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingLocationPermission,
    Loading,
    Displaying,
    Failed,
}

/// Session-lifetime display preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayState {
    pub unit: TemperatureUnit,
}

/// Everything the screen shows, derived from the held result.
#[derive(Debug, Clone, PartialEq)]
pub struct Display {
    pub location_label: String,
    pub temperature: String,
    pub condition_text: String,
    pub icon: Icon,
}

#[derive(Debug)]
pub enum Action {
    // user input
    SearchSubmitted(String),
    LocationPressed(PermissionStatus),
    UnitToggled,

    // effect results
    PermissionResolved { generation: u64, status: PermissionStatus },
    LocationResolved { generation: u64, coordinates: Coordinates },
    LocationFailed { generation: u64, error: WeatherError },
    WeatherLoaded { generation: u64, result: WeatherResult },
    WeatherFailed { generation: u64, error: WeatherError },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchWeather { generation: u64, query: WeatherQuery },
    RequestPermission { generation: u64 },
    LocateDevice { generation: u64 },
}

#[derive(Debug, Clone)]
struct Loaded {
    result: WeatherResult,
    is_daytime: bool,
}

#[derive(Debug)]
pub struct AppController {
    phase: Phase,
    display_state: DisplayState,
    loaded: Option<Loaded>,
    last_error: Option<String>,
    /// Latest request; results tagged with an older generation are dropped.
    generation: u64,
    clock: Arc<dyn Clock>,
}

impl AppController {
    pub fn new(unit: TemperatureUnit, clock: Arc<dyn Clock>) -> Self {
        Self {
            phase: Phase::Idle,
            display_state: DisplayState { unit },
            loaded: None,
            last_error: None,
            generation: 0,
            clock,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn display_state(&self) -> DisplayState {
        self.display_state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn result(&self) -> Option<&WeatherResult> {
        self.loaded.as_ref().map(|l| &l.result)
    }

    /// Render the held result with the current display state.
    pub fn display(&self) -> Option<Display> {
        let loaded = self.loaded.as_ref()?;
        let result = &loaded.result;

        Some(Display {
            location_label: result.location_name.clone(),
            temperature: to_display(result.temperature_c, self.display_state.unit),
            condition_text: result.condition_text.clone(),
            icon: classify(result.condition_code, &result.condition_text, loaded.is_daytime),
        })
    }

    pub fn reduce(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::SearchSubmitted(text) => {
                let query = match WeatherQuery::text(&text) {
                    Ok(query) => query,
                    Err(e) => {
                        debug!("ignoring search: {e}");
                        return None;
                    }
                };
                self.last_error = None;
                let generation = self.begin_request();
                Some(Effect::FetchWeather { generation, query })
            }

            Action::LocationPressed(status) => {
                self.last_error = None;
                match status {
                    PermissionStatus::Granted => {
                        let generation = self.begin_request();
                        Some(Effect::LocateDevice { generation })
                    }
                    PermissionStatus::NotDetermined => {
                        let generation = self.next_generation();
                        self.phase = Phase::AwaitingLocationPermission;
                        Some(Effect::RequestPermission { generation })
                    }
                    PermissionStatus::Denied => {
                        // still supersedes whatever was in flight
                        self.next_generation();
                        self.permission_denied();
                        None
                    }
                }
            }

            Action::UnitToggled => {
                self.display_state.unit = self.display_state.unit.toggle();
                None
            }

            Action::PermissionResolved { generation, status } => {
                if self.is_stale(generation) {
                    return None;
                }
                match status {
                    PermissionStatus::Granted => {
                        self.phase = Phase::Loading;
                        Some(Effect::LocateDevice { generation })
                    }
                    PermissionStatus::NotDetermined | PermissionStatus::Denied => {
                        self.permission_denied();
                        None
                    }
                }
            }

            Action::LocationResolved { generation, coordinates } => {
                if self.is_stale(generation) {
                    return None;
                }
                debug!(%coordinates, "device location resolved");
                Some(Effect::FetchWeather {
                    generation,
                    query: WeatherQuery::Coordinates(coordinates),
                })
            }

            Action::WeatherLoaded { generation, result } => {
                if self.is_stale(generation) {
                    return None;
                }
                info!(
                    location = %result.location_name,
                    temp_c = result.temperature_c,
                    code = result.condition_code,
                    "weather loaded"
                );
                self.loaded = Some(Loaded { result, is_daytime: self.clock.is_daytime() });
                self.last_error = None;
                self.phase = Phase::Displaying;
                None
            }

            Action::LocationFailed { generation, error }
            | Action::WeatherFailed { generation, error } => {
                if self.is_stale(generation) {
                    return None;
                }
                warn!("weather lookup failed: {error}");
                self.last_error = Some(error.to_string());
                self.phase = Phase::Failed;
                None
            }
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn begin_request(&mut self) -> u64 {
        self.phase = Phase::Loading;
        self.next_generation()
    }

    fn is_stale(&self, generation: u64) -> bool {
        let stale = generation != self.generation;
        if stale {
            debug!(generation, current = self.generation, "dropping stale result");
        }
        stale
    }

    fn permission_denied(&mut self) {
        warn!("location access not granted");
        self.last_error = Some(WeatherError::PermissionDenied.to_string());
        self.phase = if self.loaded.is_some() { Phase::Displaying } else { Phase::Idle };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn controller_at(hour: u32) -> AppController {
        AppController::new(TemperatureUnit::Celsius, Arc::new(FixedClock(hour)))
    }

    fn paris() -> WeatherResult {
        WeatherResult {
            location_name: "Paris".into(),
            temperature_c: 18.0,
            condition_text: "Cloudy".into(),
            condition_code: 1009,
        }
    }

    fn load(c: &mut AppController, result: WeatherResult) {
        let Some(Effect::FetchWeather { generation, .. }) =
            c.reduce(Action::SearchSubmitted(result.location_name.clone()))
        else {
            panic!("search must start a fetch");
        };
        c.reduce(Action::WeatherLoaded { generation, result });
    }

    #[test]
    fn search_starts_fetch_and_load_displays() {
        let mut c = controller_at(14);

        let effect = c.reduce(Action::SearchSubmitted("  Paris ".into()));
        assert_eq!(
            effect,
            Some(Effect::FetchWeather { generation: 1, query: WeatherQuery::Text("Paris".into()) })
        );
        assert_eq!(c.phase(), Phase::Loading);

        c.reduce(Action::WeatherLoaded { generation: 1, result: paris() });

        assert_eq!(c.phase(), Phase::Displaying);
        let display = c.display().expect("display after load");
        assert_eq!(display.location_label, "Paris");
        assert_eq!(display.temperature, "18.0°C");
        assert_eq!(display.condition_text, "Cloudy");
        assert_eq!(display.icon, Icon::Cloud);
    }

    #[test]
    fn night_load_picks_night_icon() {
        let mut c = controller_at(22);
        load(&mut c, paris());
        assert_eq!(c.display().unwrap().icon, Icon::CloudMoon);
    }

    #[test]
    fn empty_search_is_a_no_op() {
        let mut c = controller_at(14);

        assert_eq!(c.reduce(Action::SearchSubmitted("   ".into())), None);
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.last_error().is_none());
    }

    #[test]
    fn toggle_rerenders_from_canonical_celsius() {
        let mut c = controller_at(14);
        load(&mut c, paris());

        let before = c.display().unwrap().temperature;
        c.reduce(Action::UnitToggled);
        assert_eq!(c.display().unwrap().temperature, "64.4°F");
        c.reduce(Action::UnitToggled);
        assert_eq!(c.display().unwrap().temperature, before);
        assert_eq!(c.result().unwrap().temperature_c, 18.0);
    }

    #[test]
    fn toggle_without_result_only_flips_unit() {
        let mut c = controller_at(14);

        assert_eq!(c.reduce(Action::UnitToggled), None);
        assert_eq!(c.display_state().unit, TemperatureUnit::Fahrenheit);
        assert!(c.display().is_none());
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn failure_keeps_previous_display() {
        let mut c = controller_at(14);
        load(&mut c, paris());

        let Some(Effect::FetchWeather { generation, .. }) =
            c.reduce(Action::SearchSubmitted("Nowhere".into()))
        else {
            panic!("search must start a fetch");
        };
        c.reduce(Action::WeatherFailed {
            generation,
            error: WeatherError::Api { status: 400, message: "No matching location found.".into() },
        });

        assert_eq!(c.phase(), Phase::Failed);
        assert!(c.last_error().unwrap().contains("No matching location found."));
        assert_eq!(c.display().unwrap().location_label, "Paris");
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut c = controller_at(14);

        c.reduce(Action::SearchSubmitted("Paris".into()));
        c.reduce(Action::SearchSubmitted("Berlin".into()));

        // the older request answers last
        let berlin = WeatherResult { location_name: "Berlin".into(), ..paris() };
        c.reduce(Action::WeatherLoaded { generation: 2, result: berlin });
        c.reduce(Action::WeatherLoaded { generation: 1, result: paris() });
        c.reduce(Action::WeatherFailed {
            generation: 1,
            error: WeatherError::InvalidInput("late".into()),
        });

        assert_eq!(c.phase(), Phase::Displaying);
        assert_eq!(c.display().unwrap().location_label, "Berlin");
        assert!(c.last_error().is_none());
    }

    #[test]
    fn granted_location_locates_then_fetches_coordinates() {
        let mut c = controller_at(14);

        let effect = c.reduce(Action::LocationPressed(PermissionStatus::Granted));
        assert_eq!(effect, Some(Effect::LocateDevice { generation: 1 }));
        assert_eq!(c.phase(), Phase::Loading);

        let coordinates = Coordinates::new(48.85, 2.35);
        let effect = c.reduce(Action::LocationResolved { generation: 1, coordinates });
        assert_eq!(
            effect,
            Some(Effect::FetchWeather {
                generation: 1,
                query: WeatherQuery::Coordinates(coordinates)
            })
        );
    }

    #[test]
    fn undetermined_permission_waits_then_proceeds_on_grant() {
        let mut c = controller_at(14);

        let effect = c.reduce(Action::LocationPressed(PermissionStatus::NotDetermined));
        assert_eq!(effect, Some(Effect::RequestPermission { generation: 1 }));
        assert_eq!(c.phase(), Phase::AwaitingLocationPermission);

        let effect = c.reduce(Action::PermissionResolved {
            generation: 1,
            status: PermissionStatus::Granted,
        });
        assert_eq!(effect, Some(Effect::LocateDevice { generation: 1 }));
        assert_eq!(c.phase(), Phase::Loading);
    }

    #[test]
    fn denied_permission_returns_to_idle_without_fetch() {
        let mut c = controller_at(14);

        c.reduce(Action::LocationPressed(PermissionStatus::NotDetermined));
        let effect = c.reduce(Action::PermissionResolved {
            generation: 1,
            status: PermissionStatus::Denied,
        });

        assert_eq!(effect, None);
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.last_error(), Some("Location permission denied"));

        assert_eq!(c.reduce(Action::LocationPressed(PermissionStatus::Denied)), None);
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn late_permission_answer_does_not_hijack_search() {
        let mut c = controller_at(14);

        c.reduce(Action::LocationPressed(PermissionStatus::NotDetermined));
        c.reduce(Action::SearchSubmitted("Paris".into()));

        let effect = c.reduce(Action::PermissionResolved {
            generation: 1,
            status: PermissionStatus::Granted,
        });
        assert_eq!(effect, None);
        assert_eq!(c.phase(), Phase::Loading);
    }

    #[test]
    fn location_press_supersedes_search_in_flight() {
        let mut c = controller_at(14);

        let Some(Effect::FetchWeather { generation: search, .. }) =
            c.reduce(Action::SearchSubmitted("Paris".into()))
        else {
            panic!("search must start a fetch");
        };
        let Some(Effect::RequestPermission { generation: prompt }) =
            c.reduce(Action::LocationPressed(PermissionStatus::NotDetermined))
        else {
            panic!("undetermined permission must prompt");
        };
        assert!(prompt > search);

        // the search answers while the prompt is still open
        assert_eq!(c.reduce(Action::WeatherLoaded { generation: search, result: paris() }), None);
        assert_eq!(c.phase(), Phase::AwaitingLocationPermission);
        assert!(c.display().is_none());

        let effect = c.reduce(Action::PermissionResolved {
            generation: prompt,
            status: PermissionStatus::Granted,
        });
        assert_eq!(effect, Some(Effect::LocateDevice { generation: prompt }));
        assert_eq!(c.phase(), Phase::Loading);
    }

    #[test]
    fn denied_press_during_search_drops_the_search() {
        let mut c = controller_at(14);

        let Some(Effect::FetchWeather { generation, .. }) =
            c.reduce(Action::SearchSubmitted("Paris".into()))
        else {
            panic!("search must start a fetch");
        };
        c.reduce(Action::LocationPressed(PermissionStatus::Denied));
        assert_eq!(c.phase(), Phase::Idle);

        c.reduce(Action::WeatherLoaded { generation, result: paris() });
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.display().is_none());
    }

    #[test]
    fn location_failure_is_reported() {
        let mut c = controller_at(14);

        c.reduce(Action::LocationPressed(PermissionStatus::Granted));
        c.reduce(Action::LocationFailed {
            generation: 1,
            error: WeatherError::Location("no fix".into()),
        });

        assert_eq!(c.phase(), Phase::Failed);
        assert_eq!(c.last_error(), Some("Location unavailable: no fix"));
        assert!(c.display().is_none());
    }
}
