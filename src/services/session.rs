use crate::core::distance::DistanceUnit;
use crate::core::view_state::{Action, Effect, ViewState};
use crate::models::Location;
use crate::services::backend::HappeningSource;

/// Owns a [`ViewState`] and runs the fetches it asks for
///
/// Every action goes through [`Session::dispatch`]; a location or tag change
/// fetches once and replaces the list, a sort change only re-orders it.
pub struct Session<S> {
    state: ViewState,
    source: S,
}

impl<S: HappeningSource> Session<S> {
    pub fn new(source: S, unit: DistanceUnit) -> Self {
        Self {
            state: ViewState::new(unit),
            source,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Set the initial reference location, falling back when detection failed
    pub async fn start(&mut self, detected: Option<Location>, fallback: Option<Location>) {
        match detected.filter(Location::is_defined).or(fallback) {
            Some(location) => self.dispatch(Action::SetLocation(location)).await,
            None => {
                tracing::info!("No reference location yet, loading unfiltered by distance");
                self.dispatch(Action::Refresh).await;
            }
        }
    }

    pub async fn dispatch(&mut self, action: Action) {
        let Some(Effect::Fetch(request)) = self.state.dispatch(action) else {
            return;
        };

        let follow_up = match self.source.fetch_happenings(&request.query).await {
            Ok(happenings) => Action::FetchCompleted {
                generation: request.generation,
                happenings,
            },
            Err(e) => Action::FetchFailed {
                generation: request.generation,
                reason: e.to_string(),
            },
        };

        self.state.dispatch(follow_up);
    }
}
