use crate::errors::CoreError;
use crate::models::calculation::Calculation;

/// Whether a calculation is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
}

/// Something that happened to the form.
#[derive(Debug, Clone)]
pub enum Action {
    /// The user pressed "Calculate".
    Submitted,
    Succeeded(Calculation),
    Failed(String),
}

impl Action {
    /// Map a calculator result to the action that should follow `Submitted`.
    pub fn from_result(result: Result<Calculation, CoreError>) -> Self {
        match result {
            Ok(calculation) => Action::Succeeded(calculation),
            Err(e) => Action::Failed(e.user_message()),
        }
    }
}

/// Presentation-side view state, replaced wholesale on every transition.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub status: Status,
    pub error: Option<String>,
    /// Most recent complete result. A failure leaves it in place.
    pub last: Option<Calculation>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn should_render_chart(&self) -> bool {
        self.last.as_ref().is_some_and(Calculation::has_chart)
    }

    pub fn reduce(self, action: Action) -> ViewState {
        match action {
            // busy: a second submit is dropped
            Action::Submitted if self.is_busy() => self,
            Action::Submitted => ViewState {
                status: Status::Loading,
                error: None,
                last: self.last,
            },
            Action::Succeeded(calculation) => ViewState {
                status: Status::Idle,
                error: None,
                last: Some(calculation),
            },
            Action::Failed(message) => ViewState {
                status: Status::Idle,
                error: Some(message),
                last: self.last,
            },
        }
    }
}
