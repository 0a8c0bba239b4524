//! Step-by-step state of the recipe open in the detail view
//!
//! A session is created when a recipe is opened and dropped when the
//! detail view is dismissed, so every open starts at the first step.
use super::data::RecipeSummary;
use crate::error::NavigationError;

/// Message shown in place of the counter when a recipe has no steps
pub const NO_STEPS_MESSAGE: &str = "No step-by-step instructions available.";

/// Where the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The recipe has no steps
    Empty,
    /// One step is displayed
    AtStep(usize),
    /// Every step is displayed at once
    ShowingAll,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailSession {
    recipe_id: String,
    steps: Vec<String>,
    image: Option<String>,
    state: SessionState,
}

impl DetailSession {
    /// Start a session on `recipe`, at step 0 (or `Empty`)
    pub fn open(recipe: &RecipeSummary) -> Self {
        let steps = recipe.step_list();
        let state = if steps.is_empty() {
            SessionState::Empty
        } else {
            SessionState::AtStep(0)
        };
        Self {
            recipe_id: recipe.name.clone(),
            steps,
            image: recipe.image_ref().map(str::to_string),
            state,
        }
    }

    pub fn recipe_id(&self) -> &str {
        &self.recipe_id
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Index of the displayed step, if a single step is displayed
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            SessionState::AtStep(i) => Some(i),
            _ => None,
        }
    }

    /// Jump to `index`, clamped into the step range
    pub fn go_to(&mut self, index: isize) -> Result<usize, NavigationError> {
        match self.state {
            SessionState::Empty => Err(NavigationError::NoSteps),
            SessionState::ShowingAll => Err(NavigationError::ShowingAll),
            SessionState::AtStep(_) => {
                let last = self.steps.len() as isize - 1;
                let clamped = index.clamp(0, last) as usize;
                self.state = SessionState::AtStep(clamped);
                Ok(clamped)
            }
        }
    }

    pub fn next(&mut self) -> Result<usize, NavigationError> {
        let current = self.current_index().unwrap_or(0) as isize;
        self.go_to(current + 1)
    }

    pub fn previous(&mut self) -> Result<usize, NavigationError> {
        let current = self.current_index().unwrap_or(0) as isize;
        self.go_to(current - 1)
    }

    pub fn can_go_previous(&self) -> bool {
        matches!(self.state, SessionState::AtStep(i) if i > 0)
    }

    pub fn can_go_next(&self) -> bool {
        matches!(self.state, SessionState::AtStep(i) if i + 1 < self.steps.len())
    }

    /// Every step on its own line, numbered from 1.
    ///
    /// Switches to [`SessionState::ShowingAll`]; returns an empty string and
    /// leaves the state alone when there are no steps.
    pub fn all_steps_text(&mut self) -> String {
        if self.steps.is_empty() {
            return String::new();
        }
        self.state = SessionState::ShowingAll;
        self.numbered_steps()
    }

    /// Counter line: "Step i of n", "All Steps", or the no-steps message
    pub fn counter(&self) -> String {
        match self.state {
            SessionState::Empty => NO_STEPS_MESSAGE.to_string(),
            SessionState::AtStep(i) => format!("Step {} of {}", i + 1, self.steps.len()),
            SessionState::ShowingAll => "All Steps".to_string(),
        }
    }

    /// Text of the displayed step, or every step when showing all
    pub fn step_text(&self) -> String {
        match self.state {
            SessionState::Empty => String::new(),
            SessionState::AtStep(i) => self.steps[i].clone(),
            SessionState::ShowingAll => self.numbered_steps(),
        }
    }

    fn numbered_steps(&self) -> String {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
