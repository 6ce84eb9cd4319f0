//! Search-and-display view.
//!
//! [`ViewController`] owns the state of one page: the typed and settled
//! search text, the "all movies" list and the trending list. [`render`]
//! turns that state into a [`PageView`]; [`SearchSession`] wires a
//! controller to a debouncer.

mod controller;
mod render;
mod session;
mod state;

pub use controller::{FetchOutcome, ViewController, ViewOptions};
pub use render::*;
pub use session::SearchSession;
pub use state::{ViewState, FETCH_ERROR_MESSAGE};
