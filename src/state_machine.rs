//! Turn-taking state machine
//!
//! Pure transitions in the Elm style: `(state, event) -> (state, effects)`.
//! All I/O happens in the runtime that executes the effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::Event;
pub use state::{NodeContext, NodeState};
pub use transition::transition;
