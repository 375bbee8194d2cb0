//! The flight modes: the ascent state machine and stand-alone node execution, together with
//! the context they share and the signals their ticks return.

mod ascent_mode;
mod mode_context;
mod node_mode;
mod signal;

pub(crate) use ascent_mode::AscentController;
pub(crate) use mode_context::ModeContext;
pub(crate) use node_mode::execute_next_node;
