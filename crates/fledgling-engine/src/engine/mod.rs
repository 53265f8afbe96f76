//! Simulation engine: obstacle lifecycle, sessions, and the policy
//! boundary.
//!
//! This module provides the per-tick update logic on top of the core
//! data types:
//!
//! - [`PipeStream`] - spawn/scroll/reap lifecycle with seeded gate
//!   randomness
//! - [`GameSession`] - single-agent session state machine (menu, play,
//!   game over)
//! - [`Cohort`] - multi-agent evaluation step with fitness accounting
//! - [`JumpPolicy`] - the decision capability both controller kinds
//!   implement
//! - [`Backdrop`] - looping background offset for the external renderer
//!
//! # Control flow
//!
//! A driver owns the tick loop; a tick is atomic from its perspective.
//! For the arcade session the driver feeds [`ControlEvent`]s into the
//! state machine and calls [`GameSession::tick`] once per tick. For
//! policy evaluation it builds a [`Cohort`] from boxed policies and
//! calls [`Cohort::step`] until the step reports extinction.
//!
//! # Example
//!
//! ```
//! use fledgling_engine::{ControlEvent, GameSession, GateBounds, InputPolicy};
//!
//! let mut session = GameSession::new(GateBounds::ARCADE);
//! let mut policy = InputPolicy::new(session.jump_signal());
//!
//! assert!(session.state().is_menu());
//! assert!(session.handle_control(ControlEvent::Start).is_continue());
//! assert!(session.state().is_playing());
//!
//! // A latched jump press is consumed by the next tick.
//! assert!(session.handle_control(ControlEvent::Flap).is_continue());
//! session.tick(&mut policy);
//!
//! assert!(session.handle_control(ControlEvent::Quit).is_break());
//! ```

pub use self::{backdrop::*, cohort::*, pipe_stream::*, policy::*, session::*};

mod backdrop;
mod cohort;
mod pipe_stream;
mod policy;
mod session;
