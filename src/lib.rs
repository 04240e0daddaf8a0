//! Convention-based view resolution and render dispatch.
//!
//! Given a controller action, [`application::resolver::ViewResolver`] finds
//! the component class that renders it and
//! [`application::dispatch::RenderDispatcher`] turns the action's outcome
//! into a response built around that component.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
