//! Integration tests for the editing core.
//!
//! `properties` drives the store and validator with seeded random edit
//! sequences and checks the layout invariants after every step.
//! `editor_flow` runs the whole `LayoutPlugin` headless through `TestEditor`.

mod editor_flow;
mod properties;
