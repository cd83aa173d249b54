pub mod detect;
pub mod lookup;
pub mod setup;
pub mod ui;
