pub mod chart;
pub mod setup;
pub mod table;
pub mod ui;
pub mod watch;
