pub mod lp;
pub mod power;
pub mod setup;
pub mod ui;
