pub mod carousel;
pub mod config;
pub mod events;
pub mod gui;
pub mod macros;
pub mod motion;
pub mod stage;
