pub mod app;
pub mod gallery;
pub mod theme;
pub mod view;
pub mod window;
