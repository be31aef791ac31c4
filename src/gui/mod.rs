pub mod app;
pub(crate) mod draw;
