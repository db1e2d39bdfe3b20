pub mod app;
pub mod controller;
pub mod generators;
pub mod maze;
