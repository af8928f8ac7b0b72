pub mod bridge;
pub mod commands;
pub mod database;
pub mod editor;
pub mod runner;

pub type HandlerResult = anyhow::Result<()>;
