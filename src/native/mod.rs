pub mod app;
mod calculator_screen;
mod chat_screen;
mod dashboard_screen;
mod essay_screen;
pub mod prompt;
mod shell_screen;
pub mod theme;
mod theme_screen;
mod timer_screen;
mod todo_screen;
pub mod worker;

pub use app::{AppContext, StudyDeskApp};
