//! Оверлей истории нажатий: перехват клавиатуры и мыши, фильтрация по активному
//! окну или привязанному источнику захвата и короткий затухающий список строк
//! ("Ctrl + C", "A x3", "Left Click") для отображения поверх экрана.

pub mod config;
pub mod error;
pub mod events;
pub mod mappings;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{KeystrokeError, Result};
