mod common;

mod catalog;
mod forms;
