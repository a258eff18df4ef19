// src/models/mod.rs

pub mod answer;
pub mod choice;
pub mod question;
