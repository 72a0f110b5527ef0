// src/handlers/mod.rs

pub mod trivia;
