// src/utils/mod.rs

pub mod date;
