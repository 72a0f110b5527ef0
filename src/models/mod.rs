// src/models/mod.rs

pub mod manual;
pub mod question;
pub mod quiz;
pub mod reference;
