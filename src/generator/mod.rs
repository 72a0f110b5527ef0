// src/generator/mod.rs

//! Daily quiz assembly.
//!
//! `assembler` drives a run: four procedural questions built from reference
//! data (`procedural`, with distractors from `sampler`), then manual questions
//! scheduled for today, then manual questions from categories picked by
//! `balancer`, all copied in by `manual`.

pub mod assembler;
pub mod balancer;
pub mod landmass;
pub mod manual;
pub mod procedural;
pub mod sampler;

pub use assembler::{AssemblyStage, GenerationSettings, QuizAssembler};
