pub mod engine;
pub mod seed;
pub mod simulation;
pub mod web;
