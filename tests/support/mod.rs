#![allow(dead_code)]

pub mod history_env;
pub mod scene;
