#![allow(dead_code)]

pub mod cropsage_env;
pub mod fixtures;
