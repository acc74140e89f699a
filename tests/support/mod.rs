#![allow(dead_code)]
// Not every integration test binary uses every helper.

pub mod env;
pub mod pmml;
