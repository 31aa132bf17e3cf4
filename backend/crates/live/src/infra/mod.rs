//! Infrastructure Layer - Feed source adapters

pub mod demo;
pub mod openf1;
