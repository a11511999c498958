#![no_std]

pub mod operators;
