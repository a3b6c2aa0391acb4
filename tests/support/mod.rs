#![allow(dead_code)]

pub mod payments_backend;
pub mod scripted_payment_source;
