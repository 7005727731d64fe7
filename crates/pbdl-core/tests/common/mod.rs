#![allow(dead_code)]

pub mod fake_ytdlp;
pub mod scripted;
