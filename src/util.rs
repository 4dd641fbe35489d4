//! Shared utility modules used across Sentindex components.

pub mod varint;
