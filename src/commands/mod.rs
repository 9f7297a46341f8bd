//! Menu actions: prompt, call the synchronizer, print the result.
pub mod connect;
pub mod list;
pub mod rules;
pub mod update;
