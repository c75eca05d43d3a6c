//! Git history mining: commit records, change statistics, and file inventory.
//!
//! History is read through the [`gateway::HistoryQuery`] trait, backed either
//! by libgit2 ([`libgit::Git2Gateway`]) or by the `git` CLI
//! ([`command::GitCliGateway`]). Query failures degrade to empty text and are
//! reported alongside the mined records instead of aborting the run.

pub mod command;
pub mod gateway;
pub mod inventory;
pub mod libgit;
pub mod parser;
mod pool;

#[cfg(test)]
mod test_support;
