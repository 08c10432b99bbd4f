//! # Bifrost Core
//!
//! Core library for the Bifrost Ethereum JSON-RPC relay.
//!
//! The relay accepts the `eth_*` namespace from unmodified Ethereum clients
//! and satisfies it by composing queries against two backends of an
//! alternative distributed ledger:
//!
//! - **[`clients::MirrorPort`]**: a read-optimized REST indexer ("mirror
//!   node") serving blocks, contract results, logs and network fees.
//!
//! - **[`clients::ConsensusPort`]**: the write-capable native-protocol
//!   client, used for transaction submission, view calls and point-in-time
//!   reads (balances, bytecode, nonces).
//!
//! The translation engine lives in [`eth`]: per-method handlers, block-tag
//! resolution, fee-history synthesis, log query planning, transaction
//! submission with pre-checks and receipt assembly from heterogeneous
//! sources, backed by the short-lived result cache in [`cache`].
//!
//! ## Request Flow
//!
//! ```text
//! eth_* request
//!       │
//!       ▼
//! ┌──────────────┐
//! │  EthService  │ ── unsupported ──► UNSUPPORTED_METHOD error value
//! │  (dispatch)  │ ── constant    ──► fixed response
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │ Cache Check  │ ── hit ──► cached response
//! └──────┬───────┘
//!        │ miss
//!        ▼
//! ┌──────────────┐     not indexed /     ┌────────────────┐
//! │  MirrorPort  │ ─── write path ─────► │  ConsensusPort │
//! │  (REST read) │                       │  (native SDK)  │
//! └──────┬───────┘                       └───────┬────────┘
//!        │                                       │
//!        └──────────────┬────────────────────────┘
//!                       ▼
//!          Ethereum-shaped translation
//!          (hashes 66 chars, addresses 42 chars,
//!           minimal hex numbers, tinybar × 10¹⁰)
//! ```
//!
//! A correlation id ([`types::RequestId`]) is threaded through every handler
//! and emitted as a structured `tracing` field for log attribution.

pub mod cache;
pub mod clients;
pub mod config;
pub mod eth;
pub mod types;
pub mod utils;
