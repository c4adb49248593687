//! Agency Core - domain types and write-through stores.
//!
//! This crate holds everything the storefront knows about carts, checkout
//! drafts, and the service catalog, independent of HTTP:
//!
//! - [`cart`] - line items and the in-memory cart collection
//! - [`checkout`] - the buyer's checkout draft and its presence checks
//! - [`catalog`] - the agency's service packages
//! - [`storage`] - the [`KeyValueStore`] persistence trait and an in-memory backend
//! - [`persist`] - write-through mirroring of one value to one key
//! - [`store`] - [`CartStore`], [`DraftStore`], and [`VisitorStore`]
//! - [`types`] - `ServiceId` and `Price` newtypes
//!
//! # Architecture
//!
//! Stores are generic over [`KeyValueStore`], so the same cart logic runs
//! against a visitor session in the storefront and against [`MemoryStore`]
//! in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod persist;
pub mod storage;
pub mod store;
pub mod types;
pub mod visitor;

pub use cart::{Cart, CartItem, ItemPatch, NewCartItem};
pub use checkout::{CheckoutDraft, DraftError, DraftPatch};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use store::{CartStore, DraftStore, VisitorStore};
pub use types::*;
pub use visitor::VisitorState;
