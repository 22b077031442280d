//! Best-seller records and their normalization
//!
//! # Components
//!
//! - `BestSellerRecord`: one entry of a harvested list
//! - `IdentityKey`: the normalized (author, title) pair records are deduplicated on
//! - `RecordList`: an ordered collection that never holds two records with the same key
//! - `normalize_author` / `title_case`: the normalization applied to raw catalog strings

mod best_seller;
mod normalize;

pub use best_seller::{BestSellerRecord, IdentityKey, RecordList};
pub use normalize::{normalize_author, title_case};
