//! # Tagging
//!
//! Reconciles the tags on a remote resource with the desired tags of a
//! request.
//!
//! ```text
//!   previous TagSet ─┐
//!                    ├─ diff_from ──▶ TagDiff { to_remove, to_add }
//!   desired TagSet ──┘                         │
//!                                              ▼
//!                       TagReconciler: untag_resource, then tag_resource
//!                                              │
//!                     after primary call ──────┴────── tags-only change
//!                     (permission failure soft)        (every failure hard)
//! ```

pub mod reconciler;
pub mod tag_set;

pub use reconciler::{TagReconciler, TaggingClient, TAGS_INCOMPLETE_TAG};
pub use tag_set::{diff, TagDiff, TagSet, Tags};
