//! HTTP middleware forming the request pipeline.
//!
//! Applied outermost first: [`tracing`], [`site`], [`item`], [`redirect_map`].

pub mod item;
pub mod redirect_map;
pub mod site;
pub mod tracing;

pub use item::ResolvedItem;
