//! Model to entity mappers
//!
//! Conversions from database rows (models) to domain entities (tally-core).
//! Rows whose text columns cannot be parsed convert with `TryFrom`.

mod grade;
mod guardian;
mod member;
mod roster;
