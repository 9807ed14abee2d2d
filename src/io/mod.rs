//! Ground-motion file input.
//!
//! The engine itself owns no file format; these readers turn the two record
//! formats callers feed it (PEER NGA strong-motion files and generic
//! two-column text) into validated [`TimeHistory`](crate::motion::TimeHistory)
//! values.

mod motion_reader;

pub use motion_reader::{read_peer_record, read_two_column_record, MotionFileError};
