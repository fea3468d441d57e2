mod submission;

pub use submission::{Submission, TIMESTAMP_FORMAT, format_timestamp, parse_timestamp};
