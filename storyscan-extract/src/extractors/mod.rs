// Atomic extractors
//
// Each module is an independent concept: a pure function over the cleaned
// transcript (or its sentences) that never fails.
//
// Contract: a miss is (None, 0.0); malformed input is just a miss.

pub mod amount;
pub mod category;
pub mod contact;
pub mod key_points;
pub mod location;
pub mod name;
pub mod text;
pub mod urgency;

pub use amount::extract_amount;
pub use contact::extract_contacts;
pub use key_points::extract_key_points;
pub use location::extract_locations;
pub use name::extract_name;
pub use text::split_sentences;
