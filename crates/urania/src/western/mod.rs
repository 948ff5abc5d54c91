pub mod rulers;

pub use rulers::{sign_ruler, sign_ruler_from_longitude};
