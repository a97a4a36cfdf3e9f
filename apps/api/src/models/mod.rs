pub mod career;
pub mod cv;
