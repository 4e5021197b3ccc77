pub mod sequential_pass;

pub use sequential_pass::SequentialPass;
