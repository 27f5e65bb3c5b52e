pub mod ikigai;
pub mod probe;
pub mod process;
pub mod serve;
