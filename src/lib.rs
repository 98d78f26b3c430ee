pub mod cli;
pub mod wgsltoy;
