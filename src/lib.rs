pub mod pixwise_core;
