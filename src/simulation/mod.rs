//! Random trip generation for benchmarks and the CLI `generate` command.

pub mod generator;
