//! End-to-end scenarios driving a disk-backed journey store through
//! browser event sequences.

mod harness;
mod scenarios;
