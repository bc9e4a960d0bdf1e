//! One module per indicator. Each calculator is a pure function of its
//! arguments.

pub mod arr;
pub mod cdp12;
pub mod neda3;
pub mod t1_gd;
pub mod t2;
